//! # Stylemark - Semantic Style Tags for Terminals
//!
//! `stylemark` turns text carrying inline style tags into output for a given
//! destination: ANSI escapes sized to what the terminal supports, plain text,
//! or bracket markup for a widget toolkit.
//!
//! ## Core Concepts
//!
//! - Direct tags carry a style code: `{{|red:blue:B|}}`
//! - Semantic tags name a style held in a [`TagRegistry`]: `{{_error_}}`
//! - [`ColorProfile`]: what the destination can display (TrueColor down to Ascii)
//! - [`Renderer`]: the render, strip and markup entry points
//! - [`ThemeFile`]: YAML tables of named styles that may reference each other
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use stylemark::{ColorProfile, Renderer, TagRegistry};
//!
//! let renderer = Renderer::new(Arc::new(TagRegistry::with_defaults()));
//!
//! let text = "{{|red:blue:B|}}Hi{{|-|}}";
//! assert_eq!(
//!     renderer.to_ansi(text),
//!     "\x1b[38;2;255;0;0;48;2;0;0;255;1mHi\x1b[0m"
//! );
//!
//! let plain = renderer.clone().with_profile(ColorProfile::Ascii);
//! assert_eq!(plain.to_ansi(text), "Hi");
//! ```
//!
//! ## Style Codes
//!
//! A code is `fg:bg:flags`. Colors are names (`red`, `bright-red`, `orange`),
//! hex values (`#ff8800`) or palette indices (`208`). Uppercase flag letters
//! switch an attribute on, lowercase switch it off, and `-` alone resets
//! everything. See [`parse_style_code`].
//!
//! ## Themes
//!
//! ```rust
//! use stylemark::{ColorProfile, Renderer, TagRegistry, ThemeFile};
//! use std::sync::Arc;
//!
//! let theme = ThemeFile::from_yaml(r#"
//! colors:
//!   Base: "{{|white:black|}}"
//!   Title: "{{_Theme_Base_}}{{|yellow::B|}}"
//! "#).unwrap();
//!
//! let registry = Arc::new(TagRegistry::with_defaults());
//! theme.load_into(&registry, None);
//! assert_eq!(registry.lookup("Theme_Title").as_deref(), Some("yellow:black:B"));
//!
//! let renderer = Renderer::new(registry).with_profile(ColorProfile::Ansi16);
//! assert_eq!(renderer.to_ansi("{{_Theme_Title_}}Menu"), "\x1b[33;40;1mMenu");
//! ```

pub mod color;
mod defaults;
pub mod env;
mod error;
pub mod expand;
pub mod markup;
pub mod profile;
pub mod registry;
mod render;
pub mod resolve;
pub mod style;
pub mod theme;

// Colors
pub use color::{
    bright_variant, downgrade_to_escape, index_to_rgb, nearest_ansi16, resolve_color_hex,
    resolve_named, rgb_to_ansi256, ColorValue, Layer, NamedColor, Rgb,
};

// Capabilities
pub use env::{EnvReader, MockEnv, RealEnv};
pub use profile::{detect_profile, detect_profile_from, is_color_terminal, ColorProfile};

// Style codes
pub use style::{parse_style_code, ColorSpec, Flags, StyleTriple, RESET};

// Tags
pub use defaults::BUILTIN_TAGS;
pub use expand::{Expander, Segment, MAX_EXPANSION_PASSES};
pub use registry::{prefix_tag, TagRegistry};
pub use stylemark_tags::Delimiters;

// Themes
pub use error::ThemeError;
pub use resolve::{
    load_theme_table, resolve_theme_table, unload_preview, Composition, LoadedTheme,
    ThemeResolver, THEME_PREFIX,
};
pub use theme::{SyntaxOverride, ThemeFile, ThemeMetadata};

// Rendering
pub use render::{strip_ansi, Renderer};
