//! The public render entry points.
//!
//! A [`Renderer`] owns a handle to a [`TagRegistry`], the delimiter set its
//! input is written in, and the output capabilities it renders for:
//!
//! ```rust
//! use std::sync::Arc;
//! use stylemark::{ColorProfile, Renderer, TagRegistry};
//!
//! let renderer = Renderer::new(Arc::new(TagRegistry::with_defaults()))
//!     .with_profile(ColorProfile::Ansi16);
//!
//! assert_eq!(renderer.to_ansi("{{_error_}}failed"), "\x1b[0m\x1b[31mfailed");
//! assert_eq!(renderer.strip("{{_error_}}failed"), "failed");
//! ```
//!
//! When the destination is not a terminal, or the profile is
//! [`ColorProfile::Ascii`], [`Renderer::to_ansi`] returns exactly what
//! [`Renderer::strip`] would.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use stylemark_tags::{Delimiters, Token, Tokenizer};
use unicode_width::UnicodeWidthStr;

use crate::env::EnvReader;
use crate::expand::Expander;
use crate::markup;
use crate::profile::{detect_profile_from, is_color_terminal, ColorProfile};
use crate::registry::TagRegistry;
use crate::resolve::{load_theme_table, unload_preview, LoadedTheme};
use crate::style::{parse_style_code, RESET};

/// Escape sequences that lost their leading ESC byte on the way through a
/// capture buffer: SGR, cursor position, cursor moves, erase, private modes.
///
/// A candidate closed by `]` is a bracketed word such as `[2B]` or `[0m]`,
/// not a cut-off sequence, and is kept.
static TRUNCATED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\[\d{1,3}(?:;\d{1,3})*m|\[\d{1,4};\d{1,4}[Hf]|\[\d{1,4}[ABCDGJK]|\[\?\d{1,4}[hl])(?P<close>\])?",
    )
    .expect("valid truncated escape pattern")
});

fn strip_truncated(text: &str) -> String {
    TRUNCATED
        .replace_all(text, |caps: &Captures<'_>| match caps.name("close") {
            Some(_) => caps[0].to_string(),
            None => String::new(),
        })
        .into_owned()
}

/// Removes raw escape sequences, complete or truncated, from `text`.
///
/// ```rust
/// use stylemark::strip_ansi;
///
/// assert_eq!(strip_ansi("\x1b[1mbold\x1b[0m"), "bold");
/// assert_eq!(strip_ansi("[31mred[0m"), "red");
/// assert_eq!(strip_ansi("[12;40Hmoved"), "moved");
/// ```
pub fn strip_ansi(text: &str) -> String {
    // Removing one sequence can join two fragments into another; every
    // round only deletes, so the loop ends.
    let mut current = text.to_string();
    loop {
        let complete = console::strip_ansi_codes(&current);
        let next = strip_truncated(&complete).replace('\x1b', "");
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Renders markup for one output destination.
#[derive(Debug, Clone)]
pub struct Renderer {
    registry: Arc<TagRegistry>,
    delimiters: Delimiters,
    profile: ColorProfile,
    is_terminal: bool,
}

impl Renderer {
    /// A renderer for a true-color terminal with the default delimiters.
    ///
    /// Use [`Renderer::from_env`] to pick the profile from the environment.
    pub fn new(registry: Arc<TagRegistry>) -> Self {
        Self {
            registry,
            delimiters: Delimiters::default(),
            profile: ColorProfile::TrueColor,
            is_terminal: true,
        }
    }

    /// A renderer whose profile and terminal state come from `env`.
    pub fn from_env(registry: Arc<TagRegistry>, env: &dyn EnvReader) -> Self {
        Self {
            registry,
            delimiters: Delimiters::default(),
            profile: detect_profile_from(env),
            is_terminal: is_color_terminal(env),
        }
    }

    pub fn with_profile(mut self, profile: ColorProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_terminal(mut self, is_terminal: bool) -> Self {
        self.is_terminal = is_terminal;
        self
    }

    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    pub fn registry(&self) -> &Arc<TagRegistry> {
        &self.registry
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    pub fn profile(&self) -> ColorProfile {
        self.profile
    }

    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    pub fn expander(&self) -> Expander<'_> {
        Expander::new(&self.registry, &self.delimiters)
    }

    fn renders_color(&self) -> bool {
        self.is_terminal && self.profile.supports_color()
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Renders markup to escape sequences for this renderer's destination.
    pub fn to_ansi(&self, text: &str) -> String {
        if !self.renders_color() {
            return self.strip(text);
        }
        self.to_ansi_with_profile(text, self.profile)
    }

    /// Renders for `profile` as if writing to a terminal.
    pub fn to_ansi_with_profile(&self, text: &str, profile: ColorProfile) -> String {
        if !profile.supports_color() {
            return self.strip(text);
        }
        self.expander().render(text, profile, None)
    }

    /// Renders `text` inside a base style.
    ///
    /// `base_code` is a style code, bare or as a direct tag. Every reset the
    /// text produces, from its own tags or from escapes captured into it,
    /// restores the base. The output ends with a full reset.
    pub fn to_ansi_within(&self, text: &str, base_code: &str) -> String {
        if !self.renders_color() {
            return self.strip(text);
        }
        let base = parse_style_code(self.delimiters.strip_direct(base_code));
        let body = self.expander().render(text, self.profile, Some(&base));
        format!("{}{}{}", base.to_ansi(self.profile), body, RESET)
    }

    /// Removes tags and raw escape sequences.
    ///
    /// Removal repeats until nothing changes, so text that only forms a tag
    /// once its neighbour is gone is removed as well, and the result never
    /// contains a tag or an escape.
    pub fn strip(&self, text: &str) -> String {
        let expander = self.expander();
        let mut current = text.to_string();
        loop {
            let next = strip_ansi(&expander.strip_tags(&current));
            if next == current {
                return current;
            }
            current = next;
        }
    }

    /// Converts markup to bracket-style widget markup.
    pub fn to_display_markup(&self, text: &str) -> String {
        markup::to_display_markup(&self.expander(), text)
    }

    /// Display width of the text once rendered, in terminal columns.
    pub fn measure_width(&self, text: &str) -> usize {
        self.strip(text).width()
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Registers a semantic tag.
    ///
    /// `raw` is a bare code or direct tags written in this renderer's
    /// delimiters; it is stored in the canonical syntax.
    pub fn register_tag(&self, name: &str, raw: &str) {
        let value = self.canonicalize(raw);
        self.registry.register_semantic(name, &value);
    }

    pub fn unregister_tag(&self, name: &str) -> Option<String> {
        self.registry.unregister(name)
    }

    /// The value of a tag as direct tags in this renderer's delimiters.
    pub fn lookup_tagged(&self, name: &str) -> Option<String> {
        self.expander().lookup_tagged(name)
    }

    /// Resolves and registers a theme table written in this renderer's
    /// delimiters.
    pub fn load_theme<I, K, V>(&self, table: I, namespace: Option<&str>) -> LoadedTheme
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        load_theme_table(&self.registry, table, &self.delimiters, namespace)
    }

    /// Drops a preview namespace loaded with [`Renderer::load_theme`].
    pub fn unload_preview(&self, namespace: &str) -> usize {
        unload_preview(&self.registry, namespace)
    }

    fn canonicalize(&self, raw: &str) -> String {
        if !self.delimiters.has_tags(raw) {
            return raw.trim().to_string();
        }
        let canonical = Delimiters::default();
        let mut out = String::new();
        for token in Tokenizer::new(raw, &self.delimiters) {
            match token {
                Token::Direct(code) => out.push_str(&canonical.wrap_direct(code)),
                Token::Semantic(name) => out.push_str(&canonical.wrap_semantic(name)),
                Token::Text(_) => {}
            }
        }
        out
    }
}
