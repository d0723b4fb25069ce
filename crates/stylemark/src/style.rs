//! The `fg:bg:flags` style code grammar.
//!
//! ```text
//! red:blue:B      red on blue, bold
//! :green          background only
//! ::-U            clear every attribute, then underline
//! yellow::H       the bright variant of yellow
//! -               full reset to the baseline style
//! ```
//!
//! Each segment is optional. A channel segment is `-` (reset that channel),
//! a hex color, a palette index or a color name. The flags segment is read
//! letter by letter: uppercase sets an attribute ON, lowercase sets it OFF.
//!
//! | Letter | Attribute |
//! |--------|-----------|
//! | `B`    | bold |
//! | `D`    | dim |
//! | `U`    | underline |
//! | `L`    | blink |
//! | `R`    | reverse |
//! | `S`    | strikethrough |
//! | `I`    | italic |
//! | `H`    | high intensity (bright color variant) |
//!
//! Parsing never fails. Unknown names and letters are dropped.

use crate::color::{bright_variant, ColorValue, Layer};
use crate::profile::ColorProfile;

/// The full reset escape.
pub const RESET: &str = "\x1b[0m";

/// A channel value: reset to the terminal default, or a concrete color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpec {
    Default,
    Color(ColorValue),
}

/// Partial attribute set.
///
/// `Some(true)` is ON, `Some(false)` is OFF, `None` inherits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub bold: Option<bool>,
    pub dim: Option<bool>,
    pub underline: Option<bool>,
    pub blink: Option<bool>,
    pub reverse: Option<bool>,
    pub strikethrough: Option<bool>,
    pub italic: Option<bool>,
    pub high_intensity: Option<bool>,
}

impl Flags {
    /// Every attribute explicitly OFF.
    pub fn all_off() -> Self {
        Self {
            bold: Some(false),
            dim: Some(false),
            underline: Some(false),
            blink: Some(false),
            reverse: Some(false),
            strikethrough: Some(false),
            italic: Some(false),
            high_intensity: Some(false),
        }
    }

    /// Parses a flags segment.
    ///
    /// A leading `-` clears every attribute before the remaining letters apply.
    pub fn parse(segment: &str) -> Self {
        let segment = segment.trim();
        let (mut flags, letters) = match segment.strip_prefix('-') {
            Some(rest) => (Self::all_off(), rest),
            None => (Self::default(), segment),
        };
        for letter in letters.chars() {
            if !flags.apply_letter(letter) {
                log::trace!("ignoring unknown style flag {:?}", letter);
            }
        }
        flags
    }

    /// Applies one flag letter. Returns false for letters with no meaning.
    pub fn apply_letter(&mut self, letter: char) -> bool {
        let value = letter.is_ascii_uppercase();
        let slot = match letter.to_ascii_uppercase() {
            'B' => &mut self.bold,
            'D' => &mut self.dim,
            'U' => &mut self.underline,
            'L' => &mut self.blink,
            'R' => &mut self.reverse,
            'S' => &mut self.strikethrough,
            'I' => &mut self.italic,
            'H' => &mut self.high_intensity,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Merges another set of flags onto this one.
    ///
    /// `Some` values in `other` override values in `self`.
    pub fn merge(&self, other: &Flags) -> Flags {
        Flags {
            bold: other.bold.or(self.bold),
            dim: other.dim.or(self.dim),
            underline: other.underline.or(self.underline),
            blink: other.blink.or(self.blink),
            reverse: other.reverse.or(self.reverse),
            strikethrough: other.strikethrough.or(self.strikethrough),
            italic: other.italic.or(self.italic),
            high_intensity: other.high_intensity.or(self.high_intensity),
        }
    }

    /// Returns true if all attributes are None.
    pub fn is_empty(&self) -> bool {
        *self == Flags::default()
    }

    /// (attribute, on code, off code), in emission order.
    fn sgr_table(&self) -> [(Option<bool>, u8, u8); 7] {
        [
            (self.bold, 1, 22),
            (self.dim, 2, 22),
            (self.italic, 3, 23),
            (self.underline, 4, 24),
            (self.blink, 5, 25),
            (self.reverse, 7, 27),
            (self.strikethrough, 9, 29),
        ]
    }

    /// Codes that switch attributes off. Emitted before any ON code because
    /// bold and dim share their OFF code.
    fn off_codes(&self) -> Vec<u8> {
        let mut codes: Vec<u8> = Vec::new();
        for (value, _, off) in self.sgr_table() {
            if value == Some(false) && !codes.contains(&off) {
                codes.push(off);
            }
        }
        codes
    }

    fn on_codes(&self) -> Vec<u8> {
        self.sgr_table()
            .into_iter()
            .filter(|(value, _, _)| *value == Some(true))
            .map(|(_, on, _)| on)
            .collect()
    }

    /// Letters for the mentioned attributes: uppercase ON, lowercase OFF.
    pub fn to_letters(&self) -> String {
        let entries = [
            (self.bold, 'B'),
            (self.dim, 'D'),
            (self.underline, 'U'),
            (self.blink, 'L'),
            (self.reverse, 'R'),
            (self.strikethrough, 'S'),
            (self.italic, 'I'),
            (self.high_intensity, 'H'),
        ];
        entries
            .iter()
            .filter_map(|(value, letter)| match value {
                Some(true) => Some(*letter),
                Some(false) => Some(letter.to_ascii_lowercase()),
                None => None,
            })
            .collect()
    }
}

/// One parsed style code.
///
/// `None` channels inherit from whatever this triple is composed onto.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleTriple {
    pub fg: Option<ColorSpec>,
    pub bg: Option<ColorSpec>,
    pub flags: Flags,
    full_reset: bool,
}

impl StyleTriple {
    /// The full-reset sentinel produced by the code `-`.
    pub fn reset() -> Self {
        Self {
            full_reset: true,
            ..Self::default()
        }
    }

    /// Parses a style code. See the module docs for the grammar.
    pub fn parse(code: &str) -> Self {
        parse_style_code(code)
    }

    pub fn is_reset(&self) -> bool {
        self.full_reset
    }

    /// Returns true when nothing is specified (and this is not a reset).
    pub fn is_empty(&self) -> bool {
        !self.full_reset && self.fg.is_none() && self.bg.is_none() && self.flags.is_empty()
    }

    /// Renders the escape sequence for this triple at `profile`.
    ///
    /// Produces a single SGR sequence, or nothing at [`ColorProfile::Ascii`]
    /// and for an empty triple.
    pub fn to_ansi(&self, profile: ColorProfile) -> String {
        if !profile.supports_color() {
            return String::new();
        }
        if self.full_reset {
            return RESET.to_string();
        }

        let mut params: Vec<String> = self
            .flags
            .off_codes()
            .iter()
            .map(|c| c.to_string())
            .collect();
        if let Some(fg) = channel_params(self.fg.as_ref(), profile, Layer::Foreground) {
            params.push(fg);
        }
        if let Some(bg) = channel_params(self.bg.as_ref(), profile, Layer::Background) {
            params.push(bg);
        }
        params.extend(self.flags.on_codes().iter().map(|c| c.to_string()));

        if params.is_empty() {
            return String::new();
        }
        format!("\x1b[{}m", params.join(";"))
    }
}

fn channel_params(spec: Option<&ColorSpec>, profile: ColorProfile, layer: Layer) -> Option<String> {
    match spec? {
        ColorSpec::Default => Some(match layer {
            Layer::Foreground => "39".to_string(),
            Layer::Background => "49".to_string(),
        }),
        ColorSpec::Color(color) => color.sgr_params(profile, layer),
    }
}

/// Parses a `fg:bg:flags` code into a [`StyleTriple`].
///
/// The flags segment is read before either color so that `H` can select the
/// bright variant of the names it accompanies.
///
/// ```rust
/// use stylemark::{parse_style_code, ColorProfile};
///
/// let style = parse_style_code("red::BH");
/// assert_eq!(style.to_ansi(ColorProfile::Ansi16), "\x1b[91;1m");
/// assert!(parse_style_code("-").is_reset());
/// ```
pub fn parse_style_code(code: &str) -> StyleTriple {
    let code = code.trim();
    if code == "-" {
        return StyleTriple::reset();
    }

    let mut segments = code.split(':');
    let fg = segments.next().unwrap_or("");
    let bg = segments.next().unwrap_or("");
    let flags = Flags::parse(segments.next().unwrap_or(""));

    let bright = flags.high_intensity == Some(true);
    StyleTriple {
        fg: parse_channel(fg, bright),
        bg: parse_channel(bg, bright),
        flags,
        full_reset: false,
    }
}

fn parse_channel(segment: &str, bright: bool) -> Option<ColorSpec> {
    let segment = segment.trim();
    if segment.is_empty() {
        return None;
    }
    if segment == "-" {
        return Some(ColorSpec::Default);
    }

    let Some(color) = ColorValue::parse(segment) else {
        log::trace!("dropping unresolvable color {:?}", segment);
        return None;
    };
    if !bright {
        return Some(ColorSpec::Color(color));
    }

    let brightened = match color {
        ColorValue::Named(named) => ColorValue::parse(&bright_variant(segment))
            .unwrap_or(ColorValue::Named(named)),
        ColorValue::Index(n) if n < 8 => ColorValue::Index(n + 8),
        other => other,
    };
    Some(ColorSpec::Color(brightened))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{resolve_named, Rgb};

    fn named(name: &str) -> Option<ColorSpec> {
        resolve_named(name).map(|c| ColorSpec::Color(ColorValue::Named(c)))
    }

    // =========================================================================
    // Grammar
    // =========================================================================

    mod grammar {
        use super::*;

        #[test]
        fn full_triple() {
            let style = parse_style_code("red:blue:B");
            assert_eq!(style.fg, named("red"));
            assert_eq!(style.bg, named("blue"));
            assert_eq!(style.flags.bold, Some(true));
            assert!(!style.is_reset());
        }

        #[test]
        fn segments_are_optional() {
            let bg_only = parse_style_code(":green");
            assert_eq!(bg_only.fg, None);
            assert_eq!(bg_only.bg, named("green"));
            assert!(bg_only.flags.is_empty());

            let flags_only = parse_style_code("::U");
            assert_eq!(flags_only.fg, None);
            assert_eq!(flags_only.bg, None);
            assert_eq!(flags_only.flags.underline, Some(true));
        }

        #[test]
        fn empty_code_is_empty_triple() {
            let style = parse_style_code("");
            assert!(style.is_empty());
            assert!(!style.is_reset());
            assert!(parse_style_code("::").is_empty());
        }

        #[test]
        fn dash_is_full_reset() {
            let style = parse_style_code("-");
            assert!(style.is_reset());
            assert_eq!(style, StyleTriple::reset());
            assert_ne!(style, parse_style_code(""));
        }

        #[test]
        fn channel_dash_is_channel_reset() {
            let style = parse_style_code("-:-");
            assert!(!style.is_reset());
            assert_eq!(style.fg, Some(ColorSpec::Default));
            assert_eq!(style.bg, Some(ColorSpec::Default));
        }

        #[test]
        fn hex_and_index() {
            let style = parse_style_code("#ff8800:208");
            assert_eq!(
                style.fg,
                Some(ColorSpec::Color(ColorValue::Hex(Rgb(255, 136, 0))))
            );
            assert_eq!(style.bg, Some(ColorSpec::Color(ColorValue::Index(208))));
        }

        #[test]
        fn unknown_color_is_dropped() {
            let style = parse_style_code("nosuch:blue:B");
            assert_eq!(style.fg, None);
            assert_eq!(style.bg, named("blue"));
            assert_eq!(style.flags.bold, Some(true));
        }

        #[test]
        fn extra_segments_are_ignored() {
            assert_eq!(parse_style_code("red:blue:B:junk"), parse_style_code("red:blue:B"));
        }
    }

    // =========================================================================
    // Flags
    // =========================================================================

    mod flags {
        use super::*;

        #[test]
        fn uppercase_on_lowercase_off() {
            let flags = Flags::parse("BuI");
            assert_eq!(flags.bold, Some(true));
            assert_eq!(flags.underline, Some(false));
            assert_eq!(flags.italic, Some(true));
            assert_eq!(flags.dim, None);
        }

        #[test]
        fn later_letter_wins() {
            assert_eq!(Flags::parse("Bb").bold, Some(false));
            assert_eq!(Flags::parse("bB").bold, Some(true));
        }

        #[test]
        fn leading_dash_clears_then_applies() {
            let flags = Flags::parse("-U");
            assert_eq!(flags.underline, Some(true));
            assert_eq!(flags.bold, Some(false));
            assert_eq!(flags.reverse, Some(false));
            assert_eq!(flags.high_intensity, Some(false));
        }

        #[test]
        fn unknown_letters_ignored() {
            let flags = Flags::parse("BXz9");
            assert_eq!(flags, Flags::parse("B"));
        }

        #[test]
        fn merge_overrides_some_only() {
            let base = Flags::parse("BU");
            let overlay = Flags::parse("u");
            let merged = base.merge(&overlay);
            assert_eq!(merged.bold, Some(true));
            assert_eq!(merged.underline, Some(false));
        }

        #[test]
        fn to_letters() {
            assert_eq!(Flags::parse("Bu").to_letters(), "Bu");
            assert_eq!(Flags::default().to_letters(), "");
        }
    }

    // =========================================================================
    // High intensity
    // =========================================================================

    mod high_intensity {
        use super::*;

        #[test]
        fn h_selects_bright_variant() {
            let style = parse_style_code("red::H");
            assert_eq!(style.fg, named("bright-red"));
        }

        #[test]
        fn h_applies_to_background_too() {
            let style = parse_style_code(":green:H");
            assert_eq!(style.bg, named("bright-green"));
        }

        #[test]
        fn h_changes_physical_color() {
            // green and bright-green have different hex values
            let plain = parse_style_code("green");
            let bright = parse_style_code("green::H");
            assert_ne!(
                plain.to_ansi(ColorProfile::TrueColor),
                bright.to_ansi(ColorProfile::TrueColor)
            );
            assert_eq!(bright.to_ansi(ColorProfile::TrueColor), "\x1b[38;2;0;255;0m");
        }

        #[test]
        fn lowercase_h_keeps_normal_variant() {
            assert_eq!(parse_style_code("red::h").fg, named("red"));
        }

        #[test]
        fn h_brightens_low_indices() {
            assert_eq!(
                parse_style_code("3::H").fg,
                Some(ColorSpec::Color(ColorValue::Index(11)))
            );
        }

        #[test]
        fn h_leaves_hex_alone() {
            assert_eq!(
                parse_style_code("#102030::H").fg,
                Some(ColorSpec::Color(ColorValue::Hex(Rgb(0x10, 0x20, 0x30))))
            );
        }
    }

    // =========================================================================
    // Escape output
    // =========================================================================

    mod escapes {
        use super::*;

        #[test]
        fn truecolor_triple() {
            assert_eq!(
                parse_style_code("red:blue:B").to_ansi(ColorProfile::TrueColor),
                "\x1b[38;2;255;0;0;48;2;0;0;255;1m"
            );
        }

        #[test]
        fn ansi16_triple() {
            assert_eq!(
                parse_style_code("red:blue:B").to_ansi(ColorProfile::Ansi16),
                "\x1b[31;44;1m"
            );
        }

        #[test]
        fn ansi256_named_uses_slot() {
            assert_eq!(
                parse_style_code("cyan").to_ansi(ColorProfile::Ansi256),
                "\x1b[38;5;6m"
            );
        }

        #[test]
        fn reset_and_channel_reset() {
            assert_eq!(parse_style_code("-").to_ansi(ColorProfile::Ansi16), RESET);
            assert_eq!(
                parse_style_code("-:-").to_ansi(ColorProfile::Ansi16),
                "\x1b[39;49m"
            );
        }

        #[test]
        fn off_codes_precede_on_codes() {
            // bold OFF and dim ON share code 22; dim must survive
            assert_eq!(
                parse_style_code("::bD").to_ansi(ColorProfile::Ansi16),
                "\x1b[22;2m"
            );
        }

        #[test]
        fn clear_all_emits_each_off_code_once() {
            assert_eq!(
                parse_style_code("::-").to_ansi(ColorProfile::Ansi16),
                "\x1b[22;23;24;25;27;29m"
            );
        }

        #[test]
        fn ascii_emits_nothing() {
            assert_eq!(parse_style_code("red:blue:B").to_ansi(ColorProfile::Ascii), "");
            assert_eq!(parse_style_code("-").to_ansi(ColorProfile::Ascii), "");
        }

        #[test]
        fn empty_emits_nothing() {
            assert_eq!(parse_style_code("nosuch").to_ansi(ColorProfile::TrueColor), "");
        }
    }
}
