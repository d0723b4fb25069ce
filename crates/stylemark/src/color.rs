//! Color names, values and their downgrade to escape-sequence parameters.
//!
//! Supports these color formats inside a style code:
//!
//! - Named colors: the 16 standard names (`black`, `maroon`, ... `aqua`, `white`)
//!   plus a modest extended set (`orange`, `pink`, `gold`, ...)
//! - ANSI aliases: `red`, `cyan`, `magenta`, `bright-red`, `bright_blue`, `grey`
//! - Hex: `#ff6b35` or `#f63`
//! - 256-color palette index: `0` through `255`
//!
//! Aliases are applied before the canonical lookup. An alias may keep the hex
//! value of its target but place it in a different intensity bucket: `red`
//! and `bright-red` are both `#ff0000`, but the first renders as SGR 31 on a
//! 16-color terminal and the second as SGR 91.
//!
//! # Example
//!
//! ```rust
//! use stylemark::{downgrade_to_escape, resolve_color_hex, ColorProfile, Layer, Rgb};
//!
//! assert_eq!(resolve_color_hex("Cyan").as_deref(), Some("#00ffff"));
//! assert_eq!(resolve_color_hex("#abc").as_deref(), Some("#abc"));
//! assert_eq!(resolve_color_hex("nope"), None);
//!
//! let red = Rgb(255, 0, 0);
//! assert_eq!(downgrade_to_escape(red, ColorProfile::TrueColor, Layer::Foreground), "\x1b[38;2;255;0;0m");
//! assert_eq!(downgrade_to_escape(red, ColorProfile::Ansi256, Layer::Foreground), "\x1b[38;5;196m");
//! assert_eq!(downgrade_to_escape(red, ColorProfile::Ascii, Layer::Foreground), "");
//! ```

use std::fmt;

use crate::profile::ColorProfile;

// ─── RGB type ───────────────────────────────────────────────────────────────

/// A simple RGB color triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parses `#rrggbb` or `#rgb` (the `#` is optional, case-insensitive).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Rgb(digit(0)?, digit(1)?, digit(2)?))
            }
            6 => {
                let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Rgb(pair(0)?, pair(2)?, pair(4)?))
            }
            _ => None,
        }
    }

    /// Formats as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ─── Name tables ────────────────────────────────────────────────────────────

/// Canonical names with their RGB value and, for the 16 system colors, their
/// palette slot.
const NAMED_COLORS: &[(&str, Rgb, Option<u8>)] = &[
    ("black", Rgb(0x00, 0x00, 0x00), Some(0)),
    ("maroon", Rgb(0x80, 0x00, 0x00), Some(1)),
    ("green", Rgb(0x00, 0x80, 0x00), Some(2)),
    ("olive", Rgb(0x80, 0x80, 0x00), Some(3)),
    ("navy", Rgb(0x00, 0x00, 0x80), Some(4)),
    ("purple", Rgb(0x80, 0x00, 0x80), Some(5)),
    ("teal", Rgb(0x00, 0x80, 0x80), Some(6)),
    ("silver", Rgb(0xc0, 0xc0, 0xc0), Some(7)),
    ("gray", Rgb(0x80, 0x80, 0x80), Some(8)),
    ("red", Rgb(0xff, 0x00, 0x00), Some(9)),
    ("lime", Rgb(0x00, 0xff, 0x00), Some(10)),
    ("yellow", Rgb(0xff, 0xff, 0x00), Some(11)),
    ("blue", Rgb(0x00, 0x00, 0xff), Some(12)),
    ("fuchsia", Rgb(0xff, 0x00, 0xff), Some(13)),
    ("aqua", Rgb(0x00, 0xff, 0xff), Some(14)),
    ("white", Rgb(0xff, 0xff, 0xff), Some(15)),
    // Extended set, rendered by nearest match below TrueColor
    ("orange", Rgb(0xff, 0xa5, 0x00), None),
    ("pink", Rgb(0xff, 0xc0, 0xcb), None),
    ("brown", Rgb(0xa5, 0x2a, 0x2a), None),
    ("gold", Rgb(0xff, 0xd7, 0x00), None),
    ("indigo", Rgb(0x4b, 0x00, 0x82), None),
    ("violet", Rgb(0xee, 0x82, 0xee), None),
    ("coral", Rgb(0xff, 0x7f, 0x50), None),
    ("salmon", Rgb(0xfa, 0x80, 0x72), None),
    ("crimson", Rgb(0xdc, 0x14, 0x3c), None),
    ("tomato", Rgb(0xff, 0x63, 0x47), None),
    ("khaki", Rgb(0xf0, 0xe6, 0x8c), None),
    ("lavender", Rgb(0xe6, 0xe6, 0xfa), None),
    ("turquoise", Rgb(0x40, 0xe0, 0xd0), None),
    ("skyblue", Rgb(0x87, 0xce, 0xeb), None),
    ("steelblue", Rgb(0x46, 0x82, 0xb4), None),
    ("slategray", Rgb(0x70, 0x80, 0x90), None),
    ("chocolate", Rgb(0xd2, 0x69, 0x1e), None),
    ("tan", Rgb(0xd2, 0xb4, 0x8c), None),
    ("orchid", Rgb(0xda, 0x70, 0xd6), None),
    ("plum", Rgb(0xdd, 0xa0, 0xdd), None),
    ("darkred", Rgb(0x8b, 0x00, 0x00), None),
    ("darkgreen", Rgb(0x00, 0x64, 0x00), None),
    ("darkblue", Rgb(0x00, 0x00, 0x8b), None),
    ("darkgray", Rgb(0xa9, 0xa9, 0xa9), None),
    ("lightgray", Rgb(0xd3, 0xd3, 0xd3), None),
];

/// ANSI-style aliases: (alias, canonical name, palette slot).
const ALIASES: &[(&str, &str, u8)] = &[
    ("black", "black", 0),
    ("red", "red", 1),
    ("green", "green", 2),
    ("yellow", "yellow", 3),
    ("blue", "blue", 4),
    ("magenta", "fuchsia", 5),
    ("cyan", "aqua", 6),
    ("white", "white", 7),
    ("bright-black", "gray", 8),
    ("bright-red", "red", 9),
    ("bright-green", "lime", 10),
    ("bright-yellow", "yellow", 11),
    ("bright-blue", "blue", 12),
    ("bright-magenta", "fuchsia", 13),
    ("bright-cyan", "aqua", 14),
    ("bright-white", "white", 15),
    ("grey", "gray", 8),
];

/// The 16 system colors in palette order (xterm defaults).
const ANSI16_PALETTE: [Rgb; 16] = [
    Rgb(0x00, 0x00, 0x00),
    Rgb(0x80, 0x00, 0x00),
    Rgb(0x00, 0x80, 0x00),
    Rgb(0x80, 0x80, 0x00),
    Rgb(0x00, 0x00, 0x80),
    Rgb(0x80, 0x00, 0x80),
    Rgb(0x00, 0x80, 0x80),
    Rgb(0xc0, 0xc0, 0xc0),
    Rgb(0x80, 0x80, 0x80),
    Rgb(0xff, 0x00, 0x00),
    Rgb(0x00, 0xff, 0x00),
    Rgb(0xff, 0xff, 0x00),
    Rgb(0x00, 0x00, 0xff),
    Rgb(0xff, 0x00, 0xff),
    Rgb(0x00, 0xff, 0xff),
    Rgb(0xff, 0xff, 0xff),
];

/// Lowercases and folds `_` and spaces to `-`.
fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '_' | ' ' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

// ─── Named colors ───────────────────────────────────────────────────────────

/// A resolved color name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedColor {
    /// Canonical name after alias substitution (`cyan` becomes `aqua`).
    pub name: String,
    pub rgb: Rgb,
    /// Palette slot (0-15) when the color is one of the 16 system colors.
    pub slot: Option<u8>,
}

/// Resolves a color name through the alias table, then the canonical table.
pub fn resolve_named(name: &str) -> Option<NamedColor> {
    let name = normalize_name(name);
    let (canonical, alias_slot) = match ALIASES.iter().find(|(alias, _, _)| *alias == name) {
        Some((_, canonical, slot)) => (*canonical, Some(*slot)),
        None => (name.as_str(), None),
    };
    NAMED_COLORS
        .iter()
        .find(|(n, _, _)| *n == canonical)
        .map(|(n, rgb, slot)| NamedColor {
            name: (*n).to_string(),
            rgb: *rgb,
            slot: alias_slot.or(*slot),
        })
}

/// Maps a color name to its hex value.
///
/// Hex input (`#...`) is returned unchanged. Unknown names return `None`.
pub fn resolve_color_hex(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.starts_with('#') {
        return Some(trimmed.to_string());
    }
    resolve_named(trimmed).map(|c| c.rgb.to_hex())
}

/// Returns the bright variant of a color name, or the name itself when it
/// has none.
///
/// ```rust
/// use stylemark::bright_variant;
///
/// assert_eq!(bright_variant("red"), "bright-red");
/// assert_eq!(bright_variant("Bright_Red"), "bright-red");
/// assert_eq!(bright_variant("orange"), "orange");
/// ```
pub fn bright_variant(name: &str) -> String {
    let name = normalize_name(name);
    if name.starts_with("bright-") {
        return name;
    }
    let candidate = format!("bright-{}", name);
    if ALIASES.iter().any(|(alias, _, _)| *alias == candidate) {
        candidate
    } else {
        name
    }
}

// ─── Color values ───────────────────────────────────────────────────────────

/// Which channel an escape fragment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Foreground,
    Background,
}

/// A concrete color taken from a style code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorValue {
    Named(NamedColor),
    Hex(Rgb),
    Index(u8),
}

impl ColorValue {
    /// Parses a color segment. Returns `None` for anything unresolvable.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if s.starts_with('#') {
            return Rgb::from_hex(s).map(ColorValue::Hex);
        }
        if s.chars().all(|c| c.is_ascii_digit()) {
            return s.parse::<u8>().ok().map(ColorValue::Index);
        }
        resolve_named(s).map(ColorValue::Named)
    }

    /// The RGB value this color displays as on a default xterm palette.
    pub fn rgb(&self) -> Rgb {
        match self {
            ColorValue::Named(named) => named.rgb,
            ColorValue::Hex(rgb) => *rgb,
            ColorValue::Index(n) => index_to_rgb(*n),
        }
    }

    /// SGR parameters for this color at `profile`, without the `ESC [` and `m`.
    ///
    /// Returns `None` at [`ColorProfile::Ascii`].
    pub fn sgr_params(&self, profile: ColorProfile, layer: Layer) -> Option<String> {
        match profile {
            ColorProfile::Ascii => None,
            ColorProfile::TrueColor => match self {
                // Palette indices stay indices so they follow the terminal's theme
                ColorValue::Index(n) => Some(extended_params(layer, 5, *n)),
                other => Some(truecolor_params(other.rgb(), layer)),
            },
            ColorProfile::Ansi256 => {
                let index = match self {
                    ColorValue::Named(NamedColor {
                        slot: Some(slot), ..
                    }) => *slot,
                    ColorValue::Index(n) => *n,
                    other => rgb_to_ansi256(other.rgb()),
                };
                Some(extended_params(layer, 5, index))
            }
            ColorProfile::Ansi16 => {
                let slot = match self {
                    ColorValue::Named(NamedColor {
                        slot: Some(slot), ..
                    }) => *slot,
                    ColorValue::Index(n) if *n < 16 => *n,
                    other => nearest_ansi16(other.rgb()),
                };
                Some(basic_params(slot, layer))
            }
        }
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorValue::Named(named) => f.write_str(&named.name),
            ColorValue::Hex(rgb) => write!(f, "{}", rgb),
            ColorValue::Index(n) => write!(f, "{}", n),
        }
    }
}

fn truecolor_params(Rgb(r, g, b): Rgb, layer: Layer) -> String {
    match layer {
        Layer::Foreground => format!("38;2;{};{};{}", r, g, b),
        Layer::Background => format!("48;2;{};{};{}", r, g, b),
    }
}

fn extended_params(layer: Layer, mode: u8, index: u8) -> String {
    match layer {
        Layer::Foreground => format!("38;{};{}", mode, index),
        Layer::Background => format!("48;{};{}", mode, index),
    }
}

fn basic_params(slot: u8, layer: Layer) -> String {
    let slot = slot.min(15);
    let code = match (layer, slot < 8) {
        (Layer::Foreground, true) => 30 + slot,
        (Layer::Foreground, false) => 90 + slot - 8,
        (Layer::Background, true) => 40 + slot,
        (Layer::Background, false) => 100 + slot - 8,
    };
    code.to_string()
}

/// Converts an RGB color to a complete escape fragment for `profile`.
pub fn downgrade_to_escape(rgb: Rgb, profile: ColorProfile, layer: Layer) -> String {
    ColorValue::Hex(rgb)
        .sgr_params(profile, layer)
        .map(|params| format!("\x1b[{}m", params))
        .unwrap_or_default()
}

// ─── Palette math ───────────────────────────────────────────────────────────

/// Converts an RGB triplet to the nearest ANSI 256-color palette index.
///
/// ```rust
/// use stylemark::{rgb_to_ansi256, Rgb};
///
/// assert_eq!(rgb_to_ansi256(Rgb(255, 0, 0)), 196);
/// assert_eq!(rgb_to_ansi256(Rgb(0, 255, 0)), 46);
/// ```
pub fn rgb_to_ansi256(Rgb(r, g, b): Rgb) -> u8 {
    if r == g && g == b {
        if r < 8 {
            16
        } else if r > 248 {
            231
        } else {
            232 + ((r as u16 - 8) * 24 / 247) as u8
        }
    } else {
        let red = (r as u16 * 5 / 255) as u8;
        let green = (g as u16 * 5 / 255) as u8;
        let blue = (b as u16 * 5 / 255) as u8;
        16 + 36 * red + 6 * green + blue
    }
}

/// RGB value of a 256-color palette index on a default xterm palette.
pub fn index_to_rgb(index: u8) -> Rgb {
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    match index {
        0..=15 => ANSI16_PALETTE[index as usize],
        16..=231 => {
            let i = index - 16;
            Rgb(
                LEVELS[(i / 36) as usize],
                LEVELS[((i / 6) % 6) as usize],
                LEVELS[(i % 6) as usize],
            )
        }
        _ => {
            let level = 8 + 10 * (index - 232);
            Rgb(level, level, level)
        }
    }
}

/// Nearest of the 16 system colors by CIE LAB distance.
pub fn nearest_ansi16(rgb: Rgb) -> u8 {
    let target = rgb_to_lab(rgb);
    let mut best = 0u8;
    let mut best_distance = f64::MAX;
    for (slot, candidate) in ANSI16_PALETTE.iter().enumerate() {
        let distance = target.distance_sq(&rgb_to_lab(*candidate));
        if distance < best_distance {
            best_distance = distance;
            best = slot as u8;
        }
    }
    best
}

// ─── CIE LAB ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Lab {
    l: f64,
    a: f64,
    b: f64,
}

impl Lab {
    fn distance_sq(&self, other: &Lab) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }
}

/// D65 reference white point.
const XN: f64 = 0.95047;
const YN: f64 = 1.00000;
const ZN: f64 = 1.08883;

fn srgb_to_linear(c: u8) -> f64 {
    let c = c as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn lab_f(t: f64) -> f64 {
    if t > 0.008856 {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

fn rgb_to_lab(rgb: Rgb) -> Lab {
    let r = srgb_to_linear(rgb.0);
    let g = srgb_to_linear(rgb.1);
    let b = srgb_to_linear(rgb.2);

    let x = 0.4124564 * r + 0.3575761 * g + 0.1804375 * b;
    let y = 0.2126729 * r + 0.7151522 * g + 0.0721750 * b;
    let z = 0.0193339 * r + 0.1191920 * g + 0.9503041 * b;

    let fx = lab_f(x / XN);
    let fy = lab_f(y / YN);
    let fz = lab_f(z / ZN);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Name resolution
    // =========================================================================

    #[test]
    fn test_resolve_standard_names() {
        assert_eq!(resolve_color_hex("black").as_deref(), Some("#000000"));
        assert_eq!(resolve_color_hex("maroon").as_deref(), Some("#800000"));
        assert_eq!(resolve_color_hex("white").as_deref(), Some("#ffffff"));
        assert_eq!(resolve_color_hex("orange").as_deref(), Some("#ffa500"));
    }

    #[test]
    fn test_aliases_resolve_before_lookup() {
        assert_eq!(resolve_color_hex("cyan"), resolve_color_hex("aqua"));
        assert_eq!(resolve_color_hex("magenta"), resolve_color_hex("fuchsia"));
        assert_eq!(resolve_color_hex("grey"), resolve_color_hex("gray"));
        assert_eq!(resolve_color_hex("bright-green").as_deref(), Some("#00ff00"));
    }

    #[test]
    fn test_resolution_is_case_insensitive() {
        assert_eq!(resolve_color_hex("CYAN").as_deref(), Some("#00ffff"));
        assert_eq!(resolve_color_hex("Bright_Red").as_deref(), Some("#ff0000"));
        assert_eq!(resolve_color_hex("bright red").as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_hex_passes_through_unchanged() {
        assert_eq!(resolve_color_hex("#FF8800").as_deref(), Some("#FF8800"));
    }

    #[test]
    fn test_unknown_name_not_found() {
        assert_eq!(resolve_color_hex("notacolor"), None);
        assert_eq!(resolve_color_hex(""), None);
    }

    #[test]
    fn test_alias_changes_bucket_not_hex() {
        let red = resolve_named("red").unwrap();
        let bright = resolve_named("bright-red").unwrap();
        assert_eq!(red.rgb, bright.rgb);
        assert_eq!(red.slot, Some(1));
        assert_eq!(bright.slot, Some(9));
    }

    #[test]
    fn test_extended_names_have_no_slot() {
        assert_eq!(resolve_named("orange").unwrap().slot, None);
    }

    #[test]
    fn test_bright_variant() {
        assert_eq!(bright_variant("blue"), "bright-blue");
        assert_eq!(bright_variant("bright-blue"), "bright-blue");
        assert_eq!(bright_variant("navy"), "navy");
    }

    // =========================================================================
    // Color value parsing
    // =========================================================================

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(
            ColorValue::parse("#ff6b35"),
            Some(ColorValue::Hex(Rgb(255, 107, 53)))
        );
        assert_eq!(
            ColorValue::parse("#fff"),
            Some(ColorValue::Hex(Rgb(255, 255, 255)))
        );
        assert_eq!(ColorValue::parse("#ggg"), None);
        assert_eq!(ColorValue::parse("#12345"), None);
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(ColorValue::parse("208"), Some(ColorValue::Index(208)));
        assert_eq!(ColorValue::parse("0"), Some(ColorValue::Index(0)));
        assert_eq!(ColorValue::parse("256"), None);
    }

    #[test]
    fn test_parse_name() {
        let Some(ColorValue::Named(named)) = ColorValue::parse("cyan") else {
            panic!("cyan should resolve");
        };
        assert_eq!(named.name, "aqua");
        assert_eq!(named.slot, Some(6));
    }

    // =========================================================================
    // Downgrade
    // =========================================================================

    #[test]
    fn test_cyan_per_profile() {
        let cyan = ColorValue::parse("cyan").unwrap();
        assert_eq!(
            cyan.sgr_params(ColorProfile::Ansi16, Layer::Foreground).as_deref(),
            Some("36")
        );
        assert_eq!(
            cyan.sgr_params(ColorProfile::Ansi256, Layer::Foreground).as_deref(),
            Some("38;5;6")
        );
        assert_eq!(
            cyan.sgr_params(ColorProfile::TrueColor, Layer::Foreground).as_deref(),
            Some("38;2;0;255;255")
        );
        assert_eq!(cyan.sgr_params(ColorProfile::Ascii, Layer::Foreground), None);
    }

    #[test]
    fn test_bright_bucket_codes() {
        let bright = ColorValue::parse("bright-red").unwrap();
        assert_eq!(
            bright.sgr_params(ColorProfile::Ansi16, Layer::Foreground).as_deref(),
            Some("91")
        );
        assert_eq!(
            bright.sgr_params(ColorProfile::Ansi16, Layer::Background).as_deref(),
            Some("101")
        );
    }

    #[test]
    fn test_background_codes() {
        let blue = ColorValue::parse("blue").unwrap();
        assert_eq!(
            blue.sgr_params(ColorProfile::Ansi16, Layer::Background).as_deref(),
            Some("44")
        );
        assert_eq!(
            blue.sgr_params(ColorProfile::TrueColor, Layer::Background).as_deref(),
            Some("48;2;0;0;255")
        );
    }

    #[test]
    fn test_index_keeps_index_at_truecolor() {
        let idx = ColorValue::Index(208);
        assert_eq!(
            idx.sgr_params(ColorProfile::TrueColor, Layer::Foreground).as_deref(),
            Some("38;5;208")
        );
    }

    #[test]
    fn test_low_index_at_ansi16() {
        assert_eq!(
            ColorValue::Index(3)
                .sgr_params(ColorProfile::Ansi16, Layer::Foreground)
                .as_deref(),
            Some("33")
        );
    }

    #[test]
    fn test_hex_at_ansi16_uses_nearest() {
        // Pure red is exactly palette slot 9
        assert_eq!(
            downgrade_to_escape(Rgb(255, 0, 0), ColorProfile::Ansi16, Layer::Foreground),
            "\x1b[91m"
        );
    }

    #[test]
    fn test_downgrade_ascii_is_empty() {
        assert_eq!(
            downgrade_to_escape(Rgb(1, 2, 3), ColorProfile::Ascii, Layer::Background),
            ""
        );
    }

    // =========================================================================
    // Palette math
    // =========================================================================

    #[test]
    fn test_rgb_to_ansi256_grayscale() {
        assert_eq!(rgb_to_ansi256(Rgb(0, 0, 0)), 16);
        assert_eq!(rgb_to_ansi256(Rgb(255, 255, 255)), 231);
        let mid = rgb_to_ansi256(Rgb(128, 128, 128));
        assert!((232..=255).contains(&mid));
    }

    #[test]
    fn test_index_to_rgb() {
        assert_eq!(index_to_rgb(1), Rgb(0x80, 0, 0));
        assert_eq!(index_to_rgb(16), Rgb(0, 0, 0));
        assert_eq!(index_to_rgb(196), Rgb(255, 0, 0));
        assert_eq!(index_to_rgb(231), Rgb(255, 255, 255));
        assert_eq!(index_to_rgb(232), Rgb(8, 8, 8));
        assert_eq!(index_to_rgb(255), Rgb(238, 238, 238));
    }

    #[test]
    fn test_nearest_ansi16_exact_matches() {
        for (slot, rgb) in ANSI16_PALETTE.iter().enumerate() {
            assert_eq!(nearest_ansi16(*rgb), slot as u8);
        }
    }

    #[test]
    fn test_nearest_ansi16_approximate() {
        // A dark red lands on maroon
        assert_eq!(nearest_ansi16(Rgb(0x90, 0x10, 0x10)), 1);
        // Orange is closer to yellow-ish or red than to blue
        let orange = nearest_ansi16(Rgb(0xff, 0xa5, 0x00));
        assert!(orange == 3 || orange == 9 || orange == 11);
    }

    #[test]
    fn test_hex_round_trip_text() {
        assert_eq!(Rgb(255, 107, 53).to_hex(), "#ff6b35");
        assert_eq!(Rgb::from_hex("FF6B35"), Some(Rgb(255, 107, 53)));
    }
}
