//! Color capability detection.
//!
//! [`detect_profile`] is a pure function of the two hint variables, in this
//! priority order:
//!
//! 1. `COLORTERM` explicit values (`truecolor`, `24bit`, `256color`, `16color`, `mono`, ...)
//! 2. Substrings of `TERM` (`direct`, `256color`, `16color`) and `TERM=dumb`
//! 3. An automatic fallback on the terminal family named by `TERM`
//!
//! [`detect_profile_from`] layers `NO_COLOR` on top and reads through an
//! [`EnvReader`] so tests never depend on the real environment.

use std::fmt;

use crate::env::EnvReader;

/// Color capability tier, ordered from poorest to richest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorProfile {
    /// No color or attribute escapes at all.
    Ascii,
    /// The 16 system colors (SGR 30-37, 90-97).
    Ansi16,
    /// The xterm 256-color palette (SGR 38;5;n).
    Ansi256,
    /// 24-bit color (SGR 38;2;r;g;b).
    TrueColor,
}

impl ColorProfile {
    /// Returns true for every tier that emits escape sequences.
    pub fn supports_color(self) -> bool {
        self != ColorProfile::Ascii
    }

    /// Parses a profile name as accepted on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "truecolor" | "24bit" | "rgb" => Some(ColorProfile::TrueColor),
            "256" | "256color" | "ansi256" | "8bit" => Some(ColorProfile::Ansi256),
            "16" | "16color" | "ansi" | "ansi16" | "4bit" => Some(ColorProfile::Ansi16),
            "ascii" | "mono" | "none" | "plain" => Some(ColorProfile::Ascii),
            _ => None,
        }
    }
}

impl fmt::Display for ColorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorProfile::Ascii => "ascii",
            ColorProfile::Ansi16 => "ansi16",
            ColorProfile::Ansi256 => "ansi256",
            ColorProfile::TrueColor => "truecolor",
        };
        f.write_str(name)
    }
}

/// Terminals known to render 24-bit color even without `COLORTERM`.
const TRUECOLOR_TERMS: &[&str] = &["kitty", "wezterm", "alacritty", "ghostty", "foot"];

/// Terminal families that at least handle the 16 system colors.
const ANSI_TERM_PREFIXES: &[&str] = &["xterm", "screen", "tmux", "rxvt", "vt100", "cygwin"];

/// Determines the color profile from `COLORTERM` and `TERM` values.
///
/// ```rust
/// use stylemark::{detect_profile, ColorProfile};
///
/// assert_eq!(detect_profile(Some("truecolor"), Some("xterm")), ColorProfile::TrueColor);
/// assert_eq!(detect_profile(None, Some("xterm-256color")), ColorProfile::Ansi256);
/// assert_eq!(detect_profile(Some("mono"), Some("xterm-direct")), ColorProfile::Ascii);
/// assert_eq!(detect_profile(None, Some("dumb")), ColorProfile::Ascii);
/// ```
pub fn detect_profile(colorterm: Option<&str>, term: Option<&str>) -> ColorProfile {
    if let Some(profile) = colorterm.and_then(profile_from_colorterm) {
        return profile;
    }

    let term = term.map(|t| t.trim().to_ascii_lowercase()).unwrap_or_default();
    if let Some(profile) = profile_from_term(&term) {
        return profile;
    }

    automatic_fallback(&term)
}

fn profile_from_colorterm(value: &str) -> Option<ColorProfile> {
    match value.trim().to_ascii_lowercase().as_str() {
        "truecolor" | "24bit" => Some(ColorProfile::TrueColor),
        "8bit" | "256color" => Some(ColorProfile::Ansi256),
        "4bit" | "16color" | "8color" | "3bit" => Some(ColorProfile::Ansi16),
        "1bit" | "2color" | "mono" | "false" | "0" => Some(ColorProfile::Ascii),
        _ => None,
    }
}

fn profile_from_term(term: &str) -> Option<ColorProfile> {
    if term.contains("direct") {
        return Some(ColorProfile::TrueColor);
    }
    if term.contains("256color") {
        return Some(ColorProfile::Ansi256);
    }
    if term.contains("16color") {
        return Some(ColorProfile::Ansi16);
    }
    if term == "dumb" {
        return Some(ColorProfile::Ascii);
    }
    None
}

fn automatic_fallback(term: &str) -> ColorProfile {
    if term.is_empty() {
        return ColorProfile::Ascii;
    }
    if TRUECOLOR_TERMS.iter().any(|t| term.contains(t)) {
        return ColorProfile::TrueColor;
    }
    if term == "linux"
        || term.contains("color")
        || term.contains("ansi")
        || ANSI_TERM_PREFIXES.iter().any(|p| term.starts_with(p))
    {
        return ColorProfile::Ansi16;
    }
    ColorProfile::Ascii
}

/// Detects the profile from an environment source.
///
/// A non-empty `NO_COLOR` forces [`ColorProfile::Ascii`].
pub fn detect_profile_from(env: &dyn EnvReader) -> ColorProfile {
    if env.var("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        log::debug!("NO_COLOR set, using ascii profile");
        return ColorProfile::Ascii;
    }
    let colorterm = env.var("COLORTERM");
    let term = env.var("TERM");
    let profile = detect_profile(colorterm.as_deref(), term.as_deref());
    log::debug!(
        "detected color profile {} (COLORTERM={:?}, TERM={:?})",
        profile,
        colorterm,
        term
    );
    profile
}

/// Whether output should be treated as going to a capable terminal.
///
/// `CLICOLOR_FORCE` (non-empty, not `0`) forces true; otherwise stdout must
/// be a TTY.
pub fn is_color_terminal(env: &dyn EnvReader) -> bool {
    if env
        .var("CLICOLOR_FORCE")
        .is_some_and(|v| !v.is_empty() && v != "0")
    {
        return true;
    }
    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockEnv;

    mod colorterm {
        use super::*;

        #[test]
        fn explicit_values() {
            let cases = [
                ("truecolor", ColorProfile::TrueColor),
                ("24bit", ColorProfile::TrueColor),
                ("8bit", ColorProfile::Ansi256),
                ("256color", ColorProfile::Ansi256),
                ("4bit", ColorProfile::Ansi16),
                ("16color", ColorProfile::Ansi16),
                ("8color", ColorProfile::Ansi16),
                ("mono", ColorProfile::Ascii),
                ("false", ColorProfile::Ascii),
                ("0", ColorProfile::Ascii),
            ];
            for (value, expected) in cases {
                assert_eq!(detect_profile(Some(value), None), expected, "{}", value);
            }
        }

        #[test]
        fn beats_term() {
            assert_eq!(
                detect_profile(Some("16color"), Some("xterm-direct")),
                ColorProfile::Ansi16
            );
            assert_eq!(
                detect_profile(Some("truecolor"), Some("dumb")),
                ColorProfile::TrueColor
            );
        }

        #[test]
        fn case_insensitive() {
            assert_eq!(
                detect_profile(Some("TrueColor"), None),
                ColorProfile::TrueColor
            );
        }

        #[test]
        fn unknown_value_defers_to_term() {
            assert_eq!(
                detect_profile(Some("yes"), Some("xterm-256color")),
                ColorProfile::Ansi256
            );
        }
    }

    mod term {
        use super::*;

        #[test]
        fn substrings() {
            assert_eq!(
                detect_profile(None, Some("xterm-direct")),
                ColorProfile::TrueColor
            );
            assert_eq!(
                detect_profile(None, Some("screen-256color")),
                ColorProfile::Ansi256
            );
            assert_eq!(
                detect_profile(None, Some("rxvt-16color")),
                ColorProfile::Ansi16
            );
            assert_eq!(detect_profile(None, Some("dumb")), ColorProfile::Ascii);
        }

        #[test]
        fn fallback_families() {
            assert_eq!(
                detect_profile(None, Some("xterm-kitty")),
                ColorProfile::TrueColor
            );
            assert_eq!(detect_profile(None, Some("xterm")), ColorProfile::Ansi16);
            assert_eq!(detect_profile(None, Some("linux")), ColorProfile::Ansi16);
            assert_eq!(detect_profile(None, Some("tmux")), ColorProfile::Ansi16);
            assert_eq!(detect_profile(None, Some("unknown")), ColorProfile::Ascii);
            assert_eq!(detect_profile(None, None), ColorProfile::Ascii);
            assert_eq!(detect_profile(None, Some("")), ColorProfile::Ascii);
        }
    }

    mod env_source {
        use super::*;

        #[test]
        fn reads_mock_env() {
            let env = MockEnv::new()
                .with_var("TERM", "xterm-256color")
                .with_var("COLORTERM", "truecolor");
            assert_eq!(detect_profile_from(&env), ColorProfile::TrueColor);
        }

        #[test]
        fn no_color_forces_ascii() {
            let env = MockEnv::new()
                .with_var("COLORTERM", "truecolor")
                .with_var("NO_COLOR", "1");
            assert_eq!(detect_profile_from(&env), ColorProfile::Ascii);
        }

        #[test]
        fn empty_no_color_is_ignored() {
            let env = MockEnv::new()
                .with_var("COLORTERM", "truecolor")
                .with_var("NO_COLOR", "");
            assert_eq!(detect_profile_from(&env), ColorProfile::TrueColor);
        }

        #[test]
        fn clicolor_force_marks_terminal() {
            let env = MockEnv::new().with_var("CLICOLOR_FORCE", "1");
            assert!(is_color_terminal(&env));
        }
    }

    #[test]
    fn profiles_are_ordered() {
        assert!(ColorProfile::TrueColor > ColorProfile::Ansi256);
        assert!(ColorProfile::Ansi256 > ColorProfile::Ansi16);
        assert!(ColorProfile::Ansi16 > ColorProfile::Ascii);
        assert!(!ColorProfile::Ascii.supports_color());
    }

    #[test]
    fn from_name() {
        assert_eq!(
            ColorProfile::from_name("TrueColor"),
            Some(ColorProfile::TrueColor)
        );
        assert_eq!(ColorProfile::from_name("256"), Some(ColorProfile::Ansi256));
        assert_eq!(ColorProfile::from_name("none"), Some(ColorProfile::Ascii));
        assert_eq!(ColorProfile::from_name("bogus"), None);
    }
}
