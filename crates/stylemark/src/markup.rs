//! Conversion to bracket-style widget markup.
//!
//! Widget toolkits in the tview family read inline styles written as
//! `[fg:bg:attrs]`. Attribute letters are lowercase to enable and uppercase
//! to disable:
//!
//! | Flag | Letter |
//! |------|--------|
//! | bold | `b` |
//! | dim | `d` |
//! | underline | `u` |
//! | blink | `l` |
//! | reverse | `r` |
//! | strikethrough | `s` |
//! | italic | `i` |
//!
//! Colors from the 16-color palette are written with the toolkit's name for
//! their slot, so `red` (slot 1) becomes `maroon` and `bright-red` (slot 9)
//! becomes `red`, matching what the escape output distinguishes as 31 and
//! 91. Other named colors keep their canonical name; hex and palette indices
//! are written as hex.
//!
//! Literal bracket groups already in the text are escaped first, so user
//! content such as `[NOTICE]` or `[v2.0]` never reads as a style.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::color::ColorValue;
use crate::expand::{Expander, Segment};
use crate::style::{parse_style_code, ColorSpec, Flags, StyleTriple};

/// A bracket group the toolkit would read as a style or region tag.
static BRACKET_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r##"\[([a-zA-Z0-9_,;: \-\."#]+)\]"##).expect("valid bracket pattern"));

/// Toolkit names of the 16 palette slots.
const PALETTE_NAMES: [&str; 16] = [
    "black", "maroon", "green", "olive", "navy", "purple", "teal", "silver", "gray", "red", "lime",
    "yellow", "blue", "fuchsia", "aqua", "white",
];

/// Escapes literal bracket groups: `[abc]` becomes `[abc[]`.
pub fn escape_brackets(text: &str) -> String {
    BRACKET_GROUP.replace_all(text, "[$1[]").into_owned()
}

/// Expands semantic tags and rewrites direct tags as widget markup.
pub fn to_display_markup(expander: &Expander<'_>, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in expander.segments(text) {
        match segment {
            Segment::Text(t) => out.push_str(&escape_brackets(t)),
            Segment::Direct(code) => {
                if let Some(tag) = style_markup(&parse_style_code(&code)) {
                    out.push_str(&tag);
                }
            }
        }
    }
    out
}

/// The markup tag for one style, or `None` when it sets nothing.
pub fn style_markup(style: &StyleTriple) -> Option<String> {
    if style.is_reset() {
        return Some("[-:-:-]".to_string());
    }
    let fields = format!(
        "{}:{}:{}",
        channel_markup(style.fg.as_ref()),
        channel_markup(style.bg.as_ref()),
        attr_letters(&style.flags)
    );
    let fields = fields.trim_end_matches(':');
    if fields.is_empty() {
        None
    } else {
        Some(format!("[{}]", fields))
    }
}

fn channel_markup(spec: Option<&ColorSpec>) -> String {
    match spec {
        None => String::new(),
        Some(ColorSpec::Default) => "-".to_string(),
        Some(ColorSpec::Color(ColorValue::Named(named))) => named
            .slot
            .and_then(|slot| PALETTE_NAMES.get(usize::from(slot)))
            .map_or_else(|| named.name.clone(), |name| name.to_string()),
        Some(ColorSpec::Color(color)) => color.rgb().to_hex(),
    }
}

fn attr_letters(flags: &Flags) -> String {
    let table = [
        (flags.bold, 'b'),
        (flags.dim, 'd'),
        (flags.underline, 'u'),
        (flags.blink, 'l'),
        (flags.reverse, 'r'),
        (flags.strikethrough, 's'),
        (flags.italic, 'i'),
    ];
    table
        .iter()
        .filter_map(|(state, letter)| match state {
            Some(true) => Some(*letter),
            Some(false) => Some(letter.to_ascii_uppercase()),
            None => None,
        })
        .collect()
}
