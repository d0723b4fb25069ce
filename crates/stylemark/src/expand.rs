//! Two-pass tag expansion.
//!
//! **Pass 1** replaces every semantic reference with the registry value.
//! Unknown references vanish. A registry value that itself names another
//! tag is expanded in place, up to [`MAX_EXPANSION_PASSES`] levels deep;
//! references past that depth are dropped. Literal text is never scanned a
//! second time, so removing a tag cannot join the text around it into a new
//! one.
//!
//! **Pass 2** turns each direct style into an escape sequence for the target
//! profile.
//!
//! Both passes are pure functions of the text, the registry contents and the
//! profile.

use once_cell::sync::Lazy;
use regex::Regex;
use stylemark_tags::{Delimiters, Token, Tokenizer};

use crate::profile::ColorProfile;
use crate::registry::TagRegistry;
use crate::style::{parse_style_code, ColorSpec, StyleTriple, RESET};

/// Upper bound on nested semantic substitution.
pub const MAX_EXPANSION_PASSES: usize = 5;

/// One piece of expanded markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'t> {
    /// Literal text from the input.
    Text(&'t str),
    /// A direct style code, without delimiters.
    Direct(String),
}

/// Full resets inside captured text.
static EMBEDDED_RESET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[0?m").expect("valid reset pattern"));

/// Expands markup against a registry with a given delimiter set.
#[derive(Debug, Clone, Copy)]
pub struct Expander<'a> {
    registry: &'a TagRegistry,
    delimiters: &'a Delimiters,
}

impl<'a> Expander<'a> {
    pub fn new(registry: &'a TagRegistry, delimiters: &'a Delimiters) -> Self {
        Self {
            registry,
            delimiters,
        }
    }

    pub fn delimiters(&self) -> &'a Delimiters {
        self.delimiters
    }

    pub fn registry(&self) -> &'a TagRegistry {
        self.registry
    }

    /// A registry value written as direct tags in this expander's syntax.
    ///
    /// Bare codes are wrapped; canonical tag strings are re-emitted tag by
    /// tag. Returns `None` for unknown names.
    pub fn lookup_tagged(&self, name: &str) -> Option<String> {
        let value = self.registry.lookup(name)?;
        Some(self.retag(&value))
    }

    fn retag(&self, value: &str) -> String {
        let canonical = Delimiters::default();
        if !canonical.has_tags(value) {
            let code = value.trim();
            if Tokenizer::is_valid_direct_code(code) {
                return self.delimiters.wrap_direct(code);
            }
            log::debug!("ignoring registry value {:?}", value);
            return String::new();
        }

        let mut out = String::new();
        for token in Tokenizer::new(value, &canonical) {
            match token {
                Token::Direct(code) => out.push_str(&self.delimiters.wrap_direct(code)),
                Token::Semantic(name) => out.push_str(&self.delimiters.wrap_semantic(name)),
                // Registry values carry styles only
                Token::Text(_) => {}
            }
        }
        out
    }

    /// Pass 1 as segments: literal text and direct style codes.
    pub fn segments<'t>(&self, text: &'t str) -> Vec<Segment<'t>>
    where
        'a: 't,
    {
        let mut out = Vec::new();
        for token in Tokenizer::new(text, self.delimiters) {
            match token {
                Token::Text(t) => out.push(Segment::Text(t)),
                Token::Direct(code) => out.push(Segment::Direct(code.to_string())),
                Token::Semantic(name) => self.substitute(name, 1, &mut out),
            }
        }
        out
    }

    /// Appends the direct codes of a registry entry, expanding nested
    /// references until `depth` passes the limit.
    fn substitute(&self, name: &str, depth: usize, out: &mut Vec<Segment<'_>>) {
        let Some(value) = self.registry.lookup(name) else {
            log::trace!("unknown semantic tag {:?}", name);
            return;
        };
        let canonical = Delimiters::default();
        if !canonical.has_tags(&value) {
            let code = value.trim();
            if Tokenizer::is_valid_direct_code(code) {
                out.push(Segment::Direct(code.to_string()));
            } else {
                log::debug!("ignoring registry value {:?}", value);
            }
            return;
        }
        for token in Tokenizer::new(&value, &canonical) {
            match token {
                Token::Direct(code) => out.push(Segment::Direct(code.to_string())),
                Token::Semantic(inner) if depth < MAX_EXPANSION_PASSES => {
                    self.substitute(inner, depth + 1, out)
                }
                Token::Semantic(inner) => {
                    log::trace!("dropping nested tag {:?} past depth {}", inner, depth)
                }
                // Registry values carry styles only
                Token::Text(_) => {}
            }
        }
    }

    /// Pass 1: replaces semantic references with direct tags.
    pub fn expand(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for segment in self.segments(text) {
            match segment {
                Segment::Text(t) => out.push_str(t),
                Segment::Direct(code) => out.push_str(&self.delimiters.wrap_direct(&code)),
            }
        }
        out
    }

    /// Both passes: expands references and renders every style.
    ///
    /// With a `base` style, `-` restores the base instead of the terminal
    /// default, and so does a channel reset for the channels the base sets.
    pub fn render(&self, text: &str, profile: ColorProfile, base: Option<&StyleTriple>) -> String {
        self.render_segments(&self.segments(text), profile, base)
    }

    /// Pass 2: converts direct tags to escape sequences.
    ///
    /// Semantic references left in `text` are dropped.
    pub fn render_direct(
        &self,
        text: &str,
        profile: ColorProfile,
        base: Option<&StyleTriple>,
    ) -> String {
        let segments: Vec<Segment<'_>> = Tokenizer::new(text, self.delimiters)
            .filter_map(|token| match token {
                Token::Text(t) => Some(Segment::Text(t)),
                Token::Direct(code) => Some(Segment::Direct(code.to_string())),
                Token::Semantic(_) => None,
            })
            .collect();
        self.render_segments(&segments, profile, base)
    }

    fn render_segments(
        &self,
        segments: &[Segment<'_>],
        profile: ColorProfile,
        base: Option<&StyleTriple>,
    ) -> String {
        let base_ansi = base.map(|b| b.to_ansi(profile)).unwrap_or_default();
        let mut out = String::new();
        for segment in segments {
            match segment {
                Segment::Text(t) if base_ansi.is_empty() => out.push_str(t),
                Segment::Text(t) => {
                    let restored = format!("{}{}", RESET, base_ansi);
                    out.push_str(&EMBEDDED_RESET.replace_all(t, restored.as_str()));
                }
                Segment::Direct(code) => {
                    let style = parse_style_code(code);
                    match base {
                        Some(_) if style.is_reset() => {
                            out.push_str(RESET);
                            out.push_str(&base_ansi);
                        }
                        Some(base) => out.push_str(&with_baseline(style, base).to_ansi(profile)),
                        None => out.push_str(&style.to_ansi(profile)),
                    }
                }
            }
        }
        out
    }

    /// Removes both tag families.
    pub fn strip_tags(&self, text: &str) -> String {
        stylemark_tags::strip_tags(text, self.delimiters)
    }
}

/// Replaces channel resets with the base channel, when the base sets one.
fn with_baseline(mut style: StyleTriple, base: &StyleTriple) -> StyleTriple {
    if style.fg == Some(ColorSpec::Default) && base.fg.is_some() {
        style.fg = base.fg.clone();
    }
    if style.bg == Some(ColorSpec::Default) && base.bg.is_some() {
        style.bg = base.bg.clone();
    }
    style
}
