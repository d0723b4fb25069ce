//! Tokenizer for delimited style tags.
//!
//! Markup text carries two tag families, each wrapped in its own pair of
//! delimiters:
//!
//! - **Semantic references** name an entry in a tag registry:
//!   `{{_Error_}}`, `{{_Theme_Title_}}`.
//! - **Direct style tags** carry a literal `fg:bg:flags` code:
//!   `{{|red:blue:B|}}`, `{{|-|}}`.
//!
//! This crate only splits text into tokens. It knows nothing about colors,
//! registries or escape sequences; those live in the `stylemark` crate.
//!
//! # Example
//!
//! ```rust
//! use stylemark_tags::{Delimiters, Token, Tokenizer};
//!
//! let delimiters = Delimiters::default();
//! let tokens: Vec<_> = Tokenizer::new("{{_Error_}}failed{{|-|}}", &delimiters).collect();
//! assert_eq!(
//!     tokens,
//!     vec![
//!         Token::Semantic("Error"),
//!         Token::Text("failed"),
//!         Token::Direct("-"),
//!     ]
//! );
//! ```
//!
//! # Payload Syntax
//!
//! A semantic payload matches `[A-Za-z0-9_]+`. A direct payload matches
//! `[A-Za-z0-9_:#;-]+`. A delimiter pair whose payload does not match is not
//! a tag: the prefix is kept as literal text and scanning resumes after it.

/// Default prefix for semantic references.
pub const DEFAULT_SEMANTIC_PREFIX: &str = "{{_";
/// Default suffix for semantic references.
pub const DEFAULT_SEMANTIC_SUFFIX: &str = "_}}";
/// Default prefix for direct style tags.
pub const DEFAULT_DIRECT_PREFIX: &str = "{{|";
/// Default suffix for direct style tags.
pub const DEFAULT_DIRECT_SUFFIX: &str = "|}}";

/// The prefix/suffix strings for both tag families.
///
/// Delimiters are a plain value handed to every component that reads markup.
/// A theme file may carry its own pair; that choice applies to that file only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Delimiters {
    pub semantic_prefix: String,
    pub semantic_suffix: String,
    pub direct_prefix: String,
    pub direct_suffix: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            semantic_prefix: DEFAULT_SEMANTIC_PREFIX.to_string(),
            semantic_suffix: DEFAULT_SEMANTIC_SUFFIX.to_string(),
            direct_prefix: DEFAULT_DIRECT_PREFIX.to_string(),
            direct_suffix: DEFAULT_DIRECT_SUFFIX.to_string(),
        }
    }
}

impl Delimiters {
    /// Creates a delimiter set from the four strings.
    pub fn new(
        semantic_prefix: impl Into<String>,
        semantic_suffix: impl Into<String>,
        direct_prefix: impl Into<String>,
        direct_suffix: impl Into<String>,
    ) -> Self {
        Self {
            semantic_prefix: semantic_prefix.into(),
            semantic_suffix: semantic_suffix.into(),
            direct_prefix: direct_prefix.into(),
            direct_suffix: direct_suffix.into(),
        }
    }

    /// Wraps a name as a semantic reference.
    pub fn wrap_semantic(&self, name: &str) -> String {
        format!("{}{}{}", self.semantic_prefix, name, self.semantic_suffix)
    }

    /// Wraps a style code as a direct tag.
    pub fn wrap_direct(&self, code: &str) -> String {
        format!("{}{}{}", self.direct_prefix, code, self.direct_suffix)
    }

    /// Removes one level of direct-tag delimiters, if the value carries them.
    ///
    /// ```rust
    /// use stylemark_tags::Delimiters;
    ///
    /// let d = Delimiters::default();
    /// assert_eq!(d.strip_direct("{{|red::B|}}"), "red::B");
    /// assert_eq!(d.strip_direct("red::B"), "red::B");
    /// ```
    pub fn strip_direct<'a>(&self, raw: &'a str) -> &'a str {
        let trimmed = raw.trim();
        if self.direct_prefix.is_empty() || self.direct_suffix.is_empty() {
            return trimmed;
        }
        trimmed
            .strip_prefix(self.direct_prefix.as_str())
            .and_then(|rest| rest.strip_suffix(self.direct_suffix.as_str()))
            .unwrap_or(trimmed)
    }

    /// Returns true when `text` contains the opening delimiter of either family.
    pub fn has_tags(&self, text: &str) -> bool {
        (!self.semantic_prefix.is_empty() && text.contains(self.semantic_prefix.as_str()))
            || (!self.direct_prefix.is_empty() && text.contains(self.direct_prefix.as_str()))
    }
}

/// Token types produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Plain text content.
    Text(&'a str),
    /// Semantic reference payload (the name without delimiters).
    Semantic(&'a str),
    /// Direct style tag payload (the code without delimiters).
    Direct(&'a str),
}

impl Token<'_> {
    /// Writes the token back in source form.
    pub fn write_source(&self, out: &mut String, delimiters: &Delimiters) {
        match self {
            Token::Text(text) => out.push_str(text),
            Token::Semantic(name) => {
                out.push_str(&delimiters.semantic_prefix);
                out.push_str(name);
                out.push_str(&delimiters.semantic_suffix);
            }
            Token::Direct(code) => {
                out.push_str(&delimiters.direct_prefix);
                out.push_str(code);
                out.push_str(&delimiters.direct_suffix);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Semantic,
    Direct,
}

/// Splits markup text into [`Token`]s.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    delimiters: &'a Delimiters,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str, delimiters: &'a Delimiters) -> Self {
        Self {
            input,
            delimiters,
            pos: 0,
        }
    }

    /// Checks if a string is a valid semantic reference name.
    pub fn is_valid_semantic_name(s: &str) -> bool {
        !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    /// Checks if a string is a valid direct style code payload.
    pub fn is_valid_direct_code(s: &str) -> bool {
        !s.is_empty()
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-' | '#' | ';'))
    }

    /// Delimiter pairs to try at one position, longest prefix first so that a
    /// prefix which extends the other is not shadowed by it.
    fn candidates(&self) -> [(TagKind, &'a str, &'a str); 2] {
        let d = self.delimiters;
        let semantic = (
            TagKind::Semantic,
            d.semantic_prefix.as_str(),
            d.semantic_suffix.as_str(),
        );
        let direct = (
            TagKind::Direct,
            d.direct_prefix.as_str(),
            d.direct_suffix.as_str(),
        );
        if d.direct_prefix.len() > d.semantic_prefix.len() {
            [direct, semantic]
        } else {
            [semantic, direct]
        }
    }

    /// Earliest offset in `haystack` where either opening delimiter starts.
    fn next_opening(&self, haystack: &str) -> Option<usize> {
        self.candidates()
            .iter()
            .filter(|(_, prefix, _)| !prefix.is_empty())
            .filter_map(|(_, prefix, _)| haystack.find(prefix))
            .min()
    }

    /// Tries to read a complete tag starting exactly at the start of `rest`.
    ///
    /// Returns the token and the number of bytes it spans.
    fn read_tag(&self, rest: &'a str) -> Option<(Token<'a>, usize)> {
        for (kind, prefix, suffix) in self.candidates() {
            if prefix.is_empty() || suffix.is_empty() || !rest.starts_with(prefix) {
                continue;
            }
            let body = &rest[prefix.len()..];
            let Some(end) = body.find(suffix) else {
                continue;
            };
            let payload = &body[..end];
            let span = prefix.len() + end + suffix.len();
            match kind {
                TagKind::Semantic if Self::is_valid_semantic_name(payload) => {
                    return Some((Token::Semantic(payload), span));
                }
                TagKind::Direct if Self::is_valid_direct_code(payload) => {
                    return Some((Token::Direct(payload), span));
                }
                _ => {}
            }
        }
        None
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.input.len() {
            return None;
        }

        let remaining = &self.input[self.pos..];
        let mut search = 0;

        while let Some(offset) = self.next_opening(&remaining[search..]) {
            let at = search + offset;
            if let Some((token, span)) = self.read_tag(&remaining[at..]) {
                if at > 0 {
                    // Text before the tag; the tag is read again on the next call
                    self.pos += at;
                    return Some(Token::Text(&remaining[..at]));
                }
                self.pos += span;
                return Some(token);
            }
            // Not a tag here: keep the opening as literal text
            let step = remaining[at..].chars().next().map_or(1, char::len_utf8);
            search = at + step;
        }

        self.pos = self.input.len();
        Some(Token::Text(remaining))
    }
}

/// Collects all tokens of `input`.
pub fn tokenize<'a>(input: &'a str, delimiters: &'a Delimiters) -> Vec<Token<'a>> {
    Tokenizer::new(input, delimiters).collect()
}

/// Removes both tag families, keeping only text.
///
/// ```rust
/// use stylemark_tags::{strip_tags, Delimiters};
///
/// let d = Delimiters::default();
/// assert_eq!(strip_tags("{{|red|}}Hi{{_nc_}}", &d), "Hi");
/// ```
pub fn strip_tags(input: &str, delimiters: &Delimiters) -> String {
    let mut output = String::with_capacity(input.len());
    for token in Tokenizer::new(input, delimiters) {
        if let Token::Text(text) = token {
            output.push_str(text);
        }
    }
    output
}
