//! Recursive theme value resolution.
//!
//! A theme table maps keys to raw expressions made of tags:
//!
//! ```yaml
//! Base:   "{{|white:black:B|}}"
//! Title:  "{{_Theme_Base_}}{{|yellow|}}"
//! Banner: "{{_Theme_Title_}}{{|:blue:U|}}"
//! ```
//!
//! Tags compose left to right onto an accumulator. A direct fragment
//! overwrites the foreground or background it names and appends its flags.
//! A reference resolves its target first and merges the result the same way.
//! `Theme_<Key>` refers to `<Key>` in the same table; any other name, and a
//! `Theme_` key the table lacks, falls back to the tag registry.
//!
//! `Banner` above resolves to `yellow:blue:BU`.
//!
//! # Cycles
//!
//! Each top-level resolution keeps the set of keys being visited. A
//! reference to a key already in that set contributes nothing, and the rest
//! of the expression composes as usual.
//!
//! Every key is composed at most once per top-level resolution, and keys
//! whose subtree never meets a cycle are composed once per resolver, so a
//! table of `n` keys costs `O(n)` compositions per key however the
//! references fan out.

use std::collections::{BTreeMap, HashMap, HashSet};

use stylemark_tags::{Delimiters, Token, Tokenizer};

use crate::expand::MAX_EXPANSION_PASSES;
use crate::registry::{normalize_name, prefix_tag, TagRegistry};
use crate::style::{parse_style_code, StyleTriple};

/// Implicit prefix for references into the table being resolved.
pub const THEME_PREFIX: &str = "Theme_";

/// Accumulated `fg:bg:flags` fields.
///
/// Fields stay textual so flag letters keep their order; the net effect is
/// decided when the code is finally parsed. Only the last occurrence of each
/// flag letter is kept, which leaves that net effect unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composition {
    pub fg: String,
    pub bg: String,
    pub flags: String,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composes a sequence of codes, left to right.
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut composition = Self::new();
        for code in codes {
            composition.overlay_code(code.as_ref());
        }
        composition
    }

    /// Overlays one direct code.
    ///
    /// `-` resets every field to `-`. A flags segment starting with `-`
    /// replaces the accumulated flags; any other flags segment is appended.
    /// Either way earlier occurrences of a repeated letter are dropped.
    pub fn overlay_code(&mut self, code: &str) {
        let code = code.trim();
        if code == "-" {
            self.fg = "-".to_string();
            self.bg = "-".to_string();
            self.flags = "-".to_string();
            return;
        }

        let mut segments = code.split(':');
        let fg = segments.next().unwrap_or("").trim();
        let bg = segments.next().unwrap_or("").trim();
        let flags = segments.next().unwrap_or("").trim();

        if !fg.is_empty() {
            self.fg = fg.to_string();
        }
        if !bg.is_empty() {
            self.bg = bg.to_string();
        }
        if flags.starts_with('-') {
            self.flags = compact_flags(flags);
        } else if !flags.is_empty() {
            self.flags.push_str(flags);
            self.flags = compact_flags(&self.flags);
        }
    }

    /// Merges a resolved composition onto this one.
    pub fn merge(&mut self, other: &Composition) {
        self.overlay_code(&other.to_code());
    }

    pub fn is_empty(&self) -> bool {
        self.fg.is_empty() && self.bg.is_empty() && self.flags.is_empty()
    }

    /// The canonical, delimiter-free `fg:bg:flags` string.
    pub fn to_code(&self) -> String {
        format!("{}:{}:{}", self.fg, self.bg, self.flags)
    }

    pub fn to_style(&self) -> StyleTriple {
        parse_style_code(&self.to_code())
    }
}

/// Keeps the last occurrence of each flag letter, case-insensitively.
///
/// A leading `-` (clear everything first) is preserved.
fn compact_flags(flags: &str) -> String {
    let (clear, letters) = match flags.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", flags),
    };
    let mut kept: Vec<char> = Vec::with_capacity(letters.len());
    for letter in letters.chars() {
        kept.retain(|c| !c.eq_ignore_ascii_case(&letter));
        kept.push(letter);
    }
    let mut out = String::with_capacity(clear.len() + kept.len());
    out.push_str(clear);
    out.extend(kept);
    out
}

/// Outcome of resolving one reference.
enum Reference {
    /// The composition, and whether a cycle cut it short.
    Resolved(Composition, bool),
    /// The reference closed a cycle; nothing is contributed.
    Cycle,
    Missing,
}

/// Resolves the keys of one theme table.
///
/// Results that never met a cycle do not depend on where resolution
/// started and are kept for the resolver's lifetime. Results cut by a cycle
/// are kept only for the top-level resolution that produced them.
pub struct ThemeResolver<'a> {
    table: HashMap<String, String>,
    delimiters: &'a Delimiters,
    registry: &'a TagRegistry,
    namespace: Option<&'a str>,
    settled: HashMap<String, Composition>,
}

/// State of one top-level resolution.
#[derive(Debug, Default)]
struct Walk {
    /// Keys in progress; a reference back to one contributes nothing.
    visiting: HashSet<String>,
    /// Keys finished in this walk whose result a cycle cut short.
    finished: HashMap<String, Composition>,
}

/// Table key for a theme key or `Theme_` reference: normalized, without
/// the implicit prefix.
fn table_key(name: &str) -> String {
    let key = normalize_name(name);
    let prefix = THEME_PREFIX.to_lowercase();
    match key.strip_prefix(&prefix) {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => key,
    }
}

impl<'a> ThemeResolver<'a> {
    pub fn new<I, K, V>(
        table: I,
        delimiters: &'a Delimiters,
        registry: &'a TagRegistry,
        namespace: Option<&'a str>,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let table = table
            .into_iter()
            .map(|(k, v)| (table_key(k.as_ref()), v.as_ref().to_string()))
            .collect();
        Self {
            table,
            delimiters,
            registry,
            namespace,
            settled: HashMap::new(),
        }
    }

    /// Resolves one key of the table, or `None` if the table lacks it.
    pub fn resolve_key(&mut self, key: &str) -> Option<Composition> {
        let key = table_key(key);
        let raw = self.table.get(&key)?.clone();
        let mut walk = Walk::default();
        Some(self.resolve_entry(&key, &raw, &mut walk).0)
    }

    /// Resolves a raw expression that is not itself a table entry.
    pub fn resolve_value(&mut self, raw: &str) -> Composition {
        let mut walk = Walk::default();
        self.compose(raw, &mut walk).0
    }

    /// Returns the composition and whether a cycle cut it short.
    fn resolve_entry(&mut self, key: &str, raw: &str, walk: &mut Walk) -> (Composition, bool) {
        if let Some(done) = self.settled.get(key) {
            return (done.clone(), false);
        }
        if let Some(done) = walk.finished.get(key) {
            return (done.clone(), true);
        }
        walk.visiting.insert(key.to_string());
        let (composition, cut) = self.compose(raw, walk);
        walk.visiting.remove(key);
        if cut {
            walk.finished.insert(key.to_string(), composition.clone());
        } else {
            self.settled.insert(key.to_string(), composition.clone());
        }
        (composition, cut)
    }

    fn compose(&mut self, raw: &str, walk: &mut Walk) -> (Composition, bool) {
        let mut acc = Composition::new();
        let mut cut = false;

        if !self.delimiters.has_tags(raw) {
            // A bare code is a single direct fragment
            let code = raw.trim();
            if Tokenizer::is_valid_direct_code(code) {
                acc.overlay_code(code);
            }
            return (acc, cut);
        }

        let tokens: Vec<Token<'_>> = Tokenizer::new(raw, self.delimiters).collect();
        for token in tokens {
            match token {
                Token::Direct(code) => acc.overlay_code(code),
                Token::Semantic(name) => match self.resolve_reference(name, walk) {
                    Reference::Resolved(found, branch_cut) => {
                        acc.merge(&found);
                        cut |= branch_cut;
                    }
                    Reference::Cycle => cut = true,
                    Reference::Missing => {
                        log::debug!("theme reference {:?} not found", name);
                    }
                },
                Token::Text(_) => {}
            }
        }
        (acc, cut)
    }

    fn resolve_reference(&mut self, name: &str, walk: &mut Walk) -> Reference {
        let is_theme_ref = normalize_name(name).starts_with(&THEME_PREFIX.to_lowercase());
        if is_theme_ref {
            let key = table_key(name);
            if walk.visiting.contains(&key) {
                log::debug!("cycle detected at theme key {:?}", key);
                return Reference::Cycle;
            }
            if let Some(raw) = self.table.get(&key).cloned() {
                let (found, cut) = self.resolve_entry(&key, &raw, walk);
                return Reference::Resolved(found, cut);
            }
        }

        let namespaced = prefix_tag(self.namespace, name);
        let candidates = if namespaced == name {
            vec![name.to_string()]
        } else {
            vec![namespaced, name.to_string()]
        };
        for candidate in candidates {
            if let Some(value) = self.registry.lookup(&candidate) {
                let found = registry_composition(self.registry, &value, 0);
                return Reference::Resolved(found, false);
            }
        }
        Reference::Missing
    }
}

/// Composes a registry value (bare code or canonical tag string).
fn registry_composition(registry: &TagRegistry, value: &str, depth: usize) -> Composition {
    let canonical = Delimiters::default();
    let mut acc = Composition::new();
    if !canonical.has_tags(value) {
        let code = value.trim();
        if Tokenizer::is_valid_direct_code(code) {
            acc.overlay_code(code);
        }
        return acc;
    }
    for token in Tokenizer::new(value, &canonical) {
        match token {
            Token::Direct(code) => acc.overlay_code(code),
            Token::Semantic(name) if depth < MAX_EXPANSION_PASSES => {
                if let Some(inner) = registry.lookup(name) {
                    acc.merge(&registry_composition(registry, &inner, depth + 1));
                }
            }
            _ => {}
        }
    }
    acc
}

/// Resolves a whole theme table into canonical codes, keyed by the table's
/// own key names (without the `Theme_` prefix), sorted.
pub fn resolve_theme_table<I, K, V>(
    table: I,
    delimiters: &Delimiters,
    registry: &TagRegistry,
    namespace: Option<&str>,
) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    // Keep the caller's spelling for registration
    let entries: Vec<(String, String)> = table
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
        .collect();
    let mut resolver = ThemeResolver::new(
        entries.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        delimiters,
        registry,
        namespace,
    );
    entries
        .iter()
        .filter_map(|(key, _)| {
            let composition = resolver.resolve_key(key)?;
            let name = strip_theme_prefix(key);
            Some((name.to_string(), composition.to_code()))
        })
        .collect()
}

fn strip_theme_prefix(key: &str) -> &str {
    let trimmed = key.trim();
    match trimmed.get(..THEME_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(THEME_PREFIX) && trimmed.len() > head.len() => {
            &trimmed[head.len()..]
        }
        _ => trimmed,
    }
}

/// A theme table registered into a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedTheme {
    pub namespace: Option<String>,
    /// Registered names and their canonical codes.
    pub entries: Vec<(String, String)>,
}

impl LoadedTheme {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The code registered for a table key.
    pub fn code(&self, key: &str) -> Option<&str> {
        let wanted = normalize_name(&prefix_tag(
            self.namespace.as_deref(),
            &format!("{}{}", THEME_PREFIX, strip_theme_prefix(key)),
        ));
        self.entries
            .iter()
            .find(|(name, _)| normalize_name(name) == wanted)
            .map(|(_, code)| code.as_str())
    }
}

/// Resolves a theme table and registers every key as
/// `[<namespace>_]Theme_<Key>` in a single batch.
///
/// With a namespace, previous entries of that namespace are replaced in the
/// same batch, so re-applying a preview never leaves stale keys behind.
pub fn load_theme_table<I, K, V>(
    registry: &TagRegistry,
    table: I,
    delimiters: &Delimiters,
    namespace: Option<&str>,
) -> LoadedTheme
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let resolved = resolve_theme_table(table, delimiters, registry, namespace);
    let entries: Vec<(String, String)> = resolved
        .into_iter()
        .map(|(key, code)| {
            let name = prefix_tag(namespace, &format!("{}{}", THEME_PREFIX, key));
            (name, code)
        })
        .collect();

    let written = match namespace {
        Some(ns) => registry.replace_prefix(ns, entries.iter().map(|(k, v)| (k, v))),
        None => registry.register_batch(entries.iter().map(|(k, v)| (k, v))),
    };
    log::debug!(
        "registered {} theme entries (namespace {:?})",
        written,
        namespace
    );

    LoadedTheme {
        namespace: namespace.map(str::to_string),
        entries,
    }
}

/// Removes every entry registered under a preview namespace.
pub fn unload_preview(registry: &TagRegistry, namespace: &str) -> usize {
    registry.unregister_prefix(namespace)
}
