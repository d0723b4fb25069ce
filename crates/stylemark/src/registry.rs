//! Semantic tag storage.
//!
//! The registry maps case-insensitive names to raw style values. A value is
//! either a bare style code (`red::B`) or a string of direct tags in the
//! canonical syntax (`{{|-|}}{{|red|}}`). The registry never interprets
//! values; expansion and rendering happen elsewhere.
//!
//! Names are normalized by trimming surrounding `_` and lowercasing, so
//! `Error`, `ERROR` and `_error_` are the same entry.
//!
//! # Namespaces
//!
//! A name prefix such as `Preview_` isolates a set of entries. Registering
//! `Preview_Theme_Title` never touches `Theme_Title`, and
//! [`TagRegistry::unregister_prefix`] removes the whole set at once.
//!
//! # Concurrency
//!
//! One read-write lock guards the map. Batch writes take the lock once for
//! the whole batch, so a reader sees either none or all of a theme load.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use stylemark_tags::{Delimiters, Tokenizer};

use crate::defaults::BUILTIN_TAGS;

/// Normalizes a tag name for storage and lookup.
pub fn normalize_name(name: &str) -> String {
    name.trim().trim_matches('_').to_lowercase()
}

/// Normalizes a namespace prefix to its `prefix_` key form.
fn normalize_prefix(prefix: &str) -> String {
    format!("{}_", normalize_name(prefix))
}

/// Prefixes `name` with a namespace, if any.
///
/// ```rust
/// use stylemark::prefix_tag;
///
/// assert_eq!(prefix_tag(Some("Preview"), "Theme_Title"), "Preview_Theme_Title");
/// assert_eq!(prefix_tag(Some("Preview_"), "Theme_Title"), "Preview_Theme_Title");
/// assert_eq!(prefix_tag(None, "Theme_Title"), "Theme_Title");
/// ```
pub fn prefix_tag(namespace: Option<&str>, name: &str) -> String {
    match namespace.map(|ns| ns.trim().trim_end_matches('_')) {
        Some(ns) if !ns.is_empty() => format!("{}_{}", ns, name),
        _ => name.to_string(),
    }
}

/// Stores a raw value, dropping one level of canonical direct delimiters
/// when the value is a single direct tag.
fn normalize_value(raw: &str) -> String {
    let canonical = Delimiters::default();
    let stripped = canonical.strip_direct(raw);
    if Tokenizer::is_valid_direct_code(stripped) {
        stripped.to_string()
    } else {
        raw.trim().to_string()
    }
}

/// The built-in table as raw registry values.
fn builtin_entries() -> Vec<(String, String)> {
    let canonical = Delimiters::default();
    BUILTIN_TAGS
        .iter()
        .map(|(name, codes)| {
            let value = match codes {
                [single] => (*single).to_string(),
                many => many.iter().map(|c| canonical.wrap_direct(c)).collect(),
            };
            ((*name).to_string(), value)
        })
        .collect()
}

/// Thread-safe mapping of semantic tag names to raw style values.
#[derive(Debug, Default)]
pub struct TagRegistry {
    tags: RwLock<HashMap<String, String>>,
    defaults: Vec<(String, String)>,
}

impl TagRegistry {
    /// Creates an empty registry with no defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry populated from the built-in table.
    pub fn with_defaults() -> Self {
        Self::with_entries(builtin_entries())
    }

    /// Creates a registry whose defaults are `entries`.
    ///
    /// [`reset_to_defaults`](Self::reset_to_defaults) restores exactly these.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let defaults: Vec<(String, String)> = entries
            .into_iter()
            .map(|(k, v)| (normalize_name(k.as_ref()), normalize_value(v.as_ref())))
            .collect();
        let map = defaults.iter().cloned().collect();
        Self {
            tags: RwLock::new(map),
            defaults,
        }
    }

    // A poisoned lock still guards a complete map.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.tags.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.tags.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers (or replaces) one semantic tag.
    pub fn register_semantic(&self, name: &str, raw: &str) {
        let key = normalize_name(name);
        if key.is_empty() {
            return;
        }
        self.write().insert(key, normalize_value(raw));
    }

    /// Registers many tags under a single write lock.
    ///
    /// Returns the number of entries written.
    pub fn register_batch<I, K, V>(&self, entries: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut tags = self.write();
        let mut count = 0;
        for (name, raw) in entries {
            let key = normalize_name(name.as_ref());
            if key.is_empty() {
                continue;
            }
            tags.insert(key, normalize_value(raw.as_ref()));
            count += 1;
        }
        count
    }

    /// Replaces every entry under `prefix` with `entries`, atomically.
    ///
    /// Entry names are used as given; callers prefix them.
    pub fn replace_prefix<I, K, V>(&self, prefix: &str, entries: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let search = normalize_prefix(prefix);
        let mut tags = self.write();
        if search != "_" {
            tags.retain(|key, _| !key.starts_with(&search));
        }
        let mut count = 0;
        for (name, raw) in entries {
            let key = normalize_name(name.as_ref());
            if key.is_empty() {
                continue;
            }
            tags.insert(key, normalize_value(raw.as_ref()));
            count += 1;
        }
        count
    }

    /// Looks up the raw value of a tag.
    pub fn lookup(&self, name: &str) -> Option<String> {
        self.read().get(&normalize_name(name)).cloned()
    }

    /// Returns true if a tag with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(&normalize_name(name))
    }

    /// Removes one tag, returning its value.
    pub fn unregister(&self, name: &str) -> Option<String> {
        self.write().remove(&normalize_name(name))
    }

    /// Removes every tag whose name starts with `prefix_`.
    ///
    /// Returns the number of tags removed.
    pub fn unregister_prefix(&self, prefix: &str) -> usize {
        let search = normalize_prefix(prefix);
        if search == "_" {
            return 0;
        }
        let mut tags = self.write();
        let before = tags.len();
        tags.retain(|key, _| !key.starts_with(&search));
        before - tags.len()
    }

    /// Drops every custom entry and restores the defaults.
    pub fn reset_to_defaults(&self) {
        let mut tags = self.write();
        tags.clear();
        tags.extend(self.defaults.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Sorted copy of all entries.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort();
        entries
    }
}
