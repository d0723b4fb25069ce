//! Theme files.
//!
//! A theme file is a YAML document:
//!
//! ```yaml
//! metadata:
//!   name: Harbor
//!   description: Cool blues
//!   author: someone
//!
//! # optional, each field falls back to the default delimiter
//! syntax:
//!   semantic_prefix: "{{_"
//!   semantic_suffix: "_}}"
//!   direct_prefix: "{{|"
//!   direct_suffix: "|}}"
//!
//! # kept for applications, ignored by the engine
//! defaults:
//!   menu_width: 40
//!
//! colors:
//!   Base: "{{|white:black|}}"
//!   Title: "{{_Theme_Base_}}{{|yellow::B|}}"
//! ```
//!
//! Loading registers every color key as `Theme_<Key>`. Only I/O and YAML
//! syntax fail; anything odd inside `colors` resolves to whatever survives.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use stylemark_tags::Delimiters;

use crate::error::ThemeError;
use crate::registry::TagRegistry;
use crate::resolve::{load_theme_table, resolve_theme_table, LoadedTheme};

/// Descriptive fields, never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
}

/// Per-file delimiter overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyntaxOverride {
    pub semantic_prefix: Option<String>,
    pub semantic_suffix: Option<String>,
    pub direct_prefix: Option<String>,
    pub direct_suffix: Option<String>,
}

impl SyntaxOverride {
    /// Applies the overrides on top of `base`. Empty strings are ignored.
    pub fn apply(&self, base: &Delimiters) -> Delimiters {
        let pick = |over: &Option<String>, fallback: &str| match over.as_deref() {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => fallback.to_string(),
        };
        Delimiters::new(
            pick(&self.semantic_prefix, &base.semantic_prefix),
            pick(&self.semantic_suffix, &base.semantic_suffix),
            pick(&self.direct_prefix, &base.direct_prefix),
            pick(&self.direct_suffix, &base.direct_suffix),
        )
    }
}

/// A parsed theme file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemeFile {
    pub metadata: ThemeMetadata,
    pub syntax: Option<SyntaxOverride>,
    pub defaults: Option<serde_yaml::Value>,
    #[serde(deserialize_with = "lenient_colors")]
    pub colors: BTreeMap<String, String>,
}

impl ThemeFile {
    pub fn from_yaml(yaml: &str) -> Result<Self, ThemeError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ThemeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ThemeError::io(path, e))?;
        let theme = Self::from_yaml(&content)?;
        log::debug!(
            "read theme {:?} with {} colors from {}",
            theme.metadata.name,
            theme.colors.len(),
            path.display()
        );
        Ok(theme)
    }

    /// The delimiters the `colors` values are written in.
    pub fn delimiters(&self) -> Delimiters {
        let base = Delimiters::default();
        match &self.syntax {
            Some(syntax) => syntax.apply(&base),
            None => base,
        }
    }

    /// Resolves `colors` without registering anything.
    pub fn resolve(
        &self,
        registry: &TagRegistry,
        namespace: Option<&str>,
    ) -> BTreeMap<String, String> {
        resolve_theme_table(&self.colors, &self.delimiters(), registry, namespace)
    }

    /// Resolves `colors` and registers them, optionally under a namespace.
    pub fn load_into(&self, registry: &TagRegistry, namespace: Option<&str>) -> LoadedTheme {
        load_theme_table(registry, &self.colors, &self.delimiters(), namespace)
    }
}

/// Keeps string values, stringifies scalars, skips anything else.
fn lenient_colors<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ColorsVisitor;

    impl<'de> Visitor<'de> for ColorsVisitor {
        type Value = BTreeMap<String, String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of color keys to style expressions")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(BTreeMap::new())
        }

        fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut colors = BTreeMap::new();
            while let Some((key, value)) =
                map.next_entry::<serde_yaml::Value, serde_yaml::Value>()?
            {
                let Some(key) = scalar_string(&key) else {
                    continue;
                };
                match scalar_string(&value) {
                    Some(value) => {
                        colors.insert(key, value);
                    }
                    None => log::debug!("skipping non-scalar theme color {:?}", key),
                }
            }
            Ok(colors)
        }
    }

    deserializer.deserialize_any(ColorsVisitor)
}

fn scalar_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
