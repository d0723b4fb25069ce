//! Error types for theme file loading.

use std::io;
use std::path::PathBuf;

/// Errors that can occur while reading a theme file.
///
/// Only the file layer fails. Content problems inside a well-formed file
/// (unknown colors, dangling references, cycles) are absorbed during
/// resolution.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// The file could not be read.
    #[error("Failed to read theme file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not a valid theme document.
    #[error("Failed to parse theme: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl ThemeError {
    /// Create an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
