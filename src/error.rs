use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an operation.
///
/// Entry-level problems (escaping symlinks, unreadable entries, traversal
/// cycles, oversized files) are never surfaced here; the walker absorbs
/// them into the skip count of an [`AggregationResult`](crate::AggregationResult).
#[derive(Debug, Error)]
pub enum SnaplogError {
    /// Malformed ignore pattern, invalid file-type or output mapping, or a
    /// missing / non-directory project root. Fatal to the whole operation.
    #[error("configuration error: {0}")]
    Config(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Destination could not be created or written. Fatal to the current
    /// mode invocation; no partial artifact is left behind.
    #[error("write failure on {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SnaplogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SnaplogError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SnaplogError::Write {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        SnaplogError::Config(message.into())
    }
}
