//! Result store error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {file} as CSV: {source}")]
    Csv {
        file: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("failed to encode {file} as JSON: {source}")]
    Json {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The journal of an interrupted commit could not be understood.
    #[error("unreadable commit journal {path}: {line:?}")]
    CorruptJournal { path: PathBuf, line: String },

    /// A file could not be moved into place; previous outputs were restored.
    #[error("failed to replace {target_path} (previous outputs restored): {source}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OutputError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}
