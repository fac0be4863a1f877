// Chunk: docs/chunks/file_persistence - Errors at the file and config seams

use std::path::PathBuf;

use thiserror::Error;

/// Failures at the editor's I/O boundary.
///
/// Edit operations never fail; only opening, saving and configuration can.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8", path.display())]
    InvalidUtf8 { path: PathBuf },

    #[error("document has no file path")]
    NoPath,

    #[error("invalid config file {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl EditorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EditorError::Io {
            path: path.into(),
            source,
        }
    }
}
