//! Error types for manifest validation and discovery.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ManifestError>;

#[derive(Debug, Error)]
pub enum ManifestError {
    // Field-level validation errors, raised before any graph work begins
    #[error("module manifest declares no name")]
    EmptyName,

    #[error("module name contains characters illegal in a path segment: {0:?}")]
    InvalidName(String),

    #[error("module {0:?} declares no version")]
    EmptyVersion(String),

    #[error("module {0:?} lists itself as a dependency")]
    SelfReference(String),

    // Batch-level validation errors
    #[error("module {name:?} is declared twice: {first} and {second}")]
    DuplicateModule {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("module directory does not exist: {0}")]
    PathNotFound(PathBuf),

    // Discovery errors
    #[error("malformed manifest {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
