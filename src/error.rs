use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a scene description.
///
/// Rendering itself cannot fail; everything here is about turning a file on
/// disk into a valid `World` and `Camera`.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse scene description: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must have {expected} components, found {found}")]
    Arity {
        field: String,
        expected: usize,
        found: usize,
    },

    #[error("sphere {index}: {reason}")]
    InvalidSphere { index: usize, reason: String },

    #[error("light {index}: {reason}")]
    InvalidLight { index: usize, reason: String },

    #[error("invalid camera: {0}")]
    InvalidCamera(String),

    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: usize, height: usize },
}

pub type Result<T> = std::result::Result<T, SceneError>;
