use std::io;
use thiserror::Error;

/// Errors that can occur during document load, persistence, and patching
#[derive(Error, Debug)]
pub enum AstError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Page '{0}' not found in project config")]
    PageNotFound(String),

    #[error("Invalid patch at operation {index}: {reason}")]
    InvalidPatch { index: usize, reason: String },

    #[error("Patched document failed validation: {0}")]
    PatchValidation(String),
}
