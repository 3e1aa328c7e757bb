use std::io;
use thiserror::Error;

/// Errors that can occur while loading component manifests
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse manifest {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid manifest {path}: {reason}")]
    Invalid { path: String, reason: String },
}
