//! Centralized error types for artifact generation
//!
//! Manifest and state errors are page-scoped: they abort the offending
//! page's render but never prevent sibling pages from compiling.

use std::io;
use thiserror::Error;

/// Errors that can occur while generating artifacts
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No manifest for component type '{component}' (node '{node}')")]
    ManifestNotFound { component: String, node: String },

    #[error("Unresolved state reference '{key}' (node '{node}')")]
    UnresolvedStateReference { key: String, node: String },

    #[error("Invalid prop '{prop}' on node '{node}': {reason}")]
    InvalidProp {
        node: String,
        prop: String,
        reason: String,
    },

    #[error("State variable '{0}' is not a valid identifier")]
    InvalidStateKey(String),

    #[error("Failed to serialize cache: {0}")]
    CacheSerialize(#[source] serde_json::Error),

    #[error(transparent)]
    Ast(#[from] weft_ast::AstError),
}
