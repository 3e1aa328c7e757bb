//! Page AST and project document model
//!
//! The stored JSON documents (one ProjectConfig per project, one PageAst per
//! page) are the only source of truth: generated artifacts are always
//! derivable from them and never read back. Documents are mutated exclusively
//! through patch batches (see [`patch`]) applied via the [`store`], which
//! persists with atomic replacement.

pub mod document;
pub mod errors;
pub mod patch;
pub mod store;

pub use document::{
    Action, AstNode, Condition, DynamicValue, PageAst, PageEntry, ProjectConfig, PropValue,
    SharedComponent, StateVar,
};
pub use errors::AstError;
pub use patch::{apply_batch, PatchFailure, PatchOp};
pub use store::DocumentStore;
