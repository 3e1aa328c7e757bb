//! Component manifest loading and registry
//!
//! A manifest describes one renderable component type: its default output
//! tag, prop schema, named variants (preset prop overrides), slot sockets,
//! and whether it needs specialized rendering. Manifests are loaded once at
//! startup into an in-memory registry with O(1) lookup by component name.

pub mod errors;
pub mod registry;
pub mod types;

pub use errors::ManifestError;
pub use registry::{ManifestRegistry, SharedRegistry};
pub use types::{ComponentManifest, PropSpec, PropType, Variant};
