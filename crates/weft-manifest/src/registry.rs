//! Manifest registry - loading and O(1) lookup by component type
//!
//! All manifests are loaded at startup from a directory of JSON files.
//! Lookup during rendering is an index hit; an unknown component type is
//! reported by the renderer for the failing node, not here.

use crate::errors::ManifestError;
use crate::types::ComponentManifest;
use ahash::AHashMap;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

/// In-memory registry of component manifests, indexed by component name
#[derive(Debug, Default)]
pub struct ManifestRegistry {
    manifests: Vec<ComponentManifest>,

    /// Index for O(1) lookup by component name
    index: AHashMap<Arc<str>, usize>,
}

impl ManifestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.json` manifest under a directory
    ///
    /// Files are visited in path order so duplicate handling is stable.
    pub fn load_dir(dir: &Path) -> Result<Self, ManifestError> {
        let mut registry = ManifestRegistry::new();

        if !dir.is_dir() {
            return Err(ManifestError::Invalid {
                path: dir.display().to_string(),
                reason: "manifest directory not found".to_string(),
            });
        }

        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            let content = std::fs::read_to_string(path)?;
            let manifest: ComponentManifest =
                serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
                    path: path.display().to_string(),
                    source,
                })?;

            if manifest.component_name.is_empty() {
                return Err(ManifestError::Invalid {
                    path: path.display().to_string(),
                    reason: "componentName must not be empty".to_string(),
                });
            }

            registry.insert(manifest);
        }

        tracing::debug!(count = registry.len(), dir = %dir.display(), "loaded manifests");
        Ok(registry)
    }

    /// Insert a manifest; a duplicate component name replaces the earlier
    /// entry (last write wins)
    pub fn insert(&mut self, manifest: ComponentManifest) {
        let name = manifest.component_name.clone();
        if let Some(&idx) = self.index.get(&name) {
            tracing::warn!(component = %name, "duplicate manifest, replacing earlier entry");
            self.manifests[idx] = manifest;
        } else {
            let idx = self.manifests.len();
            self.manifests.push(manifest);
            self.index.insert(name, idx);
        }
    }

    /// O(1) manifest lookup by component name
    #[inline]
    pub fn get(&self, component_name: &str) -> Option<&ComponentManifest> {
        self.index
            .get(component_name)
            .map(|&idx| &self.manifests[idx])
    }

    pub fn contains(&self, component_name: &str) -> bool {
        self.index.contains_key(component_name)
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }

    /// Component names in sorted order, for stable listings
    pub fn component_names(&self) -> Vec<Arc<str>> {
        let mut names: Vec<Arc<str>> = self.index.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentManifest> {
        self.manifests.iter()
    }
}

/// Shareable registry handle for use across the compile pipeline
#[derive(Clone)]
pub struct SharedRegistry {
    inner: Arc<RwLock<ManifestRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: ManifestRegistry) -> Self {
        SharedRegistry {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Get a read lock on the registry
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, ManifestRegistry> {
        self.inner.read()
    }

    /// Get a write lock on the registry (manifest reload between batches)
    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, ManifestRegistry> {
        self.inner.write()
    }
}
