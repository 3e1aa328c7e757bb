//! Change-detection cache
//!
//! Hashes are content-derived (canonical JSON through a fixed-key hasher),
//! never timestamp-derived: identical content always hits the cache no
//! matter what the file mtimes say. A missing or unreadable cache file is a
//! full rebuild, not an error.

use crate::errors::CodegenError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::path::{Path, PathBuf};
use weft_ast::{PageAst, ProjectConfig};

/// Cache file name inside the output directory
pub const CACHE_FILE: &str = ".weft-cache.json";

/// Persisted fingerprints of the last successful generation
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationCache {
    /// Hash of the project config with `pages` excluded
    #[serde(default)]
    pub project_hash: u64,

    /// Hash of the page name/path list, used for the router artifact
    #[serde(default)]
    pub routes_hash: u64,

    /// Page name -> hash of its AST document
    #[serde(default)]
    pub page_hashes: BTreeMap<String, u64>,

    /// Artifact paths produced by the last generation, output-relative
    #[serde(default)]
    pub generated_files: Vec<String>,

    /// Informational only; hashes are never time-derived
    #[serde(default)]
    pub generated_at: String,
}

impl GenerationCache {
    pub fn cache_path(out_dir: &Path) -> PathBuf {
        out_dir.join(CACHE_FILE)
    }

    /// Load from the output directory; missing or corrupt means "everything
    /// has changed" and falls back to an empty cache
    pub fn load(out_dir: &Path) -> GenerationCache {
        let path = Self::cache_path(out_dir);
        if !path.exists() {
            return GenerationCache::default();
        }

        match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
        {
            Ok(cache) => cache,
            Err(reason) => {
                tracing::warn!(path = %path.display(), reason, "unreadable cache, full rebuild");
                GenerationCache::default()
            }
        }
    }

    /// Persist with write-then-rename so a watcher never sees a partial file
    pub fn save(&self, out_dir: &Path) -> Result<(), CodegenError> {
        std::fs::create_dir_all(out_dir)?;
        let path = Self::cache_path(out_dir);

        let mut content =
            serde_json::to_string_pretty(self).map_err(CodegenError::CacheSerialize)?;
        content.push('\n');

        let temp_path = path.with_extension("json.tmp");
        {
            let file = std::fs::File::create(&temp_path)?;
            let mut writer = std::io::BufWriter::new(file);
            writer.write_all(content.as_bytes())?;
            writer.flush()?;
        }
        std::fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

/// Content hash over the canonical JSON of a document
///
/// Document maps are BTreeMaps, so serialization order is canonical and the
/// hash depends on content alone.
pub fn content_hash<T: Serialize>(value: &T) -> u64 {
    let bytes = serde_json::to_vec(value).unwrap_or_default();
    let mut hasher = ahash::AHasher::default();
    bytes.hash(&mut hasher);
    hasher.finish()
}

/// Borrowed view of the project config with `pages` excluded
#[derive(Serialize)]
struct ProjectFingerprint<'a> {
    project_name: &'a str,
    global_styles: &'a str,
    shared_components: &'a BTreeMap<String, weft_ast::SharedComponent>,
}

/// Hash of the project config excluding the page list
pub fn project_hash(config: &ProjectConfig) -> u64 {
    content_hash(&ProjectFingerprint {
        project_name: &config.project_name,
        global_styles: &config.global_styles,
        shared_components: &config.shared_components,
    })
}

/// Hash of the page name/path list (drives the router artifact)
pub fn routes_hash(config: &ProjectConfig) -> u64 {
    let routes: Vec<(&str, &str)> = config
        .pages
        .iter()
        .map(|page| (page.name.as_str(), page.path.as_str()))
        .collect();
    content_hash(&routes)
}

/// Hash of one page document
pub fn page_hash(page: &PageAst) -> u64 {
    content_hash(page)
}

/// The minimal regeneration set for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegenerationPlan {
    /// Pages whose artifact must be rebuilt
    pub pages: BTreeSet<String>,
    /// Rebuild the app shell (shared components / global styles changed)
    pub shell: bool,
    /// Rebuild the router descriptor
    pub router: bool,
}

impl RegenerationPlan {
    /// Everything: all pages plus shell and router
    pub fn full(page_names: impl IntoIterator<Item = String>) -> Self {
        RegenerationPlan {
            pages: page_names.into_iter().collect(),
            shell: true,
            router: true,
        }
    }

    /// Nothing changed; skip all regeneration
    pub fn is_noop(&self) -> bool {
        self.pages.is_empty() && !self.shell && !self.router
    }
}

/// Compare fingerprints against the previous cache
///
/// A changed project hash regenerates every page plus the shared shell and
/// router, because shared components or global styling affect every page.
pub fn plan(
    prev: &GenerationCache,
    project: u64,
    routes: u64,
    page_hashes: &BTreeMap<String, u64>,
) -> RegenerationPlan {
    if prev.project_hash != project {
        return RegenerationPlan::full(page_hashes.keys().cloned());
    }

    let pages = page_hashes
        .iter()
        .filter(|(name, hash)| prev.page_hashes.get(name.as_str()) != Some(*hash))
        .map(|(name, _)| name.clone())
        .collect();

    RegenerationPlan {
        pages,
        shell: false,
        router: prev.routes_hash != routes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn config(styles: &str, pages: serde_json::Value) -> ProjectConfig {
        serde_json::from_value(json!({
            "projectName": "demo",
            "globalStyles": styles,
            "sharedComponents": {},
            "pages": pages
        }))
        .expect("config")
    }

    fn page(content: &str) -> PageAst {
        serde_json::from_value(json!({
            "state": {},
            "tree": {"id": "root", "type": "Box", "props": {"content": content}}
        }))
        .expect("page")
    }

    #[test]
    fn test_content_hash_is_content_derived() {
        assert_eq!(page_hash(&page("a")), page_hash(&page("a")));
        assert_ne!(page_hash(&page("a")), page_hash(&page("b")));
    }

    #[test]
    fn test_project_hash_excludes_pages() {
        let a = config("body{}", json!([]));
        let b = config(
            "body{}",
            json!([{"name": "home", "path": "/", "astFile": "pages/home.json"}]),
        );
        assert_eq!(project_hash(&a), project_hash(&b));
        assert_ne!(routes_hash(&a), routes_hash(&b));

        let c = config("body{margin:0}", json!([]));
        assert_ne!(project_hash(&a), project_hash(&c));
    }

    #[test]
    fn test_plan_noop() {
        let mut page_hashes = BTreeMap::new();
        page_hashes.insert("home".to_string(), 7_u64);
        let prev = GenerationCache {
            project_hash: 1,
            routes_hash: 2,
            page_hashes: page_hashes.clone(),
            ..Default::default()
        };

        let plan = plan(&prev, 1, 2, &page_hashes);
        assert!(plan.is_noop());
    }

    #[test]
    fn test_plan_single_page_change() {
        let mut prev_hashes = BTreeMap::new();
        prev_hashes.insert("home".to_string(), 7_u64);
        prev_hashes.insert("about".to_string(), 9_u64);
        let prev = GenerationCache {
            project_hash: 1,
            routes_hash: 2,
            page_hashes: prev_hashes.clone(),
            ..Default::default()
        };

        let mut current = prev_hashes;
        current.insert("about".to_string(), 10_u64);

        let plan = plan(&prev, 1, 2, &current);
        assert!(!plan.shell);
        assert!(!plan.router);
        assert_eq!(plan.pages.iter().collect::<Vec<_>>(), vec!["about"]);
    }

    #[test]
    fn test_plan_project_change_cascades() {
        let mut page_hashes = BTreeMap::new();
        page_hashes.insert("home".to_string(), 7_u64);
        page_hashes.insert("about".to_string(), 9_u64);
        let prev = GenerationCache {
            project_hash: 1,
            routes_hash: 2,
            page_hashes: page_hashes.clone(),
            ..Default::default()
        };

        let plan = plan(&prev, 99, 2, &page_hashes);
        assert!(plan.shell);
        assert!(plan.router);
        assert_eq!(plan.pages.len(), 2);
    }

    #[test]
    fn test_missing_cache_full_rebuild() {
        let dir = TempDir::new().expect("tempdir");
        let cache = GenerationCache::load(dir.path());
        assert_eq!(cache, GenerationCache::default());
    }

    #[test]
    fn test_corrupt_cache_full_rebuild() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join(CACHE_FILE), "{broken").expect("write");
        let cache = GenerationCache::load(dir.path());
        assert_eq!(cache, GenerationCache::default());
    }

    #[test]
    fn test_cache_round_trip() {
        let dir = TempDir::new().expect("tempdir");
        let mut cache = GenerationCache {
            project_hash: 42,
            routes_hash: 7,
            ..Default::default()
        };
        cache.page_hashes.insert("home".to_string(), 11);
        cache.generated_files = vec!["pages/Home.vue".to_string()];
        cache.save(dir.path()).expect("save");

        let restored = GenerationCache::load(dir.path());
        assert_eq!(restored, cache);
    }
}
