//! Document store - loading, patching, and atomic persistence
//!
//! A project directory holds `project.json` plus one AST file per page
//! (referenced by `astFile`). Every write goes to a temp file first and is
//! swapped into place with a rename, so a concurrent reader (e.g. a dev
//! server watching the directory) never observes a half-written document.

use crate::document::{PageAst, ProjectConfig};
use crate::errors::AstError;
use crate::patch::{apply_batch, PatchOp};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The project config file name inside a project directory
pub const PROJECT_FILE: &str = "project.json";

/// Store rooted at one project directory
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        DocumentStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project_path(&self) -> PathBuf {
        self.root.join(PROJECT_FILE)
    }

    /// Path of a page's AST file, resolved against the project root
    pub fn page_path(&self, config: &ProjectConfig, name: &str) -> Result<PathBuf, AstError> {
        let entry = config
            .page(name)
            .ok_or_else(|| AstError::PageNotFound(name.to_string()))?;
        Ok(self.root.join(&entry.ast_file))
    }

    pub fn load_project(&self) -> Result<ProjectConfig, AstError> {
        read_json(&self.project_path())
    }

    pub fn load_page(&self, config: &ProjectConfig, name: &str) -> Result<PageAst, AstError> {
        read_json(&self.page_path(config, name)?)
    }

    pub fn save_project(&self, config: &ProjectConfig) -> Result<(), AstError> {
        write_json(&self.project_path(), config)
    }

    pub fn save_page(
        &self,
        config: &ProjectConfig,
        name: &str,
        page: &PageAst,
    ) -> Result<(), AstError> {
        write_json(&self.page_path(config, name)?, page)
    }

    /// Apply a patch batch to the project config, atomically
    ///
    /// On failure the stored file is untouched. On success the patched
    /// document is validated, persisted, and returned.
    pub fn patch_project(&self, ops: &[PatchOp]) -> Result<ProjectConfig, AstError> {
        let path = self.project_path();
        let config = self.patch_document::<ProjectConfig>(&path, ops)?;
        tracing::debug!(ops = ops.len(), "patched project config");
        Ok(config)
    }

    /// Apply a patch batch to one page's AST, atomically
    pub fn patch_page(
        &self,
        config: &ProjectConfig,
        name: &str,
        ops: &[PatchOp],
    ) -> Result<PageAst, AstError> {
        let path = self.page_path(config, name)?;
        let page = self.patch_document::<PageAst>(&path, ops)?;
        tracing::debug!(page = name, ops = ops.len(), "patched page AST");
        Ok(page)
    }

    fn patch_document<T>(&self, path: &Path, ops: &[PatchOp]) -> Result<T, AstError>
    where
        T: Serialize + DeserializeOwned,
    {
        let original: Value = read_json(path)?;

        let patched = apply_batch(&original, ops).map_err(|failure| AstError::InvalidPatch {
            index: failure.index,
            reason: failure.reason,
        })?;

        // A structurally valid patch may still produce an invalid document;
        // that also rejects the batch before anything is persisted.
        let typed: T = serde_json::from_value(patched)
            .map_err(|e| AstError::PatchValidation(e.to_string()))?;

        write_json(path, &typed)?;
        Ok(typed)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AstError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| AstError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Serialize pretty-printed and swap into place atomically
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AstError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut content = serde_json::to_string_pretty(value).map_err(AstError::Serialize)?;
    content.push('\n');

    let temp_path = path.with_extension("json.tmp");
    {
        let file = std::fs::File::create(&temp_path)?;
        let mut writer = std::io::BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
    }

    std::fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn seed_project(dir: &Path) -> DocumentStore {
        let store = DocumentStore::open(dir);
        let config: ProjectConfig = serde_json::from_value(json!({
            "projectName": "demo",
            "globalStyles": "",
            "sharedComponents": {},
            "pages": [{"name": "home", "path": "/", "astFile": "pages/home.json"}]
        }))
        .expect("config");
        store.save_project(&config).expect("save project");

        let page: PageAst = serde_json::from_value(json!({
            "state": {},
            "tree": {"id": "root", "type": "Box", "props": {}, "slots": {"default": []}}
        }))
        .expect("page");
        store.save_page(&config, "home", &page).expect("save page");
        store
    }

    #[test]
    fn test_load_round_trip() {
        let dir = TempDir::new().expect("tempdir");
        let store = seed_project(dir.path());

        let config = store.load_project().expect("load project");
        assert_eq!(config.project_name, "demo");
        let page = store.load_page(&config, "home").expect("load page");
        assert_eq!(page.tree.component, "Box");
    }

    #[test]
    fn test_unknown_page() {
        let dir = TempDir::new().expect("tempdir");
        let store = seed_project(dir.path());
        let config = store.load_project().expect("load project");
        assert!(matches!(
            store.load_page(&config, "missing"),
            Err(AstError::PageNotFound(_))
        ));
    }

    #[test]
    fn test_patch_page_persists() {
        let dir = TempDir::new().expect("tempdir");
        let store = seed_project(dir.path());
        let config = store.load_project().expect("load project");

        let ops: Vec<PatchOp> = serde_json::from_value(json!([
            {"op": "add", "path": "/tree/slots/default/-",
             "value": {"id": "hero-title", "type": "Text", "props": {"content": "Hello"}}}
        ]))
        .expect("ops");

        let page = store.patch_page(&config, "home", &ops).expect("patch");
        assert_eq!(page.tree.slot_children("default").len(), 1);

        // a fresh load sees the patched document
        let reloaded = store.load_page(&config, "home").expect("reload");
        assert_eq!(reloaded, page);
    }

    #[test]
    fn test_failed_batch_leaves_file_byte_identical() {
        let dir = TempDir::new().expect("tempdir");
        let store = seed_project(dir.path());
        let config = store.load_project().expect("load project");
        let path = store.page_path(&config, "home").expect("path");
        let before = std::fs::read(&path).expect("read");

        let ops: Vec<PatchOp> = serde_json::from_value(json!([
            {"op": "add", "path": "/state/count", "value": {"type": "number", "defaultValue": 0}},
            {"op": "replace", "path": "/missing", "value": 1}
        ]))
        .expect("ops");

        let err = store.patch_page(&config, "home", &ops).expect_err("fails");
        assert!(matches!(err, AstError::InvalidPatch { index: 1, .. }));

        let after = std::fs::read(&path).expect("read");
        assert_eq!(before, after);
    }

    #[test]
    fn test_patch_result_must_stay_valid() {
        let dir = TempDir::new().expect("tempdir");
        let store = seed_project(dir.path());
        let config = store.load_project().expect("load project");
        let path = store.page_path(&config, "home").expect("path");
        let before = std::fs::read(&path).expect("read");

        // removing the tree leaves a document that no longer parses as a page
        let ops: Vec<PatchOp> = serde_json::from_value(json!([
            {"op": "remove", "path": "/tree"}
        ]))
        .expect("ops");

        let err = store.patch_page(&config, "home", &ops).expect_err("fails");
        assert!(matches!(err, AstError::PatchValidation(_)));
        assert_eq!(std::fs::read(&path).expect("read"), before);
    }

    #[test]
    fn test_sequential_batches_compose() {
        let dir = TempDir::new().expect("tempdir");
        let store = seed_project(dir.path());
        let config = store.load_project().expect("load project");

        let first: Vec<PatchOp> = serde_json::from_value(json!([
            {"op": "add", "path": "/tree/slots/default/-", "value": {"type": "Text"}}
        ]))
        .expect("ops");
        store.patch_page(&config, "home", &first).expect("first");

        // the second batch addresses state produced by the first
        let second: Vec<PatchOp> = serde_json::from_value(json!([
            {"op": "test", "path": "/tree/slots/default/0/type", "value": "Text"},
            {"op": "replace", "path": "/tree/slots/default/0/type", "value": "Button"}
        ]))
        .expect("ops");
        let page = store.patch_page(&config, "home", &second).expect("second");
        assert_eq!(page.tree.slot_children("default")[0].component, "Button");
    }
}
