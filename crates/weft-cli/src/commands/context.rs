//! Shared command context: resolved project paths, documents, and manifests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use weft_ast::DocumentStore;
use weft_config::Config;
use weft_manifest::ManifestRegistry;

/// Everything a compile-facing command needs about one project
pub struct ProjectContext {
    pub project_dir: PathBuf,
    pub out_dir: PathBuf,
    pub store: DocumentStore,
    pub registry: ManifestRegistry,
}

impl ProjectContext {
    /// Resolve a project directory (argument or current directory) and load
    /// its manifests
    pub fn load(project: Option<&str>) -> Result<Self> {
        let project_dir = resolve_project_dir(project)?;
        let config = Config::load().context("Failed to load weft config")?;

        let manifests_dir = config.manifests_dir_for(&project_dir);
        let registry = ManifestRegistry::load_dir(&manifests_dir).with_context(|| {
            format!(
                "Failed to load component manifests from {}",
                manifests_dir.display()
            )
        })?;

        Ok(ProjectContext {
            out_dir: config.output_dir_for(&project_dir),
            store: DocumentStore::open(&project_dir),
            project_dir,
            registry,
        })
    }
}

/// Project directory from the argument or the current directory; it must
/// contain a project.json
pub fn resolve_project_dir(project: Option<&str>) -> Result<PathBuf> {
    let dir = match project {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };

    if !dir.join(weft_ast::store::PROJECT_FILE).exists() {
        anyhow::bail!(
            "No {} in {} (run `weft init` first?)",
            weft_ast::store::PROJECT_FILE,
            dir.display()
        );
    }
    Ok(dir)
}

/// Output directory for a project without loading manifests (cache commands)
pub fn resolve_out_dir(project: Option<&str>) -> Result<PathBuf> {
    let project_dir = resolve_project_dir(project)?;
    let config = Config::load().context("Failed to load weft config")?;
    Ok(config.output_dir_for(&project_dir))
}

/// Pretty location for user-facing messages
pub fn display_dir(path: &Path) -> String {
    path.display().to_string()
}
