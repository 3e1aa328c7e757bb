//! The generation pipeline: cache decision, per-page assembly, shared
//! artifacts, stale-artifact cleanup, and the cache rewrite
//!
//! Invoked synchronously, once per accepted patch batch (or CLI run). A
//! page-scoped failure never prevents sibling pages from compiling; its
//! cache entry is dropped so the page is retried on the next run.

use crate::assemble::{Artifact, Assembler, ROUTER_FILE, SHELL_FILE};
use crate::cache::{self, GenerationCache, RegenerationPlan};
use crate::errors::CodegenError;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use weft_ast::{DocumentStore, PageAst};
use weft_manifest::ManifestRegistry;

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Ignore the cache and rebuild everything
    pub force: bool,
}

/// What one generation run did
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Artifacts written this run, output-relative
    pub written: Vec<String>,
    /// Pages skipped because their content hash was unchanged
    pub skipped: Vec<String>,
    /// Stale artifacts removed from the output directory
    pub removed: Vec<String>,
    /// Page-scoped failures: (page name, error)
    pub failed: Vec<(String, CodegenError)>,
    /// Nothing differed; no file was touched
    pub up_to_date: bool,
}

impl GenerationReport {
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run one synchronous generation pass against the stored documents
pub fn generate(
    registry: &ManifestRegistry,
    store: &DocumentStore,
    out_dir: &Path,
    options: GenerateOptions,
) -> Result<GenerationReport, CodegenError> {
    let config = store.load_project()?;
    let mut report = GenerationReport::default();

    // page loads are page-scoped: a broken file fails that page only
    let mut pages: BTreeMap<String, PageAst> = BTreeMap::new();
    for entry in &config.pages {
        match store.load_page(&config, &entry.name) {
            Ok(page) => {
                pages.insert(entry.name.clone(), page);
            }
            Err(error) => report.failed.push((entry.name.clone(), error.into())),
        }
    }

    let project_hash = cache::project_hash(&config);
    let routes_hash = cache::routes_hash(&config);
    let page_hashes: BTreeMap<String, u64> = pages
        .iter()
        .map(|(name, page)| (name.clone(), cache::page_hash(page)))
        .collect();

    let prev = GenerationCache::load(out_dir);
    let plan = if options.force {
        RegenerationPlan::full(page_hashes.keys().cloned())
    } else {
        cache::plan(&prev, project_hash, routes_hash, &page_hashes)
    };

    if plan.is_noop() && report.failed.is_empty() {
        tracing::debug!("all hashes unchanged, skipping regeneration");
        report.skipped = page_hashes.keys().cloned().collect();
        report.up_to_date = true;
        return Ok(report);
    }

    let assembler = Assembler::new(registry);
    let mut new_cache = GenerationCache {
        project_hash,
        routes_hash,
        ..Default::default()
    };

    for entry in &config.pages {
        let Some(page) = pages.get(&entry.name) else {
            continue;
        };
        let rel_path = Assembler::page_file(&entry.name);

        if plan.pages.contains(&entry.name) {
            match assembler.assemble_page(&config, &entry.name, page) {
                Ok(artifact) => {
                    write_artifact(out_dir, &artifact)?;
                    report.written.push(artifact.rel_path);
                    new_cache
                        .page_hashes
                        .insert(entry.name.clone(), page_hashes[&entry.name]);
                }
                Err(error) => {
                    // no cache entry: the page is retried next run
                    tracing::warn!(page = %entry.name, %error, "page generation failed");
                    report.failed.push((entry.name.clone(), error));
                }
            }
        } else {
            report.skipped.push(entry.name.clone());
            new_cache
                .page_hashes
                .insert(entry.name.clone(), page_hashes[&entry.name]);
        }
    }

    if plan.shell {
        match assembler.assemble_shell(&config) {
            Ok(artifact) => {
                write_artifact(out_dir, &artifact)?;
                report.written.push(artifact.rel_path);
            }
            Err(error) => {
                // keep the previous project hash so the shell is retried
                tracing::warn!(%error, "app shell generation failed");
                new_cache.project_hash = prev.project_hash;
                report.failed.push(("app-shell".to_string(), error));
            }
        }
    }

    if plan.router {
        let artifact = assembler.assemble_router(&config);
        write_artifact(out_dir, &artifact)?;
        report.written.push(artifact.rel_path);
    }

    // every configured page keeps its artifact listed, including pages that
    // failed this run and still have the previous artifact on disk
    new_cache.generated_files = config
        .pages
        .iter()
        .map(|entry| Assembler::page_file(&entry.name))
        .chain([SHELL_FILE.to_string(), ROUTER_FILE.to_string()])
        .collect();

    for stale in &prev.generated_files {
        if !new_cache.generated_files.contains(stale) {
            let path = out_dir.join(stale);
            if std::fs::remove_file(&path).is_ok() {
                report.removed.push(stale.clone());
            }
        }
    }

    new_cache.generated_at = chrono::Utc::now().to_rfc3339();
    new_cache.save(out_dir)?;

    tracing::info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "generation pass complete"
    );
    Ok(report)
}

/// Write one artifact atomically under the output directory
fn write_artifact(out_dir: &Path, artifact: &Artifact) -> Result<(), CodegenError> {
    let path = out_dir.join(&artifact.rel_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    {
        let file = std::fs::File::create(&temp_path)?;
        let mut writer = std::io::BufWriter::new(file);
        writer.write_all(artifact.source.as_bytes())?;
        writer.flush()?;
    }
    std::fs::rename(&temp_path, &path)?;
    Ok(())
}
