//! `weft cache` - inspect or drop the generation cache

use crate::commands::context::resolve_out_dir;
use crate::GlobalOpts;
use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use weft_codegen::cache::GenerationCache;
use weft_logger as logger;

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show the cached hashes and artifact list
    Show {
        /// Project directory (default: current directory)
        #[arg(long)]
        project: Option<String>,
    },
    /// Remove the cache file (the next generate is a full rebuild)
    Clean {
        /// Project directory (default: current directory)
        #[arg(long)]
        project: Option<String>,
    },
}

pub fn handle_cache(action: &CacheAction, _opts: &GlobalOpts) -> Result<()> {
    match action {
        CacheAction::Show { project } => show_cache(project.as_deref()),
        CacheAction::Clean { project } => clean_cache(project.as_deref()),
    }
}

fn show_cache(project: Option<&str>) -> Result<()> {
    let out_dir = resolve_out_dir(project)?;
    let path = GenerationCache::cache_path(&out_dir);
    if !path.exists() {
        println!("No cache at {} (next generate is a full rebuild)", path.display());
        return Ok(());
    }

    let cache = GenerationCache::load(&out_dir);
    println!("Cache: {}", path.display());
    println!("  project hash: {:016x}", cache.project_hash);
    println!("  routes hash:  {:016x}", cache.routes_hash);
    println!("  pages:");
    for (name, hash) in &cache.page_hashes {
        println!("    {} {:016x}", name.bold(), hash);
    }
    println!("  artifacts:");
    for file in &cache.generated_files {
        println!("    {}", file);
    }
    if !cache.generated_at.is_empty() {
        println!("  generated at: {}", cache.generated_at.dimmed());
    }
    Ok(())
}

fn clean_cache(project: Option<&str>) -> Result<()> {
    let out_dir = resolve_out_dir(project)?;
    let path = GenerationCache::cache_path(&out_dir);

    if !path.exists() {
        logger::debug("Cache already clean");
        println!("Cache already clean.");
        return Ok(());
    }

    std::fs::remove_file(&path)?;
    logger::success("Cache removed; next generate is a full rebuild");
    Ok(())
}
