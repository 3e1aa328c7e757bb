//! `weft patch` - apply a structured patch batch, then regenerate
//!
//! The batch is atomic: a failing operation rejects the whole batch and the
//! stored document stays byte-identical. Regeneration runs synchronously
//! before the command reports success.

use crate::commands::context::ProjectContext;
use crate::commands::generate::print_report;
use crate::GlobalOpts;
use anyhow::{Context, Result};
use std::io::Read;
use weft_ast::PatchOp;
use weft_codegen::{generate, GenerateOptions};
use weft_logger as logger;

pub fn handle_patch(
    project: Option<&str>,
    page: Option<&str>,
    patch_config: bool,
    file: Option<&str>,
    _opts: &GlobalOpts,
) -> Result<()> {
    if page.is_none() && !patch_config {
        anyhow::bail!("Specify a target: --page <NAME> or --config");
    }

    let ops = read_ops(file)?;
    if ops.is_empty() {
        anyhow::bail!("Patch batch is empty");
    }

    let ctx = ProjectContext::load(project)?;

    match page {
        Some(page_name) => {
            let config = ctx.store.load_project()?;
            ctx.store
                .patch_page(&config, page_name, &ops)
                .with_context(|| format!("Patch rejected for page '{}'", page_name))?;
            logger::success(&format!(
                "Applied {} operation(s) to page '{}'",
                ops.len(),
                page_name
            ));
        }
        None => {
            ctx.store
                .patch_project(&ops)
                .context("Patch rejected for project config")?;
            logger::success(&format!(
                "Applied {} operation(s) to project config",
                ops.len()
            ));
        }
    }

    // regeneration is part of the patch operation, not a follow-up
    let report = generate(
        &ctx.registry,
        &ctx.store,
        &ctx.out_dir,
        GenerateOptions::default(),
    )?;
    print_report(&report, &ctx.out_dir.display().to_string());

    if report.success() {
        Ok(())
    } else {
        anyhow::bail!("{} page(s) failed to compile", report.failed.len())
    }
}

/// Parse the batch from a file argument or stdin
fn read_ops(file: Option<&str>) -> Result<Vec<PatchOp>> {
    let content = match file {
        Some("-") | None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read patch from stdin")?;
            buffer
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read patch file {}", path))?,
    };

    serde_json::from_str(&content).context("Patch must be a JSON array of operations")
}
