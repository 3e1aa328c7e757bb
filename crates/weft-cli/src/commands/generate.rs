//! `weft generate` - compile the project into loadable artifacts

use crate::commands::context::{display_dir, ProjectContext};
use crate::GlobalOpts;
use anyhow::Result;
use colored::Colorize;
use weft_codegen::{generate, GenerateOptions};
use weft_logger as logger;

pub fn handle_generate(project: Option<&str>, force: bool, _opts: &GlobalOpts) -> Result<()> {
    let ctx = ProjectContext::load(project)?;
    logger::debug(&format!(
        "Generating {} -> {}",
        display_dir(&ctx.project_dir),
        display_dir(&ctx.out_dir)
    ));

    let report = generate(
        &ctx.registry,
        &ctx.store,
        &ctx.out_dir,
        GenerateOptions { force },
    )?;

    print_report(&report, &display_dir(&ctx.out_dir));

    if report.success() {
        Ok(())
    } else {
        anyhow::bail!("{} page(s) failed to compile", report.failed.len())
    }
}

pub(crate) fn print_report(report: &weft_codegen::GenerationReport, out_dir: &str) {
    if report.up_to_date {
        println!("{} Everything up to date, nothing written", "✔".green());
        return;
    }

    for path in &report.written {
        println!("  {} {}", "write".green(), path);
    }
    for path in &report.removed {
        println!("  {} {}", "remove".yellow(), path);
    }
    if !report.skipped.is_empty() {
        println!(
            "  {} {} page(s) unchanged",
            "skip".dimmed(),
            report.skipped.len()
        );
    }
    for (page, error) in &report.failed {
        logger::error(&format!("page '{}': {}", page, error));
    }

    if report.failed.is_empty() {
        logger::success(&format!(
            "Generated {} artifact(s) in {}",
            report.written.len(),
            out_dir
        ));
    }
}
