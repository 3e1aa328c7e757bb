//! `weft manifests` - list loaded component manifests

use crate::commands::context::ProjectContext;
use crate::GlobalOpts;
use anyhow::Result;
use colored::Colorize;

pub fn handle_manifests(project: Option<&str>, _opts: &GlobalOpts) -> Result<()> {
    let ctx = ProjectContext::load(project)?;

    if ctx.registry.is_empty() {
        println!("No component manifests loaded.");
        return Ok(());
    }

    println!(
        "{} component manifest(s):",
        ctx.registry.len().to_string().bold()
    );
    for name in ctx.registry.component_names() {
        let Some(manifest) = ctx.registry.get(&name) else {
            continue;
        };
        let kind = if manifest.special_rendering {
            "specialized".cyan()
        } else {
            "generic".dimmed()
        };
        println!(
            "  {} {} {} {}",
            name.bold(),
            format!("<{}>", manifest.tag).dimmed(),
            kind,
            format!("({} props)", manifest.props.len()).dimmed()
        );
    }
    Ok(())
}
