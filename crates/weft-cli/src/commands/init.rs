//! `weft init` - scaffold a new project
//!
//! Writes the starter manifest library, a project config with a shared nav,
//! and two example pages. Everything is plain JSON the user edits (or
//! patches) afterwards.

use crate::GlobalOpts;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use weft_logger as logger;

const PROJECT_TEMPLATE: &str = r#"{
  "projectName": "my-site",
  "globalStyles": "body { margin: 0; font-family: system-ui, sans-serif; }\n.weft-page { min-height: 100vh; }",
  "sharedComponents": {
    "nav": {
      "enabled": true,
      "ast": {
        "id": "site-nav",
        "type": "NavBar",
        "props": {
          "brand": "my-site",
          "height": 64,
          "links": [
            { "label": "Home", "href": "/" },
            { "label": "About", "href": "/about" }
          ]
        }
      }
    }
  },
  "pages": [
    { "name": "home", "path": "/", "astFile": "pages/home.json" },
    { "name": "about", "path": "/about", "astFile": "pages/about.json" }
  ]
}
"#;

const HOME_PAGE_TEMPLATE: &str = r#"{
  "state": {
    "count": { "type": "number", "defaultValue": 0 }
  },
  "tree": {
    "id": "root",
    "type": "Box",
    "props": {},
    "slots": {
      "default": [
        {
          "id": "hero-title",
          "type": "Text",
          "props": { "content": "Welcome", "as": "h1" }
        },
        {
          "id": "counter-label",
          "type": "Text",
          "props": {
            "content": { "type": "expression", "value": "Clicked ${state.count} times" }
          }
        },
        {
          "id": "counter",
          "type": "Button",
          "props": { "label": "Click me" },
          "events": {
            "click": [
              {
                "type": "action:setState",
                "stateKey": "count",
                "value": { "type": "expression", "value": "${state.count} + 1" }
              }
            ]
          }
        }
      ]
    }
  }
}
"#;

const ABOUT_PAGE_TEMPLATE: &str = r#"{
  "state": {},
  "tree": {
    "id": "root",
    "type": "Box",
    "props": {},
    "slots": {
      "default": [
        {
          "id": "about-title",
          "type": "Text",
          "props": { "content": "About", "as": "h1" }
        },
        {
          "id": "topics",
          "type": "List",
          "props": { "items": ["What we do", "Who we are", "Where to find us"] }
        }
      ]
    }
  }
}
"#;

/// Starter manifest library: (file name, manifest JSON)
const MANIFEST_TEMPLATES: &[(&str, &str)] = &[
    (
        "box.json",
        r#"{
  "componentName": "Box",
  "tag": "div",
  "props": {
    "style": { "type": "object" }
  },
  "slots": ["default"],
  "specialRendering": false
}
"#,
    ),
    (
        "text.json",
        r#"{
  "componentName": "Text",
  "tag": "p",
  "props": {
    "content": { "type": "string", "default": "" },
    "as": { "type": "string" },
    "style": { "type": "object" }
  },
  "specialRendering": false
}
"#,
    ),
    (
        "button.json",
        r##"{
  "componentName": "Button",
  "tag": "button",
  "props": {
    "label": { "type": "string", "default": "Button" },
    "kind": { "type": "string", "enum": ["primary", "secondary", "ghost"] },
    "style": { "type": "object" }
  },
  "variants": {
    "primary": {
      "props": { "style": { "background": "#3b82f6", "color": "#fff", "border": "none" } }
    },
    "ghost": {
      "props": { "style": { "background": "transparent", "border": "1px solid currentColor" } }
    }
  },
  "specialRendering": false
}
"##,
    ),
    (
        "input.json",
        r#"{
  "componentName": "Input",
  "tag": "input",
  "props": {
    "value": { "type": "any" },
    "placeholder": { "type": "string" },
    "style": { "type": "object" }
  },
  "specialRendering": false
}
"#,
    ),
    (
        "image.json",
        r#"{
  "componentName": "Image",
  "tag": "img",
  "props": {
    "src": { "type": "string" },
    "alt": { "type": "string", "default": "" },
    "style": { "type": "object" }
  },
  "specialRendering": false
}
"#,
    ),
    (
        "card.json",
        r#"{
  "componentName": "Card",
  "tag": "div",
  "props": {
    "style": { "type": "object" }
  },
  "variants": {
    "elevated": {
      "props": { "style": { "boxShadow": "0 4px 16px rgba(0,0,0,0.3)", "borderRadius": "8px" } }
    },
    "outlined": {
      "props": { "style": { "border": "1px solid #e5e7eb", "borderRadius": "8px" } }
    }
  },
  "slots": ["default"],
  "specialRendering": false
}
"#,
    ),
    (
        "list.json",
        r#"{
  "componentName": "List",
  "tag": "ul",
  "props": {
    "items": { "type": "array", "default": [] },
    "ordered": { "type": "boolean", "default": false }
  },
  "specialRendering": true
}
"#,
    ),
    (
        "table.json",
        r#"{
  "componentName": "Table",
  "tag": "table",
  "props": {
    "columns": { "type": "array", "default": [] },
    "rows": { "type": "array", "default": [] }
  },
  "specialRendering": true
}
"#,
    ),
    (
        "collapsible.json",
        r#"{
  "componentName": "Collapsible",
  "tag": "details",
  "props": {
    "title": { "type": "string", "default": "Details" },
    "open": { "type": "boolean", "default": false }
  },
  "slots": ["default"],
  "specialRendering": true
}
"#,
    ),
    (
        "flipcard.json",
        r#"{
  "componentName": "FlipCard",
  "tag": "div",
  "props": {
    "style": { "type": "object" }
  },
  "slots": ["front", "back"],
  "specialRendering": true
}
"#,
    ),
    (
        "stepper.json",
        r#"{
  "componentName": "Stepper",
  "tag": "ol",
  "props": {
    "steps": { "type": "array", "default": [] },
    "current": { "type": "number" }
  },
  "specialRendering": true
}
"#,
    ),
    (
        "cardgrid.json",
        r#"{
  "componentName": "CardGrid",
  "tag": "div",
  "props": {
    "columns": { "type": "number", "default": 3 },
    "gap": { "type": "string", "default": "1rem" }
  },
  "slots": ["default"],
  "specialRendering": true
}
"#,
    ),
    (
        "navbar.json",
        r#"{
  "componentName": "NavBar",
  "tag": "nav",
  "props": {
    "brand": { "type": "string" },
    "links": { "type": "array", "default": [] },
    "height": { "type": "number", "default": 64 }
  },
  "specialRendering": true
}
"#,
    ),
    (
        "particlefield.json",
        r#"{
  "componentName": "ParticleField",
  "tag": "div",
  "props": {
    "count": { "type": "number", "default": 24 }
  },
  "specialRendering": true
}
"#,
    ),
];

/// Initialize a new project directory
pub fn handle_init(dir: Option<String>, _opts: &GlobalOpts) -> Result<()> {
    logger::debug("Handling init command");

    let target_dir = dir.map_or_else(
        || std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        PathBuf::from,
    );
    let project_file = target_dir.join("project.json");

    if project_file.exists() && !confirm_overwrite(&project_file)? {
        logger::info("Operation cancelled by user");
        println!("Operation cancelled.");
        return Ok(());
    }

    write_template(&project_file, PROJECT_TEMPLATE)?;
    write_template(&target_dir.join("pages").join("home.json"), HOME_PAGE_TEMPLATE)?;
    write_template(&target_dir.join("pages").join("about.json"), ABOUT_PAGE_TEMPLATE)?;

    let manifests_dir = target_dir.join("manifests");
    for (file, content) in MANIFEST_TEMPLATES {
        write_template(&manifests_dir.join(file), content)?;
    }

    logger::success(&format!("Created project in {}", target_dir.display()));
    println!();
    println!("{}  Project created successfully!", "✔".green());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} and the pages/ ASTs", "project.json".bold());
    println!("  2. Compile: weft generate");
    println!("  3. Mutate: weft patch --page home <batch.json>");
    println!("  4. Inspect the cache: weft cache show");
    Ok(())
}

fn confirm_overwrite(path: &Path) -> Result<bool> {
    // Check for skip confirmation flag
    if std::env::var("WEFT_INIT_YES").is_ok() {
        logger::debug("Skipping confirmation (WEFT_INIT_YES set)");
        return Ok(true);
    }

    print!(
        "{} File '{}' already exists. Overwrite? {} ",
        "?".bold().cyan(),
        path.display(),
        "[y/n] ›".dimmed()
    );
    let _ = io::stdout().flush();

    let mut response = String::new();
    io::stdin()
        .read_line(&mut response)
        .context("Failed to read input")?;
    let response = response.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

fn write_template(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    logger::debug(&format!("Wrote {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_are_valid_json() {
        serde_json::from_str::<serde_json::Value>(PROJECT_TEMPLATE).expect("project template");
        serde_json::from_str::<serde_json::Value>(HOME_PAGE_TEMPLATE).expect("home template");
        serde_json::from_str::<serde_json::Value>(ABOUT_PAGE_TEMPLATE).expect("about template");
        for (file, content) in MANIFEST_TEMPLATES {
            serde_json::from_str::<serde_json::Value>(content)
                .unwrap_or_else(|e| panic!("manifest template {}: {}", file, e));
        }
    }

    #[test]
    fn test_project_template_references_existing_pages() {
        let project: serde_json::Value =
            serde_json::from_str(PROJECT_TEMPLATE).expect("project template");
        let pages = project["pages"].as_array().expect("pages array");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0]["astFile"], "pages/home.json");
    }

    #[test]
    fn test_manifest_templates_parse_as_manifests() {
        for (file, content) in MANIFEST_TEMPLATES {
            serde_json::from_str::<weft_manifest::ComponentManifest>(content)
                .unwrap_or_else(|e| panic!("manifest {}: {}", file, e));
        }
    }
}
