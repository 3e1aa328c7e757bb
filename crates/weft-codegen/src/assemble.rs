//! Project and page assembly
//!
//! One `.vue` single-file component per page (markup + reactive state +
//! generated handlers), plus the shared artifacts: the app shell embedding
//! every enabled shared component, and the router descriptor mapping page
//! paths to their compiled artifacts.

use crate::errors::CodegenError;
use crate::events::HandlerFn;
use crate::expr::{is_identifier, js_literal, js_string, StateScope};
use crate::ids::slug;
use crate::render::navigation::DEFAULT_NAV_HEIGHT;
use crate::render::{merge_props, RenderContext, RendererSet, INDENT};
use serde_json::Value;
use weft_ast::{PageAst, ProjectConfig, PropValue};
use weft_manifest::ManifestRegistry;

/// Page artifacts live under this output subdirectory
pub const PAGES_DIR: &str = "pages";

/// App shell artifact name
pub const SHELL_FILE: &str = "App.vue";

/// Router descriptor artifact name
pub const ROUTER_FILE: &str = "router.js";

/// One generated source artifact, path relative to the output directory
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub rel_path: String,
    pub source: String,
}

/// Assembles artifacts from documents, via the renderer registry
pub struct Assembler<'a> {
    registry: &'a ManifestRegistry,
    renderers: RendererSet,
}

impl<'a> Assembler<'a> {
    pub fn new(registry: &'a ManifestRegistry) -> Self {
        Assembler {
            registry,
            renderers: RendererSet::standard(),
        }
    }

    /// Output-relative artifact path of a page
    pub fn page_file(page_name: &str) -> String {
        format!("{}/{}.vue", PAGES_DIR, pascal_case(page_name))
    }

    /// Assemble one page into a single-file component
    pub fn assemble_page(
        &self,
        config: &ProjectConfig,
        page_name: &str,
        page: &PageAst,
    ) -> Result<Artifact, CodegenError> {
        for key in page.state.keys() {
            if !is_identifier(key) {
                return Err(CodegenError::InvalidStateKey(key.clone()));
            }
        }

        let scope = StateScope::new(&page.state);
        let mut ctx = RenderContext::new(&self.renderers, self.registry, scope);
        let markup = ctx.render_child(&page.tree, "", 0, 2)?;
        let handlers = ctx.into_handlers();

        // pages offset themselves under the shell's published extent
        let offset_style = if config.enabled_shared().next().is_some() {
            " style=\"padding-top: var(--shell-offset, 0px)\""
        } else {
            ""
        };

        let mut out = String::new();
        out.push_str("<template>\n");
        out.push_str(&format!(
            "  <main id=\"page-{}\" class=\"weft-page\"{}>\n",
            slug(page_name),
            offset_style
        ));
        out.push_str(&markup);
        out.push_str("\n  </main>\n</template>\n\n");
        out.push_str(&script_setup(&page_script_imports(page), &state_lines(page), &handlers));

        Ok(Artifact {
            rel_path: Self::page_file(page_name),
            source: out,
        })
    }

    /// Assemble the app shell embedding every enabled shared component
    ///
    /// The shell publishes its rendered extent as `--shell-offset`, the
    /// cross-artifact contract page content offsets itself by.
    pub fn assemble_shell(&self, config: &ProjectConfig) -> Result<Artifact, CodegenError> {
        let mut ctx = RenderContext::new(&self.renderers, self.registry, StateScope::empty());

        let mut blocks = Vec::new();
        for (index, (_, ast)) in config.enabled_shared().enumerate() {
            blocks.push(ctx.render_child(ast, "", index, 2)?);
        }
        let handlers = ctx.into_handlers();

        let mut out = String::new();
        out.push_str("<template>\n  <div id=\"app-shell\">\n");
        for block in &blocks {
            out.push_str(block);
            out.push('\n');
        }
        out.push_str("    <RouterView />\n  </div>\n</template>\n\n");
        out.push_str(&script_setup(
            &["import { RouterView } from 'vue-router'".to_string()],
            &[],
            &handlers,
        ));

        out.push_str("\n<style>\n:root {\n");
        out.push_str(&format!(
            "  --shell-offset: {}px;\n}}\n",
            self.shell_offset(config)
        ));
        if !config.global_styles.trim().is_empty() {
            out.push('\n');
            out.push_str(config.global_styles.trim_end());
            out.push('\n');
        }
        out.push_str("</style>\n");

        Ok(Artifact {
            rel_path: SHELL_FILE.to_string(),
            source: out,
        })
    }

    /// Assemble the router descriptor mapping paths to page artifacts
    pub fn assemble_router(&self, config: &ProjectConfig) -> Artifact {
        let mut out = String::new();
        out.push_str("import { createRouter, createWebHistory } from 'vue-router'\n\n");
        out.push_str("const routes = [\n");
        for page in &config.pages {
            out.push_str(&format!(
                "  {{ path: {}, name: {}, component: () => import('./{}') }},\n",
                js_string(&page.path),
                js_string(&page.name),
                Self::page_file(&page.name)
            ));
        }
        out.push_str("]\n\n");
        out.push_str("const router = createRouter({\n");
        out.push_str("  history: createWebHistory(),\n  routes,\n})\n\n");
        out.push_str("export default router\n");

        Artifact {
            rel_path: ROUTER_FILE.to_string(),
            source: out,
        }
    }

    /// Rendered extent of the shell: sum of the enabled shared components'
    /// literal height props, or the nav default when none declares one
    fn shell_offset(&self, config: &ProjectConfig) -> u64 {
        let mut total = 0;
        let mut any = false;
        for (_, ast) in config.enabled_shared() {
            any = true;
            let Some(manifest) = self.registry.get(&ast.component) else {
                continue;
            };
            let merged = merge_props(ast, manifest);
            if let Some(PropValue::Literal(Value::Number(height))) = merged.get("height") {
                total += height.as_u64().unwrap_or(0);
            }
        }
        if total == 0 && any {
            DEFAULT_NAV_HEIGHT
        } else {
            total
        }
    }
}

fn page_script_imports(page: &PageAst) -> Vec<String> {
    if page.state.is_empty() {
        Vec::new()
    } else {
        vec!["import { ref } from 'vue'".to_string()]
    }
}

fn state_lines(page: &PageAst) -> Vec<String> {
    page.state
        .iter()
        .map(|(key, var)| format!("const {} = ref({})", key, js_literal(&var.default_value)))
        .collect()
}

/// Compose a `<script setup>` block from imports, declarations, and handlers
fn script_setup(imports: &[String], declarations: &[String], handlers: &[HandlerFn]) -> String {
    let mut out = String::from("<script setup>\n");
    for import in imports {
        out.push_str(import);
        out.push('\n');
    }
    if !imports.is_empty() && (!declarations.is_empty() || !handlers.is_empty()) {
        out.push('\n');
    }
    for declaration in declarations {
        out.push_str(declaration);
        out.push('\n');
    }
    for handler in handlers {
        out.push('\n');
        out.push_str(&handler.source(INDENT));
        out.push('\n');
    }
    out.push_str("</script>\n");
    out
}

/// PascalCase component/file name from a page name
pub fn pascal_case(name: &str) -> String {
    name.split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
