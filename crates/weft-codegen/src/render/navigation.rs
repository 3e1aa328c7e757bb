//! Navigation renderer
//!
//! A NavBar synthesizes one anchor per `links` entry. It is usually
//! composed as a shared component, where its height feeds the app-shell
//! offset contract (see the assembler).

use crate::errors::CodegenError;
use crate::escape::{escape_attr, escape_text};
use crate::render::{RenderContext, RenderInput, Renderer, INDENT};
use serde_json::Value;
use weft_ast::PropValue;

/// Height assumed when a nav-like shared component does not declare one
pub const DEFAULT_NAV_HEIGHT: u64 = 64;

pub struct NavBarRenderer;

impl Renderer for NavBarRenderer {
    fn render(
        &self,
        input: &RenderInput<'_>,
        ctx: &mut RenderContext<'_>,
    ) -> Result<String, CodegenError> {
        let height = match input.resolved_props.get("height") {
            Some(PropValue::Literal(Value::Number(n))) => n.as_u64().unwrap_or(DEFAULT_NAV_HEIGHT),
            _ => DEFAULT_NAV_HEIGHT,
        };

        let links: &[Value] = match input.resolved_props.get("links") {
            None => &[],
            Some(PropValue::Literal(Value::Array(links))) => links,
            Some(_) => {
                return Err(CodegenError::InvalidProp {
                    node: input.semantic_id.clone(),
                    prop: "links".to_string(),
                    reason: "expected a literal array of {label, href}".to_string(),
                })
            }
        };

        let pad = input.pad();
        let d1 = INDENT.repeat(input.depth + 1);
        let d2 = INDENT.repeat(input.depth + 2);

        let mut out = format!(
            "{}{} class=\"nav-bar\" style=\"height: {}px\">",
            pad,
            input.open_tag("nav"),
            height
        );

        if let Some(PropValue::Literal(Value::String(brand))) = input.resolved_props.get("brand") {
            out.push('\n');
            out.push_str(&format!(
                "{}<span class=\"nav-brand\">{}</span>",
                d1,
                escape_text(brand)
            ));
        }

        out.push_str(&format!("\n{}<div class=\"nav-links\">", d1));
        for (index, link) in links.iter().enumerate() {
            let id = ctx.item_id(&input.semantic_id, index);
            let label = link
                .get("label")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let href = link.get("href").and_then(Value::as_str).unwrap_or("#");
            out.push('\n');
            out.push_str(&format!(
                "{}<a id=\"{}\" href=\"{}\">{}</a>",
                d2,
                escape_attr(&id),
                escape_attr(href),
                escape_text(label)
            ));
        }
        out.push_str(&format!("\n{}</div>\n{}</nav>", d1, pad));
        Ok(out)
    }
}
