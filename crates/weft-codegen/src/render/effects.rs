//! Specialized renderers for structural and decorative components
//!
//! Collapsible sections, flip/reveal cards with named front/back slots, and
//! the particle background that synthesizes procedural children from a
//! count parameter.

use crate::errors::CodegenError;
use crate::escape::{escape_attr, escape_text};
use crate::expr::{ExprContext, ResolvedValue};
use crate::render::{RenderContext, RenderInput, Renderer, DEFAULT_SLOT, INDENT};
use serde_json::Value;
use weft_ast::PropValue;

// =============================================================================
// COLLAPSIBLE
// =============================================================================

/// `<details>`/`<summary>` section with a title prop and default slot
pub struct CollapsibleRenderer;

impl Renderer for CollapsibleRenderer {
    fn render(
        &self,
        input: &RenderInput<'_>,
        ctx: &mut RenderContext<'_>,
    ) -> Result<String, CodegenError> {
        let title = match input.resolved_props.get("title") {
            None => String::new(),
            Some(value) => {
                match ctx.resolve(value, ExprContext::Template, &input.semantic_id)? {
                    ResolvedValue::Literal(Value::String(text)) => escape_text(&text),
                    ResolvedValue::Literal(other) => escape_text(&other.to_string()),
                    ResolvedValue::Expr(expr) => format!("{{{{ {} }}}}", expr.code),
                    ResolvedValue::StateBinding(key) => format!("{{{{ {} }}}}", key),
                }
            }
        };

        let open = match input.resolved_props.get("open") {
            Some(PropValue::Literal(Value::Bool(true))) => " open".to_string(),
            Some(value @ PropValue::Dynamic(_)) => {
                match ctx.resolve(value, ExprContext::Template, &input.semantic_id)? {
                    ResolvedValue::Expr(expr) => format!(" :open=\"{}\"", escape_attr(&expr.code)),
                    ResolvedValue::StateBinding(key) => format!(" :open=\"{}\"", escape_attr(&key)),
                    ResolvedValue::Literal(_) => String::new(),
                }
            }
            _ => String::new(),
        };

        let pad = input.pad();
        let inner = INDENT.repeat(input.depth + 1);
        let mut out = format!("{}{}{}>", pad, input.open_tag("details"), open);
        out.push('\n');
        out.push_str(&format!("{}<summary>{}</summary>", inner, title));

        let mut next_index = 0;
        for child in ctx.render_slot(input, DEFAULT_SLOT, input.depth + 1, &mut next_index)? {
            out.push('\n');
            out.push_str(&child);
        }
        out.push('\n');
        out.push_str(&format!("{}</details>", pad));
        Ok(out)
    }
}

// =============================================================================
// FLIP CARD
// =============================================================================

/// Reveal component with named `front` and `back` slots
pub struct FlipCardRenderer;

impl Renderer for FlipCardRenderer {
    fn render(
        &self,
        input: &RenderInput<'_>,
        ctx: &mut RenderContext<'_>,
    ) -> Result<String, CodegenError> {
        let pad = input.pad();
        let d1 = INDENT.repeat(input.depth + 1);
        let d2 = INDENT.repeat(input.depth + 2);

        let mut out = format!("{}{} class=\"flip-card\">", pad, input.open_tag("div"));
        out.push_str(&format!("\n{}<div class=\"flip-card-inner\">", d1));

        // one running child index across both faces keeps collision
        // fallbacks distinct
        let mut next_index = 0;
        for (face, slot) in [("front", "front"), ("back", "back")] {
            out.push_str(&format!("\n{}<div class=\"flip-card-{}\">", d2, face));
            for child in ctx.render_slot(input, slot, input.depth + 3, &mut next_index)? {
                out.push('\n');
                out.push_str(&child);
            }
            out.push_str(&format!("\n{}</div>", d2));
        }

        out.push_str(&format!("\n{}</div>\n{}</div>", d1, pad));
        Ok(out)
    }
}

// =============================================================================
// PARTICLE FIELD
// =============================================================================

/// Background effect synthesizing `count` procedural spans
pub struct ParticleFieldRenderer;

const DEFAULT_PARTICLE_COUNT: usize = 24;

impl Renderer for ParticleFieldRenderer {
    fn render(
        &self,
        input: &RenderInput<'_>,
        ctx: &mut RenderContext<'_>,
    ) -> Result<String, CodegenError> {
        let count = match input.resolved_props.get("count") {
            None => DEFAULT_PARTICLE_COUNT,
            Some(PropValue::Literal(Value::Number(n))) => {
                n.as_u64().map_or(DEFAULT_PARTICLE_COUNT, |n| n as usize)
            }
            Some(_) => {
                return Err(CodegenError::InvalidProp {
                    node: input.semantic_id.clone(),
                    prop: "count".to_string(),
                    reason: "expected a literal number".to_string(),
                })
            }
        };

        let pad = input.pad();
        let inner = INDENT.repeat(input.depth + 1);
        let mut out = format!("{}{} class=\"particle-field\">", pad, input.open_tag("div"));
        for index in 0..count {
            let id = ctx.item_id(&input.semantic_id, index);
            out.push('\n');
            out.push_str(&format!(
                "{}<span id=\"{}\" class=\"particle\" style=\"--particle-index: {}\"></span>",
                inner,
                escape_attr(&id),
                index
            ));
        }
        out.push('\n');
        out.push_str(&format!("{}</div>", pad));
        Ok(out)
    }
}
