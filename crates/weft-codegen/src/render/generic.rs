//! Generic renderer: tag + resolved attributes + slot children
//!
//! Handles every component whose markup is a plain element shape. The
//! element tag comes from the manifest, overridable by a literal `as`/`tag`
//! prop on the node.

use crate::errors::CodegenError;
use crate::escape::{escape_attr, escape_text};
use crate::expr::{js_literal, ExprContext, ResolvedValue};
use crate::render::{
    is_void, style_to_string, RenderContext, RenderInput, Renderer, DEFAULT_SLOT, INDENT,
    TEXT_CONTENT_PROPS,
};
use serde_json::Value;
use weft_ast::PropValue;

pub struct GenericRenderer;

impl Renderer for GenericRenderer {
    fn render(
        &self,
        input: &RenderInput<'_>,
        ctx: &mut RenderContext<'_>,
    ) -> Result<String, CodegenError> {
        let tag = element_tag(input);
        let text_prop = TEXT_CONTENT_PROPS
            .iter()
            .find(|name| input.resolved_props.contains_key(**name))
            .copied();

        let mut open = input.open_tag(&tag);
        for (name, value) in &input.resolved_props {
            if Some(name.as_str()) == text_prop || name == "as" || name == "tag" {
                continue;
            }
            open.push_str(&prop_attr(name, value, input, ctx)?);
        }

        let text = match text_prop {
            Some(name) => Some(text_code(
                &input.resolved_props[name],
                input,
                ctx,
            )?),
            None => None,
        };

        let mut children = Vec::new();
        let mut next_index = 0;
        for slot in slot_order(input) {
            children.extend(ctx.render_slot(input, &slot, input.depth + 1, &mut next_index)?);
        }

        let pad = input.pad();
        if children.is_empty() {
            if is_void(&tag) && text.is_none() {
                return Ok(format!("{}{} />", pad, open));
            }
            return Ok(format!(
                "{}{}>{}</{}>",
                pad,
                open,
                text.unwrap_or_default(),
                tag
            ));
        }

        let mut out = format!("{}{}>", pad, open);
        if let Some(text) = text {
            if !text.is_empty() {
                out.push('\n');
                out.push_str(&INDENT.repeat(input.depth + 1));
                out.push_str(&text);
            }
        }
        for child in children {
            out.push('\n');
            out.push_str(&child);
        }
        out.push('\n');
        out.push_str(&pad);
        out.push_str(&format!("</{}>", tag));
        Ok(out)
    }
}

/// Manifest tag, overridden by a literal `as` or `tag` prop
fn element_tag(input: &RenderInput<'_>) -> String {
    for name in ["as", "tag"] {
        if let Some(PropValue::Literal(Value::String(tag))) = input.resolved_props.get(name) {
            if !tag.is_empty() {
                return tag.clone();
            }
        }
    }
    input.manifest.tag.to_string()
}

/// Manifest slot order first, then any undeclared node slots in name order
fn slot_order(input: &RenderInput<'_>) -> Vec<String> {
    let mut order: Vec<String> = input
        .manifest
        .slots
        .iter()
        .map(|slot| slot.to_string())
        .collect();
    if order.is_empty() && input.node.slots.contains_key(DEFAULT_SLOT) {
        order.push(DEFAULT_SLOT.to_string());
    }
    for slot in input.node.slots.keys() {
        if !order.iter().any(|known| known == slot) {
            order.push(slot.clone());
        }
    }
    order
}

/// One attribute for a resolved prop value
fn prop_attr(
    name: &str,
    value: &PropValue,
    input: &RenderInput<'_>,
    ctx: &RenderContext<'_>,
) -> Result<String, CodegenError> {
    let resolved = ctx.resolve(value, ExprContext::Template, &input.semantic_id)?;

    if name == "style" {
        return Ok(match resolved {
            ResolvedValue::Literal(Value::Object(map)) => {
                format!(" style=\"{}\"", escape_attr(&style_to_string(&map)))
            }
            ResolvedValue::Literal(Value::String(text)) => {
                format!(" style=\"{}\"", escape_attr(&text))
            }
            ResolvedValue::Literal(other) => {
                format!(" :style=\"{}\"", escape_attr(&other.to_string()))
            }
            ResolvedValue::Expr(expr) => format!(" :style=\"{}\"", escape_attr(&expr.code)),
            ResolvedValue::StateBinding(key) => format!(" :style=\"{}\"", escape_attr(&key)),
        });
    }

    Ok(match resolved {
        ResolvedValue::Literal(Value::String(text)) => {
            format!(" {}=\"{}\"", attr_name(name), escape_attr(&text))
        }
        ResolvedValue::Literal(other) => {
            format!(" :{}=\"{}\"", attr_name(name), escape_attr(&js_literal(&other)))
        }
        ResolvedValue::Expr(expr) => {
            format!(" :{}=\"{}\"", attr_name(name), escape_attr(&expr.code))
        }
        // a state binding is two-way: the bare `value` prop is the model,
        // anything else becomes a named model
        ResolvedValue::StateBinding(key) => {
            if name == "value" || name == "modelValue" {
                format!(" v-model=\"{}\"", escape_attr(&key))
            } else {
                format!(" v-model:{}=\"{}\"", attr_name(name), escape_attr(&key))
            }
        }
    })
}

fn attr_name(name: &str) -> String {
    if name == "className" {
        "class".to_string()
    } else {
        name.to_string()
    }
}

/// Element text for the chosen text-content prop
fn text_code(
    value: &PropValue,
    input: &RenderInput<'_>,
    ctx: &RenderContext<'_>,
) -> Result<String, CodegenError> {
    Ok(
        match ctx.resolve(value, ExprContext::Template, &input.semantic_id)? {
            ResolvedValue::Literal(Value::String(text)) => escape_text(&text),
            ResolvedValue::Literal(other) => escape_text(&other.to_string()),
            ResolvedValue::Expr(expr) => format!("{{{{ {} }}}}", expr.code),
            ResolvedValue::StateBinding(key) => format!("{{{{ {} }}}}", key),
        },
    )
}
