//! Specialized renderers for list-shaped components
//!
//! These synthesize children from array props rather than expecting
//! explicit child nodes; every synthesized element gets a positional
//! `.item-N` id.

use crate::errors::CodegenError;
use crate::escape::{escape_attr, escape_text};
use crate::expr::{ExprContext, ResolvedValue};
use crate::render::{RenderContext, RenderInput, Renderer, DEFAULT_SLOT, INDENT};
use serde_json::Value;
use weft_ast::PropValue;

/// Literal array prop, or a clear error naming the node
fn literal_items<'a>(
    input: &'a RenderInput<'_>,
    prop: &str,
) -> Result<&'a [Value], CodegenError> {
    match input.resolved_props.get(prop) {
        None => Ok(&[]),
        Some(PropValue::Literal(Value::Array(items))) => Ok(items),
        Some(_) => Err(CodegenError::InvalidProp {
            node: input.semantic_id.clone(),
            prop: prop.to_string(),
            reason: "expected a literal array".to_string(),
        }),
    }
}

fn item_text(value: &Value) -> String {
    match value {
        Value::String(text) => escape_text(text),
        other => escape_text(&other.to_string()),
    }
}

fn literal_number(input: &RenderInput<'_>, prop: &str) -> Option<f64> {
    match input.resolved_props.get(prop) {
        Some(PropValue::Literal(Value::Number(n))) => n.as_f64(),
        _ => None,
    }
}

fn literal_string(input: &RenderInput<'_>, prop: &str) -> Option<String> {
    match input.resolved_props.get(prop) {
        Some(PropValue::Literal(Value::String(s))) => Some(s.clone()),
        _ => None,
    }
}

// =============================================================================
// LIST
// =============================================================================

/// `items: string[]` -> one `<li>` per item
pub struct ListRenderer;

impl Renderer for ListRenderer {
    fn render(
        &self,
        input: &RenderInput<'_>,
        ctx: &mut RenderContext<'_>,
    ) -> Result<String, CodegenError> {
        let ordered = matches!(
            input.resolved_props.get("ordered"),
            Some(PropValue::Literal(Value::Bool(true)))
        );
        let tag = if ordered { "ol" } else { "ul" };
        let items = literal_items(input, "items")?;

        let pad = input.pad();
        let inner = INDENT.repeat(input.depth + 1);
        let mut out = format!("{}{} class=\"list\">", pad, input.open_tag(tag));
        for (index, item) in items.iter().enumerate() {
            let id = ctx.item_id(&input.semantic_id, index);
            out.push('\n');
            out.push_str(&format!(
                "{}<li id=\"{}\">{}</li>",
                inner,
                escape_attr(&id),
                item_text(item)
            ));
        }
        out.push('\n');
        out.push_str(&format!("{}</{}>", pad, tag));
        Ok(out)
    }
}

// =============================================================================
// TABLE
// =============================================================================

/// `columns: string[]` and `rows: any[][]` -> thead/tbody shape
pub struct TableRenderer;

impl Renderer for TableRenderer {
    fn render(
        &self,
        input: &RenderInput<'_>,
        ctx: &mut RenderContext<'_>,
    ) -> Result<String, CodegenError> {
        let columns = literal_items(input, "columns")?;
        let rows = literal_items(input, "rows")?;

        let pad = input.pad();
        let d1 = INDENT.repeat(input.depth + 1);
        let d2 = INDENT.repeat(input.depth + 2);
        let d3 = INDENT.repeat(input.depth + 3);

        let mut out = format!("{}{}>", pad, input.open_tag("table"));

        out.push_str(&format!("\n{}<thead>\n{}<tr>", d1, d2));
        for column in columns {
            out.push_str(&format!("\n{}<th>{}</th>", d3, item_text(column)));
        }
        out.push_str(&format!("\n{}</tr>\n{}</thead>", d2, d1));

        out.push_str(&format!("\n{}<tbody>", d1));
        for (index, row) in rows.iter().enumerate() {
            let id = ctx.item_id(&input.semantic_id, index);
            out.push_str(&format!("\n{}<tr id=\"{}\">", d2, escape_attr(&id)));
            let cells: &[Value] = match row {
                Value::Array(cells) => cells,
                single => std::slice::from_ref(single),
            };
            for cell in cells {
                out.push_str(&format!("\n{}<td>{}</td>", d3, item_text(cell)));
            }
            out.push_str(&format!("\n{}</tr>", d2));
        }
        out.push_str(&format!("\n{}</tbody>\n{}</table>", d1, pad));
        Ok(out)
    }
}

// =============================================================================
// CARD GRID
// =============================================================================

/// Grid wrapper around explicit default-slot children
pub struct CardGridRenderer;

impl Renderer for CardGridRenderer {
    fn render(
        &self,
        input: &RenderInput<'_>,
        ctx: &mut RenderContext<'_>,
    ) -> Result<String, CodegenError> {
        let columns = literal_number(input, "columns").unwrap_or(3.0) as usize;
        let gap = literal_string(input, "gap").unwrap_or_else(|| "1rem".to_string());
        let style = format!(
            "display: grid; grid-template-columns: repeat({}, 1fr); gap: {}",
            columns.max(1),
            gap
        );

        let pad = input.pad();
        let mut out = format!(
            "{}{} class=\"card-grid\" style=\"{}\">",
            pad,
            input.open_tag("div"),
            escape_attr(&style)
        );

        let mut next_index = 0;
        for child in ctx.render_slot(input, DEFAULT_SLOT, input.depth + 1, &mut next_index)? {
            out.push('\n');
            out.push_str(&child);
        }
        out.push('\n');
        out.push_str(&format!("{}</div>", pad));
        Ok(out)
    }
}

// =============================================================================
// STEPPER
// =============================================================================

/// `steps: string[]` with an optional current-step marker
pub struct StepperRenderer;

impl Renderer for StepperRenderer {
    fn render(
        &self,
        input: &RenderInput<'_>,
        ctx: &mut RenderContext<'_>,
    ) -> Result<String, CodegenError> {
        let steps = literal_items(input, "steps")?;

        // the current step may be a literal index or a reactive expression
        let current = input.resolved_props.get("current").cloned();
        let current = match current {
            None => None,
            Some(value) => Some(ctx.resolve(&value, ExprContext::Template, &input.semantic_id)?),
        };

        let pad = input.pad();
        let inner = INDENT.repeat(input.depth + 1);
        let mut out = format!("{}{} class=\"stepper\">", pad, input.open_tag("ol"));

        for (index, step) in steps.iter().enumerate() {
            let id = ctx.item_id(&input.semantic_id, index);
            let class = match &current {
                Some(ResolvedValue::Literal(Value::Number(n)))
                    if n.as_u64() == Some(index as u64) =>
                {
                    " class=\"step active\"".to_string()
                }
                Some(ResolvedValue::Expr(expr)) => format!(
                    " class=\"step\" :class=\"{{ active: ({}) === {} }}\"",
                    escape_attr(&expr.code),
                    index
                ),
                Some(ResolvedValue::StateBinding(key)) => format!(
                    " class=\"step\" :class=\"{{ active: {} === {} }}\"",
                    escape_attr(key),
                    index
                ),
                _ => " class=\"step\"".to_string(),
            };
            out.push('\n');
            out.push_str(&format!(
                "{}<li id=\"{}\"{}>{}</li>",
                inner,
                escape_attr(&id),
                class,
                item_text(step)
            ));
        }

        out.push('\n');
        out.push_str(&format!("{}</ol>", pad));
        Ok(out)
    }
}
