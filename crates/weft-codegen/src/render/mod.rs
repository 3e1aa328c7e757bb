//! Component renderer dispatch
//!
//! A registry maps component type to a renderer; the generic renderer is
//! the fallback for everything without a specialized markup shape. All
//! renderers are pure functions of their inputs - the context only carries
//! the traversal accumulators (assigned ids, collected handlers).

pub mod collections;
pub mod effects;
pub mod generic;
pub mod navigation;

use crate::errors::CodegenError;
use crate::escape::escape_attr;
use crate::events::{compile_handlers, handler_name, HandlerFn};
use crate::expr::{resolve_expression, resolve_value, ExprContext, ResolvedValue, StateScope};
use crate::ids::IdGenerator;
use ahash::AHashMap;
use serde_json::Value;
use std::collections::BTreeMap;
use weft_ast::{AstNode, Condition, DynamicValue, PropValue};
use weft_manifest::{ComponentManifest, ManifestRegistry};

/// The implicit child slot name
pub const DEFAULT_SLOT: &str = "default";

/// Props rendered as element text content by the generic renderer
pub const TEXT_CONTENT_PROPS: &[&str] = &["content", "text", "label"];

/// Indent unit for emitted markup
pub const INDENT: &str = "  ";

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Everything a renderer needs about the node being rendered
pub struct RenderInput<'a> {
    pub node: &'a AstNode,
    pub manifest: &'a ComponentManifest,
    /// Node props with variant presets and manifest defaults merged under
    /// them (node wins field-by-field)
    pub resolved_props: BTreeMap<String, PropValue>,
    pub semantic_id: String,
    /// Pre-built directive attributes (`v-if`, event bindings)
    pub directives: String,
    pub depth: usize,
}

impl RenderInput<'_> {
    pub fn pad(&self) -> String {
        INDENT.repeat(self.depth)
    }

    /// Opening tag text through the common attributes: `<tag id="..." ...`
    pub fn open_tag(&self, tag: &str) -> String {
        format!(
            "<{} id=\"{}\"{}",
            tag,
            escape_attr(&self.semantic_id),
            self.directives
        )
    }
}

/// Per-component-type rendering strategy
pub trait Renderer {
    fn render(
        &self,
        input: &RenderInput<'_>,
        ctx: &mut RenderContext<'_>,
    ) -> Result<String, CodegenError>;
}

/// Registry of specialized renderers plus the generic fallback
pub struct RendererSet {
    special: AHashMap<&'static str, Box<dyn Renderer + Send + Sync>>,
    generic: generic::GenericRenderer,
}

impl RendererSet {
    /// The standard set: every specialized component shipped with weft
    pub fn standard() -> Self {
        let mut special: AHashMap<&'static str, Box<dyn Renderer + Send + Sync>> = AHashMap::new();
        special.insert("List", Box::new(collections::ListRenderer));
        special.insert("Table", Box::new(collections::TableRenderer));
        special.insert("CardGrid", Box::new(collections::CardGridRenderer));
        special.insert("Stepper", Box::new(collections::StepperRenderer));
        special.insert("Collapsible", Box::new(effects::CollapsibleRenderer));
        special.insert("FlipCard", Box::new(effects::FlipCardRenderer));
        special.insert("ParticleField", Box::new(effects::ParticleFieldRenderer));
        special.insert("NavBar", Box::new(navigation::NavBarRenderer));
        RendererSet {
            special,
            generic: generic::GenericRenderer,
        }
    }

    fn renderer_for(&self, manifest: &ComponentManifest) -> &dyn Renderer {
        if manifest.special_rendering {
            if let Some(renderer) = self.special.get(manifest.component_name.as_ref()) {
                return renderer.as_ref();
            }
            tracing::warn!(
                component = %manifest.component_name,
                "manifest requests specialized rendering but none is registered; using generic"
            );
        }
        &self.generic
    }
}

/// Traversal state for one page render
pub struct RenderContext<'a> {
    set: &'a RendererSet,
    registry: &'a ManifestRegistry,
    scope: StateScope<'a>,
    ids: IdGenerator,
    handlers: Vec<HandlerFn>,
}

impl<'a> RenderContext<'a> {
    pub fn new(set: &'a RendererSet, registry: &'a ManifestRegistry, scope: StateScope<'a>) -> Self {
        RenderContext {
            set,
            registry,
            scope,
            ids: IdGenerator::new(),
            handlers: Vec::new(),
        }
    }

    pub fn scope(&self) -> StateScope<'a> {
        self.scope
    }

    /// Handlers collected across the whole traversal, in visit order
    pub fn into_handlers(self) -> Vec<HandlerFn> {
        self.handlers
    }

    /// Id for a positional, list-derived child of `parent`
    pub fn item_id(&mut self, parent: &str, index: usize) -> String {
        self.ids.assign_item(parent, index)
    }

    /// Resolve a prop value against the page's state scope
    pub fn resolve(
        &self,
        value: &PropValue,
        context: ExprContext,
        node: &str,
    ) -> Result<ResolvedValue, CodegenError> {
        resolve_value(value, context, self.scope, node)
    }

    /// Render one node: manifest lookup, id assignment, variant merge,
    /// handler compilation, then dispatch to its renderer
    pub fn render_child(
        &mut self,
        node: &AstNode,
        parent_id: &str,
        index_in_parent: usize,
        depth: usize,
    ) -> Result<String, CodegenError> {
        let set = self.set;
        let registry = self.registry;

        let manifest =
            registry
                .get(&node.component)
                .ok_or_else(|| CodegenError::ManifestNotFound {
                    component: node.component.clone(),
                    node: node
                        .id
                        .clone()
                        .unwrap_or_else(|| format!("{}#{}", parent_id, index_in_parent)),
                })?;

        let semantic_id = self.ids.assign(parent_id, node, index_in_parent);
        let resolved_props = merge_props(node, manifest);

        let mut directives = String::new();
        if let Some(condition) = &node.condition {
            let code = self.condition_code(condition, &semantic_id)?;
            directives.push_str(&format!(" v-if=\"{}\"", escape_attr(&code)));
        }
        for (event, actions) in &node.events {
            if actions.is_empty() {
                continue;
            }
            directives.push_str(&format!(
                " @{}=\"{}\"",
                event,
                handler_name(&semantic_id, event)
            ));
        }

        let node_handlers = compile_handlers(node, &semantic_id, self.scope)?;
        self.handlers.extend(node_handlers);

        let input = RenderInput {
            node,
            manifest,
            resolved_props,
            semantic_id,
            directives,
            depth,
        };

        set.renderer_for(manifest).render(&input, self)
    }

    /// Render every child of a slot, continuing the running child index
    pub fn render_slot(
        &mut self,
        input: &RenderInput<'_>,
        slot: &str,
        depth: usize,
        next_index: &mut usize,
    ) -> Result<Vec<String>, CodegenError> {
        let mut rendered = Vec::new();
        for child in input.node.slot_children(slot) {
            rendered.push(self.render_child(child, &input.semantic_id, *next_index, depth)?);
            *next_index += 1;
        }
        Ok(rendered)
    }

    fn condition_code(
        &self,
        condition: &Condition,
        node: &str,
    ) -> Result<String, CodegenError> {
        match condition {
            Condition::StateKey(key) => {
                if !self.scope.contains(key) {
                    return Err(CodegenError::UnresolvedStateReference {
                        key: key.clone(),
                        node: node.to_string(),
                    });
                }
                Ok(key.clone())
            }
            Condition::Dynamic(DynamicValue::Expression { value }) => {
                Ok(resolve_expression(value, ExprContext::Template, self.scope, node)?.code)
            }
            Condition::Dynamic(DynamicValue::StateBinding { state_key }) => {
                if !self.scope.contains(state_key) {
                    return Err(CodegenError::UnresolvedStateReference {
                        key: state_key.clone(),
                        node: node.to_string(),
                    });
                }
                Ok(state_key.clone())
            }
        }
    }
}

/// Merge variant presets and manifest defaults under a node's own props
///
/// Node wins on conflict; object-valued fields (chiefly `style`) merge
/// field-by-field with the node's fields on top.
pub fn merge_props(node: &AstNode, manifest: &ComponentManifest) -> BTreeMap<String, PropValue> {
    let mut merged = node.props.clone();

    if let Some(variant) = node
        .variant
        .as_deref()
        .and_then(|name| manifest.variant(name))
    {
        for (name, preset) in &variant.props {
            match merged.get_mut(name.as_ref()) {
                None => {
                    merged.insert(name.to_string(), PropValue::Literal(preset.clone()));
                }
                Some(PropValue::Literal(Value::Object(own))) => {
                    if let Value::Object(preset_fields) = preset {
                        let mut combined = preset_fields.clone();
                        for (key, value) in own.iter() {
                            combined.insert(key.clone(), value.clone());
                        }
                        *own = combined;
                    }
                }
                Some(_) => {}
            }
        }
    }

    for (name, spec) in &manifest.props {
        if let Some(default) = &spec.default {
            merged
                .entry(name.to_string())
                .or_insert_with(|| PropValue::Literal(default.clone()));
        }
    }

    merged
}

/// Inline style text from a style object (`boxShadow` -> `box-shadow`)
pub fn style_to_string(style: &serde_json::Map<String, Value>) -> String {
    style
        .iter()
        .map(|(key, value)| format!("{}: {}", css_key(key), css_value(value)))
        .collect::<Vec<_>>()
        .join("; ")
}

/// CSS property name for a camelCase style key; custom properties pass through
fn css_key(key: &str) -> String {
    if key.starts_with("--") {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len() + 2);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn css_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Whether a tag is a void element (no closing tag)
pub fn is_void(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}
