//! Document types for the stored JSON sources
//!
//! Maps are BTreeMaps so a document always serializes with a canonical key
//! order; content hashing and artifact emission both rely on that.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// =============================================================================
// AST NODE
// =============================================================================

/// One component instance in a page tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstNode {
    /// User-supplied semantic hint; not yet globally unique
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Component type; must resolve to a loaded manifest
    #[serde(rename = "type")]
    pub component: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: BTreeMap<String, PropValue>,

    /// Named variant defined on the component's manifest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    /// Slot name -> ordered child list
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub slots: BTreeMap<String, Vec<AstNode>>,

    /// Event name -> ordered action list
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub events: BTreeMap<String, Vec<Action>>,

    /// Conditional-render directive: a state key or a boolean expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl AstNode {
    /// Bare node of the given component type
    pub fn new(component: impl Into<String>) -> Self {
        AstNode {
            id: None,
            component: component.into(),
            props: BTreeMap::new(),
            variant: None,
            slots: BTreeMap::new(),
            events: BTreeMap::new(),
            condition: None,
        }
    }

    /// Children of a named slot, empty if the slot is unpopulated
    pub fn slot_children(&self, slot: &str) -> &[AstNode] {
        self.slots.get(slot).map_or(&[], Vec::as_slice)
    }
}

// =============================================================================
// PROP VALUES
// =============================================================================

/// A prop or action-field value: plain literal, embedded expression, or a
/// direct two-way state binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Dynamic(DynamicValue),
    Literal(Value),
}

/// The tagged dynamic value forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DynamicValue {
    /// `{type:"expression", value}` - value may embed `${state.KEY}` tokens
    Expression { value: String },
    /// `{type:"stateBinding", stateKey}` - direct two-way binding
    #[serde(rename_all = "camelCase")]
    StateBinding { state_key: String },
}

impl PropValue {
    pub fn literal(value: impl Into<Value>) -> Self {
        PropValue::Literal(value.into())
    }

    pub fn expression(value: impl Into<String>) -> Self {
        PropValue::Dynamic(DynamicValue::Expression {
            value: value.into(),
        })
    }

    pub fn state_binding(state_key: impl Into<String>) -> Self {
        PropValue::Dynamic(DynamicValue::StateBinding {
            state_key: state_key.into(),
        })
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            PropValue::Literal(value) => Some(value),
            PropValue::Dynamic(_) => None,
        }
    }
}

/// Conditional-render directive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    Dynamic(DynamicValue),
    /// Bare state key, truthiness-gated
    StateKey(String),
}

// =============================================================================
// EVENT ACTIONS
// =============================================================================

/// One step of an event handler, executed in declared order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    #[serde(rename = "action:setState", rename_all = "camelCase")]
    SetState { state_key: String, value: PropValue },

    #[serde(rename = "action:showAlert")]
    ShowAlert { message: PropValue },

    #[serde(rename = "action:scrollTo")]
    ScrollTo { target: PropValue },
}

// =============================================================================
// PAGE AST
// =============================================================================

/// Declared reactive state variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateVar {
    #[serde(rename = "type")]
    pub var_type: String,
    #[serde(rename = "defaultValue")]
    pub default_value: Value,
}

/// One page: declared reactive state plus the component tree
///
/// Invariant: every state key referenced by any expression or state binding
/// in `tree` must exist in `state`; the resolver rejects the page otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageAst {
    #[serde(default)]
    pub state: BTreeMap<String, StateVar>,
    pub tree: AstNode,
}

// =============================================================================
// PROJECT CONFIG
// =============================================================================

/// Cross-page (shared) component slot in the project config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedComponent {
    pub enabled: bool,
    pub ast: Option<AstNode>,
}

/// One page entry in the project config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEntry {
    pub name: String,
    pub path: String,
    pub ast_file: String,
}

/// Project-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub project_name: String,

    /// Opaque style text embedded in the app shell artifact
    #[serde(default)]
    pub global_styles: String,

    #[serde(default)]
    pub shared_components: BTreeMap<String, SharedComponent>,

    /// Ordered page list
    #[serde(default)]
    pub pages: Vec<PageEntry>,
}

impl ProjectConfig {
    pub fn page(&self, name: &str) -> Option<&PageEntry> {
        self.pages.iter().find(|p| p.name == name)
    }

    /// Enabled shared components with an AST, in name order
    pub fn enabled_shared(&self) -> impl Iterator<Item = (&String, &AstNode)> {
        self.shared_components
            .iter()
            .filter(|(_, shared)| shared.enabled)
            .filter_map(|(name, shared)| shared.ast.as_ref().map(|ast| (name, ast)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prop_value_forms_deserialize() {
        let literal: PropValue = serde_json::from_value(json!("Hello")).expect("literal");
        assert_eq!(literal, PropValue::literal("Hello"));

        let expr: PropValue =
            serde_json::from_value(json!({"type": "expression", "value": "${state.count} + 1"}))
                .expect("expression");
        assert_eq!(expr, PropValue::expression("${state.count} + 1"));

        let binding: PropValue =
            serde_json::from_value(json!({"type": "stateBinding", "stateKey": "name"}))
                .expect("binding");
        assert_eq!(binding, PropValue::state_binding("name"));
    }

    #[test]
    fn test_prop_value_round_trip() {
        let expr = PropValue::expression("${state.count} * 2");
        let value = serde_json::to_value(&expr).expect("serialize");
        assert_eq!(value, json!({"type": "expression", "value": "${state.count} * 2"}));
        let back: PropValue = serde_json::from_value(value).expect("parse");
        assert_eq!(back, expr);
    }

    #[test]
    fn test_action_deserialize() {
        let action: Action = serde_json::from_value(json!({
            "type": "action:setState",
            "stateKey": "count",
            "value": {"type": "expression", "value": "${state.count} + 1"}
        }))
        .expect("action");

        assert!(matches!(
            action,
            Action::SetState { ref state_key, .. } if state_key == "count"
        ));
    }

    #[test]
    fn test_page_ast_parse() {
        let page: PageAst = serde_json::from_value(json!({
            "state": {"count": {"type": "number", "defaultValue": 0}},
            "tree": {
                "id": "root",
                "type": "Box",
                "props": {},
                "slots": {"default": []}
            }
        }))
        .expect("page");

        assert_eq!(page.state.len(), 1);
        assert_eq!(page.tree.component, "Box");
        assert_eq!(page.tree.id.as_deref(), Some("root"));
        assert!(page.tree.slot_children("default").is_empty());
    }

    #[test]
    fn test_condition_forms() {
        let node: AstNode = serde_json::from_value(json!({
            "type": "Box",
            "condition": "visible"
        }))
        .expect("node");
        assert_eq!(node.condition, Some(Condition::StateKey("visible".into())));

        let node: AstNode = serde_json::from_value(json!({
            "type": "Box",
            "condition": {"type": "expression", "value": "${state.count} % 2"}
        }))
        .expect("node");
        assert!(matches!(node.condition, Some(Condition::Dynamic(_))));
    }

    #[test]
    fn test_project_config_parse() {
        let config: ProjectConfig = serde_json::from_value(json!({
            "projectName": "demo",
            "globalStyles": "body { margin: 0; }",
            "sharedComponents": {
                "nav": {"enabled": true, "ast": {"type": "NavBar"}},
                "footer": {"enabled": false, "ast": null}
            },
            "pages": [
                {"name": "home", "path": "/", "astFile": "pages/home.json"}
            ]
        }))
        .expect("config");

        assert_eq!(config.project_name, "demo");
        assert!(config.page("home").is_some());
        assert!(config.page("missing").is_none());
        let enabled: Vec<_> = config.enabled_shared().collect();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].0, "nav");
    }

    #[test]
    fn test_canonical_key_order() {
        let node: AstNode = serde_json::from_value(json!({
            "type": "Box",
            "props": {"zeta": "z", "alpha": "a"}
        }))
        .expect("node");

        let serialized = serde_json::to_string(&node).expect("serialize");
        let alpha = serialized.find("alpha").expect("alpha present");
        let zeta = serialized.find("zeta").expect("zeta present");
        assert!(alpha < zeta);
    }
}
