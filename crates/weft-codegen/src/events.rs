//! Event handler synthesis
//!
//! Every (node, event) pair with declared actions becomes one named handler.
//! The name is the sanitized semantic id joined with the event name; the
//! body runs the actions in declared order, best-effort - a failing action
//! does not roll back the ones before it.

use crate::errors::CodegenError;
use crate::expr::{js_literal, resolve_value, ExprContext, ResolvedValue, StateScope};
use crate::ids::sanitize_identifier;
use weft_ast::{Action, AstNode};

/// One generated handler function
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerFn {
    pub name: String,
    pub body: Vec<String>,
}

impl HandlerFn {
    /// Render the function source with the given indent unit
    pub fn source(&self, indent: &str) -> String {
        let mut out = format!("function {}() {{\n", self.name);
        for line in &self.body {
            out.push_str(indent);
            out.push_str(line);
            out.push('\n');
        }
        out.push('}');
        out
    }
}

/// Handler name for a node event: sanitized id + `_` + event
pub fn handler_name(semantic_id: &str, event: &str) -> String {
    format!(
        "{}_{}",
        sanitize_identifier(semantic_id),
        sanitize_identifier(event)
    )
}

/// Compile every declared event of a node into named handlers
///
/// Returned in event-name order (the events map is ordered), so generation
/// is deterministic.
pub fn compile_handlers(
    node: &AstNode,
    semantic_id: &str,
    scope: StateScope<'_>,
) -> Result<Vec<HandlerFn>, CodegenError> {
    let mut handlers = Vec::new();

    for (event, actions) in &node.events {
        if actions.is_empty() {
            continue;
        }

        let mut body = Vec::with_capacity(actions.len());
        for action in actions {
            body.push(compile_action(action, scope, semantic_id)?);
        }

        handlers.push(HandlerFn {
            name: handler_name(semantic_id, event),
            body,
        });
    }

    Ok(handlers)
}

/// One statement per action, in handler (statement) context
fn compile_action(
    action: &Action,
    scope: StateScope<'_>,
    node: &str,
) -> Result<String, CodegenError> {
    match action {
        Action::SetState { state_key, value } => {
            if !scope.contains(state_key) {
                return Err(CodegenError::UnresolvedStateReference {
                    key: state_key.clone(),
                    node: node.to_string(),
                });
            }
            let rhs = value_code(value, scope, node)?;
            Ok(format!("{}.value = {}", state_key, rhs))
        }
        Action::ShowAlert { message } => {
            let message = value_code(message, scope, node)?;
            Ok(format!("window.alert({})", message))
        }
        Action::ScrollTo { target } => {
            let target = value_code(target, scope, node)?;
            Ok(format!(
                "document.querySelector({})?.scrollIntoView({{ behavior: 'smooth' }})",
                target
            ))
        }
    }
}

/// JS expression for an action-field value in handler context
fn value_code(
    value: &weft_ast::PropValue,
    scope: StateScope<'_>,
    node: &str,
) -> Result<String, CodegenError> {
    Ok(
        match resolve_value(value, ExprContext::Handler, scope, node)? {
            ResolvedValue::Literal(literal) => js_literal(&literal),
            ResolvedValue::Expr(expr) => expr.code,
            ResolvedValue::StateBinding(key) => format!("{}.value", key),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;
    use weft_ast::{PropValue, StateVar};

    fn counter_state() -> BTreeMap<String, StateVar> {
        let mut state = BTreeMap::new();
        state.insert(
            "count".to_string(),
            StateVar {
                var_type: "number".to_string(),
                default_value: json!(0),
            },
        );
        state
    }

    fn click_node(actions: Vec<Action>) -> AstNode {
        let mut node = AstNode::new("Button");
        node.events.insert("click".to_string(), actions);
        node
    }

    #[test]
    fn test_set_state_increment() {
        let state = counter_state();
        let node = click_node(vec![Action::SetState {
            state_key: "count".to_string(),
            value: PropValue::expression("${state.count} + 1"),
        }]);

        let handlers =
            compile_handlers(&node, "root.button.plus", StateScope::new(&state)).expect("compile");
        assert_eq!(handlers.len(), 1);
        assert_eq!(handlers[0].name, "root_button_plus_click");
        assert_eq!(handlers[0].body, vec!["count.value = count.value + 1"]);
    }

    #[test]
    fn test_actions_in_declared_order() {
        let state = counter_state();
        let node = click_node(vec![
            Action::SetState {
                state_key: "count".to_string(),
                value: PropValue::literal(0),
            },
            Action::ShowAlert {
                message: PropValue::expression("Count reset to ${state.count}"),
            },
            Action::ScrollTo {
                target: PropValue::literal("#top"),
            },
        ]);

        let handlers =
            compile_handlers(&node, "root.button", StateScope::new(&state)).expect("compile");
        assert_eq!(
            handlers[0].body,
            vec![
                "count.value = 0",
                "window.alert(`Count reset to ${count.value}`)",
                "document.querySelector('#top')?.scrollIntoView({ behavior: 'smooth' })",
            ]
        );
    }

    #[test]
    fn test_unknown_state_key_rejected() {
        let state = counter_state();
        let node = click_node(vec![Action::SetState {
            state_key: "missing".to_string(),
            value: PropValue::literal(1),
        }]);

        let err = compile_handlers(&node, "root.button", StateScope::new(&state))
            .expect_err("must fail");
        assert!(matches!(
            err,
            CodegenError::UnresolvedStateReference { ref key, .. } if key == "missing"
        ));
    }

    #[test]
    fn test_handler_source() {
        let handler = HandlerFn {
            name: "root_button_click".to_string(),
            body: vec!["count.value = 1".to_string()],
        };
        assert_eq!(
            handler.source("  "),
            "function root_button_click() {\n  count.value = 1\n}"
        );
    }

    #[test]
    fn test_empty_action_list_yields_no_handler() {
        let state = counter_state();
        let node = click_node(Vec::new());
        let handlers =
            compile_handlers(&node, "root.button", StateScope::new(&state)).expect("compile");
        assert!(handlers.is_empty());
    }
}
