//! Expression resolution: embedded prop values to target-language code
//!
//! Every value is classified exactly once into a tagged variant
//! (Literal | PureExpression | Interpolation | StateBinding); the two
//! substitution paths are never re-derived at a use site. The pure-vs-
//! interpolated split uses the restricted-character-class heuristic from the
//! original pipeline: identifiers, numeric literals, the operators
//! `+ - * / % ! ( ) .`, whitespace, and `${state.KEY}` tokens.

use crate::errors::CodegenError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use weft_ast::{DynamicValue, PropValue, StateVar};

#[allow(clippy::expect_used)]
static STATE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{state\.([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid pattern"));

#[allow(clippy::expect_used)]
static PURE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_+\-*/%!().\s]*$").expect("valid pattern"));

#[allow(clippy::expect_used)]
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid pattern"));

/// Where resolved code is emitted: expression position in markup, or
/// statement position inside a generated handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprContext {
    Template,
    Handler,
}

/// Classification of an expression value, decided once per value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    /// Restricted grammar of identifiers, numbers, and operators
    Pure,
    /// Free text with embedded tokens; substituted via string interpolation
    Interpolated,
}

/// A resolved expression: its classification plus context-specific code
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedExpr {
    pub kind: ExprKind,
    pub code: String,
}

/// A fully resolved prop or action-field value
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    Literal(Value),
    Expr(ResolvedExpr),
    /// Two-way binding to the named state variable
    StateBinding(String),
}

/// Declared state keys in scope while resolving a page
#[derive(Debug, Clone, Copy)]
pub struct StateScope<'a> {
    state: Option<&'a BTreeMap<String, StateVar>>,
}

impl<'a> StateScope<'a> {
    pub fn new(state: &'a BTreeMap<String, StateVar>) -> Self {
        StateScope { state: Some(state) }
    }

    /// Scope with no declared state (shared/app-shell components)
    pub fn empty() -> Self {
        StateScope { state: None }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.is_some_and(|state| state.contains_key(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a String> {
        self.state.into_iter().flat_map(BTreeMap::keys)
    }
}

/// Whether a name is usable as a generated identifier
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Classify a raw expression value
///
/// The token-stripped remainder decides: only restricted-grammar characters
/// mean a pure computed expression, anything else is an interpolated string.
pub fn classify(raw: &str) -> ExprKind {
    let stripped = STATE_TOKEN.replace_all(raw, "");
    if PURE_CHARS.is_match(&stripped) {
        ExprKind::Pure
    } else {
        ExprKind::Interpolated
    }
}

/// Reactive read of a state key in the given context
fn state_read(key: &str, context: ExprContext) -> String {
    match context {
        ExprContext::Template => key.to_string(),
        ExprContext::Handler => format!("{}.value", key),
    }
}

/// Check every `${state.KEY}` token against the scope
fn check_tokens(raw: &str, scope: StateScope<'_>, node: &str) -> Result<(), CodegenError> {
    for captures in STATE_TOKEN.captures_iter(raw) {
        let key = &captures[1];
        if !scope.contains(key) {
            return Err(CodegenError::UnresolvedStateReference {
                key: key.to_string(),
                node: node.to_string(),
            });
        }
    }
    Ok(())
}

/// Escape a literal segment for inclusion in a JS template literal
fn escape_template_segment(segment: &str) -> String {
    segment
        .replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

/// Resolve a raw expression value into target code for the given context
pub fn resolve_expression(
    raw: &str,
    context: ExprContext,
    scope: StateScope<'_>,
    node: &str,
) -> Result<ResolvedExpr, CodegenError> {
    check_tokens(raw, scope, node)?;
    let kind = classify(raw);

    let code = match kind {
        ExprKind::Pure => STATE_TOKEN
            .replace_all(raw, |captures: &regex::Captures<'_>| {
                state_read(&captures[1], context)
            })
            .into_owned(),
        ExprKind::Interpolated => {
            let mut out = String::from("`");
            let mut last = 0;
            for captures in STATE_TOKEN.captures_iter(raw) {
                let whole = captures.get(0).map_or(0..0, |m| m.range());
                out.push_str(&escape_template_segment(&raw[last..whole.start]));
                out.push_str("${");
                out.push_str(&state_read(&captures[1], context));
                out.push('}');
                last = whole.end;
            }
            out.push_str(&escape_template_segment(&raw[last..]));
            out.push('`');
            out
        }
    };

    Ok(ResolvedExpr { kind, code })
}

/// Resolve a prop or action-field value
pub fn resolve_value(
    value: &PropValue,
    context: ExprContext,
    scope: StateScope<'_>,
    node: &str,
) -> Result<ResolvedValue, CodegenError> {
    match value {
        PropValue::Literal(literal) => Ok(ResolvedValue::Literal(literal.clone())),
        PropValue::Dynamic(DynamicValue::Expression { value: raw }) => Ok(ResolvedValue::Expr(
            resolve_expression(raw, context, scope, node)?,
        )),
        PropValue::Dynamic(DynamicValue::StateBinding { state_key }) => {
            if !scope.contains(state_key) {
                return Err(CodegenError::UnresolvedStateReference {
                    key: state_key.clone(),
                    node: node.to_string(),
                });
            }
            Ok(ResolvedValue::StateBinding(state_key.clone()))
        }
    }
}

/// JS source for a literal value (single-quoted strings)
pub fn js_literal(value: &Value) -> String {
    match value {
        Value::String(text) => js_string(text),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Single-quoted JS string literal
pub fn js_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scope_with(keys: &[&str]) -> BTreeMap<String, StateVar> {
        keys.iter()
            .map(|key| {
                (
                    (*key).to_string(),
                    StateVar {
                        var_type: "number".to_string(),
                        default_value: json!(0),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_classify_pure() {
        assert_eq!(classify("${state.count} + 1"), ExprKind::Pure);
        assert_eq!(classify("${state.a} * (${state.b} % 2)"), ExprKind::Pure);
        assert_eq!(classify("!${state.visible}"), ExprKind::Pure);
        assert_eq!(classify("42"), ExprKind::Pure);
    }

    #[test]
    fn test_classify_interpolated() {
        assert_eq!(classify("Count is ${state.count}!?"), ExprKind::Interpolated);
        assert_eq!(classify("hello, world"), ExprKind::Interpolated);
        // unusual but valid operators fall to interpolation; the original
        // heuristic is preserved rather than widened
        assert_eq!(classify("${state.a} > 2"), ExprKind::Interpolated);
    }

    #[test]
    fn test_resolve_pure_template_and_handler() {
        let state = scope_with(&["count"]);
        let scope = StateScope::new(&state);

        let template =
            resolve_expression("${state.count} + 1", ExprContext::Template, scope, "n").expect("resolve");
        assert_eq!(template.code, "count + 1");
        assert_eq!(template.kind, ExprKind::Pure);

        let handler =
            resolve_expression("${state.count} + 1", ExprContext::Handler, scope, "n").expect("resolve");
        assert_eq!(handler.code, "count.value + 1");
    }

    #[test]
    fn test_resolve_interpolation() {
        let state = scope_with(&["name"]);
        let scope = StateScope::new(&state);

        let template =
            resolve_expression("Hello, ${state.name}!", ExprContext::Template, scope, "n")
                .expect("resolve");
        assert_eq!(template.code, "`Hello, ${name}!`");

        let handler = resolve_expression("Hello, ${state.name}!", ExprContext::Handler, scope, "n")
            .expect("resolve");
        assert_eq!(handler.code, "`Hello, ${name.value}!`");
    }

    #[test]
    fn test_interpolation_escapes_backticks_and_raw_dollars() {
        let state = scope_with(&["x"]);
        let scope = StateScope::new(&state);
        let resolved = resolve_expression("a `b` ${c} ${state.x}", ExprContext::Template, scope, "n")
            .expect("resolve");
        assert_eq!(resolved.code, "`a \\`b\\` \\${c} ${x}`");
    }

    #[test]
    fn test_unresolved_state_reference() {
        let state = scope_with(&["count"]);
        let scope = StateScope::new(&state);
        let err = resolve_expression("${state.missing}", ExprContext::Template, scope, "node-1")
            .expect_err("must fail");
        assert!(matches!(
            err,
            CodegenError::UnresolvedStateReference { ref key, ref node }
                if key == "missing" && node == "node-1"
        ));
    }

    #[test]
    fn test_resolve_value_forms() {
        let state = scope_with(&["count"]);
        let scope = StateScope::new(&state);

        let literal = resolve_value(
            &PropValue::literal("Hi"),
            ExprContext::Template,
            scope,
            "n",
        )
        .expect("resolve");
        assert_eq!(literal, ResolvedValue::Literal(json!("Hi")));

        let binding = resolve_value(
            &PropValue::state_binding("count"),
            ExprContext::Template,
            scope,
            "n",
        )
        .expect("resolve");
        assert_eq!(binding, ResolvedValue::StateBinding("count".to_string()));

        let unknown = resolve_value(
            &PropValue::state_binding("nope"),
            ExprContext::Template,
            scope,
            "n",
        );
        assert!(unknown.is_err());
    }

    #[test]
    fn test_empty_scope_rejects_all_references() {
        let scope = StateScope::empty();
        assert!(resolve_expression("${state.count}", ExprContext::Template, scope, "n").is_err());
    }

    #[test]
    fn test_js_literals() {
        assert_eq!(js_literal(&json!("a'b")), "'a\\'b'");
        assert_eq!(js_literal(&json!(3)), "3");
        assert_eq!(js_literal(&json!(true)), "true");
        assert_eq!(js_literal(&json!(null)), "null");
        assert_eq!(js_literal(&json!([1, 2])), "[1,2]");
    }
}
