//! Structured patch batches over stored JSON documents
//!
//! Ops follow the add/replace/remove/move/copy/test shape with JSON-Pointer
//! paths. A batch is applied to a working copy: the first failing operation
//! rejects the whole batch and reports its index and reason, so the caller's
//! document is never partially mutated.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One patch operation targeting a path inside a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOp {
    Add { path: String, value: Value },
    Replace { path: String, value: Value },
    Remove { path: String },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

impl PatchOp {
    fn name(&self) -> &'static str {
        match self {
            PatchOp::Add { .. } => "add",
            PatchOp::Replace { .. } => "replace",
            PatchOp::Remove { .. } => "remove",
            PatchOp::Move { .. } => "move",
            PatchOp::Copy { .. } => "copy",
            PatchOp::Test { .. } => "test",
        }
    }
}

/// Structured failure: the index of the failing operation and the reason
#[derive(Debug, Clone, PartialEq)]
pub struct PatchFailure {
    pub index: usize,
    pub reason: String,
}

impl std::fmt::Display for PatchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "operation {}: {}", self.index, self.reason)
    }
}

/// Apply a batch to a document, returning the mutated copy
///
/// The input document is untouched; on any failure the error names the
/// failing operation and no partial result is observable.
pub fn apply_batch(doc: &Value, ops: &[PatchOp]) -> Result<Value, PatchFailure> {
    let mut working = doc.clone();

    for (index, op) in ops.iter().enumerate() {
        apply_op(&mut working, op).map_err(|reason| PatchFailure {
            index,
            reason: format!("{} {}", op.name(), reason),
        })?;
    }

    Ok(working)
}

fn apply_op(doc: &mut Value, op: &PatchOp) -> Result<(), String> {
    match op {
        PatchOp::Add { path, value } => add(doc, path, value.clone()),
        PatchOp::Replace { path, value } => replace(doc, path, value.clone()),
        PatchOp::Remove { path } => remove(doc, path).map(|_| ()),
        PatchOp::Move { from, path } => {
            if path_is_within(from, path) {
                return Err(format!(
                    "'{}' cannot move into its own subtree '{}'",
                    from, path
                ));
            }
            let taken = remove(doc, from)?;
            add(doc, path, taken)
        }
        PatchOp::Copy { from, path } => {
            let copied = get(doc, from)?.clone();
            add(doc, path, copied)
        }
        PatchOp::Test { path, value } => {
            let found = get(doc, path)?;
            if found == value {
                Ok(())
            } else {
                Err(format!("'{}' does not match the expected value", path))
            }
        }
    }
}

/// Split a JSON pointer into unescaped tokens
fn parse_pointer(pointer: &str) -> Result<Vec<String>, String> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    if !pointer.starts_with('/') {
        return Err(format!("malformed path '{}': must start with '/'", pointer));
    }
    Ok(pointer
        .split('/')
        .skip(1)
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect())
}

/// Whether `path` points into the subtree rooted at `from`
fn path_is_within(from: &str, path: &str) -> bool {
    path == from || path.starts_with(&format!("{}/", from))
}

fn parse_index(token: &str, len: usize, allow_end: bool) -> Result<usize, String> {
    if token == "-" {
        if allow_end {
            return Ok(len);
        }
        return Err("'-' is only valid when appending".to_string());
    }
    let index: usize = token
        .parse()
        .map_err(|_| format!("'{}' is not a valid array index", token))?;
    let bound = if allow_end { len + 1 } else { len };
    if index >= bound {
        return Err(format!("index {} out of bounds (len {})", index, len));
    }
    Ok(index)
}

fn get<'a>(doc: &'a Value, pointer: &str) -> Result<&'a Value, String> {
    let tokens = parse_pointer(pointer)?;
    let mut current = doc;
    for token in &tokens {
        current = match current {
            Value::Object(map) => map
                .get(token)
                .ok_or_else(|| format!("path '{}' not found", pointer))?,
            Value::Array(items) => {
                let index = parse_index(token, items.len(), false)?;
                &items[index]
            }
            _ => return Err(format!("path '{}' traverses a non-container", pointer)),
        };
    }
    Ok(current)
}

/// Navigate to the parent of the pointed-at location, returning the leaf token
fn parent_of<'a>(doc: &'a mut Value, tokens: &[String]) -> Result<(&'a mut Value, String), String> {
    let (leaf, parents) = tokens
        .split_last()
        .ok_or_else(|| "the document root cannot be addressed here".to_string())?;

    let mut current = doc;
    for token in parents {
        current = match current {
            Value::Object(map) => map
                .get_mut(token)
                .ok_or_else(|| format!("intermediate key '{}' not found", token))?,
            Value::Array(items) => {
                let index = parse_index(token, items.len(), false)?;
                &mut items[index]
            }
            _ => return Err(format!("intermediate '{}' is not a container", token)),
        };
    }
    Ok((current, leaf.clone()))
}

fn add(doc: &mut Value, pointer: &str, value: Value) -> Result<(), String> {
    let tokens = parse_pointer(pointer)?;
    if tokens.is_empty() {
        *doc = value;
        return Ok(());
    }

    let (parent, leaf) = parent_of(doc, &tokens)?;
    match parent {
        Value::Object(map) => {
            map.insert(leaf, value);
            Ok(())
        }
        Value::Array(items) => {
            let index = parse_index(&leaf, items.len(), true)?;
            items.insert(index, value);
            Ok(())
        }
        _ => Err(format!("'{}' parent is not a container", pointer)),
    }
}

fn replace(doc: &mut Value, pointer: &str, value: Value) -> Result<(), String> {
    let tokens = parse_pointer(pointer)?;
    if tokens.is_empty() {
        *doc = value;
        return Ok(());
    }

    let (parent, leaf) = parent_of(doc, &tokens)?;
    match parent {
        Value::Object(map) => {
            if !map.contains_key(&leaf) {
                return Err(format!("'{}' does not exist", pointer));
            }
            map.insert(leaf, value);
            Ok(())
        }
        Value::Array(items) => {
            let index = parse_index(&leaf, items.len(), false)?;
            items[index] = value;
            Ok(())
        }
        _ => Err(format!("'{}' parent is not a container", pointer)),
    }
}

fn remove(doc: &mut Value, pointer: &str) -> Result<Value, String> {
    let tokens = parse_pointer(pointer)?;
    if tokens.is_empty() {
        return Err("the document root cannot be removed".to_string());
    }

    let (parent, leaf) = parent_of(doc, &tokens)?;
    match parent {
        Value::Object(map) => map
            .remove(&leaf)
            .ok_or_else(|| format!("'{}' does not exist", pointer)),
        Value::Array(items) => {
            let index = parse_index(&leaf, items.len(), false)?;
            Ok(items.remove(index))
        }
        _ => Err(format!("'{}' parent is not a container", pointer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "state": {},
            "tree": {
                "id": "root",
                "type": "Box",
                "props": {},
                "slots": {"default": []}
            }
        })
    }

    #[test]
    fn test_add_appends_to_array() {
        let ops = vec![PatchOp::Add {
            path: "/tree/slots/default/-".to_string(),
            value: json!({"id": "hero-title", "type": "Text"}),
        }];

        let patched = apply_batch(&doc(), &ops).expect("apply");
        assert_eq!(patched["tree"]["slots"]["default"][0]["id"], "hero-title");
    }

    #[test]
    fn test_add_at_index_inserts() {
        let base = json!({"items": ["a", "c"]});
        let ops = vec![PatchOp::Add {
            path: "/items/1".to_string(),
            value: json!("b"),
        }];
        let patched = apply_batch(&base, &ops).expect("apply");
        assert_eq!(patched["items"], json!(["a", "b", "c"]));
    }

    #[test]
    fn test_replace_requires_existing() {
        let ops = vec![PatchOp::Replace {
            path: "/tree/props/missing".to_string(),
            value: json!(1),
        }];
        let failure = apply_batch(&doc(), &ops).expect_err("must fail");
        assert_eq!(failure.index, 0);
        assert!(failure.reason.contains("does not exist"));
    }

    #[test]
    fn test_remove() {
        let base = json!({"a": {"b": 1}, "list": [1, 2, 3]});
        let ops = vec![
            PatchOp::Remove {
                path: "/a/b".to_string(),
            },
            PatchOp::Remove {
                path: "/list/1".to_string(),
            },
        ];
        let patched = apply_batch(&base, &ops).expect("apply");
        assert_eq!(patched, json!({"a": {}, "list": [1, 3]}));
    }

    #[test]
    fn test_move_and_copy() {
        let base = json!({"a": 1, "list": []});
        let ops = vec![
            PatchOp::Copy {
                from: "/a".to_string(),
                path: "/list/-".to_string(),
            },
            PatchOp::Move {
                from: "/a".to_string(),
                path: "/b".to_string(),
            },
        ];
        let patched = apply_batch(&base, &ops).expect("apply");
        assert_eq!(patched, json!({"b": 1, "list": [1]}));
    }

    #[test]
    fn test_move_into_own_subtree_rejected() {
        let base = json!({"a": {"b": 1}});
        let ops = vec![PatchOp::Move {
            from: "/a".to_string(),
            path: "/a/c".to_string(),
        }];
        assert!(apply_batch(&base, &ops).is_err());
    }

    #[test]
    fn test_test_op() {
        let ops = vec![PatchOp::Test {
            path: "/tree/id".to_string(),
            value: json!("root"),
        }];
        assert!(apply_batch(&doc(), &ops).is_ok());

        let ops = vec![PatchOp::Test {
            path: "/tree/id".to_string(),
            value: json!("other"),
        }];
        let failure = apply_batch(&doc(), &ops).expect_err("must fail");
        assert!(failure.reason.contains("does not match"));
    }

    #[test]
    fn test_batch_failure_reports_index_and_leaves_input_untouched() {
        let base = doc();
        let ops = vec![
            PatchOp::Add {
                path: "/state/count".to_string(),
                value: json!({"type": "number", "defaultValue": 0}),
            },
            PatchOp::Replace {
                path: "/missing".to_string(),
                value: json!(1),
            },
            PatchOp::Remove {
                path: "/state/count".to_string(),
            },
        ];

        let failure = apply_batch(&base, &ops).expect_err("must fail");
        assert_eq!(failure.index, 1);
        // the input document is not mutated by the partial application
        assert_eq!(base, doc());
    }

    #[test]
    fn test_pointer_escapes() {
        let base = json!({"a/b": 1, "c~d": 2});
        assert_eq!(get(&base, "/a~1b").expect("get"), &json!(1));
        assert_eq!(get(&base, "/c~0d").expect("get"), &json!(2));
    }

    #[test]
    fn test_malformed_pointer() {
        let ops = vec![PatchOp::Remove {
            path: "tree".to_string(),
        }];
        let failure = apply_batch(&doc(), &ops).expect_err("must fail");
        assert!(failure.reason.contains("must start with '/'"));
    }

    #[test]
    fn test_ops_deserialize_from_json() {
        let ops: Vec<PatchOp> = serde_json::from_value(json!([
            {"op": "add", "path": "/tree/slots/default/-", "value": {"type": "Text"}},
            {"op": "test", "path": "/tree/id", "value": "root"},
            {"op": "move", "from": "/a", "path": "/b"}
        ]))
        .expect("parse");
        assert_eq!(ops.len(), 3);
        assert!(matches!(ops[2], PatchOp::Move { .. }));
    }
}
