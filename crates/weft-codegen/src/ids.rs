//! Semantic id assignment during traversal
//!
//! Ids are hierarchical, human-legible, and deterministic: identical AST
//! content always yields identical ids. The id doubles as the DOM-facing
//! identifier and, after sanitization, the seed for generated handler names.

use ahash::AHashSet;
use weft_ast::{AstNode, PropValue};

/// Props whose literal text doubles as a slug hint (and, in the generic
/// renderer, as element text content)
pub const TEXT_PROPS: &[&str] = &["content", "text", "label", "title", "placeholder"];

/// Maximum words kept in a derived slug
const SLUG_WORDS: usize = 3;

/// Tracks assigned ids for one page and resolves collisions
#[derive(Debug, Default)]
pub struct IdGenerator {
    assigned: AHashSet<String>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the semantic id for a node visited at `index_in_parent`
    ///
    /// Root nodes (empty parent context) take their user id when present,
    /// otherwise the lowercased type. Non-root ids are
    /// `parent.type[.slug]`, with the user id preferred over a slug derived
    /// from a textual content/placeholder prop.
    pub fn assign(&mut self, parent_context: &str, node: &AstNode, index_in_parent: usize) -> String {
        let type_segment = node.component.to_lowercase();

        let base = if parent_context.is_empty() {
            node.id
                .as_deref()
                .map(slug)
                .filter(|s| !s.is_empty())
                .unwrap_or(type_segment)
        } else {
            let mut base = format!("{}.{}", parent_context, type_segment);
            let hint = node
                .id
                .as_deref()
                .map(slug)
                .filter(|s| !s.is_empty())
                .or_else(|| text_prop_slug(node));
            if let Some(hint) = hint {
                base.push('.');
                base.push_str(&hint);
            }
            base
        };

        self.reserve(base, index_in_parent)
    }

    /// Assign the id of a positional, list-derived child: `parent.item-N`
    pub fn assign_item(&mut self, parent_context: &str, index: usize) -> String {
        self.reserve(format!("{}.item-{}", parent_context, index), index)
    }

    /// Reserve a candidate id; on collision append `.index`, then an
    /// incrementing numeric suffix until unique
    fn reserve(&mut self, candidate: String, index_in_parent: usize) -> String {
        if self.assigned.insert(candidate.clone()) {
            return candidate;
        }

        let indexed = format!("{}.{}", candidate, index_in_parent);
        if self.assigned.insert(indexed.clone()) {
            return indexed;
        }

        let mut suffix = 2;
        loop {
            let numbered = format!("{}-{}", indexed, suffix);
            if self.assigned.insert(numbered.clone()) {
                return numbered;
            }
            suffix += 1;
        }
    }
}

/// Slug from first literal text prop, if any
fn text_prop_slug(node: &AstNode) -> Option<String> {
    for prop in TEXT_PROPS {
        if let Some(PropValue::Literal(serde_json::Value::String(text))) = node.props.get(*prop) {
            let slugged = slug(text);
            if !slugged.is_empty() {
                return Some(slugged);
            }
        }
    }
    None
}

/// Lowercased, hyphenated slug truncated to a few words
pub fn slug(text: &str) -> String {
    text.split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .take(SLUG_WORDS)
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Replace every non-identifier character with an underscore, making the id
/// usable as the seed of a generated function name
pub fn sanitize_identifier(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for (i, ch) in id.chars().enumerate() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if i == 0 && ch.is_ascii_digit() {
                out.push('_');
            }
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    out
}
