//! Component manifest data model
//!
//! This module provides:
//! - Arc<str> interning for string deduplication across manifests
//! - SmallVec for inline small collections
//! - serde types matching the on-disk JSON manifest format

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use std::sync::Arc;

// =============================================================================
// COMPONENT MANIFEST
// =============================================================================

/// Static definition of one renderable component type
///
/// On-disk format:
/// `{componentName, tag, props:{name:{type,default,enum?}}, variants:{name:{props}}, slots:[...], specialRendering}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentManifest {
    #[serde(rename = "componentName")]
    pub component_name: Arc<str>,

    /// Default output tag emitted by the generic renderer
    #[serde(default = "default_tag")]
    pub tag: Arc<str>,

    #[serde(default)]
    pub props: AHashMap<Arc<str>, PropSpec>,

    #[serde(default)]
    pub variants: AHashMap<Arc<str>, Variant>,

    /// Named child-list sockets, in declaration order
    #[serde(default)]
    pub slots: SmallVec<[Arc<str>; 2]>,

    /// Component needs a specialized renderer rather than the generic
    /// tag + props + children emission
    #[serde(rename = "specialRendering", default)]
    pub special_rendering: bool,
}

fn default_tag() -> Arc<str> {
    Arc::from("div")
}

impl ComponentManifest {
    /// Get a prop schema entry by name
    #[inline]
    pub fn prop(&self, name: &str) -> Option<&PropSpec> {
        self.props.get(name)
    }

    /// Get a variant definition by name
    #[inline]
    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.get(name)
    }

    /// Whether the manifest declares the given slot
    pub fn has_slot(&self, name: &str) -> bool {
        self.slots.iter().any(|s| s.as_ref() == name)
    }
}

// =============================================================================
// PROP SCHEMA
// =============================================================================

/// Schema entry for a single prop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropSpec {
    #[serde(rename = "type")]
    pub prop_type: PropType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Closed set of allowed values, when the prop is an enumeration
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,
}

impl Default for PropSpec {
    fn default() -> Self {
        PropSpec {
            prop_type: PropType::String,
            default: None,
            allowed: None,
        }
    }
}

/// Prop value type
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Hash, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PropType {
    #[default]
    String = 0,
    Number = 1,
    Boolean = 2,
    Object = 3,
    Array = 4,
    Any = 5,
}

// =============================================================================
// VARIANT
// =============================================================================

/// Named preset of prop overrides (chiefly style fields)
///
/// Variant props merge under a node's own explicit props before rendering;
/// on a field-by-field conflict the node's own value wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub props: AHashMap<Arc<str>, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_parse_minimal() {
        let manifest: ComponentManifest =
            serde_json::from_str(r#"{"componentName": "Box"}"#).expect("parse");
        assert_eq!(manifest.component_name.as_ref(), "Box");
        assert_eq!(manifest.tag.as_ref(), "div");
        assert!(!manifest.special_rendering);
        assert!(manifest.props.is_empty());
    }

    #[test]
    fn test_manifest_parse_full() {
        let json = r#"{
            "componentName": "Button",
            "tag": "button",
            "props": {
                "label": {"type": "string", "default": "Click"},
                "kind": {"type": "string", "enum": ["primary", "ghost"]}
            },
            "variants": {
                "elevated": {"props": {"style": {"boxShadow": "0 4px 16px rgba(0,0,0,0.3)"}}}
            },
            "slots": ["default"],
            "specialRendering": false
        }"#;

        let manifest: ComponentManifest = serde_json::from_str(json).expect("parse");
        assert_eq!(manifest.tag.as_ref(), "button");
        assert_eq!(manifest.props.len(), 2);
        assert!(manifest.prop("label").is_some_and(|p| {
            p.prop_type == PropType::String && p.default == Some(Value::from("Click"))
        }));
        assert!(manifest
            .prop("kind")
            .is_some_and(|p| p.allowed.as_ref().is_some_and(|vals| vals.len() == 2)));
        assert!(manifest.variant("elevated").is_some());
        assert!(manifest.has_slot("default"));
        assert!(!manifest.has_slot("footer"));
    }

    #[test]
    fn test_variant_props() {
        let json = r#"{
            "componentName": "Card",
            "variants": {"outlined": {"props": {"border": "1px solid"}}}
        }"#;
        let manifest: ComponentManifest = serde_json::from_str(json).expect("parse");
        let variant = manifest.variant("outlined").expect("variant");
        assert_eq!(variant.props.get("border"), Some(&Value::from("1px solid")));
    }
}
