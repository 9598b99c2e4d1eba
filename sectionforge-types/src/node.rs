//! Content-tree node keys and accessors.
//!
//! A content node is any JSON object carrying a string `component` tag.
//! Templates additionally carry structural markers (`data_section`,
//! `data_mapping`) that never appear in generated output.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Kind tag identifying a node's component type.
pub const COMPONENT_KEY: &str = "component";
/// Node identity.
pub const UID_KEY: &str = "_uid";
/// Section marker: names the repeatable data section starting at this node.
pub const SECTION_KEY: &str = "data_section";
/// Array of [`FieldBinding`] entries.
pub const MAPPING_KEY: &str = "data_mapping";
/// Visual-editor editability marker.
pub const EDITABLE_KEY: &str = "_editable";

/// Keys never treated as tree structure: editor markers, the binding array
/// itself and known non-block fields whose values may look like nodes.
pub const NON_STRUCTURAL_KEYS: &[&str] = &[
    EDITABLE_KEY,
    MAPPING_KEY,
    SECTION_KEY,
    "options",
    "tags",
    "asset",
    "link",
];

/// A field-binding entry: read `premade_field` from the data bound to
/// `builder_section` (or the current section) and write it to `builder_field`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBinding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder_section: Option<String>,
    pub premade_field: String,
    pub builder_field: String,
}

impl FieldBinding {
    /// Creates a binding against the current section.
    pub fn new(premade_field: impl Into<String>, builder_field: impl Into<String>) -> Self {
        Self {
            builder_section: None,
            premade_field: premade_field.into(),
            builder_field: builder_field.into(),
        }
    }

    /// Targets an explicit section instead of the current one.
    #[must_use]
    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.builder_section = Some(section.into());
        self
    }

    /// Returns the explicit target section, ignoring blank overrides.
    pub fn target_section(&self) -> Option<&str> {
        self.builder_section
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Returns true if the value is an object with a string kind tag.
pub fn is_content_node(value: &Value) -> bool {
    kind(value).is_some()
}

/// Returns the node's kind tag.
pub fn kind(value: &Value) -> Option<&str> {
    value.get(COMPONENT_KEY).and_then(Value::as_str)
}

/// Returns the node's identity.
pub fn uid(value: &Value) -> Option<&str> {
    value.get(UID_KEY).and_then(Value::as_str)
}

/// Returns the node's section marker, if present and non-blank.
pub fn section_marker(value: &Value) -> Option<&str> {
    value
        .get(SECTION_KEY)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Returns the node's field bindings. Malformed entries are ignored.
pub fn field_bindings(value: &Value) -> Vec<FieldBinding> {
    value.get(MAPPING_KEY).map(parse_bindings).unwrap_or_default()
}

/// Parses a `data_mapping` array. Malformed entries are ignored.
pub fn parse_bindings(mapping: &Value) -> Vec<FieldBinding> {
    mapping
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| FieldBinding::deserialize(entry).ok())
                .filter(|b| !b.premade_field.is_empty() && !b.builder_field.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Returns true if the key is skipped during structural traversal.
pub fn is_non_structural(key: &str) -> bool {
    NON_STRUCTURAL_KEYS.contains(&key)
}

/// Iterates the direct content-node children of an object, in property
/// order, skipping non-structural keys and non-array properties.
pub fn child_nodes(node: &Map<String, Value>) -> impl Iterator<Item = &Value> {
    node.iter()
        .filter(|(key, _)| !is_non_structural(key))
        .filter_map(|(_, value)| value.as_array())
        .flat_map(|items| items.iter().filter(|item| is_content_node(item)))
}

/// Generates a fresh node identity.
pub fn fresh_uid() -> String {
    Uuid::new_v4().to_string()
}
