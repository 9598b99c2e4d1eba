use serde::{Deserialize, Serialize};

/// A field in a derived component schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedField {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Display position within the component editor.
    pub pos: u32,
    /// Allowed asset kinds. Only meaningful for asset fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filetypes: Option<Vec<String>>,
    /// Components allowed inside a `bloks` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_whitelist: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_components: Option<bool>,
}

impl DerivedField {
    /// Creates a field with no metadata.
    pub fn new(name: impl Into<String>, field_type: FieldType, pos: u32) -> Self {
        Self {
            name: name.into(),
            field_type,
            pos,
            filetypes: None,
            component_whitelist: None,
            restrict_components: None,
        }
    }

    /// Shorthand for a plain text field.
    pub fn text(name: impl Into<String>, pos: u32) -> Self {
        Self::new(name, FieldType::Text, pos)
    }

    /// Shorthand for a child-section array restricted to one component.
    pub fn bloks(name: impl Into<String>, pos: u32, component: impl Into<String>) -> Self {
        Self {
            component_whitelist: Some(vec![component.into()]),
            restrict_components: Some(true),
            ..Self::new(name, FieldType::Bloks, pos)
        }
    }

    /// Attaches allowed asset kinds.
    #[must_use]
    pub fn with_filetypes(mut self, filetypes: Vec<String>) -> Self {
        self.filetypes = Some(filetypes);
        self
    }

    /// Returns true for structural child-array fields.
    pub fn is_structural(&self) -> bool {
        self.field_type == FieldType::Bloks
    }
}

/// The declared type of a schema field, using the registry's type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Richtext,
    Markdown,
    Number,
    Datetime,
    Boolean,
    Option,
    Options,
    Asset,
    Multiasset,
    Multilink,
    /// Array of nested components; the structural child-section type.
    Bloks,
}

impl FieldType {
    /// Returns the registry's name for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Richtext => "richtext",
            FieldType::Markdown => "markdown",
            FieldType::Number => "number",
            FieldType::Datetime => "datetime",
            FieldType::Boolean => "boolean",
            FieldType::Option => "option",
            FieldType::Options => "options",
            FieldType::Asset => "asset",
            FieldType::Multiasset => "multiasset",
            FieldType::Multilink => "multilink",
            FieldType::Bloks => "bloks",
        }
    }
}
