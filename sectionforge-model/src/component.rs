use crate::field::DerivedField;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A reusable component schema inferred from one template section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedComponent {
    /// Canonical (namespace-qualified) registry name.
    pub name: String,
    pub display_name: String,
    pub is_root: bool,
    pub is_nestable: bool,
    pub schema: BTreeMap<String, DerivedField>,
}

impl DerivedComponent {
    /// Creates a component with an empty schema.
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            is_root: false,
            is_nestable: false,
            schema: BTreeMap::new(),
        }
    }

    /// Adds a field, keyed by its name.
    #[must_use]
    pub fn with_field(mut self, field: DerivedField) -> Self {
        self.insert_field(field);
        self
    }

    /// Inserts a field, replacing any field with the same name.
    pub fn insert_field(&mut self, field: DerivedField) {
        self.schema.insert(field.name.clone(), field);
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&DerivedField> {
        self.schema.get(name)
    }

    /// Returns the fields ordered by position, then name.
    pub fn fields_by_position(&self) -> Vec<&DerivedField> {
        let mut fields: Vec<_> = self.schema.values().collect();
        fields.sort_by(|a, b| a.pos.cmp(&b.pos).then_with(|| a.name.cmp(&b.name)));
        fields
    }
}
