use crate::component::DerivedComponent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A field that kept its type but changed its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRename {
    pub component: String,
    pub old_field: String,
    pub new_field: String,
}

/// A field that disappeared without a same-type replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeletion {
    pub component: String,
    pub field: String,
}

/// Structural deltas between two derived schema snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDiff {
    pub field_renames: Vec<FieldRename>,
    pub field_deletions: Vec<FieldDeletion>,
    pub removed_components: Vec<String>,
    pub changed_components: Vec<DerivedComponent>,
    pub new_components: Vec<DerivedComponent>,
}

impl SchemaDiff {
    /// Returns true if the two snapshots were structurally identical.
    pub fn is_empty(&self) -> bool {
        self.field_renames.is_empty()
            && self.field_deletions.is_empty()
            && self.removed_components.is_empty()
            && self.changed_components.is_empty()
            && self.new_components.is_empty()
    }

    /// Returns true if existing content instances need rewriting.
    pub fn requires_migration(&self) -> bool {
        !self.field_renames.is_empty() || !self.field_deletions.is_empty()
    }

    /// Names of components whose instances may need rewriting: the union of
    /// renamed, deleted and removed component names.
    pub fn affected_components(&self) -> BTreeSet<&str> {
        self.field_renames
            .iter()
            .map(|r| r.component.as_str())
            .chain(self.field_deletions.iter().map(|d| d.component.as_str()))
            .chain(self.removed_components.iter().map(String::as_str))
            .collect()
    }

    /// Total number of registry writes this diff implies.
    pub fn registry_operations(&self) -> usize {
        self.new_components.len() + self.changed_components.len() + self.removed_components.len()
    }
}
