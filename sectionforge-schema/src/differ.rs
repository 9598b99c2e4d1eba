//! Schema diffing.
//!
//! Field renames are inferred, not declared: a field that disappeared is
//! paired with the first unclaimed new field of the same type. Two
//! independent same-type changes in one pass are therefore indistinguishable
//! from a rename, and the migrator relies on exactly this classification.

use sectionforge_model::{DerivedComponent, FieldDeletion, FieldRename, SchemaDiff};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Compares two derived snapshots. `previous` may be empty when no schema
/// existed before.
pub fn diff_components(previous: &[DerivedComponent], next: &[DerivedComponent]) -> SchemaDiff {
    let old_by_name: HashMap<&str, &DerivedComponent> =
        previous.iter().map(|c| (c.name.as_str(), c)).collect();
    let new_names: HashSet<&str> = next.iter().map(|c| c.name.as_str()).collect();

    let mut diff = SchemaDiff::default();

    for component in next {
        match old_by_name.get(component.name.as_str()) {
            None => diff.new_components.push(component.clone()),
            Some(old) => {
                if diff_fields(old, component, &mut diff) {
                    diff.changed_components.push(component.clone());
                }
            }
        }
    }

    for component in previous {
        if !new_names.contains(component.name.as_str()) {
            diff.removed_components.push(component.name.clone());
        }
    }

    debug!(
        "Schema diff: {} new, {} changed, {} removed, {} renames, {} deletions",
        diff.new_components.len(),
        diff.changed_components.len(),
        diff.removed_components.len(),
        diff.field_renames.len(),
        diff.field_deletions.len()
    );
    diff
}

/// Records field deltas of one component. Returns true if it changed.
fn diff_fields(old: &DerivedComponent, new: &DerivedComponent, diff: &mut SchemaDiff) -> bool {
    let added: Vec<_> = new
        .fields_by_position()
        .into_iter()
        .filter(|f| !old.schema.contains_key(&f.name))
        .collect();
    let mut claimed: HashSet<&str> = HashSet::new();
    let mut changed = false;

    for field in old.fields_by_position() {
        if let Some(current) = new.field(&field.name) {
            changed |= current.field_type != field.field_type;
            continue;
        }
        changed = true;

        let candidate = added
            .iter()
            .find(|f| !claimed.contains(f.name.as_str()) && f.field_type == field.field_type);
        match candidate {
            Some(target) => {
                claimed.insert(target.name.as_str());
                diff.field_renames.push(FieldRename {
                    component: new.name.clone(),
                    old_field: field.name.clone(),
                    new_field: target.name.clone(),
                });
            }
            None if !field.is_structural() => diff.field_deletions.push(FieldDeletion {
                component: new.name.clone(),
                field: field.name.clone(),
            }),
            None => {}
        }
    }

    changed || added.iter().any(|f| !claimed.contains(f.name.as_str()))
}
