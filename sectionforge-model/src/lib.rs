//! Derived component schema model for SectionForge.
//!
//! Defines the types produced by schema derivation and consumed by the
//! differ, the registry synchronizer and the content migrator:
//! - [`DerivedField`]: one field of a component schema (type, position, metadata)
//! - [`DerivedComponent`]: a reusable component inferred from one template section
//! - [`SchemaDiff`]: structural deltas between two derived snapshots
//! - [`infer_field_type`]: the static `(host kind, bound field) -> type` table
//!
//! The JSON shape of [`DerivedComponent`] is what the registry receives.

mod component;
mod diff;
mod field;
mod field_types;

pub use component::DerivedComponent;
pub use diff::{FieldDeletion, FieldRename, SchemaDiff};
pub use field::{DerivedField, FieldType};
pub use field_types::{FieldSpec, infer_field_type};
