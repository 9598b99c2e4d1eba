//! Template-driven schema derivation for SectionForge.
//!
//! An editor's template is a content tree with two kinds of structural
//! markers: *section markers* (`data_section`) that open a repeatable data
//! region, and *field bindings* (`data_mapping`) that pull a data field into
//! a node. This crate works in both directions over those markers:
//!
//! - **Derivation**: template → [`SectionGraph`] → [`DerivedComponent`]s
//! - **Diffing**: previous components vs. next components → [`SchemaDiff`]
//! - **Generation**: template + data record → concrete content tree
//!
//! Everything here is pure: no I/O and no shared state between calls.
//!
//! # Example
//!
//! ```
//! use sectionforge_schema::{derive_components, diff_components};
//! use sectionforge_types::Namespace;
//! use serde_json::json;
//!
//! let template = json!({
//!     "component": "page",
//!     "data_section": "blog_section",
//!     "body": [{
//!         "component": "card",
//!         "data_section": "blog_post",
//!         "data_mapping": [{"premade_field": "title", "builder_field": "content"}]
//!     }]
//! });
//!
//! let ns = Namespace::new("blog");
//! let components = derive_components(&template, &ns).unwrap();
//! assert_eq!(components.len(), 2);
//! assert!(diff_components(&components, &components).is_empty());
//! ```
//!
//! [`DerivedComponent`]: sectionforge_model::DerivedComponent
//! [`SchemaDiff`]: sectionforge_model::SchemaDiff

mod collector;
mod deriver;
mod differ;
mod error;
mod generator;
mod pluralize;
pub mod walker;

pub use collector::{FieldInfo, Section, SectionGraph, collect_sections};
pub use deriver::{SchemaDeriver, derive_components};
pub use differ::diff_components;
pub use error::{SchemaError, SchemaResult};
pub use generator::{SectionContext, StructureGenerator, generate_structure};
pub use pluralize::pluralize;
