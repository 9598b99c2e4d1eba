//! Error types for schema derivation and structure generation.

use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while deriving schemas or generating structures.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Two sections resolve to the same canonical component name.
    #[error("component name collision: {first:?} and {second:?} both resolve to {name:?}")]
    Collision {
        name: String,
        first: String,
        second: String,
    },

    /// Two fields of one component resolve to the same field name.
    #[error("field name collision in {component:?}: {field:?} is declared twice")]
    FieldCollision { component: String, field: String },

    /// A section or component name could not be qualified.
    #[error("invalid name: {0}")]
    InvalidName(#[from] sectionforge_types::Error),

    /// The template root is not a content node.
    #[error("invalid template: {0}")]
    InvalidTemplate(String),
}
