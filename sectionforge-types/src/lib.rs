//! Core type definitions for SectionForge.
//!
//! This crate defines the fundamental types shared by schema derivation,
//! structure generation and CMS synchronization:
//! - Qualified component names (namespace + local name)
//! - Content-tree node keys and accessors
//! - Field-binding entries declared on template nodes
//!
//! Content trees themselves stay untyped (`serde_json::Value`); everything
//! here is a thin, typed view over them.

mod names;
pub mod node;

pub use names::{Namespace, QualifiedName};
pub use node::FieldBinding;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid component name: {0:?}")]
    InvalidName(String),
}
