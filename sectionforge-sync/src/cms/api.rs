//! CMS abstraction traits.

use crate::error::SyncResult;
use async_trait::async_trait;
use sectionforge_model::DerivedComponent;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A component definition as the registry knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryComponent {
    /// Registry-assigned identifier.
    pub id: u64,
    /// Canonical component name.
    pub name: String,
}

/// A story listing entry, without content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryStub {
    pub id: u64,
    pub slug: String,
    #[serde(default)]
    pub name: String,
}

/// A stored story with its content tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,
    pub slug: String,
    /// Root node of the content tree.
    pub content: Value,
}

/// Component definitions in the CMS, keyed by name.
#[async_trait]
pub trait ComponentRegistry: Send + Sync {
    /// Lists every component in the space.
    async fn list_components(&self) -> SyncResult<Vec<RegistryComponent>>;

    /// Creates a component and returns its registry entry.
    async fn create_component(&self, component: &DerivedComponent)
    -> SyncResult<RegistryComponent>;

    /// Replaces the definition of an existing component.
    async fn update_component(&self, id: u64, component: &DerivedComponent) -> SyncResult<()>;

    /// Deletes a component. Deleting an already-missing component succeeds.
    async fn delete_component(&self, id: u64) -> SyncResult<()>;
}

/// Stored content in the CMS.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Lists every story in the space, following pagination.
    async fn list_story_stubs(&self) -> SyncResult<Vec<StoryStub>>;

    /// Fetches one story with its content.
    async fn fetch_story(&self, id: u64) -> SyncResult<Story>;

    /// Replaces a story's content, optionally publishing it.
    async fn update_story(&self, id: u64, content: &Value, publish: bool) -> SyncResult<()>;
}
