//! CMS management API access.
//!
//! The synchronizer and migrator only see the [`ComponentRegistry`] and
//! [`ContentApi`] traits; [`HttpCmsClient`] implements both over the REST
//! management API.

pub mod api;
pub mod http;

pub use api::{ComponentRegistry, ContentApi, RegistryComponent, Story, StoryStub};
pub use http::HttpCmsClient;
