//! In-memory CMS and fixtures shared by the sync tests.

#![allow(dead_code)]

use async_trait::async_trait;
use sectionforge_model::DerivedComponent;
use sectionforge_sync::cms::{ComponentRegistry, ContentApi, RegistryComponent, Story, StoryStub};
use sectionforge_sync::{SyncError, SyncResult};
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Default)]
struct State {
    next_id: u64,
    /// id → (name, definition as last written)
    components: BTreeMap<u64, (String, Option<DerivedComponent>)>,
    stories: BTreeMap<u64, Story>,
    writes: Vec<String>,
    failing_writes: HashSet<String>,
    failing_fetches: HashSet<u64>,
    fail_listing: bool,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Routes `tracing` output to the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A registry and content store that records every write.
#[derive(Default)]
pub struct FakeCms {
    state: Mutex<State>,
}

impl FakeCms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component that already exists in the space.
    pub fn with_component(&self, name: &str) -> u64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.components.insert(id, (name.to_string(), None));
        id
    }

    pub fn with_story(&self, slug: &str, content: Value) -> u64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.stories.insert(
            id,
            Story {
                id,
                slug: slug.to_string(),
                content,
            },
        );
        id
    }

    /// Makes writes touching `target` fail: a component name or a
    /// `story:{id}` key.
    pub fn fail_writes_to(&self, target: &str) {
        self.state.lock().unwrap().failing_writes.insert(target.to_string());
    }

    pub fn fail_fetch_of(&self, id: u64) {
        self.state.lock().unwrap().failing_fetches.insert(id);
    }

    pub fn fail_listing(&self) {
        self.state.lock().unwrap().fail_listing = true;
    }

    /// Component names currently registered, sorted.
    pub fn component_names(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        let mut names: Vec<_> = state.components.values().map(|(n, _)| n.clone()).collect();
        names.sort();
        names
    }

    /// The last definition written for `name`.
    pub fn component(&self, name: &str) -> Option<DerivedComponent> {
        let state = self.state.lock().unwrap();
        state
            .components
            .values()
            .find(|(n, _)| n == name)
            .and_then(|(_, c)| c.clone())
    }

    pub fn story(&self, id: u64) -> Value {
        self.state.lock().unwrap().stories[&id].content.clone()
    }

    /// Writes in the order they happened, e.g. `create blog_post`.
    pub fn writes(&self) -> Vec<String> {
        self.state.lock().unwrap().writes.clone()
    }
}

fn injected(target: &str) -> SyncError {
    SyncError::Api {
        status: 422,
        message: format!("rejected {target}"),
    }
}

#[async_trait]
impl ComponentRegistry for FakeCms {
    async fn list_components(&self) -> SyncResult<Vec<RegistryComponent>> {
        let state = self.state.lock().unwrap();
        if state.fail_listing {
            return Err(SyncError::Network("connection reset".to_string()));
        }
        Ok(state
            .components
            .iter()
            .map(|(id, (name, _))| RegistryComponent {
                id: *id,
                name: name.clone(),
            })
            .collect())
    }

    async fn create_component(
        &self,
        component: &DerivedComponent,
    ) -> SyncResult<RegistryComponent> {
        let mut state = self.state.lock().unwrap();
        if state.failing_writes.contains(&component.name) {
            return Err(injected(&component.name));
        }
        let id = state.next_id();
        state
            .components
            .insert(id, (component.name.clone(), Some(component.clone())));
        state.writes.push(format!("create {}", component.name));
        Ok(RegistryComponent {
            id,
            name: component.name.clone(),
        })
    }

    async fn update_component(&self, id: u64, component: &DerivedComponent) -> SyncResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.failing_writes.contains(&component.name) {
            return Err(injected(&component.name));
        }
        let entry = state
            .components
            .get_mut(&id)
            .ok_or_else(|| SyncError::NotFound(format!("component {id}")))?;
        entry.1 = Some(component.clone());
        state.writes.push(format!("update {}", component.name));
        Ok(())
    }

    async fn delete_component(&self, id: u64) -> SyncResult<()> {
        let mut state = self.state.lock().unwrap();
        let Some((name, _)) = state.components.get(&id).cloned() else {
            return Ok(());
        };
        if state.failing_writes.contains(&name) {
            return Err(injected(&name));
        }
        state.components.remove(&id);
        state.writes.push(format!("delete {name}"));
        Ok(())
    }
}

#[async_trait]
impl ContentApi for FakeCms {
    async fn list_story_stubs(&self) -> SyncResult<Vec<StoryStub>> {
        let state = self.state.lock().unwrap();
        if state.fail_listing {
            return Err(SyncError::Network("connection reset".to_string()));
        }
        Ok(state
            .stories
            .values()
            .map(|s| StoryStub {
                id: s.id,
                slug: s.slug.clone(),
                name: s.slug.clone(),
            })
            .collect())
    }

    async fn fetch_story(&self, id: u64) -> SyncResult<Story> {
        let state = self.state.lock().unwrap();
        if state.failing_fetches.contains(&id) {
            return Err(SyncError::Network(format!("timeout fetching {id}")));
        }
        state
            .stories
            .get(&id)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(format!("story {id}")))
    }

    async fn update_story(&self, id: u64, content: &Value, publish: bool) -> SyncResult<()> {
        let mut state = self.state.lock().unwrap();
        let key = format!("story:{id}");
        if state.failing_writes.contains(&key) {
            return Err(injected(&key));
        }
        let story = state
            .stories
            .get_mut(&id)
            .ok_or_else(|| SyncError::NotFound(format!("story {id}")))?;
        story.content = content.clone();
        let verb = if publish { "publish" } else { "update" };
        state.writes.push(format!("{verb} story {id}"));
        Ok(())
    }
}

/// Blog layout with one repeatable post bound by `title`.
pub fn blog_template() -> Value {
    blog_template_binding("title")
}

/// Blog layout whose post binds `field` instead of `title`.
pub fn blog_template_binding(field: &str) -> Value {
    json!({
        "component": "page",
        "_uid": "t-root",
        "data_section": "blog_section",
        "body": [{
            "component": "heading",
            "_uid": "t-heading",
            "data_section": "blog_post",
            "data_mapping": [
                {"premade_field": field, "builder_field": "content"},
                {"premade_field": "author", "builder_field": "caption"}
            ]
        }]
    })
}

/// A stored story holding two post instances.
pub fn blog_story() -> Value {
    json!({
        "component": "blog_section",
        "_uid": "s-root",
        "posts": [
            {"component": "blog_post", "_uid": "s-1", "title": "Hello", "author": "Ada"},
            {"component": "blog_post", "_uid": "s-2", "title": "World", "author": "Grace"}
        ]
    })
}
