//! REST management API client.
//!
//! Speaks the `/v1/spaces/{space}/...` endpoints for stories and components.

use super::api::{ComponentRegistry, ContentApi, RegistryComponent, Story, StoryStub};
use crate::config::CmsConfig;
use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use sectionforge_model::DerivedComponent;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

/// Stories requested per listing page.
pub const STORIES_PER_PAGE: usize = 100;

/// Wait used when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

#[derive(Debug, Deserialize)]
struct StoryList {
    stories: Vec<StoryStub>,
}

#[derive(Debug, Deserialize)]
struct StoryEnvelope {
    story: Story,
}

#[derive(Debug, Deserialize)]
struct ComponentList {
    components: Vec<RegistryComponent>,
}

#[derive(Debug, Deserialize)]
struct ComponentEnvelope {
    component: RegistryComponent,
}

/// Management API client implementing both [`ComponentRegistry`] and
/// [`ContentApi`].
pub struct HttpCmsClient {
    config: CmsConfig,
    client: Client,
}

impl HttpCmsClient {
    /// Creates a client. Fails on incomplete configuration.
    pub fn new(config: CmsConfig) -> SyncResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SyncError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/v1/spaces/{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.space_id,
            path
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, &self.config.management_token)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> SyncResult<Response> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| SyncError::Network(format!("{what} failed: {e}")))?;
        check_status(response, what).await
    }

    async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> SyncResult<T> {
        let body = response
            .bytes()
            .await
            .map_err(|e| SyncError::Network(format!("failed to read {what} response: {e}")))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Maps error statuses onto [`SyncError`] variants.
async fn check_status(response: Response, what: &str) -> SyncResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(SyncError::RateLimited {
            retry_after_secs: retry_after_secs(response.headers()),
        });
    }
    if status == StatusCode::NOT_FOUND {
        return Err(SyncError::NotFound(what.to_string()));
    }
    let message = response.text().await.unwrap_or_default();
    Err(SyncError::Api {
        status: status.as_u16(),
        message: format!("{what}: {message}"),
    })
}

fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

fn total_header(headers: &HeaderMap) -> Option<usize> {
    headers
        .get("total")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[async_trait]
impl ComponentRegistry for HttpCmsClient {
    async fn list_components(&self) -> SyncResult<Vec<RegistryComponent>> {
        let response = self
            .send(self.client.get(self.url("components")), "list components")
            .await?;
        let list: ComponentList = Self::read_json(response, "component list").await?;
        debug!("Registry holds {} components", list.components.len());
        Ok(list.components)
    }

    async fn create_component(
        &self,
        component: &DerivedComponent,
    ) -> SyncResult<RegistryComponent> {
        let what = format!("create component {}", component.name);
        let response = self
            .send(
                self.client
                    .post(self.url("components"))
                    .json(&json!({ "component": component })),
                &what,
            )
            .await?;
        let created: ComponentEnvelope = Self::read_json(response, &what).await?;
        info!("Created component {} ({})", created.component.name, created.component.id);
        Ok(created.component)
    }

    async fn update_component(&self, id: u64, component: &DerivedComponent) -> SyncResult<()> {
        let what = format!("update component {}", component.name);
        self.send(
            self.client
                .put(self.url(&format!("components/{id}")))
                .json(&json!({ "component": component })),
            &what,
        )
        .await?;
        info!("Updated component {} ({})", component.name, id);
        Ok(())
    }

    async fn delete_component(&self, id: u64) -> SyncResult<()> {
        let what = format!("delete component {id}");
        match self
            .send(self.client.delete(self.url(&format!("components/{id}"))), &what)
            .await
        {
            Ok(_) => {
                info!("Deleted component {}", id);
                Ok(())
            }
            Err(SyncError::NotFound(_)) => {
                debug!("Component {} already gone", id);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ContentApi for HttpCmsClient {
    async fn list_story_stubs(&self) -> SyncResult<Vec<StoryStub>> {
        let mut stubs = Vec::new();
        let mut page = 1usize;

        loop {
            let per_page = STORIES_PER_PAGE.to_string();
            let page_param = page.to_string();
            let response = self
                .send(
                    self.client
                        .get(self.url("stories"))
                        .query(&[("page", page_param.as_str()), ("per_page", per_page.as_str())]),
                    "list stories",
                )
                .await?;

            let total = total_header(response.headers());
            let list: StoryList = Self::read_json(response, "story list").await?;
            let fetched = list.stories.len();
            stubs.extend(list.stories);
            debug!("Story page {}: {} stubs (total {:?})", page, fetched, total);

            let reached_total = total.is_some_and(|total| stubs.len() >= total);
            if fetched < STORIES_PER_PAGE || reached_total {
                break;
            }
            page += 1;
        }

        Ok(stubs)
    }

    async fn fetch_story(&self, id: u64) -> SyncResult<Story> {
        let what = format!("fetch story {id}");
        let response = self
            .send(self.client.get(self.url(&format!("stories/{id}"))), &what)
            .await?;
        let envelope: StoryEnvelope = Self::read_json(response, &what).await?;
        Ok(envelope.story)
    }

    async fn update_story(&self, id: u64, content: &Value, publish: bool) -> SyncResult<()> {
        let what = format!("update story {id}");
        let mut body = json!({ "story": { "content": content } });
        if publish {
            body["publish"] = json!(1);
        }
        self.send(
            self.client.put(self.url(&format!("stories/{id}"))).json(&body),
            &what,
        )
        .await?;
        info!("Updated story {}{}", id, if publish { " (published)" } else { "" });
        Ok(())
    }
}
