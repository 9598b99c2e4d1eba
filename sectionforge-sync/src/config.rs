//! Configuration for CMS access and sync runs.

use crate::error::{SyncError, SyncResult};
use crate::gate::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the management API base URL.
pub const ENV_CMS_URL: &str = "SECTIONFORGE_CMS_URL";
/// Environment variable holding the CMS space identifier.
pub const ENV_SPACE_ID: &str = "SECTIONFORGE_SPACE_ID";
/// Environment variable holding the management token.
pub const ENV_TOKEN: &str = "SECTIONFORGE_TOKEN";
/// Environment variable holding the timeout for a single HTTP call.
pub const ENV_TIMEOUT: &str = "SECTIONFORGE_TIMEOUT_SECS";

/// Management API access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsConfig {
    /// Base URL for the management API (e.g. `https://mapi.storyblok.com`).
    pub api_base_url: String,
    /// Space holding the components and stories.
    pub space_id: String,
    /// Management token sent in the `Authorization` header.
    pub management_token: String,
    /// Timeout for a single HTTP call (in seconds).
    pub timeout_secs: u64,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://mapi.storyblok.com".to_string(),
            space_id: String::new(),
            management_token: String::new(),
            timeout_secs: 30,
        }
    }
}

impl CmsConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> SyncResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults for
    /// optional keys, and validates the result.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SyncResult<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_CMS_URL) {
            config.api_base_url = url;
        }
        if let Some(space) = lookup(ENV_SPACE_ID) {
            config.space_id = space;
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            config.management_token = token;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            config.timeout_secs = timeout.trim().parse().map_err(|_| {
                SyncError::Config(format!("{ENV_TIMEOUT} is not a number: {timeout:?}"))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks that every required setting is present.
    pub fn validate(&self) -> SyncResult<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(SyncError::Config("API base URL is empty".to_string()));
        }
        if self.space_id.trim().is_empty() {
            return Err(SyncError::Config(format!("{ENV_SPACE_ID} is not set")));
        }
        if self.management_token.trim().is_empty() {
            return Err(SyncError::Config(format!("{ENV_TOKEN} is not set")));
        }
        Ok(())
    }
}

/// Settings for one derivation → sync → migration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Namespace prefix for component names (e.g. `blog`).
    pub namespace: String,
    /// Log intended mutations instead of performing them.
    pub dry_run: bool,
    /// Publish migrated stories instead of saving drafts.
    pub publish: bool,
    /// Whether renamed and deleted fields are migrated in stored content.
    pub migrate_content: bool,
    /// Minimum delay between two external calls (in milliseconds).
    pub call_delay_ms: u64,
    /// Maximum attempts for a single read.
    pub read_attempts: u32,
    /// Base delay between read attempts (in milliseconds); grows linearly.
    pub read_backoff_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            dry_run: false,
            publish: false,
            migrate_content: true,
            // 5 requests per second
            call_delay_ms: 200,
            read_attempts: 3,
            read_backoff_ms: 500,
        }
    }
}

impl RunConfig {
    pub fn call_delay(&self) -> Duration {
        Duration::from_millis(self.call_delay_ms)
    }

    /// The read retry policy these settings describe.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.read_attempts, Duration::from_millis(self.read_backoff_ms))
    }
}
