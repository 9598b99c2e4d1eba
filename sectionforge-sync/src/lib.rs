//! CMS schema synchronization and content migration for SectionForge.
//!
//! Takes the pure results of `sectionforge-schema` to the outside world:
//!
//! - **Synchronizer**: reconciles the CMS component registry with a
//!   [`SchemaDiff`](sectionforge_model::SchemaDiff) (create/update/delete)
//! - **Migrator**: rewrites stored content instances for renamed and
//!   deleted fields
//! - **Template store**: the last-known template per slug, the baseline the
//!   next diff is computed against
//! - **Pipeline**: one derivation → sync → migration → baseline run
//!
//! # Concurrency
//!
//! Every external call goes through a single [`RateGate`], one at a time,
//! with a fixed minimum delay between calls. Reads are retried a bounded
//! number of times with linear backoff; writes are never retried. A failed
//! item is logged and counted, and the run moves on.
//!
//! # Example
//!
//! ```no_run
//! use sectionforge_sync::cms::HttpCmsClient;
//! use sectionforge_sync::{CmsConfig, MemoryTemplateStore, Pipeline, RunConfig};
//! use std::sync::Arc;
//!
//! # async fn run() -> sectionforge_sync::SyncResult<()> {
//! let client = Arc::new(HttpCmsClient::new(CmsConfig::from_env()?)?);
//! let pipeline = Pipeline::new(
//!     RunConfig { namespace: "blog".to_string(), dry_run: true, ..Default::default() },
//!     client.clone(),
//!     client,
//!     Arc::new(MemoryTemplateStore::new()),
//! );
//!
//! let template = serde_json::json!({"component": "page", "data_section": "blog_section"});
//! let report = pipeline.run("blog", &template).await?;
//! println!("{report:?}");
//! # Ok(())
//! # }
//! ```

pub mod cms;
mod config;
mod error;
mod gate;
mod migrator;
mod pipeline;
mod synchronizer;
pub mod template_store;

pub use config::{CmsConfig, RunConfig};
pub use error::{SyncError, SyncResult};
pub use gate::{RateGate, RetryPolicy};
pub use migrator::{ContentMigrator, FieldOp, MigrationPlan, MigrationReport};
pub use pipeline::{Pipeline, RunReport};
pub use synchronizer::{ComponentSynchronizer, SyncReport};
pub use template_store::{MemoryTemplateStore, SqliteTemplateStore, TemplateBaseline, TemplateStore};
