//! Persistent storage for template baselines.
//!
//! A baseline is the last template a run completed against. The next run
//! derives the previous schema from it, so a baseline is only replaced after
//! a run that left nothing half-done.

use crate::error::{SyncError, SyncResult};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// The stored template for one content slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateBaseline {
    pub slug: String,
    /// Canonical name of the root component derived from `template`.
    pub component_name: String,
    pub template: Value,
    pub updated_at: DateTime<Utc>,
}

impl TemplateBaseline {
    /// Creates a baseline stamped with the current time.
    pub fn new(
        slug: impl Into<String>,
        component_name: impl Into<String>,
        template: Value,
    ) -> Self {
        Self {
            slug: slug.into(),
            component_name: component_name.into(),
            template,
            updated_at: Utc::now(),
        }
    }

    /// Returns true if `template` is exactly the stored one.
    ///
    /// Duplicate triggers for an unchanged template can be dropped on this.
    pub fn is_unchanged(&self, template: &Value) -> bool {
        self.template == *template
    }
}

/// Baseline storage keyed by slug.
pub trait TemplateStore: Send + Sync {
    fn load(&self, slug: &str) -> SyncResult<Option<TemplateBaseline>>;

    /// Inserts or replaces the baseline for `baseline.slug`.
    fn save(&self, baseline: &TemplateBaseline) -> SyncResult<()>;
}

fn poisoned<T>(_: T) -> SyncError {
    SyncError::Storage("template store lock poisoned".to_string())
}

/// In-process store, for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    entries: Mutex<HashMap<String, TemplateBaseline>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn load(&self, slug: &str) -> SyncResult<Option<TemplateBaseline>> {
        Ok(self.entries.lock().map_err(poisoned)?.get(slug).cloned())
    }

    fn save(&self, baseline: &TemplateBaseline) -> SyncResult<()> {
        self.entries
            .lock()
            .map_err(poisoned)?
            .insert(baseline.slug.clone(), baseline.clone());
        Ok(())
    }
}

/// Store backed by SQLite.
pub struct SqliteTemplateStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTemplateStore {
    /// Opens (or creates) a store at the given path.
    pub fn new(path: &str) -> SyncResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| SyncError::Storage(format!("failed to open template store: {e}")))?;
        Self::with_connection(conn)
    }

    /// Opens an in-memory store.
    pub fn open_in_memory() -> SyncResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            SyncError::Storage(format!("failed to open in-memory template store: {e}"))
        })?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> SyncResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> SyncResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(poisoned)
    }

    fn init_schema(&self) -> SyncResult<()> {
        self.conn()?.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS template_baselines (
                slug TEXT PRIMARY KEY,
                component_name TEXT NOT NULL,
                template TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Slugs with a stored baseline, sorted.
    pub fn slugs(&self) -> SyncResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT slug FROM template_baselines ORDER BY slug")?;
        let slugs = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(slugs)
    }
}

impl TemplateStore for SqliteTemplateStore {
    fn load(&self, slug: &str) -> SyncResult<Option<TemplateBaseline>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT component_name, template, updated_at
                 FROM template_baselines WHERE slug = ?1",
                params![slug],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((component_name, template, updated_at)) = row else {
            return Ok(None);
        };
        let updated_at = DateTime::parse_from_rfc3339(&updated_at)
            .map_err(|e| SyncError::Storage(format!("bad timestamp for {slug}: {e}")))?
            .with_timezone(&Utc);

        Ok(Some(TemplateBaseline {
            slug: slug.to_string(),
            component_name,
            template: serde_json::from_str(&template)?,
            updated_at,
        }))
    }

    fn save(&self, baseline: &TemplateBaseline) -> SyncResult<()> {
        let template = serde_json::to_string(&baseline.template)?;
        self.conn()?.execute(
            "INSERT INTO template_baselines (slug, component_name, template, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(slug) DO UPDATE SET
                component_name = excluded.component_name,
                template = excluded.template,
                updated_at = excluded.updated_at",
            params![
                baseline.slug,
                baseline.component_name,
                template,
                baseline.updated_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }
}
