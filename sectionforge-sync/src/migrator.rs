//! Rewrites stored content for renamed and deleted fields.
//!
//! The store has no query by component kind, so a migration scans the whole
//! corpus: list every story, fetch each one, transform it, and write it back
//! only if something changed. A second pass over a migrated corpus writes
//! nothing.

use crate::cms::ContentApi;
use crate::gate::{RateGate, RetryPolicy};
use sectionforge_model::SchemaDiff;
use sectionforge_schema::walker::transform;
use sectionforge_types::Namespace;
use sectionforge_types::node::COMPONENT_KEY;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One field rewrite on instances of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldOp {
    /// Move `from` to `to` when `from` is present and `to` is absent.
    Rename { from: String, to: String },
    /// Remove the field if present.
    Delete { field: String },
}

impl FieldOp {
    /// Applies the op to one node. Returns true if the node changed.
    fn apply(&self, node: &mut Map<String, Value>) -> bool {
        match self {
            FieldOp::Rename { from, to } => {
                if node.contains_key(to) {
                    return false;
                }
                match node.remove(from) {
                    Some(value) => {
                        node.insert(to.clone(), value);
                        true
                    }
                    None => false,
                }
            }
            FieldOp::Delete { field } => node.remove(field).is_some(),
        }
    }
}

/// Field ops per affected component, keyed by local name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationPlan {
    namespace: Namespace,
    ops: BTreeMap<String, Vec<FieldOp>>,
}

impl MigrationPlan {
    /// Builds the plan for a diff. Renames come before deletions within a
    /// component. Removed components are affected but carry no ops.
    pub fn from_diff(diff: &SchemaDiff, namespace: &Namespace) -> Self {
        let mut ops: BTreeMap<String, Vec<FieldOp>> = BTreeMap::new();

        for name in diff.affected_components() {
            if let Ok(qualified) = namespace.qualify(name) {
                ops.entry(qualified.local().to_string()).or_default();
            }
        }
        for rename in &diff.field_renames {
            if let Ok(qualified) = namespace.qualify(&rename.component) {
                ops.entry(qualified.local().to_string())
                    .or_default()
                    .push(FieldOp::Rename {
                        from: rename.old_field.clone(),
                        to: rename.new_field.clone(),
                    });
            }
        }
        for deletion in &diff.field_deletions {
            if let Ok(qualified) = namespace.qualify(&deletion.component) {
                ops.entry(qualified.local().to_string())
                    .or_default()
                    .push(FieldOp::Delete {
                        field: deletion.field.clone(),
                    });
            }
        }

        Self {
            namespace: namespace.clone(),
            ops,
        }
    }

    /// Returns true if no content could change under this plan.
    pub fn is_empty(&self) -> bool {
        self.ops.values().all(Vec::is_empty)
    }

    /// Returns true if instances of `kind` are affected.
    pub fn affects(&self, kind: &str) -> bool {
        self.ops_for(kind).is_some()
    }

    /// Ops for instances of `kind`, if it is affected.
    pub fn ops_for(&self, kind: &str) -> Option<&[FieldOp]> {
        let qualified = self.namespace.qualify(kind).ok()?;
        self.ops.get(qualified.local()).map(Vec::as_slice)
    }

    /// Applies the plan to a content tree.
    ///
    /// Returns the rewritten tree, or `None` if nothing changed.
    pub fn apply(&self, content: &Value) -> Option<Value> {
        let mut changes = 0usize;
        let rewritten = transform(content, &mut |mut node| {
            let ops = node
                .get(COMPONENT_KEY)
                .and_then(Value::as_str)
                .and_then(|kind| self.ops_for(kind));
            if let Some(ops) = ops {
                for op in ops {
                    if op.apply(&mut node) {
                        changes += 1;
                    }
                }
            }
            node
        });
        (changes > 0).then_some(rewritten)
    }
}

/// Counts from one migration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Stories listed.
    pub scanned: usize,
    /// Stories written (or, in dry-run, that would have been).
    pub migrated: usize,
    /// Stories the plan left untouched.
    pub unchanged: usize,
    /// Stories that could not be read.
    pub skipped: usize,
    /// Failed writes, plus a failed listing.
    pub failed: usize,
}

impl MigrationReport {
    /// Returns true if every story was read and every write succeeded.
    pub fn is_clean(&self) -> bool {
        self.skipped == 0 && self.failed == 0
    }
}

/// Applies a [`MigrationPlan`] across the stored corpus.
pub struct ContentMigrator {
    content: Arc<dyn ContentApi>,
    gate: Arc<RateGate>,
    retry: RetryPolicy,
    dry_run: bool,
    publish: bool,
}

impl ContentMigrator {
    pub fn new(content: Arc<dyn ContentApi>, gate: Arc<RateGate>, retry: RetryPolicy) -> Self {
        Self {
            content,
            gate,
            retry,
            dry_run: false,
            publish: false,
        }
    }

    /// Logs intended writes instead of performing them.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Publishes migrated stories instead of saving drafts.
    #[must_use]
    pub fn publish(mut self, publish: bool) -> Self {
        self.publish = publish;
        self
    }

    /// Runs one pass over the corpus.
    pub async fn migrate(&self, plan: &MigrationPlan) -> MigrationReport {
        let mut report = MigrationReport::default();
        if plan.is_empty() {
            debug!("Migration plan is empty, skipping corpus scan");
            return report;
        }

        let stubs = match self
            .retry
            .read(&self.gate, "list stories", || self.content.list_story_stubs())
            .await
        {
            Ok(stubs) => stubs,
            Err(e) => {
                warn!("Cannot list stories, migration skipped: {}", e);
                report.failed += 1;
                return report;
            }
        };
        info!("Scanning {} stories for migration", stubs.len());

        for stub in stubs {
            report.scanned += 1;
            let what = format!("fetch story {}", stub.id);
            let story = match self
                .retry
                .read(&self.gate, &what, || self.content.fetch_story(stub.id))
                .await
            {
                Ok(story) => story,
                Err(e) => {
                    warn!("Skipping story {} ({}): {}", stub.id, stub.slug, e);
                    report.skipped += 1;
                    continue;
                }
            };

            let Some(content) = plan.apply(&story.content) else {
                debug!("Story {} unchanged", story.slug);
                report.unchanged += 1;
                continue;
            };

            if self.dry_run {
                info!("[dry-run] Would migrate story {} ({})", story.id, story.slug);
                report.migrated += 1;
                continue;
            }

            match self
                .gate
                .run(|| self.content.update_story(story.id, &content, self.publish))
                .await
            {
                Ok(()) => {
                    info!("Migrated story {} ({})", story.id, story.slug);
                    report.migrated += 1;
                }
                Err(e) => {
                    warn!("Failed to migrate story {} ({}): {}", story.id, story.slug, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Migration finished: {} scanned, {} migrated, {} unchanged, {} skipped, {} failed",
            report.scanned, report.migrated, report.unchanged, report.skipped, report.failed
        );
        report
    }
}
