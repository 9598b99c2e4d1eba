//! Reconciles the CMS component registry with a schema diff.

use crate::cms::ComponentRegistry;
use crate::gate::{RateGate, RetryPolicy};
use sectionforge_model::{DerivedComponent, SchemaDiff};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Counts from one registry reconciliation.
///
/// In dry-run mode the counts are the writes that would have happened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    /// Removed components that were not in the registry.
    pub skipped: usize,
    pub failed: usize,
}

impl SyncReport {
    /// Total writes performed (or intended).
    pub fn writes(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

/// Pushes a [`SchemaDiff`] to a [`ComponentRegistry`].
///
/// Components are matched to registry entries by canonical name. Upserts
/// prefer update over create so that a diff computed against a stale baseline
/// still converges.
pub struct ComponentSynchronizer {
    registry: Arc<dyn ComponentRegistry>,
    gate: Arc<RateGate>,
    retry: RetryPolicy,
    dry_run: bool,
}

impl ComponentSynchronizer {
    pub fn new(
        registry: Arc<dyn ComponentRegistry>,
        gate: Arc<RateGate>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            registry,
            gate,
            retry,
            dry_run: false,
        }
    }

    /// Logs intended writes instead of performing them.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Applies `diff` to the registry.
    ///
    /// Never fails as a whole: each failed write is logged and counted. If
    /// the registry cannot be listed, every intended write counts as failed.
    pub async fn apply(&self, diff: &SchemaDiff) -> SyncReport {
        let mut report = SyncReport::default();
        if diff.registry_operations() == 0 {
            debug!("Schema diff has no registry operations");
            return report;
        }

        let existing = match self
            .retry
            .read(&self.gate, "list components", || self.registry.list_components())
            .await
        {
            Ok(components) => components,
            Err(e) => {
                warn!("Cannot list registry components, sync skipped: {}", e);
                report.failed = diff.registry_operations();
                return report;
            }
        };
        let mut ids: HashMap<String, u64> =
            existing.into_iter().map(|c| (c.name, c.id)).collect();

        for component in diff.new_components.iter().chain(&diff.changed_components) {
            self.upsert(component, &mut ids, &mut report).await;
        }
        for name in &diff.removed_components {
            self.remove(name, &ids, &mut report).await;
        }

        info!(
            "Registry sync finished: {} created, {} updated, {} deleted, {} skipped, {} failed",
            report.created, report.updated, report.deleted, report.skipped, report.failed
        );
        report
    }

    async fn upsert(
        &self,
        component: &DerivedComponent,
        ids: &mut HashMap<String, u64>,
        report: &mut SyncReport,
    ) {
        match ids.get(&component.name).copied() {
            Some(id) => {
                if self.dry_run {
                    info!("[dry-run] Would update component {} ({})", component.name, id);
                    report.updated += 1;
                    return;
                }
                match self
                    .gate
                    .run(|| self.registry.update_component(id, component))
                    .await
                {
                    Ok(()) => report.updated += 1,
                    Err(e) => {
                        warn!("Failed to update component {}: {}", component.name, e);
                        report.failed += 1;
                    }
                }
            }
            None => {
                if self.dry_run {
                    info!("[dry-run] Would create component {}", component.name);
                    report.created += 1;
                    return;
                }
                match self.gate.run(|| self.registry.create_component(component)).await {
                    Ok(created) => {
                        ids.insert(created.name, created.id);
                        report.created += 1;
                    }
                    Err(e) => {
                        warn!("Failed to create component {}: {}", component.name, e);
                        report.failed += 1;
                    }
                }
            }
        }
    }

    async fn remove(&self, name: &str, ids: &HashMap<String, u64>, report: &mut SyncReport) {
        let Some(&id) = ids.get(name) else {
            debug!("Removed component {} is not in the registry", name);
            report.skipped += 1;
            return;
        };
        if self.dry_run {
            info!("[dry-run] Would delete component {} ({})", name, id);
            report.deleted += 1;
            return;
        }
        match self.gate.run(|| self.registry.delete_component(id)).await {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                warn!("Failed to delete component {}: {}", name, e);
                report.failed += 1;
            }
        }
    }
}
