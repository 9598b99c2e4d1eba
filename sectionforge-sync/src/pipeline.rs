//! One derivation → sync → migration run.

use crate::cms::{ComponentRegistry, ContentApi};
use crate::config::RunConfig;
use crate::error::SyncResult;
use crate::gate::RateGate;
use crate::migrator::{ContentMigrator, MigrationPlan, MigrationReport};
use crate::synchronizer::{ComponentSynchronizer, SyncReport};
use crate::template_store::{TemplateBaseline, TemplateStore};
use sectionforge_model::SchemaDiff;
use sectionforge_schema::{SchemaDeriver, diff_components};
use sectionforge_types::Namespace;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a [`Pipeline::run`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// The template matched the stored baseline; nothing was done.
    pub unchanged: bool,
    pub dry_run: bool,
    pub diff: SchemaDiff,
    pub sync: SyncReport,
    pub migration: MigrationReport,
    /// Whether the template became the new baseline.
    pub baseline_saved: bool,
}

impl RunReport {
    /// Items that must be retried by a later run: failed writes plus stories
    /// that could not be read. Removed components already missing from the
    /// registry are not counted.
    pub fn failures(&self) -> usize {
        self.sync.failed + self.migration.failed + self.migration.skipped
    }
}

/// Everything one run needs, passed explicitly.
///
/// All external calls made by the run share one [`RateGate`].
pub struct Pipeline {
    config: RunConfig,
    namespace: Namespace,
    registry: Arc<dyn ComponentRegistry>,
    content: Arc<dyn ContentApi>,
    store: Arc<dyn TemplateStore>,
    gate: Arc<RateGate>,
}

impl Pipeline {
    pub fn new(
        config: RunConfig,
        registry: Arc<dyn ComponentRegistry>,
        content: Arc<dyn ContentApi>,
        store: Arc<dyn TemplateStore>,
    ) -> Self {
        let gate = Arc::new(RateGate::new(config.call_delay()));
        Self {
            namespace: Namespace::new(&config.namespace),
            config,
            registry,
            content,
            store,
            gate,
        }
    }

    /// Runs the pipeline for the template stored under `slug`.
    ///
    /// Fails before any external write if the baseline cannot be loaded or
    /// either template does not derive. Per-item failures are counted in the
    /// report instead. The template becomes the new baseline only when the
    /// run was not a dry run and finished without failures, so a later run
    /// repeats whatever is left.
    pub async fn run(&self, slug: &str, template: &Value) -> SyncResult<RunReport> {
        let mut report = RunReport {
            dry_run: self.config.dry_run,
            ..Default::default()
        };

        let baseline = self.store.load(slug)?;
        if baseline.as_ref().is_some_and(|b| b.is_unchanged(template)) {
            info!("Template {} matches its baseline, nothing to do", slug);
            report.unchanged = true;
            return Ok(report);
        }

        let deriver = SchemaDeriver::new(self.namespace.clone());
        let previous = match &baseline {
            Some(baseline) => deriver.derive(&baseline.template)?,
            None => Vec::new(),
        };
        let next = deriver.derive(template)?;
        report.diff = diff_components(&previous, &next);
        debug!(
            "Diff for {}: {} registry operations, migration {}",
            slug,
            report.diff.registry_operations(),
            if report.diff.requires_migration() { "needed" } else { "not needed" }
        );

        let retry = self.config.retry_policy();
        report.sync = ComponentSynchronizer::new(self.registry.clone(), self.gate.clone(), retry)
            .dry_run(self.config.dry_run)
            .apply(&report.diff)
            .await;

        if self.config.migrate_content && report.diff.requires_migration() {
            let plan = MigrationPlan::from_diff(&report.diff, &self.namespace);
            report.migration = ContentMigrator::new(self.content.clone(), self.gate.clone(), retry)
                .dry_run(self.config.dry_run)
                .publish(self.config.publish)
                .migrate(&plan)
                .await;
        }

        if self.config.dry_run {
            info!(
                "[dry-run] Run for {} would make {} registry writes",
                slug,
                report.sync.writes()
            );
            return Ok(report);
        }
        if report.failures() > 0 {
            warn!(
                "Run for {} had {} failures, keeping the previous baseline",
                slug,
                report.failures()
            );
            return Ok(report);
        }

        // the template root is always the first section discovered
        let component_name = next
            .first()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| self.namespace.root_section().canonical());
        self.store
            .save(&TemplateBaseline::new(slug, component_name, template.clone()))?;
        report.baseline_saved = true;
        info!("Saved baseline for {}", slug);

        Ok(report)
    }
}
