//! # Inventory Reporter
//!
//! Drives one report run over an authenticated session:
//!
//! 1. open the sink (truncate + header)
//! 2. enumerate applications
//! 3. drop applications rejected by the health filter
//! 4. fetch each remaining application's resource tree and emit one row per node
//!
//! Everything runs sequentially, one request in flight at a time, in the order
//! the controller returns applications and nodes. The first error aborts the
//! run; whatever rows were written before it stay in the flushed file.
//! Orphaned nodes are never reported.

use crate::argocd::{Application, Session};
use crate::deprecations::{self, KubeVersion};
use crate::error::Result;
use crate::report::filter::HealthFilter;
use crate::report::row::{NameFormat, ReportRow};
use crate::report::sink::CsvSink;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Counters for a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub applications_listed: usize,
    pub applications_reported: usize,
    pub applications_skipped: usize,
    pub rows_written: usize,
    pub deprecated_rows: usize,
}

#[derive(Debug)]
pub struct Reporter {
    session: Session,
    output: PathBuf,
    health_filter: HealthFilter,
    name_format: NameFormat,
    kube_version: Option<KubeVersion>,
}

impl Reporter {
    #[must_use]
    pub fn new(session: Session, output: impl Into<PathBuf>) -> Self {
        Self {
            session,
            output: output.into(),
            health_filter: HealthFilter::default(),
            name_format: NameFormat::default(),
            kube_version: None,
        }
    }

    #[must_use]
    pub fn with_health_filter(mut self, health_filter: HealthFilter) -> Self {
        self.health_filter = health_filter;
        self
    }

    #[must_use]
    pub fn with_name_format(mut self, name_format: NameFormat) -> Self {
        self.name_format = name_format;
        self
    }

    /// Warn about reported resources using APIs deprecated or removed by `version`
    #[must_use]
    pub fn with_kube_version(mut self, version: Option<KubeVersion>) -> Self {
        self.kube_version = version;
        self
    }

    /// Produce the report
    ///
    /// The sink is flushed and closed whether or not the run succeeds. When
    /// both the run and the final flush fail, the run's error is returned.
    ///
    /// # Errors
    /// The first `ReportError` raised by the sink or any API call
    pub async fn run(&self) -> Result<RunSummary> {
        let mut sink = CsvSink::create(&self.output, self.name_format)?;
        debug!(path = %sink.path().display(), "opened report");

        let mut summary = RunSummary::default();
        let outcome = self.emit(&mut sink, &mut summary).await;

        match (outcome, sink.finish()) {
            (Ok(()), Ok(rows)) => {
                summary.rows_written = rows;
                info!(
                    path = %self.output.display(),
                    applications = summary.applications_listed,
                    reported = summary.applications_reported,
                    skipped = summary.applications_skipped,
                    rows = summary.rows_written,
                    "report written"
                );
                Ok(summary)
            }
            (Ok(()), Err(err)) => Err(err),
            (Err(err), flushed) => {
                if let Err(flush_err) = flushed {
                    warn!(error = %flush_err, "failed to flush partial report");
                }
                Err(err)
            }
        }
    }

    async fn emit(&self, sink: &mut CsvSink, summary: &mut RunSummary) -> Result<()> {
        let applications = self.session.list_applications().await?.items;
        summary.applications_listed = applications.len();

        for application in &applications {
            if !self.health_filter.admits(application) {
                warn!(
                    app = %application.name(),
                    status = %application.health_status(),
                    "skipping application with unaccepted health status"
                );
                summary.applications_skipped += 1;
                continue;
            }

            self.emit_application(application, sink, summary).await?;
            summary.applications_reported += 1;
        }

        Ok(())
    }

    async fn emit_application(
        &self,
        application: &Application,
        sink: &mut CsvSink,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let name = application.name();
        debug!(app = %name, "fetching resource tree");

        let tree = self.session.resource_tree(name).await?;

        for node in &tree.nodes {
            let row = ReportRow::from_node(name, node, self.name_format);
            if self.warn_deprecated(&row) {
                summary.deprecated_rows += 1;
            }
            sink.write_row(&row)?;
        }
        sink.flush()?;

        debug!(app = %name, rows = tree.nodes.len(), "fetched resource tree");
        Ok(())
    }

    /// Log every known deprecation or removal affecting `row`; true if any matched
    fn warn_deprecated(&self, row: &ReportRow) -> bool {
        let Some(target) = self.kube_version else {
            return false;
        };

        let mut matched = false;
        for (since, change) in deprecations::changes_for(&row.group, &row.version, &row.kind, target)
        {
            matched = true;
            warn!(
                app = %row.application,
                resource = %row.name,
                gvk = %change.resource,
                change = change.kind.as_str(),
                since = %since,
                replaced_by = %change
                    .replaced_by
                    .map(|gvk| gvk.to_string())
                    .unwrap_or_default(),
                notable_changes = ?change.notable_changes,
                "resource uses an api that is {} as of kubernetes {}",
                change.kind.as_str(),
                since
            );
        }
        matched
    }
}
