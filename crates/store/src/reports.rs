//! In-memory report store.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use outlay_core::report::{ReportAggregate, ReportRepository};
use outlay_core::workflow::WorkflowError;
use outlay_shared::types::{ReportId, WorkspaceId};
use tracing::debug;

/// Report store backed by concurrent hash maps.
///
/// Intended for tests, demos and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryReportStore {
    reports: DashMap<ReportId, ReportAggregate>,
    url_ids: DashMap<WorkspaceId, u32>,
}

impl InMemoryReportStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Returns true if no reports are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    fn next_url_id(&self, workspace: WorkspaceId) -> u32 {
        let mut last = self.url_ids.entry(workspace).or_insert(0);
        *last += 1;
        *last
    }
}

impl ReportRepository for InMemoryReportStore {
    fn insert(&self, mut report: ReportAggregate) -> Result<ReportAggregate, WorkflowError> {
        match self.reports.entry(report.id()) {
            Entry::Occupied(_) => Err(WorkflowError::Storage(format!(
                "report {} already exists",
                report.id()
            ))),
            Entry::Vacant(slot) => {
                report.assign_url_id(self.next_url_id(report.workspace()));
                debug!(report_id = %report.id(), url_id = report.url_id(), "Report stored");
                slot.insert(report.clone());
                Ok(report)
            }
        }
    }

    fn find_by_id(&self, id: ReportId) -> Result<Option<ReportAggregate>, WorkflowError> {
        Ok(self.reports.get(&id).map(|entry| entry.value().clone()))
    }

    fn find_by_slug(
        &self,
        workspace: WorkspaceId,
        slug: &str,
    ) -> Result<Option<ReportAggregate>, WorkflowError> {
        Ok(self
            .reports
            .iter()
            .find(|entry| entry.workspace() == workspace && entry.slug() == slug)
            .map(|entry| entry.value().clone()))
    }

    fn list_by_workspace(
        &self,
        workspace: WorkspaceId,
    ) -> Result<Vec<ReportAggregate>, WorkflowError> {
        let mut reports: Vec<_> = self
            .reports
            .iter()
            .filter(|entry| entry.workspace() == workspace)
            .map(|entry| entry.value().clone())
            .collect();
        reports.sort_by_key(ReportAggregate::url_id);
        Ok(reports)
    }

    fn update<T, F>(&self, id: ReportId, f: F) -> Result<T, WorkflowError>
    where
        F: FnOnce(&mut ReportAggregate) -> Result<T, WorkflowError>,
    {
        // The slot stays write-locked until the change is committed.
        let mut slot = self
            .reports
            .get_mut(&id)
            .ok_or(WorkflowError::ReportNotFound(id))?;

        let mut working = slot.value().clone();
        let value = f(&mut working)?;
        *slot.value_mut() = working;
        Ok(value)
    }

    fn delete<F>(&self, id: ReportId, check: F) -> Result<(), WorkflowError>
    where
        F: FnOnce(&ReportAggregate) -> Result<(), WorkflowError>,
    {
        match self.reports.entry(id) {
            Entry::Vacant(_) => Err(WorkflowError::ReportNotFound(id)),
            Entry::Occupied(slot) => {
                check(slot.get())?;
                slot.remove();
                debug!(report_id = %id, "Report removed");
                Ok(())
            }
        }
    }
}
