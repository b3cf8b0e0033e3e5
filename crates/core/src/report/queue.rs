//! Review queue ordering.

use crate::report::aggregate::ReportAggregate;
use crate::workflow::ReportStatus;

/// Orders reports for the review queue.
///
/// Reports awaiting review come first, then drafts, then settled reports.
/// Ties are broken by creation time, oldest first. Reports that still tie
/// keep their input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewQueueSorter;

impl ReviewQueueSorter {
    /// Position of `status` in the queue; lower sorts first.
    #[must_use]
    pub const fn rank(status: ReportStatus) -> u8 {
        match status {
            ReportStatus::PendingReview => 0,
            ReportStatus::Draft => 1,
            ReportStatus::Accepted => 2,
            ReportStatus::Rejected => 3,
            ReportStatus::Withdrawn => 4,
            ReportStatus::Closed => 5,
        }
    }

    /// Sorts `reports` in place.
    pub fn sort(reports: &mut [ReportAggregate]) {
        reports.sort_by_key(|report| (Self::rank(report.status()), report.created_at()));
    }

    /// Returns `reports` in queue order.
    #[must_use]
    pub fn sorted(mut reports: Vec<ReportAggregate>) -> Vec<ReportAggregate> {
        Self::sort(&mut reports);
        reports
    }
}
