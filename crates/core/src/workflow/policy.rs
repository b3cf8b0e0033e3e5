//! Configurable workflow policy.

use chrono::{DateTime, Duration, Utc};
use outlay_shared::{ClosePolicy, WorkflowConfig};

use crate::workflow::types::ReportStatus;

/// Knobs that vary between deployments without changing the state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowPolicy {
    /// Who may perform the `close` transition.
    pub close_policy: ClosePolicy,
    /// How long reviewers keep seeing closed and withdrawn reports.
    ///
    /// `None` keeps them visible indefinitely.
    pub reviewer_history: Option<Duration>,
}

impl WorkflowPolicy {
    /// Returns true if the report owner may close an accepted report.
    #[must_use]
    pub fn owner_may_close(&self) -> bool {
        self.close_policy == ClosePolicy::ReviewerOrOwner
    }

    /// Returns true if a reviewer may still see a report in `status`
    /// last modified at `modified_at`.
    #[must_use]
    pub fn reviewer_can_see(
        &self,
        status: ReportStatus,
        modified_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        if !status.is_reviewable() {
            return false;
        }
        match (status, self.reviewer_history) {
            // A window reaching past the end of time never expires.
            (ReportStatus::Closed | ReportStatus::Withdrawn, Some(window)) => modified_at
                .checked_add_signed(window)
                .is_none_or(|until| until >= now),
            _ => true,
        }
    }
}

impl From<&WorkflowConfig> for WorkflowPolicy {
    fn from(config: &WorkflowConfig) -> Self {
        Self {
            close_policy: config.close_policy,
            reviewer_history: config
                .reviewer_history_days
                .map(|days| Duration::days(i64::from(days))),
        }
    }
}
