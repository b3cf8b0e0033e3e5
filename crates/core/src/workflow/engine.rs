//! The expense report state machine.
//!
//! Legal transitions live in a single table mapping `(status, transition)`
//! to guards and a target status. [`WorkflowEngine`] is a read-only view of
//! one report bound to a policy; it answers visibility questions and
//! validates transitions. Applying a validated transition is done by
//! [`ReportAggregate::transition`].

use chrono::{DateTime, Utc};

use crate::report::ReportAggregate;
use crate::workflow::actor::Actor;
use crate::workflow::error::WorkflowError;
use crate::workflow::guards::{self, AuthorizeFn, GuardContext, PreconditionFn};
use crate::workflow::policy::WorkflowPolicy;
use crate::workflow::types::{ReportStatus, Transition};

/// One row of the transition table.
#[derive(Clone, Copy)]
pub struct TransitionRule {
    /// The named transition.
    pub transition: Transition,
    /// Status the report must be in.
    pub from: ReportStatus,
    /// Status the report moves to.
    pub to: ReportStatus,
    /// Whether the transition records a reviewer decision.
    pub records_review: bool,
    authorize: AuthorizeFn,
    precondition: Option<PreconditionFn>,
}

impl std::fmt::Debug for TransitionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionRule")
            .field("transition", &self.transition)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("records_review", &self.records_review)
            .finish_non_exhaustive()
    }
}

static TRANSITION_TABLE: [TransitionRule; 7] = [
    TransitionRule {
        transition: Transition::Submit,
        from: ReportStatus::Draft,
        to: ReportStatus::PendingReview,
        records_review: false,
        authorize: guards::owner,
        precondition: Some(guards::has_line_items),
    },
    TransitionRule {
        transition: Transition::Resubmit,
        from: ReportStatus::Rejected,
        to: ReportStatus::PendingReview,
        records_review: false,
        authorize: guards::owner,
        precondition: Some(guards::has_line_items),
    },
    TransitionRule {
        transition: Transition::Accept,
        from: ReportStatus::PendingReview,
        to: ReportStatus::Accepted,
        records_review: true,
        authorize: guards::independent_reviewer,
        precondition: None,
    },
    TransitionRule {
        transition: Transition::ReturnForReview,
        from: ReportStatus::PendingReview,
        to: ReportStatus::Draft,
        records_review: true,
        authorize: guards::reviewer,
        precondition: None,
    },
    TransitionRule {
        transition: Transition::Reject,
        from: ReportStatus::PendingReview,
        to: ReportStatus::Rejected,
        records_review: true,
        authorize: guards::reviewer,
        precondition: None,
    },
    TransitionRule {
        transition: Transition::Withdraw,
        from: ReportStatus::PendingReview,
        to: ReportStatus::Withdrawn,
        records_review: false,
        authorize: guards::owner,
        precondition: None,
    },
    TransitionRule {
        transition: Transition::Close,
        from: ReportStatus::Accepted,
        to: ReportStatus::Closed,
        records_review: false,
        authorize: guards::closer,
        precondition: None,
    },
];

/// Returns the full transition table.
#[must_use]
pub fn transition_table() -> &'static [TransitionRule] {
    &TRANSITION_TABLE
}

/// Looks up the rule for `transition` out of `from`.
#[must_use]
pub fn rule_for(from: ReportStatus, transition: Transition) -> Option<&'static TransitionRule> {
    TRANSITION_TABLE
        .iter()
        .find(|rule| rule.from == from && rule.transition == transition)
}

static REVIEWABLE_STATES: [ReportStatus; 5] = ReportStatus::REVIEWABLE;

/// Statuses a reviewer may filter and search on.
#[must_use]
pub fn reviewable_states() -> &'static [ReportStatus] {
    &REVIEWABLE_STATES
}

/// A report bound to a workflow policy.
#[derive(Debug, Clone, Copy)]
pub struct WorkflowEngine<'a> {
    report: &'a ReportAggregate,
    policy: &'a WorkflowPolicy,
}

impl<'a> WorkflowEngine<'a> {
    /// Binds a report to a policy.
    #[must_use]
    pub const fn new(report: &'a ReportAggregate, policy: &'a WorkflowPolicy) -> Self {
        Self { report, policy }
    }

    /// The report's current status.
    #[must_use]
    pub fn status(&self) -> ReportStatus {
        self.report.status()
    }

    /// Returns true if the report is a draft.
    ///
    /// Only drafts may be deleted outright.
    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.status() == ReportStatus::Draft
    }

    /// Returns true if `actor` may see the report at `now`.
    ///
    /// Owners always see their reports. Reviewers see reports in the
    /// reviewable set, subject to the policy's history window.
    #[must_use]
    pub fn can_view(&self, actor: &Actor, now: DateTime<Utc>) -> bool {
        guards::is_owner(actor, self.report)
            || (guards::is_reviewer(actor)
                && self
                    .policy
                    .reviewer_can_see(self.status(), self.report.updated_at(), now))
    }

    /// Returns true if `actor` may change the report's contents.
    #[must_use]
    pub fn can_edit(&self, actor: &Actor) -> bool {
        self.status().is_editable() && guards::is_owner(actor, self.report)
    }

    /// Transitions leaving the current status whose role guard `actor` passes.
    ///
    /// Business-rule guards are not evaluated, so a listed transition may
    /// still fail with a precondition error.
    #[must_use]
    pub fn available_transitions(&self, actor: &Actor) -> Vec<Transition> {
        let ctx = self.context(actor);
        TRANSITION_TABLE
            .iter()
            .filter(|rule| rule.from == self.status() && (rule.authorize)(&ctx))
            .map(|rule| rule.transition)
            .collect()
    }

    /// Validates `transition` for `actor` against this snapshot.
    ///
    /// Checks run in a fixed order: the edge must exist, then the role or
    /// ownership guard, then business rules.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::IllegalTransition` if no such edge leaves the current status
    /// * `WorkflowError::Unauthorized` if the role/ownership guard fails
    /// * `WorkflowError::Precondition` if a business rule fails
    pub fn check(
        &self,
        transition: Transition,
        actor: &Actor,
    ) -> Result<&'static TransitionRule, WorkflowError> {
        let from = self.status();
        let rule = rule_for(from, transition)
            .ok_or(WorkflowError::IllegalTransition { from, transition })?;

        if !(rule.authorize)(&self.context(actor)) {
            return Err(WorkflowError::Unauthorized {
                user_id: actor.user_id,
                action: transition.as_str(),
            });
        }

        if let Some(precondition) = rule.precondition {
            precondition(self.report).map_err(|reason| WorkflowError::Precondition { reason })?;
        }

        Ok(rule)
    }

    fn context<'b>(&'b self, actor: &'b Actor) -> GuardContext<'b> {
        GuardContext {
            actor,
            report: self.report,
            policy: self.policy,
        }
    }
}
