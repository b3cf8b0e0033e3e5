//! Guard predicates evaluated by the transition table.
//!
//! Role and ownership checks are pure functions over the actor, the report
//! and the policy. Business-rule checks return a reason code on failure.

use crate::report::ReportAggregate;
use crate::workflow::actor::{Actor, WorkspaceRole};
use crate::workflow::policy::WorkflowPolicy;

/// Everything a guard may look at.
#[derive(Debug, Clone, Copy)]
pub struct GuardContext<'a> {
    /// The user attempting the transition.
    pub actor: &'a Actor,
    /// The report snapshot the transition applies to.
    pub report: &'a ReportAggregate,
    /// Deployment policy.
    pub policy: &'a WorkflowPolicy,
}

/// Role or ownership check.
pub type AuthorizeFn = fn(&GuardContext<'_>) -> bool;

/// Business-rule check, returning a reason code when it fails.
pub type PreconditionFn = fn(&ReportAggregate) -> Result<(), &'static str>;

/// Returns true if the actor filed the report.
#[must_use]
pub fn is_owner(actor: &Actor, report: &ReportAggregate) -> bool {
    actor.user_id == report.owner()
}

/// Returns true if the actor reviews in the report's workspace.
#[must_use]
pub fn is_reviewer(actor: &Actor) -> bool {
    actor.roles.contains(WorkspaceRole::Reviewer)
}

pub(crate) fn owner(ctx: &GuardContext<'_>) -> bool {
    is_owner(ctx.actor, ctx.report)
}

pub(crate) fn reviewer(ctx: &GuardContext<'_>) -> bool {
    is_reviewer(ctx.actor)
}

/// Reviewers may not accept their own reports.
pub(crate) fn independent_reviewer(ctx: &GuardContext<'_>) -> bool {
    is_reviewer(ctx.actor) && !is_owner(ctx.actor, ctx.report)
}

pub(crate) fn closer(ctx: &GuardContext<'_>) -> bool {
    is_reviewer(ctx.actor) || (ctx.policy.owner_may_close() && is_owner(ctx.actor, ctx.report))
}

pub(crate) fn has_line_items(report: &ReportAggregate) -> Result<(), &'static str> {
    if report.line_items().is_empty() {
        Err("no_line_items")
    } else {
        Ok(())
    }
}
