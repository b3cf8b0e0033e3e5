//! Report service.
//!
//! Ties the aggregate to its injected collaborators: a repository that runs
//! each mutation as one atomic unit of work, a role resolver and a clock.
//! Every mutation loads the report, resolves the actor's roles in the
//! report's workspace and then re-checks all guards against the stored
//! state inside the unit of work.

use std::sync::Arc;

use outlay_shared::types::{BudgetId, LineItemId, ReportId, UserId, WorkspaceId};
use tracing::{debug, info, warn};

use crate::report::aggregate::{ReportAggregate, ReportAttributes};
use crate::report::clock::{Clock, SystemClock};
use crate::report::line_items::{ExpenseLineItem, LineItemInput};
use crate::report::queue::ReviewQueueSorter;
use crate::workflow::engine;
use crate::workflow::error::WorkflowError;
use crate::workflow::{Actor, ReportStatus, RoleSet, Transition, TransitionRecord, WorkflowPolicy};

/// Repository trait for report persistence.
///
/// Implementations must run `update` and `delete` atomically per report:
/// the closure sees the current stored state, and its changes are committed
/// only when it returns `Ok`. Concurrent units of work on the same report are
/// serialized.
pub trait ReportRepository: Send + Sync {
    /// Stores a new report, assigning its per-workspace `url_id`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Storage` if the report already exists.
    fn insert(&self, report: ReportAggregate) -> Result<ReportAggregate, WorkflowError>;

    /// Find a report by id.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Storage` if the store fails.
    fn find_by_id(&self, id: ReportId) -> Result<Option<ReportAggregate>, WorkflowError>;

    /// Find a report by its slug within a workspace.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Storage` if the store fails.
    fn find_by_slug(
        &self,
        workspace: WorkspaceId,
        slug: &str,
    ) -> Result<Option<ReportAggregate>, WorkflowError>;

    /// All reports in a workspace, ordered by `url_id`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Storage` if the store fails.
    fn list_by_workspace(&self, workspace: WorkspaceId)
    -> Result<Vec<ReportAggregate>, WorkflowError>;

    /// Runs `f` against the stored report as one unit of work.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::ReportNotFound` if no report has `id`, or the
    /// error returned by `f`, in which case nothing is committed.
    fn update<T, F>(&self, id: ReportId, f: F) -> Result<T, WorkflowError>
    where
        F: FnOnce(&mut ReportAggregate) -> Result<T, WorkflowError>;

    /// Removes the report if `check` passes against the stored state.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::ReportNotFound` if no report has `id`, or the
    /// error returned by `check`.
    fn delete<F>(&self, id: ReportId, check: F) -> Result<(), WorkflowError>
    where
        F: FnOnce(&ReportAggregate) -> Result<(), WorkflowError>;
}

/// Resolves the roles a user holds in a workspace.
pub trait RoleResolver: Send + Sync {
    /// Roles of `user` in `workspace`; empty when the user is not a member.
    fn roles(&self, workspace: WorkspaceId, user: UserId) -> RoleSet;
}

/// Expense report service.
pub struct ReportService<R, A, C = SystemClock> {
    repo: Arc<R>,
    roles: Arc<A>,
    clock: Arc<C>,
    policy: WorkflowPolicy,
}

impl<R, A, C> ReportService<R, A, C>
where
    R: ReportRepository,
    A: RoleResolver,
    C: Clock,
{
    /// Create a new report service.
    #[must_use]
    pub fn new(repo: Arc<R>, roles: Arc<A>, clock: Arc<C>, policy: WorkflowPolicy) -> Self {
        Self {
            repo,
            roles,
            clock,
            policy,
        }
    }

    /// The policy this service enforces.
    #[must_use]
    pub const fn policy(&self) -> &WorkflowPolicy {
        &self.policy
    }

    /// Creates and stores a new draft owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` for a blank title, or a storage error.
    pub fn create_draft(
        &self,
        workspace: WorkspaceId,
        owner: UserId,
        attributes: ReportAttributes,
    ) -> Result<ReportAggregate, WorkflowError> {
        let draft = ReportAggregate::create_draft(workspace, owner, attributes, self.clock.now())?;
        let report = self.repo.insert(draft)?;

        info!(
            report_id = %report.id(),
            workspace_id = %workspace,
            owner_id = %owner,
            slug = %report.slug(),
            "Draft report created"
        );
        Ok(report)
    }

    /// Fetches a report `user` may see.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::ReportNotFound` if no report has `report_id`
    /// * `WorkflowError::Unauthorized` if `user` may not see it
    pub fn get(&self, report_id: ReportId, user: UserId) -> Result<ReportAggregate, WorkflowError> {
        let report = self.load(report_id)?;
        self.ensure_visible(report, user)
    }

    /// Fetches a report by slug.
    ///
    /// Returns `None` when no report in the workspace has `slug`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Unauthorized` if `user` may not see the report.
    pub fn find_by_slug(
        &self,
        workspace: WorkspaceId,
        slug: &str,
        user: UserId,
    ) -> Result<Option<ReportAggregate>, WorkflowError> {
        self.repo
            .find_by_slug(workspace, slug)?
            .map(|report| self.ensure_visible(report, user))
            .transpose()
    }

    /// Replaces a draft's attributes.
    ///
    /// # Errors
    ///
    /// See [`ReportAggregate::edit`].
    pub fn edit_report(
        &self,
        report_id: ReportId,
        user: UserId,
        attributes: ReportAttributes,
    ) -> Result<ReportAggregate, WorkflowError> {
        let actor = self.actor_for(report_id, user)?;
        let now = self.clock.now();

        self.repo
            .update(report_id, |report| {
                report.edit(&actor, attributes)?;
                report.touch(now);
                Ok(report.clone())
            })
            .inspect(|report| debug!(report_id = %report_id, name = %report.name(), "Report edited"))
            .inspect_err(|err| rejected("edit", report_id, user, err))
    }

    /// Deletes a draft.
    ///
    /// # Errors
    ///
    /// See [`ReportAggregate::ensure_deletable`].
    pub fn delete_report(&self, report_id: ReportId, user: UserId) -> Result<(), WorkflowError> {
        let actor = self.actor_for(report_id, user)?;
        let now = self.clock.now();

        self.repo
            .delete(report_id, |report| {
                report.ensure_deletable(&actor, &self.policy, now)
            })
            .inspect(|()| info!(report_id = %report_id, user_id = %user, "Report deleted"))
            .inspect_err(|err| rejected("delete", report_id, user, err))
    }

    /// Adds a line item to a draft.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::Unauthorized` if `user` does not own the report
    /// * `WorkflowError::InvalidState` if the report is not a draft
    /// * `WorkflowError::Validation` if the input is malformed
    pub fn add_line_item(
        &self,
        report_id: ReportId,
        user: UserId,
        input: &LineItemInput,
    ) -> Result<ExpenseLineItem, WorkflowError> {
        let actor = self.actor_for(report_id, user)?;
        let now = self.clock.now();

        self.repo
            .update(report_id, |report| {
                let item = report.line_item_ledger(&actor)?.add_item(input)?;
                report.touch(now);
                Ok(item)
            })
            .inspect(|item| {
                debug!(report_id = %report_id, line_item_id = %item.id, seq = item.seq, "Line item added");
            })
            .inspect_err(|err| rejected("add_line_item", report_id, user, err))
    }

    /// Replaces the fields of a line item on a draft.
    ///
    /// # Errors
    ///
    /// As [`Self::add_line_item`], plus `WorkflowError::LineItemNotFound`.
    pub fn update_line_item(
        &self,
        report_id: ReportId,
        user: UserId,
        line_item_id: LineItemId,
        input: &LineItemInput,
    ) -> Result<ExpenseLineItem, WorkflowError> {
        let actor = self.actor_for(report_id, user)?;
        let now = self.clock.now();

        self.repo
            .update(report_id, |report| {
                let item = report
                    .line_item_ledger(&actor)?
                    .update_item(line_item_id, input)?;
                report.touch(now);
                Ok(item)
            })
            .inspect(|item| {
                debug!(report_id = %report_id, line_item_id = %item.id, "Line item updated");
            })
            .inspect_err(|err| rejected("update_line_item", report_id, user, err))
    }

    /// Removes a line item from a draft.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::Unauthorized` if `user` does not own the report
    /// * `WorkflowError::InvalidState` if the report is not a draft
    /// * `WorkflowError::LineItemNotFound` if no item has `line_item_id`
    pub fn remove_line_item(
        &self,
        report_id: ReportId,
        user: UserId,
        line_item_id: LineItemId,
    ) -> Result<ExpenseLineItem, WorkflowError> {
        let actor = self.actor_for(report_id, user)?;
        let now = self.clock.now();

        self.repo
            .update(report_id, |report| {
                let item = report.line_item_ledger(&actor)?.remove_item(line_item_id)?;
                report.touch(now);
                Ok(item)
            })
            .inspect(|item| {
                debug!(report_id = %report_id, line_item_id = %item.id, "Line item removed");
            })
            .inspect_err(|err| rejected("remove_line_item", report_id, user, err))
    }

    /// Applies a named transition on behalf of `user`.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::ReportNotFound` if no report has `report_id`
    /// * `WorkflowError::IllegalTransition` if no such edge leaves the current status
    /// * `WorkflowError::Unauthorized` if the role/ownership guard fails
    /// * `WorkflowError::Precondition` if a business rule fails
    pub fn transition(
        &self,
        report_id: ReportId,
        transition: Transition,
        user: UserId,
        notes: Option<String>,
    ) -> Result<TransitionRecord, WorkflowError> {
        let actor = self.actor_for(report_id, user)?;
        let now = self.clock.now();

        self.repo
            .update(report_id, |report| {
                report.transition(&self.policy, transition, &actor, notes, now)
            })
            .inspect(|record| {
                info!(
                    report_id = %report_id,
                    user_id = %user,
                    transition = %transition,
                    from = %record.from,
                    to = %record.to,
                    "Report transitioned"
                );
            })
            .inspect_err(|err| rejected(transition.as_str(), report_id, user, err))
    }

    /// Transitions `user` could attempt from the report's current status.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::ReportNotFound` if no report has `report_id`
    /// * `WorkflowError::Unauthorized` if `user` may not see the report
    pub fn available_transitions(
        &self,
        report_id: ReportId,
        user: UserId,
    ) -> Result<Vec<Transition>, WorkflowError> {
        let report = self.get(report_id, user)?;
        let actor = self.actor(report.workspace(), user);
        Ok(report.workflow(&self.policy).available_transitions(&actor))
    }

    /// Returns true if `user` may see the report.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::ReportNotFound` if no report has `report_id`.
    pub fn can_view(&self, report_id: ReportId, user: UserId) -> Result<bool, WorkflowError> {
        let report = self.load(report_id)?;
        let actor = self.actor(report.workspace(), user);
        Ok(report
            .workflow(&self.policy)
            .can_view(&actor, self.clock.now()))
    }

    /// Returns true if `user` may change the report's contents.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::ReportNotFound` if no report has `report_id`.
    pub fn can_edit(&self, report_id: ReportId, user: UserId) -> Result<bool, WorkflowError> {
        let report = self.load(report_id)?;
        let actor = self.actor(report.workspace(), user);
        Ok(report.workflow(&self.policy).can_edit(&actor))
    }

    /// Reports in `workspace` that `user` may see, in review queue order.
    ///
    /// When `budget` is set only reports charged against it are returned.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Storage` if the store fails.
    pub fn list_for_actor(
        &self,
        workspace: WorkspaceId,
        user: UserId,
        budget: Option<BudgetId>,
    ) -> Result<Vec<ReportAggregate>, WorkflowError> {
        let actor = self.actor(workspace, user);
        let now = self.clock.now();

        let visible: Vec<_> = self
            .repo
            .list_by_workspace(workspace)?
            .into_iter()
            .filter(|report| budget.is_none_or(|budget| report.budget() == Some(budget)))
            .filter(|report| report.workflow(&self.policy).can_view(&actor, now))
            .collect();

        debug!(
            workspace_id = %workspace,
            user_id = %user,
            count = visible.len(),
            "Listed reports for actor"
        );
        Ok(ReviewQueueSorter::sorted(visible))
    }

    /// Statuses a reviewer may filter on.
    #[must_use]
    pub fn reviewable_states(&self) -> &'static [ReportStatus] {
        engine::reviewable_states()
    }

    fn actor(&self, workspace: WorkspaceId, user: UserId) -> Actor {
        Actor::new(user, self.roles.roles(workspace, user))
    }

    fn actor_for(&self, report_id: ReportId, user: UserId) -> Result<Actor, WorkflowError> {
        let report = self.load(report_id)?;
        Ok(self.actor(report.workspace(), user))
    }

    fn load(&self, report_id: ReportId) -> Result<ReportAggregate, WorkflowError> {
        self.repo
            .find_by_id(report_id)?
            .ok_or(WorkflowError::ReportNotFound(report_id))
    }

    fn ensure_visible(
        &self,
        report: ReportAggregate,
        user: UserId,
    ) -> Result<ReportAggregate, WorkflowError> {
        let actor = self.actor(report.workspace(), user);
        if report
            .workflow(&self.policy)
            .can_view(&actor, self.clock.now())
        {
            Ok(report)
        } else {
            Err(WorkflowError::Unauthorized {
                user_id: user,
                action: "view",
            })
        }
    }
}

fn rejected(operation: &str, report_id: ReportId, user: UserId, err: &WorkflowError) {
    warn!(
        report_id = %report_id,
        user_id = %user,
        operation,
        error_code = err.error_code(),
        error = %err,
        "Report operation rejected"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::clock::ManualClock;
    use crate::report::test_support::{at, attributes, input};
    use crate::workflow::WorkspaceRole;
    use chrono::Duration;
    use outlay_shared::ClosePolicy;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock repository for testing.
    #[derive(Default)]
    struct MockReportRepository {
        reports: Mutex<HashMap<ReportId, ReportAggregate>>,
    }

    impl ReportRepository for MockReportRepository {
        fn insert(&self, mut report: ReportAggregate) -> Result<ReportAggregate, WorkflowError> {
            let mut reports = self.reports.lock().unwrap();
            let url_id = reports
                .values()
                .filter(|r| r.workspace() == report.workspace())
                .count() as u32
                + 1;
            report.assign_url_id(url_id);
            reports.insert(report.id(), report.clone());
            Ok(report)
        }

        fn find_by_id(&self, id: ReportId) -> Result<Option<ReportAggregate>, WorkflowError> {
            Ok(self.reports.lock().unwrap().get(&id).cloned())
        }

        fn find_by_slug(
            &self,
            workspace: WorkspaceId,
            slug: &str,
        ) -> Result<Option<ReportAggregate>, WorkflowError> {
            Ok(self
                .reports
                .lock()
                .unwrap()
                .values()
                .find(|r| r.workspace() == workspace && r.slug() == slug)
                .cloned())
        }

        fn list_by_workspace(
            &self,
            workspace: WorkspaceId,
        ) -> Result<Vec<ReportAggregate>, WorkflowError> {
            let mut reports: Vec<_> = self
                .reports
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.workspace() == workspace)
                .cloned()
                .collect();
            reports.sort_by_key(ReportAggregate::url_id);
            Ok(reports)
        }

        fn update<T, F>(&self, id: ReportId, f: F) -> Result<T, WorkflowError>
        where
            F: FnOnce(&mut ReportAggregate) -> Result<T, WorkflowError>,
        {
            let mut reports = self.reports.lock().unwrap();
            let stored = reports.get_mut(&id).ok_or(WorkflowError::ReportNotFound(id))?;
            let mut working = stored.clone();
            let value = f(&mut working)?;
            *stored = working;
            Ok(value)
        }

        fn delete<F>(&self, id: ReportId, check: F) -> Result<(), WorkflowError>
        where
            F: FnOnce(&ReportAggregate) -> Result<(), WorkflowError>,
        {
            let mut reports = self.reports.lock().unwrap();
            let stored = reports.get(&id).ok_or(WorkflowError::ReportNotFound(id))?;
            check(stored)?;
            reports.remove(&id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockRoles {
        grants: Mutex<HashMap<(WorkspaceId, UserId), RoleSet>>,
    }

    impl MockRoles {
        fn grant(&self, workspace: WorkspaceId, user: UserId, role: WorkspaceRole) {
            self.grants
                .lock()
                .unwrap()
                .entry((workspace, user))
                .or_default()
                .insert(role);
        }
    }

    impl RoleResolver for MockRoles {
        fn roles(&self, workspace: WorkspaceId, user: UserId) -> RoleSet {
            self.grants
                .lock()
                .unwrap()
                .get(&(workspace, user))
                .cloned()
                .unwrap_or_default()
        }
    }

    struct Fixture {
        service: ReportService<MockReportRepository, MockRoles, ManualClock>,
        clock: Arc<ManualClock>,
        workspace: WorkspaceId,
        owner: UserId,
        reviewer: UserId,
    }

    fn fixture(policy: WorkflowPolicy) -> Fixture {
        let roles = Arc::new(MockRoles::default());
        let clock = Arc::new(ManualClock::new(at(0)));
        let workspace = WorkspaceId::new();
        let owner = UserId::new();
        let reviewer = UserId::new();
        roles.grant(workspace, owner, WorkspaceRole::Member);
        roles.grant(workspace, reviewer, WorkspaceRole::Member);
        roles.grant(workspace, reviewer, WorkspaceRole::Reviewer);

        Fixture {
            service: ReportService::new(
                Arc::new(MockReportRepository::default()),
                roles,
                Arc::clone(&clock),
                policy,
            ),
            clock,
            workspace,
            owner,
            reviewer,
        }
    }

    impl Fixture {
        fn submitted(&self, title: &str) -> ReportAggregate {
            let report = self
                .service
                .create_draft(self.workspace, self.owner, attributes(title))
                .unwrap();
            self.service
                .add_line_item(report.id(), self.owner, &input(dec!(42)))
                .unwrap();
            self.service
                .transition(report.id(), Transition::Submit, self.owner, None)
                .unwrap();
            self.service.get(report.id(), self.owner).unwrap()
        }
    }

    #[test]
    fn test_create_draft_assigns_slug() {
        let fx = fixture(WorkflowPolicy::default());
        let first = fx
            .service
            .create_draft(fx.workspace, fx.owner, attributes("Hotel in Goa"))
            .unwrap();
        let second = fx
            .service
            .create_draft(fx.workspace, fx.owner, attributes("Hotel in Goa"))
            .unwrap();

        assert_eq!(first.slug(), "1-hotel-in-goa");
        assert_eq!(second.slug(), "2-hotel-in-goa");

        let found = fx
            .service
            .find_by_slug(fx.workspace, "2-hotel-in-goa", fx.owner)
            .unwrap()
            .unwrap();
        assert_eq!(found.id(), second.id());
        assert!(fx
            .service
            .find_by_slug(fx.workspace, "3-hotel-in-goa", fx.owner)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_line_items_through_service() {
        let fx = fixture(WorkflowPolicy::default());
        let report = fx
            .service
            .create_draft(fx.workspace, fx.owner, attributes("Client dinner"))
            .unwrap();

        fx.clock.advance(Duration::minutes(3));
        let first = fx
            .service
            .add_line_item(report.id(), fx.owner, &input(dec!(12.40)))
            .unwrap();
        fx.service
            .add_line_item(report.id(), fx.owner, &input(dec!(7.60)))
            .unwrap();
        fx.service
            .remove_line_item(report.id(), fx.owner, first.id)
            .unwrap();

        let stored = fx.service.get(report.id(), fx.owner).unwrap();
        assert_eq!(stored.line_items().len(), 1);
        assert_eq!(stored.line_items()[0].seq, 1);
        assert_eq!(stored.total().value(), dec!(7.60));
        assert_eq!(stored.updated_at(), at(3));
    }

    #[test]
    fn test_reviewer_cannot_edit_line_items() {
        let fx = fixture(WorkflowPolicy::default());
        let report = fx
            .service
            .create_draft(fx.workspace, fx.owner, attributes("Client dinner"))
            .unwrap();

        let err = fx
            .service
            .add_line_item(report.id(), fx.reviewer, &input(dec!(1)))
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Unauthorized { .. }));
        assert!(!fx.service.can_edit(report.id(), fx.reviewer).unwrap());
        assert!(fx.service.can_edit(report.id(), fx.owner).unwrap());
    }

    #[test]
    fn test_failed_unit_of_work_commits_nothing() {
        let fx = fixture(WorkflowPolicy::default());
        let report = fx
            .service
            .create_draft(fx.workspace, fx.owner, attributes("Client dinner"))
            .unwrap();

        assert!(fx
            .service
            .add_line_item(report.id(), fx.owner, &input(dec!(-3)))
            .is_err());

        let stored = fx.service.get(report.id(), fx.owner).unwrap();
        assert!(stored.line_items().is_empty());
        assert_eq!(stored.updated_at(), report.updated_at());
    }

    #[test]
    fn test_review_cycle() {
        let fx = fixture(WorkflowPolicy::default());
        let report = fx.submitted("Sales kickoff");

        let err = fx
            .service
            .transition(report.id(), Transition::Accept, fx.owner, None)
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Unauthorized { .. }));

        fx.service
            .transition(
                report.id(),
                Transition::Reject,
                fx.reviewer,
                Some("Receipt missing".to_string()),
            )
            .unwrap();
        fx.service
            .transition(report.id(), Transition::Resubmit, fx.owner, None)
            .unwrap();
        let record = fx
            .service
            .transition(report.id(), Transition::Accept, fx.reviewer, None)
            .unwrap();

        assert_eq!(record.to, ReportStatus::Accepted);
        let stored = fx.service.get(report.id(), fx.owner).unwrap();
        assert_eq!(stored.history().len(), 4);
        assert_eq!(stored.review().unwrap().reviewer, fx.reviewer);
    }

    #[test]
    fn test_unknown_report() {
        let fx = fixture(WorkflowPolicy::default());
        let missing = ReportId::new();
        assert_eq!(
            fx.service
                .transition(missing, Transition::Submit, fx.owner, None)
                .unwrap_err(),
            WorkflowError::ReportNotFound(missing)
        );
        assert_eq!(
            fx.service.can_view(missing, fx.owner).unwrap_err(),
            WorkflowError::ReportNotFound(missing)
        );
    }

    #[test]
    fn test_outsider_cannot_view() {
        let fx = fixture(WorkflowPolicy::default());
        let report = fx.submitted("Sales kickoff");
        let outsider = UserId::new();

        assert!(!fx.service.can_view(report.id(), outsider).unwrap());
        assert!(matches!(
            fx.service.get(report.id(), outsider),
            Err(WorkflowError::Unauthorized { action: "view", .. })
        ));
    }

    #[test]
    fn test_available_transitions_for_roles() {
        let fx = fixture(WorkflowPolicy::default());
        let report = fx.submitted("Sales kickoff");

        assert_eq!(
            fx.service
                .available_transitions(report.id(), fx.owner)
                .unwrap(),
            vec![Transition::Withdraw]
        );
        assert_eq!(
            fx.service
                .available_transitions(report.id(), fx.reviewer)
                .unwrap(),
            vec![
                Transition::Accept,
                Transition::ReturnForReview,
                Transition::Reject
            ]
        );
    }

    #[test]
    fn test_list_for_actor_orders_queue() {
        let fx = fixture(WorkflowPolicy::default());
        let pending = fx.submitted("Pending one");
        fx.clock.advance(Duration::minutes(1));
        let draft = fx
            .service
            .create_draft(fx.workspace, fx.owner, attributes("Still drafting"))
            .unwrap();

        let owner_view: Vec<_> = fx
            .service
            .list_for_actor(fx.workspace, fx.owner, None)
            .unwrap()
            .iter()
            .map(ReportAggregate::id)
            .collect();
        assert_eq!(owner_view, vec![pending.id(), draft.id()]);

        let reviewer_view: Vec<_> = fx
            .service
            .list_for_actor(fx.workspace, fx.reviewer, None)
            .unwrap()
            .iter()
            .map(ReportAggregate::id)
            .collect();
        assert_eq!(reviewer_view, vec![pending.id()]);
    }

    #[test]
    fn test_list_for_actor_budget_filter() {
        let fx = fixture(WorkflowPolicy::default());
        let budget = BudgetId::new();
        let mut charged = attributes("Charged");
        charged.budget = Some(budget);

        let in_budget = fx
            .service
            .create_draft(fx.workspace, fx.owner, charged)
            .unwrap();
        fx.service
            .create_draft(fx.workspace, fx.owner, attributes("Uncharged"))
            .unwrap();

        let listed = fx
            .service
            .list_for_actor(fx.workspace, fx.owner, Some(budget))
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), in_budget.id());
    }

    #[test]
    fn test_owner_close_policy() {
        let fx = fixture(WorkflowPolicy {
            close_policy: ClosePolicy::ReviewerOrOwner,
            reviewer_history: None,
        });
        let report = fx.submitted("Sales kickoff");
        fx.service
            .transition(report.id(), Transition::Accept, fx.reviewer, None)
            .unwrap();

        let record = fx
            .service
            .transition(report.id(), Transition::Close, fx.owner, None)
            .unwrap();
        assert_eq!(record.to, ReportStatus::Closed);
    }

    #[test]
    fn test_delete_only_drafts() {
        let fx = fixture(WorkflowPolicy::default());
        let submitted = fx.submitted("Sales kickoff");
        assert!(matches!(
            fx.service.delete_report(submitted.id(), fx.owner),
            Err(WorkflowError::InvalidState { .. })
        ));

        let draft = fx
            .service
            .create_draft(fx.workspace, fx.owner, attributes("Scratch"))
            .unwrap();
        fx.service.delete_report(draft.id(), fx.owner).unwrap();
        assert_eq!(
            fx.service.get(draft.id(), fx.owner).unwrap_err(),
            WorkflowError::ReportNotFound(draft.id())
        );
    }

    #[test]
    fn test_edit_report() {
        let fx = fixture(WorkflowPolicy::default());
        let report = fx
            .service
            .create_draft(fx.workspace, fx.owner, attributes("Scratch"))
            .unwrap();

        let edited = fx
            .service
            .edit_report(report.id(), fx.owner, attributes("Airport taxi"))
            .unwrap();
        assert_eq!(edited.slug(), "1-airport-taxi");
    }

    #[test]
    fn test_reviewable_states() {
        let fx = fixture(WorkflowPolicy::default());
        assert_eq!(fx.service.reviewable_states().len(), 5);
    }
}
