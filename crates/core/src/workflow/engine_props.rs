//! Property-based tests for the workflow engine.
//!
//! The transition table is checked against an independent statement of who
//! may do what, over every status, transition and kind of actor.

use proptest::prelude::*;

use crate::report::test_support::{at, draft_with_items, report_in};
use crate::workflow::{
    Actor, ErrorKind, ReportStatus, RoleSet, Transition, WorkflowPolicy, WorkspaceRole,
};
use outlay_shared::ClosePolicy;
use outlay_shared::types::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActorKind {
    OwnerMember,
    OwnerReviewer,
    OtherReviewer,
    OtherMember,
    Outsider,
}

impl ActorKind {
    fn is_owner(self) -> bool {
        matches!(self, Self::OwnerMember | Self::OwnerReviewer)
    }

    fn is_reviewer(self) -> bool {
        matches!(self, Self::OwnerReviewer | Self::OtherReviewer)
    }

    fn actor(self, owner: UserId) -> Actor {
        let user = if self.is_owner() { owner } else { UserId::new() };
        let roles = match self {
            Self::OwnerMember | Self::OtherMember => RoleSet::member(),
            Self::OwnerReviewer | Self::OtherReviewer => RoleSet::reviewer(),
            Self::Outsider => RoleSet::new(),
        };
        Actor::new(user, roles)
    }
}

/// Strategy for generating random ReportStatus values.
fn arb_status() -> impl Strategy<Value = ReportStatus> {
    prop::sample::select(ReportStatus::ALL.to_vec())
}

/// Strategy for generating random Transition values.
fn arb_transition() -> impl Strategy<Value = Transition> {
    prop::sample::select(Transition::ALL.to_vec())
}

/// Strategy for generating every kind of actor relative to a report.
fn arb_actor_kind() -> impl Strategy<Value = ActorKind> {
    prop_oneof![
        Just(ActorKind::OwnerMember),
        Just(ActorKind::OwnerReviewer),
        Just(ActorKind::OtherReviewer),
        Just(ActorKind::OtherMember),
        Just(ActorKind::Outsider),
    ]
}

/// Strategy for generating workflow policies.
fn arb_policy() -> impl Strategy<Value = WorkflowPolicy> {
    prop_oneof![
        Just(ClosePolicy::ReviewerOnly),
        Just(ClosePolicy::ReviewerOrOwner),
    ]
    .prop_map(|close_policy| WorkflowPolicy {
        close_policy,
        reviewer_history: None,
    })
}

/// Expected outcome of a transition on a report with at least one line item.
fn expected(
    status: ReportStatus,
    transition: Transition,
    kind: ActorKind,
    policy: &WorkflowPolicy,
) -> Result<ReportStatus, ErrorKind> {
    use ReportStatus as S;
    use Transition as T;

    let (to, allowed) = match (status, transition) {
        (S::Draft, T::Submit) | (S::Rejected, T::Resubmit) => (S::PendingReview, kind.is_owner()),
        (S::PendingReview, T::Accept) => (S::Accepted, kind.is_reviewer() && !kind.is_owner()),
        (S::PendingReview, T::ReturnForReview) => (S::Draft, kind.is_reviewer()),
        (S::PendingReview, T::Reject) => (S::Rejected, kind.is_reviewer()),
        (S::PendingReview, T::Withdraw) => (S::Withdrawn, kind.is_owner()),
        (S::Accepted, T::Close) => (
            S::Closed,
            kind.is_reviewer() || (kind.is_owner() && policy.owner_may_close()),
        ),
        _ => return Err(ErrorKind::IllegalTransition),
    };

    if allowed {
        Ok(to)
    } else {
        Err(ErrorKind::Authorization)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A transition succeeds iff its edge exists and its guards pass;
    /// otherwise it fails with the documented kind and changes nothing.
    #[test]
    fn prop_transition_matches_table(
        status in arb_status(),
        transition in arb_transition(),
        kind in arb_actor_kind(),
        policy in arb_policy(),
    ) {
        let owner = UserId::new();
        let actor = kind.actor(owner);
        let mut report = report_in(status, owner);
        let history_len = report.history().len();
        let updated_at = report.updated_at();

        let result = report.transition(&policy, transition, &actor, None, at(1_000));

        match (result, expected(status, transition, kind, &policy)) {
            (Ok(record), Ok(to)) => {
                prop_assert_eq!(record.from, status);
                prop_assert_eq!(record.to, to);
                prop_assert_eq!(report.status(), to);
                prop_assert_eq!(report.history().len(), history_len + 1);
            }
            (Err(err), Err(want)) => {
                prop_assert_eq!(err.kind(), want);
                prop_assert_eq!(report.status(), status);
                prop_assert_eq!(report.history().len(), history_len);
                prop_assert_eq!(report.updated_at(), updated_at);
            }
            (got, want) => {
                prop_assert!(false, "got {:?}, expected {:?}", got.map(|r| r.to), want);
            }
        }
    }

    /// canEdit holds exactly for the owner of a draft.
    #[test]
    fn prop_can_edit_iff_draft_and_owner(
        status in arb_status(),
        kind in arb_actor_kind(),
    ) {
        let owner = UserId::new();
        let report = report_in(status, owner);
        let can_edit = report
            .workflow(&WorkflowPolicy::default())
            .can_edit(&kind.actor(owner));

        prop_assert_eq!(can_edit, status == ReportStatus::Draft && kind.is_owner());
    }

    /// Accepting one's own report is always an authorization failure.
    #[test]
    fn prop_self_review_rejected(policy in arb_policy()) {
        let owner = UserId::new();
        let mut report = report_in(ReportStatus::PendingReview, owner);
        let mut roles = RoleSet::member();
        roles.insert(WorkspaceRole::Reviewer);

        let err = report
            .transition(&policy, Transition::Accept, &Actor::new(owner, roles), None, at(1_000))
            .unwrap_err();

        prop_assert_eq!(err.kind(), ErrorKind::Authorization);
        prop_assert_eq!(report.status(), ReportStatus::PendingReview);
    }

    /// Submitting an empty draft fails the business rule, never the role check.
    #[test]
    fn prop_empty_submit_is_precondition(
        kind in prop_oneof![Just(ActorKind::OwnerMember), Just(ActorKind::OwnerReviewer)],
    ) {
        let owner = UserId::new();
        let mut report = draft_with_items(owner, &[]);

        let err = report
            .transition(
                &WorkflowPolicy::default(),
                Transition::Submit,
                &kind.actor(owner),
                None,
                at(1_000),
            )
            .unwrap_err();

        prop_assert_eq!(err.kind(), ErrorKind::Precondition);
        prop_assert_eq!(report.status(), ReportStatus::Draft);
    }
}
