//! Workflow domain types for the expense report lifecycle.
//!
//! This module defines the report states, the named transitions between
//! them, and the audit records a transition leaves behind.

use chrono::{DateTime, Utc};
use outlay_shared::types::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expense report status in the approval workflow.
///
/// Reports start in `Draft`. The valid transitions are:
/// - Draft → PendingReview (submit)
/// - Rejected → PendingReview (resubmit)
/// - PendingReview → Accepted (accept)
/// - PendingReview → Draft (return_for_review)
/// - PendingReview → Rejected (reject)
/// - PendingReview → Withdrawn (withdraw)
/// - Accepted → Closed (close)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Report is being drafted and its line items can be changed.
    Draft,
    /// Report has been submitted (or resubmitted) and awaits a reviewer.
    PendingReview,
    /// Report was accepted by a reviewer.
    Accepted,
    /// Report was rejected by a reviewer.
    Rejected,
    /// Accepted report has been settled and closed.
    Closed,
    /// Owner pulled the report back out of review.
    Withdrawn,
}

impl ReportStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Draft,
        Self::PendingReview,
        Self::Accepted,
        Self::Rejected,
        Self::Closed,
        Self::Withdrawn,
    ];

    /// Statuses a reviewer may query and audit.
    ///
    /// Listing queries and `can_view` both read this constant so the two
    /// never disagree.
    pub const REVIEWABLE: [Self; 5] = [
        Self::PendingReview,
        Self::Accepted,
        Self::Rejected,
        Self::Closed,
        Self::Withdrawn,
    ];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingReview => "pending_review",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Closed => "closed",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "pending_review" => Some(Self::PendingReview),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            "closed" => Some(Self::Closed),
            "withdrawn" => Some(Self::Withdrawn),
            _ => None,
        }
    }

    /// Returns true if line items and attributes may be changed.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if reviewers may see reports in this status.
    #[must_use]
    pub fn is_reviewable(&self) -> bool {
        Self::REVIEWABLE.contains(self)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named workflow transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Owner sends a draft for review.
    Submit,
    /// Owner sends a rejected report back for review.
    Resubmit,
    /// Reviewer accepts a pending report.
    Accept,
    /// Reviewer sends a pending report back to draft.
    ReturnForReview,
    /// Reviewer rejects a pending report.
    Reject,
    /// Owner withdraws a pending report.
    Withdraw,
    /// An accepted report is closed out.
    Close,
}

impl Transition {
    /// Every transition, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Submit,
        Self::Resubmit,
        Self::Accept,
        Self::ReturnForReview,
        Self::Reject,
        Self::Withdraw,
        Self::Close,
    ];

    /// Returns the string representation of the transition.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Resubmit => "resubmit",
            Self::Accept => "accept",
            Self::ReturnForReview => "return_for_review",
            Self::Reject => "reject",
            Self::Withdraw => "withdraw",
            Self::Close => "close",
        }
    }

    /// Parses a transition from its name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "submit" => Some(Self::Submit),
            "resubmit" => Some(Self::Resubmit),
            "accept" => Some(Self::Accept),
            "return_for_review" => Some(Self::ReturnForReview),
            "reject" => Some(Self::Reject),
            "withdraw" => Some(Self::Withdraw),
            "close" => Some(Self::Close),
            _ => None,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audit entry appended to a report for every applied transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The transition that was applied.
    pub transition: Transition,
    /// Status before the transition.
    pub from: ReportStatus,
    /// Status after the transition.
    pub to: ReportStatus,
    /// The user who performed it.
    pub actor: UserId,
    /// When it was applied.
    pub at: DateTime<Utc>,
    /// Free-text notes supplied with the transition.
    pub notes: Option<String>,
}

/// The most recent reviewer decision on a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// The reviewer who decided.
    pub reviewer: UserId,
    /// The decision that was taken.
    pub decision: Transition,
    /// Notes left for the owner.
    pub notes: Option<String>,
    /// When the decision was recorded.
    pub reviewed_at: DateTime<Utc>,
}
