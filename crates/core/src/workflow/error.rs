//! Workflow error types for the expense report lifecycle.
//!
//! Every failure the engine, the line item ledger or the report service can
//! produce is a variant of [`WorkflowError`]. The presentation layer maps
//! them to user-facing messages through [`WorkflowError::error_code`] and
//! [`WorkflowError::status_code`].

use outlay_shared::types::{AmountError, LineItemId, ReportId, UserId};
use thiserror::Error;

use crate::workflow::types::{ReportStatus, Transition};

/// Errors that can occur during workflow operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// No transition with this name leaves the current status.
    #[error("Transition {transition} is not allowed from status {from}")]
    IllegalTransition {
        /// The current status.
        from: ReportStatus,
        /// The attempted transition.
        transition: Transition,
    },

    /// The actor's role or ownership does not permit the action.
    #[error("User {user_id} is not authorized to {action} this report")]
    Unauthorized {
        /// The user who attempted the action.
        user_id: UserId,
        /// The attempted action.
        action: &'static str,
    },

    /// A business rule guarding the transition does not hold.
    #[error("Precondition failed: {reason}")]
    Precondition {
        /// Machine-readable reason, e.g. `no_line_items`.
        reason: &'static str,
    },

    /// The report's status does not allow the requested change.
    #[error("Cannot {action} a report in status {status}")]
    InvalidState {
        /// The current status.
        status: ReportStatus,
        /// The attempted action.
        action: &'static str,
    },

    /// Report not found.
    #[error("Report {0} not found")]
    ReportNotFound(ReportId),

    /// Line item not found on the report.
    #[error("Line item {0} not found")]
    LineItemNotFound(LineItemId),

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The record store failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Broad error categories the caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No such edge from the current status.
    IllegalTransition,
    /// Role or ownership guard failed.
    Authorization,
    /// Business-rule guard failed.
    Precondition,
    /// Mutation attempted outside an editable status.
    InvalidState,
    /// Referenced report or line item is absent.
    NotFound,
    /// Input rejected before reaching the workflow.
    Validation,
    /// Record store failure.
    Storage,
}

impl WorkflowError {
    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::IllegalTransition { .. } => ErrorKind::IllegalTransition,
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::Precondition { .. } => ErrorKind::Precondition,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::ReportNotFound(_) | Self::LineItemNotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::IllegalTransition { .. } | Self::InvalidState { .. } | Self::Validation(_) => {
                400
            }
            Self::Unauthorized { .. } => 403,
            Self::ReportNotFound(_) | Self::LineItemNotFound(_) => 404,
            Self::Precondition { .. } => 422,
            Self::Storage(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::IllegalTransition { .. } => "ILLEGAL_TRANSITION",
            Self::Unauthorized { .. } => "NOT_AUTHORIZED",
            Self::Precondition { .. } => "PRECONDITION_FAILED",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::ReportNotFound(_) => "REPORT_NOT_FOUND",
            Self::LineItemNotFound(_) => "LINE_ITEM_NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl From<AmountError> for WorkflowError {
    fn from(err: AmountError) -> Self {
        Self::Validation(err.to_string())
    }
}
