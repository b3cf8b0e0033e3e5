//! Expense report workflow.
//!
//! This module implements the report lifecycle state machine, the role and
//! ownership guards that protect it, and the policy knobs a deployment can
//! tune.
//!
//! # Modules
//!
//! - `types` - Workflow domain types (`ReportStatus`, `Transition`, records)
//! - `error` - Workflow-specific error types
//! - `actor` - Actors and workspace roles
//! - `policy` - Close permission and reviewer history window
//! - `guards` - Guard predicates
//! - `engine` - Transition table and the workflow engine

pub mod actor;
pub mod engine;
pub mod error;
pub mod guards;
pub mod policy;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use actor::{Actor, RoleSet, WorkspaceRole};
pub use engine::{TransitionRule, WorkflowEngine, reviewable_states, rule_for, transition_table};
pub use error::{ErrorKind, WorkflowError};
pub use policy::WorkflowPolicy;
pub use types::{ReportStatus, ReviewRecord, Transition, TransitionRecord};
