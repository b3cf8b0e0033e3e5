//! In-memory persistence for Outlay.
//!
//! Implements the repository and role resolver ports of `outlay-core`.
//! Each report lives in its own `DashMap` slot, so a unit of work holds the
//! slot exclusively while it runs and concurrent work on the same report is
//! serialized.
//!
//! # Modules
//!
//! - `reports` - Report store with per-workspace `url_id` sequences
//! - `roles` - Workspace role directory

pub mod reports;
pub mod roles;

pub use reports::InMemoryReportStore;
pub use roles::InMemoryRoleDirectory;
