//! Core business logic for Outlay.
//!
//! This crate contains the expense report workflow with no storage or
//! transport dependencies. Persistence, role lookup and time are injected
//! through the traits in [`report::service`].
//!
//! # Modules
//!
//! - `workflow` - Report lifecycle state machine, guards and policy
//! - `report` - Report aggregate, line item ledger, review queue and service

pub mod report;
pub mod workflow;
