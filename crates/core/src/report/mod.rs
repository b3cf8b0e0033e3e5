//! Expense reports and their line items.
//!
//! # Modules
//!
//! - `aggregate` - The report aggregate and its editable attributes
//! - `line_items` - Line item ledger with contiguous sequence numbers
//! - `queue` - Review queue ordering
//! - `clock` - Time source used by the service
//! - `service` - Report service over a pluggable repository

pub mod aggregate;
pub mod clock;
pub mod line_items;
pub mod queue;
pub mod service;

#[cfg(test)]
mod ledger_props;

pub use aggregate::{ReportAggregate, ReportAttributes, slugify};
pub use clock::{Clock, ManualClock, SystemClock};
pub use line_items::{ExpenseLineItem, LineItemInput, LineItemLedger};
pub use queue::ReviewQueueSorter;
pub use service::{ReportRepository, ReportService, RoleResolver};
