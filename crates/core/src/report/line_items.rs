//! Expense line items and the ledger that keeps them consistent.
//!
//! Sequence numbers are 1-based and contiguous within a report. New items
//! take `max + 1`; removing an item renumbers the rest `1..N` in their
//! existing order. The report total is recomputed after every change.

use chrono::NaiveDate;
use outlay_shared::types::{Amount, CategoryId, LineItemId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::report::aggregate::ReportAggregate;
use crate::workflow::error::WorkflowError;

/// One expense line on a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseLineItem {
    /// Stable identifier.
    pub id: LineItemId,
    /// Position within the report, starting at 1.
    pub seq: u32,
    /// Date the expense was incurred.
    pub date: NaiveDate,
    /// Expense category.
    pub category: CategoryId,
    /// What the expense was for.
    pub description: String,
    /// Amount spent, in the report's currency.
    pub amount: Amount,
}

/// Caller-supplied fields for adding or editing a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemInput {
    /// Date the expense was incurred.
    pub date: NaiveDate,
    /// Expense category.
    pub category: CategoryId,
    /// What the expense was for.
    pub description: String,
    /// Amount spent; must be non-negative with at most two decimal places.
    pub amount: Decimal,
}

impl LineItemInput {
    fn validate(&self) -> Result<(String, Amount), WorkflowError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(WorkflowError::Validation(
                "Line item description must not be empty".to_string(),
            ));
        }
        let amount = Amount::new(self.amount)?;
        Ok((description.to_string(), amount))
    }
}

/// Returns the sequence number the next new item receives.
#[must_use]
pub fn next_sequence(items: &[ExpenseLineItem]) -> u32 {
    items.iter().map(|item| item.seq).max().map_or(1, |max| max + 1)
}

/// Renumbers items `1..N` in their current order.
pub fn resequence(items: &mut [ExpenseLineItem]) {
    for (seq, item) in (1..).zip(items.iter_mut()) {
        item.seq = seq;
    }
}

/// Sums the amounts of `items`.
///
/// # Errors
///
/// Returns `WorkflowError::Validation` if the total cannot be represented.
pub fn recompute_total(items: &[ExpenseLineItem]) -> Result<Amount, WorkflowError> {
    total_of(items.iter().map(|item| item.amount))
}

fn total_of(amounts: impl IntoIterator<Item = Amount>) -> Result<Amount, WorkflowError> {
    Amount::checked_sum(amounts).ok_or_else(|| {
        WorkflowError::Validation("Report total exceeds the largest supported amount".to_string())
    })
}

/// Mutable access to a report's line items.
///
/// Obtained through [`ReportAggregate::line_item_ledger`], which checks that
/// the actor may edit the report. Every operation re-checks that the report
/// is still in an editable status.
#[derive(Debug)]
pub struct LineItemLedger<'a> {
    report: &'a mut ReportAggregate,
}

impl<'a> LineItemLedger<'a> {
    pub(crate) fn new(report: &'a mut ReportAggregate) -> Self {
        Self { report }
    }

    /// Appends a new line item.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::InvalidState` if the report is not editable
    /// * `WorkflowError::Validation` if the input is malformed or the total
    ///   would overflow
    pub fn add_item(&mut self, input: &LineItemInput) -> Result<ExpenseLineItem, WorkflowError> {
        self.ensure_editable("add line items to")?;
        let (description, amount) = input.validate()?;
        let total = total_of(self.amounts().chain([amount]))?;

        let item = ExpenseLineItem {
            id: LineItemId::new(),
            seq: next_sequence(&self.report.items),
            date: input.date,
            category: input.category,
            description,
            amount,
        };
        self.report.items.push(item.clone());
        self.report.total = total;
        Ok(item)
    }

    /// Replaces the fields of an existing line item, keeping its sequence number.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::InvalidState` if the report is not editable
    /// * `WorkflowError::LineItemNotFound` if no item has `id`
    /// * `WorkflowError::Validation` if the input is malformed or the total
    ///   would overflow
    pub fn update_item(
        &mut self,
        id: LineItemId,
        input: &LineItemInput,
    ) -> Result<ExpenseLineItem, WorkflowError> {
        self.ensure_editable("edit line items of")?;
        let (description, amount) = input.validate()?;
        let index = self.position(id)?;
        let total = total_of(
            self.report
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| if i == index { amount } else { item.amount }),
        )?;

        let item = &mut self.report.items[index];
        item.date = input.date;
        item.category = input.category;
        item.description = description;
        item.amount = amount;
        let updated = item.clone();

        self.report.total = total;
        Ok(updated)
    }

    /// Removes a line item and closes the gap it leaves.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::InvalidState` if the report is not editable
    /// * `WorkflowError::LineItemNotFound` if no item has `id`
    pub fn remove_item(&mut self, id: LineItemId) -> Result<ExpenseLineItem, WorkflowError> {
        self.ensure_editable("remove line items from")?;

        let index = self.position(id)?;
        let total = total_of(
            self.report
                .items
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, item)| item.amount),
        )?;
        let removed = self.report.items.remove(index);

        resequence(&mut self.report.items);
        self.report.total = total;
        Ok(removed)
    }

    /// The report's line items in sequence order.
    #[must_use]
    pub fn items(&self) -> &[ExpenseLineItem] {
        &self.report.items
    }

    /// The report's current total.
    #[must_use]
    pub fn total(&self) -> Amount {
        self.report.total
    }

    fn ensure_editable(&self, action: &'static str) -> Result<(), WorkflowError> {
        let status = self.report.status();
        if status.is_editable() {
            Ok(())
        } else {
            Err(WorkflowError::InvalidState { status, action })
        }
    }

    fn position(&self, id: LineItemId) -> Result<usize, WorkflowError> {
        self.report
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(WorkflowError::LineItemNotFound(id))
    }

    fn amounts(&self) -> impl Iterator<Item = Amount> + '_ {
        self.report.items.iter().map(|item| item.amount)
    }
}
