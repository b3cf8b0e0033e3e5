//! The expense report aggregate.

use chrono::{DateTime, Utc};
use outlay_shared::types::{
    Amount, BudgetId, Currency, LineItemId, Money, ReportId, UserId, WorkspaceId,
};
use serde::{Deserialize, Serialize};

use crate::report::line_items::{ExpenseLineItem, LineItemLedger};
use crate::workflow::engine::WorkflowEngine;
use crate::workflow::error::WorkflowError;
use crate::workflow::guards;
use crate::workflow::{
    Actor, ReportStatus, ReviewRecord, Transition, TransitionRecord, WorkflowPolicy,
};

/// Longest slug name derived from a title.
pub const MAX_NAME_LEN: usize = 250;

/// Editable report attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportAttributes {
    /// Report title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Currency all line items are filed in.
    pub currency: Currency,
    /// Budget the report is charged against.
    pub budget: Option<BudgetId>,
}

impl ReportAttributes {
    fn validated(self) -> Result<Self, WorkflowError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(WorkflowError::Validation(
                "Report title must not be empty".to_string(),
            ));
        }
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            title,
            description,
            ..self
        })
    }
}

/// An expense report and the line items it owns.
///
/// The status only changes through [`ReportAggregate::transition`], and the
/// cached total is recomputed by the line item ledger on every change.
#[derive(Debug, Clone, Serialize)]
pub struct ReportAggregate {
    id: ReportId,
    workspace: WorkspaceId,
    owner: UserId,
    url_id: u32,
    name: String,
    title: String,
    description: Option<String>,
    currency: Currency,
    budget: Option<BudgetId>,
    status: ReportStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(rename = "line_items")]
    pub(crate) items: Vec<ExpenseLineItem>,
    pub(crate) total: Amount,
    review: Option<ReviewRecord>,
    history: Vec<TransitionRecord>,
}

impl ReportAggregate {
    /// Creates a new draft report owned by `owner`.
    ///
    /// The per-workspace `url_id` is zero until the record store assigns one.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` if the title is blank.
    pub fn create_draft(
        workspace: WorkspaceId,
        owner: UserId,
        attributes: ReportAttributes,
        now: DateTime<Utc>,
    ) -> Result<Self, WorkflowError> {
        let attributes = attributes.validated()?;
        Ok(Self {
            id: ReportId::new(),
            workspace,
            owner,
            url_id: 0,
            name: slugify(&attributes.title),
            title: attributes.title,
            description: attributes.description,
            currency: attributes.currency,
            budget: attributes.budget,
            status: ReportStatus::Draft,
            created_at: now,
            updated_at: now,
            items: Vec::new(),
            total: Amount::zero(),
            review: None,
            history: Vec::new(),
        })
    }

    /// Stable internal identifier.
    #[must_use]
    pub const fn id(&self) -> ReportId {
        self.id
    }

    /// Owning workspace.
    #[must_use]
    pub const fn workspace(&self) -> WorkspaceId {
        self.workspace
    }

    /// The user who filed the report.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Per-workspace sequence number; zero before the report is stored.
    #[must_use]
    pub const fn url_id(&self) -> u32 {
        self.url_id
    }

    /// URL-safe form of the title.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-facing identifier, unique within the workspace.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}-{}", self.url_id, self.name)
    }

    /// Report title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Optional longer description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Currency of every line item.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Budget the report is charged against.
    #[must_use]
    pub const fn budget(&self) -> Option<BudgetId> {
        self.budget
    }

    /// Current workflow status.
    #[must_use]
    pub const fn status(&self) -> ReportStatus {
        self.status
    }

    /// When the report was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the report last changed.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Line items in sequence order.
    #[must_use]
    pub fn line_items(&self) -> &[ExpenseLineItem] {
        &self.items
    }

    /// Looks up a line item by id.
    #[must_use]
    pub fn line_item(&self, id: LineItemId) -> Option<&ExpenseLineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Sum of all line item amounts.
    #[must_use]
    pub const fn total(&self) -> Amount {
        self.total
    }

    /// The total together with the report currency.
    #[must_use]
    pub const fn total_money(&self) -> Money {
        Money::new(self.total, self.currency)
    }

    /// The latest reviewer decision, if any.
    #[must_use]
    pub const fn review(&self) -> Option<&ReviewRecord> {
        self.review.as_ref()
    }

    /// Every transition applied so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    /// Binds the report to a workflow policy.
    #[must_use]
    pub const fn workflow<'a>(&'a self, policy: &'a WorkflowPolicy) -> WorkflowEngine<'a> {
        WorkflowEngine::new(self, policy)
    }

    /// Opens the line item ledger for `actor`.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::Unauthorized` if `actor` does not own the report
    /// * `WorkflowError::InvalidState` if the report is not a draft
    pub fn line_item_ledger(&mut self, actor: &Actor) -> Result<LineItemLedger<'_>, WorkflowError> {
        self.ensure_editable_by(actor, "edit line items of")?;
        Ok(LineItemLedger::new(self))
    }

    /// Replaces the report's attributes and re-derives its name.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::Unauthorized` if `actor` does not own the report
    /// * `WorkflowError::InvalidState` if the report is not a draft
    /// * `WorkflowError::Validation` if the title is blank
    pub fn edit(&mut self, actor: &Actor, attributes: ReportAttributes) -> Result<(), WorkflowError> {
        self.ensure_editable_by(actor, "edit")?;
        let attributes = attributes.validated()?;

        self.name = slugify(&attributes.title);
        self.title = attributes.title;
        self.description = attributes.description;
        self.currency = attributes.currency;
        self.budget = attributes.budget;
        Ok(())
    }

    /// Checks that `actor` may delete the report outright.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::Unauthorized` if `actor` cannot see the report
    /// * `WorkflowError::InvalidState` if the report is not a draft
    pub fn ensure_deletable(
        &self,
        actor: &Actor,
        policy: &WorkflowPolicy,
        now: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        let workflow = self.workflow(policy);
        if !workflow.can_view(actor, now) {
            return Err(WorkflowError::Unauthorized {
                user_id: actor.user_id,
                action: "delete",
            });
        }
        if !workflow.is_draft() {
            return Err(WorkflowError::InvalidState {
                status: self.status,
                action: "delete",
            });
        }
        Ok(())
    }

    /// Validates and applies `transition` on behalf of `actor`.
    ///
    /// Guards are evaluated against this aggregate before anything changes,
    /// so a failed transition leaves the report untouched.
    ///
    /// # Errors
    ///
    /// Returns the error from [`WorkflowEngine::check`].
    pub fn transition(
        &mut self,
        policy: &WorkflowPolicy,
        transition: Transition,
        actor: &Actor,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<TransitionRecord, WorkflowError> {
        let rule = self.workflow(policy).check(transition, actor)?;
        let notes = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let record = TransitionRecord {
            transition,
            from: self.status,
            to: rule.to,
            actor: actor.user_id,
            at,
            notes: notes.clone(),
        };

        if rule.records_review {
            self.review = Some(ReviewRecord {
                reviewer: actor.user_id,
                decision: transition,
                notes,
                reviewed_at: at,
            });
        }
        self.status = rule.to;
        self.updated_at = at;
        self.history.push(record.clone());
        Ok(record)
    }

    /// Records a modification time.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Sets the per-workspace sequence number.
    ///
    /// Called by the record store when the report is first saved.
    pub fn assign_url_id(&mut self, url_id: u32) {
        self.url_id = url_id;
    }

    fn ensure_editable_by(&self, actor: &Actor, action: &'static str) -> Result<(), WorkflowError> {
        if !guards::is_owner(actor, self) {
            return Err(WorkflowError::Unauthorized {
                user_id: actor.user_id,
                action,
            });
        }
        if !self.status.is_editable() {
            return Err(WorkflowError::InvalidState {
                status: self.status,
                action,
            });
        }
        Ok(())
    }
}

/// Derives a URL-safe name from a title.
///
/// ASCII letters and digits are lowercased and kept; every other run of
/// characters becomes a single hyphen.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut name = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_lowercase());
        } else if !name.is_empty() && !name.ends_with('-') {
            name.push('-');
        }
    }
    name.truncate(MAX_NAME_LEN);
    let name = name.trim_end_matches('-');

    if name.is_empty() {
        "report".to_string()
    } else {
        name.to_string()
    }
}
