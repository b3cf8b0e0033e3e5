//! Demo workspace seeder for Outlay development and testing.
//!
//! Seeds one workspace with a member, a reviewer and a handful of reports in
//! different statuses, then prints the reviewer's queue as JSON.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use chrono::NaiveDate;
use outlay_core::report::{LineItemInput, ReportAttributes, ReportService, SystemClock};
use outlay_core::workflow::{Transition, WorkflowPolicy, WorkspaceRole};
use outlay_shared::AppConfig;
use outlay_shared::types::{BudgetId, CategoryId, Currency, ReportId, UserId, WorkspaceId};
use outlay_store::{InMemoryReportStore, InMemoryRoleDirectory};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

type Service = ReportService<InMemoryReportStore, InMemoryRoleDirectory, SystemClock>;

/// One seeded report: title, line amounts in cents, and the transitions to apply.
struct Seed {
    title: &'static str,
    cents: &'static [i64],
    steps: &'static [Transition],
}

const SEEDS: &[Seed] = &[
    Seed {
        title: "Bangalore client visit",
        cents: &[184_000, 42_050, 9_900],
        steps: &[Transition::Submit],
    },
    Seed {
        title: "Team offsite snacks",
        cents: &[3_575],
        steps: &[],
    },
    Seed {
        title: "Conference registration",
        cents: &[1_250_000],
        steps: &[Transition::Submit, Transition::Accept],
    },
    Seed {
        title: "Taxi receipts March",
        cents: &[45_000, 38_000],
        steps: &[Transition::Submit, Transition::Reject],
    },
    Seed {
        title: "Hardware refresh",
        cents: &[5_400_000],
        steps: &[Transition::Submit, Transition::Accept, Transition::Close],
    },
];

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    let registry = tracing_subscriber::registry().with(filter);
    if config.log.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let policy = WorkflowPolicy::from(&config.workflow);
    info!(
        close_policy = ?policy.close_policy,
        reviewer_history_days = ?config.workflow.reviewer_history_days,
        "Workflow policy loaded"
    );

    let roles = Arc::new(InMemoryRoleDirectory::new());
    let workspace = WorkspaceId::new();
    let member = UserId::new();
    let reviewer = UserId::new();
    roles.grant(workspace, member, WorkspaceRole::Member);
    roles.grant(workspace, reviewer, WorkspaceRole::Member);
    roles.grant(workspace, reviewer, WorkspaceRole::Reviewer);

    let service = ReportService::new(
        Arc::new(InMemoryReportStore::new()),
        roles,
        Arc::new(SystemClock),
        policy,
    );

    let budget = BudgetId::new();
    for seed in SEEDS {
        let id = seed_report(&service, workspace, member, budget, seed)?;
        for step in seed.steps {
            let actor = match step {
                Transition::Accept
                | Transition::Reject
                | Transition::ReturnForReview
                | Transition::Close => reviewer,
                Transition::Submit | Transition::Resubmit | Transition::Withdraw => member,
            };
            service.transition(id, *step, actor, None)?;
        }
    }
    info!(workspace_id = %workspace, reports = SEEDS.len(), "Seeding complete");

    let queue = service.list_for_actor(workspace, reviewer, None)?;
    println!("{}", serde_json::to_string_pretty(&queue)?);

    Ok(())
}

fn seed_report(
    service: &Service,
    workspace: WorkspaceId,
    owner: UserId,
    budget: BudgetId,
    seed: &Seed,
) -> anyhow::Result<ReportId> {
    let report = service.create_draft(
        workspace,
        owner,
        ReportAttributes {
            title: seed.title.to_string(),
            description: None,
            currency: Currency::Inr,
            budget: Some(budget),
        },
    )?;

    let date = NaiveDate::from_ymd_opt(2024, 3, 15)
        .ok_or_else(|| anyhow::anyhow!("invalid seed date"))?;
    let category = CategoryId::new();
    for cents in seed.cents {
        service.add_line_item(
            report.id(),
            owner,
            &LineItemInput {
                date,
                category,
                description: format!("{} expense", seed.title),
                amount: Decimal::new(*cents, 2),
            },
        )?;
    }

    Ok(report.id())
}
