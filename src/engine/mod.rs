//! Forecast orchestration: plan validation, starting-balance resolution,
//! occurrence generation, aggregation, and summary assembly.
//!
//! A run walks Validating → ResolvingStartingBalance → Generating →
//! Aggregating → Summarizing; any phase failure aborts the whole run with no
//! partial result. The engine holds no state across runs and performs no
//! retries; re-running is the caller's explicit choice.

pub mod aggregate;
pub mod occurrence;
pub mod summary;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::{
    errors::ForecastError,
    money::MoneyCents,
    plan::{AccountScope, ForecastPlan, StartingBalanceMode},
};

use aggregate::MonthBucket;
use occurrence::Occurrence;
use summary::ForecastSummary;

/// Upper bound on the horizon length. Exceeding it fails with
/// [`ForecastError::LimitExceeded`] rather than silently truncating, keeping
/// daily/weekly occurrence growth bounded.
pub const MAX_HORIZON_MONTHS: u32 = 120;

/// Read access to stored plans (with their items).
pub trait PlanStore {
    fn plan(&self, plan_id: Uuid) -> Result<ForecastPlan, ForecastError>;
}

/// Account balance lookup for plans using a calculated starting balance.
pub trait BalanceProvider {
    fn balances(
        &self,
        scope: &AccountScope,
        as_of: NaiveDate,
    ) -> Result<Vec<(Uuid, MoneyCents)>, ForecastError>;
}

/// The ephemeral result of one forecast run. Never persisted; safe to discard
/// and recompute whenever the plan's `updated_at` changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastResult {
    pub plan_id: Uuid,
    pub currency: String,
    pub months: Vec<MonthBucket>,
    pub summary: ForecastSummary,
}

/// Stateless orchestrator over the two external collaborators.
pub struct ForecastEngine<S, B> {
    store: S,
    balances: B,
}

impl<S: PlanStore, B: BalanceProvider> ForecastEngine<S, B> {
    pub fn new(store: S, balances: B) -> Self {
        Self { store, balances }
    }

    /// Loads the plan snapshot and projects its balance over the horizon.
    pub fn run(&self, plan_id: Uuid) -> Result<ForecastResult, ForecastError> {
        let plan = self.store.plan(plan_id)?;
        validate(&plan)?;
        let starting_balance = self.resolve_starting_balance(&plan)?;
        project(&plan, starting_balance)
    }

    fn resolve_starting_balance(&self, plan: &ForecastPlan) -> Result<MoneyCents, ForecastError> {
        match &plan.starting_balance {
            StartingBalanceMode::Manual(Some(amount)) => Ok(*amount),
            StartingBalanceMode::Manual(None) => Err(ForecastError::Validation(
                "manual starting balance amount is missing".into(),
            )),
            StartingBalanceMode::CalculatedCurrent => {
                let balances = self
                    .balances
                    .balances(&plan.account_scope, plan.horizon.start)?;
                debug!(
                    plan = %plan.id,
                    accounts = balances.len(),
                    "resolved starting balance from provider"
                );
                let mut total = MoneyCents::ZERO;
                for (_, amount) in balances {
                    total = total.checked_add(amount).ok_or_else(|| {
                        ForecastError::Validation("starting balance overflows".into())
                    })?;
                }
                Ok(total)
            }
        }
    }
}

/// Pure entry point for callers that already resolved the starting balance.
pub fn run_plan(
    plan: &ForecastPlan,
    starting_balance: MoneyCents,
) -> Result<ForecastResult, ForecastError> {
    validate(plan)?;
    project(plan, starting_balance)
}

/// Bounds every partial sum the aggregation and summary folds can produce:
/// each of income, outgoings, net change, and running balance stays within
/// `starting_balance ± Σ|amount|`, so the folds themselves stay infallible.
fn ensure_balance_range(
    occurrences: &[Occurrence],
    starting_balance: MoneyCents,
) -> Result<(), ForecastError> {
    let overflow =
        || ForecastError::Validation("planned amounts overflow the representable balance".into());
    let mut magnitude = MoneyCents::ZERO;
    for occ in occurrences {
        magnitude = magnitude.checked_add(occ.amount.abs()).ok_or_else(overflow)?;
    }
    if starting_balance.checked_add(magnitude).is_none()
        || starting_balance.checked_sub(magnitude).is_none()
    {
        return Err(overflow());
    }
    Ok(())
}

fn validate(plan: &ForecastPlan) -> Result<(), ForecastError> {
    // Horizon::new enforces ordering at construction; stored snapshots are
    // re-checked here because the fields are public.
    if plan.horizon.end <= plan.horizon.start {
        return Err(ForecastError::Validation(
            "horizon end must be after start".into(),
        ));
    }
    let months = plan.horizon.month_count();
    if months > MAX_HORIZON_MONTHS {
        return Err(ForecastError::LimitExceeded(format!(
            "horizon spans {months} months, maximum is {MAX_HORIZON_MONTHS}; \
             shorten the plan horizon"
        )));
    }
    for item in plan.included_items() {
        item.schedule.validate(item.id)?;
    }
    Ok(())
}

fn project(
    plan: &ForecastPlan,
    starting_balance: MoneyCents,
) -> Result<ForecastResult, ForecastError> {
    let mut occurrences: Vec<Occurrence> = Vec::new();
    let mut included_item_count = 0usize;
    for item in plan.included_items() {
        occurrences.extend(occurrence::generate(item, plan.horizon)?);
        included_item_count += 1;
    }
    debug!(
        plan = %plan.id,
        items = included_item_count,
        occurrences = occurrences.len(),
        "expanded planned items"
    );
    ensure_balance_range(&occurrences, starting_balance)?;

    let months = aggregate::aggregate(&occurrences, starting_balance, plan.horizon);
    let summary = summary::summarize(&occurrences, &months, starting_balance, included_item_count);

    Ok(ForecastResult {
        plan_id: plan.id,
        currency: plan.currency.clone(),
        months,
        summary,
    })
}
