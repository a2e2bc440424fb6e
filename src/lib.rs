#![doc(test(attr(deny(warnings))))]

//! Forecast Core projects a financial plan's balance forward over a date
//! horizon: planned items expand into dated cash-flow occurrences, which are
//! folded into monthly balance buckets and summarized for the surrounding API.

pub mod engine;
pub mod errors;
pub mod money;
pub mod plan;
pub mod utils;

pub use engine::{
    aggregate::MonthBucket, occurrence::Occurrence, run_plan, summary::ForecastSummary,
    BalanceProvider, ForecastEngine, ForecastResult, PlanStore, MAX_HORIZON_MONTHS,
};
pub use errors::ForecastError;
pub use money::MoneyCents;
pub use plan::{
    AccountScope, AllocationMode, ForecastPlan, Frequency, Horizon, ItemType, PlannedItem,
    ScheduleConfig, ScheduleKind, StartingBalanceMode,
};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Forecast Core tracing initialized.");
    });
}
