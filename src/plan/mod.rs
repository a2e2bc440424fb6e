//! Forecast plan domain models: plans, planned items, and their schedules.

pub mod horizon;
pub mod item;
#[allow(clippy::module_inception)]
pub mod plan;

pub use horizon::Horizon;
pub use item::{AllocationMode, Frequency, ItemType, PlannedItem, ScheduleConfig, ScheduleKind};
pub use plan::{AccountScope, ForecastPlan, StartingBalanceMode};
