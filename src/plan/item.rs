use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::ForecastError, money::MoneyCents};

/// One planned cash-flow item belonging to a forecast plan.
///
/// `amount` is always a positive magnitude; the projection derives the sign
/// from `item_type`. Items with `included = false` are skipped entirely by
/// the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedItem {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub item_type: ItemType,
    pub name: String,
    pub amount: MoneyCents,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<Uuid>,
    /// Linked virtual instrument, used for display grouping only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument_id: Option<Uuid>,
    #[serde(default = "PlannedItem::included_default")]
    pub included: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub schedule: ScheduleConfig,
}

impl PlannedItem {
    pub fn new(
        plan_id: Uuid,
        item_type: ItemType,
        name: impl Into<String>,
        amount: MoneyCents,
        schedule: ScheduleConfig,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            plan_id,
            item_type,
            name: name.into(),
            amount,
            tag_id: None,
            instrument_id: None,
            included: true,
            notes: None,
            schedule,
        }
    }

    /// The item magnitude with the sign implied by its type.
    pub fn signed_amount(&self) -> MoneyCents {
        match self.item_type {
            ItemType::Income => self.amount.abs(),
            ItemType::Expense => -self.amount.abs(),
        }
    }

    pub fn included_default() -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemType {
    Income,
    Expense,
}

/// Schedule configuration of a planned item.
///
/// The discriminator the surrounding application stores as `dateMode` is the
/// serde tag, so exactly one payload shape can exist per item and a
/// mode/payload mismatch is unrepresentable. Numeric constraints (interval,
/// window ordering, day-of-month range) are checked by [`validate`].
///
/// [`validate`]: ScheduleConfig::validate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "dateMode")]
pub enum ScheduleConfig {
    /// A single one-off occurrence on `date`.
    FixedDate { date: NaiveDate },
    /// Repeats every `interval` periods of `frequency` starting at `anchor`.
    Schedule {
        frequency: Frequency,
        anchor: NaiveDate,
        #[serde(default = "ScheduleConfig::interval_default")]
        interval: u32,
        /// Monthly only: overrides the anchor's day-of-month, clamped to the
        /// target month's length.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        day_of_month: Option<u32>,
        /// Open-ended when absent; always bounded by the plan horizon.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<NaiveDate>,
    },
    /// The total amount is distributed across `[start, end]` per `allocation`.
    FlexibleWindow {
        start: NaiveDate,
        end: NaiveDate,
        allocation: AllocationMode,
    },
}

impl ScheduleConfig {
    pub fn kind(&self) -> ScheduleKind {
        match self {
            ScheduleConfig::FixedDate { .. } => ScheduleKind::FixedDate,
            ScheduleConfig::Schedule { .. } => ScheduleKind::Schedule,
            ScheduleConfig::FlexibleWindow { .. } => ScheduleKind::FlexibleWindow,
        }
    }

    /// Checks the numeric constraints of the configuration, reporting the
    /// owning item on failure.
    pub fn validate(&self, item: Uuid) -> Result<(), ForecastError> {
        match self {
            ScheduleConfig::FixedDate { .. } => Ok(()),
            ScheduleConfig::Schedule {
                frequency,
                anchor,
                interval,
                day_of_month,
                end,
            } => {
                if *interval == 0 {
                    return Err(ForecastError::configuration(
                        item,
                        "interval must be at least 1",
                    ));
                }
                if let Some(day) = day_of_month {
                    if *frequency != Frequency::Monthly {
                        return Err(ForecastError::configuration(
                            item,
                            "day_of_month is only valid for monthly schedules",
                        ));
                    }
                    if !(1..=31).contains(day) {
                        return Err(ForecastError::configuration(
                            item,
                            format!("day_of_month {day} is outside 1..=31"),
                        ));
                    }
                }
                if let Some(end) = end {
                    if end < anchor {
                        return Err(ForecastError::configuration(
                            item,
                            "schedule end precedes its anchor date",
                        ));
                    }
                }
                Ok(())
            }
            ScheduleConfig::FlexibleWindow { start, end, .. } => {
                if end < start {
                    return Err(ForecastError::configuration(
                        item,
                        "window end precedes window start",
                    ));
                }
                Ok(())
            }
        }
    }

    pub fn interval_default() -> u32 {
        1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

/// How a flexible-window item's total amount lands inside its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationMode {
    /// Full amount on the first day of the (clipped) window.
    AtStart,
    /// Full amount on the last day of the (clipped) window.
    AtEnd,
    /// Spread evenly across every day, remainder reconciled on the last day.
    SpreadDaily,
}

/// Which schedule shape an occurrence originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleKind {
    FixedDate,
    Schedule,
    FlexibleWindow,
}
