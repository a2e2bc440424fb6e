//! Derives scalar statistics from the occurrence stream and monthly buckets.

use serde::Serialize;

use crate::{money::MoneyCents, plan::ScheduleKind};

use super::{aggregate::MonthBucket, occurrence::Occurrence};

/// Scalar statistics for a forecast run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastSummary {
    /// Average recurring (Schedule-origin) expense per month, as a positive
    /// magnitude. One-off and windowed items are excluded: they are not a
    /// steady-state signal.
    pub monthly_baseline_outgoings: MoneyCents,
    /// Sum of all positive occurrences (≥ 0).
    pub total_income: MoneyCents,
    /// Sum of all negative occurrences (≤ 0).
    pub total_outgoings: MoneyCents,
    /// Ending balance of the final bucket (the starting balance when the
    /// horizon produced no buckets).
    pub projected_end_balance: MoneyCents,
    pub included_item_count: usize,
}

pub fn summarize(
    occurrences: &[Occurrence],
    buckets: &[MonthBucket],
    starting_balance: MoneyCents,
    included_item_count: usize,
) -> ForecastSummary {
    let mut total_income = MoneyCents::ZERO;
    let mut total_outgoings = MoneyCents::ZERO;
    let mut recurring_outgoings = MoneyCents::ZERO;

    for occ in occurrences {
        if occ.amount.is_negative() {
            total_outgoings += occ.amount;
            if occ.kind == ScheduleKind::Schedule {
                recurring_outgoings += occ.amount;
            }
        } else {
            total_income += occ.amount;
        }
    }

    let month_count = buckets.len() as i64;
    let monthly_baseline_outgoings = if month_count == 0 {
        MoneyCents::ZERO
    } else {
        MoneyCents::new(recurring_outgoings.abs().cents() / month_count)
    };

    let projected_end_balance = buckets
        .last()
        .map(|bucket| bucket.ending_balance)
        .unwrap_or(starting_balance);

    ForecastSummary {
        monthly_baseline_outgoings,
        total_income,
        total_outgoings,
        projected_end_balance,
        included_item_count,
    }
}
