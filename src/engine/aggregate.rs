//! Folds the merged occurrence stream into gap-free per-month balance
//! buckets.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    money::MoneyCents,
    plan::{horizon::month_index, Horizon},
};

use super::occurrence::Occurrence;

/// One calendar month's aggregated cash flow within the horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    /// First day of the bucket's calendar month.
    pub month: NaiveDate,
    /// Sum of positive occurrences in the month (≥ 0).
    pub income: MoneyCents,
    /// Sum of negative occurrences in the month (≤ 0).
    pub outgoings: MoneyCents,
    pub net_change: MoneyCents,
    /// Running balance after this month, seeded with the starting balance.
    pub ending_balance: MoneyCents,
}

/// Buckets `occurrences` by calendar month across the whole horizon.
///
/// Every month the horizon touches gets a bucket, in order and without gaps;
/// a month with no occurrences carries the prior balance forward. Occurrences
/// are sorted by `(date, item_id)` first so identical inputs always fold
/// identically.
pub fn aggregate(
    occurrences: &[Occurrence],
    starting_balance: MoneyCents,
    horizon: Horizon,
) -> Vec<MonthBucket> {
    let mut sorted = occurrences.to_vec();
    sorted.sort_by_key(|occ| (occ.date, occ.item_id));

    let mut buckets = Vec::with_capacity(horizon.month_count() as usize);
    let mut cursor = sorted.iter().peekable();
    let mut balance = starting_balance;

    for month in horizon.months() {
        let mut income = MoneyCents::ZERO;
        let mut outgoings = MoneyCents::ZERO;
        while let Some(occ) = cursor.peek() {
            let index = month_index(occ.date);
            if index < month_index(month) {
                // Stray occurrence before the horizon; the generator clips
                // these, but the aggregator must not stall on one.
                cursor.next();
                continue;
            }
            if index != month_index(month) {
                break;
            }
            if occ.amount.is_negative() {
                outgoings += occ.amount;
            } else {
                income += occ.amount;
            }
            cursor.next();
        }
        let net_change = income + outgoings;
        balance += net_change;
        buckets.push(MonthBucket {
            month,
            income,
            outgoings,
            net_change,
            ending_balance: balance,
        });
    }

    buckets
}
