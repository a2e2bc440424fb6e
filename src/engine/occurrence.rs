//! Expands a single planned item into dated, signed occurrences clipped to
//! the plan horizon.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    errors::ForecastError,
    money::MoneyCents,
    plan::{
        horizon::{days_in_month, month_index},
        AllocationMode, Frequency, Horizon, PlannedItem, ScheduleConfig, ScheduleKind,
    },
};

/// Hard stop for occurrence growth from a single item. The horizon cap keeps
/// well-formed plans far below this.
pub(crate) const MAX_ITEM_OCCURRENCES: usize = 4096;

/// One dated, signed cash-flow amount produced by expanding a planned item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub item_id: Uuid,
    pub date: NaiveDate,
    pub amount: MoneyCents,
    pub kind: ScheduleKind,
}

/// Expands `item` into an ordered, finite occurrence sequence within
/// `horizon`. Expense items produce negative amounts, income items positive,
/// regardless of schedule kind.
pub fn generate(item: &PlannedItem, horizon: Horizon) -> Result<Vec<Occurrence>, ForecastError> {
    item.schedule.validate(item.id)?;
    let amount = item.signed_amount();
    match &item.schedule {
        ScheduleConfig::FixedDate { date } => Ok(fixed_date(item.id, *date, amount, horizon)),
        ScheduleConfig::Schedule {
            frequency,
            anchor,
            interval,
            day_of_month,
            end,
        } => recurring(
            item.id,
            *frequency,
            *anchor,
            *interval,
            *day_of_month,
            *end,
            amount,
            horizon,
        ),
        ScheduleConfig::FlexibleWindow {
            start,
            end,
            allocation,
        } => Ok(window(item.id, *start, *end, *allocation, amount, horizon)),
    }
}

fn fixed_date(
    item_id: Uuid,
    date: NaiveDate,
    amount: MoneyCents,
    horizon: Horizon,
) -> Vec<Occurrence> {
    if horizon.contains(date) {
        vec![Occurrence {
            item_id,
            date,
            amount,
            kind: ScheduleKind::FixedDate,
        }]
    } else {
        Vec::new()
    }
}

#[allow(clippy::too_many_arguments)]
fn recurring(
    item_id: Uuid,
    frequency: Frequency,
    anchor: NaiveDate,
    interval: u32,
    day_of_month: Option<u32>,
    end: Option<NaiveDate>,
    amount: MoneyCents,
    horizon: Horizon,
) -> Result<Vec<Occurrence>, ForecastError> {
    let limit = match end {
        Some(own_end) => own_end.min(horizon.end),
        None => horizon.end,
    };

    let mut result = Vec::new();
    for step in 0u32.. {
        let date = match nth_occurrence_date(frequency, anchor, interval, day_of_month, step) {
            Some(date) => date,
            // Past the representable date range, so certainly past the limit.
            None => break,
        };
        if date > limit {
            break;
        }
        if date >= horizon.start {
            result.push(Occurrence {
                item_id,
                date,
                amount,
                kind: ScheduleKind::Schedule,
            });
            if result.len() > MAX_ITEM_OCCURRENCES {
                return Err(ForecastError::LimitExceeded(format!(
                    "item {item_id} expands to more than {MAX_ITEM_OCCURRENCES} occurrences; \
                     shorten the plan horizon"
                )));
            }
        }
    }
    Ok(result)
}

/// Date of occurrence `step` counted from the anchor. Each occurrence is
/// derived from the anchor index, never from the previous emitted date, so
/// monthly clamping (e.g. day 31 in February) cannot drift later steps.
///
/// Returns `None` once the stepped date leaves the representable range; an
/// interval is only constrained to be ≥ 1, so huge ones must stop stepping
/// instead of overflowing.
fn nth_occurrence_date(
    frequency: Frequency,
    anchor: NaiveDate,
    interval: u32,
    day_of_month: Option<u32>,
    step: u32,
) -> Option<NaiveDate> {
    let periods = (interval as i64).checked_mul(step as i64)?;
    match frequency {
        Frequency::Daily => anchor.checked_add_signed(Duration::try_days(periods)?),
        Frequency::Weekly => {
            anchor.checked_add_signed(Duration::try_days(periods.checked_mul(7)?)?)
        }
        Frequency::Monthly => {
            let index = (month_index(anchor) as i64).checked_add(periods)?;
            let index = i32::try_from(index).ok()?;
            let year = index.div_euclid(12);
            let month = index.rem_euclid(12) as u32 + 1;
            let day = day_of_month
                .unwrap_or_else(|| anchor.day())
                .min(days_in_month(year, month));
            NaiveDate::from_ymd_opt(year, month, day)
        }
    }
}

fn window(
    item_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    allocation: AllocationMode,
    amount: MoneyCents,
    horizon: Horizon,
) -> Vec<Occurrence> {
    let clip_start = start.max(horizon.start);
    let clip_end = end.min(horizon.end);
    if clip_start > clip_end {
        return Vec::new();
    }

    let occurrence = |date: NaiveDate, amount: MoneyCents| Occurrence {
        item_id,
        date,
        amount,
        kind: ScheduleKind::FlexibleWindow,
    };

    match allocation {
        AllocationMode::AtStart => vec![occurrence(clip_start, amount)],
        AllocationMode::AtEnd => vec![occurrence(clip_end, amount)],
        AllocationMode::SpreadDaily => {
            let days = (clip_end - clip_start).num_days() + 1;
            // Integer division truncates toward zero; the remainder lands on
            // the final day so the emitted sum equals `amount` exactly.
            let per_day = MoneyCents::new(amount.cents() / days);
            let remainder = amount - MoneyCents::new(per_day.cents() * days);
            let mut result = Vec::with_capacity(days as usize);
            for offset in 0..days {
                let date = clip_start + Duration::days(offset);
                let amount = if offset == days - 1 {
                    per_day + remainder
                } else {
                    per_day
                };
                result.push(occurrence(date, amount));
            }
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::ItemType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn horizon(start: NaiveDate, end: NaiveDate) -> Horizon {
        Horizon::new(start, end).expect("horizon")
    }

    fn item(item_type: ItemType, cents: i64, schedule: ScheduleConfig) -> PlannedItem {
        PlannedItem::new(
            Uuid::new_v4(),
            item_type,
            "item",
            MoneyCents::new(cents),
            schedule,
        )
    }

    #[test]
    fn fixed_date_outside_horizon_emits_nothing() {
        let horizon = horizon(date(2024, 1, 1), date(2024, 12, 31));
        for day in [date(2023, 12, 31), date(2025, 1, 1)] {
            let item = item(
                ItemType::Expense,
                10_00,
                ScheduleConfig::FixedDate { date: day },
            );
            assert!(generate(&item, horizon).expect("generate").is_empty());
        }
    }

    #[test]
    fn fixed_date_inside_horizon_emits_one_signed_occurrence() {
        let horizon = horizon(date(2024, 1, 1), date(2024, 12, 31));
        let item = item(
            ItemType::Expense,
            10_00,
            ScheduleConfig::FixedDate {
                date: date(2024, 3, 15),
            },
        );
        let occurrences = generate(&item, horizon).expect("generate");
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].date, date(2024, 3, 15));
        assert_eq!(occurrences[0].amount, MoneyCents::new(-10_00));
        assert_eq!(occurrences[0].kind, ScheduleKind::FixedDate);
    }

    #[test]
    fn monthly_schedule_respects_its_own_end_date() {
        let horizon = horizon(date(2024, 1, 1), date(2024, 12, 31));
        let item = item(
            ItemType::Expense,
            50_00,
            ScheduleConfig::Schedule {
                frequency: Frequency::Monthly,
                anchor: date(2024, 1, 15),
                interval: 1,
                day_of_month: None,
                end: Some(date(2024, 4, 15)),
            },
        );
        let dates: Vec<_> = generate(&item, horizon)
            .expect("generate")
            .iter()
            .map(|occ| occ.date)
            .collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 15),
                date(2024, 2, 15),
                date(2024, 3, 15),
                date(2024, 4, 15),
            ]
        );
    }

    #[test]
    fn monthly_day_31_clamps_without_drifting() {
        let horizon = horizon(date(2024, 1, 1), date(2024, 5, 31));
        let item = item(
            ItemType::Expense,
            20_00,
            ScheduleConfig::Schedule {
                frequency: Frequency::Monthly,
                anchor: date(2024, 1, 31),
                interval: 1,
                day_of_month: None,
                end: None,
            },
        );
        let dates: Vec<_> = generate(&item, horizon)
            .expect("generate")
            .iter()
            .map(|occ| occ.date)
            .collect();
        // February clamps to the 29th (leap year); later months return to 31.
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 31),
                date(2024, 2, 29),
                date(2024, 3, 31),
                date(2024, 4, 30),
                date(2024, 5, 31),
            ]
        );
    }

    #[test]
    fn monthly_day_of_month_override_wins_over_anchor_day() {
        let horizon = horizon(date(2024, 1, 1), date(2024, 3, 31));
        let item = item(
            ItemType::Income,
            100_00,
            ScheduleConfig::Schedule {
                frequency: Frequency::Monthly,
                anchor: date(2024, 1, 3),
                interval: 1,
                day_of_month: Some(28),
                end: None,
            },
        );
        let dates: Vec<_> = generate(&item, horizon)
            .expect("generate")
            .iter()
            .map(|occ| occ.date)
            .collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 28), date(2024, 2, 28), date(2024, 3, 28)]
        );
    }

    #[test]
    fn weekly_schedule_steps_by_interval_weeks() {
        let horizon = horizon(date(2024, 1, 1), date(2024, 2, 15));
        let item = item(
            ItemType::Expense,
            15_00,
            ScheduleConfig::Schedule {
                frequency: Frequency::Weekly,
                anchor: date(2024, 1, 2),
                interval: 2,
                day_of_month: None,
                end: None,
            },
        );
        let dates: Vec<_> = generate(&item, horizon)
            .expect("generate")
            .iter()
            .map(|occ| occ.date)
            .collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 2),
                date(2024, 1, 16),
                date(2024, 1, 30),
                date(2024, 2, 13),
            ]
        );
    }

    #[test]
    fn schedule_anchored_before_horizon_clips_leading_occurrences() {
        let horizon = horizon(date(2024, 6, 1), date(2024, 8, 31));
        let item = item(
            ItemType::Expense,
            30_00,
            ScheduleConfig::Schedule {
                frequency: Frequency::Monthly,
                anchor: date(2023, 1, 10),
                interval: 1,
                day_of_month: None,
                end: None,
            },
        );
        let dates: Vec<_> = generate(&item, horizon)
            .expect("generate")
            .iter()
            .map(|occ| occ.date)
            .collect();
        assert_eq!(
            dates,
            vec![date(2024, 6, 10), date(2024, 7, 10), date(2024, 8, 10)]
        );
    }

    #[test]
    fn huge_daily_interval_stops_after_the_anchor_occurrence() {
        let horizon = horizon(date(2024, 1, 1), date(2024, 12, 31));
        let item = item(
            ItemType::Expense,
            10_00,
            ScheduleConfig::Schedule {
                frequency: Frequency::Daily,
                anchor: date(2024, 3, 10),
                interval: u32::MAX,
                day_of_month: None,
                end: None,
            },
        );
        let dates: Vec<_> = generate(&item, horizon)
            .expect("generate")
            .iter()
            .map(|occ| occ.date)
            .collect();
        // The second step leaves the representable date range; only the
        // anchor itself falls inside the horizon.
        assert_eq!(dates, vec![date(2024, 3, 10)]);
    }

    #[test]
    fn huge_monthly_interval_does_not_wrap_or_duplicate() {
        let horizon = horizon(date(2024, 1, 1), date(2024, 12, 31));
        let item = item(
            ItemType::Expense,
            10_00,
            ScheduleConfig::Schedule {
                frequency: Frequency::Monthly,
                anchor: date(2024, 3, 31),
                interval: u32::MAX,
                day_of_month: None,
                end: None,
            },
        );
        let dates: Vec<_> = generate(&item, horizon)
            .expect("generate")
            .iter()
            .map(|occ| occ.date)
            .collect();
        assert_eq!(dates, vec![date(2024, 3, 31)]);
    }

    #[test]
    fn window_outside_horizon_emits_nothing() {
        let horizon = horizon(date(2024, 1, 1), date(2024, 1, 31));
        let item = item(
            ItemType::Expense,
            90_00,
            ScheduleConfig::FlexibleWindow {
                start: date(2024, 2, 1),
                end: date(2024, 2, 10),
                allocation: AllocationMode::SpreadDaily,
            },
        );
        assert!(generate(&item, horizon).expect("generate").is_empty());
    }

    #[test]
    fn window_at_start_and_at_end_use_clipped_bounds() {
        let horizon = horizon(date(2024, 2, 5), date(2024, 2, 20));
        for (allocation, expected) in [
            (AllocationMode::AtStart, date(2024, 2, 5)),
            (AllocationMode::AtEnd, date(2024, 2, 20)),
        ] {
            let item = item(
                ItemType::Expense,
                90_00,
                ScheduleConfig::FlexibleWindow {
                    start: date(2024, 2, 1),
                    end: date(2024, 2, 28),
                    allocation,
                },
            );
            let occurrences = generate(&item, horizon).expect("generate");
            assert_eq!(occurrences.len(), 1);
            assert_eq!(occurrences[0].date, expected);
            assert_eq!(occurrences[0].amount, MoneyCents::new(-90_00));
        }
    }

    #[test]
    fn spread_daily_conserves_the_total_amount() {
        let horizon = horizon(date(2024, 3, 1), date(2024, 3, 31));
        // 100.00 over 7 days does not divide evenly (1428 * 7 = 9996).
        let item = item(
            ItemType::Expense,
            100_00,
            ScheduleConfig::FlexibleWindow {
                start: date(2024, 3, 4),
                end: date(2024, 3, 10),
                allocation: AllocationMode::SpreadDaily,
            },
        );
        let occurrences = generate(&item, horizon).expect("generate");
        assert_eq!(occurrences.len(), 7);
        let total: i64 = occurrences.iter().map(|occ| occ.amount.cents()).sum();
        assert_eq!(total, -100_00);
        assert_eq!(occurrences[0].amount, MoneyCents::new(-14_28));
        assert_eq!(occurrences[6].amount, MoneyCents::new(-14_32));
    }

    #[test]
    fn spread_daily_single_day_window_carries_everything() {
        let horizon = horizon(date(2024, 3, 1), date(2024, 3, 31));
        let item = item(
            ItemType::Income,
            42_37,
            ScheduleConfig::FlexibleWindow {
                start: date(2024, 3, 15),
                end: date(2024, 3, 15),
                allocation: AllocationMode::SpreadDaily,
            },
        );
        let occurrences = generate(&item, horizon).expect("generate");
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].amount, MoneyCents::new(42_37));
    }

    #[test]
    fn generate_rejects_invalid_configuration_with_item_id() {
        let horizon = horizon(date(2024, 1, 1), date(2024, 12, 31));
        let item = item(
            ItemType::Expense,
            10_00,
            ScheduleConfig::Schedule {
                frequency: Frequency::Daily,
                anchor: date(2024, 1, 1),
                interval: 0,
                day_of_month: None,
                end: None,
            },
        );
        let err = generate(&item, horizon).expect_err("invalid interval");
        assert!(matches!(
            err,
            ForecastError::Configuration { item: id, .. } if id == item.id
        ));
    }
}
