use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::MoneyCents;

use super::{horizon::Horizon, item::PlannedItem};

/// Snapshot of a forecast plan and its planned items.
///
/// The engine only ever reads a plan; `updated_at` changes whenever the plan
/// or any of its items changes and is the caller's cache key for recomputing
/// the (never persisted) forecast result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPlan {
    pub id: Uuid,
    pub family_id: Uuid,
    pub name: String,
    pub horizon: Horizon,
    #[serde(default)]
    pub account_scope: AccountScope,
    pub starting_balance: StartingBalanceMode,
    pub currency: String,
    #[serde(default)]
    pub archived: bool,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<PlannedItem>,
}

impl ForecastPlan {
    pub fn new(
        family_id: Uuid,
        name: impl Into<String>,
        horizon: Horizon,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            family_id,
            name: name.into(),
            horizon,
            account_scope: AccountScope::AllAccounts,
            starting_balance: StartingBalanceMode::CalculatedCurrent,
            currency: currency.into(),
            archived: false,
            updated_at: Utc::now(),
            items: Vec::new(),
        }
    }

    pub fn add_item(&mut self, item: PlannedItem) -> Uuid {
        let id = item.id;
        self.items.push(item);
        self.touch();
        id
    }

    pub fn item(&self, id: Uuid) -> Option<&PlannedItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items the projection considers; excluded items never reach the engine.
    pub fn included_items(&self) -> impl Iterator<Item = &PlannedItem> {
        self.items.iter().filter(|item| item.included)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Which accounts feed the calculated starting balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", content = "accounts")]
pub enum AccountScope {
    #[default]
    AllAccounts,
    Selected(Vec<Uuid>),
}

/// Where the projection's starting balance comes from.
///
/// `Manual` keeps the amount optional because stored plans can carry the
/// mode without an amount; the engine rejects that at run time instead of
/// making the state unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "amount")]
pub enum StartingBalanceMode {
    CalculatedCurrent,
    Manual(Option<MoneyCents>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{ItemType, ScheduleConfig};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn add_item_touches_updated_at() {
        let horizon = Horizon::new(date(2024, 1, 1), date(2024, 6, 30)).expect("horizon");
        let mut plan = ForecastPlan::new(Uuid::new_v4(), "Family budget", horizon, "EUR");
        let before = plan.updated_at;
        let item = PlannedItem::new(
            plan.id,
            ItemType::Expense,
            "Rent",
            MoneyCents::new(80_000),
            ScheduleConfig::FixedDate {
                date: date(2024, 2, 1),
            },
        );
        let id = plan.add_item(item);
        assert!(plan.item(id).is_some());
        assert!(plan.updated_at >= before);
    }

    #[test]
    fn included_items_skips_excluded() {
        let horizon = Horizon::new(date(2024, 1, 1), date(2024, 6, 30)).expect("horizon");
        let mut plan = ForecastPlan::new(Uuid::new_v4(), "Family budget", horizon, "EUR");
        let mut item = PlannedItem::new(
            plan.id,
            ItemType::Income,
            "Salary",
            MoneyCents::new(250_000),
            ScheduleConfig::FixedDate {
                date: date(2024, 2, 1),
            },
        );
        item.included = false;
        plan.add_item(item);
        assert_eq!(plan.included_items().count(), 0);
    }
}
