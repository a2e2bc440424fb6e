use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::errors::ForecastError;

/// Signed monetary amount stored as integer minor units (cents).
///
/// Every amount the engine touches (item magnitudes, bucket totals, running
/// balances) is a `MoneyCents` so aggregation stays exact and deterministic.
/// Positive values are income / increase, negative values are expense /
/// decrease. The currency itself lives on the plan.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value, saturating at `i64::MAX` so `i64::MIN` cannot panic.
    #[must_use]
    pub const fn abs(self) -> MoneyCents {
        MoneyCents(self.0.saturating_abs())
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_sub(rhs.0).map(MoneyCents)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for MoneyCents {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 += rhs.0;
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 - rhs.0)
    }
}

impl SubAssign for MoneyCents {
    fn sub_assign(&mut self, rhs: MoneyCents) {
        self.0 -= rhs.0;
    }
}

impl Neg for MoneyCents {
    type Output = MoneyCents;

    fn neg(self) -> Self::Output {
        MoneyCents(-self.0)
    }
}

impl FromStr for MoneyCents {
    type Err = ForecastError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as the decimal separator, an optional leading
    /// `+`/`-`, and at most two fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ForecastError::Validation(format!("invalid amount `{s}`"));

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        if digits.is_empty() {
            return Err(invalid());
        }

        let digits = digits.replace(',', ".");
        let (whole, frac) = match digits.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (digits.as_str(), ""),
        };
        if whole.is_empty()
            || frac.len() > 2
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let units: i64 = whole.parse().map_err(|_| invalid())?;
        let cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(|| ForecastError::Validation(format!("amount `{s}` is too large")))?;
        Ok(MoneyCents(if negative { -total } else { total }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_two_decimals() {
        assert_eq!(MoneyCents::new(0).to_string(), "0.00");
        assert_eq!(MoneyCents::new(5).to_string(), "0.05");
        assert_eq!(MoneyCents::new(120_050).to_string(), "1200.50");
        assert_eq!(MoneyCents::new(-3_01).to_string(), "-3.01");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("25".parse::<MoneyCents>().unwrap().cents(), 2500);
        assert_eq!("25.5".parse::<MoneyCents>().unwrap().cents(), 2550);
        assert_eq!("25,75".parse::<MoneyCents>().unwrap().cents(), 2575);
        assert_eq!("-0.01".parse::<MoneyCents>().unwrap().cents(), -1);
        assert_eq!("+10.00".parse::<MoneyCents>().unwrap().cents(), 1000);
    }

    #[test]
    fn parse_rejects_malformed_amounts() {
        assert!("".parse::<MoneyCents>().is_err());
        assert!("abc".parse::<MoneyCents>().is_err());
        assert!("1.234".parse::<MoneyCents>().is_err());
        assert!(".50".parse::<MoneyCents>().is_err());
    }

    #[test]
    fn abs_saturates_instead_of_overflowing() {
        assert_eq!(MoneyCents::new(i64::MIN).abs(), MoneyCents::new(i64::MAX));
        assert_eq!(MoneyCents::new(-42).abs(), MoneyCents::new(42));
        assert!(MoneyCents::new(i64::MAX)
            .checked_add(MoneyCents::new(1))
            .is_none());
        assert!(MoneyCents::new(i64::MIN)
            .checked_sub(MoneyCents::new(1))
            .is_none());
    }

    #[test]
    fn arithmetic_is_exact() {
        let mut balance = MoneyCents::new(1000);
        balance += MoneyCents::new(-333);
        balance -= MoneyCents::new(333);
        assert_eq!(balance + MoneyCents::new(-334), MoneyCents::ZERO);
        assert_eq!(-MoneyCents::new(50), MoneyCents::new(-50));
    }
}
