//! Money as an exact count of cents.
//!
//! Prices and totals never go through floating point: operator input is parsed
//! with `rust_decimal`, rounded to two places, and stored as an integer number
//! of minor units (`BigInt` columns).

use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign},
    str::FromStr,
};

use diesel::{
    AsExpression, FromSqlRow,
    backend::Backend,
    deserialize::{self, FromSql},
    serialize::{self, Output, ToSql},
    sql_types::BigInt,
    sqlite::Sqlite,
};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::app_error::AppError;

/// Two decimal places, half away from zero.
const DECIMAL_PLACES: u32 = 2;

/// Largest accepted price (1,000,000.00).
const MAX_CENTS: i64 = 100_000_000;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, AsExpression, FromSqlRow,
    Serialize,
)]
#[diesel(sql_type = BigInt)]
#[serde(into = "Decimal")]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest price an operator may enter.
    pub const MAX_PRICE: Money = Money(MAX_CENTS);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Parses operator input such as `"120"`, `"120.5"` or `"120.00"`.
    ///
    /// Rejects anything that is not a plain decimal number, is negative, or
    /// exceeds the maximum price.
    pub fn parse(input: &str) -> Result<Self, AppError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("price is required"));
        }
        let value = Decimal::from_str(trimmed)
            .map_err(|_| AppError::validation(format!("'{trimmed}' is not a valid price")))?;
        Self::try_from(value)
    }

    /// Subtotal of `quantity` units at this unit price.
    pub fn times(self, quantity: i32) -> Money {
        Money(self.0 * i64::from(quantity))
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, DECIMAL_PLACES)
    }

    /// Rounds to cents; `None` when the amount does not fit in an `i64`.
    fn from_decimal(value: Decimal) -> Option<Money> {
        value
            .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::ONE_HUNDRED)?
            .to_i64()
            .map(Money)
    }
}

/// Price input: non-negative and at most `Money::MAX_PRICE`.
impl TryFrom<Decimal> for Money {
    type Error = AppError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AppError::validation(format!(
                "price must be non-negative, got {value}"
            )));
        }
        let too_large = || {
            AppError::validation(format!(
                "price exceeds maximum allowed ({}), got {value}",
                Money::MAX_PRICE
            ))
        };
        // Compare before scaling so huge inputs never reach the multiplication.
        if value > Money::MAX_PRICE.to_decimal() {
            return Err(too_large());
        }
        Money::from_decimal(value).ok_or_else(too_large)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.to_decimal()
    }
}

/// Amounts read back from JSON are totals as well as prices, so only
/// representability is checked here.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Money::from_decimal(value)
            .ok_or_else(|| de::Error::custom(format!("amount {value} is out of range")))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl ToSql<BigInt, Sqlite> for Money {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        <i64 as ToSql<BigInt, Sqlite>>::to_sql(&self.0, out)
    }
}

impl FromSql<BigInt, Sqlite> for Money {
    fn from_sql(value: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        <i64 as FromSql<BigInt, Sqlite>>::from_sql(value).map(Money)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_prices() {
        assert_eq!(Money::parse("120").unwrap(), Money::from_cents(12_000));
        assert_eq!(Money::parse("120.5").unwrap(), Money::from_cents(12_050));
        assert_eq!(Money::parse(" 0.99 ").unwrap(), Money::from_cents(99));
        assert_eq!(Money::parse("0").unwrap(), Money::ZERO);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(Money::parse("1.005").unwrap(), Money::from_cents(101));
        assert_eq!(Money::parse("1.004").unwrap(), Money::from_cents(100));
    }

    #[test]
    fn rejects_bad_input() {
        for input in [
            "",
            "   ",
            "abc",
            "12x",
            "-1",
            "-0.01",
            "1000000.01",
            "1000000.005",
            "1000000000000000000000000000",
            "79228162514264337593543950335",
        ] {
            let err = Money::parse(input).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{input:?} gave {err:?}");
        }
    }

    #[test]
    fn accepts_the_maximum_price() {
        assert_eq!(Money::parse("1000000").unwrap(), Money::from_cents(MAX_CENTS));
    }

    #[test]
    fn displays_two_decimals() {
        assert_eq!(Money::from_cents(24_000).to_string(), "240.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn subtotal_and_sum() {
        let latte = Money::parse("120.00").unwrap();
        assert_eq!(latte.times(2), Money::parse("240").unwrap());

        let total: Money = [latte.times(2), Money::from_cents(350)].iter().sum();
        assert_eq!(total, Money::from_cents(24_350));
    }

    #[test]
    fn serializes_as_decimal_string() {
        let json = serde_json::to_string(&Money::from_cents(24_000)).unwrap();
        assert_eq!(json, "\"240.00\"");

        let back: Money = serde_json::from_str("\"3.50\"").unwrap();
        assert_eq!(back, Money::from_cents(350));
    }

    #[test]
    fn totals_above_the_price_limit_read_back_from_json() {
        let revenue = Money::from_cents(250_000_000_00);
        let json = serde_json::to_string(&revenue).unwrap();
        assert_eq!(json, "\"250000000.00\"");
        assert_eq!(serde_json::from_str::<Money>(&json).unwrap(), revenue);

        assert!(serde_json::from_str::<Money>("\"79228162514264337593543950335\"").is_err());
    }
}
