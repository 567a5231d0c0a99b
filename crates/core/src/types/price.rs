//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as `NUMERIC(12, 2)` and never pass through floating
//! point. Line totals are computed with [`Price::times`] and summed with the
//! `Sum` implementation.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is empty or not a decimal number.
    #[error("price must be a number")]
    Invalid,
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The input has more decimal places than the currency allows.
    #[error("price can have at most {max} decimal places")]
    TooPrecise {
        /// Maximum number of decimal places.
        max: u32,
    },
    /// The input does not fit the stored column.
    #[error("price cannot exceed {max}")]
    TooLarge {
        /// Largest storable price.
        max: Price,
    },
}

/// A non-negative monetary amount with at most two decimal places.
///
/// ## Examples
///
/// ```
/// use tally_core::Price;
///
/// let unit = Price::parse("2.50").unwrap();
/// assert_eq!(unit.times(3).to_string(), "7.50");
///
/// assert!(Price::parse("-1").is_err());
/// assert!(Price::parse("1.005").is_err());
/// assert!(Price::parse("10000000000").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Number of decimal places a price may carry.
    pub const SCALE: u32 = 2;

    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest amount a `NUMERIC(12, 2)` column holds.
    pub const MAX: Self = Self(Decimal::from_parts(3_567_587_327, 232, 0, false, 2));

    /// Parse a price from user input such as `"12"` or `"12.50"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a decimal number, is negative,
    /// has more than two decimal places, or exceeds [`Price::MAX`].
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid)?;
        Self::from_decimal(amount)
    }

    /// Validate a decimal amount as a price.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative, too precise or too large.
    pub fn from_decimal(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if amount.normalize().scale() > Self::SCALE {
            return Err(PriceError::TooPrecise { max: Self::SCALE });
        }
        if amount > Self::MAX.0 {
            return Err(PriceError::TooLarge { max: Self::MAX });
        }
        Ok(Self(amount.round_dp(Self::SCALE)))
    }

    /// Whether the amount fits the stored column.
    ///
    /// Always true for parsed prices; sums and products may exceed it.
    #[must_use]
    pub fn is_storable(self) -> bool {
        self <= Self::MAX
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), Self::SCALE))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: i32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // The column is NUMERIC(12, 2) with a non-negative check
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_prices() {
        assert_eq!(Price::parse("12").unwrap().to_string(), "12.00");
        assert_eq!(Price::parse("12.5").unwrap().to_string(), "12.50");
        assert_eq!(Price::parse(" 0.99 ").unwrap().to_string(), "0.99");
        assert_eq!(Price::parse("0").unwrap(), Price::ZERO);
    }

    #[test]
    fn test_parse_trailing_zeros_are_not_extra_precision() {
        assert_eq!(Price::parse("1.500").unwrap(), Price::from_cents(150));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Price::parse(""), Err(PriceError::Invalid));
        assert_eq!(Price::parse("abc"), Err(PriceError::Invalid));
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert_eq!(Price::parse("-0.01"), Err(PriceError::Negative));
    }

    #[test]
    fn test_parse_rejects_sub_cent() {
        assert_eq!(
            Price::parse("1.001"),
            Err(PriceError::TooPrecise { max: 2 })
        );
    }

    #[test]
    fn test_parse_rejects_values_beyond_column() {
        assert_eq!(Price::MAX.to_string(), "9999999999.99");
        assert_eq!(Price::parse("9999999999.99").unwrap(), Price::MAX);
        assert_eq!(
            Price::parse("100000000000"),
            Err(PriceError::TooLarge { max: Price::MAX })
        );
        assert_eq!(
            Price::parse("10000000000.00"),
            Err(PriceError::TooLarge { max: Price::MAX })
        );
    }

    #[test]
    fn test_large_products_are_not_storable() {
        assert!(Price::MAX.is_storable());
        assert!(!Price::MAX.times(2).is_storable());
        assert!(!(Price::MAX + Price::from_cents(1)).is_storable());
    }

    #[test]
    fn test_deserialize_validates() {
        let price: Price = serde_json::from_str("\"2.50\"").unwrap();
        assert_eq!(price, Price::from_cents(250));

        assert!(serde_json::from_str::<Price>("\"-1\"").is_err());
        assert!(serde_json::from_str::<Price>("\"1.001\"").is_err());
        assert!(serde_json::from_str::<Price>("\"100000000000\"").is_err());
    }

    #[test]
    fn test_serialize_as_string() {
        assert_eq!(
            serde_json::to_string(&Price::from_cents(1999)).unwrap(),
            "\"19.99\""
        );
    }

    #[test]
    fn test_times_and_sum() {
        let lines = [
            Price::from_cents(250).times(2),
            Price::from_cents(1999).times(1),
            Price::from_cents(5).times(10),
        ];
        let total: Price = lines.into_iter().sum();
        assert_eq!(total, Price::from_cents(2549));
        assert_eq!(total.to_string(), "25.49");
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        let total: Price = std::iter::empty().sum();
        assert_eq!(total, Price::ZERO);
    }
}
