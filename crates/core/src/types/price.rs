//! Type-safe price representation using decimal arithmetic.
//!
//! All amounts are in Tunisian dinars and displayed with the shop's `dt`
//! suffix (e.g. `12.50dt`).

use core::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A non-negative amount in dinars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount < Decimal::ZERO {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of millimes (1 dinar = 1000 millimes).
    #[must_use]
    pub fn from_millimes(millimes: u32) -> Self {
        Self(Decimal::new(i64::from(millimes), 3))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The price of `quantity` units, saturating at the largest amount.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// The price of `quantity` units, or `None` on overflow.
    #[must_use]
    pub fn checked_times(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// The sum of two prices, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Midpoints round away from zero
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{rounded:.2}dt")
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            Price::new(Decimal::new(-1, 0)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_display_uses_dinar_suffix() {
        assert_eq!(Price::from_str("12.5").unwrap().to_string(), "12.50dt");
        assert_eq!(Price::ZERO.to_string(), "0.00dt");
        assert_eq!(Price::from_millimes(3_250).to_string(), "3.25dt");
    }

    #[test]
    fn test_times_and_sum() {
        let unit: Price = "2.5".parse().unwrap();
        assert_eq!(unit.times(3), "7.5".parse().unwrap());

        let total: Price = [unit, unit.times(2)].into_iter().sum();
        assert_eq!(total, "7.5".parse().unwrap());
    }

    #[test]
    fn test_display_rounds_half_up() {
        assert_eq!(Price::from_str("0.125").unwrap().to_string(), "0.13dt");
        assert_eq!(Price::from_str("2.675").unwrap().to_string(), "2.68dt");
        assert_eq!(Price::from_str("0.124").unwrap().to_string(), "0.12dt");
    }

    #[test]
    fn test_checked_arithmetic_overflow() {
        let max = Price::new(Decimal::MAX).unwrap();
        assert_eq!(max.checked_times(2), None);
        assert_eq!(max.checked_add(max), None);
        assert_eq!(max.checked_times(1), Some(max));
        assert_eq!(max.times(2), max);
        assert_eq!(max + max, max);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!("abc".parse::<Price>(), Err(PriceError::Invalid(_))));
        assert!(matches!("-3".parse::<Price>(), Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_deserialize_from_number_and_string() {
        let from_number: Price = serde_json::from_str("18.5").unwrap();
        let from_string: Price = serde_json::from_str("\"18.50\"").unwrap();
        assert_eq!(from_number, from_string);
        assert!(serde_json::from_str::<Price>("-1").is_err());
    }
}
