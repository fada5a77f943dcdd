//! Type-safe product cost using decimal arithmetic.
//!
//! The backend sends costs as plain JSON numbers (`"cost": 100`). They are
//! held as [`Decimal`] so cart totals never pick up float rounding noise, and
//! written back out as numbers.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Cost`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CostError {
    /// The amount is below zero.
    #[error("cost cannot be negative (got {0})")]
    Negative(Decimal),
}

/// The price of a single unit of a product.
///
/// ## Constraints
///
/// - Amount is `>= 0`
///
/// ## Examples
///
/// ```
/// use qkart_core::Cost;
/// use rust_decimal::Decimal;
///
/// assert!(Cost::new(Decimal::from(100)).is_ok());
/// assert!(Cost::new(Decimal::from(-1)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cost(Decimal);

impl Cost {
    /// A cost of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new cost.
    ///
    /// # Errors
    ///
    /// Returns [`CostError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, CostError> {
        if amount < Decimal::ZERO {
            return Err(CostError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a cost from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// Returns the underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0.normalize())
    }
}

impl Serialize for Cost {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Cost {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_cost_rejected() {
        assert!(matches!(
            Cost::new(Decimal::from(-5)),
            Err(CostError::Negative(_))
        ));
    }

    #[test]
    fn test_zero_cost_allowed() {
        assert_eq!(Cost::new(Decimal::ZERO).unwrap(), Cost::ZERO);
    }

    #[test]
    fn test_deserialize_from_json_number() {
        let cost: Cost = serde_json::from_str("100").unwrap();
        assert_eq!(cost, Cost::from_units(100));

        let cost: Cost = serde_json::from_str("19.5").unwrap();
        assert_eq!(cost.amount(), Decimal::new(195, 1));
    }

    #[test]
    fn test_deserialize_negative_fails() {
        assert!(serde_json::from_str::<Cost>("-1").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Cost::from_units(20).to_string(), "$20");
        assert_eq!(Cost::new(Decimal::new(1999, 2)).unwrap().to_string(), "$19.99");
    }
}
