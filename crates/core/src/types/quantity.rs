//! Cart quantity type.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The value is zero or negative.
    #[error("quantity must be at least 1 (got {0})")]
    NotPositive(i64),
    /// The value does not fit in a `u32`.
    #[error("quantity is too large (got {0})")]
    TooLarge(i64),
    /// The text is not an integer.
    #[error("quantity must be a whole number (got {0:?})")]
    Invalid(String),
}

/// How many units of a product sit in the cart.
///
/// Always `>= 1`. Removing a line is a backend concern, so the client never
/// produces a zero quantity. On the wire this is the `qty` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit, the quantity used by "Add to Cart".
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity from a raw integer.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not in `1..=u32::MAX`.
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        let value32 = u32::try_from(value).map_err(|_| {
            if value < 1 {
                QuantityError::NotPositive(value)
            } else {
                QuantityError::TooLarge(value)
            }
        })?;
        NonZeroU32::new(value32)
            .map(Self)
            .ok_or(QuantityError::NotPositive(value))
    }

    /// Returns the quantity as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}

impl From<NonZeroU32> for Quantity {
    fn from(value: NonZeroU32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let value = text
            .parse::<i64>()
            .map_err(|_| QuantityError::Invalid(text.to_string()))?;
        Self::new(value)
    }
}
