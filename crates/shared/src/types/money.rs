//! Amounts and money with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! These types wrap `rust_decimal::Decimal` for exact arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fractional digits every line item amount carries.
pub const AMOUNT_SCALE: u32 = 2;

/// Errors raised when constructing an [`Amount`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The value is below zero.
    #[error("Amount {0} must not be negative")]
    Negative(Decimal),

    /// The value carries more fractional digits than allowed.
    #[error("Amount {value} has more than {max_scale} decimal places")]
    TooPrecise {
        /// The rejected value.
        value: Decimal,
        /// The maximum number of decimal places.
        max_scale: u32,
    },

    /// The value is too large to carry [`AMOUNT_SCALE`] decimal places.
    #[error("Amount {0} is too large")]
    TooLarge(Decimal),
}

/// A non-negative amount with exactly [`AMOUNT_SCALE`] decimal places.
///
/// Values are rescaled on construction so `10` and `10.0` both become `10.00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Creates an amount, rejecting negatives and excess precision.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Negative`] for values below zero,
    /// [`AmountError::TooPrecise`] for values with more than two decimal places
    /// and [`AmountError::TooLarge`] when the value cannot be rescaled.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value < Decimal::ZERO {
            return Err(AmountError::Negative(value));
        }
        if value.normalize().scale() > AMOUNT_SCALE {
            return Err(AmountError::TooPrecise {
                value,
                max_scale: AMOUNT_SCALE,
            });
        }

        let mut amount = value.abs();
        amount.rescale(AMOUNT_SCALE);
        // rescale silently keeps a smaller scale when the mantissa would overflow
        if amount.scale() != AMOUNT_SCALE {
            return Err(AmountError::TooLarge(value));
        }
        Ok(Self(amount))
    }

    /// Adds two amounts, returning `None` if the result cannot be represented.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0
            .checked_add(other.0)
            .and_then(|sum| Self::new(sum).ok())
    }

    /// Sums amounts, returning `None` on overflow.
    #[must_use]
    pub fn checked_sum<I: IntoIterator<Item = Self>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::zero(), Self::checked_add)
    }

    /// The zero amount (`0.00`).
    #[must_use]
    pub fn zero() -> Self {
        Self(Decimal::new(0, AMOUNT_SCALE))
    }

    /// Returns the underlying decimal.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents an amount together with its currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount.
    pub amount: Amount,
    /// ISO 4217 currency code.
    pub currency: Currency,
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Amount, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Amount::zero(),
            currency,
        }
    }
}

/// ISO 4217 currency codes a report may be filed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Indian Rupee
    #[default]
    Inr,
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// Pound Sterling
    Gbp,
    /// Singapore Dollar
    Sgd,
    /// Indonesian Rupiah
    Idr,
    /// Japanese Yen
    Jpy,
}

impl Currency {
    /// Returns the ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Inr => "INR",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Sgd => "SGD",
            Self::Idr => "IDR",
            Self::Jpy => "JPY",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INR" => Ok(Self::Inr),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            "SGD" => Ok(Self::Sgd),
            "IDR" => Ok(Self::Idr),
            "JPY" => Ok(Self::Jpy),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}
