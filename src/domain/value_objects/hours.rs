//! # Hours Value Object
//!
//! Decimal time quantity with checked arithmetic.
//!
//! Hours are the currency of the marketplace: wallet balances and settled
//! trade quantities are both expressed in [`Hours`]. The type wraps
//! [`Decimal`] and can never hold a negative value.
//!
//! # Examples
//!
//! ```
//! use time_market::domain::value_objects::hours::Hours;
//!
//! let balance = Hours::new(5.0).unwrap();
//! let cost = Hours::new(2.5).unwrap();
//!
//! let remaining = balance.safe_sub(cost).unwrap();
//! assert_eq!(remaining.get().to_string(), "2.5");
//! ```

use super::arithmetic::{ArithmeticError, ArithmeticResult, CheckedArithmetic};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A validated, non-negative number of hours.
///
/// # Invariants
///
/// - Hours is always >= 0
///
/// The per-trade upper bound (999.99) is enforced where trades are created,
/// via [`Hours::MAX_PER_TRADE`]; balances themselves are unbounded.
///
/// # Examples
///
/// ```
/// use time_market::domain::value_objects::hours::Hours;
///
/// let hours = Hours::new(2.5).unwrap();
/// assert!(hours.is_positive());
///
/// let zero = Hours::zero();
/// assert!(zero.is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Hours(Decimal);

impl Hours {
    /// Zero hours constant.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest number of hours a single trade may carry (999.99).
    pub const MAX_PER_TRADE: Self = Self(Decimal::from_parts(99_999, 0, 0, false, 2));

    /// Creates a new hours value from an f64.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::InvalidValue` if the value is negative or
    /// not a valid decimal.
    ///
    /// # Examples
    ///
    /// ```
    /// use time_market::domain::value_objects::hours::Hours;
    ///
    /// let hours = Hours::new(2.5).unwrap();
    /// assert!(!hours.is_zero());
    ///
    /// let invalid = Hours::new(-1.0);
    /// assert!(invalid.is_err());
    /// ```
    #[must_use = "this returns a Result that should be handled"]
    pub fn new(value: f64) -> ArithmeticResult<Self> {
        let decimal =
            Decimal::try_from(value).map_err(|_| ArithmeticError::InvalidValue("invalid float"))?;
        Self::from_decimal(decimal)
    }

    /// Creates a new hours value from a Decimal.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::InvalidValue` if the value is negative.
    #[must_use = "this returns a Result that should be handled"]
    pub fn from_decimal(value: Decimal) -> ArithmeticResult<Self> {
        if value.is_sign_negative() {
            return Err(ArithmeticError::InvalidValue("hours cannot be negative"));
        }
        Ok(Self(value))
    }

    /// Creates a zero hours value.
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Returns the inner Decimal value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> Decimal {
        self.0
    }

    /// Returns true if the value is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is positive (non-zero).
    #[inline]
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Returns true if the value exceeds the per-trade cap.
    #[inline]
    #[must_use]
    pub fn exceeds_trade_cap(self) -> bool {
        self.0 > Self::MAX_PER_TRADE.0
    }

    /// Safely adds another hours value.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        let result = self.0.safe_add(rhs.0)?;
        Ok(Self(result))
    }

    /// Safely subtracts another hours value.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Underflow` if the result would be negative.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
        let result = self.0.safe_sub(rhs.0)?;
        if result.is_sign_negative() {
            return Err(ArithmeticError::Underflow);
        }
        Ok(Self(result))
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialOrd for Hours {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hours {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl TryFrom<Decimal> for Hours {
    type Error = ArithmeticError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<Hours> for Decimal {
    fn from(hours: Hours) -> Self {
        hours.0
    }
}

impl FromStr for Hours {
    type Err = ArithmeticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal =
            Decimal::from_str(s).map_err(|_| ArithmeticError::InvalidValue("invalid decimal"))?;
        Self::from_decimal(decimal)
    }
}

impl Default for Hours {
    fn default() -> Self {
        Self::ZERO
    }
}
