//! # Checked Arithmetic
//!
//! Safe arithmetic operations over [`Decimal`] values.
//!
//! All balance and quantity math in the domain goes through the
//! [`CheckedArithmetic`] trait so that overflow, underflow, and division by
//! zero surface as typed errors instead of panics or silent wrap-around.
//!
//! # Examples
//!
//! ```
//! use rust_decimal::Decimal;
//! use time_market::domain::value_objects::arithmetic::CheckedArithmetic;
//!
//! let a = Decimal::new(100, 0);
//! let b = Decimal::new(50, 0);
//! assert_eq!(a.safe_add(b).unwrap(), Decimal::new(150, 0));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from checked arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    /// The operation would overflow the representable range.
    #[error("arithmetic overflow")]
    Overflow,

    /// The operation would produce a value below the representable range.
    #[error("arithmetic underflow")]
    Underflow,

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The input value is not valid for the target type.
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
}

/// Result alias for arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Checked arithmetic operations that never panic.
pub trait CheckedArithmetic: Sized {
    /// Adds two values, failing on overflow.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::Overflow`] if the result is not representable.
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Subtracts `rhs`, failing on underflow.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::Underflow`] if the result is not representable.
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Multiplies two values, failing on overflow.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::Overflow`] if the result is not representable.
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Divides by `rhs`, failing on a zero divisor.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::DivisionByZero`] if `rhs` is zero.
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self>;
}

impl CheckedArithmetic for Decimal {
    #[inline]
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_add(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_sub(rhs).ok_or(ArithmeticError::Underflow)
    }

    #[inline]
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        self.checked_div(rhs).ok_or(ArithmeticError::Overflow)
    }
}
