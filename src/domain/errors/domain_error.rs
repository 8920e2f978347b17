//! # Domain Errors
//!
//! Typed domain error definitions.
//!
//! This module provides the [`DomainError`] enum for representing
//! domain-level errors with numeric error codes.
//!
//! # Error Code Ranges
//!
//! - **1000-1999**: Validation errors
//! - **2000-2999**: State errors
//! - **3000-3999**: Authorization errors
//! - **4000-4999**: Settlement errors
//! - **5000-5999**: Arithmetic errors
//!
//! # Examples
//!
//! ```
//! use time_market::domain::errors::DomainError;
//!
//! let error = DomainError::InvalidHours("hours must be positive".to_string());
//! assert_eq!(error.code(), 1002);
//! ```

use crate::domain::value_objects::arithmetic::ArithmeticError;
use crate::domain::value_objects::hours::Hours;
use crate::domain::value_objects::trade_status::TradeStatus;
use thiserror::Error;

/// Domain-level error with numeric error codes.
///
/// Provides typed errors for domain operations with consistent
/// error codes for logging and API responses.
///
/// # Error Code Ranges
///
/// | Range | Category |
/// |-------|----------|
/// | 1000-1999 | Validation errors |
/// | 2000-2999 | State errors |
/// | 3000-3999 | Authorization errors |
/// | 4000-4999 | Settlement errors |
/// | 5000-5999 | Arithmetic errors |
///
/// # Examples
///
/// ```
/// use time_market::domain::errors::DomainError;
///
/// let error = DomainError::InvalidAmount("amount must be positive".to_string());
/// assert!(error.code() >= 1000 && error.code() < 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (1000-1999)
    // ========================================================================
    /// Invalid monetary amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Invalid hours value.
    #[error("invalid hours: {0}")]
    InvalidHours(String),

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Generic validation error.
    #[error("validation error: {0}")]
    ValidationError(String),

    // ========================================================================
    // State Errors (2000-2999)
    // ========================================================================
    /// Invalid state transition attempted.
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// The current status.
        from: TradeStatus,
        /// The attempted target status.
        to: TradeStatus,
    },

    /// The trade already reached a terminal status.
    #[error("trade already finalized: {status}")]
    AlreadyFinalized {
        /// The terminal status the trade is in.
        status: TradeStatus,
    },

    /// Trade not found.
    #[error("trade not found: {0}")]
    TradeNotFound(String),

    /// Listing not found.
    #[error("listing not found: {0}")]
    ListingNotFound(String),

    // ========================================================================
    // Authorization Errors (3000-3999)
    // ========================================================================
    /// The caller is not a participant of the trade.
    #[error("not a participant of this trade: {0}")]
    Forbidden(String),

    /// A listing owner attempted to trade against their own listing.
    #[error("cannot trade on own listing: {0}")]
    SelfTrade(String),

    // ========================================================================
    // Settlement Errors (4000-4999)
    // ========================================================================
    /// The payer's balance does not cover the trade hours.
    #[error("insufficient balance: needed {needed}, had {available}")]
    FundsInsufficient {
        /// Hours required by the trade.
        needed: Hours,
        /// Hours available in the payer's wallet.
        available: Hours,
    },

    /// The listing carried an unrecognized kind tag.
    #[error("invalid listing kind: {0}")]
    InvalidListingKind(String),

    /// Payer and payee resolved to the same account.
    #[error("settlement between identical accounts: {0}")]
    SelfSettlement(String),

    /// Settlement failed for a non-business reason.
    #[error("settlement failure: {0}")]
    SettlementFailure(String),

    // ========================================================================
    // Arithmetic Errors (5000-5999)
    // ========================================================================
    /// Arithmetic overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// Arithmetic underflow.
    #[error("arithmetic underflow")]
    Underflow,

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Invalid arithmetic value.
    #[error("invalid arithmetic value: {0}")]
    InvalidArithmeticValue(String),
}

impl DomainError {
    /// Returns the numeric error code.
    ///
    /// # Error Code Ranges
    ///
    /// - 1000-1999: Validation errors
    /// - 2000-2999: State errors
    /// - 3000-3999: Authorization errors
    /// - 4000-4999: Settlement errors
    /// - 5000-5999: Arithmetic errors
    ///
    /// # Examples
    ///
    /// ```
    /// use time_market::domain::errors::DomainError;
    ///
    /// assert_eq!(DomainError::InvalidAmount("test".to_string()).code(), 1001);
    /// assert_eq!(DomainError::Overflow.code(), 5001);
    /// ```
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            // Validation errors (1000-1999)
            Self::InvalidAmount(_) => 1001,
            Self::InvalidHours(_) => 1002,
            Self::InvalidId(_) => 1003,
            Self::ValidationError(_) => 1099,

            // State errors (2000-2999)
            Self::InvalidStateTransition { .. } => 2001,
            Self::AlreadyFinalized { .. } => 2002,
            Self::TradeNotFound(_) => 2003,
            Self::ListingNotFound(_) => 2004,

            // Authorization errors (3000-3999)
            Self::Forbidden(_) => 3001,
            Self::SelfTrade(_) => 3002,

            // Settlement errors (4000-4999)
            Self::FundsInsufficient { .. } => 4001,
            Self::InvalidListingKind(_) => 4002,
            Self::SelfSettlement(_) => 4003,
            Self::SettlementFailure(_) => 4099,

            // Arithmetic errors (5000-5999)
            Self::Overflow => 5001,
            Self::Underflow => 5002,
            Self::DivisionByZero => 5003,
            Self::InvalidArithmeticValue(_) => 5004,
        }
    }

    /// Returns the error category name.
    ///
    /// # Examples
    ///
    /// ```
    /// use time_market::domain::errors::DomainError;
    ///
    /// assert_eq!(DomainError::InvalidAmount("test".to_string()).category(), "validation");
    /// assert_eq!(DomainError::Overflow.category(), "arithmetic");
    /// ```
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.code() {
            1000..=1999 => "validation",
            2000..=2999 => "state",
            3000..=3999 => "authorization",
            4000..=4999 => "settlement",
            5000..=5999 => "arithmetic",
            _ => "unknown",
        }
    }

    /// Returns true if this is a validation error.
    #[inline]
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self.code(), 1000..=1999)
    }

    /// Returns true if this is a state error.
    #[inline]
    #[must_use]
    pub const fn is_state_error(&self) -> bool {
        matches!(self.code(), 2000..=2999)
    }

    /// Returns true if this is an authorization error.
    #[inline]
    #[must_use]
    pub const fn is_authorization_error(&self) -> bool {
        matches!(self.code(), 3000..=3999)
    }

    /// Returns true if this is a settlement error.
    #[inline]
    #[must_use]
    pub const fn is_settlement_error(&self) -> bool {
        matches!(self.code(), 4000..=4999)
    }

    /// Returns true if this is an arithmetic error.
    #[inline]
    #[must_use]
    pub const fn is_arithmetic_error(&self) -> bool {
        matches!(self.code(), 5000..=5999)
    }
}

impl From<ArithmeticError> for DomainError {
    fn from(err: ArithmeticError) -> Self {
        match err {
            ArithmeticError::Overflow => Self::Overflow,
            ArithmeticError::Underflow => Self::Underflow,
            ArithmeticError::DivisionByZero => Self::DivisionByZero,
            ArithmeticError::InvalidValue(msg) => Self::InvalidArithmeticValue(msg.to_string()),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
