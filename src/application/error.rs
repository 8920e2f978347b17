//! # Application Errors
//!
//! Error types for the application layer.
//!
//! These errors represent failures that can occur during use case execution,
//! including validation failures, business rule violations, and infrastructure errors.

use crate::domain::errors::DomainError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Trade not found.
    #[error("trade not found: {0}")]
    TradeNotFound(String),

    /// Listing not found.
    #[error("listing not found: {0}")]
    ListingNotFound(String),

    /// The caller is not a participant of the trade.
    #[error("not a participant of this trade: {0}")]
    Forbidden(String),

    /// Request validation failed.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Domain error.
    #[error("{0}")]
    DomainError(#[from] DomainError),

    /// Repository error.
    #[error("repository error: {0}")]
    RepositoryError(String),

    /// Notification delivery error.
    #[error("notification error: {0}")]
    NotificationError(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a trade not found error.
    #[must_use]
    pub fn trade_not_found(trade_id: impl ToString) -> Self {
        Self::TradeNotFound(trade_id.to_string())
    }

    /// Creates a listing not found error.
    #[must_use]
    pub fn listing_not_found(listing_id: impl ToString) -> Self {
        Self::ListingNotFound(listing_id.to_string())
    }

    /// Creates a forbidden error.
    #[must_use]
    pub fn forbidden(account_id: impl ToString) -> Self {
        Self::Forbidden(account_id.to_string())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Creates a repository error.
    #[must_use]
    pub fn repository(message: impl Into<String>) -> Self {
        Self::RepositoryError(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the domain error, if this wraps one.
    #[must_use]
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::DomainError(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
