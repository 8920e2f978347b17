//! # Domain Errors
//!
//! Typed error types for domain operations.
//!
//! Error codes are organized by category:
//! - 1000-1999: Validation errors
//! - 2000-2999: State errors
//! - 3000-3999: Authorization errors
//! - 4000-4999: Settlement errors
//! - 5000-5999: Arithmetic errors
//!
//! # Examples
//!
//! ```
//! use time_market::domain::errors::{DomainError, DomainResult};
//!
//! fn validate_hours(hours: f64) -> DomainResult<f64> {
//!     if hours <= 0.0 {
//!         return Err(DomainError::InvalidHours("hours must be positive".to_string()));
//!     }
//!     Ok(hours)
//! }
//! ```

pub mod domain_error;

pub use crate::domain::value_objects::arithmetic::ArithmeticError;
pub use domain_error::{DomainError, DomainResult};
