//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`TradeId`], [`ListingId`], [`EntryId`]: UUID-based identifiers
//! - [`AccountId`]: String-based wallet owner identifier
//! - [`EventId`]: Domain event identifier
//!
//! ## Numeric Types
//!
//! - [`Hours`]: Decimal time quantity with checked arithmetic
//! - [`Amount`]: Decimal monetary amount with checked arithmetic
//!
//! ## Arithmetic
//!
//! - [`ArithmeticError`]: Error type for arithmetic failures
//! - [`CheckedArithmetic`]: Trait for safe arithmetic operations
//!
//! ## Domain Enums
//!
//! - [`TradeStatus`]: Trade lifecycle state machine
//! - [`ListingKind`]: Direction of a marketplace listing

pub mod amount;
pub mod arithmetic;
pub mod hours;
pub mod ids;
pub mod listing_kind;
pub mod timestamp;
pub mod trade_status;

pub use amount::Amount;
pub use arithmetic::{ArithmeticError, ArithmeticResult, CheckedArithmetic};
pub use hours::Hours;
pub use ids::{AccountId, EntryId, EventId, ListingId, TradeId};
pub use listing_kind::{ListingKind, ParseListingKindError};
pub use trade_status::{InvalidTradeStatusError, TradeStatus};
