//! # Domain Layer
//!
//! Core business logic following Domain-Driven Design principles.
//!
//! This layer contains:
//! - **Entities**: Aggregate roots and domain entities (Trade, Account, LedgerEntry, Listing)
//! - **Value Objects**: Immutable types with validation (Hours, Amount, identifiers)
//! - **Events**: Domain events for notification and audit trail
//! - **Errors**: Domain-specific error types

pub mod entities;
pub mod errors;
pub mod events;
pub mod value_objects;
