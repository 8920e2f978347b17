//! # Domain Events
//!
//! Events emitted during domain operations for notification and audit trail.
//!
//! ## Trade Events
//!
//! - `TradeProposed`: New trade initiated against a listing
//! - `TradeAccepted`: A party accepted, awaiting the other
//! - `TradeRejected`: A party declined, or settlement failed
//! - `TradeCompleted`: Both parties accepted and hours settled
//! - `TradeCancelled`: The proposer withdrew

pub mod trade_events;

pub use trade_events::{TradeEvent, TradeEventKind, TradeSnapshot};
