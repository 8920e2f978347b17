//! # Domain Entities
//!
//! Aggregate roots and entities representing core business concepts.
//!
//! ## Aggregates
//!
//! - [`Trade`]: Bilateral trade negotiation with lifecycle state machine
//! - [`Account`]: Wallet holding a balance of hours
//!
//! ## Entities
//!
//! - [`LedgerEntry`]: Immutable row in the append-only wallet ledger
//! - [`Listing`]: Read model of a marketplace listing

pub mod account;
pub mod ledger_entry;
pub mod listing;
pub mod trade;

pub use account::Account;
pub use ledger_entry::{EntryDirection, LedgerEntry};
pub use listing::Listing;
pub use trade::{Trade, TradeParty};
