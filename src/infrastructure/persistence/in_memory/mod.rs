//! # In-Memory Persistence
//!
//! In-memory adapters for the application ports. These back the default
//! deployment and keep tests free of external dependencies.

pub mod ledger;
pub mod listing_directory;
pub mod trade_repository;

pub use ledger::InMemoryLedger;
pub use listing_directory::InMemoryListingDirectory;
pub use trade_repository::InMemoryTradeRepository;
