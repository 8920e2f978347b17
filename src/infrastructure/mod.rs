//! # Infrastructure Layer
//!
//! Adapters implementing the application ports.
//!
//! ## Persistence
//!
//! In-memory adapters back the default deployment: the trade repository,
//! the wallet ledger, and the listing directory. A SQL deployment would
//! implement the same ports behind this module.

pub mod persistence;
