//! # Persistence Layer
//!
//! Implementations of the trade repository, ledger, and listing
//! directory ports.

pub mod in_memory;
