//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! This module provides application-level services including:
//! - [`SettlementEngine`]: Atomic movement of hours at trade completion

pub mod settlement;

pub use settlement::{
    Ledger, LedgerError, SettlementEngine, TransferInstruction, TransferReceipt, payment_flow,
};
