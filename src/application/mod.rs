//! # Application Layer
//!
//! Use case orchestration and application services.
//!
//! This layer coordinates domain objects to perform business operations,
//! handling transactions, authorization, and cross-cutting concerns.
//!
//! ## Use Cases
//!
//! - [`ProposeTradeUseCase`]: Propose a trade against a listing
//! - [`RespondTradeUseCase`]: Accept or reject a pending trade
//! - [`CancelTradeUseCase`]: Withdraw a pending trade as the proposer
//!
//! ## Services
//!
//! - [`SettlementEngine`]: Atomic settlement of mutually accepted trades

pub mod error;
pub mod services;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use services::{
    Ledger, LedgerError, SettlementEngine, TransferInstruction, TransferReceipt, payment_flow,
};
pub use use_cases::{
    CancelTradeRequest, CancelTradeResponse, CancelTradeUseCase, ListingDirectory,
    ListingLookupError, NotificationSink, ProposeTradeRequest, ProposeTradeResponse,
    ProposeTradeUseCase, RespondTradeRequest, RespondTradeResponse, RespondTradeUseCase,
    TradeDecision, TradeLocks, TradeRepository,
};
