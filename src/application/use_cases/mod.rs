//! # Use Cases
//!
//! Application use cases implementing business workflows.
//!
//! Each use case orchestrates domain objects to perform a specific
//! business operation, handling validation, persistence, and events.

pub mod cancel_trade;
pub mod propose_trade;
pub mod respond_trade;

pub use cancel_trade::{CancelTradeRequest, CancelTradeResponse, CancelTradeUseCase};
pub use propose_trade::{
    ListingDirectory, ListingLookupError, NotificationSink, ProposeTradeRequest,
    ProposeTradeResponse, ProposeTradeUseCase, TradeRepository,
};
pub use respond_trade::{
    RespondTradeRequest, RespondTradeResponse, RespondTradeUseCase, TradeDecision, TradeLocks,
};
