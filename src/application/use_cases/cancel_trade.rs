//! # Cancel Trade Use Case
//!
//! Use case for a proposer withdrawing a pending trade.
//!
//! Cancellation takes the same per-trade lock as responding, so a withdrawal
//! can never race a settlement in flight.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::use_cases::propose_trade::{
    NotificationSink, TradeRepository, notify_parties,
};
use crate::application::use_cases::respond_trade::TradeLocks;
use crate::domain::events::{TradeEventKind, TradeSnapshot};
use crate::domain::value_objects::{AccountId, TradeId};
use std::sync::Arc;
use tracing::info;

/// Request to cancel a trade.
#[derive(Debug, Clone)]
pub struct CancelTradeRequest {
    /// The trade being withdrawn.
    pub trade_id: TradeId,
    /// The account requesting the withdrawal.
    pub caller: AccountId,
}

impl CancelTradeRequest {
    /// Creates a new cancel trade request.
    #[must_use]
    pub fn new(trade_id: TradeId, caller: AccountId) -> Self {
        Self { trade_id, caller }
    }
}

/// Response from cancelling a trade.
#[derive(Debug, Clone)]
pub struct CancelTradeResponse {
    /// The trade after the withdrawal.
    pub trade: TradeSnapshot,
}

/// Use case for withdrawing a pending trade.
///
/// Only the proposer may cancel; the counterparty declines by rejecting.
#[derive(Debug)]
pub struct CancelTradeUseCase {
    trade_repository: Arc<dyn TradeRepository>,
    notification_sink: Arc<dyn NotificationSink>,
    locks: Arc<TradeLocks>,
}

impl CancelTradeUseCase {
    /// Creates a new CancelTradeUseCase.
    #[must_use]
    pub fn new(
        trade_repository: Arc<dyn TradeRepository>,
        notification_sink: Arc<dyn NotificationSink>,
        locks: Arc<TradeLocks>,
    ) -> Self {
        Self {
            trade_repository,
            notification_sink,
            locks,
        }
    }

    /// Cancels a trade for the given request.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The trade does not exist
    /// - The caller is not a participant, or not the proposer
    /// - The trade is already finalized
    pub async fn execute(
        &self,
        request: CancelTradeRequest,
    ) -> ApplicationResult<CancelTradeResponse> {
        let lock = self.locks.lock_for(request.trade_id).await;
        let _guard = lock.lock().await;

        let mut trade = self
            .trade_repository
            .find_by_id(request.trade_id)
            .await?
            .ok_or_else(|| ApplicationError::trade_not_found(request.trade_id))?;

        let party = trade
            .party_of(&request.caller)
            .ok_or_else(|| ApplicationError::forbidden(&request.caller))?;

        trade.cancel(party)?;
        self.trade_repository.save(&trade).await?;

        info!(trade_id = %trade.id(), caller = %request.caller, "trade cancelled");
        notify_parties(
            &self.notification_sink,
            TradeEventKind::TradeCancelled,
            &trade,
        )
        .await;

        Ok(CancelTradeResponse {
            trade: TradeSnapshot::from(&trade),
        })
    }
}
