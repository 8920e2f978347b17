//! # Respond Trade Use Case
//!
//! Use case for accepting or rejecting a pending trade.
//!
//! Responses to the same trade are serialized through a per-trade async
//! lock. The second of two simultaneous responders blocks, then observes the
//! terminal state and receives the already-finalized outcome; a trade can
//! never settle twice.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::settlement::SettlementEngine;
use crate::application::use_cases::propose_trade::{
    ListingDirectory, ListingLookupError, NotificationSink, TradeRepository, notify_parties,
};
use crate::domain::entities::trade::{Trade, TradeParty};
use crate::domain::errors::DomainError;
use crate::domain::events::{TradeEventKind, TradeSnapshot};
use crate::domain::value_objects::{AccountId, TradeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// A party's decision on a pending trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeDecision {
    /// Accept the trade.
    Accept,

    /// Reject the trade.
    Reject,
}

impl fmt::Display for TradeDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
        };
        write!(f, "{}", s)
    }
}

/// Per-trade exclusive locks.
///
/// Each trade gets one async mutex, created on first touch. The lock is held
/// for the entire respond transition, including settlement, so concurrent
/// responses to one trade serialize while different trades proceed in
/// parallel.
#[derive(Debug, Default)]
pub struct TradeLocks {
    locks: Mutex<HashMap<TradeId, Arc<Mutex<()>>>>,
}

impl TradeLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock for a trade, creating it on first use.
    ///
    /// Entries nobody holds are evicted on the way in, so the table stays
    /// bounded by the number of trades with a response in flight rather
    /// than growing with every trade ever touched.
    pub async fn lock_for(&self, trade_id: TradeId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(trade_id).or_default().clone()
    }

    /// Returns the number of tracked locks.
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    /// Returns true if no locks are tracked.
    pub async fn is_empty(&self) -> bool {
        self.locks.lock().await.is_empty()
    }
}

/// Request to respond to a trade.
#[derive(Debug, Clone)]
pub struct RespondTradeRequest {
    /// The trade being responded to.
    pub trade_id: TradeId,
    /// The account responding.
    pub responder: AccountId,
    /// Accept or reject.
    pub decision: TradeDecision,
}

impl RespondTradeRequest {
    /// Creates a new respond trade request.
    #[must_use]
    pub fn new(trade_id: TradeId, responder: AccountId, decision: TradeDecision) -> Self {
        Self {
            trade_id,
            responder,
            decision,
        }
    }
}

/// Response from a trade response.
#[derive(Debug, Clone)]
pub struct RespondTradeResponse {
    /// The trade state after the response.
    pub trade: TradeSnapshot,
    /// True if this response triggered settlement and completion.
    pub settled: bool,
}

/// Use case for responding to a pending trade.
///
/// Workflow, entirely under the per-trade lock:
/// 1. Load the trade and resolve the responder's role
/// 2. Record the decision on the aggregate
/// 3. When both parties have accepted, settle synchronously and complete
/// 4. Persist, then notify both parties (best effort)
///
/// Settlement outcomes that are business rejections (insufficient funds,
/// unrecognized listing kind, self settlement) reject the trade and surface
/// the reason; any other settlement failure forces the trade to `REJECTED`
/// so it never stays `PENDING` after a failed attempt. If the transfer
/// commits but the completion write fails, the trade is instead forced to
/// `COMPLETED`, since the hours have already moved.
#[derive(Debug)]
pub struct RespondTradeUseCase {
    trade_repository: Arc<dyn TradeRepository>,
    listing_directory: Arc<dyn ListingDirectory>,
    notification_sink: Arc<dyn NotificationSink>,
    settlement: SettlementEngine,
    locks: Arc<TradeLocks>,
}

impl RespondTradeUseCase {
    /// Creates a new RespondTradeUseCase.
    #[must_use]
    pub fn new(
        trade_repository: Arc<dyn TradeRepository>,
        listing_directory: Arc<dyn ListingDirectory>,
        notification_sink: Arc<dyn NotificationSink>,
        settlement: SettlementEngine,
        locks: Arc<TradeLocks>,
    ) -> Self {
        Self {
            trade_repository,
            listing_directory,
            notification_sink,
            settlement,
            locks,
        }
    }

    /// Responds to a trade for the given request.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The trade does not exist
    /// - The responder is not a participant
    /// - The trade is already finalized
    /// - Settlement rejects the trade (the rejection is persisted first)
    pub async fn execute(
        &self,
        request: RespondTradeRequest,
    ) -> ApplicationResult<RespondTradeResponse> {
        let lock = self.locks.lock_for(request.trade_id).await;
        let _guard = lock.lock().await;

        // Re-read under the lock: a concurrent response may have finalized
        // the trade while this one waited.
        let mut trade = self
            .trade_repository
            .find_by_id(request.trade_id)
            .await?
            .ok_or_else(|| ApplicationError::trade_not_found(request.trade_id))?;

        let party = trade
            .party_of(&request.responder)
            .ok_or_else(|| ApplicationError::forbidden(&request.responder))?;

        match request.decision {
            TradeDecision::Reject => {
                trade.reject(party)?;
                self.trade_repository.save(&trade).await?;

                info!(trade_id = %trade.id(), responder = %request.responder, "trade rejected");
                notify_parties(
                    &self.notification_sink,
                    TradeEventKind::TradeRejected,
                    &trade,
                )
                .await;

                Ok(RespondTradeResponse {
                    trade: TradeSnapshot::from(&trade),
                    settled: false,
                })
            }
            TradeDecision::Accept => {
                let changed = trade.accept(party)?;

                if !trade.both_accepted() {
                    if changed {
                        self.trade_repository.save(&trade).await?;
                    }

                    info!(
                        trade_id = %trade.id(),
                        responder = %request.responder,
                        "trade accepted, awaiting other party"
                    );
                    notify_parties(
                        &self.notification_sink,
                        TradeEventKind::TradeAccepted,
                        &trade,
                    )
                    .await;

                    return Ok(RespondTradeResponse {
                        trade: TradeSnapshot::from(&trade),
                        settled: false,
                    });
                }

                self.settle_and_complete(trade).await
            }
        }
    }

    /// Settles a mutually accepted trade and completes or rejects it.
    async fn settle_and_complete(
        &self,
        mut trade: Trade,
    ) -> ApplicationResult<RespondTradeResponse> {
        let listing = match self.listing_directory.find(trade.listing_id()).await {
            Ok(Some(listing)) => listing,
            Ok(None) => {
                let reason = format!("listing {} not found", trade.listing_id());
                return self
                    .reject_for_settlement(trade, DomainError::SettlementFailure(reason))
                    .await;
            }
            Err(ListingLookupError::InvalidKind(tag)) => {
                return self
                    .reject_for_settlement(trade, DomainError::InvalidListingKind(tag))
                    .await;
            }
            Err(ListingLookupError::Lookup(msg)) => {
                return self
                    .reject_for_settlement(trade, DomainError::SettlementFailure(msg))
                    .await;
            }
        };

        match self.settlement.settle(&trade, &listing).await {
            Ok(receipt) => {
                trade.complete()?;
                if let Err(save_err) = self.trade_repository.save(&trade).await {
                    // The transfer has already committed: the trade must
                    // still end COMPLETED, or a retried accept would run
                    // settlement a second time.
                    error!(
                        trade_id = %trade.id(),
                        %save_err,
                        "completion write failed after transfer"
                    );
                    self.refresh_and_complete(trade.id()).await;
                    return Err(save_err);
                }

                info!(
                    trade_id = %trade.id(),
                    hours = %trade.hours(),
                    debit_entry = %receipt.debit.id(),
                    credit_entry = %receipt.credit.id(),
                    "trade settled and completed"
                );
                notify_parties(
                    &self.notification_sink,
                    TradeEventKind::TradeCompleted,
                    &trade,
                )
                .await;

                Ok(RespondTradeResponse {
                    trade: TradeSnapshot::from(&trade),
                    settled: true,
                })
            }
            Err(err @ DomainError::SettlementFailure(_)) => {
                // Unexpected failure: reload and correct so the trade does
                // not stay PENDING, then surface the failure.
                error!(trade_id = %trade.id(), %err, "settlement failed unexpectedly");
                self.refresh_and_reject(trade.id(), err.to_string()).await;
                Err(err.into())
            }
            Err(err) => self.reject_for_settlement(trade, err).await,
        }
    }

    /// Rejects a trade for a business settlement outcome and surfaces it.
    async fn reject_for_settlement(
        &self,
        mut trade: Trade,
        err: DomainError,
    ) -> ApplicationResult<RespondTradeResponse> {
        trade.mark_rejected(err.to_string())?;
        self.trade_repository.save(&trade).await?;

        warn!(trade_id = %trade.id(), reason = %err, "trade rejected at settlement");
        notify_parties(
            &self.notification_sink,
            TradeEventKind::TradeRejected,
            &trade,
        )
        .await;

        Err(err.into())
    }

    /// Reloads a trade and forces it to `COMPLETED` if still pending.
    ///
    /// Only called after a transfer has committed but the status write
    /// failed; the stored copy may predate the final acceptance, so both
    /// flags are re-applied before completing.
    async fn refresh_and_complete(&self, trade_id: TradeId) {
        let mut trade = match self.trade_repository.find_by_id(trade_id).await {
            Ok(Some(trade)) => trade,
            Ok(None) => {
                error!(%trade_id, "trade vanished during completion correction");
                return;
            }
            Err(err) => {
                error!(%trade_id, %err, "could not reload trade for completion correction");
                return;
            }
        };

        if !trade.is_pending() {
            return;
        }
        for party in [TradeParty::Proposer, TradeParty::Counterparty] {
            if let Err(err) = trade.accept(party) {
                error!(%trade_id, %err, "could not re-apply acceptance");
                return;
            }
        }
        if let Err(err) = trade.complete() {
            error!(%trade_id, %err, "could not mark trade completed");
            return;
        }
        if let Err(err) = self.trade_repository.save(&trade).await {
            error!(%trade_id, %err, "could not persist completion correction");
            return;
        }
        notify_parties(
            &self.notification_sink,
            TradeEventKind::TradeCompleted,
            &trade,
        )
        .await;
    }

    /// Reloads a trade and forces it to `REJECTED` if still pending.
    async fn refresh_and_reject(&self, trade_id: TradeId, reason: String) {
        let refreshed = match self.trade_repository.find_by_id(trade_id).await {
            Ok(Some(trade)) => trade,
            Ok(None) => {
                error!(%trade_id, "trade vanished during settlement correction");
                return;
            }
            Err(err) => {
                error!(%trade_id, %err, "could not reload trade for settlement correction");
                return;
            }
        };

        let mut trade = refreshed;
        if !trade.is_pending() {
            return;
        }
        if let Err(err) = trade.mark_rejected(reason) {
            error!(%trade_id, %err, "could not mark trade rejected");
            return;
        }
        if let Err(err) = self.trade_repository.save(&trade).await {
            error!(%trade_id, %err, "could not persist settlement correction");
            return;
        }
        notify_parties(
            &self.notification_sink,
            TradeEventKind::TradeRejected,
            &trade,
        )
        .await;
    }
}
