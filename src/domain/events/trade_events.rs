//! # Trade Events
//!
//! Events emitted as a trade moves through its lifecycle, delivered to both
//! participants over the notification channel.

use crate::domain::entities::trade::Trade;
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{
    AccountId, Amount, EventId, Hours, ListingId, TradeId, TradeStatus,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to the trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeEventKind {
    /// A new trade was proposed.
    TradeProposed,

    /// A party accepted; the trade is still awaiting the other party.
    TradeAccepted,

    /// The trade was rejected, by a party or by settlement.
    TradeRejected,

    /// Both parties accepted and the hours settled.
    TradeCompleted,

    /// The proposer withdrew the trade.
    TradeCancelled,
}

impl fmt::Display for TradeEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TradeProposed => "trade_proposed",
            Self::TradeAccepted => "trade_accepted",
            Self::TradeRejected => "trade_rejected",
            Self::TradeCompleted => "trade_completed",
            Self::TradeCancelled => "trade_cancelled",
        };
        write!(f, "{}", s)
    }
}

/// A point-in-time view of a trade, carried in events and API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSnapshot {
    /// The trade identifier.
    pub trade_id: TradeId,
    /// The listing the trade was proposed against.
    pub listing_id: ListingId,
    /// The proposing account.
    pub proposer: AccountId,
    /// The listing owner.
    pub counterparty: AccountId,
    /// Proposed monetary amount.
    pub amount: Amount,
    /// Hours that settle on completion.
    pub hours: Hours,
    /// Proposer's note, if any.
    pub note: Option<String>,
    /// Current lifecycle status.
    pub status: TradeStatus,
    /// Whether the proposer has accepted.
    pub proposer_accepted: bool,
    /// Whether the counterparty has accepted.
    pub counterparty_accepted: bool,
    /// Why the trade was rejected, when settlement rejected it.
    pub failure_reason: Option<String>,
    /// When the trade was created.
    pub created_at: Timestamp,
    /// When the trade was last updated.
    pub updated_at: Timestamp,
}

impl From<&Trade> for TradeSnapshot {
    fn from(trade: &Trade) -> Self {
        Self {
            trade_id: trade.id(),
            listing_id: trade.listing_id(),
            proposer: trade.proposer().clone(),
            counterparty: trade.counterparty().clone(),
            amount: trade.amount(),
            hours: trade.hours(),
            note: trade.note().map(ToOwned::to_owned),
            status: trade.status(),
            proposer_accepted: trade.proposer_accepted(),
            counterparty_accepted: trade.counterparty_accepted(),
            failure_reason: trade.failure_reason().map(ToOwned::to_owned),
            created_at: trade.created_at(),
            updated_at: trade.updated_at(),
        }
    }
}

/// An event about a trade, addressed to one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEvent {
    /// Unique event identifier.
    pub event_id: EventId,
    /// What happened.
    pub kind: TradeEventKind,
    /// The trade state after the change.
    pub trade: TradeSnapshot,
    /// When the event was emitted.
    pub occurred_at: Timestamp,
}

impl TradeEvent {
    /// Creates a new event for the given trade state.
    #[must_use]
    pub fn new(kind: TradeEventKind, trade: TradeSnapshot) -> Self {
        Self {
            event_id: EventId::new_v4(),
            kind,
            trade,
            occurred_at: Timestamp::now(),
        }
    }
}
