//! # Propose Trade Use Case
//!
//! Use case for proposing a trade against a marketplace listing.
//!
//! This module also defines the ports the negotiation gateway depends on:
//! [`TradeRepository`], [`ListingDirectory`], and [`NotificationSink`].

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::listing::Listing;
use crate::domain::entities::trade::Trade;
use crate::domain::errors::DomainError;
use crate::domain::events::{TradeEvent, TradeEventKind, TradeSnapshot};
use crate::domain::value_objects::{AccountId, Amount, Hours, ListingId, TradeId};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Repository for persisting trades.
#[async_trait]
pub trait TradeRepository: Send + Sync + fmt::Debug {
    /// Saves a trade, detecting concurrent modification by version.
    async fn save(&self, trade: &Trade) -> ApplicationResult<()>;

    /// Finds a trade by ID.
    async fn find_by_id(&self, id: TradeId) -> ApplicationResult<Option<Trade>>;

    /// Finds all trades an account participates in, newest first.
    async fn find_by_participant(&self, account: &AccountId) -> ApplicationResult<Vec<Trade>>;
}

/// Error from the listing directory port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingLookupError {
    /// The stored listing carries a kind tag this engine does not know.
    #[error("unknown listing kind: {0}")]
    InvalidKind(String),

    /// The lookup itself failed.
    #[error("listing lookup failed: {0}")]
    Lookup(String),
}

/// Read access to marketplace listings.
///
/// Listing CRUD lives in an external collaborator; this port resolves the
/// fields settlement needs. An unknown kind tag in stored data surfaces as
/// [`ListingLookupError::InvalidKind`], never as a silent default.
#[async_trait]
pub trait ListingDirectory: Send + Sync + fmt::Debug {
    /// Finds a listing by ID.
    async fn find(&self, id: ListingId) -> Result<Option<Listing>, ListingLookupError>;
}

/// Best-effort delivery of trade events to a participant.
///
/// Delivery runs after the trade state is committed; a failed delivery is
/// logged and never rolls the trade back.
#[async_trait]
pub trait NotificationSink: Send + Sync + fmt::Debug {
    /// Delivers an event to one account.
    async fn notify(&self, recipient: &AccountId, event: &TradeEvent) -> Result<(), String>;
}

/// Delivers an event to both participants, logging failed deliveries.
pub(crate) async fn notify_parties(
    sink: &Arc<dyn NotificationSink>,
    kind: TradeEventKind,
    trade: &Trade,
) {
    let event = TradeEvent::new(kind, TradeSnapshot::from(trade));
    for recipient in [trade.proposer(), trade.counterparty()] {
        if let Err(reason) = sink.notify(recipient, &event).await {
            warn!(
                trade_id = %trade.id(),
                recipient = %recipient,
                %reason,
                "trade notification delivery failed"
            );
        }
    }
}

/// Request to propose a trade.
#[derive(Debug, Clone)]
pub struct ProposeTradeRequest {
    /// The listing to trade against.
    pub listing_id: ListingId,
    /// The account proposing the trade.
    pub proposer: AccountId,
    /// Proposed monetary amount (informational).
    pub amount: Amount,
    /// Hours that settle on completion.
    pub hours: Hours,
    /// Optional free-text note.
    pub note: Option<String>,
}

impl ProposeTradeRequest {
    /// Creates a new propose trade request.
    #[must_use]
    pub fn new(
        listing_id: ListingId,
        proposer: AccountId,
        amount: Amount,
        hours: Hours,
        note: Option<String>,
    ) -> Self {
        Self {
            listing_id,
            proposer,
            amount,
            hours,
            note,
        }
    }
}

/// Response from proposing a trade.
#[derive(Debug, Clone)]
pub struct ProposeTradeResponse {
    /// The created trade.
    pub trade: TradeSnapshot,
}

/// Use case for proposing a trade against a listing.
///
/// Workflow:
/// 1. Resolve the listing
/// 2. Refuse proposals from the listing owner
/// 3. Validate bounds and create the `PENDING` trade
/// 4. Persist
/// 5. Notify both parties (best effort)
#[derive(Debug)]
pub struct ProposeTradeUseCase {
    trade_repository: Arc<dyn TradeRepository>,
    listing_directory: Arc<dyn ListingDirectory>,
    notification_sink: Arc<dyn NotificationSink>,
}

impl ProposeTradeUseCase {
    /// Creates a new ProposeTradeUseCase.
    #[must_use]
    pub fn new(
        trade_repository: Arc<dyn TradeRepository>,
        listing_directory: Arc<dyn ListingDirectory>,
        notification_sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            trade_repository,
            listing_directory,
            notification_sink,
        }
    }

    /// Proposes a trade for the given request.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The listing does not exist, or its stored kind is unrecognized
    /// - The proposer owns the listing
    /// - Amount or hours are out of bounds
    /// - Persistence fails
    pub async fn execute(
        &self,
        request: ProposeTradeRequest,
    ) -> ApplicationResult<ProposeTradeResponse> {
        let listing = self
            .listing_directory
            .find(request.listing_id)
            .await
            .map_err(|err| match err {
                ListingLookupError::InvalidKind(tag) => {
                    ApplicationError::DomainError(DomainError::InvalidListingKind(tag))
                }
                ListingLookupError::Lookup(msg) => ApplicationError::RepositoryError(msg),
            })?
            .ok_or_else(|| ApplicationError::listing_not_found(request.listing_id))?;

        // Trade::new rejects proposer == counterparty as a self trade.
        let trade = Trade::new(
            request.listing_id,
            request.proposer,
            listing.owner().clone(),
            request.amount,
            request.hours,
            request.note,
        )?;

        self.trade_repository.save(&trade).await?;

        info!(
            trade_id = %trade.id(),
            listing_id = %trade.listing_id(),
            proposer = %trade.proposer(),
            counterparty = %trade.counterparty(),
            "trade proposed"
        );

        notify_parties(
            &self.notification_sink,
            TradeEventKind::TradeProposed,
            &trade,
        )
        .await;

        Ok(ProposeTradeResponse {
            trade: TradeSnapshot::from(&trade),
        })
    }
}
