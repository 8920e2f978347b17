//! # REST Handlers
//!
//! Request handlers for REST endpoints.
//!
//! This module provides axum handlers for the trade negotiation and wallet
//! endpoints. Both the REST surface and the WebSocket surface are thin
//! adapters over the same use cases.
//!
//! # Endpoints
//!
//! ## Trades
//! - `POST /api/v1/trades` - Propose a trade against a listing
//! - `POST /api/v1/trades/{id}/response` - Accept or reject a pending trade
//! - `DELETE /api/v1/trades/{id}` - Withdraw a pending trade (proposer only)
//! - `GET /api/v1/trades/{id}` - Get trade by ID
//!
//! ## Accounts
//! - `GET /api/v1/accounts/{id}/trades` - List an account's trades
//! - `GET /api/v1/accounts/{id}/balance` - Wallet balance
//! - `GET /api/v1/accounts/{id}/ledger` - Wallet transaction history

use crate::application::error::ApplicationError;
use crate::application::services::settlement::Ledger;
use crate::application::use_cases::cancel_trade::{CancelTradeRequest, CancelTradeUseCase};
use crate::application::use_cases::propose_trade::{
    ProposeTradeRequest, ProposeTradeUseCase, TradeRepository,
};
use crate::application::use_cases::respond_trade::{
    RespondTradeRequest, RespondTradeUseCase, TradeDecision,
};
use crate::domain::errors::DomainError;
use crate::domain::entities::ledger_entry::LedgerEntry;
use crate::domain::events::TradeSnapshot;
use crate::domain::value_objects::{AccountId, Amount, Hours, ListingId, TradeId, TradeStatus};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for REST handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Propose trade use case.
    pub propose_trade: Arc<ProposeTradeUseCase>,
    /// Respond trade use case.
    pub respond_trade: Arc<RespondTradeUseCase>,
    /// Cancel trade use case.
    pub cancel_trade: Arc<CancelTradeUseCase>,
    /// Trade repository, for read endpoints.
    pub trade_repository: Arc<dyn TradeRepository>,
    /// Wallet ledger, for balance and history endpoints.
    pub ledger: Arc<dyn Ledger>,
}

// ============================================================================
// Error Response
// ============================================================================

/// Standard error response format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Creates a new error response.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates an error response with details.
    #[must_use]
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

impl From<ApplicationError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: ApplicationError) -> Self {
        let (status, code) = match &err {
            ApplicationError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApplicationError::TradeNotFound(_) | ApplicationError::ListingNotFound(_) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            ApplicationError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApplicationError::DomainError(domain_err) => {
                let pair = match domain_err {
                    DomainError::TradeNotFound(_) | DomainError::ListingNotFound(_) => {
                        (StatusCode::NOT_FOUND, "NOT_FOUND")
                    }
                    DomainError::InvalidStateTransition { .. }
                    | DomainError::AlreadyFinalized { .. } => (StatusCode::CONFLICT, "CONFLICT"),
                    DomainError::Forbidden(_) | DomainError::SelfTrade(_) => {
                        (StatusCode::FORBIDDEN, "FORBIDDEN")
                    }
                    DomainError::FundsInsufficient { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "FUNDS_INSUFFICIENT")
                    }
                    DomainError::InvalidListingKind(_) | DomainError::SelfSettlement(_) => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "SETTLEMENT_REJECTED")
                    }
                    DomainError::SettlementFailure(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "SETTLEMENT_FAILURE")
                    }
                    domain_err if domain_err.is_validation_error() => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
                    }
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
                };
                // Attach the numeric domain code so clients can branch on it.
                return (
                    pair.0,
                    Json(ErrorResponse::with_details(
                        pair.1,
                        err.to_string(),
                        serde_json::json!({ "domain_code": domain_err.code() }),
                    )),
                );
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        (status, Json(ErrorResponse::new(code, err.to_string())))
    }
}

// ============================================================================
// Trade DTOs
// ============================================================================

/// Request to propose a trade.
#[derive(Debug, Clone, Deserialize)]
pub struct ProposeTradeBody {
    /// Listing UUID to trade against.
    pub listing_id: String,
    /// Account proposing the trade.
    pub proposer: String,
    /// Monetary amount (informational only).
    pub amount: f64,
    /// Hours that settle on completion.
    pub hours: f64,
    /// Optional free-text note.
    #[serde(default)]
    pub note: Option<String>,
}

/// Request to respond to a trade.
#[derive(Debug, Clone, Deserialize)]
pub struct RespondTradeBody {
    /// Account responding.
    pub responder: String,
    /// Accept or reject.
    pub decision: TradeDecision,
}

/// Request to withdraw a trade.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelTradeBody {
    /// Account requesting the withdrawal.
    pub caller: String,
}

/// Trade response DTO.
#[derive(Debug, Clone, Serialize)]
pub struct TradeResponse {
    /// Trade ID.
    pub id: String,
    /// Listing ID.
    pub listing_id: String,
    /// Proposing account.
    pub proposer: String,
    /// Counterparty account (the listing owner).
    pub counterparty: String,
    /// Monetary amount.
    pub amount: String,
    /// Hours to settle.
    pub hours: String,
    /// Optional note.
    pub note: Option<String>,
    /// Current status.
    pub status: TradeStatus,
    /// Whether the proposer has accepted.
    pub proposer_accepted: bool,
    /// Whether the counterparty has accepted.
    pub counterparty_accepted: bool,
    /// Why the trade was rejected, if settlement rejected it.
    pub failure_reason: Option<String>,
    /// Created timestamp (ISO 8601).
    pub created_at: String,
    /// Updated timestamp (ISO 8601).
    pub updated_at: String,
}

impl From<&TradeSnapshot> for TradeResponse {
    fn from(snapshot: &TradeSnapshot) -> Self {
        Self {
            id: snapshot.trade_id.to_string(),
            listing_id: snapshot.listing_id.to_string(),
            proposer: snapshot.proposer.to_string(),
            counterparty: snapshot.counterparty.to_string(),
            amount: snapshot.amount.to_string(),
            hours: snapshot.hours.to_string(),
            note: snapshot.note.clone(),
            status: snapshot.status,
            proposer_accepted: snapshot.proposer_accepted,
            counterparty_accepted: snapshot.counterparty_accepted,
            failure_reason: snapshot.failure_reason.clone(),
            created_at: snapshot.created_at.to_string(),
            updated_at: snapshot.updated_at.to_string(),
        }
    }
}

/// Response from responding to a trade.
#[derive(Debug, Clone, Serialize)]
pub struct RespondTradeResponseBody {
    /// The trade after the response.
    #[serde(flatten)]
    pub trade: TradeResponse,
    /// True if this response settled and completed the trade.
    pub settled: bool,
}

// ============================================================================
// Account DTOs
// ============================================================================

/// Wallet balance response.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceResponse {
    /// Account ID.
    pub account_id: String,
    /// Balance in hours.
    pub balance: String,
}

/// A single ledger entry DTO.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntryResponse {
    /// Entry ID.
    pub id: String,
    /// CREDIT or DEBIT.
    pub direction: String,
    /// Hours moved.
    pub hours: String,
    /// Human-readable memo.
    pub memo: String,
    /// The trade that produced this entry.
    pub trade_id: String,
    /// Created timestamp (ISO 8601).
    pub created_at: String,
}

impl From<&LedgerEntry> for LedgerEntryResponse {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: entry.id().to_string(),
            direction: entry.direction().to_string(),
            hours: entry.hours().to_string(),
            memo: entry.memo().to_string(),
            trade_id: entry.trade_id().to_string(),
            created_at: entry.created_at().to_string(),
        }
    }
}

/// Wallet transaction history response.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerResponse {
    /// Account ID.
    pub account_id: String,
    /// Current balance in hours.
    pub balance: String,
    /// Entries, in write order.
    pub entries: Vec<LedgerEntryResponse>,
}

// ============================================================================
// Trade Handlers
// ============================================================================

/// Propose a trade against a listing.
///
/// # Errors
///
/// Returns `NOT_FOUND` if the listing does not exist.
/// Returns `FORBIDDEN` if the proposer owns the listing.
/// Returns `VALIDATION_ERROR` if amount or hours are out of bounds.
#[instrument(skip(state, body))]
pub async fn propose_trade(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ProposeTradeBody>,
) -> Result<(StatusCode, Json<TradeResponse>), (StatusCode, Json<ErrorResponse>)> {
    info!(listing_id = %body.listing_id, proposer = %body.proposer, "proposing trade");

    let listing_id = parse_listing_id(&body.listing_id)?;
    let amount = Amount::new(body.amount)
        .map_err(|e| validation_error(&format!("invalid amount: {e}")))?;
    let hours =
        Hours::new(body.hours).map_err(|e| validation_error(&format!("invalid hours: {e}")))?;

    let request = ProposeTradeRequest::new(
        listing_id,
        AccountId::new(body.proposer),
        amount,
        hours,
        body.note,
    );

    let response = state
        .propose_trade
        .execute(request)
        .await
        .map_err(<(StatusCode, Json<ErrorResponse>)>::from)?;

    Ok((
        StatusCode::CREATED,
        Json(TradeResponse::from(&response.trade)),
    ))
}

/// Accept or reject a pending trade.
///
/// # Errors
///
/// Returns `NOT_FOUND` if the trade does not exist.
/// Returns `FORBIDDEN` if the responder is not a participant.
/// Returns `CONFLICT` if the trade is already finalized.
/// Returns `FUNDS_INSUFFICIENT` if settlement rejected for lack of balance.
#[instrument(skip(state, body))]
pub async fn respond_trade(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<RespondTradeBody>,
) -> Result<Json<RespondTradeResponseBody>, (StatusCode, Json<ErrorResponse>)> {
    info!(trade_id = %id, responder = %body.responder, decision = %body.decision, "responding to trade");

    let trade_id = parse_trade_id(&id)?;
    let request = RespondTradeRequest::new(trade_id, AccountId::new(body.responder), body.decision);

    let response = state
        .respond_trade
        .execute(request)
        .await
        .map_err(<(StatusCode, Json<ErrorResponse>)>::from)?;

    Ok(Json(RespondTradeResponseBody {
        trade: TradeResponse::from(&response.trade),
        settled: response.settled,
    }))
}

/// Withdraw a pending trade.
///
/// # Errors
///
/// Returns `NOT_FOUND` if the trade does not exist.
/// Returns `FORBIDDEN` if the caller is not the proposer.
/// Returns `CONFLICT` if the trade is already finalized.
#[instrument(skip(state, body))]
pub async fn cancel_trade(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<CancelTradeBody>,
) -> Result<Json<TradeResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!(trade_id = %id, caller = %body.caller, "cancelling trade");

    let trade_id = parse_trade_id(&id)?;
    let request = CancelTradeRequest::new(trade_id, AccountId::new(body.caller));

    let response = state
        .cancel_trade
        .execute(request)
        .await
        .map_err(<(StatusCode, Json<ErrorResponse>)>::from)?;

    Ok(Json(TradeResponse::from(&response.trade)))
}

/// Get trade by ID.
///
/// # Errors
///
/// Returns `NOT_FOUND` if the trade does not exist.
/// Returns `VALIDATION_ERROR` if the ID is not a valid UUID.
#[instrument(skip(state))]
pub async fn get_trade(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TradeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let trade_id = parse_trade_id(&id)?;

    let trade = state
        .trade_repository
        .find_by_id(trade_id)
        .await
        .map_err(|e| {
            error!("failed to find trade: {}", e);
            internal_error(&e.to_string())
        })?
        .ok_or_else(|| not_found("trade", &id))?;

    Ok(Json(TradeResponse::from(&TradeSnapshot::from(&trade))))
}

// ============================================================================
// Account Handlers
// ============================================================================

/// List trades an account participates in, newest first.
///
/// # Errors
///
/// Returns an error response if the repository query fails.
#[instrument(skip(state))]
pub async fn list_account_trades(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<TradeResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let account = AccountId::new(id);

    let trades = state
        .trade_repository
        .find_by_participant(&account)
        .await
        .map_err(|e| {
            error!("failed to list trades: {}", e);
            internal_error(&e.to_string())
        })?;

    let responses = trades
        .iter()
        .map(|trade| TradeResponse::from(&TradeSnapshot::from(trade)))
        .collect();

    Ok(Json(responses))
}

/// Get an account's wallet balance.
///
/// Unknown accounts report a zero balance; wallets are created lazily.
///
/// # Errors
///
/// Returns an error response if the ledger query fails.
#[instrument(skip(state))]
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BalanceResponse>, (StatusCode, Json<ErrorResponse>)> {
    let account = AccountId::new(id);

    let balance = state.ledger.balance_of(&account).await.map_err(|e| {
        error!("failed to read balance: {}", e);
        internal_error(&e.to_string())
    })?;

    Ok(Json(BalanceResponse {
        account_id: account.to_string(),
        balance: balance.to_string(),
    }))
}

/// Get an account's wallet transaction history.
///
/// # Errors
///
/// Returns an error response if the ledger query fails.
#[instrument(skip(state))]
pub async fn get_ledger(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<LedgerResponse>, (StatusCode, Json<ErrorResponse>)> {
    let account = AccountId::new(id);

    let balance = state.ledger.balance_of(&account).await.map_err(|e| {
        error!("failed to read balance: {}", e);
        internal_error(&e.to_string())
    })?;
    let entries = state.ledger.entries_for(&account).await.map_err(|e| {
        error!("failed to read ledger entries: {}", e);
        internal_error(&e.to_string())
    })?;

    Ok(Json(LedgerResponse {
        account_id: account.to_string(),
        balance: balance.to_string(),
        entries: entries.iter().map(LedgerEntryResponse::from).collect(),
    }))
}

// ============================================================================
// Health Check
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_trade_id(id: &str) -> Result<TradeId, (StatusCode, Json<ErrorResponse>)> {
    uuid::Uuid::parse_str(id)
        .map(TradeId::from)
        .map_err(|_| validation_error(&format!("invalid trade ID: {id}")))
}

fn parse_listing_id(id: &str) -> Result<ListingId, (StatusCode, Json<ErrorResponse>)> {
    uuid::Uuid::parse_str(id)
        .map(ListingId::from)
        .map_err(|_| validation_error(&format!("invalid listing ID: {id}")))
}

fn validation_error(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("VALIDATION_ERROR", message)),
    )
}

fn not_found(resource: &str, id: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(
            "NOT_FOUND",
            format!("{resource} not found: {id}"),
        )),
    )
}

fn internal_error(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("INTERNAL_ERROR", message)),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn error_response_new() {
        let err = ErrorResponse::new("TEST_ERROR", "test message");
        assert_eq!(err.code, "TEST_ERROR");
        assert_eq!(err.message, "test message");
        assert!(err.details.is_none());
    }

    #[test]
    fn error_response_with_details() {
        let details = serde_json::json!({"domain_code": 4001});
        let err = ErrorResponse::with_details("FUNDS_INSUFFICIENT", "broke", details.clone());
        assert_eq!(err.code, "FUNDS_INSUFFICIENT");
        assert_eq!(err.details, Some(details));
    }

    #[test]
    fn funds_insufficient_maps_to_unprocessable() {
        let err: ApplicationError = DomainError::FundsInsufficient {
            needed: Hours::new(3.0).unwrap(),
            available: Hours::ZERO,
        }
        .into();
        let (status, Json(body)) = <(StatusCode, Json<ErrorResponse>)>::from(err);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "FUNDS_INSUFFICIENT");
        assert_eq!(body.message, "insufficient balance: needed 3, had 0");
        assert_eq!(
            body.details,
            Some(serde_json::json!({ "domain_code": 4001 }))
        );
    }

    #[test]
    fn already_finalized_maps_to_conflict() {
        let err: ApplicationError = DomainError::AlreadyFinalized {
            status: TradeStatus::Rejected,
        }
        .into();
        let (status, Json(body)) = <(StatusCode, Json<ErrorResponse>)>::from(err);
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "CONFLICT");
    }

    #[test]
    fn self_trade_maps_to_forbidden() {
        let err: ApplicationError = DomainError::SelfTrade("alice".to_string()).into();
        let (status, Json(body)) = <(StatusCode, Json<ErrorResponse>)>::from(err);
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body.code, "FORBIDDEN");
    }

    #[test]
    fn trade_not_found_maps_to_404() {
        let err = ApplicationError::trade_not_found("abc");
        let (status, Json(body)) = <(StatusCode, Json<ErrorResponse>)>::from(err);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "NOT_FOUND");
    }

    #[test]
    fn repository_error_maps_to_500() {
        let err = ApplicationError::repository("version conflict");
        let (status, Json(body)) = <(StatusCode, Json<ErrorResponse>)>::from(err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "INTERNAL_ERROR");
    }

    #[test]
    fn parse_trade_id_valid() {
        let id = "550e8400-e29b-41d4-a716-446655440000";
        assert!(parse_trade_id(id).is_ok());
    }

    #[test]
    fn parse_trade_id_invalid() {
        assert!(parse_trade_id("not-a-uuid").is_err());
    }

    #[test]
    fn parse_listing_id_invalid() {
        assert!(parse_listing_id("nope").is_err());
    }

    #[tokio::test]
    async fn health_check_returns_healthy() {
        let response = health_check().await;
        assert_eq!(response.status, "healthy");
    }
}
