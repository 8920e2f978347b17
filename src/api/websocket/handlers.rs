//! # WebSocket Handlers
//!
//! WebSocket connection and message handlers for real-time trade streaming.
//!
//! Each connection belongs to one account (`?account=` query parameter) and
//! receives every trade event addressed to that account. Inbound messages
//! drive the same use cases as the REST surface; the socket is only another
//! transport.
//!
//! # Message Format
//!
//! Inbound, JSON tagged by `type`:
//!
//! ```json
//! {"type": "trade_request", "listing_id": "...", "amount": 100.0, "hours": 2.5}
//! {"type": "trade_response", "trade_id": "...", "decision": "accept"}
//! {"type": "ping"}
//! ```
//!
//! Outbound: `ack` (the caller's own operation result), `event` (trade
//! lifecycle notifications), `error`, `pong`.

use crate::application::use_cases::propose_trade::{
    NotificationSink, ProposeTradeRequest, ProposeTradeUseCase,
};
use crate::application::use_cases::respond_trade::{
    RespondTradeRequest, RespondTradeUseCase, TradeDecision,
};
use crate::domain::events::{TradeEvent, TradeSnapshot};
use crate::domain::value_objects::{AccountId, Amount, Hours, ListingId, TradeId};
use async_trait::async_trait;
use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast, mpsc};
use tracing::{debug, error, info, instrument};

// ============================================================================
// Configuration
// ============================================================================

/// WebSocket configuration.
#[derive(Debug, Clone)]
pub struct WebSocketConfig {
    /// Broadcast channel capacity per account.
    pub channel_capacity: usize,
    /// Outbound queue depth per connection.
    pub send_queue_depth: usize,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            send_queue_depth: 100,
        }
    }
}

// ============================================================================
// Event Hub
// ============================================================================

/// Per-account trade event hub.
///
/// One broadcast channel per account, created on first touch. The hub is the
/// crate's [`NotificationSink`]: use cases publish here after commit, and
/// every WebSocket connection for that account receives the event. An account
/// with no open connection drops events silently; delivery is best effort.
#[derive(Debug)]
pub struct WebSocketState {
    /// Configuration.
    pub config: WebSocketConfig,
    channels: RwLock<HashMap<AccountId, broadcast::Sender<TradeEvent>>>,
    /// Active connections (for logging/management).
    pub active_connections: RwLock<usize>,
}

impl WebSocketState {
    /// Creates a new hub with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WebSocketConfig::default())
    }

    /// Creates a new hub with custom configuration.
    #[must_use]
    pub fn with_config(config: WebSocketConfig) -> Self {
        Self {
            config,
            channels: RwLock::new(HashMap::new()),
            active_connections: RwLock::new(0),
        }
    }

    /// Subscribes to an account's event stream, creating it on first use.
    pub async fn subscribe(&self, account: &AccountId) -> broadcast::Receiver<TradeEvent> {
        let mut channels = self.channels.write().await;
        channels
            .entry(account.clone())
            .or_insert_with(|| broadcast::channel(self.config.channel_capacity).0)
            .subscribe()
    }

    /// Publishes an event to an account's stream, if anyone is listening.
    pub async fn publish(&self, account: &AccountId, event: TradeEvent) {
        let channels = self.channels.read().await;
        if let Some(sender) = channels.get(account) {
            // Send only fails when there are no receivers; that is fine.
            let _ = sender.send(event);
        }
    }
}

impl Default for WebSocketState {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSink for WebSocketState {
    async fn notify(&self, recipient: &AccountId, event: &TradeEvent) -> Result<(), String> {
        self.publish(recipient, event.clone()).await;
        Ok(())
    }
}

// ============================================================================
// Gateway State
// ============================================================================

/// Shared state for the WebSocket transport.
#[derive(Debug, Clone)]
pub struct WsState {
    /// The per-account event hub.
    pub events: Arc<WebSocketState>,
    /// Propose trade use case.
    pub propose_trade: Arc<ProposeTradeUseCase>,
    /// Respond trade use case.
    pub respond_trade: Arc<RespondTradeUseCase>,
}

// ============================================================================
// WebSocket Messages
// ============================================================================

/// Incoming WebSocket message.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IncomingMessage {
    /// Propose a trade against a listing; the proposer is the connection's
    /// account.
    TradeRequest {
        /// Listing UUID to trade against.
        listing_id: String,
        /// Monetary amount (informational only).
        amount: f64,
        /// Hours that settle on completion.
        hours: f64,
        /// Optional free-text note.
        #[serde(default)]
        note: Option<String>,
    },
    /// Accept or reject a pending trade as the connection's account.
    TradeResponse {
        /// Trade UUID being responded to.
        trade_id: String,
        /// Accept or reject.
        decision: TradeDecision,
    },
    /// Keepalive request.
    Ping,
}

/// Outgoing WebSocket message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutgoingMessage {
    /// A trade event addressed to this account.
    Event {
        /// The event.
        event: TradeEvent,
    },
    /// Result of an operation this connection requested.
    Ack {
        /// The trade after the operation.
        trade: TradeSnapshot,
        /// True if the operation settled and completed the trade.
        settled: bool,
    },
    /// An operation or message failed.
    Error {
        /// What went wrong.
        message: String,
    },
    /// Keepalive response.
    Pong,
}

// ============================================================================
// Connection Query Parameters
// ============================================================================

/// Query parameters for a WebSocket connection.
#[derive(Debug, Deserialize)]
pub struct ConnectionParams {
    /// The account this connection acts and listens as.
    pub account: String,
}

// ============================================================================
// WebSocket Handler
// ============================================================================

/// WebSocket upgrade handler.
#[instrument(skip(state, ws))]
pub async fn ws_handler(
    State(state): State<Arc<WsState>>,
    Query(params): Query<ConnectionParams>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let account = AccountId::new(params.account);
    info!(%account, "websocket connection request");

    ws.on_upgrade(move |socket| handle_socket(socket, state, account))
}

/// Handles an established WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<WsState>, account: AccountId) {
    {
        let mut count = state.events.active_connections.write().await;
        *count += 1;
        info!(%account, active = *count, "websocket connected");
    }

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<OutgoingMessage>(state.events.config.send_queue_depth);

    // Forward this account's trade events to the socket.
    let mut events_rx = state.events.subscribe(&account).await;
    let tx_events = tx.clone();
    let event_forwarder = tokio::spawn(async move {
        while let Ok(event) = events_rx.recv().await {
            if tx_events
                .send(OutgoingMessage::Event { event })
                .await
                .is_err()
            {
                break;
            }
        }
    });

    // Serialize and send queued outbound messages.
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg)
                && sender.send(Message::Text(json.into())).await.is_err()
            {
                break;
            }
        }
    });

    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                match handle_text_message(&state, &account, &text).await {
                    Ok(msg) => {
                        let _ = tx.send(msg).await;
                    }
                    Err(message) => {
                        let _ = tx.send(OutgoingMessage::Error { message }).await;
                    }
                }
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {
                debug!(%account, "websocket heartbeat");
            }
            Ok(Message::Close(_)) => {
                info!(%account, "client requested close");
                break;
            }
            Ok(Message::Binary(_)) => {
                let _ = tx
                    .send(OutgoingMessage::Error {
                        message: "binary messages not supported".to_string(),
                    })
                    .await;
            }
            Err(e) => {
                error!(%account, "websocket error: {}", e);
                break;
            }
        }
    }

    event_forwarder.abort();
    send_task.abort();

    {
        let mut count = state.events.active_connections.write().await;
        *count = count.saturating_sub(1);
        info!(%account, active = *count, "websocket disconnected");
    }
}

/// Handles a text message from the client, driving the use cases.
async fn handle_text_message(
    state: &Arc<WsState>,
    account: &AccountId,
    text: &str,
) -> Result<OutgoingMessage, String> {
    let msg: IncomingMessage =
        serde_json::from_str(text).map_err(|e| format!("invalid JSON: {e}"))?;

    match msg {
        IncomingMessage::TradeRequest {
            listing_id,
            amount,
            hours,
            note,
        } => {
            let listing_id = uuid::Uuid::parse_str(&listing_id)
                .map(ListingId::from)
                .map_err(|_| format!("invalid listing ID: {listing_id}"))?;
            let amount = Amount::new(amount).map_err(|e| e.to_string())?;
            let hours = Hours::new(hours).map_err(|e| e.to_string())?;

            let response = state
                .propose_trade
                .execute(ProposeTradeRequest::new(
                    listing_id,
                    account.clone(),
                    amount,
                    hours,
                    note,
                ))
                .await
                .map_err(|e| e.to_string())?;

            Ok(OutgoingMessage::Ack {
                trade: response.trade,
                settled: false,
            })
        }
        IncomingMessage::TradeResponse { trade_id, decision } => {
            let trade_id = uuid::Uuid::parse_str(&trade_id)
                .map(TradeId::from)
                .map_err(|_| format!("invalid trade ID: {trade_id}"))?;

            let response = state
                .respond_trade
                .execute(RespondTradeRequest::new(
                    trade_id,
                    account.clone(),
                    decision,
                ))
                .await
                .map_err(|e| e.to_string())?;

            Ok(OutgoingMessage::Ack {
                trade: response.trade,
                settled: response.settled,
            })
        }
        IncomingMessage::Ping => Ok(OutgoingMessage::Pong),
    }
}

// ============================================================================
// Router
// ============================================================================

/// Creates the WebSocket router.
pub fn create_ws_router(state: Arc<WsState>) -> axum::Router {
    use axum::routing::get;

    axum::Router::new()
        .route("/", get(ws_handler))
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::trade::Trade;
    use crate::domain::events::TradeEventKind;

    fn sample_event() -> TradeEvent {
        let trade = Trade::new(
            ListingId::new_v4(),
            AccountId::new("alice"),
            AccountId::new("bob"),
            Amount::new(100.0).unwrap(),
            Hours::new(2.0).unwrap(),
            None,
        )
        .unwrap();
        TradeEvent::new(TradeEventKind::TradeProposed, TradeSnapshot::from(&trade))
    }

    #[test]
    fn incoming_trade_request_deserializes() {
        let json = r#"{
            "type": "trade_request",
            "listing_id": "550e8400-e29b-41d4-a716-446655440000",
            "amount": 100.0,
            "hours": 2.5
        }"#;
        let msg: IncomingMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(
            msg,
            IncomingMessage::TradeRequest { hours, .. } if (hours - 2.5).abs() < f64::EPSILON
        ));
    }

    #[test]
    fn incoming_trade_response_deserializes() {
        let json = r#"{
            "type": "trade_response",
            "trade_id": "550e8400-e29b-41d4-a716-446655440000",
            "decision": "accept"
        }"#;
        let msg: IncomingMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(
            msg,
            IncomingMessage::TradeResponse {
                decision: TradeDecision::Accept,
                ..
            }
        ));
    }

    #[test]
    fn incoming_ping_deserializes() {
        let msg: IncomingMessage = serde_json::from_str(r#"{"type": "ping"}"#).unwrap();
        assert!(matches!(msg, IncomingMessage::Ping));
    }

    #[test]
    fn unknown_type_fails() {
        let result: Result<IncomingMessage, _> =
            serde_json::from_str(r#"{"type": "subscribe", "channel": "trades"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn outgoing_event_serializes_with_tag() {
        let msg = OutgoingMessage::Event {
            event: sample_event(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"event\""));
        assert!(json.contains("\"kind\":\"trade_proposed\""));
    }

    #[test]
    fn outgoing_pong_serializes() {
        let json = serde_json::to_string(&OutgoingMessage::Pong).unwrap();
        assert_eq!(json, "{\"type\":\"pong\"}");
    }

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let hub = WebSocketState::new();
        let account = AccountId::new("alice");
        let mut rx = hub.subscribe(&account).await;

        let event = sample_event();
        hub.publish(&account, event.clone()).await;

        let received = rx.recv().await.unwrap();
        assert_eq!(received, event);
    }

    #[tokio::test]
    async fn publish_without_subscriber_is_silent() {
        let hub = WebSocketState::new();
        hub.publish(&AccountId::new("nobody"), sample_event()).await;
    }

    #[tokio::test]
    async fn notification_sink_delivers_to_recipient_only() {
        let hub = WebSocketState::new();
        let alice = AccountId::new("alice");
        let bob = AccountId::new("bob");
        let mut alice_rx = hub.subscribe(&alice).await;
        let mut bob_rx = hub.subscribe(&bob).await;

        let event = sample_event();
        hub.notify(&alice, &event).await.unwrap();

        assert_eq!(alice_rx.recv().await.unwrap(), event);
        assert!(bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn each_subscriber_gets_its_own_copy() {
        let hub = WebSocketState::new();
        let account = AccountId::new("alice");
        let mut first = hub.subscribe(&account).await;
        let mut second = hub.subscribe(&account).await;

        hub.publish(&account, sample_event()).await;

        assert!(first.recv().await.is_ok());
        assert!(second.recv().await.is_ok());
    }
}
