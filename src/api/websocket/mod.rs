//! # WebSocket API
//!
//! WebSocket transport for real-time trade negotiation.
//!
//! Each connection belongs to one account and receives that account's trade
//! events; inbound `trade_request` / `trade_response` messages drive the same
//! use cases as the REST surface.
//!
//! # Endpoint
//!
//! - `GET /ws/v1?account={id}` - WebSocket connection endpoint
//!
//! # Usage
//!
//! ```ignore
//! use time_market::api::websocket::{WebSocketState, WsState, create_ws_router};
//! use std::sync::Arc;
//!
//! let events = Arc::new(WebSocketState::new());
//! let ws_state = Arc::new(WsState { events, propose_trade, respond_trade });
//! let ws_router = create_ws_router(ws_state);
//! ```

pub mod handlers;

pub use handlers::{
    ConnectionParams, IncomingMessage, OutgoingMessage, WebSocketConfig, WebSocketState, WsState,
    create_ws_router,
};
