//! # API Layer
//!
//! External interfaces for the time-market trade engine.
//!
//! ## Transports
//!
//! - **REST**: trade proposal/response, trade and wallet queries
//! - **WebSocket**: per-account event stream plus message-driven negotiation
//!
//! Both transports are thin adapters over the same application use cases;
//! settlement logic exists exactly once.

pub mod rest;
pub mod websocket;

pub use rest as rest_api;
pub use websocket as ws_api;
