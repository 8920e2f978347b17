//! # Time Market Trade Engine
//!
//! Negotiation and settlement engine for a peer-to-peer marketplace where
//! members trade time as currency. One party proposes a price and a number
//! of hours against a listing, the counterparty accepts or rejects, and on
//! mutual acceptance the hours move between wallets atomically, recorded in
//! an append-only ledger.
//!
//! ## Architecture
//!
//! This crate follows Domain-Driven Design with a layered architecture:
//!
//! - **Domain Layer** (`domain`): Core business logic, entities, value objects, and domain events
//! - **Application Layer** (`application`): Use cases, the settlement engine, and their ports
//! - **Infrastructure Layer** (`infrastructure`): In-memory adapters implementing the ports
//! - **API Layer** (`api`): REST and WebSocket interfaces
//!
//! ## Example
//!
//! ```rust,ignore
//! use time_market::application::use_cases::{ProposeTradeRequest, ProposeTradeUseCase};
//!
//! // Propose a trade against a listing
//! let trade = ProposeTradeUseCase::new(/* dependencies */)
//!     .execute(request)
//!     .await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
