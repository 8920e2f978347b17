//! # Time Market Trade Engine
//!
//! Main entry point for the time-market service.

use std::sync::Arc;

use anyhow::Context;
use time_market::api::rest::handlers::AppState;
use time_market::api::rest::routes::create_router;
use time_market::api::websocket::{WebSocketState, WsState, create_ws_router};
use time_market::application::services::SettlementEngine;
use time_market::application::use_cases::{
    CancelTradeUseCase, ProposeTradeUseCase, RespondTradeUseCase, TradeLocks,
};
use time_market::config::{AppConfig, LogFormat};
use time_market::infrastructure::persistence::in_memory::{
    InMemoryLedger, InMemoryListingDirectory, InMemoryTradeRepository,
};
use tracing::info;

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log.level.clone()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.log.include_target);

    match config.log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    config.validate().context("validating configuration")?;

    init_tracing(&config);

    info!(
        environment = %config.environment,
        "starting time-market v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Adapters
    let trade_repository = Arc::new(InMemoryTradeRepository::new());
    let listing_directory = Arc::new(InMemoryListingDirectory::new());
    let ledger = Arc::new(InMemoryLedger::new());
    let events = Arc::new(WebSocketState::new());

    // Use cases share the WebSocket hub as their notification sink, and
    // respond/cancel share one lock table so a withdrawal cannot race a
    // settlement on the same trade.
    let locks = Arc::new(TradeLocks::new());
    let propose_trade = Arc::new(ProposeTradeUseCase::new(
        trade_repository.clone(),
        listing_directory.clone(),
        events.clone(),
    ));
    let respond_trade = Arc::new(RespondTradeUseCase::new(
        trade_repository.clone(),
        listing_directory,
        events.clone(),
        SettlementEngine::new(ledger.clone()),
        locks.clone(),
    ));
    let cancel_trade = Arc::new(CancelTradeUseCase::new(
        trade_repository.clone(),
        events.clone(),
        locks,
    ));

    let rest_state = Arc::new(AppState {
        propose_trade: propose_trade.clone(),
        respond_trade: respond_trade.clone(),
        cancel_trade,
        trade_repository,
        ledger,
    });
    let ws_state = Arc::new(WsState {
        events,
        propose_trade,
        respond_trade,
    });

    let app = create_router(rest_state).nest("/ws/v1", create_ws_router(ws_state));

    let addr = config.rest.socket_addr().context("resolving bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "time-market listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down time-market");
        })
        .await
        .context("serving HTTP")?;

    Ok(())
}
