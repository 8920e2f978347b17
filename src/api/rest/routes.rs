//! # REST Routes
//!
//! Route definitions for the REST API.
//!
//! # Route Structure
//!
//! ```text
//! /api/v1
//! ├── /health                   GET  - Health check
//! ├── /trades                   POST - Propose a trade
//! │   └── /{id}                 GET  - Get trade by ID
//! │       │                     DELETE - Withdraw a pending trade
//! │       └── /response         POST - Accept or reject a trade
//! └── /accounts
//!     └── /{id}
//!         ├── /trades           GET  - List an account's trades
//!         ├── /balance          GET  - Wallet balance
//!         └── /ledger           GET  - Wallet transaction history
//! ```
//!
//! # Examples
//!
//! ```ignore
//! use time_market::api::rest::routes::create_router;
//! use time_market::api::rest::handlers::AppState;
//!
//! let state = Arc::new(AppState { /* ... */ });
//! let router = create_router(state);
//! axum::serve(listener, router).await?;
//! ```

use crate::api::rest::handlers::{
    AppState, cancel_trade, get_balance, get_ledger, get_trade, health_check,
    list_account_trades, propose_trade, respond_trade,
};
use axum::{Router, routing::get, routing::post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

fn api_v1_router() -> Router<Arc<AppState>> {
    let trade_routes = Router::new()
        .route("/", post(propose_trade))
        .route("/{id}", get(get_trade).delete(cancel_trade))
        .route("/{id}/response", post(respond_trade));

    let account_routes = Router::new()
        .route("/{id}/trades", get(list_account_trades))
        .route("/{id}/balance", get(get_balance))
        .route("/{id}/ledger", get(get_ledger));

    Router::new()
        .route("/health", get(health_check))
        .nest("/trades", trade_routes)
        .nest("/accounts", account_routes)
}

/// Creates the REST API router with all endpoints and middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/v1", api_v1_router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Creates a minimal router for testing without middleware.
#[cfg(test)]
pub fn create_test_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/v1", api_v1_router())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::settlement::SettlementEngine;
    use crate::application::use_cases::cancel_trade::CancelTradeUseCase;
    use crate::application::use_cases::propose_trade::{NotificationSink, ProposeTradeUseCase};
    use crate::application::use_cases::respond_trade::{RespondTradeUseCase, TradeLocks};
    use crate::domain::entities::listing::Listing;
    use crate::domain::events::TradeEvent;
    use crate::domain::value_objects::{AccountId, Hours, ListingId, ListingKind};
    use crate::infrastructure::persistence::in_memory::{
        InMemoryLedger, InMemoryListingDirectory, InMemoryTradeRepository,
    };
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[derive(Debug, Default)]
    struct SilentSink;

    #[async_trait]
    impl NotificationSink for SilentSink {
        async fn notify(&self, _recipient: &AccountId, _event: &TradeEvent) -> Result<(), String> {
            Ok(())
        }
    }

    struct Harness {
        router: Router,
        listing_id: ListingId,
        ledger: Arc<InMemoryLedger>,
    }

    async fn harness() -> Harness {
        let repo = Arc::new(InMemoryTradeRepository::new());
        let directory = Arc::new(InMemoryListingDirectory::new());
        let ledger = Arc::new(InMemoryLedger::new());
        let sink = Arc::new(SilentSink);

        let listing = Listing::new(
            ListingId::new_v4(),
            AccountId::new("bob"),
            ListingKind::Offer,
            "gardening",
        );
        let listing_id = listing.id();
        directory.insert(listing).await;

        let locks = Arc::new(TradeLocks::new());
        let state = Arc::new(AppState {
            propose_trade: Arc::new(ProposeTradeUseCase::new(
                repo.clone(),
                directory.clone(),
                sink.clone(),
            )),
            respond_trade: Arc::new(RespondTradeUseCase::new(
                repo.clone(),
                directory,
                sink.clone(),
                SettlementEngine::new(ledger.clone()),
                locks.clone(),
            )),
            cancel_trade: Arc::new(CancelTradeUseCase::new(repo.clone(), sink, locks)),
            trade_repository: repo,
            ledger: ledger.clone(),
        });

        Harness {
            router: create_test_router(state),
            listing_id,
            ledger,
        }
    }

    fn propose_request(listing_id: ListingId, proposer: &str) -> Request<Body> {
        let body = serde_json::json!({
            "listing_id": listing_id.to_string(),
            "proposer": proposer,
            "amount": 100.0,
            "hours": 2.5
        });
        Request::builder()
            .method("POST")
            .uri("/api/v1/trades")
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    fn respond_request(trade_id: &str, responder: &str, decision: &str) -> Request<Body> {
        let body = serde_json::json!({
            "responder": responder,
            "decision": decision
        });
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/trades/{trade_id}/response"))
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_check_endpoint() {
        let h = harness().await;

        let response = h
            .router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn propose_trade_returns_created() {
        let h = harness().await;

        let response = h
            .router
            .oneshot(propose_request(h.listing_id, "alice"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["status"], "PENDING");
        assert_eq!(body["proposer"], "alice");
        assert_eq!(body["counterparty"], "bob");
    }

    #[tokio::test]
    async fn propose_on_missing_listing_is_404() {
        let h = harness().await;

        let response = h
            .router
            .oneshot(propose_request(ListingId::new_v4(), "alice"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn propose_on_own_listing_is_forbidden() {
        let h = harness().await;

        let response = h
            .router
            .oneshot(propose_request(h.listing_id, "bob"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn full_negotiation_over_rest_completes() {
        let h = harness().await;
        h.ledger
            .seed_balance(AccountId::new("alice"), Hours::new(5.0).unwrap())
            .await;

        let proposed = h
            .router
            .clone()
            .oneshot(propose_request(h.listing_id, "alice"))
            .await
            .unwrap();
        let trade_id = json_body(proposed).await["id"].as_str().unwrap().to_string();

        let first = h
            .router
            .clone()
            .oneshot(respond_request(&trade_id, "alice", "accept"))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let body = json_body(first).await;
        assert_eq!(body["status"], "PENDING");
        assert_eq!(body["settled"], false);

        let second = h
            .router
            .clone()
            .oneshot(respond_request(&trade_id, "bob", "accept"))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::OK);
        let body = json_body(second).await;
        assert_eq!(body["status"], "COMPLETED");
        assert_eq!(body["settled"], true);

        // Settlement moved the hours into the listing owner's wallet.
        let balance = h
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/accounts/bob/balance")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = json_body(balance).await;
        assert_eq!(body["balance"], "2.5");

        let ledger = h
            .router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/accounts/bob/ledger")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = json_body(ledger).await;
        assert_eq!(body["entries"].as_array().unwrap().len(), 1);
        assert_eq!(body["entries"][0]["direction"], "CREDIT");
    }

    #[tokio::test]
    async fn accept_without_funds_is_unprocessable() {
        let h = harness().await;

        let proposed = h
            .router
            .clone()
            .oneshot(propose_request(h.listing_id, "alice"))
            .await
            .unwrap();
        let trade_id = json_body(proposed).await["id"].as_str().unwrap().to_string();

        h.router
            .clone()
            .oneshot(respond_request(&trade_id, "alice", "accept"))
            .await
            .unwrap();
        let response = h
            .router
            .clone()
            .oneshot(respond_request(&trade_id, "bob", "accept"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["code"], "FUNDS_INSUFFICIENT");

        // The rejection is persisted on the trade.
        let stored = h
            .router
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/trades/{trade_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = json_body(stored).await;
        assert_eq!(body["status"], "REJECTED");
    }

    #[tokio::test]
    async fn respond_after_reject_is_conflict() {
        let h = harness().await;

        let proposed = h
            .router
            .clone()
            .oneshot(propose_request(h.listing_id, "alice"))
            .await
            .unwrap();
        let trade_id = json_body(proposed).await["id"].as_str().unwrap().to_string();

        h.router
            .clone()
            .oneshot(respond_request(&trade_id, "bob", "reject"))
            .await
            .unwrap();
        let response = h
            .router
            .oneshot(respond_request(&trade_id, "alice", "accept"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    fn cancel_request(trade_id: &str, caller: &str) -> Request<Body> {
        let body = serde_json::json!({ "caller": caller });
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/trades/{trade_id}"))
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn proposer_withdraws_pending_trade() {
        let h = harness().await;

        let proposed = h
            .router
            .clone()
            .oneshot(propose_request(h.listing_id, "alice"))
            .await
            .unwrap();
        let trade_id = json_body(proposed).await["id"].as_str().unwrap().to_string();

        let response = h
            .router
            .clone()
            .oneshot(cancel_request(&trade_id, "alice"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "CANCELLED");

        // Responding to a withdrawn trade conflicts.
        let late = h
            .router
            .oneshot(respond_request(&trade_id, "bob", "accept"))
            .await
            .unwrap();
        assert_eq!(late.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn counterparty_cannot_withdraw() {
        let h = harness().await;

        let proposed = h
            .router
            .clone()
            .oneshot(propose_request(h.listing_id, "alice"))
            .await
            .unwrap();
        let trade_id = json_body(proposed).await["id"].as_str().unwrap().to_string();

        let response = h
            .router
            .oneshot(cancel_request(&trade_id, "bob"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn get_unknown_trade_is_404() {
        let h = harness().await;

        let response = h
            .router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/trades/550e8400-e29b-41d4-a716-446655440000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_account_balance_is_zero() {
        let h = harness().await;

        let response = h
            .router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/accounts/nobody/balance")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["balance"], "0");
    }

    #[tokio::test]
    async fn account_trades_listed_for_both_roles() {
        let h = harness().await;

        h.router
            .clone()
            .oneshot(propose_request(h.listing_id, "alice"))
            .await
            .unwrap();
        h.router
            .clone()
            .oneshot(propose_request(h.listing_id, "carol"))
            .await
            .unwrap();

        let response = h
            .router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/accounts/bob/trades")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }
}
