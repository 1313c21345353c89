// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ErrorBody,
    models::{
        ChangePasswordRequest, CreateWalletRequest, CreateWalletResponse, DeleteWalletRequest,
        RequestCodeRequest, SaveWalletRequest, StatusResponse, UpdateWalletResponse,
        WalletResponse,
    },
    rate_limit,
    state::AppState,
};

pub mod health;
pub mod tokens;
pub mod wallet;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/request_code", post(tokens::request_code))
        .route("/create_wallet", post(wallet::create_wallet))
        .route("/fetch_wallet", get(wallet::fetch_wallet))
        .route("/save_wallet", post(wallet::save_wallet))
        .route("/change_password", post(wallet::change_password))
        .route("/delete_wallet", post(wallet::delete_wallet))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::limit_requests,
        ))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        tokens::request_code,
        wallet::create_wallet,
        wallet::fetch_wallet,
        wallet::save_wallet,
        wallet::change_password,
        wallet::delete_wallet,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            RequestCodeRequest,
            CreateWalletRequest,
            CreateWalletResponse,
            SaveWalletRequest,
            ChangePasswordRequest,
            DeleteWalletRequest,
            UpdateWalletResponse,
            WalletResponse,
            StatusResponse,
            ErrorBody,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Tokens", description = "Email tokens for wallet creation"),
        (name = "Wallet", description = "Signed encrypted wallet storage"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::Arc;

    use axum::{
        body::Body,
        extract::ConnectInfo,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::rate_limit::RateLimiter;
    use crate::state::test_support::test_state;

    fn request_code(peer: Option<SocketAddr>) -> Request<Body> {
        let mut request = Request::builder()
            .method("POST")
            .uri("/v1/request_code")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"email":"alice@example.com"}"#))
            .unwrap();
        if let Some(peer) = peer {
            request.extensions_mut().insert(ConnectInfo(peer));
        }
        request
    }

    #[tokio::test]
    async fn serves_health_and_wallet_routes() {
        let (state, _dir) = test_state();
        let app = router(state);

        let response = app
            .clone()
            .oneshot(Request::get("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let response = app.clone().oneshot(request_code(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::get("/v1/fetch_wallet?public_key=GPHbogus")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rate_limits_per_peer() {
        let (mut state, _dir) = test_state();
        state.limiter = Arc::new(RateLimiter::per_hour(1));
        let app = router(state);
        let peer: SocketAddr = "10.0.0.1:4000".parse().unwrap();

        let response = app.clone().oneshot(request_code(Some(peer))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.clone().oneshot(request_code(Some(peer))).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        // Health probes are never limited.
        let mut probe = Request::get("/health/live").body(Body::empty()).unwrap();
        probe.extensions_mut().insert(ConnectInfo(peer));
        let response = app.oneshot(probe).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn openapi_lists_wallet_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/v1/create_wallet", "/v1/fetch_wallet", "/v1/change_password"] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
    }
}
