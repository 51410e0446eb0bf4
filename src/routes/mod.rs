// SPDX-License-Identifier: MIT

//! HTTP route handlers.

pub mod course;
pub mod educator;
pub mod user;
pub mod webhooks;

use crate::middleware::{attach_identity, enforce_allowed_origins};
use crate::AppState;
use axum::http::{header, HeaderValue, Method};
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Liveness check.
async fn liveness() -> &'static str {
    "API Working"
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - answers preflights for all paths and sets response
    // headers for allow-listed origins. Rejection of disallowed origins is
    // done by `enforce_allowed_origins` below.
    let allowed_origins = state.config.allowed_origins.clone();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                allowed_origins.iter().any(|o| o == origin_str)
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    Router::new()
        .route("/", get(liveness))
        .merge(webhooks::routes())
        .nest("/api/educator", educator::routes())
        .nest("/api/course", course::routes())
        .nest("/api/user", user::routes())
        .layer(middleware::from_fn_with_state(state.clone(), attach_identity))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            enforce_allowed_origins,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
