// SPDX-License-Identifier: MIT

//! Origin allow-list enforcement.
//!
//! `CorsLayer` answers preflights and sets response headers, but it does not
//! reject a request whose origin is outside the allow-list; this middleware
//! does, before any router runs. Requests without an `Origin` header
//! (curl, mobile apps, server-to-server) pass through.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Reject requests whose declared origin is not in the allow-list.
pub async fn enforce_allowed_origins(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(origin) = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
    {
        if !state.config.allowed_origins.iter().any(|o| o == origin) {
            tracing::warn!(origin, "Request from disallowed origin rejected");
            return Err(AppError::OriginNotAllowed);
        }
    }

    Ok(next.run(request).await)
}
