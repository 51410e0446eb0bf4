// SPDX-License-Identifier: MIT

//! Clerk session authentication middleware.
//!
//! Runs on every request but never fails it: a valid session JWT attaches
//! an [`Identity`] extension, anything else proceeds anonymously.
//! Authorization decisions belong to individual handlers via [`AuthUser`].

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session JWT claims issued by the identity provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (Clerk user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Verified identity attached to a request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
}

/// Middleware that attaches an identity when a valid session token is
/// present, and proceeds anonymously otherwise.
pub async fn attach_identity(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token(&jar, request.headers()) {
        match verify_session_token(&token, &state.config.clerk_jwt_public_key) {
            Ok(identity) => {
                request.extensions_mut().insert(identity);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Session token rejected, continuing anonymously");
            }
        }
    }

    next.run(request).await
}

/// Pull the session token from the `__session` cookie or the
/// `Authorization: Bearer` header.
fn extract_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get("__session") {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

/// Verify an RS256 session JWT against the identity provider's public key.
fn verify_session_token(token: &str, public_key_pem: &str) -> anyhow::Result<Identity> {
    let key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())?;
    let validation = Validation::new(Algorithm::RS256);

    let token_data = decode::<Claims>(token, &key, &validation)?;

    Ok(Identity {
        user_id: token_data.claims.sub,
    })
}

/// Extractor for handlers that require an authenticated user.
///
/// Returns 401 when the request carries no verified identity.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .map(|identity| AuthUser {
                user_id: identity.user_id.clone(),
            })
            .ok_or(AppError::Unauthorized)
    }
}
