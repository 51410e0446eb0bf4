// SPDX-License-Identifier: MIT

//! Webhook routes for identity-provider (Clerk) and payment (Stripe)
//! events.
//!
//! Both handlers take the raw request body: the signatures are computed
//! over the exact bytes on the wire, so parsing before verification would
//! invalidate the check. JSON parsing happens only after a signature is
//! accepted.

use crate::error::AppError;
use crate::models::User;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::collections::HashMap;
use std::sync::Arc;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Reject webhooks whose signed timestamp is older (or newer) than this,
/// limiting the replay window.
const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

/// Webhook routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/clerk", post(clerk_webhook))
        .route("/stripe", post(stripe_webhook))
}

// ─── Clerk (identity provider) ───────────────────────────────────

/// Clerk webhook event envelope.
#[derive(Deserialize, Debug)]
struct ClerkEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: ClerkUserData,
}

/// User payload inside a Clerk event.
#[derive(Deserialize, Debug)]
struct ClerkUserData {
    id: String,
    #[serde(default)]
    email_addresses: Vec<ClerkEmailAddress>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ClerkEmailAddress {
    email_address: String,
}

/// Handle Clerk user lifecycle events (POST /clerk).
async fn clerk_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    verify_clerk_signature(&state.config.clerk_webhook_secret, &headers, &body)?;

    let event: ClerkEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Malformed webhook payload: {}", e)))?;

    tracing::info!(
        event_type = %event.event_type,
        user_id = %event.data.id,
        "Clerk webhook event received"
    );

    match event.event_type.as_str() {
        "user.created" | "user.updated" => {
            let now = chrono::Utc::now().to_rfc3339();

            // Preserve enrollments and creation time across profile updates
            let existing = state.db.get_user(&event.data.id).await?;
            let (enrolled_courses, role, created_at) = match existing {
                Some(u) => (u.enrolled_courses, u.role, u.created_at),
                None => (Vec::new(), "student".to_string(), now.clone()),
            };

            let name = format!(
                "{} {}",
                event.data.first_name.as_deref().unwrap_or(""),
                event.data.last_name.as_deref().unwrap_or("")
            )
            .trim()
            .to_string();

            let user = User {
                id: event.data.id,
                email: event
                    .data
                    .email_addresses
                    .first()
                    .map(|e| e.email_address.clone()),
                name,
                image_url: event.data.image_url,
                role,
                enrolled_courses,
                created_at,
                updated_at: now,
            };

            state.db.upsert_user(&user).await?;
            tracing::info!(user_id = %user.id, "User synchronized");
        }
        "user.deleted" => {
            state.db.delete_user(&event.data.id).await?;
            tracing::info!(user_id = %event.data.id, "User deleted");
        }
        _ => {
            tracing::debug!(
                event_type = %event.event_type,
                "Ignoring unhandled Clerk event type"
            );
        }
    }

    Ok(StatusCode::OK)
}

/// Verify a Svix-format Clerk webhook signature.
///
/// The signed content is `{svix-id}.{svix-timestamp}.{raw body}`, keyed by
/// the base64 portion of the `whsec_` secret. The signature header may
/// carry several space-separated `v1,<base64>` entries; any match accepts.
fn verify_clerk_signature(
    secret: &str,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), AppError> {
    let msg_id = header_str(headers, "svix-id")?;
    let timestamp = header_str(headers, "svix-timestamp")?;
    let signatures = header_str(headers, "svix-signature")?;

    check_timestamp_tolerance(timestamp)?;

    let key = STANDARD
        .decode(secret.strip_prefix("whsec_").unwrap_or(secret))
        .map_err(|_| AppError::InvalidSignature)?;

    let mut mac = HmacSha256::new_from_slice(&key).map_err(|_| AppError::InvalidSignature)?;
    mac.update(msg_id.as_bytes());
    mac.update(b".");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);
    let expected = mac.finalize().into_bytes();

    for entry in signatures.split(' ') {
        let Some(sig_b64) = entry.strip_prefix("v1,") else {
            continue;
        };
        let Ok(candidate) = STANDARD.decode(sig_b64) else {
            continue;
        };
        if expected.as_slice().ct_eq(&candidate).into() {
            return Ok(());
        }
    }

    tracing::warn!("Clerk webhook signature mismatch");
    Err(AppError::InvalidSignature)
}

// ─── Stripe (payment provider) ───────────────────────────────────

/// Stripe webhook event envelope.
#[derive(Deserialize, Debug)]
struct StripeEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: StripeEventData,
}

#[derive(Deserialize, Debug)]
struct StripeEventData {
    object: StripeObject,
}

/// The object inside a Stripe event; only metadata is needed here.
#[derive(Deserialize, Debug)]
struct StripeObject {
    #[serde(default)]
    metadata: HashMap<String, String>,
}

/// Handle Stripe payment events (POST /stripe).
async fn stripe_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let signature_header = header_str(&headers, "stripe-signature")?;
    verify_stripe_signature(&state.config.stripe_webhook_secret, signature_header, &body)?;

    let event: StripeEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Malformed webhook payload: {}", e)))?;

    tracing::info!(event_type = %event.event_type, "Stripe webhook event received");

    match event.event_type.as_str() {
        "checkout.session.completed" => {
            let purchase_id = event
                .data
                .object
                .metadata
                .get("purchase_id")
                .ok_or_else(|| {
                    AppError::BadRequest("Missing purchase_id in session metadata".to_string())
                })?;

            state.db.complete_purchase(purchase_id).await?;
        }
        "payment_intent.payment_failed" => {
            if let Some(purchase_id) = event.data.object.metadata.get("purchase_id") {
                state.db.fail_purchase(purchase_id).await?;
                tracing::info!(purchase_id = %purchase_id, "Purchase marked failed");
            } else {
                tracing::warn!("Payment failure event without purchase_id metadata");
            }
        }
        _ => {
            tracing::debug!(
                event_type = %event.event_type,
                "Ignoring unhandled Stripe event type"
            );
        }
    }

    Ok(StatusCode::OK)
}

/// Verify a `Stripe-Signature` header against the raw request body.
///
/// Header format is `t=<unix>,v1=<hex>[,v1=<hex>...]`; the signed payload
/// is `{t}.{raw body}` keyed by the endpoint secret. Any matching `v1`
/// entry accepts.
fn verify_stripe_signature(
    secret: &str,
    signature_header: &str,
    body: &[u8],
) -> Result<(), AppError> {
    let mut timestamp: Option<&str> = None;
    let mut candidates: Vec<&str> = Vec::new();

    for part in signature_header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => candidates.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(AppError::InvalidSignature)?;
    if candidates.is_empty() {
        return Err(AppError::InvalidSignature);
    }

    check_timestamp_tolerance(timestamp)?;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| AppError::InvalidSignature)?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);
    let expected = hex::encode(mac.finalize().into_bytes());

    for candidate in candidates {
        if expected.as_bytes().ct_eq(candidate.as_bytes()).into() {
            return Ok(());
        }
    }

    tracing::warn!("Stripe webhook signature mismatch");
    Err(AppError::InvalidSignature)
}

// ─── Shared helpers ──────────────────────────────────────────────

/// Get a required header as a &str.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, AppError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest(format!("Missing {} header", name)))
}

/// Reject timestamps outside the replay-protection window.
fn check_timestamp_tolerance(timestamp: &str) -> Result<(), AppError> {
    let ts: i64 = timestamp
        .parse()
        .map_err(|_| AppError::InvalidSignature)?;
    let now = chrono::Utc::now().timestamp();

    if (now - ts).abs() > TIMESTAMP_TOLERANCE_SECS {
        tracing::warn!(timestamp = ts, "Webhook timestamp outside tolerance");
        return Err(AppError::InvalidSignature);
    }
    Ok(())
}
