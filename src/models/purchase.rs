// SPDX-License-Identifier: MIT

//! Purchase records, completed or failed by the payment webhook.

use serde::{Deserialize, Serialize};

/// Lifecycle of a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Pending,
    Completed,
    Failed,
}

/// A course purchase stored in MongoDB.
///
/// Created as `Pending` when the user starts checkout; the Stripe webhook
/// moves it to `Completed` (and enrolls the user) or `Failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    /// Purchase ID (hex ObjectId, stored as a string; carried in Stripe
    /// checkout metadata)
    #[serde(rename = "_id")]
    pub id: String,
    /// Clerk user ID of the buyer
    pub user_id: String,
    /// Course being purchased
    pub course_id: String,
    /// Amount charged
    pub amount: f64,
    pub status: PurchaseStatus,
    /// When the purchase was created (RFC 3339)
    pub created_at: String,
}
