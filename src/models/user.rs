// SPDX-License-Identifier: MIT

//! User model, synchronized from the identity provider.

use serde::{Deserialize, Serialize};

/// User profile stored in MongoDB.
///
/// The document ID is the Clerk user ID, so webhook events can address
/// records directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Clerk user ID (also used as document ID)
    #[serde(rename = "_id")]
    pub id: String,
    /// Email address (may be None if not shared)
    pub email: Option<String>,
    /// Display name
    pub name: String,
    /// Profile picture URL
    pub image_url: Option<String>,
    /// Platform role: "student" or "educator"
    #[serde(default = "default_role")]
    pub role: String,
    /// IDs of courses the user is enrolled in
    #[serde(default)]
    pub enrolled_courses: Vec<String>,
    /// When the record was created (RFC 3339)
    pub created_at: String,
    /// When the record was last updated (RFC 3339)
    pub updated_at: String,
}

fn default_role() -> String {
    "student".to_string()
}
