// SPDX-License-Identifier: MIT

//! Course model.

use serde::{Deserialize, Serialize};

/// Course stored in MongoDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Course ID (hex ObjectId, stored as a string)
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    /// List price in the platform currency
    pub price: f64,
    /// Discount percentage (0-100)
    #[serde(default)]
    pub discount: f64,
    /// Thumbnail URL on the asset host
    pub thumbnail: Option<String>,
    /// Clerk user ID of the educator who owns the course
    pub educator_id: String,
    /// Only published courses are visible to students
    #[serde(default)]
    pub is_published: bool,
    /// Clerk user IDs of enrolled students
    #[serde(default)]
    pub enrolled_students: Vec<String>,
    /// When the course was created (RFC 3339)
    pub created_at: String,
}

impl Course {
    /// Effective price after discount.
    pub fn discounted_price(&self) -> f64 {
        self.price - self.price * self.discount / 100.0
    }
}
