// SPDX-License-Identifier: MIT

//! MongoDB client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profiles synchronized from the identity provider)
//! - Courses (catalog and enrollment)
//! - Purchases (payment lifecycle)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Course, Purchase, PurchaseStatus, User};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ReplaceOptions;
use mongodb::{Client, Database};

/// MongoDB database client.
#[derive(Clone)]
pub struct MongoDb {
    db: Option<Database>,
}

impl MongoDb {
    /// Connect to MongoDB and verify the connection.
    ///
    /// Issues a `ping` command so an unreachable database fails startup
    /// instead of surfacing on the first request.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, AppError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        let db = client.database(db_name);

        db.run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| AppError::Database(format!("MongoDB ping failed: {}", e)))?;

        tracing::info!(database = db_name, "Connected to MongoDB");

        Ok(Self { db: Some(db) })
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { db: None }
    }

    /// Helper to get the database handle or return an error if offline.
    fn get_db(&self) -> Result<&Database, AppError> {
        self.db
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by their Clerk user ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_db()?
            .collection::<User>(collections::USERS)
            .find_one(doc! { "_id": user_id }, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.get_db()?
            .collection::<User>(collections::USERS)
            .replace_one(
                doc! { "_id": &user.id },
                user,
                ReplaceOptions::builder().upsert(true).build(),
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a user record.
    pub async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        self.get_db()?
            .collection::<User>(collections::USERS)
            .delete_one(doc! { "_id": user_id }, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Course Operations ───────────────────────────────────────

    /// Get a course by ID.
    pub async fn get_course(&self, course_id: &str) -> Result<Option<Course>, AppError> {
        self.get_db()?
            .collection::<Course>(collections::COURSES)
            .find_one(doc! { "_id": course_id }, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all published courses.
    pub async fn list_published_courses(&self) -> Result<Vec<Course>, AppError> {
        self.get_db()?
            .collection::<Course>(collections::COURSES)
            .find(doc! { "is_published": true }, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List courses owned by an educator.
    pub async fn courses_by_educator(&self, educator_id: &str) -> Result<Vec<Course>, AppError> {
        self.get_db()?
            .collection::<Course>(collections::COURSES)
            .find(doc! { "educator_id": educator_id }, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List courses by ID (for a user's enrollments).
    pub async fn courses_by_ids(&self, ids: &[String]) -> Result<Vec<Course>, AppError> {
        self.get_db()?
            .collection::<Course>(collections::COURSES)
            .find(doc! { "_id": { "$in": ids } }, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new course.
    pub async fn insert_course(&self, course: &Course) -> Result<(), AppError> {
        self.get_db()?
            .collection::<Course>(collections::COURSES)
            .insert_one(course, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Purchase Operations ─────────────────────────────────────

    /// Create a pending purchase and return its ID.
    pub async fn create_purchase(
        &self,
        user_id: &str,
        course_id: &str,
        amount: f64,
    ) -> Result<Purchase, AppError> {
        let purchase = Purchase {
            id: ObjectId::new().to_hex(),
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            amount,
            status: PurchaseStatus::Pending,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        self.get_db()?
            .collection::<Purchase>(collections::PURCHASES)
            .insert_one(&purchase, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(purchase)
    }

    /// Get a purchase by ID.
    pub async fn get_purchase(&self, purchase_id: &str) -> Result<Option<Purchase>, AppError> {
        self.get_db()?
            .collection::<Purchase>(collections::PURCHASES)
            .find_one(doc! { "_id": purchase_id }, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Complete a purchase: enroll the user in the course (both directions)
    /// and mark the purchase completed.
    ///
    /// The three updates are not atomic, so all of them run on every call
    /// and each is individually idempotent (`$addToSet`, `$set`). A retried
    /// webhook delivery after a partial failure repairs whatever is missing
    /// without double-enrolling. The status flip comes last so a completed
    /// purchase implies the enrollment writes succeeded at least once.
    pub async fn complete_purchase(&self, purchase_id: &str) -> Result<(), AppError> {
        let db = self.get_db()?;

        let purchase = self
            .get_purchase(purchase_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Purchase {} not found", purchase_id)))?;

        db.collection::<User>(collections::USERS)
            .update_one(
                doc! { "_id": &purchase.user_id },
                doc! { "$addToSet": { "enrolled_courses": &purchase.course_id } },
                None,
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        db.collection::<Course>(collections::COURSES)
            .update_one(
                doc! { "_id": &purchase.course_id },
                doc! { "$addToSet": { "enrolled_students": &purchase.user_id } },
                None,
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        db.collection::<Purchase>(collections::PURCHASES)
            .update_one(
                doc! { "_id": purchase_id },
                doc! { "$set": { "status": "completed" } },
                None,
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            purchase_id,
            user_id = %purchase.user_id,
            course_id = %purchase.course_id,
            "Purchase completed, user enrolled"
        );

        Ok(())
    }

    /// Mark a purchase as failed.
    pub async fn fail_purchase(&self, purchase_id: &str) -> Result<(), AppError> {
        self.get_db()?
            .collection::<Purchase>(collections::PURCHASES)
            .update_one(
                doc! { "_id": purchase_id },
                doc! { "$set": { "status": "failed" } },
                None,
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
