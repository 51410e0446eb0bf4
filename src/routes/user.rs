// SPDX-License-Identifier: MIT

//! Routes for authenticated students.

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Course, Purchase};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// User routes, mounted under /api/user.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/data", get(get_data))
        .route("/enrolled-courses", get(enrolled_courses))
        .route("/purchase", post(purchase_course))
}

/// Get the current user's profile.
async fn get_data(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<crate::models::User>> {
    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    Ok(Json(profile))
}

/// List the courses the current user is enrolled in.
async fn enrolled_courses(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<Course>>> {
    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    let courses = state.db.courses_by_ids(&profile.enrolled_courses).await?;
    Ok(Json(courses))
}

/// Request body for starting a purchase.
#[derive(Deserialize)]
struct PurchaseRequest {
    course_id: String,
}

/// Create a pending purchase for a course.
///
/// The purchase ID is carried in the checkout metadata and resolved by the
/// Stripe webhook when payment completes.
async fn purchase_course(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<PurchaseRequest>,
) -> Result<Json<Purchase>> {
    let course = state
        .db
        .get_course(&req.course_id)
        .await?
        .filter(|c| c.is_published)
        .ok_or_else(|| AppError::NotFound(format!("Course {} not found", req.course_id)))?;

    if course.enrolled_students.contains(&user.user_id) {
        return Err(AppError::BadRequest("Already enrolled".to_string()));
    }

    let purchase = state
        .db
        .create_purchase(&user.user_id, &course.id, course.discounted_price())
        .await?;

    tracing::info!(
        purchase_id = %purchase.id,
        course_id = %course.id,
        user_id = %user.user_id,
        "Purchase created"
    );

    Ok(Json(purchase))
}
