// SPDX-License-Identifier: MIT

//! Routes for educators (course authoring).

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Course, User};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Educator routes, mounted under /api/educator.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/update-role", post(update_role))
        .route("/courses", get(my_courses))
        .route("/add-course", post(add_course))
}

#[derive(Serialize)]
struct UpdateRoleResponse {
    role: String,
}

/// Promote the current user to educator.
async fn update_role(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<UpdateRoleResponse>> {
    let mut profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    profile.role = "educator".to_string();
    profile.updated_at = chrono::Utc::now().to_rfc3339();
    state.db.upsert_user(&profile).await?;

    tracing::info!(user_id = %user.user_id, "User promoted to educator");

    Ok(Json(UpdateRoleResponse {
        role: profile.role,
    }))
}

/// List courses owned by the current educator.
async fn my_courses(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<Course>>> {
    require_educator(&state, &user).await?;

    let courses = state.db.courses_by_educator(&user.user_id).await?;
    Ok(Json(courses))
}

/// Request body for creating a course.
#[derive(Deserialize)]
struct NewCourseRequest {
    title: String,
    description: String,
    price: f64,
    #[serde(default)]
    discount: f64,
    /// Base64-encoded thumbnail image, uploaded to the asset host
    #[serde(default)]
    thumbnail_data: Option<String>,
    #[serde(default)]
    is_published: bool,
}

/// Create a new course, uploading its thumbnail to the asset host.
async fn add_course(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<NewCourseRequest>,
) -> Result<Json<Course>> {
    require_educator(&state, &user).await?;

    if req.price < 0.0 || !(0.0..=100.0).contains(&req.discount) {
        return Err(AppError::BadRequest(
            "Price must be non-negative and discount between 0 and 100".to_string(),
        ));
    }

    let thumbnail = match &req.thumbnail_data {
        Some(data) => {
            let bytes = STANDARD
                .decode(data)
                .map_err(|_| AppError::BadRequest("Invalid thumbnail encoding".to_string()))?;
            Some(state.assets.upload_image(&bytes, "courses").await?)
        }
        None => None,
    };

    let course = Course {
        id: ObjectId::new().to_hex(),
        title: req.title,
        description: req.description,
        price: req.price,
        discount: req.discount,
        thumbnail,
        educator_id: user.user_id.clone(),
        is_published: req.is_published,
        enrolled_students: vec![],
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    state.db.insert_course(&course).await?;
    tracing::info!(course_id = %course.id, educator_id = %user.user_id, "Course created");

    Ok(Json(course))
}

/// Authorization check: the user record must carry the educator role.
async fn require_educator(state: &AppState, user: &AuthUser) -> Result<User> {
    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if profile.role != "educator" {
        return Err(AppError::Unauthorized);
    }

    Ok(profile)
}
