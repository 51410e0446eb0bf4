// SPDX-License-Identifier: MIT

//! Public course catalog routes.

use crate::error::{AppError, Result};
use crate::models::Course;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

/// Course routes, mounted under /api/course.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/all", get(list_courses))
        .route("/{id}", get(get_course))
}

/// List all published courses.
async fn list_courses(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Course>>> {
    let courses = state.db.list_published_courses().await?;
    Ok(Json(courses))
}

/// Get a single published course by ID.
async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Course>> {
    let course = state
        .db
        .get_course(&id)
        .await?
        .filter(|c| c.is_published)
        .ok_or_else(|| AppError::NotFound(format!("Course {} not found", id)))?;

    Ok(Json(course))
}
