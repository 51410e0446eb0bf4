// SPDX-License-Identifier: MIT

//! Integration tests for purchase completion against a live MongoDB.
//!
//! Set MONGODB_TEST_URI to run these; they are skipped otherwise.

mod common;

use edemy_api::models::{Course, PurchaseStatus, User};

fn test_user(id: &str) -> User {
    User {
        id: id.to_string(),
        email: Some("ada@example.com".to_string()),
        name: "Ada Lovelace".to_string(),
        image_url: None,
        role: "student".to_string(),
        enrolled_courses: vec![],
        created_at: "2026-01-01T00:00:00Z".to_string(),
        updated_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

fn test_course(id: &str) -> Course {
    Course {
        id: id.to_string(),
        title: "Rust".to_string(),
        description: "Systems programming".to_string(),
        price: 100.0,
        discount: 0.0,
        thumbnail: None,
        educator_id: "edu_1".to_string(),
        is_published: true,
        enrolled_students: vec![],
        created_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

#[tokio::test]
async fn test_complete_purchase_enrolls_both_directions() {
    require_mongo!();
    let db = common::test_db("edemy-test-complete").await;

    db.upsert_user(&test_user("user_c1")).await.unwrap();
    db.insert_course(&test_course("course_c1")).await.unwrap();
    let purchase = db.create_purchase("user_c1", "course_c1", 100.0).await.unwrap();

    db.complete_purchase(&purchase.id).await.unwrap();

    let user = db.get_user("user_c1").await.unwrap().unwrap();
    assert!(user.enrolled_courses.contains(&"course_c1".to_string()));

    let course = db.get_course("course_c1").await.unwrap().unwrap();
    assert!(course.enrolled_students.contains(&"user_c1".to_string()));

    let purchase = db.get_purchase(&purchase.id).await.unwrap().unwrap();
    assert_eq!(purchase.status, PurchaseStatus::Completed);
}

#[tokio::test]
async fn test_complete_purchase_retry_does_not_double_enroll() {
    require_mongo!();
    let db = common::test_db("edemy-test-retry").await;

    db.upsert_user(&test_user("user_r1")).await.unwrap();
    db.insert_course(&test_course("course_r1")).await.unwrap();
    let purchase = db.create_purchase("user_r1", "course_r1", 100.0).await.unwrap();

    // Duplicate webhook delivery
    db.complete_purchase(&purchase.id).await.unwrap();
    db.complete_purchase(&purchase.id).await.unwrap();

    let user = db.get_user("user_r1").await.unwrap().unwrap();
    assert_eq!(
        user.enrolled_courses
            .iter()
            .filter(|c| *c == "course_r1")
            .count(),
        1
    );

    let course = db.get_course("course_r1").await.unwrap().unwrap();
    assert_eq!(
        course
            .enrolled_students
            .iter()
            .filter(|s| *s == "user_r1")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_complete_purchase_retry_repairs_partial_enrollment() {
    require_mongo!();
    let db = common::test_db("edemy-test-repair").await;

    db.upsert_user(&test_user("user_p1")).await.unwrap();
    db.insert_course(&test_course("course_p1")).await.unwrap();
    let purchase = db.create_purchase("user_p1", "course_p1", 100.0).await.unwrap();

    db.complete_purchase(&purchase.id).await.unwrap();

    // Simulate the aftermath of a partial failure: the purchase reads
    // completed but the user's enrollment write was lost.
    db.upsert_user(&test_user("user_p1")).await.unwrap();
    let user = db.get_user("user_p1").await.unwrap().unwrap();
    assert!(user.enrolled_courses.is_empty());

    // A retried delivery must re-run the enrollment updates rather than
    // short-circuit on the completed status.
    db.complete_purchase(&purchase.id).await.unwrap();

    let user = db.get_user("user_p1").await.unwrap().unwrap();
    assert!(user.enrolled_courses.contains(&"course_p1".to_string()));
}

#[tokio::test]
async fn test_complete_purchase_unknown_id() {
    require_mongo!();
    let db = common::test_db("edemy-test-unknown").await;

    let result = db.complete_purchase("missing").await;
    assert!(matches!(
        result,
        Err(edemy_api::error::AppError::NotFound(_))
    ));
}
