// SPDX-License-Identifier: MIT

use edemy_api::config::Config;
use edemy_api::db::MongoDb;
use edemy_api::routes::create_router;
use edemy_api::services::CloudinaryService;
use edemy_api::AppState;
use std::sync::Arc;

/// Check if a live test database is available via environment variable.
#[allow(dead_code)]
pub fn mongo_available() -> bool {
    std::env::var("MONGODB_TEST_URI").is_ok()
}

/// Skip test with message if no test database is available.
#[macro_export]
macro_rules! require_mongo {
    () => {
        if !crate::common::mongo_available() {
            eprintln!("Skipping: MONGODB_TEST_URI not set");
            return;
        }
    };
}

/// Connect to the live test database.
#[allow(dead_code)]
pub async fn test_db(db_name: &str) -> MongoDb {
    let uri = std::env::var("MONGODB_TEST_URI").expect("MONGODB_TEST_URI not set");
    MongoDb::connect(&uri, db_name)
        .await
        .expect("Failed to connect to test MongoDB")
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = MongoDb::new_mock();
    let assets = CloudinaryService::new(
        &config.cloudinary_cloud_name,
        &config.cloudinary_api_key,
        &config.cloudinary_api_secret,
    );

    let state = Arc::new(AppState { config, db, assets });

    (create_router(state.clone()), state)
}
