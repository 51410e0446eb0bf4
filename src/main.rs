// SPDX-License-Identifier: MIT

//! Edemy API Server
//!
//! Backend for the Edemy learning-management platform: course catalog,
//! educator tools, user enrollment, and identity/payment webhooks.

use edemy_api::{config::Config, db::MongoDb, services::CloudinaryService, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Edemy API");

    // Connect to MongoDB; startup is fatal if the database is unreachable
    let db = MongoDb::connect(&config.mongodb_uri, &config.mongodb_db)
        .await
        .expect("Failed to connect to MongoDB");

    // Configure the asset host and verify credentials
    let assets = CloudinaryService::new(
        &config.cloudinary_cloud_name,
        &config.cloudinary_api_key,
        &config.cloudinary_api_secret,
    );
    assets
        .verify_credentials()
        .await
        .expect("Failed to verify Cloudinary credentials");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        assets,
    });

    // Build router
    let app = edemy_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("edemy_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
