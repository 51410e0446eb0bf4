// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; handlers only ever see the cached
//! `Config` inside `AppState`.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// MongoDB connection string
    pub mongodb_uri: String,
    /// MongoDB database name
    pub mongodb_db: String,
    /// Cloudinary cloud name (public)
    pub cloudinary_cloud_name: String,
    /// Origins allowed to make credentialed cross-origin requests
    pub allowed_origins: Vec<String>,
    /// Server port
    pub port: u16,

    // --- Secrets ---
    /// Cloudinary API key
    pub cloudinary_api_key: String,
    /// Cloudinary API secret (used to sign upload requests)
    pub cloudinary_api_secret: String,
    /// Clerk webhook signing secret (`whsec_` + base64 key material)
    pub clerk_webhook_secret: String,
    /// PEM-encoded RS256 public key for Clerk session JWTs
    pub clerk_jwt_public_key: String,
    /// Stripe webhook signing secret
    pub stripe_webhook_secret: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file first if one is present (local development).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            mongodb_uri: env::var("MONGODB_URI").map_err(|_| ConfigError::Missing("MONGODB_URI"))?,
            mongodb_db: env::var("MONGODB_DB").unwrap_or_else(|_| "edemy".to_string()),
            cloudinary_cloud_name: env::var("CLOUDINARY_CLOUD_NAME")
                .map_err(|_| ConfigError::Missing("CLOUDINARY_CLOUD_NAME"))?,
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| {
                    "http://localhost:5173,https://edemyfrontend.vercel.app".to_string()
                })
                .split(',')
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),

            cloudinary_api_key: env::var("CLOUDINARY_API_KEY")
                .map_err(|_| ConfigError::Missing("CLOUDINARY_API_KEY"))?,
            cloudinary_api_secret: env::var("CLOUDINARY_API_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("CLOUDINARY_API_SECRET"))?,
            clerk_webhook_secret: env::var("CLERK_WEBHOOK_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("CLERK_WEBHOOK_SECRET"))?,
            clerk_jwt_public_key: env::var("CLERK_JWT_PUBLIC_KEY")
                .map_err(|_| ConfigError::Missing("CLERK_JWT_PUBLIC_KEY"))?,
            stripe_webhook_secret: env::var("STRIPE_WEBHOOK_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRIPE_WEBHOOK_SECRET"))?,
        })
    }

    /// Default config for tests only.
    pub fn test_default() -> Self {
        Self {
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            mongodb_db: "edemy-test".to_string(),
            cloudinary_cloud_name: "test-cloud".to_string(),
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "https://edemyfrontend.vercel.app".to_string(),
            ],
            port: 5000,
            cloudinary_api_key: "test_api_key".to_string(),
            cloudinary_api_secret: "test_api_secret".to_string(),
            // base64 of "test_clerk_secret"
            clerk_webhook_secret: "whsec_dGVzdF9jbGVya19zZWNyZXQ=".to_string(),
            clerk_jwt_public_key: "-----BEGIN PUBLIC KEY-----\ninvalid\n-----END PUBLIC KEY-----"
                .to_string(),
            stripe_webhook_secret: "whsec_test_stripe_secret".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
