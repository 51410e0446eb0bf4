// SPDX-License-Identifier: MIT

//! Cloudinary asset-host client.
//!
//! Handles:
//! - Credential verification at startup (ping)
//! - Signed image uploads (SHA-256 request signatures)

use crate::error::AppError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use sha2::{Digest, Sha256};

/// Cloudinary API client.
#[derive(Clone)]
pub struct CloudinaryService {
    http: reqwest::Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

/// Response from an image upload.
#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl CloudinaryService {
    /// Create a new client. Does not touch the network; call
    /// `verify_credentials` at startup to fail fast on bad configuration.
    pub fn new(cloud_name: &str, api_key: &str, api_secret: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://api.cloudinary.com/v1_1".to_string(),
            cloud_name: cloud_name.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        }
    }

    /// Verify the configured credentials against the admin API.
    ///
    /// Called once at startup; failure aborts the server.
    pub async fn verify_credentials(&self) -> Result<(), AppError> {
        let url = format!("{}/{}/ping", self.base_url, self.cloud_name);

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .send()
            .await
            .map_err(|e| AppError::AssetHost(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::AssetHost(format!(
                "Cloudinary ping failed: {}",
                response.status()
            )));
        }

        tracing::info!(cloud = %self.cloud_name, "Cloudinary credentials verified");
        Ok(())
    }

    /// Upload an image and return its hosted URL.
    ///
    /// The image is sent as a base64 data URI with a signed request;
    /// Cloudinary verifies the signature over the sorted parameters.
    pub async fn upload_image(&self, data: &[u8], folder: &str) -> Result<String, AppError> {
        let url = format!("{}/{}/image/upload", self.base_url, self.cloud_name);
        let timestamp = chrono::Utc::now().timestamp().to_string();

        // Sorted alphabetically; `file` and `api_key` are excluded from signing
        let signed_params = [
            ("folder", folder),
            ("signature_algorithm", "sha256"),
            ("timestamp", &timestamp),
        ];
        let signature = sign_params(&signed_params, &self.api_secret);

        let file = format!("data:image/png;base64,{}", STANDARD.encode(data));
        let form = [
            ("file", file.as_str()),
            ("api_key", self.api_key.as_str()),
            ("folder", folder),
            ("signature_algorithm", "sha256"),
            ("timestamp", &timestamp),
            ("signature", &signature),
        ];

        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::AssetHost(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AssetHost(format!(
                "Upload failed: {} {}",
                status, body
            )));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::AssetHost(e.to_string()))?;

        Ok(upload.secure_url)
    }
}

/// Compute a Cloudinary request signature: SHA-256 hex over the sorted
/// `key=value` pairs joined with `&`, with the API secret appended.
fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_params() {
        let params = [
            ("folder", "courses"),
            ("signature_algorithm", "sha256"),
            ("timestamp", "1700000000"),
        ];
        let signature = sign_params(&params, "secret");

        let mut hasher = Sha256::new();
        hasher.update(
            b"folder=courses&signature_algorithm=sha256&timestamp=1700000000".as_slice(),
        );
        hasher.update(b"secret".as_slice());
        assert_eq!(signature, hex::encode(hasher.finalize()));
    }

    #[test]
    fn test_sign_params_secret_changes_signature() {
        let params = [("timestamp", "1700000000")];
        assert_ne!(sign_params(&params, "a"), sign_params(&params, "b"));
    }
}
