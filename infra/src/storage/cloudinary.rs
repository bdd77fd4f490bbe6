//! Cloudinary-backed avatar storage
//!
//! Uploads are signed requests against the Cloudinary upload API. Every
//! upload for a given public id overwrites the previous image and bumps its
//! version, which is what the rendition URL embeds.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use cb_core::domain::value_objects::AvatarUpload;
use cb_core::services::avatar::AvatarStorage;

use crate::config::StorageConfig;
use crate::InfrastructureError;

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    version: u64,
}

/// Avatar storage on a Cloudinary account
pub struct CloudinaryAvatarStorage {
    client: Client,
    config: StorageConfig,
}

impl CloudinaryAvatarStorage {
    /// Missing credentials are not an error here; uploads fail until they
    /// are configured
    pub fn new(config: StorageConfig) -> Result<Self, InfrastructureError> {
        if !config.is_configured() {
            tracing::warn!("Cloudinary credentials are not set; avatar uploads will fail");
        }

        let client = Client::builder().timeout(UPLOAD_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        )
    }

    /// Signed parameters of an upload, excluding the file itself
    fn signed_params(&self, public_id: &str, timestamp: i64) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();
        params.insert("overwrite", "true".to_string());
        params.insert("public_id", public_id.to_string());
        params.insert("timestamp", timestamp.to_string());
        params
    }

    async fn send_upload(
        &self,
        public_id: &str,
        bytes: Vec<u8>,
    ) -> Result<AvatarUpload, InfrastructureError> {
        if !self.config.is_configured() {
            return Err(InfrastructureError::Config(
                "CLOUDINARY_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set"
                    .to_string(),
            ));
        }

        let params = self.signed_params(public_id, chrono::Utc::now().timestamp());
        let signature = sign(&params, &self.config.api_secret);

        let mut form = Form::new()
            .part("file", Part::bytes(bytes).file_name("avatar"))
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (name, value) in params {
            form = form.text(name, value);
        }

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InfrastructureError::Storage(format!(
                "upload rejected with {}: {}",
                status, body
            )));
        }

        let uploaded: UploadResponse = response.json().await?;
        Ok(AvatarUpload {
            url: uploaded.secure_url,
            version: uploaded.version.to_string(),
        })
    }
}

/// Hex SHA-256 over the `&`-joined sorted parameters followed by the secret
fn sign(params: &BTreeMap<&'static str, String>, api_secret: &str) -> String {
    let joined = params
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&");
    hex::encode(Sha256::digest(format!("{}{}", joined, api_secret).as_bytes()))
}

#[async_trait]
impl AvatarStorage for CloudinaryAvatarStorage {
    async fn upload(&self, public_id: &str, bytes: Vec<u8>) -> Result<AvatarUpload, String> {
        tracing::debug!("Uploading avatar {} ({} bytes)", public_id, bytes.len());
        self.send_upload(public_id, bytes).await.map_err(|e| {
            tracing::error!("Avatar upload for {} failed: {}", public_id, e);
            e.to_string()
        })
    }

    fn rendition_url(&self, public_id: &str, version: &str, size: u32) -> String {
        format!(
            "https://res.cloudinary.com/{}/image/upload/c_fill,h_{size},w_{size}/v{}/{}",
            self.config.cloud_name,
            version,
            public_id,
            size = size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> CloudinaryAvatarStorage {
        CloudinaryAvatarStorage::new(StorageConfig {
            cloud_name: "demo".to_string(),
            api_key: "1234".to_string(),
            api_secret: "secret".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_signature_covers_sorted_params_and_secret() {
        let storage = storage();
        let params = storage.signed_params("ContactBook/abc", 1_700_000_000);

        let expected = hex::encode(Sha256::digest(
            b"overwrite=true&public_id=ContactBook/abc&timestamp=1700000000secret",
        ));
        assert_eq!(sign(&params, "secret"), expected);
        assert_ne!(sign(&params, "other"), expected);
    }

    #[test]
    fn test_rendition_url() {
        assert_eq!(
            storage().rendition_url("ContactBook/abc", "1700000001", 250),
            "https://res.cloudinary.com/demo/image/upload/c_fill,h_250,w_250/v1700000001/ContactBook/abc"
        );
    }

    #[tokio::test]
    async fn test_upload_without_credentials_fails() {
        let storage = CloudinaryAvatarStorage::new(StorageConfig::default()).unwrap();
        let result = storage.upload("ContactBook/abc", vec![1, 2, 3]).await;
        assert!(result.unwrap_err().contains("must be set"));
    }
}
