// libs/identity-cell/src/services/avatar.rs
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{IdentityError, ImageUploadResponse};

const ALLOWED_IMAGE_FORMATS: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// HTTP client for the avatar image host
pub struct ImageHostClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ImageHostClient {
    pub fn new(config: &AppConfig) -> Result<Self, IdentityError> {
        if !config.is_image_host_configured() {
            return Err(IdentityError::ImageHostNotConfigured);
        }

        let client = Client::new();

        Ok(Self {
            client,
            base_url: config.image_host_url.clone(),
            api_key: config.image_host_api_key.clone(),
        })
    }

    /// Split a `data:<mime>;base64,<payload>` URI and reject disallowed formats
    pub fn parse_data_uri(data_uri: &str) -> Result<(&str, &str), IdentityError> {
        let rest = data_uri
            .strip_prefix("data:")
            .ok_or(IdentityError::UnsupportedImageFormat)?;
        let (mime, payload) = rest
            .split_once(";base64,")
            .ok_or(IdentityError::UnsupportedImageFormat)?;

        if !ALLOWED_IMAGE_FORMATS.contains(&mime) {
            return Err(IdentityError::UnsupportedImageFormat);
        }

        Ok((mime, payload))
    }

    /// Upload a base64 data URI to the image host
    /// POST /upload
    pub async fn upload(&self, data_uri: &str) -> Result<ImageUploadResponse, IdentityError> {
        let (mime, payload) = Self::parse_data_uri(data_uri)?;

        general_purpose::STANDARD
            .decode(payload)
            .map_err(|_| IdentityError::UnsupportedImageFormat)?;

        info!("Uploading {} avatar to image host", mime);

        let url = format!("{}/upload", self.base_url);

        let request_body = json!({
            "file": data_uri
        });

        debug!("Sending avatar upload request to: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!("Image host request failed: {}", e);
                IdentityError::ImageUploadFailed
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            error!("Failed to read image host response: {}", e);
            IdentityError::ImageUploadFailed
        })?;

        if !status.is_success() {
            error!("Image host error: {} - {}", status, response_text);
            return Err(IdentityError::ImageUploadFailed);
        }

        let upload: ImageUploadResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse image host response: {}", e);
            IdentityError::ImageUploadFailed
        })?;

        info!("Avatar uploaded with public id: {}", upload.public_id);
        Ok(upload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_uri_accepts_allowed_formats() {
        for mime in ALLOWED_IMAGE_FORMATS {
            let uri = format!("data:{};base64,MHg=", mime);
            let (parsed_mime, payload) = ImageHostClient::parse_data_uri(&uri).unwrap();
            assert_eq!(parsed_mime, mime);
            assert_eq!(payload, "MHg=");
        }
    }

    #[test]
    fn test_parse_data_uri_rejects_gif() {
        let result = ImageHostClient::parse_data_uri("data:image/gif;base64,MHg=");
        assert!(matches!(result, Err(IdentityError::UnsupportedImageFormat)));
    }

    #[test]
    fn test_parse_data_uri_rejects_plain_text() {
        let result = ImageHostClient::parse_data_uri("not-a-data-uri");
        assert!(matches!(result, Err(IdentityError::UnsupportedImageFormat)));
    }

    fn create_test_config() -> AppConfig {
        AppConfig {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test".to_string(),
            supabase_jwt_secret: "test".to_string(),
            mail_api_url: "http://localhost:8025".to_string(),
            mail_api_key: "test".to_string(),
            mail_from: "Medora - Hetauda Hospital <no-reply@medora-hetauda.com>".to_string(),
            image_host_url: "http://localhost:9001".to_string(),
            image_host_api_key: "test".to_string(),
        }
    }

    #[test]
    fn test_client_creation_requires_config() {
        let mut config = create_test_config();
        assert!(ImageHostClient::new(&config).is_ok());

        config.image_host_api_key = "".to_string();
        assert!(matches!(
            ImageHostClient::new(&config),
            Err(IdentityError::ImageHostNotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_upload_rejects_invalid_base64_payload() {
        let config = create_test_config();
        let client = ImageHostClient::new(&config).unwrap();

        let result = client.upload("data:image/png;base64,@@not-base64@@").await;
        assert!(matches!(result, Err(IdentityError::UnsupportedImageFormat)));
    }
}
