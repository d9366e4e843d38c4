// libs/notification-cell/src/services/mailer.rs
use reqwest::Client;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{EmailMessage, MailError, MailSendResponse};

/// HTTP client for the hospital's transactional mail API
pub struct MailerClient {
    client: Client,
    base_url: String,
    api_key: String,
    from: String,
}

impl MailerClient {
    pub fn new(config: &AppConfig) -> Result<Self, MailError> {
        if !config.is_mailer_configured() {
            return Err(MailError::NotConfigured);
        }

        let client = Client::new();

        Ok(Self {
            client,
            base_url: config.mail_api_url.clone(),
            api_key: config.mail_api_key.clone(),
            from: config.mail_from.clone(),
        })
    }

    /// Deliver a single HTML email
    /// POST /send
    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        html: &str,
    ) -> Result<MailSendResponse, MailError> {
        if to.trim().is_empty() {
            return Err(MailError::ValidationError {
                message: "Recipient address is empty".to_string(),
            });
        }

        info!("Sending email to {} with subject: {}", to, subject);

        let url = format!("{}/send", self.base_url);

        let request_body = EmailMessage {
            from: self.from.clone(),
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        };

        debug!("Sending mail request to: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        debug!("Mail API response: {} - {}", status, response_text);

        if !status.is_success() {
            error!("Mail delivery failed: {} - {}", status, response_text);
            return Err(MailError::MailApiError {
                message: format!("HTTP {}: {}", status, response_text),
            });
        }

        // Some providers return an empty body on success
        let send_response = if response_text.trim().is_empty() {
            MailSendResponse { id: None }
        } else {
            serde_json::from_str(&response_text).map_err(|e| MailError::MailApiError {
                message: format!("Failed to parse mail API response: {}", e),
            })?
        };

        info!("Email accepted by mail API for {}", to);
        Ok(send_response)
    }
}
