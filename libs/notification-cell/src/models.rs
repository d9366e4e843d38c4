// libs/notification-cell/src/models.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =====================================================================================
// MAIL DELIVERY MODELS
// =====================================================================================

/// Outbound email in the shape the mail API accepts
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Delivery acknowledgement returned by the mail API
#[derive(Debug, Clone, Deserialize)]
pub struct MailSendResponse {
    #[serde(default)]
    pub id: Option<String>,
}

// =====================================================================================
// ERROR TYPES
// =====================================================================================

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Mail delivery not configured")]
    NotConfigured,

    #[error("Mail API error: {message}")]
    MailApiError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        MailError::MailApiError {
            message: err.to_string(),
        }
    }
}
