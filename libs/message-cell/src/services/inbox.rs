// libs/message-cell/src/services/inbox.rs
use chrono::Utc;
use regex::Regex;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{ContactMessage, MessageError, SendMessageRequest};

fn require_field<T>(value: Option<T>, message: &str) -> Result<T, MessageError> {
    value.ok_or_else(|| MessageError::ValidationError(message.to_string()))
}

fn validate_sender_name(value: &str, field: &str) -> Result<(), MessageError> {
    if value.chars().count() < 3 {
        return Err(MessageError::ValidationError(format!(
            "{} must contain at least 3 characters!",
            field
        )));
    }

    let name_regex = Regex::new(r"^[A-Za-z ]+$").unwrap();
    if !name_regex.is_match(value) {
        return Err(MessageError::ValidationError(format!(
            "{} must contain only letters",
            field
        )));
    }

    Ok(())
}

fn validate_email_format(email: &str) -> Result<(), MessageError> {
    let email_regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    if !email_regex.is_match(email) {
        return Err(MessageError::ValidationError(
            "Please provide a valid Email".to_string(),
        ));
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), MessageError> {
    let phone_regex = Regex::new(r"^\d{10}$").unwrap();
    if !phone_regex.is_match(phone) {
        return Err(MessageError::ValidationError(
            "Phone number must contain exactly 10 digits".to_string(),
        ));
    }
    Ok(())
}

fn validate_message_body(message: &str) -> Result<(), MessageError> {
    if message.chars().count() < 10 {
        return Err(MessageError::ValidationError(
            "Message must contain at least 10 characters".to_string(),
        ));
    }
    Ok(())
}

pub struct MessageInboxService {
    supabase: SupabaseClient,
}

impl MessageInboxService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Store a contact form submission. No account is required to send one.
    pub async fn send_message(
        &self,
        request: SendMessageRequest,
    ) -> Result<ContactMessage, MessageError> {
        const MISSING: &str = "Please Fill Full Form!";

        let first_name = require_field(request.first_name, MISSING)?;
        let last_name = require_field(request.last_name, MISSING)?;
        let email = require_field(request.email, MISSING)?;
        let phone = require_field(request.phone, MISSING)?;
        let message = require_field(request.message, MISSING)?;

        validate_sender_name(&first_name, "First Name")?;
        validate_sender_name(&last_name, "Last Name")?;
        validate_email_format(&email)?;
        validate_phone(&phone)?;
        validate_message_body(&message)?;

        let message_data = json!({
            "first_name": first_name,
            "last_name": last_name,
            "email": email,
            "phone": phone,
            "message": message,
            "created_at": Utc::now().to_rfc3339(),
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/messages",
                None,
                Some(message_data),
                Some(headers),
            )
            .await
            .map_err(|e| MessageError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or_else(|| {
            MessageError::DatabaseError("Failed to store message".to_string())
        })?;
        let stored: ContactMessage =
            serde_json::from_value(row).map_err(|e| MessageError::DatabaseError(e.to_string()))?;

        info!("Contact message {} stored from {}", stored.id, stored.email);
        Ok(stored)
    }

    /// Full inbox scan, used by the admin dashboard.
    pub async fn get_all_messages(
        &self,
        auth_token: &str,
    ) -> Result<Vec<ContactMessage>, MessageError> {
        debug!("Fetching all contact messages");

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, "/rest/v1/messages", Some(auth_token), None)
            .await
            .map_err(|e| MessageError::DatabaseError(e.to_string()))?;

        let messages: Vec<ContactMessage> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| MessageError::DatabaseError(e.to_string()))?;

        Ok(messages)
    }
}
