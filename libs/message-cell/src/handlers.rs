// libs/message-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{MessageError, SendMessageRequest};
use crate::services::inbox::MessageInboxService;

fn require_admin(user: &User) -> Result<(), AppError> {
    if !user.is_admin() {
        let role = user.role.as_deref().unwrap_or("User");
        return Err(AppError::Forbidden(format!(
            "{} not authorized for this resource!",
            role
        )));
    }
    Ok(())
}

/// Public contact form submission
#[axum::debug_handler]
pub async fn send_message(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<Value>, AppError> {
    let inbox_service = MessageInboxService::new(&state);

    inbox_service
        .send_message(request)
        .await
        .map_err(|e| match e {
            MessageError::ValidationError(msg) => AppError::ValidationError(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "Message Sent!"
    })))
}

/// Admin view of the contact inbox
#[axum::debug_handler]
pub async fn get_all_messages(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    require_admin(&user)?;

    let inbox_service = MessageInboxService::new(&state);

    let messages = inbox_service
        .get_all_messages(token)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "messages": messages
    })))
}
