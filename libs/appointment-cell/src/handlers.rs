// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use notification_cell::MailerClient;
use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{AppointmentError, BookAppointmentRequest, UpdateStatusRequest};
use crate::services::lifecycle::AppointmentLifecycleService;

fn require_patient(user: &User) -> Result<(), AppError> {
    if !user.is_patient() {
        let role = user.role.as_deref().unwrap_or("User");
        return Err(AppError::Forbidden(format!(
            "{} not authorized for this resource!",
            role
        )));
    }
    Ok(())
}

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

/// Patient books an appointment with a named doctor
#[axum::debug_handler]
pub async fn post_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    require_patient(&user)?;

    let mailer = MailerClient::new(&state).map_err(|e| AppError::Internal(e.to_string()))?;
    let lifecycle_service = AppointmentLifecycleService::new(&state);

    let appointment = lifecycle_service
        .create_appointment(request, &user.id, token, &mailer)
        .await
        .map_err(|e| match e {
            AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
            AppointmentError::DoctorNotFound => {
                AppError::BadRequest("Doctor not found!".to_string())
            }
            AppointmentError::DoctorAmbiguous => AppError::NotFound(
                "Doctor Conflict! Please contact through Email or Phone".to_string(),
            ),
            AppointmentError::NotificationError(msg) => AppError::ExternalService(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment Sent Successfully!",
        "appointment": appointment
    })))
}

/// Admin view of every appointment in the system
#[axum::debug_handler]
pub async fn get_all_appointments(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    require_admin(&user)?;

    let lifecycle_service = AppointmentLifecycleService::new(&state);

    let appointments = lifecycle_service
        .get_all_appointments(token)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments
    })))
}

/// Admin overwrites the status of an appointment, notifying the people involved
#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    require_admin(&user)?;

    let mailer = MailerClient::new(&state).map_err(|e| AppError::Internal(e.to_string()))?;
    let lifecycle_service = AppointmentLifecycleService::new(&state);

    let appointment = lifecycle_service
        .update_status(&appointment_id, request, token, &mailer)
        .await
        .map_err(|e| match e {
            AppointmentError::NotFound => {
                AppError::NotFound("Appointment not found".to_string())
            }
            AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
            AppointmentError::NotificationError(msg) => AppError::ExternalService(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment Status Updated and Email Sent to Patient!",
        "appointment": appointment
    })))
}

/// Admin removes an appointment record
#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    require_admin(&user)?;

    let lifecycle_service = AppointmentLifecycleService::new(&state);

    lifecycle_service
        .delete_appointment(&appointment_id, token)
        .await
        .map_err(|e| match e {
            AppointmentError::NotFound => {
                AppError::NotFound("Appointment Not Found".to_string())
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment Deleted"
    })))
}
