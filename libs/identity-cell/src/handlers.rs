// libs/identity-cell/src/handlers.rs
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

use crate::models::{AddAdminRequest, AddDoctorRequest, IdentityError, RegisterPatientRequest};
use crate::services::avatar::ImageHostClient;
use crate::services::directory::DirectoryService;
use crate::services::registration::RegistrationService;

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

/// Public patient self-registration
#[axum::debug_handler]
pub async fn register_patient(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<RegisterPatientRequest>,
) -> Result<Json<Value>, AppError> {
    let registration_service = RegistrationService::new(&state);

    let user = registration_service
        .register_patient(request)
        .await
        .map_err(|e| match e {
            IdentityError::DuplicateEmail { .. } => {
                AppError::BadRequest("User already Registered!".to_string())
            }
            IdentityError::ValidationError(msg) => AppError::ValidationError(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "User Registered!",
        "user": user
    })))
}

/// Admin-only creation of a new admin account
#[axum::debug_handler]
pub async fn add_new_admin(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<AddAdminRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    require_admin(&user)?;

    let registration_service = RegistrationService::new(&state);

    let admin = registration_service
        .create_admin(request, token)
        .await
        .map_err(|e| match e {
            IdentityError::DuplicateEmail { .. } => {
                AppError::BadRequest("Admin With This Email Already Exists!".to_string())
            }
            IdentityError::ValidationError(msg) => AppError::ValidationError(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "New Admin Registered",
        "admin": admin
    })))
}

/// Admin-only creation of a new doctor account with department and avatar
#[axum::debug_handler]
pub async fn add_new_doctor(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<AddDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    require_admin(&user)?;

    let image_host = ImageHostClient::new(&state).map_err(|e| AppError::Internal(e.to_string()))?;
    let registration_service = RegistrationService::new(&state);

    let doctor = registration_service
        .create_doctor(request, token, &image_host)
        .await
        .map_err(|e| match e {
            IdentityError::DuplicateEmail { existing_role } => AppError::BadRequest(format!(
                "{} Already Registered With This Email",
                existing_role
            )),
            IdentityError::ValidationError(msg) => AppError::ValidationError(msg),
            IdentityError::UnsupportedImageFormat => {
                AppError::ValidationError("File Format Not Supported!".to_string())
            }
            IdentityError::ImageUploadFailed => {
                AppError::Internal("Failed to upload image".to_string())
            }
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "New Doctor Registered!",
        "doctor": doctor
    })))
}

/// Public doctor directory
#[axum::debug_handler]
pub async fn get_all_doctors(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let directory_service = DirectoryService::new(&state);

    let doctors = directory_service
        .get_all_doctors(None)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "doctors": doctors
    })))
}

/// Account details of the authenticated user
#[axum::debug_handler]
pub async fn get_current_user(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let directory_service = DirectoryService::new(&state);

    let account = directory_service
        .get_user(&user.id, token)
        .await
        .map_err(|e| match e {
            IdentityError::NotFound => AppError::NotFound("User not found".to_string()),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "user": account
    })))
}
