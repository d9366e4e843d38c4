// libs/identity-cell/src/services/registration.rs
use chrono::{NaiveDate, Utc};
use regex::Regex;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    AddAdminRequest, AddDoctorRequest, Gender, IdentityError, RegisterPatientRequest, UserAccount,
    UserRole,
};
use crate::services::avatar::ImageHostClient;
use crate::services::password::hash_password;

// ==============================================================================
// FIELD VALIDATION
// ==============================================================================

fn require_field<T>(value: Option<T>, message: &str) -> Result<T, IdentityError> {
    value.ok_or_else(|| IdentityError::ValidationError(message.to_string()))
}

fn validate_name(value: &str, field: &str) -> Result<(), IdentityError> {
    if value.chars().count() < 3 {
        return Err(IdentityError::ValidationError(format!(
            "{} Must Contain At Least 3 Characters!",
            field
        )));
    }

    let name_regex = Regex::new(r"^[A-Za-z ]+$").unwrap();
    if !name_regex.is_match(value) {
        return Err(IdentityError::ValidationError(format!(
            "{} must contain only letters",
            field
        )));
    }

    Ok(())
}

fn validate_email_format(email: &str) -> Result<(), IdentityError> {
    let email_regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    if !email_regex.is_match(email) {
        return Err(IdentityError::ValidationError(
            "Provide A Valid Email!".to_string(),
        ));
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), IdentityError> {
    let phone_regex = Regex::new(r"^\d{10}$").unwrap();
    if !phone_regex.is_match(phone) {
        return Err(IdentityError::ValidationError(
            "Phone Number Must Contain Exactly 10 Digits!".to_string(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), IdentityError> {
    if password.chars().count() < 8 {
        return Err(IdentityError::ValidationError(
            "Password Must Contain At Least 8 Characters!".to_string(),
        ));
    }
    Ok(())
}

fn validate_profile_fields(
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: &str,
    password: &str,
) -> Result<(), IdentityError> {
    validate_name(first_name, "First Name")?;
    validate_name(last_name, "Last Name")?;
    validate_email_format(email)?;
    validate_phone(phone)?;
    validate_password(password)?;
    Ok(())
}

// ==============================================================================
// REGISTRATION SERVICE
// ==============================================================================

pub struct RegistrationService {
    supabase: SupabaseClient,
}

impl RegistrationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn find_by_email(
        &self,
        email: &str,
        auth_token: Option<&str>,
    ) -> Result<Option<UserAccount>, IdentityError> {
        let path = format!(
            "/rest/v1/users?email=eq.{}&limit=1",
            urlencoding::encode(email)
        );

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| IdentityError::DatabaseError(e.to_string()))?;

        match result.into_iter().next() {
            None => Ok(None),
            Some(row) => serde_json::from_value(row)
                .map(Some)
                .map_err(|e| IdentityError::DatabaseError(e.to_string())),
        }
    }

    /// Public self-registration, always creates a Patient account
    pub async fn register_patient(
        &self,
        request: RegisterPatientRequest,
    ) -> Result<UserAccount, IdentityError> {
        const MISSING: &str = "Please Fill Full Form!";

        let first_name = require_field(request.first_name, MISSING)?;
        let last_name = require_field(request.last_name, MISSING)?;
        let email = require_field(request.email, MISSING)?;
        let phone = require_field(request.phone, MISSING)?;
        let dob = require_field(request.dob, MISSING)?;
        let gender = require_field(request.gender, MISSING)?;
        let password = require_field(request.password, MISSING)?;
        let confirm_password = require_field(request.confirm_password, MISSING)?;

        if password != confirm_password {
            return Err(IdentityError::ValidationError(
                "Passwords do not match!".to_string(),
            ));
        }

        self.create_account(
            &first_name, &last_name, &email, &phone, dob, gender, &password,
            UserRole::Patient, None,
        )
        .await
    }

    /// Admin-only creation of another Admin account
    pub async fn create_admin(
        &self,
        request: AddAdminRequest,
        auth_token: &str,
    ) -> Result<UserAccount, IdentityError> {
        const MISSING: &str = "Please Fill Full Form!";

        let first_name = require_field(request.first_name, MISSING)?;
        let last_name = require_field(request.last_name, MISSING)?;
        let email = require_field(request.email, MISSING)?;
        let phone = require_field(request.phone, MISSING)?;
        let dob = require_field(request.dob, MISSING)?;
        let gender = require_field(request.gender, MISSING)?;
        let password = require_field(request.password, MISSING)?;

        self.create_account(
            &first_name, &last_name, &email, &phone, dob, gender, &password,
            UserRole::Admin, Some(auth_token),
        )
        .await
    }

    /// Admin-only creation of a Doctor account with department and avatar
    pub async fn create_doctor(
        &self,
        request: AddDoctorRequest,
        auth_token: &str,
        image_host: &ImageHostClient,
    ) -> Result<UserAccount, IdentityError> {
        const MISSING: &str = "Please Provide Full Details";

        let avatar_uri = request.avatar.ok_or_else(|| {
            IdentityError::ValidationError("Doctor Avatar Required".to_string())
        })?;

        // Reject unsupported formats before touching any other field
        ImageHostClient::parse_data_uri(&avatar_uri)?;

        let first_name = require_field(request.first_name, MISSING)?;
        let last_name = require_field(request.last_name, MISSING)?;
        let email = require_field(request.email, MISSING)?;
        let phone = require_field(request.phone, MISSING)?;
        let dob = require_field(request.dob, MISSING)?;
        let gender = require_field(request.gender, MISSING)?;
        let password = require_field(request.password, MISSING)?;
        let department = require_field(request.department, MISSING)?;

        let email = email.to_lowercase();
        validate_profile_fields(&first_name, &last_name, &email, &phone, &password)?;

        if let Some(existing) = self.find_by_email(&email, Some(auth_token)).await? {
            return Err(IdentityError::DuplicateEmail {
                existing_role: existing.role.to_string(),
            });
        }

        let upload = image_host.upload(&avatar_uri).await?;

        let password_hash =
            hash_password(&password).map_err(|e| IdentityError::Internal(e.to_string()))?;

        let user_data = json!({
            "first_name": first_name,
            "last_name": last_name,
            "email": email,
            "phone": phone,
            "dob": dob.format("%Y-%m-%d").to_string(),
            "gender": gender,
            "password": password_hash,
            "role": UserRole::Doctor,
            "department": department,
            "avatar": {
                "public_id": upload.public_id,
                "url": upload.secure_url
            },
            "created_at": Utc::now().to_rfc3339()
        });

        self.insert_account(user_data, Some(auth_token)).await
    }

    #[allow(clippy::too_many_arguments)]
    async fn create_account(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        phone: &str,
        dob: NaiveDate,
        gender: Gender,
        password: &str,
        role: UserRole,
        auth_token: Option<&str>,
    ) -> Result<UserAccount, IdentityError> {
        let email = email.to_lowercase();
        validate_profile_fields(first_name, last_name, &email, phone, password)?;

        if let Some(existing) = self.find_by_email(&email, auth_token).await? {
            return Err(IdentityError::DuplicateEmail {
                existing_role: existing.role.to_string(),
            });
        }

        let password_hash =
            hash_password(password).map_err(|e| IdentityError::Internal(e.to_string()))?;

        let user_data = json!({
            "first_name": first_name,
            "last_name": last_name,
            "email": email,
            "phone": phone,
            "dob": dob.format("%Y-%m-%d").to_string(),
            "gender": gender,
            "password": password_hash,
            "role": role,
            "created_at": Utc::now().to_rfc3339()
        });

        self.insert_account(user_data, auth_token).await
    }

    async fn insert_account(
        &self,
        user_data: Value,
        auth_token: Option<&str>,
    ) -> Result<UserAccount, IdentityError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/users",
                auth_token,
                Some(user_data),
                Some(headers),
            )
            .await
            .map_err(|e| IdentityError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            return Err(IdentityError::DatabaseError(
                "Failed to create user record".to_string(),
            ));
        }

        let user: UserAccount = serde_json::from_value(result[0].clone())
            .map_err(|e| IdentityError::DatabaseError(e.to_string()))?;

        debug!("Created {} account with ID: {}", user.role, user.id);
        Ok(user)
    }
}
