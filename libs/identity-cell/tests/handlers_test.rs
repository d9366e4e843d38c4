// libs/identity-cell/tests/handlers_test.rs

use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use identity_cell::handlers::*;
use identity_cell::models::{AddAdminRequest, AddDoctorRequest, Gender, RegisterPatientRequest};
use shared_config::AppConfig;
use shared_models::{auth::User, error::AppError};
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestConfig, TestUser};

fn create_test_config() -> AppConfig {
    TestConfig::default().to_app_config()
}

fn create_mocked_config(mock_server: &MockServer) -> AppConfig {
    let mut config = create_test_config();
    config.supabase_url = mock_server.uri();
    config.image_host_url = mock_server.uri();
    config
}

fn create_user_extension(test_user: &TestUser) -> Extension<User> {
    Extension(test_user.to_user())
}

fn create_auth_header(token: &str) -> TypedHeader<Authorization<Bearer>> {
    let auth = Authorization::bearer(token).unwrap();
    TypedHeader(auth)
}

fn patient_request() -> RegisterPatientRequest {
    RegisterPatientRequest {
        first_name: Some("Ram".to_string()),
        last_name: Some("Shrestha".to_string()),
        email: Some("ram@x.com".to_string()),
        phone: Some("9800000000".to_string()),
        dob: Some("1990-01-01".parse().unwrap()),
        gender: Some(Gender::Male),
        password: Some("ram-secret-pw".to_string()),
        confirm_password: Some("ram-secret-pw".to_string()),
    }
}

fn doctor_request() -> AddDoctorRequest {
    AddDoctorRequest {
        first_name: Some("Hari".to_string()),
        last_name: Some("Gurung".to_string()),
        email: Some("hari@medora.com".to_string()),
        phone: Some("9811111111".to_string()),
        dob: Some("1980-06-15".parse().unwrap()),
        gender: Some(Gender::Male),
        password: Some("doctor-secret".to_string()),
        department: Some("Cardiology".to_string()),
        avatar: Some("data:image/png;base64,MHg=".to_string()),
    }
}

// ==============================================================================
// PATIENT REGISTRATION
// ==============================================================================

#[tokio::test]
async fn test_register_patient_success() {
    let mock_server = MockServer::start().await;
    let config = create_mocked_config(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("email", "eq.ram@x.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let created = MockSupabaseResponses::user_row(
        &Uuid::new_v4().to_string(),
        "Ram",
        "Shrestha",
        "ram@x.com",
        "Patient",
    );
    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([created])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = register_patient(State(Arc::new(config)), Json(patient_request())).await;

    assert!(result.is_ok(), "Expected registration to succeed, got: {:?}", result.err());
    let response = result.unwrap().0;
    assert_eq!(response["success"], true);
    assert_eq!(response["message"], "User Registered!");
    assert_eq!(response["user"]["email"], "ram@x.com");
    assert!(response["user"].get("password").is_none());
}

#[tokio::test]
async fn test_register_patient_missing_field_fails() {
    let config = Arc::new(create_test_config());

    let mut request = patient_request();
    request.phone = None;

    let result = register_patient(State(config), Json(request)).await;

    assert!(result.is_err());
    match result.unwrap_err() {
        AppError::ValidationError(msg) => assert_eq!(msg, "Please Fill Full Form!"),
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_register_patient_password_mismatch_fails() {
    let config = Arc::new(create_test_config());

    let mut request = patient_request();
    request.confirm_password = Some("something-else".to_string());

    let result = register_patient(State(config), Json(request)).await;

    assert!(result.is_err());
    match result.unwrap_err() {
        AppError::ValidationError(msg) => assert_eq!(msg, "Passwords do not match!"),
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_register_patient_duplicate_email_fails() {
    let mock_server = MockServer::start().await;
    let config = create_mocked_config(&mock_server);

    let existing = MockSupabaseResponses::user_row(
        &Uuid::new_v4().to_string(),
        "Ram",
        "Shrestha",
        "ram@x.com",
        "Patient",
    );
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("email", "eq.ram@x.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([existing])))
        .mount(&mock_server)
        .await;

    // Registration must stop before any insert
    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = register_patient(State(Arc::new(config)), Json(patient_request())).await;

    assert!(result.is_err());
    match result.unwrap_err() {
        AppError::BadRequest(msg) => assert_eq!(msg, "User already Registered!"),
        other => panic!("Expected BadRequest, got {:?}", other),
    }
}

#[tokio::test]
async fn test_register_patient_normalizes_email_case() {
    let mock_server = MockServer::start().await;
    let config = create_mocked_config(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("email", "eq.ram@x.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let created = MockSupabaseResponses::user_row(
        &Uuid::new_v4().to_string(),
        "Ram",
        "Shrestha",
        "ram@x.com",
        "Patient",
    );
    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([created])))
        .mount(&mock_server)
        .await;

    let mut request = patient_request();
    request.email = Some("RAM@X.com".to_string());

    let result = register_patient(State(Arc::new(config)), Json(request)).await;
    assert!(result.is_ok(), "Expected registration to succeed, got: {:?}", result.err());
}

// ==============================================================================
// ADMIN CREATION
// ==============================================================================

#[tokio::test]
async fn test_add_new_admin_success() {
    let mock_server = MockServer::start().await;
    let config = create_mocked_config(&mock_server);

    let admin_user = TestUser::admin("admin@medora.com");
    let token = JwtTestUtils::create_test_token(&admin_user, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let created = MockSupabaseResponses::user_row(
        &Uuid::new_v4().to_string(),
        "Sita",
        "Adhikari",
        "sita@medora.com",
        "Admin",
    );
    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([created])))
        .mount(&mock_server)
        .await;

    let request = AddAdminRequest {
        first_name: Some("Sita".to_string()),
        last_name: Some("Adhikari".to_string()),
        email: Some("sita@medora.com".to_string()),
        phone: Some("9822222222".to_string()),
        dob: Some("1988-02-02".parse().unwrap()),
        gender: Some(Gender::Female),
        password: Some("admin-secret".to_string()),
    };

    let result = add_new_admin(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_user_extension(&admin_user),
        Json(request),
    )
    .await;

    assert!(result.is_ok(), "Expected admin creation to succeed, got: {:?}", result.err());
    let response = result.unwrap().0;
    assert_eq!(response["success"], true);
    assert_eq!(response["message"], "New Admin Registered");
    assert_eq!(response["admin"]["role"], "Admin");
}

#[tokio::test]
async fn test_add_new_admin_rejects_non_admin() {
    let config = Arc::new(create_test_config());

    let patient_user = TestUser::patient("patient@example.com");
    let token =
        JwtTestUtils::create_test_token(&patient_user, &config.supabase_jwt_secret, Some(24));

    let request = AddAdminRequest {
        first_name: Some("Sita".to_string()),
        last_name: Some("Adhikari".to_string()),
        email: Some("sita@medora.com".to_string()),
        phone: Some("9822222222".to_string()),
        dob: Some("1988-02-02".parse().unwrap()),
        gender: Some(Gender::Female),
        password: Some("admin-secret".to_string()),
    };

    let result = add_new_admin(
        State(config),
        create_auth_header(&token),
        create_user_extension(&patient_user),
        Json(request),
    )
    .await;

    assert!(result.is_err());
    match result.unwrap_err() {
        AppError::Forbidden(msg) => {
            assert_eq!(msg, "Patient not authorized for this resource!")
        }
        other => panic!("Expected Forbidden, got {:?}", other),
    }
}

// ==============================================================================
// DOCTOR CREATION
// ==============================================================================

#[tokio::test]
async fn test_add_new_doctor_success() {
    let mock_server = MockServer::start().await;
    let config = create_mocked_config(&mock_server);

    let admin_user = TestUser::admin("admin@medora.com");
    let token = JwtTestUtils::create_test_token(&admin_user, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "public_id": "medora/doctors/avatar-1",
            "secure_url": "https://images.example.com/medora/doctors/avatar-1.png"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let created = MockSupabaseResponses::doctor_row(
        &Uuid::new_v4().to_string(),
        "Hari",
        "Gurung",
        "hari@medora.com",
        "Cardiology",
    );
    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([created])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = add_new_doctor(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_user_extension(&admin_user),
        Json(doctor_request()),
    )
    .await;

    assert!(result.is_ok(), "Expected doctor creation to succeed, got: {:?}", result.err());
    let response = result.unwrap().0;
    assert_eq!(response["message"], "New Doctor Registered!");
    assert_eq!(response["doctor"]["department"], "Cardiology");
    assert_eq!(response["doctor"]["avatar"]["public_id"], "medora/doctors/avatar-1");
}

#[tokio::test]
async fn test_add_new_doctor_requires_avatar() {
    let config = Arc::new(create_test_config());

    let admin_user = TestUser::admin("admin@medora.com");
    let token = JwtTestUtils::create_test_token(&admin_user, &config.supabase_jwt_secret, Some(24));

    let mut request = doctor_request();
    request.avatar = None;

    let result = add_new_doctor(
        State(config),
        create_auth_header(&token),
        create_user_extension(&admin_user),
        Json(request),
    )
    .await;

    assert!(result.is_err());
    match result.unwrap_err() {
        AppError::ValidationError(msg) => assert_eq!(msg, "Doctor Avatar Required"),
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_add_new_doctor_rejects_unsupported_image_format() {
    let config = Arc::new(create_test_config());

    let admin_user = TestUser::admin("admin@medora.com");
    let token = JwtTestUtils::create_test_token(&admin_user, &config.supabase_jwt_secret, Some(24));

    let mut request = doctor_request();
    request.avatar = Some("data:image/gif;base64,MHg=".to_string());

    let result = add_new_doctor(
        State(config),
        create_auth_header(&token),
        create_user_extension(&admin_user),
        Json(request),
    )
    .await;

    assert!(result.is_err());
    match result.unwrap_err() {
        AppError::ValidationError(msg) => assert_eq!(msg, "File Format Not Supported!"),
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_add_new_doctor_requires_department() {
    let config = Arc::new(create_test_config());

    let admin_user = TestUser::admin("admin@medora.com");
    let token = JwtTestUtils::create_test_token(&admin_user, &config.supabase_jwt_secret, Some(24));

    let mut request = doctor_request();
    request.department = None;

    let result = add_new_doctor(
        State(config),
        create_auth_header(&token),
        create_user_extension(&admin_user),
        Json(request),
    )
    .await;

    assert!(result.is_err());
    match result.unwrap_err() {
        AppError::ValidationError(msg) => assert_eq!(msg, "Please Provide Full Details"),
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_add_new_doctor_duplicate_email_names_existing_role() {
    let mock_server = MockServer::start().await;
    let config = create_mocked_config(&mock_server);

    let admin_user = TestUser::admin("admin@medora.com");
    let token = JwtTestUtils::create_test_token(&admin_user, &config.supabase_jwt_secret, Some(24));

    let existing = MockSupabaseResponses::user_row(
        &Uuid::new_v4().to_string(),
        "Hari",
        "Gurung",
        "hari@medora.com",
        "Patient",
    );
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([existing])))
        .mount(&mock_server)
        .await;

    // No upload and no insert once the email is taken
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = add_new_doctor(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_user_extension(&admin_user),
        Json(doctor_request()),
    )
    .await;

    assert!(result.is_err());
    match result.unwrap_err() {
        AppError::BadRequest(msg) => {
            assert_eq!(msg, "Patient Already Registered With This Email")
        }
        other => panic!("Expected BadRequest, got {:?}", other),
    }
}

// ==============================================================================
// DIRECTORY
// ==============================================================================

#[tokio::test]
async fn test_get_all_doctors_success() {
    let mock_server = MockServer::start().await;
    let config = create_mocked_config(&mock_server);

    let rows = json!([
        MockSupabaseResponses::doctor_row(
            &Uuid::new_v4().to_string(),
            "Hari",
            "Gurung",
            "hari@medora.com",
            "Cardiology",
        ),
        MockSupabaseResponses::doctor_row(
            &Uuid::new_v4().to_string(),
            "Gita",
            "Thapa",
            "gita@medora.com",
            "Dermatology",
        ),
    ]);
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("role", "eq.Doctor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(&mock_server)
        .await;

    let result = get_all_doctors(State(Arc::new(config))).await;

    assert!(result.is_ok(), "Expected doctor listing to succeed, got: {:?}", result.err());
    let response = result.unwrap().0;
    assert_eq!(response["success"], true);
    assert_eq!(response["doctors"].as_array().map(|d| d.len()), Some(2));
}

#[tokio::test]
async fn test_get_current_user_success() {
    let mock_server = MockServer::start().await;
    let config = create_mocked_config(&mock_server);

    let patient_user = TestUser::patient("ram@x.com");
    let token =
        JwtTestUtils::create_test_token(&patient_user, &config.supabase_jwt_secret, Some(24));

    let row = MockSupabaseResponses::user_row(
        &patient_user.id,
        "Ram",
        "Shrestha",
        "ram@x.com",
        "Patient",
    );
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", format!("eq.{}", patient_user.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .mount(&mock_server)
        .await;

    let result = get_current_user(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_user_extension(&patient_user),
    )
    .await;

    assert!(result.is_ok(), "Expected current user lookup to succeed, got: {:?}", result.err());
    let response = result.unwrap().0;
    assert_eq!(response["user"]["email"], "ram@x.com");
    assert!(response["user"].get("password").is_none());
}

#[tokio::test]
async fn test_get_current_user_not_found() {
    let mock_server = MockServer::start().await;
    let config = create_mocked_config(&mock_server);

    let patient_user = TestUser::patient("ghost@example.com");
    let token =
        JwtTestUtils::create_test_token(&patient_user, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let result = get_current_user(
        State(Arc::new(config)),
        create_auth_header(&token),
        create_user_extension(&patient_user),
    )
    .await;

    assert!(result.is_err());
    match result.unwrap_err() {
        AppError::NotFound(msg) => assert_eq!(msg, "User not found"),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}
