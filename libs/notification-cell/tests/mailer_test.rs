// libs/notification-cell/tests/mailer_test.rs

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notification_cell::models::MailError;
use notification_cell::services::mailer::MailerClient;
use shared_config::AppConfig;
use shared_utils::test_utils::TestConfig;

fn create_config_with_mail_api(uri: &str) -> AppConfig {
    let mut config = TestConfig::default().to_app_config();
    config.mail_api_url = uri.to_string();
    config
}

#[tokio::test]
async fn test_send_delivers_email_through_mail_api() {
    let mock_server = MockServer::start().await;
    let config = create_config_with_mail_api(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/send"))
        .and(header("Authorization", "Bearer test-mail-key"))
        .and(body_partial_json(json!({
            "to": "ram@example.com",
            "subject": "Appointment Received"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg_123"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mailer = MailerClient::new(&config).unwrap();
    let result = mailer
        .send("ram@example.com", "Appointment Received", "<p>Hello Ram</p>")
        .await;

    assert!(result.is_ok(), "Expected send to succeed, got: {:?}", result.err());
    assert_eq!(result.unwrap().id, Some("msg_123".to_string()));
}

#[tokio::test]
async fn test_send_accepts_empty_success_body() {
    let mock_server = MockServer::start().await;
    let config = create_config_with_mail_api(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let mailer = MailerClient::new(&config).unwrap();
    let result = mailer
        .send("ram@example.com", "Appointment Received", "<p>Hello</p>")
        .await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().id, None);
}

#[tokio::test]
async fn test_send_surfaces_provider_failure() {
    let mock_server = MockServer::start().await;
    let config = create_config_with_mail_api(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "provider exploded"})),
        )
        .mount(&mock_server)
        .await;

    let mailer = MailerClient::new(&config).unwrap();
    let result = mailer
        .send("ram@example.com", "Appointment Received", "<p>Hello</p>")
        .await;

    assert_matches!(result, Err(MailError::MailApiError { message }) => {
        assert!(message.contains("500"), "unexpected message: {}", message);
    });
}
