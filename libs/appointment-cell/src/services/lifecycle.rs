// libs/appointment-cell/src/services/lifecycle.rs
use chrono::{NaiveDate, Utc};
use regex::Regex;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use identity_cell::models::UserAccount;
use notification_cell::MailerClient;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, BookAppointmentRequest, UpdateStatusRequest,
};
use crate::services::matching::DoctorMatchingService;
use crate::services::templates;

// ==============================================================================
// FIELD VALIDATION
// ==============================================================================

fn require_field<T>(value: Option<T>, message: &str) -> Result<T, AppointmentError> {
    value.ok_or_else(|| AppointmentError::ValidationError(message.to_string()))
}

fn validate_patient_name(value: &str, field: &str) -> Result<(), AppointmentError> {
    if value.chars().count() < 3 {
        return Err(AppointmentError::ValidationError(format!(
            "{} Must Contain At Least 3 Characters!",
            field
        )));
    }

    let name_regex = Regex::new(r"^[A-Za-z ]+$").unwrap();
    if !name_regex.is_match(value) {
        return Err(AppointmentError::ValidationError(format!(
            "{} must contain only letters",
            field
        )));
    }

    Ok(())
}

fn validate_email_format(email: &str) -> Result<(), AppointmentError> {
    let email_regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    if !email_regex.is_match(email) {
        return Err(AppointmentError::ValidationError(
            "Provide a valid Email!".to_string(),
        ));
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), AppointmentError> {
    let phone_regex = Regex::new(r"^\d{10}$").unwrap();
    if !phone_regex.is_match(phone) {
        return Err(AppointmentError::ValidationError(
            "Phone Number Must Contain Exact 10 Digits!".to_string(),
        ));
    }
    Ok(())
}

// Doctor names on the booking form have no minimum length, unlike patient names.
fn validate_doctor_name(value: &str, field: &str) -> Result<(), AppointmentError> {
    let name_regex = Regex::new(r"^[A-Za-z ]+$").unwrap();
    if !name_regex.is_match(value) {
        return Err(AppointmentError::ValidationError(format!(
            "{} must contain only letters",
            field
        )));
    }
    Ok(())
}

fn validate_appointment_date(
    appointment_date: NaiveDate,
    today: NaiveDate,
) -> Result<(), AppointmentError> {
    if appointment_date < today {
        return Err(AppointmentError::ValidationError(
            "Appointment Date Cannot Be In The Past!".to_string(),
        ));
    }
    Ok(())
}

// ==============================================================================
// APPOINTMENT LIFECYCLE SERVICE
// ==============================================================================

pub struct AppointmentLifecycleService {
    supabase: SupabaseClient,
    matching: DoctorMatchingService,
}

impl AppointmentLifecycleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            matching: DoctorMatchingService::new(config),
        }
    }

    /// Book an appointment on behalf of the authenticated patient.
    ///
    /// The booking is committed with `Pending` status before the confirmation
    /// email goes out, so a mail failure surfaces to the caller without
    /// rolling back the record.
    pub async fn create_appointment(
        &self,
        request: BookAppointmentRequest,
        patient_id: &str,
        auth_token: &str,
        mailer: &MailerClient,
    ) -> Result<Appointment, AppointmentError> {
        const MISSING: &str = "Please fill full form";

        let first_name = require_field(request.first_name, MISSING)?;
        let last_name = require_field(request.last_name, MISSING)?;
        let email = require_field(request.email, MISSING)?;
        let phone = require_field(request.phone, MISSING)?;
        let dob = require_field(request.dob, MISSING)?;
        let gender = require_field(request.gender, MISSING)?;
        let appointment_date = require_field(request.appointment_date, MISSING)?;
        let department = require_field(request.department, MISSING)?;
        let doctor_first_name = require_field(request.doctor_first_name, MISSING)?;
        let doctor_last_name = require_field(request.doctor_last_name, MISSING)?;
        let address = require_field(request.address, MISSING)?;

        validate_appointment_date(appointment_date, Utc::now().date_naive())?;

        let doctor = self
            .matching
            .resolve_doctor(&doctor_first_name, &doctor_last_name, &department, auth_token)
            .await?;

        validate_patient_name(&first_name, "First Name")?;
        validate_patient_name(&last_name, "Last Name")?;
        validate_email_format(&email)?;
        validate_phone(&phone)?;
        validate_doctor_name(&doctor_first_name, "Doctor First Name")?;
        validate_doctor_name(&doctor_last_name, "Doctor Last Name")?;

        let appointment_data = json!({
            "first_name": first_name,
            "last_name": last_name,
            "email": email,
            "phone": phone,
            "dob": dob.format("%Y-%m-%d").to_string(),
            "gender": gender,
            "appointment_date": appointment_date.format("%Y-%m-%d").to_string(),
            "department": department,
            "doctor": {
                "first_name": doctor.first_name,
                "last_name": doctor.last_name,
            },
            "has_visited": request.has_visited.unwrap_or(false),
            "address": address,
            "doctor_id": doctor.id,
            "patient_id": patient_id,
            "status": AppointmentStatus::Pending,
            "created_at": Utc::now().to_rfc3339(),
        });

        let appointment = self.insert_appointment(appointment_data, auth_token).await?;

        info!(
            "Appointment {} booked for patient {} with doctor {}",
            appointment.id, patient_id, appointment.doctor_id
        );

        let (subject, html) = templates::booking_received_email(&appointment);
        mailer
            .send(&appointment.email, &subject, &html)
            .await
            .map_err(|e| AppointmentError::NotificationError(e.to_string()))?;

        Ok(appointment)
    }

    /// Full table scan of appointments, used by the admin dashboard.
    pub async fn get_all_appointments(
        &self,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Fetching all appointments");

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, "/rest/v1/appointments", Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let appointments: Vec<Appointment> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        Ok(appointments)
    }

    /// Overwrite the status of an appointment and notify the patient, plus the
    /// doctor when the new status is `Accepted`.
    pub async fn update_status(
        &self,
        appointment_id: &Uuid,
        request: UpdateStatusRequest,
        auth_token: &str,
        mailer: &MailerClient,
    ) -> Result<Appointment, AppointmentError> {
        let status = require_field(request.status, "Status Is Required!")?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let update_data = json!({
            "status": status,
            "updated_at": Utc::now().to_rfc3339(),
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(update_data),
                Some(headers),
            )
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let row = result
            .into_iter()
            .next()
            .ok_or(AppointmentError::NotFound)?;
        let appointment: Appointment =
            serde_json::from_value(row).map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        info!("Appointment {} status set to {}", appointment.id, status);

        let (subject, html) = templates::patient_status_email(&appointment, status);
        mailer
            .send(&appointment.email, &subject, &html)
            .await
            .map_err(|e| AppointmentError::NotificationError(e.to_string()))?;

        if status == AppointmentStatus::Accepted {
            match self.get_doctor_contact(&appointment.doctor_id, auth_token).await? {
                Some(doctor) if !doctor.email.is_empty() => {
                    let (subject, html) = templates::doctor_assignment_email(&appointment);
                    mailer
                        .send(&doctor.email, &subject, &html)
                        .await
                        .map_err(|e| AppointmentError::NotificationError(e.to_string()))?;
                }
                _ => {
                    warn!(
                        "No email on file for doctor {}, skipping assignment notice",
                        appointment.doctor_id
                    );
                }
            }
        }

        Ok(appointment)
    }

    /// Remove an appointment record entirely.
    pub async fn delete_appointment(
        &self,
        appointment_id: &Uuid,
        auth_token: &str,
    ) -> Result<(), AppointmentError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::DELETE, &path, Some(auth_token), None, Some(headers))
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            return Err(AppointmentError::NotFound);
        }

        info!("Appointment {} deleted", appointment_id);
        Ok(())
    }

    async fn insert_appointment(
        &self,
        appointment_data: Value,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                Some(auth_token),
                Some(appointment_data),
                Some(headers),
            )
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or_else(|| {
            AppointmentError::DatabaseError("Failed to create appointment record".to_string())
        })?;

        serde_json::from_value(row).map_err(|e| AppointmentError::DatabaseError(e.to_string()))
    }

    async fn get_doctor_contact(
        &self,
        doctor_id: &Uuid,
        auth_token: &str,
    ) -> Result<Option<UserAccount>, AppointmentError> {
        let path = format!("/rest/v1/users?id=eq.{}", doctor_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        match result.into_iter().next() {
            None => Ok(None),
            Some(row) => serde_json::from_value(row)
                .map(Some)
                .map_err(|e| AppointmentError::DatabaseError(e.to_string())),
        }
    }
}

// ==============================================================================
// TESTS
// ==============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_appointment_date_rejects_past_dates() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();

        let result = validate_appointment_date(yesterday, today);
        match result {
            Err(AppointmentError::ValidationError(message)) => {
                assert_eq!(message, "Appointment Date Cannot Be In The Past!");
            }
            other => panic!("Expected validation error, got: {:?}", other),
        }
    }

    #[test]
    fn test_validate_appointment_date_allows_today_and_future() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let next_week = NaiveDate::from_ymd_opt(2026, 3, 22).unwrap();

        assert!(validate_appointment_date(today, today).is_ok());
        assert!(validate_appointment_date(next_week, today).is_ok());
    }

    #[test]
    fn test_validate_patient_name_enforces_minimum_length() {
        let result = validate_patient_name("Ra", "First Name");
        match result {
            Err(AppointmentError::ValidationError(message)) => {
                assert_eq!(message, "First Name Must Contain At Least 3 Characters!");
            }
            other => panic!("Expected validation error, got: {:?}", other),
        }

        assert!(validate_patient_name("Ram", "First Name").is_ok());
    }

    #[test]
    fn test_validate_email_rejects_malformed_addresses() {
        let result = validate_email_format("not-an-email");
        match result {
            Err(AppointmentError::ValidationError(message)) => {
                assert_eq!(message, "Provide a valid Email!");
            }
            other => panic!("Expected validation error, got: {:?}", other),
        }
    }

    #[test]
    fn test_validate_phone_requires_exactly_ten_digits() {
        for phone in ["98000", "98000000001", "98000000ab"] {
            let result = validate_phone(phone);
            match result {
                Err(AppointmentError::ValidationError(message)) => {
                    assert_eq!(message, "Phone Number Must Contain Exact 10 Digits!");
                }
                other => panic!("Expected validation error for {}, got: {:?}", phone, other),
            }
        }

        assert!(validate_phone("9800000000").is_ok());
    }

    #[test]
    fn test_validate_doctor_name_has_no_minimum_length() {
        assert!(validate_doctor_name("Ng", "Doctor Last Name").is_ok());

        let result = validate_doctor_name("Dr4", "Doctor First Name");
        match result {
            Err(AppointmentError::ValidationError(message)) => {
                assert_eq!(message, "Doctor First Name must contain only letters");
            }
            other => panic!("Expected validation error, got: {:?}", other),
        }
    }
}
