// libs/appointment-cell/src/services/matching.rs
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use identity_cell::models::UserAccount;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::AppointmentError;

pub struct DoctorMatchingService {
    supabase: SupabaseClient,
}

impl DoctorMatchingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Resolve the unique doctor for a (first name, last name, department)
    /// triple. Matching is exact and case-sensitive, no fuzzy fallback.
    pub async fn resolve_doctor(
        &self,
        first_name: &str,
        last_name: &str,
        department: &str,
        auth_token: &str,
    ) -> Result<UserAccount, AppointmentError> {
        debug!(
            "Resolving doctor {} {} in department {}",
            first_name, last_name, department
        );

        let path = format!(
            "/rest/v1/users?role=eq.Doctor&first_name=eq.{}&last_name=eq.{}&department=eq.{}",
            urlencoding::encode(first_name),
            urlencoding::encode(last_name),
            urlencoding::encode(department)
        );

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            return Err(AppointmentError::DoctorNotFound);
        }
        if result.len() > 1 {
            warn!(
                "Doctor triple ({} {}, {}) matched {} records",
                first_name,
                last_name,
                department,
                result.len()
            );
            return Err(AppointmentError::DoctorAmbiguous);
        }

        let doctor: UserAccount = serde_json::from_value(result[0].clone())
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        debug!("Doctor resolved to ID: {}", doctor.id);
        Ok(doctor)
    }
}
