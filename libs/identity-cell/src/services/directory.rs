// libs/identity-cell/src/services/directory.rs
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{IdentityError, UserAccount};

pub struct DirectoryService {
    supabase: SupabaseClient,
}

impl DirectoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// All Doctor accounts, used by the public doctor listing
    pub async fn get_all_doctors(
        &self,
        auth_token: Option<&str>,
    ) -> Result<Vec<UserAccount>, IdentityError> {
        debug!("Fetching all doctor accounts");

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, "/rest/v1/users?role=eq.Doctor", auth_token, None)
            .await
            .map_err(|e| IdentityError::DatabaseError(e.to_string()))?;

        let doctors: Vec<UserAccount> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| IdentityError::DatabaseError(e.to_string()))?;

        Ok(doctors)
    }

    pub async fn get_user(
        &self,
        user_id: &str,
        auth_token: &str,
    ) -> Result<UserAccount, IdentityError> {
        debug!("Fetching user account: {}", user_id);

        let path = format!("/rest/v1/users?id=eq.{}", user_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| IdentityError::DatabaseError(e.to_string()))?;

        match result.into_iter().next() {
            None => Err(IdentityError::NotFound),
            Some(row) => serde_json::from_value(row)
                .map_err(|e| IdentityError::DatabaseError(e.to_string())),
        }
    }
}
