//! Supabase GoTrue admin API client.

use std::time::Duration;

use async_trait::async_trait;
use auth_audit_common::AdminUsersResponse;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};

use super::{FetchedUsers, UserDirectory};
use crate::config::Config;
use crate::error::{FetchError, Result};

const ADMIN_USERS_PATH: &str = "/auth/v1/admin/users";

/// Client for the provider's admin users endpoint.
///
/// Authenticates with the service-role key, sent both as bearer token and
/// as the `apikey` header.
pub struct SupabaseAdminClient {
    http_client: Client,
    base_url: String,
    service_role_key: String,
}

impl SupabaseAdminClient {
    pub fn new(config: &Config) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Same as [`new`](Self::new) but every request times out after `timeout`.
    pub fn with_timeout(config: &Config, timeout: Duration) -> std::result::Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(config, client))
    }

    fn with_client(config: &Config, http_client: Client) -> Self {
        Self {
            http_client,
            base_url: config.base_url.clone(),
            service_role_key: config.service_role_key.clone(),
        }
    }

    pub fn users_url(&self) -> String {
        format!("{}{}", self.base_url, ADMIN_USERS_PATH)
    }
}

#[async_trait]
impl UserDirectory for SupabaseAdminClient {
    fn provider_name(&self) -> &'static str {
        "supabase"
    }

    async fn list_users(&self) -> Result<FetchedUsers> {
        let url = self.users_url();
        tracing::debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.service_role_key)
            .header("apikey", &self.service_role_key)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        tracing::info!(status = %status.as_u16(), "Admin users response");

        if status != StatusCode::OK {
            let body = response.text().await?;
            return Err(FetchError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let payload: AdminUsersResponse = response.json().await?;
        tracing::info!("Fetched {} users", payload.users.len());

        Ok(FetchedUsers {
            status: status.as_u16(),
            users: payload.users,
        })
    }
}
