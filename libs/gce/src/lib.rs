//! # iapssh-gce
//!
//! Minimal Google Compute Engine API client for iapssh.
//!
//! Covers the subset the tool needs: service-account authentication via
//! the signed-JWT bearer grant, and the zonal `instances.list` operation
//! with server-side filtering and page-token iteration.

mod auth;
mod error;
mod types;

pub use auth::{fetch_access_token, AccessToken, ServiceAccountKey, CLOUD_PLATFORM_SCOPE};
pub use error::GceError;
pub use types::{Instance, InstanceList};

use tracing::debug;

/// Default Compute Engine API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://compute.googleapis.com/compute/v1";

/// Client for the Compute Engine REST API.
#[derive(Debug, Clone)]
pub struct ComputeClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ComputeClient {
    /// Create a client from an already-acquired access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Create a client against a non-default endpoint (used by tests).
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Authenticate with a service-account key and build a client scoped
    /// to the cloud-platform permission.
    pub async fn from_service_account_key(key: &ServiceAccountKey) -> Result<Self, GceError> {
        let http = reqwest::Client::new();
        let token = auth::fetch_access_token(&http, key, CLOUD_PLATFORM_SCOPE).await?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.access_token,
        })
    }

    /// List instances in a zone, following `nextPageToken` until the
    /// listing is exhausted. Items come back in page-then-item order.
    pub async fn list_instances(
        &self,
        project: &str,
        zone: &str,
        filter: Option<&str>,
    ) -> Result<Vec<Instance>, GceError> {
        let endpoint = format!(
            "{}/projects/{}/zones/{}/instances",
            self.base_url, project, zone
        );

        let mut instances = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.http.get(&endpoint).bearer_auth(&self.token);
            if let Some(filter) = filter {
                request = request.query(&[("filter", filter)]);
            }
            if let Some(token) = page_token.as_deref() {
                request = request.query(&[("pageToken", token)]);
            }

            debug!(%endpoint, page_token = ?page_token, "listing instances");

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(GceError::Api {
                    endpoint,
                    status: status.as_u16(),
                    body,
                });
            }

            let page: InstanceList = response.json().await?;
            instances.extend(page.items);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(instances)
    }
}
