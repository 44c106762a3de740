//! HTTP client for the catalog API.
//!
//! Wraps `reqwest` with the action/params envelope, the date-scoped `X-Auth`
//! header and the bounded retry policy in [`crate::retry`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use vitrine_core::{AppConfig, FilterValue, Product};

use crate::api::CatalogApi;
use crate::auth::{current_auth_token, AUTH_HEADER};
use crate::error::ClientError;
use crate::retry::retry_with_backoff;
use crate::types::{ApiRequest, ApiResponse, FieldsParams, FilterCriteria, IdsParams, ItemsParams};

/// Transport and retry knobs for [`CatalogClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Base delay for exponential back-off between attempts.
    pub backoff_base_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "vitrine/0.1 (catalog-browser)".to_owned(),
            max_retries: 2,
            backoff_base_ms: 250,
        }
    }
}

impl ClientSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.client_max_retries,
            backoff_base_ms: config.client_backoff_base_ms,
        }
    }
}

/// Client for the catalog API.
///
/// Holds the HTTP client, shared secret and endpoint. Construct one per
/// process and hand it to the orchestrator as an `Arc<dyn CatalogApi>`.
pub struct CatalogClient {
    client: Client,
    password: String,
    endpoint: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("password", &"[redacted]")
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Creates a client for the endpoint at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn new(
        base_url: &str,
        password: &str,
        settings: &ClientSettings,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(settings.user_agent.as_str())
            .build()?;

        // The API lives at the root path; normalise to exactly one trailing
        // slash so the endpoint is stable regardless of how it was configured.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            password: password.to_owned(),
            endpoint,
            max_retries: settings.max_retries,
            backoff_base_ms: settings.backoff_base_ms,
        })
    }

    /// Creates a client from loaded application configuration.
    ///
    /// # Errors
    ///
    /// See [`CatalogClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.api_url,
            &config.api_password,
            &ClientSettings::from_app_config(config),
        )
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends `action` with `params`, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ExhaustedRetries`] once every attempt failed.
    async fn call<P, T>(&self, action: &'static str, params: &P) -> Result<T, ClientError>
    where
        P: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        retry_with_backoff(action, self.max_retries, self.backoff_base_ms, || {
            self.send_once(action, params)
        })
        .await
    }

    /// One POST round trip: fresh auth token, 2xx check, envelope decode.
    async fn send_once<P, T>(&self, action: &'static str, params: &P) -> Result<T, ClientError>
    where
        P: Serialize + Sync,
        T: DeserializeOwned,
    {
        let body = ApiRequest { action, params };
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(AUTH_HEADER, current_auth_token(&self.password))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                action,
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let envelope: ApiResponse<T> =
            serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
                context: format!("{action} response"),
                source: e,
            })?;
        Ok(envelope.result)
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn list_ids(
        &self,
        offset: Option<usize>,
        limit: Option<usize>,
    ) -> Result<Vec<String>, ClientError> {
        self.call("get_ids", &IdsParams { offset, limit }).await
    }

    async fn fetch_items(&self, ids: &[String]) -> Result<Vec<Product>, ClientError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.call("get_items", &ItemsParams { ids }).await
    }

    async fn list_fields(&self) -> Result<Vec<String>, ClientError> {
        let params = FieldsParams {
            field: None,
            offset: None,
            limit: None,
        };
        self.call("get_fields", &params).await
    }

    async fn list_field_values(
        &self,
        field: &str,
        offset: Option<usize>,
        limit: Option<usize>,
    ) -> Result<Vec<Option<FilterValue>>, ClientError> {
        let params = FieldsParams {
            field: Some(field),
            offset,
            limit,
        };
        self.call("get_fields", &params).await
    }

    async fn filter_ids(&self, criteria: &FilterCriteria) -> Result<Vec<String>, ClientError> {
        self.call("filter", criteria).await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
