// ABOUTME: PocketBase HTTP client implementing RecordStore over the records REST API
// ABOUTME: Authenticates lazily as admin and caches the token for the process lifetime
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! `PocketBase` client
//!
//! Endpoints used:
//!
//! - `GET/POST /api/collections/{collection}/records`
//! - `GET/PATCH/DELETE /api/collections/{collection}/records/{id}`
//! - `POST /api/collections/{collection}/auth-with-password`
//! - `POST /api/collections/{collection}/auth-refresh`
//! - `POST /api/admins/auth-with-password`
//! - `GET /api/health`

use async_trait::async_trait;
use pressroom_core::errors::AppError;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, error, instrument, warn};

use super::{
    build_file_url, is_valid_record_id, AuthResponse, BackendError, BackendHealth, ListResult,
    QueryOptions, Record, RecordStore,
};
use crate::config::environment::BackendConfig;
use crate::utils::http_client;

/// Error body returned by `PocketBase` for non-success responses
#[derive(Debug, Default, Deserialize)]
struct PocketBaseErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct AdminAuthResponse {
    token: String,
}

#[derive(Debug, Clone)]
struct AdminCredentials {
    email: String,
    password: String,
}

/// HTTP client for a `PocketBase` instance
pub struct PocketBaseClient {
    client: Client,
    base_url: String,
    public_url: String,
    admin: Option<AdminCredentials>,
    admin_token: RwLock<Option<String>>,
}

impl PocketBaseClient {
    /// Create a client from backend configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the base URL is empty.
    pub fn new(config: &BackendConfig) -> Result<Self, AppError> {
        let base_url = config.url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            return Err(AppError::config("POCKETBASE_URL must not be empty"));
        }

        let admin = match (&config.admin_email, &config.admin_password) {
            (Some(email), Some(password)) => Some(AdminCredentials {
                email: email.clone(),
                password: password.clone(),
            }),
            _ => None,
        };

        Ok(Self {
            client: http_client::backend_client(),
            base_url,
            public_url: config.public_url.trim_end_matches('/').to_owned(),
            admin,
            admin_token: RwLock::new(None),
        })
    }

    fn records_url(&self, collection: &str) -> String {
        format!("{}/api/collections/{collection}/records", self.base_url)
    }

    fn record_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{id}", self.records_url(collection))
    }

    /// Admin token, authenticating on first use
    async fn admin_token(&self) -> Result<Option<String>, BackendError> {
        let Some(credentials) = &self.admin else {
            return Ok(None);
        };

        if let Some(token) = self.admin_token.read().await.clone() {
            return Ok(Some(token));
        }

        debug!("Authenticating backend admin handle");
        let request = self
            .client
            .post(format!("{}/api/admins/auth-with-password", self.base_url))
            .json(&json!({
                "identity": credentials.email,
                "password": credentials.password,
            }));
        let body = Self::execute(request).await?;
        let auth: AdminAuthResponse =
            serde_json::from_value(body).map_err(|e| BackendError::Decode(e.to_string()))?;

        *self.admin_token.write().await = Some(auth.token.clone());
        Ok(Some(auth.token))
    }

    /// Send a request using the admin handle
    async fn send_as_admin(&self, request: RequestBuilder) -> Result<Value, BackendError> {
        let request = match self.admin_token().await? {
            Some(token) => request.header("Authorization", token),
            None => request,
        };

        let result = Self::execute(request).await;
        if matches!(result, Err(BackendError::Unauthorized(_))) && self.admin.is_some() {
            warn!("Backend rejected cached admin token; it will be re-established");
            *self.admin_token.write().await = None;
        }
        result
    }

    async fn execute(request: RequestBuilder) -> Result<Value, BackendError> {
        let response = request.send().await.map_err(|e| {
            error!("Failed to reach backend: {}", e);
            BackendError::Transport(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse backend response: {}", e);
            BackendError::Decode(e.to_string())
        })
    }

    fn parse_error_response(status: StatusCode, body: &str) -> BackendError {
        let parsed: PocketBaseErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = if parsed.message.is_empty() {
            body.chars().take(200).collect()
        } else {
            parsed.message
        };

        match status {
            StatusCode::NOT_FOUND => BackendError::NotFound,
            StatusCode::BAD_REQUEST => BackendError::Validation {
                message,
                fields: parsed.data.keys().cloned().collect(),
            },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized(message),
            other => BackendError::Status {
                status: other.as_u16(),
                message,
            },
        }
    }

    fn decode_record(value: Value) -> Result<Record, BackendError> {
        serde_json::from_value(value).map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn expand_query(options: &QueryOptions) -> Vec<(&'static str, String)> {
        options
            .expand
            .iter()
            .map(|expand| ("expand", expand.clone()))
            .collect()
    }
}

#[async_trait]
impl RecordStore for PocketBaseClient {
    fn name(&self) -> &'static str {
        "pocketbase"
    }

    #[instrument(skip(self, options), fields(backend = "pocketbase"))]
    async fn get_one(
        &self,
        collection: &str,
        id: &str,
        options: &QueryOptions,
    ) -> Result<Record, BackendError> {
        if !is_valid_record_id(id) {
            return Err(BackendError::NotFound);
        }
        let request = self
            .client
            .get(self.record_url(collection, id))
            .query(&Self::expand_query(options));
        Self::decode_record(self.send_as_admin(request).await?)
    }

    #[instrument(skip(self, options), fields(backend = "pocketbase", filter = ?options.filter))]
    async fn get_list(
        &self,
        collection: &str,
        page: u32,
        per_page: u32,
        options: &QueryOptions,
    ) -> Result<ListResult<Record>, BackendError> {
        let mut query = vec![("page", page.to_string()), ("perPage", per_page.to_string())];
        if let Some(filter) = &options.filter {
            query.push(("filter", filter.clone()));
        }
        if let Some(sort) = &options.sort {
            query.push(("sort", sort.clone()));
        }
        query.extend(Self::expand_query(options));

        let request = self.client.get(self.records_url(collection)).query(&query);
        let body = self.send_as_admin(request).await?;
        serde_json::from_value(body).map_err(|e| BackendError::Decode(e.to_string()))
    }

    #[instrument(skip(self, body, options), fields(backend = "pocketbase"))]
    async fn create(
        &self,
        collection: &str,
        body: Value,
        options: &QueryOptions,
    ) -> Result<Record, BackendError> {
        let request = self
            .client
            .post(self.records_url(collection))
            .query(&Self::expand_query(options))
            .json(&body);
        Self::decode_record(self.send_as_admin(request).await?)
    }

    #[instrument(skip(self, body, options), fields(backend = "pocketbase"))]
    async fn update(
        &self,
        collection: &str,
        id: &str,
        body: Value,
        options: &QueryOptions,
    ) -> Result<Record, BackendError> {
        if !is_valid_record_id(id) {
            return Err(BackendError::NotFound);
        }
        let request = self
            .client
            .request(Method::PATCH, self.record_url(collection, id))
            .query(&Self::expand_query(options))
            .json(&body);
        Self::decode_record(self.send_as_admin(request).await?)
    }

    #[instrument(skip(self), fields(backend = "pocketbase"))]
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, BackendError> {
        if !is_valid_record_id(id) {
            return Err(BackendError::NotFound);
        }
        let request = self.client.delete(self.record_url(collection, id));
        self.send_as_admin(request).await?;
        Ok(true)
    }

    #[instrument(skip(self, password), fields(backend = "pocketbase"))]
    async fn auth_with_password(
        &self,
        collection: &str,
        identity: &str,
        password: &str,
    ) -> Result<AuthResponse, BackendError> {
        let request = self
            .client
            .post(format!(
                "{}/api/collections/{collection}/auth-with-password",
                self.base_url
            ))
            .json(&json!({ "identity": identity, "password": password }));

        // Failed logins come back as 400; callers only care that it was rejected
        let body = Self::execute(request).await.map_err(|e| match e {
            BackendError::Validation { message, .. } => BackendError::Unauthorized(message),
            other => other,
        })?;
        serde_json::from_value(body).map_err(|e| BackendError::Decode(e.to_string()))
    }

    #[instrument(skip(self, token), fields(backend = "pocketbase"))]
    async fn auth_refresh(
        &self,
        collection: &str,
        token: &str,
    ) -> Result<AuthResponse, BackendError> {
        let request = self
            .client
            .post(format!(
                "{}/api/collections/{collection}/auth-refresh",
                self.base_url
            ))
            .header("Authorization", token);
        let body = Self::execute(request).await?;
        serde_json::from_value(body).map_err(|e| BackendError::Decode(e.to_string()))
    }

    #[instrument(skip(self), fields(backend = "pocketbase"))]
    async fn health(&self) -> Result<BackendHealth, BackendError> {
        let request = self.client.get(format!("{}/api/health", self.base_url));
        let body = Self::execute(request).await?;
        serde_json::from_value(body).map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn file_url(&self, collection: &str, record_id: &str, filename: &str) -> String {
        build_file_url(&self.public_url, collection, record_id, filename)
    }
}
