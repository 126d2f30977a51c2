// ABOUTME: Backend-as-a-service abstraction: record CRUD, list queries, password auth, file URLs
// ABOUTME: Implemented over HTTP by PocketBaseClient and in-process by MemoryStore
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Backend Client Wrapper
//!
//! All persistent state lives in the backend. This module defines the
//! [`RecordStore`] seam the rest of the service talks to, the generic
//! [`Record`] it returns, and the [`connect`] factory that picks an
//! implementation from configuration.

/// Filter expression parser and evaluator
pub mod filter;
/// In-process store with backend-compatible semantics
pub mod memory;
/// HTTP client for a hosted `PocketBase` instance
pub mod pocketbase;

pub use memory::MemoryStore;
pub use pocketbase::PocketBaseClient;

use async_trait::async_trait;
use pressroom_core::constants::messages;
use pressroom_core::errors::AppError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::config::environment::BackendConfig;

/// Page size used when walking a full list
pub const FULL_LIST_BATCH: u32 = 200;

/// URL scheme selecting the in-process store
pub const MEMORY_SCHEME: &str = "memory://";

/// Errors raised by a [`RecordStore`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Record does not exist (or the handle may not see it)
    #[error("record not found")]
    NotFound,
    /// Request failed validation; `fields` names the rejected fields
    #[error("validation failed: {message}")]
    Validation {
        /// Backend message
        message: String,
        /// Names of the fields that failed validation
        fields: Vec<String>,
    },
    /// Credentials or token rejected
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Filter expression could not be parsed
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
    /// Any other non-success status
    #[error("backend returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Backend message
        message: String,
    },
    /// Network failure
    #[error("transport error: {0}")]
    Transport(String),
    /// Response body did not have the expected shape
    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Whether the named field was rejected by validation
    #[must_use]
    pub fn is_field_invalid(&self, field: &str) -> bool {
        matches!(self, Self::Validation { fields, .. } if fields.iter().any(|f| f == field))
    }
}

impl From<BackendError> for AppError {
    fn from(error: BackendError) -> Self {
        let app_error = match &error {
            BackendError::NotFound => Self::not_found(messages::NOT_FOUND),
            BackendError::Validation { message, .. } | BackendError::InvalidFilter(message) => {
                Self::invalid_input(message.clone())
            }
            BackendError::Unauthorized(message) => Self::auth_invalid(message.clone()),
            BackendError::Status { .. }
            | BackendError::Transport(_)
            | BackendError::Decode(_) => Self::external_service("Backend", error.to_string()),
        };
        app_error.with_source(error)
    }
}

/// A backend record: its id plus every other field, including `expand`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Record id
    pub id: String,
    /// All remaining fields
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Raw field value
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Field value as a non-empty string
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Deserialize the whole record into a typed shape
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Decode` when the record does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, BackendError> {
        let value = serde_json::to_value(self).map_err(|e| BackendError::Decode(e.to_string()))?;
        serde_json::from_value(value).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

/// One page of a list query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<T> {
    /// 1-based page number
    pub page: u32,
    /// Requested page size
    pub per_page: u32,
    /// Matching records across all pages
    pub total_items: u64,
    /// Number of pages
    pub total_pages: u32,
    /// Records on this page
    pub items: Vec<T>,
}

/// Query options shared by every read and write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Filter expression
    pub filter: Option<String>,
    /// Sort expression, e.g. `-updated,created`
    pub sort: Option<String>,
    /// Relation expansion expression
    pub expand: Option<String>,
}

impl QueryOptions {
    /// Empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter expression
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set the sort expression
    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Set the expansion expression
    #[must_use]
    pub fn expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = Some(expand.into());
        self
    }
}

/// Successful password login or token refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Session token
    pub token: String,
    /// Authenticated user record
    pub record: Record,
}

/// Backend health probe result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendHealth {
    /// Status code reported by the backend
    pub code: u16,
    /// Human-readable status
    pub message: String,
}

/// Record storage and authentication provided by the backend
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short implementation name for logs
    fn name(&self) -> &'static str;

    /// Fetch a single record by id
    async fn get_one(
        &self,
        collection: &str,
        id: &str,
        options: &QueryOptions,
    ) -> Result<Record, BackendError>;

    /// Fetch one page of records
    async fn get_list(
        &self,
        collection: &str,
        page: u32,
        per_page: u32,
        options: &QueryOptions,
    ) -> Result<ListResult<Record>, BackendError>;

    /// Create a record from a JSON object
    async fn create(
        &self,
        collection: &str,
        body: Value,
        options: &QueryOptions,
    ) -> Result<Record, BackendError>;

    /// Patch a record with the fields present in `body`
    async fn update(
        &self,
        collection: &str,
        id: &str,
        body: Value,
        options: &QueryOptions,
    ) -> Result<Record, BackendError>;

    /// Delete a record, cascading to dependent records
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, BackendError>;

    /// Password login against an auth collection
    async fn auth_with_password(
        &self,
        collection: &str,
        identity: &str,
        password: &str,
    ) -> Result<AuthResponse, BackendError>;

    /// Validate a session token and return its user
    async fn auth_refresh(&self, collection: &str, token: &str)
        -> Result<AuthResponse, BackendError>;

    /// Backend liveness
    async fn health(&self) -> Result<BackendHealth, BackendError>;

    /// Public URL of a file attached to a record
    fn file_url(&self, collection: &str, record_id: &str, filename: &str) -> String;

    /// Fetch every matching record, walking pages of [`FULL_LIST_BATCH`]
    async fn get_full_list(
        &self,
        collection: &str,
        options: &QueryOptions,
    ) -> Result<Vec<Record>, BackendError> {
        let mut records = Vec::new();
        let mut page = 1;
        loop {
            let result = self
                .get_list(collection, page, FULL_LIST_BATCH, options)
                .await?;
            let fetched = result.items.len();
            records.extend(result.items);
            if fetched < FULL_LIST_BATCH as usize || page >= result.total_pages {
                return Ok(records);
            }
            page += 1;
        }
    }

    /// First record matching `filter`
    async fn get_first_list_item(
        &self,
        collection: &str,
        filter: &str,
        options: &QueryOptions,
    ) -> Result<Record, BackendError> {
        let options = options.clone().filter(filter);
        self.get_list(collection, 1, 1, &options)
            .await?
            .items
            .into_iter()
            .next()
            .ok_or(BackendError::NotFound)
    }
}

/// Build the public file URL for a record attachment
#[must_use]
pub fn build_file_url(base_url: &str, collection: &str, record_id: &str, filename: &str) -> String {
    format!(
        "{}/api/files/{collection}/{record_id}/{filename}",
        base_url.trim_end_matches('/')
    )
}

/// Backend record ids are short alphanumeric strings; anything else cannot exist
#[must_use]
pub fn is_valid_record_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 64 && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Open the record store selected by configuration
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn connect(config: &BackendConfig) -> Result<Arc<dyn RecordStore>, AppError> {
    if config.url.starts_with(MEMORY_SCHEME) {
        info!("Using in-memory record store");
        return Ok(Arc::new(MemoryStore::new(config.public_url.clone())));
    }

    info!(url = %config.url, "Using PocketBase record store");
    Ok(Arc::new(PocketBaseClient::new(config)?))
}
