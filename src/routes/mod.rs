// ABOUTME: Route module organization for the Pressroom HTTP endpoints
// ABOUTME: Resolves the requesting user from a bearer session token for every domain module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the Pressroom server
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to [`crate::articles::ArticleService`] or the
//! record store.

/// Article page loaders and actions
pub mod articles;
/// Account join and login
pub mod auth;
/// Health check and backend status
pub mod health;

pub use articles::ArticleRoutes;
pub use auth::{AuthRoutes, JoinRequest, LoginRequest, LoginResponse};
pub use health::HealthRoutes;

use axum::http::HeaderMap;
use pressroom_core::constants::collections;
use pressroom_core::errors::AppError;
use pressroom_core::models::UserRecord;
use tracing::debug;

use crate::resources::ServerResources;
use crate::utils::auth::extract_bearer_token;

/// User resolved from a valid session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// User record id
    pub id: String,
    /// Display name
    pub nickname: Option<String>,
    /// Whether the account is verified
    pub verified: bool,
}

impl From<UserRecord> for AuthenticatedUser {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            nickname: record.nickname,
            verified: record.verified,
        }
    }
}

/// Resolve the requester from the `Authorization: Bearer` header
///
/// A missing, malformed, or rejected token yields `None`; the request is then
/// served as anonymous.
pub async fn authenticate(
    headers: &HeaderMap,
    resources: &ServerResources,
) -> Option<AuthenticatedUser> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token)?;

    let auth = match resources.store.auth_refresh(collections::USERS, token).await {
        Ok(auth) => auth,
        Err(e) => {
            debug!("Session token rejected, treating request as anonymous: {}", e);
            return None;
        }
    };

    match auth.record.decode::<UserRecord>() {
        Ok(user) => Some(user.into()),
        Err(e) => {
            debug!("Session user record could not be decoded: {}", e);
            None
        }
    }
}

/// Like [`authenticate`] but anonymous requests are rejected
///
/// # Errors
///
/// Returns `AuthRequired` (401) when no valid session token is present.
pub async fn require_user(
    headers: &HeaderMap,
    resources: &ServerResources,
) -> Result<AuthenticatedUser, AppError> {
    authenticate(headers, resources)
        .await
        .ok_or_else(AppError::auth_required)
}
