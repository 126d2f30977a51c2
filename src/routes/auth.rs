// ABOUTME: Account routes: join with email and nickname, login with email and password
// ABOUTME: Only verified accounts receive a session token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use pressroom_core::constants::{collections, fields, messages};
use pressroom_core::errors::AppError;
use pressroom_core::models::{User, UserRecord};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::backend::{BackendError, QueryOptions};
use crate::logging::AppLogger;
use crate::resources::ServerResources;

/// Join form
#[derive(Debug, Clone, Deserialize)]
pub struct JoinRequest {
    /// Login email
    pub email: String,
    /// Public display name
    pub nickname: String,
    /// Password
    pub password: String,
    /// Password repeated
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: String,
    /// Terms of service accepted
    #[serde(default)]
    pub terms: bool,
}

/// Login form
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Password
    pub password: String,
}

/// Successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Session token for the `Authorization: Bearer` header
    pub token: String,
    /// The logged-in user
    pub user: User,
}

/// Account routes implementation
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all account routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/join", post(Self::join))
            .route("/api/auth/login", post(Self::login))
            .with_state(resources)
    }

    /// Create an unverified account
    async fn join(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<JoinRequest>,
    ) -> Result<Response, AppError> {
        if !request.terms {
            return Err(AppError::invalid_input("Terms of service must be accepted"));
        }

        let body = json!({
            (fields::EMAIL): request.email.trim(),
            (fields::NICKNAME): request.nickname.trim(),
            "password": request.password,
            "passwordConfirm": request.password_confirm,
            "terms": request.terms,
        });

        let record = match resources
            .store
            .create(collections::USERS, body, &QueryOptions::new())
            .await
        {
            Ok(record) => record,
            Err(e) => {
                AppLogger::log_auth_event(&request.email, "join", false);
                return Err(Self::join_error(e));
            }
        };

        let user: UserRecord = record.decode()?;
        AppLogger::log_auth_event(&request.email, "join", true);
        Ok((StatusCode::CREATED, Json(json!({ "user": User::from(&user) }))).into_response())
    }

    /// Exchange credentials for a session token
    async fn login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let auth = match resources
            .store
            .auth_with_password(collections::USERS, &request.email, &request.password)
            .await
        {
            Ok(auth) => auth,
            Err(e) => {
                warn!("Login rejected by backend: {}", e);
                AppLogger::log_auth_event(&request.email, "login", false);
                return Err(AppError::auth_invalid(messages::LOGIN_FAILED));
            }
        };

        let user: UserRecord = auth.record.decode()?;
        if !user.verified {
            AppLogger::log_auth_event(&request.email, "login", false);
            return Err(AppError::auth_invalid(messages::LOGIN_FAILED));
        }

        AppLogger::log_auth_event(&request.email, "login", true);
        let response = LoginResponse {
            token: auth.token,
            user: User::from(&user),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    fn join_error(error: BackendError) -> AppError {
        if error.is_field_invalid(fields::EMAIL) {
            return AppError::invalid_input(messages::EMAIL_TAKEN).with_source(error);
        }
        if error.is_field_invalid(fields::NICKNAME) {
            return AppError::invalid_input(messages::NICKNAME_TAKEN).with_source(error);
        }
        error.into()
    }
}
