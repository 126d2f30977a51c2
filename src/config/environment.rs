// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Reads bind address, backend, completion, notification, and CORS settings from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use tracing::info;

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 8080;
/// Default bind host
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default backend base URL
pub const DEFAULT_POCKETBASE_URL: &str = "http://127.0.0.1:8090";
/// Default completion API base URL
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Environment type for deployment-specific behavior
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Is this a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Backend-as-a-service connection settings
#[derive(Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL, or `memory://` for the in-process store
    pub url: String,
    /// Base used when building public file URLs
    pub public_url: String,
    /// Admin email for the privileged handle
    pub admin_email: Option<String>,
    /// Admin password for the privileged handle
    pub admin_password: Option<String>,
}

impl BackendConfig {
    /// Settings for the in-process store
    #[must_use]
    pub fn memory() -> Self {
        Self {
            url: "memory://".to_owned(),
            public_url: DEFAULT_POCKETBASE_URL.to_owned(),
            admin_email: None,
            admin_password: None,
        }
    }

    /// Whether admin credentials are configured
    #[must_use]
    pub const fn has_admin_credentials(&self) -> bool {
        self.admin_email.is_some() && self.admin_password.is_some()
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("public_url", &self.public_url)
            .field("admin_email", &self.admin_email)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Completion provider settings
#[derive(Clone, PartialEq, Eq)]
pub struct CompletionConfig {
    /// Secret API key
    pub api_key: String,
    /// API base URL, e.g. `https://api.openai.com/v1`
    pub api_base: String,
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// External notification channel settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationConfig {
    /// Slack incoming webhook; absent means log-only
    pub slack_webhook_url: Option<String>,
}

/// CORS settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// Allowed origins, `*` for any
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_owned()],
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Backend connection
    pub backend: BackendConfig,
    /// Completion provider
    pub completion: CompletionConfig,
    /// Notification channel
    pub notifications: NotificationConfig,
    /// CORS policy
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is missing or `HTTP_PORT` is not a port number.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let http_port = env_var_or("HTTP_PORT", &DEFAULT_HTTP_PORT.to_string())
            .parse()
            .context("Invalid HTTP_PORT value")?;

        let url = env_var_or("POCKETBASE_URL", DEFAULT_POCKETBASE_URL);
        let public_url = optional_env("POCKETBASE_PUBLIC_URL").unwrap_or_else(|| url.clone());

        let config = Self {
            host: env_var_or("HOST", DEFAULT_HOST),
            http_port,
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            backend: BackendConfig {
                url,
                public_url,
                admin_email: optional_env("POCKETBASE_ADMIN_EMAIL"),
                admin_password: optional_env("POCKETBASE_ADMIN_PASSWORD"),
            },
            completion: CompletionConfig {
                api_key: optional_env("OPENAI_API_KEY")
                    .context("OPENAI_API_KEY environment variable is required")?,
                api_base: env_var_or("OPENAI_API_BASE", DEFAULT_OPENAI_API_BASE),
            },
            notifications: NotificationConfig {
                slack_webhook_url: optional_env("SLACK_WEBHOOK_URL"),
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&env_var_or("CORS_ALLOWED_ORIGINS", "*")),
            },
        };

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// One-line summary without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Pressroom Configuration: env={} http={}:{} backend={} admin_auth={} completion_api={} slack={} cors={}",
            self.environment,
            self.host,
            self.http_port,
            self.backend.url,
            self.backend.has_admin_credentials(),
            self.completion.api_base,
            self.notifications.slack_webhook_url.is_some(),
            self.cors.allowed_origins.join(","),
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
