// ABOUTME: External error notification channel (Slack webhook or log-only)
// ABOUTME: Failures here are logged and swallowed so they never mask the original error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Event Notifications
//!
//! Operational errors (completion failures, backend outages on the home page)
//! are pushed to a chat channel so someone notices. Without a webhook the
//! notifier only writes an `error!` event.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::config::environment::NotificationConfig;
use crate::utils::http_client;

/// Sink for operational error events
#[async_trait]
pub trait EventNotifier: Send + Sync {
    /// Report an event; `origin` names the code path that raised it
    async fn notify(&self, origin: &str, message: &str);
}

/// Writes events to the log only
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl EventNotifier for LogNotifier {
    async fn notify(&self, origin: &str, message: &str) {
        error!(origin, "{}", message);
    }
}

/// Posts events to a Slack incoming webhook
pub struct SlackNotifier {
    client: Client,
    webhook_url: String,
}

impl SlackNotifier {
    /// Create a notifier posting to `webhook_url`
    #[must_use]
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            client: http_client::shared_client().clone(),
            webhook_url: webhook_url.into(),
        }
    }
}

#[async_trait]
impl EventNotifier for SlackNotifier {
    async fn notify(&self, origin: &str, message: &str) {
        error!(origin, "{}", message);

        let payload = json!({ "text": format!("*{origin}*\n```{message}```") });
        match self.client.post(&self.webhook_url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(origin, "Event delivered to Slack");
            }
            Ok(response) => warn!(status = %response.status(), "Slack webhook rejected event"),
            Err(e) => warn!("Failed to deliver event to Slack: {}", e),
        }
    }
}

/// Pick the notifier for the configured channel
#[must_use]
pub fn from_config(config: &NotificationConfig) -> Arc<dyn EventNotifier> {
    match &config.slack_webhook_url {
        Some(url) => Arc::new(SlackNotifier::new(url.clone())),
        None => Arc::new(LogNotifier),
    }
}
