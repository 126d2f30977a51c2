// ABOUTME: OpenAI text completion client with the fixed article generation parameters
// ABOUTME: Reports failures to the notification channel before mapping them to CompletionError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use pressroom_core::constants::completion;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, instrument};

use super::{format_prompt, CompletionError, CompletionProvider};
use crate::config::environment::CompletionConfig;
use crate::notifications::EventNotifier;
use crate::utils::http_client;

const NOTIFY_ORIGIN: &str = "llm::completion: complete";

/// `POST /completions` request body
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: String,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: String,
}

/// Client for the hosted text completion endpoint
pub struct OpenAiCompletionClient {
    client: Client,
    api_key: String,
    api_base: String,
    notifier: Arc<dyn EventNotifier>,
}

impl OpenAiCompletionClient {
    /// Create a client; failures are reported to `notifier`
    #[must_use]
    pub fn new(config: &CompletionConfig, notifier: Arc<dyn EventNotifier>) -> Self {
        Self {
            client: http_client::completion_client(),
            api_key: config.api_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_owned(),
            notifier,
        }
    }

    async fn request(&self, prompt: &str) -> Result<String, Failure> {
        let body = CompletionRequest {
            model: completion::CURRENT_MODEL,
            prompt: format_prompt(prompt),
            temperature: completion::TEMPERATURE,
            max_tokens: completion::MAX_TOKENS,
            top_p: completion::TOP_P,
            frequency_penalty: completion::FREQUENCY_PENALTY,
            presence_penalty: completion::PRESENCE_PENALTY,
        };

        let response = self
            .client
            .post(format!("{}/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Failure::new(None, format!("Failed to connect: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Failure::new(None, format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let excerpt: String = text.chars().take(200).collect();
            return Err(Failure::new(
                Some(status.as_u16()),
                format!("API error ({status}): {excerpt}"),
            ));
        }

        let parsed: CompletionResponse = serde_json::from_str(&text)
            .map_err(|e| Failure::new(None, format!("Failed to parse response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| Failure::new(None, "Response contained no choices".to_owned()))
    }
}

/// Failure detail kept for the notification, reduced to a kind afterwards
struct Failure {
    status: Option<u16>,
    detail: String,
}

impl Failure {
    const fn new(status: Option<u16>, detail: String) -> Self {
        Self { status, detail }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletionClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    #[instrument(skip(self, prompt), fields(model = completion::CURRENT_MODEL))]
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        debug!("Sending completion request");

        match self.request(prompt).await {
            Ok(text) => {
                debug!(chars = text.len(), "Completion received");
                Ok(text)
            }
            Err(failure) => {
                error!(status = ?failure.status, "Completion failed: {}", failure.detail);
                self.notifier.notify(NOTIFY_ORIGIN, &failure.detail).await;
                Err(failure
                    .status
                    .map_or(CompletionError::Unknown, CompletionError::from_status))
            }
        }
    }
}
