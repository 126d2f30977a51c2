// ABOUTME: Article generation workflow: draft, prompt message, completion, parsed article fields
// ABOUTME: Completion failures surface as typed 429/503/500 errors; storage failures as 502
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pressroom_core::errors::{AppError, AppResult};
use pressroom_core::models::{Article, ArticlePromptShape, ArticleStatus, MessageRole};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::{ArticleService, ArticleUpdate};
use crate::logging::AppLogger;

/// Generation form input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Free-text prompt typed by the user
    pub prompt: String,
    /// Category to file the article under; defaults to the first model keyword
    #[serde(default)]
    pub category: Option<String>,
}

/// Extract the article object from raw completion text
///
/// Only the outermost `{ ... }` span is parsed. `None` when it does not
/// match [`ArticlePromptShape`] or the headline is blank.
#[must_use]
pub fn parse_completion(text: &str) -> Option<ArticlePromptShape> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }

    let shape: ArticlePromptShape = serde_json::from_str(&text[start..=end]).ok()?;
    if shape.headline.trim().is_empty() {
        return None;
    }
    Some(shape)
}

impl ArticleService {
    /// Generate a draft article for `requester` from a prompt
    ///
    /// The draft and both messages are kept even when a later step fails.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a blank prompt
    /// - the completion error (429, 503, or 500) when generation fails
    /// - `ExternalServiceError` when the backend rejects a write or the model
    ///   output does not have the requested shape
    #[instrument(skip(self, request), fields(user.id = %requester))]
    pub async fn generate_article(
        &self,
        requester: &str,
        request: &GenerateRequest,
    ) -> AppResult<Article> {
        let prompt = request.prompt.trim();
        if prompt.is_empty() {
            return Err(AppError::invalid_input("Prompt is required"));
        }

        let draft = self
            .create_article(requester, ArticleStatus::Draft)
            .await
            .ok_or_else(|| AppError::external_service("Backend", "Failed to create article"))?;

        self.create_message(&draft.id, MessageRole::User, prompt)
            .await;

        let completion = match self.completion().complete(prompt).await {
            Ok(text) => text,
            Err(e) => {
                AppLogger::log_generation(requester, &draft.id, false);
                return Err(e.into());
            }
        };

        self.create_message(&draft.id, MessageRole::Assistant, &completion)
            .await;

        let Some(shape) = parse_completion(&completion) else {
            warn!(article.id = %draft.id, "Completion did not match the article shape");
            AppLogger::log_generation(requester, &draft.id, false);
            return Err(AppError::external_service(
                "Completion",
                "Model response did not match the requested article shape",
            ));
        };

        let category = request
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .or_else(|| shape.keywords.first().map(|k| k.trim()))
            .filter(|c| !c.is_empty())
            .map(str::to_owned);

        let update = ArticleUpdate {
            headline: Some(shape.headline.trim().to_owned()),
            body: Some(
                shape
                    .body
                    .iter()
                    .map(|paragraph| paragraph.trim().to_owned())
                    .filter(|paragraph| !paragraph.is_empty())
                    .collect(),
            ),
            category,
            status: None,
        };

        let article = self
            .update_article(&draft.id, &update, Some(requester))
            .await
            .ok_or_else(|| AppError::external_service("Backend", "Failed to save article"))?;

        info!(article.id = %article.id, "Article generated");
        AppLogger::log_generation(requester, &article.id, true);
        Ok(article)
    }
}
