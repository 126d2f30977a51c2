// ABOUTME: Article record operations, authorization check, reactions, and message persistence
// ABOUTME: Storage failures are logged and collapsed into None / empty results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Articles
//!
//! [`ArticleService`] is the only component that talks to the backend about
//! articles. Every read expands messages, reactions, and the author in one
//! round trip and passes the result through [`shaping`].
//!
//! Storage-layer failures never propagate out of the record operations: a
//! missing record, a hidden draft, and a backend outage all come back as
//! `None` (or an empty list). The cause is logged at `warn`/`debug`.

/// Article generation workflow
pub mod generation;
/// Reaction tally
pub mod reactions;
/// Record to view-model conversion
pub mod shaping;

pub use shaping::{shape_article, shape_articles};

use pressroom_core::constants::{collections, completion, fields, messages, relations, sorts};
use pressroom_core::errors::{AppError, AppResult};
use pressroom_core::models::{
    Article, ArticleStatus, Message, MessageRecord, MessageRole, ReactionRecord,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::backend::{filter, BackendError, ListResult, QueryOptions, Record, RecordStore};
use crate::llm::CompletionProvider;

/// Fields an owner may change on an article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleUpdate {
    /// New headline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    /// New paragraphs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<String>>,
    /// New category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ArticleStatus>,
}

impl ArticleUpdate {
    /// Patch that only changes the status
    #[must_use]
    pub fn status(status: ArticleStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.headline.is_none()
            && self.body.is_none()
            && self.category.is_none()
            && self.status.is_none()
    }
}

/// Article operations over a record store
#[derive(Clone)]
pub struct ArticleService {
    store: Arc<dyn RecordStore>,
    completion: Arc<dyn CompletionProvider>,
}

impl ArticleService {
    /// Create the service
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, completion: Arc<dyn CompletionProvider>) -> Self {
        Self { store, completion }
    }

    /// Underlying record store
    #[must_use]
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    fn expand_all() -> QueryOptions {
        QueryOptions::new().expand(relations::EXPAND_RECORD_RELATIONS)
    }

    /// Read one article as seen by `requester`
    ///
    /// `None` when the id is absent, the record does not exist, the backend
    /// fails, or the article is a draft the requester does not own.
    #[instrument(skip(self), fields(store = self.store.name()))]
    pub async fn get_article(
        &self,
        article_id: Option<&str>,
        requester: Option<&str>,
    ) -> Option<Article> {
        let article_id = article_id.filter(|id| !id.is_empty())?;

        let record = match self
            .store
            .get_one(collections::ARTICLES, article_id, &Self::expand_all())
            .await
        {
            Ok(record) => record,
            Err(BackendError::NotFound) => {
                debug!("Article not found");
                return None;
            }
            Err(e) => {
                warn!("Failed to load article: {}", e);
                return None;
            }
        };

        let article = self.shape(&record, requester)?;
        if article.status == Some(ArticleStatus::Draft) && !article.is_created_by_current_user {
            debug!("Hiding draft from non-author");
            return None;
        }
        Some(article)
    }

    /// All articles matching `filter`, most recently updated first
    ///
    /// Empty on any failure, including a malformed filter.
    pub async fn get_articles(&self, filter: &str, requester: Option<&str>) -> Vec<Article> {
        match self.fetch_articles(filter, requester).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!("Failed to list articles: {}", e);
                Vec::new()
            }
        }
    }

    /// Like [`Self::get_articles`] but storage failures are returned
    ///
    /// # Errors
    ///
    /// Returns the backend error when the list cannot be read.
    #[instrument(skip(self), fields(store = self.store.name()))]
    pub async fn fetch_articles(
        &self,
        filter: &str,
        requester: Option<&str>,
    ) -> Result<Vec<Article>, BackendError> {
        let options = Self::expand_all().filter(filter).sort(sorts::NEWEST_UPDATED);
        let records = self
            .store
            .get_full_list(collections::ARTICLES, &options)
            .await?;
        Ok(shape_articles(&records, requester, self.store.as_ref()))
    }

    /// Published articles, optionally narrowed to one category
    pub async fn get_published_articles(
        &self,
        category: Option<&str>,
        requester: Option<&str>,
    ) -> Vec<Article> {
        self.get_articles(&Self::published_filter(category), requester)
            .await
    }

    /// Home page list; storage failures are returned
    ///
    /// # Errors
    ///
    /// Returns the backend error when the list cannot be read.
    pub async fn fetch_published_articles(
        &self,
        category: Option<&str>,
        requester: Option<&str>,
    ) -> Result<Vec<Article>, BackendError> {
        self.fetch_articles(&Self::published_filter(category), requester)
            .await
    }

    fn published_filter(category: Option<&str>) -> String {
        let expression = ArticleStatus::Published.filter();
        match category.map(str::trim).filter(|c| !c.is_empty()) {
            Some(category) => format!(
                "{expression} && {} = {}",
                fields::CATEGORY,
                filter::quote(category)
            ),
            None => expression,
        }
    }

    /// Drafts owned by `requester`
    pub async fn get_drafts(&self, requester: &str) -> Vec<Article> {
        let expression = format!(
            "{} && {} = {}",
            ArticleStatus::Draft.filter(),
            fields::USER,
            filter::quote(requester)
        );
        self.get_articles(&expression, Some(requester)).await
    }

    /// Create an article owned by `requester` with the current model id
    #[instrument(skip(self), fields(store = self.store.name()))]
    pub async fn create_article(&self, requester: &str, status: ArticleStatus) -> Option<Article> {
        if requester.is_empty() {
            return None;
        }

        let body = json!({
            (fields::USER): requester,
            (fields::MODEL): completion::CURRENT_MODEL,
            (fields::STATUS): status,
        });
        match self
            .store
            .create(
                collections::ARTICLES,
                body,
                &QueryOptions::new().expand(relations::EXPAND_USER),
            )
            .await
        {
            Ok(record) => {
                info!(article.id = %record.id, "Article created");
                self.shape(&record, Some(requester))
            }
            Err(e) => {
                warn!("Failed to create article: {}", e);
                None
            }
        }
    }

    /// First page (size 1) of matching articles; used for counting
    #[instrument(skip(self), fields(store = self.store.name()))]
    pub async fn get_articles_page(&self, filter: Option<&str>) -> Option<ListResult<Record>> {
        let options = QueryOptions {
            filter: filter.map(str::to_owned),
            ..QueryOptions::default()
        };
        match self
            .store
            .get_list(collections::ARTICLES, 1, 1, &options)
            .await
        {
            Ok(page) => Some(page),
            Err(e) => {
                warn!("Failed to count articles: {}", e);
                None
            }
        }
    }

    /// Apply `update` and return the re-expanded, re-shaped article
    #[instrument(skip(self, update), fields(store = self.store.name()))]
    pub async fn update_article(
        &self,
        article_id: &str,
        update: &ArticleUpdate,
        requester: Option<&str>,
    ) -> Option<Article> {
        let body = match serde_json::to_value(update) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to encode article update: {}", e);
                return None;
            }
        };

        match self
            .store
            .update(collections::ARTICLES, article_id, body, &Self::expand_all())
            .await
        {
            Ok(record) => self.shape(&record, requester),
            Err(e) => {
                warn!("Failed to update article: {}", e);
                None
            }
        }
    }

    /// Delete an article; `Some(true)` is the backend acknowledgement
    #[instrument(skip(self), fields(store = self.store.name()))]
    pub async fn delete_article(&self, article_id: &str) -> Option<bool> {
        match self.store.delete(collections::ARTICLES, article_id).await {
            Ok(acknowledged) => {
                info!("Article deleted");
                Some(acknowledged)
            }
            Err(e) => {
                warn!("Failed to delete article: {}", e);
                None
            }
        }
    }

    /// Whether `requester` authored the article
    ///
    /// False whenever the article cannot be read, for whatever reason.
    pub async fn is_current_user_author(
        &self,
        article_id: Option<&str>,
        requester: Option<&str>,
    ) -> bool {
        self.get_article(article_id, requester)
            .await
            .is_some_and(|article| article.is_created_by_current_user)
    }

    /// Append a message to an article
    #[instrument(skip(self, content), fields(store = self.store.name()))]
    pub async fn create_message(
        &self,
        article_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Option<Message> {
        let body = json!({
            (fields::ARTICLE): article_id,
            (fields::ROLE): role,
            (fields::CONTENT): content,
        });
        let created = self
            .store
            .create(collections::MESSAGES, body, &QueryOptions::new())
            .await
            .and_then(|record| record.decode::<MessageRecord>());

        match created {
            Ok(message) => Some(Message::from(&message)),
            Err(e) => {
                warn!("Failed to store message: {}", e);
                None
            }
        }
    }

    /// Set, switch, or clear the requester's reaction on an article
    ///
    /// Sending the kind the requester already reacted with removes it.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` when the article is not visible to the requester;
    /// `InvalidInput` for an empty kind; an external-service error when the
    /// backend write fails.
    #[instrument(skip(self), fields(store = self.store.name()))]
    pub async fn react(&self, article_id: &str, requester: &str, kind: &str) -> AppResult<Article> {
        let kind = kind.trim();
        if kind.is_empty() {
            return Err(AppError::invalid_input("Reaction kind is required"));
        }
        if self.get_article(Some(article_id), Some(requester)).await.is_none() {
            return Err(AppError::not_found(messages::NOT_FOUND));
        }

        let existing = self.find_reaction(article_id, requester).await?;
        match existing {
            Some(reaction) if reaction.kind == kind => {
                self.store
                    .delete(collections::REACTIONS, &reaction.id)
                    .await?;
                debug!("Reaction removed");
            }
            Some(reaction) => {
                self.store
                    .update(
                        collections::REACTIONS,
                        &reaction.id,
                        json!({ (fields::REACTION_KIND): kind }),
                        &QueryOptions::new(),
                    )
                    .await?;
                debug!("Reaction switched");
            }
            None => {
                self.store
                    .create(
                        collections::REACTIONS,
                        json!({
                            (fields::ARTICLE): article_id,
                            (fields::USER): requester,
                            (fields::REACTION_KIND): kind,
                        }),
                        &QueryOptions::new(),
                    )
                    .await?;
                debug!("Reaction added");
            }
        }

        self.get_article(Some(article_id), Some(requester))
            .await
            .ok_or_else(|| AppError::not_found(messages::NOT_FOUND))
    }

    async fn find_reaction(
        &self,
        article_id: &str,
        requester: &str,
    ) -> AppResult<Option<ReactionRecord>> {
        let expression = format!(
            "{} = {} && {} = {}",
            fields::ARTICLE,
            filter::quote(article_id),
            fields::USER,
            filter::quote(requester)
        );
        match self
            .store
            .get_first_list_item(collections::REACTIONS, &expression, &QueryOptions::new())
            .await
        {
            Ok(record) => Ok(Some(record.decode()?)),
            Err(BackendError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn shape(&self, record: &Record, requester: Option<&str>) -> Option<Article> {
        shape_article(Some(record), requester, self.store.as_ref())
    }

    pub(crate) fn completion(&self) -> &dyn CompletionProvider {
        self.completion.as_ref()
    }
}
