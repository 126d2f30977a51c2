// ABOUTME: Article page loaders and actions: list, drafts, detail, generate, edit, delete, react
// ABOUTME: Ownership failures answer 404 so drafts and other users' articles stay invisible
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Article routes
//!
//! Reads are open to anonymous requesters; every write requires a session
//! token. A requester who is not the author of an article gets the same
//! `404 Not found` as for an article that does not exist.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pressroom_core::constants::messages;
use pressroom_core::errors::{AppError, ErrorCode};
use pressroom_core::models::Article;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{authenticate, require_user};
use crate::articles::generation::GenerateRequest;
use crate::articles::ArticleUpdate;
use crate::resources::ServerResources;

/// Query string of the article list
#[derive(Debug, Default, Deserialize)]
pub struct ListArticlesQuery {
    /// Restrict to one category
    pub category: Option<String>,
}

/// Article list response
#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleListResponse {
    /// Shaped articles, most recently updated first
    pub articles: Vec<Article>,
    /// Number of articles returned
    pub total: usize,
}

impl From<Vec<Article>> for ArticleListResponse {
    fn from(articles: Vec<Article>) -> Self {
        Self {
            total: articles.len(),
            articles,
        }
    }
}

/// Reaction action body
#[derive(Debug, Deserialize)]
pub struct ReactionRequest {
    /// Reaction kind, usually a single emoji
    pub kind: String,
}

/// Article routes implementation
pub struct ArticleRoutes;

impl ArticleRoutes {
    /// Create all article routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/articles",
                get(Self::list_articles).post(Self::generate_article),
            )
            .route("/api/articles/drafts", get(Self::list_drafts))
            .route(
                "/api/articles/:article_id",
                get(Self::get_article)
                    .patch(Self::update_article)
                    .delete(Self::delete_article),
            )
            .route("/api/articles/:article_id/reactions", post(Self::react))
            .with_state(resources)
    }

    /// Published articles, optionally filtered by category
    ///
    /// A backend outage here is reported to the operator and answered with
    /// `502`, unlike the other loaders which degrade to empty results.
    async fn list_articles(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListArticlesQuery>,
    ) -> Result<Response, AppError> {
        let requester = authenticate(&headers, &resources).await;
        let articles = match resources
            .articles
            .fetch_published_articles(
                query.category.as_deref(),
                requester.as_ref().map(|user| user.id.as_str()),
            )
            .await
        {
            Ok(articles) => articles,
            Err(e) => {
                warn!("Home page list failed: {}", e);
                resources
                    .notifier
                    .notify("routes::articles: list_articles", &e.to_string())
                    .await;
                return Err(AppError::new(
                    ErrorCode::ExternalServiceError,
                    messages::SERVICE_UNAVAILABLE,
                )
                .with_source(e));
            }
        };

        Ok((StatusCode::OK, Json(ArticleListResponse::from(articles))).into_response())
    }

    /// The requester's drafts
    async fn list_drafts(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = require_user(&headers, &resources).await?;
        let drafts = resources.articles.get_drafts(&user.id).await;

        Ok((StatusCode::OK, Json(ArticleListResponse::from(drafts))).into_response())
    }

    async fn get_article(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(article_id): Path<String>,
    ) -> Result<Response, AppError> {
        let requester = authenticate(&headers, &resources).await;
        let article = resources
            .articles
            .get_article(
                Some(&article_id),
                requester.as_ref().map(|user| user.id.as_str()),
            )
            .await
            .ok_or_else(|| AppError::not_found(messages::NOT_FOUND))?;

        Ok((StatusCode::OK, Json(article)).into_response())
    }

    /// Run the generation workflow and return the new draft
    async fn generate_article(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<GenerateRequest>,
    ) -> Result<Response, AppError> {
        let user = require_user(&headers, &resources).await?;
        let article = resources
            .articles
            .generate_article(&user.id, &request)
            .await?;

        Ok((StatusCode::CREATED, Json(article)).into_response())
    }

    async fn update_article(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(article_id): Path<String>,
        Json(update): Json<ArticleUpdate>,
    ) -> Result<Response, AppError> {
        let user = require_user(&headers, &resources).await?;
        if update.is_empty() {
            return Err(AppError::invalid_input("Nothing to update"));
        }
        Self::ensure_author(&resources, &article_id, &user.id).await?;

        let article = resources
            .articles
            .update_article(&article_id, &update, Some(&user.id))
            .await
            .ok_or_else(|| AppError::external_service("Backend", "Failed to update article"))?;

        info!(article.id = %article_id, "Article updated");
        Ok((StatusCode::OK, Json(article)).into_response())
    }

    async fn delete_article(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(article_id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = require_user(&headers, &resources).await?;
        Self::ensure_author(&resources, &article_id, &user.id).await?;

        match resources.articles.delete_article(&article_id).await {
            Some(true) => Ok(StatusCode::NO_CONTENT.into_response()),
            _ => Err(AppError::external_service(
                "Backend",
                "Failed to delete article",
            )),
        }
    }

    /// Toggle the requester's reaction
    async fn react(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(article_id): Path<String>,
        Json(request): Json<ReactionRequest>,
    ) -> Result<Response, AppError> {
        let user = require_user(&headers, &resources).await?;
        let article = resources
            .articles
            .react(&article_id, &user.id, &request.kind)
            .await?;

        Ok((StatusCode::OK, Json(article)).into_response())
    }

    async fn ensure_author(
        resources: &ServerResources,
        article_id: &str,
        user_id: &str,
    ) -> Result<(), AppError> {
        if resources
            .articles
            .is_current_user_author(Some(article_id), Some(user_id))
            .await
        {
            Ok(())
        } else {
            Err(AppError::not_found(messages::NOT_FOUND))
        }
    }
}
