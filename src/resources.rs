// ABOUTME: Shared resource container handed to every route handler as axum state
// ABOUTME: Holds the record store, the article service, and the event notifier
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
//! Built once at startup and shared behind an `Arc`. Cloning the inner
//! handles is cheap; all of them are reference counted.

use std::sync::Arc;

use crate::articles::ArticleService;
use crate::backend::RecordStore;
use crate::llm::CompletionProvider;
use crate::notifications::EventNotifier;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Record store used for authentication and health
    pub store: Arc<dyn RecordStore>,
    /// Article operations
    pub articles: ArticleService,
    /// Operator alerts for failures users see
    pub notifier: Arc<dyn EventNotifier>,
}

impl ServerResources {
    /// Wire the article service to its store and completion provider
    #[must_use]
    pub fn new(
        store: Arc<dyn RecordStore>,
        completion: Arc<dyn CompletionProvider>,
        notifier: Arc<dyn EventNotifier>,
    ) -> Self {
        Self {
            articles: ArticleService::new(Arc::clone(&store), completion),
            store,
            notifier,
        }
    }
}
