// ABOUTME: Turns raw article records with expanded relations into Article view models
// ABOUTME: Derives file URLs, message list, reaction tally, and the authorship flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Article Shaping
//!
//! A record shapes to `None` when it is absent, cannot be decoded as an
//! article, or has no owner at all (neither a `user` relation nor an expanded
//! author). List shaping drops those entries and otherwise keeps input order.

use pressroom_core::constants::collections;
use pressroom_core::models::{Article, ArticleRecord, Message, User};
use tracing::debug;

use super::reactions::tally_reactions;
use crate::backend::{Record, RecordStore};

/// Shape a single record for `requester`
#[must_use]
pub fn shape_article(
    record: Option<&Record>,
    requester: Option<&str>,
    store: &dyn RecordStore,
) -> Option<Article> {
    let record = record?;
    let article = match record.decode::<ArticleRecord>() {
        Ok(article) => article,
        Err(e) => {
            debug!(id = %record.id, "Skipping undecodable article record: {}", e);
            return None;
        }
    };
    shape_article_record(&article, requester, store)
}

/// Shape a list of records, dropping the ones that shape to `None`
#[must_use]
pub fn shape_articles(
    records: &[Record],
    requester: Option<&str>,
    store: &dyn RecordStore,
) -> Vec<Article> {
    records
        .iter()
        .filter_map(|record| shape_article(Some(record), requester, store))
        .collect()
}

/// Shape an already-decoded record
#[must_use]
pub fn shape_article_record(
    record: &ArticleRecord,
    requester: Option<&str>,
    store: &dyn RecordStore,
) -> Option<Article> {
    let author = record.expand.user.as_ref();
    if record.user.is_none() && author.is_none() {
        debug!(id = %record.id, "Skipping ownerless article record");
        return None;
    }

    let file_src = |filename: Option<&String>| {
        filename.map(|name| {
            let collection = record
                .collection_id
                .as_deref()
                .or(record.collection_name.as_deref())
                .unwrap_or(collections::ARTICLES);
            store.file_url(collection, &record.id, name)
        })
    };

    let is_created_by_current_user = match (requester, author) {
        (Some(requester), Some(author)) => !requester.is_empty() && requester == author.id,
        _ => false,
    };

    Some(Article {
        id: record.id.clone(),
        created: record.created.clone(),
        updated: record.updated.clone(),
        headline: record.headline.clone(),
        status: record.status,
        body: record.body.clone(),
        category: record.category.clone(),
        model: record.model.clone(),
        audio_src: file_src(record.audio.as_ref()),
        image_src: file_src(record.image.as_ref()),
        user: author.map(User::from),
        messages: record
            .expand
            .messages
            .iter()
            .flatten()
            .map(Message::from)
            .collect(),
        reactions: tally_reactions(
            record.expand.reactions.as_deref().unwrap_or_default(),
            requester,
        ),
        is_created_by_current_user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;
    use pressroom_core::models::ArticleStatus;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_absent_record_shapes_to_none() {
        let store = MemoryStore::default();
        assert!(shape_article(None, Some("u1"), &store).is_none());
    }

    #[test]
    fn test_copies_fields_and_builds_file_urls() {
        let store = MemoryStore::new("http://files.local");
        let raw = record(json!({
            "id": "a1",
            "collectionId": "col1",
            "headline": "Otters take over",
            "body": ["One", "Two"],
            "status": "PUBLISHED",
            "audio": "speech.mp3",
            "image": "",
            "user": "u1",
            "expand": {
                "user": {"id": "u1", "nickname": "Alice"},
                "messages(article)": [
                    {"id": "m1", "role": "USER", "content": "prompt"},
                    {"id": "m2", "role": "ASSISTANT", "content": "{}"}
                ]
            }
        }));

        let article = shape_article(Some(&raw), Some("u1"), &store).unwrap();

        assert_eq!(article.headline.as_deref(), Some("Otters take over"));
        assert_eq!(article.body, vec!["One", "Two"]);
        assert_eq!(article.status, Some(ArticleStatus::Published));
        assert_eq!(
            article.audio_src.as_deref(),
            Some("http://files.local/api/files/col1/a1/speech.mp3")
        );
        assert_eq!(article.image_src, None);
        assert_eq!(article.messages.len(), 2);
        assert_eq!(article.messages[0].id, "m1");
        assert_eq!(article.user.unwrap().nickname.as_deref(), Some("Alice"));
        assert!(article.is_created_by_current_user);
    }

    #[test]
    fn test_missing_expanded_author_is_never_current_user() {
        let store = MemoryStore::default();
        let raw = record(json!({"id": "a1", "status": "DRAFT", "user": "u1"}));

        for requester in [Some("u1"), Some(""), None] {
            let article = shape_article(Some(&raw), requester, &store).unwrap();
            assert!(!article.is_created_by_current_user);
        }
    }

    #[test]
    fn test_anonymous_requester_is_never_author() {
        let store = MemoryStore::default();
        let raw = record(json!({
            "id": "a1",
            "user": "u1",
            "expand": {"user": {"id": "u1"}}
        }));

        let article = shape_article(Some(&raw), None, &store).unwrap();
        assert!(!article.is_created_by_current_user);
    }

    #[test]
    fn test_list_keeps_order_and_drops_unshapeable() {
        let store = MemoryStore::default();
        let records = vec![
            record(json!({"id": "A", "user": "u1", "expand": {"user": {"id": "u1"}}})),
            record(json!({"id": "B", "headline": "ownerless"})),
            record(json!({"id": "C", "user": "u2", "expand": {"user": {"id": "u2"}}})),
            record(json!({"id": "D", "user": "u1", "status": "ARCHIVED"})),
        ];

        let ids: Vec<String> = shape_articles(&records, Some("u1"), &store)
            .into_iter()
            .map(|article| article.id)
            .collect();

        assert_eq!(ids, vec!["A", "C"]);
    }
}
