// ABOUTME: Article record with expanded relations, the article view model, and status
// ABOUTME: Also holds the JSON shape the completion prompt asks the model to produce
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::serde_ext::{empty_as_none, null_as_default};
use super::{Message, MessageRecord, ReactionRecord, ReactionTally, User, UserRecord};

/// Publication status of an article
///
/// A `Draft` is only visible to its owner; a `Published` article is visible to
/// everyone, including anonymous readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ArticleStatus {
    /// Work in progress, owner only
    Draft,
    /// Public
    Published,
}

impl ArticleStatus {
    /// Wire representation stored by the backend
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Published => "PUBLISHED",
        }
    }

    /// Filter expression selecting articles with this status
    #[must_use]
    pub fn filter(&self) -> String {
        format!("status = \"{}\"", self.as_str())
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "PUBLISHED" => Ok(Self::Published),
            other => Err(format!("unknown article status: {other}")),
        }
    }
}

/// Relations inlined by an `expand` query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleExpand {
    /// Author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRecord>,
    /// Messages pointing back at the article
    #[serde(
        rename = "messages(article)",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub messages: Option<Vec<MessageRecord>>,
    /// Reactions pointing back at the article
    #[serde(
        rename = "reactions(article)",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reactions: Option<Vec<ReactionRecord>>,
}

/// Article record as returned by the `articles` collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    /// Record id
    pub id: String,
    /// Collection id, used to build file URLs
    #[serde(default, deserialize_with = "empty_as_none")]
    pub collection_id: Option<String>,
    /// Collection name
    #[serde(default, deserialize_with = "empty_as_none")]
    pub collection_name: Option<String>,
    /// Creation timestamp
    #[serde(default, deserialize_with = "empty_as_none")]
    pub created: Option<String>,
    /// Last update timestamp
    #[serde(default, deserialize_with = "empty_as_none")]
    pub updated: Option<String>,
    /// Headline
    #[serde(default, deserialize_with = "empty_as_none")]
    pub headline: Option<String>,
    /// Body paragraphs in reading order
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: Vec<String>,
    /// Category
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category: Option<String>,
    /// Publication status
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<ArticleStatus>,
    /// Generating model id
    #[serde(default, deserialize_with = "empty_as_none")]
    pub model: Option<String>,
    /// Audio file name
    #[serde(default, deserialize_with = "empty_as_none")]
    pub audio: Option<String>,
    /// Image file name
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image: Option<String>,
    /// Owning user id
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user: Option<String>,
    /// Expanded relations
    #[serde(default, deserialize_with = "null_as_default")]
    pub expand: ArticleExpand,
}

/// Article view model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Record id
    pub id: String,
    /// Creation timestamp
    pub created: Option<String>,
    /// Last update timestamp
    pub updated: Option<String>,
    /// Headline
    pub headline: Option<String>,
    /// Publication status
    pub status: Option<ArticleStatus>,
    /// Body paragraphs
    pub body: Vec<String>,
    /// Category
    pub category: Option<String>,
    /// Generating model id
    pub model: Option<String>,
    /// Public URL of the audio file
    pub audio_src: Option<String>,
    /// Public URL of the image file
    pub image_src: Option<String>,
    /// Author
    pub user: Option<User>,
    /// Prompt and completion history
    pub messages: Vec<Message>,
    /// Reaction tally
    pub reactions: ReactionTally,
    /// Whether the requester authored the article
    pub is_created_by_current_user: bool,
}

/// JSON object the completion prompt asks the model to return, minified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlePromptShape {
    /// Headline
    pub headline: String,
    /// One-word categories describing the article
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Paragraphs in reading order
    pub body: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_normalizes_empty_backend_fields() {
        let record: ArticleRecord = serde_json::from_value(json!({
            "id": "a1",
            "collectionId": "c1",
            "headline": "",
            "body": null,
            "status": "DRAFT",
            "audio": "",
            "user": "u1",
            "expand": null
        }))
        .unwrap();

        assert_eq!(record.headline, None);
        assert!(record.body.is_empty());
        assert_eq!(record.status, Some(ArticleStatus::Draft));
        assert_eq!(record.audio, None);
        assert_eq!(record.user.as_deref(), Some("u1"));
        assert_eq!(record.expand, ArticleExpand::default());
    }

    #[test]
    fn test_record_reads_back_relation_expansions() {
        let record: ArticleRecord = serde_json::from_value(json!({
            "id": "a1",
            "status": "PUBLISHED",
            "expand": {
                "user": {"id": "u1", "nickname": "Alice", "verified": true},
                "messages(article)": [{"id": "m1", "role": "USER", "content": "hi"}],
                "reactions(article)": [{"id": "r1", "user": "u2", "kind": "🔥"}]
            }
        }))
        .unwrap();

        let expand = record.expand;
        assert_eq!(expand.user.map(|u| u.id), Some("u1".to_owned()));
        assert_eq!(expand.messages.map(|m| m.len()), Some(1));
        assert_eq!(expand.reactions.map(|r| r[0].kind.clone()), Some("🔥".to_owned()));
    }

    #[test]
    fn test_status_filter_expression() {
        assert_eq!(ArticleStatus::Published.filter(), "status = \"PUBLISHED\"");
    }
}
