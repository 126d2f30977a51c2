// ABOUTME: Reaction record and the per-article tally shown next to each article
// ABOUTME: One reaction per (article, user) pair, counted by kind for display
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::serde_ext::{empty_as_none, null_as_default};

/// Reaction record as stored in the `reactions` collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRecord {
    /// Record id
    pub id: String,
    /// Parent article id
    #[serde(default, deserialize_with = "empty_as_none")]
    pub article: Option<String>,
    /// Owning user id
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user: Option<String>,
    /// Emoji or other reaction kind
    #[serde(default, deserialize_with = "null_as_default")]
    pub kind: String,
}

/// Count of a single reaction kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionCount {
    /// Reaction kind
    pub kind: String,
    /// Number of reactions of this kind
    pub count: usize,
    /// Whether the requester's reaction is of this kind
    pub is_current_user_reaction: bool,
}

/// Reactions tallied for one article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionTally {
    /// Number of reactions across all kinds
    pub total: usize,
    /// Whether the requester owns one of the reactions
    pub has_reacted: bool,
    /// Kind of the requester's reaction, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user_reaction: Option<String>,
    /// Counts ordered by kind
    pub counts: Vec<ReactionCount>,
}
