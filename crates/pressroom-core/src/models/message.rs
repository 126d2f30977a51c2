// ABOUTME: Article message record (prompt or completion) and its view model
// ABOUTME: Messages are append-only and only disappear through article cascade delete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::serde_ext::{empty_as_none, null_as_default};

/// Author role of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageRole {
    /// Instruction injected by the service
    System,
    /// Prompt typed by the article owner
    User,
    /// Raw completion returned by the model
    Assistant,
}

impl MessageRole {
    /// Wire representation stored by the backend
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "SYSTEM",
            Self::User => "USER",
            Self::Assistant => "ASSISTANT",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SYSTEM" => Ok(Self::System),
            "USER" => Ok(Self::User),
            "ASSISTANT" => Ok(Self::Assistant),
            other => Err(format!("unknown message role: {other}")),
        }
    }
}

/// Message record as stored in the `messages` collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Record id
    pub id: String,
    /// Parent article id
    #[serde(default, deserialize_with = "empty_as_none")]
    pub article: Option<String>,
    /// Author role
    #[serde(default, deserialize_with = "empty_as_none")]
    pub role: Option<MessageRole>,
    /// Message text
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Creation timestamp
    #[serde(default, deserialize_with = "empty_as_none")]
    pub created: Option<String>,
}

/// Message as embedded in an article view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Record id
    pub id: String,
    /// Author role
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<MessageRole>,
    /// Message text
    pub content: String,
    /// Creation timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

impl From<&MessageRecord> for Message {
    fn from(record: &MessageRecord) -> Self {
        Self {
            id: record.id.clone(),
            role: record.role,
            content: record.content.clone(),
            created: record.created.clone(),
        }
    }
}
