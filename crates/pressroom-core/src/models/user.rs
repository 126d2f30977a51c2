// ABOUTME: User account record from the auth collection and its public view model
// ABOUTME: Users own articles and reactions; the service never stores them itself
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::serde_ext::{empty_as_none, null_as_default};

/// User record as returned by the backend auth collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Record id
    pub id: String,
    /// Display name, unique across users
    #[serde(default, deserialize_with = "empty_as_none")]
    pub nickname: Option<String>,
    /// Email address, only visible to privileged clients
    #[serde(default, deserialize_with = "empty_as_none")]
    pub email: Option<String>,
    /// Whether the email address was confirmed
    #[serde(default, deserialize_with = "null_as_default")]
    pub verified: bool,
    /// Creation timestamp
    #[serde(default, deserialize_with = "empty_as_none")]
    pub created: Option<String>,
    /// Last update timestamp
    #[serde(default, deserialize_with = "empty_as_none")]
    pub updated: Option<String>,
}

/// User as exposed on an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Record id
    pub id: String,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// Email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether the email address was confirmed
    pub verified: bool,
}

impl From<&UserRecord> for User {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.clone(),
            nickname: record.nickname.clone(),
            email: record.email.clone(),
            verified: record.verified,
        }
    }
}
