// ABOUTME: Record and view-model types for articles, messages, reactions, and users
// ABOUTME: Records mirror backend JSON; view models are what page loaders hand to clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Two layers live here:
//!
//! - `*Record` types deserialize backend JSON, including expanded relations.
//!   Empty strings and `null` are normalized to `None` / empty collections.
//! - View models (`Article`, `Message`, `ReactionTally`, `User`) are produced by
//!   the shaping layer and serialized in camelCase for the web client.

mod article;
mod message;
mod reaction;
mod serde_ext;
mod user;

pub use article::{Article, ArticleExpand, ArticlePromptShape, ArticleRecord, ArticleStatus};
pub use message::{Message, MessageRecord, MessageRole};
pub use reaction::{ReactionCount, ReactionRecord, ReactionTally};
pub use user::{User, UserRecord};
