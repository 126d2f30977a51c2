// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Collection names, relation expansions, model ids, and user-facing messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into small domain modules rather than one flat list.

/// Backend collection names
pub mod collections {
    /// Generated articles
    pub const ARTICLES: &str = "articles";
    /// Prompt and completion messages attached to an article
    pub const MESSAGES: &str = "messages";
    /// Per-user reactions attached to an article
    pub const REACTIONS: &str = "reactions";
    /// Auth collection holding user accounts
    pub const USERS: &str = "users";
}

/// Record field names shared by the backend client and the in-memory store
pub mod fields {
    /// Owning user relation on articles and reactions
    pub const USER: &str = "user";
    /// Parent article relation on messages and reactions
    pub const ARTICLE: &str = "article";
    /// Article publication status
    pub const STATUS: &str = "status";
    /// Article category
    pub const CATEGORY: &str = "category";
    /// Generating model id on articles
    pub const MODEL: &str = "model";
    /// Reaction kind (emoji) on reactions
    pub const REACTION_KIND: &str = "kind";
    /// Message role
    pub const ROLE: &str = "role";
    /// Message content
    pub const CONTENT: &str = "content";
    /// User email
    pub const EMAIL: &str = "email";
    /// User nickname
    pub const NICKNAME: &str = "nickname";
    /// User verification flag
    pub const VERIFIED: &str = "verified";
}

/// Relation expansion expressions
pub mod relations {
    /// Pulls messages, reactions, and the author in one round trip
    pub const EXPAND_RECORD_RELATIONS: &str = "messages(article),reactions(article),user";
    /// Author only
    pub const EXPAND_USER: &str = "user";
    /// Expand key for the author
    pub const USER_KEY: &str = "user";
    /// Expand key for an article's messages
    pub const MESSAGES_KEY: &str = "messages(article)";
    /// Expand key for an article's reactions
    pub const REACTIONS_KEY: &str = "reactions(article)";
}

/// Sort expressions
pub mod sorts {
    /// Most recently updated first
    pub const NEWEST_UPDATED: &str = "-updated";
    /// Most recently created first
    pub const NEWEST_CREATED: &str = "-created";
    /// Oldest first
    pub const OLDEST_CREATED: &str = "created";
}

/// Completion model settings. These are fixed for every request.
pub mod completion {
    /// Model recorded on every generated article and sent to the provider
    pub const CURRENT_MODEL: &str = "text-davinci-003";
    /// Sampling temperature
    pub const TEMPERATURE: f32 = 0.7;
    /// Maximum generated tokens
    pub const MAX_TOKENS: u32 = 384;
    /// Nucleus sampling
    pub const TOP_P: f32 = 1.0;
    /// Frequency penalty
    pub const FREQUENCY_PENALTY: f32 = 0.0;
    /// Presence penalty
    pub const PRESENCE_PENALTY: f32 = 1.0;
}

/// Messages rendered to end users
pub mod messages {
    /// Missing or hidden record
    pub const NOT_FOUND: &str = "Not found";
    /// Provider returned 429
    pub const RATE_LIMIT_EXCEEDED: &str = "API rate limit exceeded";
    /// Provider returned 503
    pub const MODEL_OVERLOADED: &str = "That model is currently overloaded with other requests";
    /// Any other completion failure
    pub const UNKNOWN_ERROR: &str = "Unknown error";
    /// Failed password login or unverified account
    pub const LOGIN_FAILED: &str = "Can't login, check your credentials";
    /// Duplicate or invalid email on join
    pub const EMAIL_TAKEN: &str = "Email is already in use or is invalid";
    /// Duplicate or invalid nickname on join
    pub const NICKNAME_TAKEN: &str = "Nickname is already taken or is invalid";
    /// Home page could not reach the backend
    pub const SERVICE_UNAVAILABLE: &str = "Service is currently unavailable, please try again later";
}

/// Service identifiers used in logs and health responses
pub mod service_names {
    /// Server binary name
    pub const PRESSROOM_SERVER: &str = "pressroom-server";
}
