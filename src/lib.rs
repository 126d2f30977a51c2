// ABOUTME: Main library entry point for the Pressroom article service
// ABOUTME: Generates, lists, edits, and reacts to AI-written articles stored in PocketBase
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pressroom
//!
//! A small news site whose articles are written by a completion model.
//! Signed-in users type a prompt, the model answers with a headline,
//! paragraphs, and keywords, and the result is saved as a draft they can
//! edit and publish. Anyone can read published articles and react to them.
//!
//! ## Architecture
//!
//! - **Backend**: [`backend::RecordStore`] over PocketBase, or an in-memory
//!   store for development and tests
//! - **LLM**: [`llm::CompletionProvider`] over the OpenAI completions API
//! - **Articles**: record operations, shaping into view models, the
//!   authorization check, and the generation workflow
//! - **Routes**: axum handlers for the page loaders and actions
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pressroom::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Pressroom configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Article record operations, shaping, and generation
pub mod articles;

/// Record storage: PocketBase client and in-memory store
pub mod backend;

/// Environment-driven configuration
pub mod config;

/// Completion client and prompt template
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// External error notification channel
pub mod notifications;

/// Shared resources handed to route handlers
pub mod resources;

/// HTTP routes
pub mod routes;

/// Router assembly and serving
pub mod server;

/// Shared helpers
pub mod utils;
