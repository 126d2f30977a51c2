// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven ServerConfig and its sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the Pressroom server
//!
//! All settings come from environment variables; there are no config files.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    BackendConfig, CompletionConfig, CorsConfig, Environment, NotificationConfig, ServerConfig,
};
