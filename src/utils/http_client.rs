// ABOUTME: Shared HTTP client utilities with connection pooling and timeout configuration
// ABOUTME: Provides the singleton client and timeout-tuned clients for backend and completion calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

/// Global shared HTTP client with default configuration
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get or create the shared HTTP client with default settings
///
/// Used for short fire-and-forget calls such as webhook notifications.
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| create_client_with_timeout(30, 10))
}

/// Create a new HTTP client with custom timeout settings
///
/// Falls back to a default client if the builder fails.
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Client for backend record calls
#[must_use]
pub fn backend_client() -> Client {
    create_client_with_timeout(30, 10)
}

/// Client for completion calls, which can take a while to generate
#[must_use]
pub fn completion_client() -> Client {
    create_client_with_timeout(120, 10)
}
