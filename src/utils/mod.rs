// ABOUTME: Utility modules for common functionality across the application
// ABOUTME: Contains shared HTTP clients and bearer token parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Bearer token extraction
pub mod auth;
/// HTTP client configuration and helpers
pub mod http_client;
