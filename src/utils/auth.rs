// ABOUTME: Bearer token extraction from Authorization header values
// ABOUTME: Used by the requester extractor to find session tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Extract a bearer token from an Authorization header value
///
/// Returns `None` for other schemes and for empty tokens.
#[must_use]
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
