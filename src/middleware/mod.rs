// ABOUTME: HTTP middleware for cross-origin access and request correlation
// ABOUTME: Provides the CORS layer and request id header name used by the router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// CORS configuration
pub mod cors;

pub use cors::setup_cors;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";
