// ABOUTME: Core types and constants for the Pressroom article service
// ABOUTME: Foundation crate with error handling, record/view models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pressroom Core
//!
//! Foundation crate providing shared types and constants for the Pressroom
//! service. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Collection names, relation expansions, user-facing messages
//! - **models**: Backend record shapes and the view models built from them

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Record and view-model types (Article, Message, Reaction, User)
pub mod models;
