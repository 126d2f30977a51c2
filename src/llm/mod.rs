// ABOUTME: Completion provider abstraction for article generation
// ABOUTME: Defines the CompletionProvider contract and its typed failure kinds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Completion Providers
//!
//! Generation is a single prompt-in, text-out call with fixed sampling
//! parameters. Providers return the raw text of the first choice; parsing the
//! requested JSON shape is left to the caller.
//!
//! ## Failure kinds
//!
//! | Provider outcome | Error | HTTP status |
//! |---|---|---|
//! | 429 | `RateLimited` | 429 |
//! | 503 | `Overloaded` | 503 |
//! | anything else, including network failure | `Unknown` | 500 |

mod completion;
pub mod prompts;

pub use completion::OpenAiCompletionClient;
pub use prompts::format_prompt;

use async_trait::async_trait;
use pressroom_core::constants::messages;
use pressroom_core::errors::AppError;
use thiserror::Error;

/// Completion failure, already reduced to what the user is told
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CompletionError {
    /// Provider answered 429
    #[error("{}", messages::RATE_LIMIT_EXCEEDED)]
    RateLimited,
    /// Provider answered 503
    #[error("{}", messages::MODEL_OVERLOADED)]
    Overloaded,
    /// Any other failure; the cause is only logged
    #[error("{}", messages::UNKNOWN_ERROR)]
    Unknown,
}

impl CompletionError {
    /// Map a provider HTTP status to a failure kind
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimited,
            503 => Self::Overloaded,
            _ => Self::Unknown,
        }
    }

    /// HTTP status surfaced to the caller
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::RateLimited => 429,
            Self::Overloaded => 503,
            Self::Unknown => 500,
        }
    }
}

impl From<CompletionError> for AppError {
    fn from(error: CompletionError) -> Self {
        match error {
            CompletionError::RateLimited => Self::rate_limited(error.to_string()),
            CompletionError::Overloaded => Self::model_overloaded(error.to_string()),
            CompletionError::Unknown => Self::internal(error.to_string()),
        }
    }
}

/// Text completion provider
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider identifier for logs
    fn name(&self) -> &'static str;

    /// Generate text for a raw user prompt
    ///
    /// The provider wraps `prompt` in the article template before sending it.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(CompletionError::from_status(429), CompletionError::RateLimited);
        assert_eq!(CompletionError::from_status(503), CompletionError::Overloaded);
        assert_eq!(CompletionError::from_status(400), CompletionError::Unknown);
        assert_eq!(CompletionError::from_status(500), CompletionError::Unknown);
    }

    #[test]
    fn test_app_error_keeps_status_and_message() {
        let rate: AppError = CompletionError::RateLimited.into();
        assert_eq!(rate.http_status(), 429);
        assert_eq!(rate.message, "API rate limit exceeded");

        let overloaded: AppError = CompletionError::Overloaded.into();
        assert_eq!(overloaded.http_status(), 503);

        let unknown: AppError = CompletionError::Unknown.into();
        assert_eq!(unknown.http_status(), 500);
        assert_eq!(unknown.message, "Unknown error");
    }
}
