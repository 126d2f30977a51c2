// ABOUTME: Article generation prompt template loaded at compile time
// ABOUTME: Wraps a user prompt with the instructions and JSON shape the model must follow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Article Prompt
//!
//! The JSON shape is kept in `article_shape.json`, minified, and embedded
//! verbatim in every prompt.

/// Minified JSON object describing the expected completion
pub const ARTICLE_PROMPT_SHAPE: &str = include_str!("article_shape.json");

/// Wrap a user prompt in the article generation instructions
#[must_use]
pub fn format_prompt(prompt: &str) -> String {
    format!(
        "\n\t\t{}\n\t\tWrite article in English, don't repeat phrases, use this JSON shape minified, stricly adhere to character limits as specified:\n\t\t{}\n\t",
        prompt.trim(),
        ARTICLE_PROMPT_SHAPE.trim()
    )
}
