// ABOUTME: Integration tests for the OpenAI completion client against a wiremock server
// ABOUTME: Tests request shape, status-to-error mapping, and failure notifications
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use async_trait::async_trait;
use pressroom::config::CompletionConfig;
use pressroom::llm::{CompletionError, CompletionProvider, OpenAiCompletionClient};
use pressroom::notifications::EventNotifier;
use serde_json::json;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingNotifier {
    events: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    fn events(&self) -> Vec<(String, String)> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventNotifier for RecordingNotifier {
    async fn notify(&self, origin: &str, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push((origin.to_owned(), message.to_owned()));
    }
}

fn client(server: &MockServer) -> (OpenAiCompletionClient, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let config = CompletionConfig {
        api_key: "sk-test".to_owned(),
        api_base: format!("{}/v1/", server.uri()),
    };
    let client = OpenAiCompletionClient::new(&config, notifier.clone());
    (client, notifier)
}

#[tokio::test]
async fn test_returns_first_choice_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "text-davinci-003",
            "max_tokens": 384,
            "presence_penalty": 1.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cmpl-1",
            "choices": [
                {"text": "{\"headline\":\"H\",\"body\":[\"B\"]}", "index": 0},
                {"text": "ignored", "index": 1}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, notifier) = client(&server);
    let text = client.complete("Otters").await.unwrap();

    assert_eq!(text, "{\"headline\":\"H\",\"body\":[\"B\"]}");
    assert!(notifier.events().is_empty());
}

#[tokio::test]
async fn test_prompt_is_wrapped_in_template() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"text": "ok"}]
        })))
        .mount(&server)
        .await;

    let (client, _) = client(&server);
    client.complete("  Otters  ").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["prompt"].as_str().unwrap();
    assert!(prompt.contains("Otters\n"));
    assert!(prompt.contains("\"headline\""));
}

#[tokio::test]
async fn test_status_codes_map_to_completion_errors() {
    for (status, expected) in [
        (429, CompletionError::RateLimited),
        (503, CompletionError::Overloaded),
        (400, CompletionError::Unknown),
        (500, CompletionError::Unknown),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {"message": "nope"}
            })))
            .mount(&server)
            .await;

        let (client, notifier) = client(&server);
        let error = client.complete("Otters").await.unwrap_err();

        assert_eq!(error, expected, "status {status}");
        let events = notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "llm::completion: complete");
        assert!(events[0].1.contains(&status.to_string()));
    }
}

#[tokio::test]
async fn test_empty_choices_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let (client, notifier) = client(&server);
    assert_eq!(
        client.complete("Otters").await.unwrap_err(),
        CompletionError::Unknown
    );
    assert_eq!(notifier.events().len(), 1);
}

#[tokio::test]
async fn test_unreachable_api_is_unknown() {
    let server = MockServer::start().await;
    let (client, notifier) = client(&server);
    drop(server);

    assert_eq!(
        client.complete("Otters").await.unwrap_err(),
        CompletionError::Unknown
    );
    assert_eq!(notifier.events().len(), 1);
}
