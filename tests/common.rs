// ABOUTME: Shared fixtures for integration tests: seeded in-memory store and a scripted completion model
// ABOUTME: Alice and Bob each own one draft and one published article
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `pressroom`

use async_trait::async_trait;
use pressroom::backend::{MemoryStore, RecordStore};
use pressroom::config::CorsConfig;
use pressroom::llm::{CompletionError, CompletionProvider};
use pressroom::notifications::EventNotifier;
use pressroom::resources::ServerResources;
use pressroom::server;
use pressroom_core::constants::{collections, completion};
use pressroom_core::models::ArticleStatus;
use serde_json::json;
use std::sync::{Arc, Mutex, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

pub const PASSWORD: &str = "playwright";

pub struct TestUser {
    pub email: &'static str,
    pub nickname: &'static str,
}

pub const ALICE: TestUser = TestUser {
    email: "alice@example.com",
    nickname: "Alice",
};

pub const BOB: TestUser = TestUser {
    email: "bob@example.com",
    nickname: "Bob",
};

pub const CHARLIE: TestUser = TestUser {
    email: "charlie@example.com",
    nickname: "Charlie",
};

pub struct MockArticle {
    pub headline: &'static str,
    pub body: &'static [&'static str],
    pub category: &'static str,
}

pub const MOCK_ARTICLES: [MockArticle; 4] = [
    MockArticle {
        headline: "Local Bakery Replaces Ovens With Volcano",
        body: &[
            "The bakery on Elm Street announced a bold change to its kitchen.",
            "Customers report the croissants are now noticeably warmer.",
        ],
        category: "Business",
    },
    MockArticle {
        headline: "City Council Votes To Rename Tuesday",
        body: &[
            "In a narrow vote the council approved renaming the second weekday.",
            "Residents will be asked to suggest alternatives by Friday.",
        ],
        category: "Politics",
    },
    MockArticle {
        headline: "Retired Astronaut Opens Zero Gravity Gym",
        body: &["Members float between machines under expert supervision."],
        category: "Science",
    },
    MockArticle {
        headline: "Marathon Won By Runner Who Took Wrong Turn",
        body: &[
            "The winner crossed the line an hour early after a missed corner.",
            "Organizers are reviewing the course markings.",
        ],
        category: "Sports",
    },
];

/// A verified user with an open session
#[derive(Debug, Clone)]
pub struct SeededUser {
    pub id: String,
    pub token: String,
}

/// Completion model with a scripted answer that records every prompt
pub struct MockCompletion {
    reply: Result<String, CompletionError>,
    prompts: Mutex<Vec<String>>,
}

impl MockCompletion {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_owned()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: CompletionError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(error),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletion {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        self.reply.clone()
    }
}

/// Notifier that keeps every event for inspection
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<(String, String)> {
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

/// Resources over an arbitrary store with a recording notifier
pub fn resources_over(
    store: Arc<dyn RecordStore>,
    completion: Arc<MockCompletion>,
) -> (Arc<ServerResources>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let provider: Arc<dyn CompletionProvider> = completion;
    let resources = Arc::new(ServerResources::new(store, provider, notifier.clone()));
    (resources, notifier)
}

/// A well-formed model answer
pub const GENERATED_ARTICLE: &str = r#"
{"headline":"Otters Seize Control Of Harbor","body":["Otters took the harbor at dawn.","The harbormaster has surrendered."],"keywords":["Nature","Animals","Local"]}"#;

/// Seeded store plus handles to everything tests poke at
pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub resources: Arc<ServerResources>,
    pub completion: Arc<MockCompletion>,
    pub notifier: Arc<RecordingNotifier>,
    pub alice: SeededUser,
    pub bob: SeededUser,
    pub alice_draft: String,
    pub alice_published: String,
    pub bob_draft: String,
    pub bob_published: String,
}

impl Fixture {
    /// Application router over the fixture's resources
    pub fn router(&self) -> axum::Router {
        server::router(&self.resources, &CorsConfig::default())
    }
}

/// Create a user, mark it verified, and log it in
pub async fn create_verified_user(store: &MemoryStore, user: &TestUser) -> SeededUser {
    let record = store
        .create(
            collections::USERS,
            json!({
                "email": user.email,
                "nickname": user.nickname,
                "password": PASSWORD,
                "passwordConfirm": PASSWORD,
                "terms": true
            }),
            &Default::default(),
        )
        .await
        .expect("create user");
    store
        .update(
            collections::USERS,
            &record.id,
            json!({ "verified": true }),
            &Default::default(),
        )
        .await
        .expect("verify user");

    let auth = store
        .auth_with_password(collections::USERS, user.email, PASSWORD)
        .await
        .expect("login user");
    SeededUser {
        id: record.id,
        token: auth.token,
    }
}

/// Store an article directly, bypassing the generation workflow
pub async fn create_article(
    store: &MemoryStore,
    article: &MockArticle,
    status: ArticleStatus,
    user_id: &str,
) -> String {
    store
        .create(
            collections::ARTICLES,
            json!({
                "headline": article.headline,
                "body": article.body,
                "category": article.category,
                "status": status,
                "model": completion::CURRENT_MODEL,
                "user": user_id
            }),
            &Default::default(),
        )
        .await
        .expect("create article")
        .id
}

/// Alice and Bob with one draft and one published article each
pub async fn seeded(completion: Arc<MockCompletion>) -> Fixture {
    init_test_logging();
    let store = Arc::new(MemoryStore::new("http://127.0.0.1:8090"));

    let alice = create_verified_user(&store, &ALICE).await;
    let bob = create_verified_user(&store, &BOB).await;

    let alice_draft =
        create_article(&store, &MOCK_ARTICLES[0], ArticleStatus::Draft, &alice.id).await;
    let alice_published =
        create_article(&store, &MOCK_ARTICLES[1], ArticleStatus::Published, &alice.id).await;
    let bob_draft =
        create_article(&store, &MOCK_ARTICLES[2], ArticleStatus::Draft, &bob.id).await;
    let bob_published =
        create_article(&store, &MOCK_ARTICLES[3], ArticleStatus::Published, &bob.id).await;

    let record_store: Arc<dyn RecordStore> = store.clone();
    let (resources, notifier) = resources_over(record_store, completion.clone());

    Fixture {
        store,
        resources,
        completion,
        notifier,
        alice,
        bob,
        alice_draft,
        alice_published,
        bob_draft,
        bob_published,
    }
}

/// Seeded fixture whose model returns [`GENERATED_ARTICLE`]
pub async fn seeded_default() -> Fixture {
    seeded(MockCompletion::replying(GENERATED_ARTICLE)).await
}
