// ABOUTME: Integration tests for ArticleService over a seeded in-memory store
// ABOUTME: Covers visibility of drafts, the authorization check, reactions, and generation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{seeded, seeded_default, MockCompletion, MOCK_ARTICLES};
use pressroom::articles::generation::GenerateRequest;
use pressroom::articles::ArticleUpdate;
use pressroom::llm::CompletionError;
use pressroom_core::errors::ErrorCode;
use pressroom_core::models::{ArticleStatus, MessageRole};

// ============================================================================
// Reads and visibility
// ============================================================================

#[tokio::test]
async fn test_published_articles_are_visible_to_everyone() {
    let fixture = seeded_default().await;
    let articles = &fixture.resources.articles;

    let anonymous = articles.get_published_articles(None, None).await;
    let ids: Vec<&str> = anonymous.iter().map(|a| a.id.as_str()).collect();

    assert_eq!(ids, vec![fixture.bob_published.as_str(), fixture.alice_published.as_str()]);
    assert!(anonymous.iter().all(|a| !a.is_created_by_current_user));
    assert!(anonymous
        .iter()
        .all(|a| a.status == Some(ArticleStatus::Published)));
}

#[tokio::test]
async fn test_published_articles_flag_the_requesters_own() {
    let fixture = seeded_default().await;

    let articles = fixture
        .resources
        .articles
        .get_published_articles(None, Some(&fixture.alice.id))
        .await;

    let own = articles
        .iter()
        .find(|a| a.id == fixture.alice_published)
        .unwrap();
    assert!(own.is_created_by_current_user);
    assert_eq!(own.user.as_ref().unwrap().nickname.as_deref(), Some("Alice"));

    let other = articles.iter().find(|a| a.id == fixture.bob_published).unwrap();
    assert!(!other.is_created_by_current_user);
}

#[tokio::test]
async fn test_category_narrows_published_list() {
    let fixture = seeded_default().await;
    let articles = &fixture.resources.articles;

    let politics = articles.get_published_articles(Some("Politics"), None).await;
    assert_eq!(politics.len(), 1);
    assert_eq!(politics[0].headline.as_deref(), Some(MOCK_ARTICLES[1].headline));

    // Drafts never leak through a category filter
    let business = articles.get_published_articles(Some("Business"), None).await;
    assert!(business.is_empty());
}

#[tokio::test]
async fn test_draft_only_visible_to_its_author() {
    let fixture = seeded_default().await;
    let articles = &fixture.resources.articles;

    let own = articles
        .get_article(Some(&fixture.alice_draft), Some(&fixture.alice.id))
        .await
        .unwrap();
    assert_eq!(own.status, Some(ArticleStatus::Draft));
    assert!(own.is_created_by_current_user);

    assert!(articles
        .get_article(Some(&fixture.alice_draft), Some(&fixture.bob.id))
        .await
        .is_none());
    assert!(articles
        .get_article(Some(&fixture.alice_draft), None)
        .await
        .is_none());
}

#[tokio::test]
async fn test_missing_article_reads_as_none() {
    let fixture = seeded_default().await;
    let articles = &fixture.resources.articles;

    assert!(articles.get_article(None, Some(&fixture.alice.id)).await.is_none());
    assert!(articles.get_article(Some(""), None).await.is_none());
    assert!(articles.get_article(Some("doesnotexist123"), None).await.is_none());
}

#[tokio::test]
async fn test_drafts_list_only_contains_own_drafts() {
    let fixture = seeded_default().await;

    let drafts = fixture.resources.articles.get_drafts(&fixture.bob.id).await;

    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].id, fixture.bob_draft);
}

#[tokio::test]
async fn test_malformed_filter_yields_empty_list() {
    let fixture = seeded_default().await;

    let articles = fixture
        .resources
        .articles
        .get_articles("status = ", None)
        .await;

    assert!(articles.is_empty());
}

#[tokio::test]
async fn test_articles_page_counts_matches() {
    let fixture = seeded_default().await;
    let articles = &fixture.resources.articles;

    let page = articles
        .get_articles_page(Some(&ArticleStatus::Published.filter()))
        .await
        .unwrap();
    assert_eq!(page.total_items, 2);
    assert_eq!(page.per_page, 1);
    assert_eq!(page.items.len(), 1);

    let everything = articles.get_articles_page(None).await.unwrap();
    assert_eq!(everything.total_items, 4);

    assert!(articles.get_articles_page(Some("&&")).await.is_none());
}

// ============================================================================
// Authorization check
// ============================================================================

#[tokio::test]
async fn test_is_current_user_author() {
    let fixture = seeded_default().await;
    let articles = &fixture.resources.articles;
    let alice = Some(fixture.alice.id.as_str());
    let bob = Some(fixture.bob.id.as_str());

    assert!(articles.is_current_user_author(Some(&fixture.alice_published), alice).await);
    assert!(articles.is_current_user_author(Some(&fixture.alice_draft), alice).await);
    assert!(!articles.is_current_user_author(Some(&fixture.alice_published), bob).await);
    assert!(!articles.is_current_user_author(Some(&fixture.alice_draft), bob).await);
    assert!(!articles.is_current_user_author(Some(&fixture.alice_published), None).await);
    assert!(!articles.is_current_user_author(None, alice).await);
    assert!(!articles.is_current_user_author(Some("nope"), alice).await);
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn test_draft_appears_on_homepage_once_published() {
    let fixture = seeded_default().await;
    let articles = &fixture.resources.articles;
    let alice = fixture.alice.id.as_str();

    let draft = articles
        .create_article(alice, ArticleStatus::Draft)
        .await
        .unwrap();
    assert_eq!(draft.status, Some(ArticleStatus::Draft));
    assert_eq!(draft.model.as_deref(), Some("text-davinci-003"));
    assert!(draft.is_created_by_current_user);

    let listed = articles.get_published_articles(None, Some(alice)).await;
    assert!(listed.iter().all(|a| a.id != draft.id));

    let published = articles
        .update_article(&draft.id, &ArticleUpdate::status(ArticleStatus::Published), Some(alice))
        .await
        .unwrap();
    assert_eq!(published.status, Some(ArticleStatus::Published));

    let listed = articles.get_published_articles(None, None).await;
    assert_eq!(listed[0].id, draft.id);
}

#[tokio::test]
async fn test_create_article_requires_an_owner() {
    let fixture = seeded_default().await;

    assert!(fixture
        .resources
        .articles
        .create_article("", ArticleStatus::Draft)
        .await
        .is_none());
}

#[tokio::test]
async fn test_delete_cascades_to_messages() {
    let fixture = seeded_default().await;
    let articles = &fixture.resources.articles;

    articles
        .create_message(&fixture.bob_published, MessageRole::User, "write about marathons")
        .await
        .unwrap();

    assert_eq!(articles.delete_article(&fixture.bob_published).await, Some(true));
    assert!(articles.get_article(Some(&fixture.bob_published), None).await.is_none());
    assert_eq!(articles.delete_article(&fixture.bob_published).await, None);
}

#[tokio::test]
async fn test_messages_are_expanded_in_order() {
    let fixture = seeded_default().await;
    let articles = &fixture.resources.articles;

    articles
        .create_message(&fixture.alice_draft, MessageRole::User, "first")
        .await
        .unwrap();
    articles
        .create_message(&fixture.alice_draft, MessageRole::Assistant, "second")
        .await
        .unwrap();

    let article = articles
        .get_article(Some(&fixture.alice_draft), Some(&fixture.alice.id))
        .await
        .unwrap();
    let contents: Vec<&str> = article.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second"]);
    assert_eq!(article.messages[0].role, Some(MessageRole::User));
}

// ============================================================================
// Reactions
// ============================================================================

#[tokio::test]
async fn test_reaction_toggles_and_switches() {
    let fixture = seeded_default().await;
    let articles = &fixture.resources.articles;
    let article_id = fixture.alice_published.as_str();

    let reacted = articles.react(article_id, &fixture.bob.id, "🔥").await.unwrap();
    assert_eq!(reacted.reactions.total, 1);
    assert_eq!(reacted.reactions.current_user_reaction.as_deref(), Some("🔥"));

    let switched = articles.react(article_id, &fixture.bob.id, "👍").await.unwrap();
    assert_eq!(switched.reactions.total, 1);
    assert_eq!(switched.reactions.current_user_reaction.as_deref(), Some("👍"));

    let by_alice = articles.react(article_id, &fixture.alice.id, "👍").await.unwrap();
    assert_eq!(by_alice.reactions.total, 2);
    assert_eq!(by_alice.reactions.counts.len(), 1);
    assert_eq!(by_alice.reactions.counts[0].count, 2);

    let cleared = articles.react(article_id, &fixture.bob.id, "👍").await.unwrap();
    assert_eq!(cleared.reactions.total, 1);
    assert!(!cleared.reactions.has_reacted);
}

#[tokio::test]
async fn test_reaction_on_hidden_draft_is_not_found() {
    let fixture = seeded_default().await;

    let error = fixture
        .resources
        .articles
        .react(&fixture.alice_draft, &fixture.bob.id, "🔥")
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ResourceNotFound);
    assert_eq!(error.message, "Not found");
}

#[tokio::test]
async fn test_reaction_requires_a_kind() {
    let fixture = seeded_default().await;

    let error = fixture
        .resources
        .articles
        .react(&fixture.alice_published, &fixture.bob.id, "   ")
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::InvalidInput);
}

// ============================================================================
// Generation workflow
// ============================================================================

#[tokio::test]
async fn test_generation_fills_the_draft() {
    let fixture = seeded_default().await;
    let request = GenerateRequest {
        prompt: "  Otters take over the harbor  ".to_owned(),
        category: None,
    };

    let article = fixture
        .resources
        .articles
        .generate_article(&fixture.alice.id, &request)
        .await
        .unwrap();

    assert_eq!(article.status, Some(ArticleStatus::Draft));
    assert_eq!(article.headline.as_deref(), Some("Otters Seize Control Of Harbor"));
    assert_eq!(article.body.len(), 2);
    assert_eq!(article.category.as_deref(), Some("Nature"));
    assert!(article.is_created_by_current_user);

    let roles: Vec<Option<MessageRole>> = article.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Some(MessageRole::User), Some(MessageRole::Assistant)]);
    assert_eq!(article.messages[0].content, "Otters take over the harbor");

    assert_eq!(fixture.completion.prompts(), vec!["Otters take over the harbor"]);
}

#[tokio::test]
async fn test_generation_keeps_requested_category() {
    let fixture = seeded_default().await;
    let request = GenerateRequest {
        prompt: "Otters".to_owned(),
        category: Some("Science".to_owned()),
    };

    let article = fixture
        .resources
        .articles
        .generate_article(&fixture.bob.id, &request)
        .await
        .unwrap();

    assert_eq!(article.category.as_deref(), Some("Science"));
}

#[tokio::test]
async fn test_generation_surfaces_completion_errors() {
    for (failure, status) in [
        (CompletionError::RateLimited, 429),
        (CompletionError::Overloaded, 503),
        (CompletionError::Unknown, 500),
    ] {
        let fixture = seeded(MockCompletion::failing(failure)).await;
        let request = GenerateRequest {
            prompt: "Anything".to_owned(),
            category: None,
        };

        let error = fixture
            .resources
            .articles
            .generate_article(&fixture.alice.id, &request)
            .await
            .unwrap_err();
        assert_eq!(error.http_status(), status);
        assert_eq!(error.message, failure.to_string());

        // The draft and the prompt survive the failure
        let drafts = fixture.resources.articles.get_drafts(&fixture.alice.id).await;
        assert_eq!(drafts.len(), 2);
        let fresh = drafts.iter().find(|a| a.id != fixture.alice_draft).unwrap();
        assert_eq!(fresh.messages.len(), 1);
    }
}

#[tokio::test]
async fn test_generation_rejects_unparseable_completion() {
    let fixture = seeded(MockCompletion::replying("I'd rather not.")).await;
    let request = GenerateRequest {
        prompt: "Anything".to_owned(),
        category: None,
    };

    let error = fixture
        .resources
        .articles
        .generate_article(&fixture.alice.id, &request)
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalServiceError);
    assert_eq!(error.http_status(), 502);
}

#[tokio::test]
async fn test_generation_rejects_blank_prompt() {
    let fixture = seeded_default().await;
    let request = GenerateRequest {
        prompt: " \n ".to_owned(),
        category: None,
    };

    let error = fixture
        .resources
        .articles
        .generate_article(&fixture.alice.id, &request)
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert!(fixture.completion.prompts().is_empty());
}
