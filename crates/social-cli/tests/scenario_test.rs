//! Integration tests for the demo scenario.

use chrono::{TimeZone, Utc};
use social_cli::config::{Config, LogFormat};
use social_cli::error::AppError;
use social_cli::scenario::{self, COMMENTER, EDITED_COMMENT_TEXT};
use social_core::aggregate::AggregateRoot;
use social_core::error::DomainError;
use social_core::repository::EventRepository;
use social_event_store::InMemoryEventRepository;
use social_test_support::{FailingEventRepository, FixedClock, SequenceIds, init_tracing};
use uuid::Uuid;

fn config() -> Config {
    Config {
        log_format: LogFormat::Json,
        author: "alice".to_owned(),
        message: "hi".to_owned(),
    }
}

fn fixed_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
}

#[tokio::test]
async fn test_scenario_ends_with_deleted_post_and_edited_comment() {
    // Arrange
    init_tracing();
    let post_id = Uuid::new_v4();
    let ids = SequenceIds::new(vec![post_id]);
    let repo = InMemoryEventRepository::new();

    // Act
    let report = scenario::run(&config(), &fixed_clock(), &ids, &repo)
        .await
        .unwrap();

    // Assert
    assert_eq!(report.post_id, post_id);
    assert!(!report.post.is_active());
    assert_eq!(report.post.author(), "alice");
    let comment = report.post.comment(report.comment_id).unwrap();
    assert_eq!(comment.text, EDITED_COMMENT_TEXT);
    assert!(comment.username.eq_ignore_ascii_case(COMMENTER));
    assert_eq!(report.rejections.len(), 2);
}

#[tokio::test]
async fn test_scenario_persists_only_accepted_steps() {
    let post_id = Uuid::new_v4();
    let ids = SequenceIds::new(vec![post_id]);
    let repo = InMemoryEventRepository::new();

    let report = scenario::run(&config(), &fixed_clock(), &ids, &repo)
        .await
        .unwrap();

    // create, add comment, edit comment, delete
    let events = repo.load_events(post_id).await.unwrap();
    let types: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(
        types,
        vec![
            "post.post_created",
            "post.comment_added",
            "post.comment_updated",
            "post.post_removed",
        ]
    );
    assert_eq!(report.post.version(), 3);
    assert!(report.post.uncommitted_events().is_empty());
}

#[tokio::test]
async fn test_scenario_uses_configured_author() {
    let repo = InMemoryEventRepository::new();
    let config = Config {
        author: "dana".to_owned(),
        ..config()
    };

    let report = scenario::run(&config, &fixed_clock(), &SequenceIds::new(vec![]), &repo)
        .await
        .unwrap();

    assert_eq!(report.post.author(), "dana");
    assert!(!report.post.is_active());
}

#[tokio::test]
async fn test_scenario_surfaces_store_failure() {
    let result = scenario::run(
        &config(),
        &fixed_clock(),
        &SequenceIds::new(vec![]),
        &FailingEventRepository,
    )
    .await;

    assert!(matches!(
        result,
        Err(AppError::Domain(DomainError::Infrastructure(_)))
    ));
}
