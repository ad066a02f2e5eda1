//! Command handlers for the post aggregate.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load aggregate, execute command, persist events.

use social_core::aggregate::AggregateRoot;
use social_core::clock::Clock;
use social_core::command::{Command, CommandContext};
use social_core::error::DomainError;
use social_core::event_sourcing;
use social_core::id::IdGenerator;
use social_core::repository::{EventRepository, StoredEvent};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::aggregates::Post;
use crate::domain::commands::{
    AddComment, CreatePost, DeletePost, EditComment, EditMessage, LikePost, RemoveComment,
};

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct PostCommandResult {
    /// The aggregate ID affected by the command.
    pub aggregate_id: Uuid,
    /// The stored events produced and persisted.
    pub stored_events: Vec<StoredEvent>,
    /// ID of the comment created by `AddComment`; `None` for other commands.
    pub comment_id: Option<Uuid>,
}

/// Persists the post's uncommitted events and builds the handler result.
async fn commit(
    command: &dyn Command,
    post: &mut Post,
    repo: &dyn EventRepository,
) -> Result<PostCommandResult, DomainError> {
    let stored_events = event_sourcing::save(repo, post).await?;
    info!(
        command_type = command.command_type(),
        event_count = stored_events.len(),
        version = post.version(),
        "command handled"
    );
    Ok(PostCommandResult {
        aggregate_id: command.aggregate_id(),
        stored_events,
        comment_id: None,
    })
}

/// Handles the `CreatePost` command: publishes a new post and persists the
/// resulting event.
///
/// # Errors
///
/// Returns `DomainError::InvalidOperation` if a post with the same ID already
/// exists, or `DomainError` if event loading or appending fails.
#[instrument(skip_all, fields(post_id = %command.post_id, correlation_id = %command.correlation_id))]
pub async fn handle_create_post(
    command: &CreatePost,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    repo: &dyn EventRepository,
) -> Result<PostCommandResult, DomainError> {
    let existing_events = repo.load_events(command.post_id).await?;
    if !existing_events.is_empty() {
        return Err(DomainError::InvalidOperation(format!(
            "post {} already exists",
            command.post_id
        )));
    }

    let ctx = CommandContext::new(command.correlation_id, clock, ids);
    let mut post = Post::create(command.post_id, &command.author, &command.message, &ctx);

    commit(command, &mut post, repo).await
}

/// Handles the `EditMessage` command: loads the post, edits its message, and
/// persists the resulting event.
///
/// # Errors
///
/// Returns `DomainError` if the post does not exist, the edit violates a post
/// invariant, or event loading or appending fails.
#[instrument(skip_all, fields(post_id = %command.post_id, correlation_id = %command.correlation_id))]
pub async fn handle_edit_message(
    command: &EditMessage,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    repo: &dyn EventRepository,
) -> Result<PostCommandResult, DomainError> {
    let mut post: Post = event_sourcing::load(repo, command.post_id).await?;
    let ctx = CommandContext::new(command.correlation_id, clock, ids);

    post.edit_message(&command.message, &ctx)?;

    commit(command, &mut post, repo).await
}

/// Handles the `LikePost` command: loads the post, likes it, and persists the
/// resulting event.
///
/// # Errors
///
/// Returns `DomainError` if the post does not exist or is inactive, or event
/// loading or appending fails.
#[instrument(skip_all, fields(post_id = %command.post_id, correlation_id = %command.correlation_id))]
pub async fn handle_like_post(
    command: &LikePost,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    repo: &dyn EventRepository,
) -> Result<PostCommandResult, DomainError> {
    let mut post: Post = event_sourcing::load(repo, command.post_id).await?;
    let ctx = CommandContext::new(command.correlation_id, clock, ids);

    post.like(&ctx)?;

    commit(command, &mut post, repo).await
}

/// Handles the `AddComment` command: loads the post, adds the comment, and
/// persists the resulting event. The new comment's ID is returned in
/// [`PostCommandResult::comment_id`].
///
/// # Errors
///
/// Returns `DomainError` if the post does not exist, the comment violates a
/// post invariant, or event loading or appending fails.
#[instrument(skip_all, fields(post_id = %command.post_id, correlation_id = %command.correlation_id))]
pub async fn handle_add_comment(
    command: &AddComment,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    repo: &dyn EventRepository,
) -> Result<PostCommandResult, DomainError> {
    let mut post: Post = event_sourcing::load(repo, command.post_id).await?;
    let ctx = CommandContext::new(command.correlation_id, clock, ids);

    let comment_id = post.add_comment(&command.comment, &command.username, &ctx)?;

    let result = commit(command, &mut post, repo).await?;
    Ok(PostCommandResult {
        comment_id: Some(comment_id),
        ..result
    })
}

/// Handles the `EditComment` command: loads the post, edits the comment, and
/// persists the resulting event.
///
/// # Errors
///
/// Returns `DomainError::EntityNotFound` if the comment does not exist, or
/// `DomainError` if the post does not exist, the caller did not write the
/// comment, or event loading or appending fails.
#[instrument(
    skip_all,
    fields(
        post_id = %command.post_id,
        comment_id = %command.comment_id,
        correlation_id = %command.correlation_id
    )
)]
pub async fn handle_edit_comment(
    command: &EditComment,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    repo: &dyn EventRepository,
) -> Result<PostCommandResult, DomainError> {
    let mut post: Post = event_sourcing::load(repo, command.post_id).await?;
    let ctx = CommandContext::new(command.correlation_id, clock, ids);

    post.edit_comment(
        command.comment_id,
        &command.comment,
        &command.username,
        &ctx,
    )?;

    commit(command, &mut post, repo).await
}

/// Handles the `RemoveComment` command: loads the post, removes the comment,
/// and persists the resulting event.
///
/// # Errors
///
/// Returns `DomainError::EntityNotFound` if the comment does not exist, or
/// `DomainError` if the post does not exist, the caller did not write the
/// comment, or event loading or appending fails.
#[instrument(
    skip_all,
    fields(
        post_id = %command.post_id,
        comment_id = %command.comment_id,
        correlation_id = %command.correlation_id
    )
)]
pub async fn handle_remove_comment(
    command: &RemoveComment,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    repo: &dyn EventRepository,
) -> Result<PostCommandResult, DomainError> {
    let mut post: Post = event_sourcing::load(repo, command.post_id).await?;
    let ctx = CommandContext::new(command.correlation_id, clock, ids);

    post.remove_comment(command.comment_id, &command.username, &ctx)?;

    commit(command, &mut post, repo).await
}

/// Handles the `DeletePost` command: loads the post, deletes it, and persists
/// the resulting event.
///
/// # Errors
///
/// Returns `DomainError` if the post does not exist or is already removed,
/// the caller is not the author, or event loading or appending fails.
#[instrument(skip_all, fields(post_id = %command.post_id, correlation_id = %command.correlation_id))]
pub async fn handle_delete_post(
    command: &DeletePost,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    repo: &dyn EventRepository,
) -> Result<PostCommandResult, DomainError> {
    let mut post: Post = event_sourcing::load(repo, command.post_id).await?;
    let ctx = CommandContext::new(command.correlation_id, clock, ids);

    post.delete(&command.username, &ctx)?;

    commit(command, &mut post, repo).await
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use social_core::error::DomainError;
    use social_core::id::RandomIds;
    use social_core::repository::{NO_EVENTS_VERSION, StoredEvent};
    use social_test_support::{
        EmptyEventRepository, FailingEventRepository, FixedClock, RecordingEventRepository,
        SequenceIds,
    };
    use uuid::Uuid;

    use super::*;
    use crate::domain::events::{
        COMMENT_ADDED_EVENT_TYPE, CommentAdded, POST_CREATED_EVENT_TYPE, POST_LIKED_EVENT_TYPE,
        POST_REMOVED_EVENT_TYPE, PostCreated, PostEventKind,
    };

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    fn post_created(post_id: Uuid) -> StoredEvent {
        StoredEvent {
            event_id: Uuid::new_v4(),
            aggregate_id: post_id,
            event_type: POST_CREATED_EVENT_TYPE.to_owned(),
            payload: serde_json::to_value(PostEventKind::PostCreated(PostCreated {
                author: "alice".to_owned(),
                message: "hi".to_owned(),
                date_posted: fixed_now(),
            }))
            .unwrap(),
            sequence_number: 0,
            correlation_id: Uuid::new_v4(),
            causation_id: Uuid::new_v4(),
            occurred_at: fixed_now(),
        }
    }

    fn comment_added(post_id: Uuid, comment_id: Uuid, sequence_number: i64) -> StoredEvent {
        StoredEvent {
            event_id: Uuid::new_v4(),
            aggregate_id: post_id,
            event_type: COMMENT_ADDED_EVENT_TYPE.to_owned(),
            payload: serde_json::to_value(PostEventKind::CommentAdded(CommentAdded {
                comment_id,
                comment_text: "nice post".to_owned(),
                username: "bob".to_owned(),
                comment_date: fixed_now(),
            }))
            .unwrap(),
            sequence_number,
            correlation_id: Uuid::new_v4(),
            causation_id: Uuid::new_v4(),
            occurred_at: fixed_now(),
        }
    }

    #[tokio::test]
    async fn test_handle_create_post_appends_post_created_to_new_stream() {
        // Arrange
        let post_id = Uuid::new_v4();
        let event_id = Uuid::new_v4();
        let clock = FixedClock(fixed_now());
        let ids = SequenceIds::new(vec![event_id]);
        let repo = RecordingEventRepository::new(Vec::new());
        let command = CreatePost {
            correlation_id: Uuid::new_v4(),
            post_id,
            author: "alice".to_owned(),
            message: "hi".to_owned(),
        };

        // Act
        let result = handle_create_post(&command, &clock, &ids, &repo)
            .await
            .unwrap();

        // Assert
        assert_eq!(result.aggregate_id, post_id);
        assert_eq!(result.stored_events.len(), 1);
        assert_eq!(result.comment_id, None);

        let appended = repo.appended_events();
        assert_eq!(appended.len(), 1);
        let (aggregate_id, expected_version, events) = &appended[0];
        assert_eq!(*aggregate_id, post_id);
        assert_eq!(*expected_version, NO_EVENTS_VERSION);

        let stored = &events[0];
        assert_eq!(stored.event_id, event_id);
        assert_eq!(stored.event_type, POST_CREATED_EVENT_TYPE);
        assert_eq!(stored.sequence_number, 0);
        assert_eq!(stored.correlation_id, command.correlation_id);
        assert_eq!(stored.occurred_at, fixed_now());
        assert_eq!(stored.payload["PostCreated"]["author"], "alice");
    }

    #[tokio::test]
    async fn test_handle_create_post_rejects_existing_stream() {
        let post_id = Uuid::new_v4();
        let clock = FixedClock(fixed_now());
        let repo = RecordingEventRepository::new(vec![post_created(post_id)]);
        let command = CreatePost {
            correlation_id: Uuid::new_v4(),
            post_id,
            author: "alice".to_owned(),
            message: "again".to_owned(),
        };

        let result = handle_create_post(&command, &clock, &RandomIds, &repo).await;

        match result.unwrap_err() {
            DomainError::InvalidOperation(msg) => assert!(msg.contains("already exists")),
            other => panic!("expected InvalidOperation, got {other:?}"),
        }
        assert!(repo.appended_events().is_empty());
    }

    #[tokio::test]
    async fn test_handle_like_post_appends_at_loaded_version() {
        // Arrange
        let post_id = Uuid::new_v4();
        let clock = FixedClock(fixed_now());
        let repo = RecordingEventRepository::new(vec![
            post_created(post_id),
            comment_added(post_id, Uuid::new_v4(), 1),
        ]);
        let command = LikePost {
            correlation_id: Uuid::new_v4(),
            post_id,
        };

        // Act
        let result = handle_like_post(&command, &clock, &RandomIds, &repo)
            .await
            .unwrap();

        // Assert
        assert_eq!(result.stored_events.len(), 1);
        let appended = repo.appended_events();
        let (_, expected_version, events) = &appended[0];
        assert_eq!(*expected_version, 1);
        assert_eq!(events[0].sequence_number, 2);
        assert_eq!(events[0].event_type, POST_LIKED_EVENT_TYPE);
    }

    #[tokio::test]
    async fn test_handle_add_comment_returns_new_comment_id() {
        let post_id = Uuid::new_v4();
        let comment_id = Uuid::new_v4();
        let event_id = Uuid::new_v4();
        let clock = FixedClock(fixed_now());
        let ids = SequenceIds::new(vec![comment_id, event_id]);
        let repo = RecordingEventRepository::new(vec![post_created(post_id)]);
        let command = AddComment {
            correlation_id: Uuid::new_v4(),
            post_id,
            comment: "nice post".to_owned(),
            username: "bob".to_owned(),
        };

        let result = handle_add_comment(&command, &clock, &ids, &repo)
            .await
            .unwrap();

        assert_eq!(result.comment_id, Some(comment_id));
        let stored = &result.stored_events[0];
        assert_eq!(stored.event_id, event_id);
        assert_eq!(
            stored.payload["CommentAdded"]["comment_id"],
            comment_id.to_string()
        );
    }

    #[tokio::test]
    async fn test_handle_edit_comment_rejects_other_user_without_appending() {
        let post_id = Uuid::new_v4();
        let comment_id = Uuid::new_v4();
        let clock = FixedClock(fixed_now());
        let repo = RecordingEventRepository::new(vec![
            post_created(post_id),
            comment_added(post_id, comment_id, 1),
        ]);
        let command = EditComment {
            correlation_id: Uuid::new_v4(),
            post_id,
            comment_id,
            comment: "nicer post".to_owned(),
            username: "carol".to_owned(),
        };

        let result = handle_edit_comment(&command, &clock, &RandomIds, &repo).await;

        assert!(matches!(result, Err(DomainError::InvalidOperation(_))));
        assert!(repo.appended_events().is_empty());
    }

    #[tokio::test]
    async fn test_handle_remove_comment_reports_missing_comment() {
        let post_id = Uuid::new_v4();
        let missing = Uuid::new_v4();
        let clock = FixedClock(fixed_now());
        let repo = RecordingEventRepository::new(vec![post_created(post_id)]);
        let command = RemoveComment {
            correlation_id: Uuid::new_v4(),
            post_id,
            comment_id: missing,
            username: "bob".to_owned(),
        };

        let result = handle_remove_comment(&command, &clock, &RandomIds, &repo).await;

        match result.unwrap_err() {
            DomainError::EntityNotFound { entity, id } => {
                assert_eq!(entity, "comment");
                assert_eq!(id, missing);
            }
            other => panic!("expected EntityNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_delete_post_appends_post_removed() {
        let post_id = Uuid::new_v4();
        let clock = FixedClock(fixed_now());
        let repo = RecordingEventRepository::new(vec![post_created(post_id)]);
        let command = DeletePost {
            correlation_id: Uuid::new_v4(),
            post_id,
            username: "Alice".to_owned(),
        };

        let result = handle_delete_post(&command, &clock, &RandomIds, &repo)
            .await
            .unwrap();

        assert_eq!(result.stored_events[0].event_type, POST_REMOVED_EVENT_TYPE);
    }

    #[tokio::test]
    async fn test_handle_edit_message_returns_not_found_for_unknown_post() {
        let post_id = Uuid::new_v4();
        let clock = FixedClock(fixed_now());
        let command = EditMessage {
            correlation_id: Uuid::new_v4(),
            post_id,
            message: "hello".to_owned(),
        };

        let result = handle_edit_message(&command, &clock, &RandomIds, &EmptyEventRepository).await;

        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, post_id),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handlers_propagate_repository_failure() {
        let clock = FixedClock(fixed_now());
        let command = LikePost {
            correlation_id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
        };

        let result = handle_like_post(&command, &clock, &RandomIds, &FailingEventRepository).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
