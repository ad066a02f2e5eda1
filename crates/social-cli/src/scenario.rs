//! The scripted post lifecycle run by the demo binary.
//!
//! A post is created, commented on, edited by the wrong user and then by the
//! right one (with different casing), deleted by its author, and finally
//! liked after deletion. The two rejected steps must fail with
//! `DomainError::InvalidOperation`; every other step must succeed.

use social_core::aggregate::AggregateRoot;
use social_core::clock::Clock;
use social_core::error::DomainError;
use social_core::event_sourcing;
use social_core::id::IdGenerator;
use social_core::repository::EventRepository;
use social_post::application::command_handlers;
use social_post::domain::aggregates::Post;
use social_post::domain::commands::{AddComment, CreatePost, DeletePost, EditComment, LikePost};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

/// Comment text added by the scenario.
pub const COMMENT_TEXT: &str = "nice post";
/// Replacement comment text.
pub const EDITED_COMMENT_TEXT: &str = "nicer post";
/// Writer of the comment.
pub const COMMENTER: &str = "bob";
/// A user who did not write the comment.
pub const INTRUDER: &str = "carol";

/// Outcome of a scenario run.
#[derive(Debug)]
pub struct ScenarioReport {
    /// The post driven through the scenario.
    pub post_id: Uuid,
    /// The comment added to the post.
    pub comment_id: Uuid,
    /// Reasons given for the steps the domain rejected, in order.
    pub rejections: Vec<String>,
    /// The post as reloaded from the store after the last step.
    pub post: Post,
}

/// Runs the scenario against `repo`.
///
/// # Errors
///
/// Returns `AppError::Domain` if a step that should succeed fails, and
/// `AppError::UnexpectedSuccess` if a step that should be rejected succeeds.
#[instrument(skip_all, fields(author = %config.author))]
pub async fn run(
    config: &Config,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    repo: &dyn EventRepository,
) -> Result<ScenarioReport, AppError> {
    let post_id = ids.next_id();
    let mut rejections = Vec::new();

    command_handlers::handle_create_post(
        &CreatePost {
            correlation_id: ids.next_id(),
            post_id,
            author: config.author.clone(),
            message: config.message.clone(),
        },
        clock,
        ids,
        repo,
    )
    .await?;
    info!(%post_id, "post created");

    let added = command_handlers::handle_add_comment(
        &AddComment {
            correlation_id: ids.next_id(),
            post_id,
            comment: COMMENT_TEXT.to_owned(),
            username: COMMENTER.to_owned(),
        },
        clock,
        ids,
        repo,
    )
    .await?;
    let comment_id = added
        .comment_id
        .ok_or_else(|| DomainError::Infrastructure("comment id missing from result".into()))?;
    info!(%comment_id, "comment added");

    let intruder_edit = command_handlers::handle_edit_comment(
        &edit_comment(post_id, comment_id, INTRUDER, ids),
        clock,
        ids,
        repo,
    )
    .await;
    rejections.push(expect_rejection(intruder_edit, "edit comment as another user")?);

    command_handlers::handle_edit_comment(
        &edit_comment(post_id, comment_id, &COMMENTER.to_uppercase(), ids),
        clock,
        ids,
        repo,
    )
    .await?;
    info!(%comment_id, "comment edited");

    command_handlers::handle_delete_post(
        &DeletePost {
            correlation_id: ids.next_id(),
            post_id,
            username: config.author.clone(),
        },
        clock,
        ids,
        repo,
    )
    .await?;
    info!(%post_id, "post deleted");

    let late_like = command_handlers::handle_like_post(
        &LikePost {
            correlation_id: ids.next_id(),
            post_id,
        },
        clock,
        ids,
        repo,
    )
    .await;
    rejections.push(expect_rejection(late_like, "like a deleted post")?);

    let post: Post = event_sourcing::load(repo, post_id).await?;
    info!(
        %post_id,
        active = post.is_active(),
        author = post.author(),
        comment_count = post.comment_count(),
        version = post.version(),
        "post reloaded"
    );

    Ok(ScenarioReport {
        post_id,
        comment_id,
        rejections,
        post,
    })
}

fn edit_comment(
    post_id: Uuid,
    comment_id: Uuid,
    username: &str,
    ids: &dyn IdGenerator,
) -> EditComment {
    EditComment {
        correlation_id: ids.next_id(),
        post_id,
        comment_id,
        comment: EDITED_COMMENT_TEXT.to_owned(),
        username: username.to_owned(),
    }
}

fn expect_rejection<T>(
    result: Result<T, DomainError>,
    step: &'static str,
) -> Result<String, AppError> {
    match result {
        Ok(_) => Err(AppError::UnexpectedSuccess(step)),
        Err(DomainError::InvalidOperation(reason)) => {
            warn!(step, %reason, "step rejected");
            Ok(reason)
        }
        Err(other) => Err(other.into()),
    }
}
