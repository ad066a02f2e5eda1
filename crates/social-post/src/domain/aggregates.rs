//! Aggregate root for a social post.

use std::collections::HashMap;

use social_core::aggregate::{Aggregate, AggregateRoot, EventSourced};
use social_core::command::CommandContext;
use social_core::error::DomainError;
use uuid::Uuid;

use super::events::{
    COMMENT_ADDED_EVENT_TYPE, COMMENT_REMOVED_EVENT_TYPE, COMMENT_UPDATED_EVENT_TYPE, CommentAdded,
    CommentRemoved, CommentUpdated, MESSAGE_UPDATED_EVENT_TYPE, MessageUpdated,
    POST_CREATED_EVENT_TYPE, POST_LIKED_EVENT_TYPE, POST_REMOVED_EVENT_TYPE, PostCreated,
    PostEvent, PostEventKind, PostLiked, PostRemoved,
};

/// A comment as held by the post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Current comment text.
    pub text: String,
    /// Username of whoever last wrote the comment.
    pub username: String,
}

/// Materialized state of a post, derived only from its events.
///
/// The message and like count are not retained; read models own those.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostState {
    pub(crate) active: bool,
    pub(crate) author: String,
    pub(crate) comments: HashMap<Uuid, Comment>,
}

impl Aggregate for PostState {
    type Event = PostEvent;

    const AGGREGATE_TYPE: &'static str = "Post";

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            PostEventKind::PostCreated(payload) => {
                self.active = true;
                self.author.clone_from(&payload.author);
            }
            PostEventKind::MessageUpdated(_) | PostEventKind::PostLiked(_) => {}
            PostEventKind::CommentAdded(CommentAdded {
                comment_id,
                comment_text,
                username,
                ..
            })
            | PostEventKind::CommentUpdated(CommentUpdated {
                comment_id,
                comment_text,
                username,
                ..
            }) => {
                self.comments.insert(
                    *comment_id,
                    Comment {
                        text: comment_text.clone(),
                        username: username.clone(),
                    },
                );
            }
            PostEventKind::CommentRemoved(payload) => {
                self.comments.remove(&payload.comment_id);
            }
            PostEventKind::PostRemoved(_) => {
                self.active = false;
            }
        }
    }
}

/// Case-insensitive username comparison.
fn same_user(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// The aggregate root for a social post.
#[derive(Debug, Clone, Default)]
pub struct Post {
    root: EventSourced<PostState>,
}

impl Post {
    /// Publishes a new post, producing a `PostCreated` event.
    #[must_use]
    pub fn create(id: Uuid, author: &str, message: &str, ctx: &CommandContext<'_>) -> Self {
        let mut post = Self::default();
        post.raise(
            ctx,
            id,
            POST_CREATED_EVENT_TYPE,
            PostEventKind::PostCreated(PostCreated {
                author: author.to_owned(),
                message: message.to_owned(),
                date_posted: ctx.clock.now(),
            }),
        );
        post
    }

    /// Returns the post identifier, or `None` for an empty post awaiting
    /// replay.
    #[must_use]
    pub fn id(&self) -> Option<Uuid> {
        self.root.id()
    }

    /// Whether the post is live. Removed posts reject every operation.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.root.state().active
    }

    /// Username of the post's author.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.root.state().author
    }

    /// Looks up a comment by ID.
    #[must_use]
    pub fn comment(&self, comment_id: Uuid) -> Option<&Comment> {
        self.root.state().comments.get(&comment_id)
    }

    /// Iterates over all comments, in no particular order.
    pub fn comments(&self) -> impl Iterator<Item = (Uuid, &Comment)> {
        self.root.state().comments.iter().map(|(id, c)| (*id, c))
    }

    /// Number of comments on the post.
    #[must_use]
    pub fn comment_count(&self) -> usize {
        self.root.state().comments.len()
    }

    /// Returns the materialized state.
    #[must_use]
    pub fn state(&self) -> &PostState {
        self.root.state()
    }

    /// Edits the post's message, producing a `MessageUpdated` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidOperation` if the post is inactive or the
    /// message is blank.
    pub fn edit_message(
        &mut self,
        message: &str,
        ctx: &CommandContext<'_>,
    ) -> Result<(), DomainError> {
        let id = self.require_active("cannot edit the message of an inactive post")?;
        require_text("message", message)?;

        self.raise(
            ctx,
            id,
            MESSAGE_UPDATED_EVENT_TYPE,
            PostEventKind::MessageUpdated(MessageUpdated {
                message: message.to_owned(),
            }),
        );
        Ok(())
    }

    /// Likes the post, producing a `PostLiked` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidOperation` if the post is inactive.
    pub fn like(&mut self, ctx: &CommandContext<'_>) -> Result<(), DomainError> {
        let id = self.require_active("cannot like an inactive post")?;

        self.raise(
            ctx,
            id,
            POST_LIKED_EVENT_TYPE,
            PostEventKind::PostLiked(PostLiked {}),
        );
        Ok(())
    }

    /// Adds a comment, producing a `CommentAdded` event. Returns the new
    /// comment's ID.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidOperation` if the post is inactive or the
    /// comment is blank.
    pub fn add_comment(
        &mut self,
        comment: &str,
        username: &str,
        ctx: &CommandContext<'_>,
    ) -> Result<Uuid, DomainError> {
        let id = self.require_active("cannot add a comment to an inactive post")?;
        require_text("comment", comment)?;

        let comment_id = ctx.ids.next_id();
        self.raise(
            ctx,
            id,
            COMMENT_ADDED_EVENT_TYPE,
            PostEventKind::CommentAdded(CommentAdded {
                comment_id,
                comment_text: comment.to_owned(),
                username: username.to_owned(),
                comment_date: ctx.clock.now(),
            }),
        );
        Ok(comment_id)
    }

    /// Edits a comment, producing a `CommentUpdated` event. Only the
    /// comment's writer may edit it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidOperation` if the post is inactive or
    /// `username` did not write the comment, and `DomainError::EntityNotFound`
    /// if there is no such comment.
    pub fn edit_comment(
        &mut self,
        comment_id: Uuid,
        comment: &str,
        username: &str,
        ctx: &CommandContext<'_>,
    ) -> Result<(), DomainError> {
        let id = self.require_active("cannot edit a comment of an inactive post")?;
        self.require_comment_writer(
            comment_id,
            username,
            "not allowed to edit a comment made by another user",
        )?;

        self.raise(
            ctx,
            id,
            COMMENT_UPDATED_EVENT_TYPE,
            PostEventKind::CommentUpdated(CommentUpdated {
                comment_id,
                comment_text: comment.to_owned(),
                username: username.to_owned(),
                edit_date: ctx.clock.now(),
            }),
        );
        Ok(())
    }

    /// Removes a comment, producing a `CommentRemoved` event. Only the
    /// comment's writer may remove it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidOperation` if the post is inactive or
    /// `username` did not write the comment, and `DomainError::EntityNotFound`
    /// if there is no such comment.
    pub fn remove_comment(
        &mut self,
        comment_id: Uuid,
        username: &str,
        ctx: &CommandContext<'_>,
    ) -> Result<(), DomainError> {
        let id = self.require_active("cannot remove a comment of an inactive post")?;
        self.require_comment_writer(
            comment_id,
            username,
            "not allowed to remove a comment made by another user",
        )?;

        self.raise(
            ctx,
            id,
            COMMENT_REMOVED_EVENT_TYPE,
            PostEventKind::CommentRemoved(CommentRemoved { comment_id }),
        );
        Ok(())
    }

    /// Deletes the post, producing a `PostRemoved` event. Only the author may
    /// delete it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidOperation` if the post was already removed
    /// or `username` is not the author.
    pub fn delete(&mut self, username: &str, ctx: &CommandContext<'_>) -> Result<(), DomainError> {
        let id = self.require_active("the post has already been removed")?;
        if !same_user(self.author(), username) {
            return Err(DomainError::InvalidOperation(
                "not allowed to delete a post made by another user".to_owned(),
            ));
        }

        self.raise(
            ctx,
            id,
            POST_REMOVED_EVENT_TYPE,
            PostEventKind::PostRemoved(PostRemoved {}),
        );
        Ok(())
    }

    /// Returns the post ID if the post is active.
    fn require_active(&self, reason: &str) -> Result<Uuid, DomainError> {
        match self.root.id() {
            Some(id) if self.is_active() => Ok(id),
            _ => Err(DomainError::InvalidOperation(reason.to_owned())),
        }
    }

    fn require_comment_writer(
        &self,
        comment_id: Uuid,
        username: &str,
        reason: &str,
    ) -> Result<(), DomainError> {
        let comment = self
            .comment(comment_id)
            .ok_or(DomainError::EntityNotFound {
                entity: "comment",
                id: comment_id,
            })?;
        if !same_user(&comment.username, username) {
            return Err(DomainError::InvalidOperation(reason.to_owned()));
        }
        Ok(())
    }

    fn raise(
        &mut self,
        ctx: &CommandContext<'_>,
        id: Uuid,
        event_type: &str,
        kind: PostEventKind,
    ) {
        let metadata = ctx.event_metadata(event_type, id, self.root.next_sequence_number());
        self.root.raise(PostEvent { metadata, kind });
    }
}

fn require_text(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidOperation(format!(
            "{field} cannot be empty"
        )));
    }
    Ok(())
}

impl AggregateRoot for Post {
    type Event = PostEvent;

    const AGGREGATE_TYPE: &'static str = PostState::AGGREGATE_TYPE;

    fn aggregate_id(&self) -> Option<Uuid> {
        self.root.id()
    }

    fn version(&self) -> i64 {
        self.root.version()
    }

    fn set_version(&mut self, version: i64) {
        self.root.set_version(version);
    }

    fn replay_events(&mut self, events: Vec<Self::Event>) {
        self.root.replay(events);
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        self.root.uncommitted_events()
    }

    fn mark_changes_as_committed(&mut self) {
        self.root.mark_changes_as_committed();
    }
}
