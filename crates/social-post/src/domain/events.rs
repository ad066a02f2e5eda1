//! Domain events for the post aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use social_core::error::DomainError;
use social_core::event::{DomainEvent, EventMetadata, decode_payload};
use social_core::repository::StoredEvent;
use uuid::Uuid;

/// Emitted when a post is published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCreated {
    /// Username of the author.
    pub author: String,
    /// The post's message.
    pub message: String,
    /// When the post was published.
    pub date_posted: DateTime<Utc>,
}

/// Emitted when the author edits the post's message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageUpdated {
    /// The new message.
    pub message: String,
}

/// Emitted when someone likes the post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostLiked {}

/// Emitted when a comment is added to the post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAdded {
    /// The new comment's identifier.
    pub comment_id: Uuid,
    /// The comment text.
    pub comment_text: String,
    /// Username of the commenter.
    pub username: String,
    /// When the comment was written.
    pub comment_date: DateTime<Utc>,
}

/// Emitted when a comment's text is edited by its writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentUpdated {
    /// The edited comment's identifier.
    pub comment_id: Uuid,
    /// The replacement text.
    pub comment_text: String,
    /// Username of the editor, as supplied.
    pub username: String,
    /// When the edit happened.
    pub edit_date: DateTime<Utc>,
}

/// Emitted when a comment is removed by its writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRemoved {
    /// The removed comment's identifier.
    pub comment_id: Uuid,
}

/// Emitted when the author deletes the post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRemoved {}

/// Event type identifier for [`PostCreated`].
pub const POST_CREATED_EVENT_TYPE: &str = "post.post_created";

/// Event type identifier for [`MessageUpdated`].
pub const MESSAGE_UPDATED_EVENT_TYPE: &str = "post.message_updated";

/// Event type identifier for [`PostLiked`].
pub const POST_LIKED_EVENT_TYPE: &str = "post.post_liked";

/// Event type identifier for [`CommentAdded`].
pub const COMMENT_ADDED_EVENT_TYPE: &str = "post.comment_added";

/// Event type identifier for [`CommentUpdated`].
pub const COMMENT_UPDATED_EVENT_TYPE: &str = "post.comment_updated";

/// Event type identifier for [`CommentRemoved`].
pub const COMMENT_REMOVED_EVENT_TYPE: &str = "post.comment_removed";

/// Event type identifier for [`PostRemoved`].
pub const POST_REMOVED_EVENT_TYPE: &str = "post.post_removed";

/// Event payload variants for the post aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostEventKind {
    /// The post has been published.
    PostCreated(PostCreated),
    /// The post's message has been edited.
    MessageUpdated(MessageUpdated),
    /// The post has been liked.
    PostLiked(PostLiked),
    /// A comment has been added.
    CommentAdded(CommentAdded),
    /// A comment has been edited.
    CommentUpdated(CommentUpdated),
    /// A comment has been removed.
    CommentRemoved(CommentRemoved),
    /// The post has been deleted.
    PostRemoved(PostRemoved),
}

impl PostEventKind {
    /// Returns the event type identifier of this variant.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::PostCreated(_) => POST_CREATED_EVENT_TYPE,
            Self::MessageUpdated(_) => MESSAGE_UPDATED_EVENT_TYPE,
            Self::PostLiked(_) => POST_LIKED_EVENT_TYPE,
            Self::CommentAdded(_) => COMMENT_ADDED_EVENT_TYPE,
            Self::CommentUpdated(_) => COMMENT_UPDATED_EVENT_TYPE,
            Self::CommentRemoved(_) => COMMENT_REMOVED_EVENT_TYPE,
            Self::PostRemoved(_) => POST_REMOVED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the post aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: PostEventKind,
}

impl DomainEvent for PostEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("PostEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    fn from_stored(stored: &StoredEvent) -> Result<Self, DomainError> {
        let kind: PostEventKind = decode_payload(stored)?;
        if kind.event_type() != stored.event_type {
            return Err(DomainError::Infrastructure(format!(
                "event {} is stored as {} but its payload is {}",
                stored.event_id,
                stored.event_type,
                kind.event_type()
            )));
        }
        Ok(Self {
            metadata: EventMetadata::from_stored(stored),
            kind,
        })
    }
}
