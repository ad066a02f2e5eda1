//! Commands for the post aggregate.

use social_core::command::Command;
use uuid::Uuid;

/// Command to publish a new post.
#[derive(Debug, Clone)]
pub struct CreatePost {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Identifier for the new post.
    pub post_id: Uuid,
    /// Username of the author.
    pub author: String,
    /// The post's message.
    pub message: String,
}

/// Command to edit a post's message.
#[derive(Debug, Clone)]
pub struct EditMessage {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The post identifier.
    pub post_id: Uuid,
    /// The new message.
    pub message: String,
}

/// Command to like a post.
#[derive(Debug, Clone)]
pub struct LikePost {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The post identifier.
    pub post_id: Uuid,
}

/// Command to add a comment to a post.
#[derive(Debug, Clone)]
pub struct AddComment {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The post identifier.
    pub post_id: Uuid,
    /// The comment text.
    pub comment: String,
    /// Username of the commenter.
    pub username: String,
}

/// Command to edit a comment.
#[derive(Debug, Clone)]
pub struct EditComment {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The post identifier.
    pub post_id: Uuid,
    /// The comment identifier.
    pub comment_id: Uuid,
    /// The replacement text.
    pub comment: String,
    /// Username of the caller; must match the comment's writer.
    pub username: String,
}

/// Command to remove a comment.
#[derive(Debug, Clone)]
pub struct RemoveComment {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The post identifier.
    pub post_id: Uuid,
    /// The comment identifier.
    pub comment_id: Uuid,
    /// Username of the caller; must match the comment's writer.
    pub username: String,
}

/// Command to delete a post.
#[derive(Debug, Clone)]
pub struct DeletePost {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The post identifier.
    pub post_id: Uuid,
    /// Username of the caller; must match the post's author.
    pub username: String,
}

macro_rules! impl_command {
    ($($command:ty => $name:literal),+ $(,)?) => {
        $(
            impl Command for $command {
                fn command_type(&self) -> &'static str {
                    $name
                }

                fn aggregate_id(&self) -> Uuid {
                    self.post_id
                }

                fn correlation_id(&self) -> Uuid {
                    self.correlation_id
                }
            }
        )+
    };
}

impl_command! {
    CreatePost => "post.create_post",
    EditMessage => "post.edit_message",
    LikePost => "post.like_post",
    AddComment => "post.add_comment",
    EditComment => "post.edit_comment",
    RemoveComment => "post.remove_comment",
    DeletePost => "post.delete_post",
}
