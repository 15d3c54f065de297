//! # Core Traits (Ports)
//!
//! Any storage or auth plugin must implement these traits to be used by the
//! binary. They are the only seams between the use cases and persistence.

use async_trait::async_trait;

use crate::entities::{AddComment, AddReply, AddThread, AddedComment, AddedReply, AddedThread};
use crate::error::{AppError, Result};
use crate::models::{CommentRecord, NewUser, ReplyRecord, ThreadDetail, User};

/// Persistence contract for threads.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ThreadRepo: Send + Sync {
    /// Inserts a thread and assigns its id.
    async fn add_thread(&self, thread: &AddThread) -> Result<AddedThread>;
    /// Fails with `NotFound` when the thread is absent.
    async fn get_thread_by_id(&self, thread_id: &str) -> Result<ThreadDetail>;
    async fn verify_thread_exists(&self, thread_id: &str) -> Result<()>;
}

/// Persistence contract for comments.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn add_comment(&self, comment: &AddComment) -> Result<AddedComment>;
    /// Comments of a thread in ascending creation order.
    async fn get_comments_by_thread_id(&self, thread_id: &str) -> Result<Vec<CommentRecord>>;
    /// Fails with `NotFound` unless `comment_id` belongs to `thread_id`.
    async fn verify_comment_in_thread(&self, comment_id: &str, thread_id: &str) -> Result<()>;
    /// Fails with `Forbidden` unless `owner` wrote the comment.
    async fn verify_comment_owner(&self, comment_id: &str, owner: &str) -> Result<()>;
    /// Soft delete. Fails with `NotFound` if the id is absent.
    async fn delete_comment_by_id(&self, comment_id: &str) -> Result<()>;
}

/// Persistence contract for replies.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReplyRepo: Send + Sync {
    async fn add_reply(&self, reply: &AddReply) -> Result<AddedReply>;
    /// Every reply of a thread in ascending creation order, for batch merging.
    async fn get_replies_by_thread_id(&self, thread_id: &str) -> Result<Vec<ReplyRecord>>;

    async fn get_replies_by_comment_id(&self, _comment_id: &str) -> Result<Vec<ReplyRecord>> {
        Err(AppError::NotImplemented("ReplyRepo::get_replies_by_comment_id"))
    }

    /// Fails with `NotFound` unless `reply_id` belongs to `comment_id`.
    async fn verify_reply_in_comment(&self, reply_id: &str, comment_id: &str) -> Result<()>;
    /// Fails with `Forbidden` unless `owner` wrote the reply.
    async fn verify_reply_owner(&self, reply_id: &str, owner: &str) -> Result<()>;
    async fn delete_reply_by_id(&self, reply_id: &str) -> Result<()>;
}

/// Persistence contract for comment likes.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait LikeRepo: Send + Sync {
    async fn is_comment_liked(&self, comment_id: &str, owner: &str) -> Result<bool>;
    async fn like_comment(&self, comment_id: &str, owner: &str) -> Result<()>;
    async fn unlike_comment(&self, comment_id: &str, owner: &str) -> Result<()>;
    async fn get_like_count_by_comment_id(&self, comment_id: &str) -> Result<u64>;
}

/// Persistence contract for registered users.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn add_user(&self, user: &NewUser) -> Result<User>;
    /// Fails with `Conflict` when the username is taken.
    async fn verify_username_available(&self, username: &str) -> Result<()>;
    /// Fails with `Unauthorized` when no such user exists.
    async fn get_user_by_username(&self, username: &str) -> Result<User>;
}

/// Identity contract: password hashing and access tokens.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String>;

    /// Checks a plain password against a stored hash.
    async fn verify_password(&self, password: &str, hash: &str) -> bool;

    /// Issues a signed access token for `user_id`.
    fn issue_token(&self, user_id: &str) -> Result<String>;

    /// Returns the user id carried by a valid, unexpired token.
    fn verify_token(&self, token: &str) -> Option<String>;
}
