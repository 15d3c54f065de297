//! # Domain Models
//!
//! Records read back from storage and the display-ready views the
//! aggregation pipeline assembles from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder shown in place of a soft-deleted comment's content.
pub const DELETED_COMMENT_CONTENT: &str = "**comment has been deleted**";
/// Placeholder shown in place of a soft-deleted reply's content.
pub const DELETED_REPLY_CONTENT: &str = "**reply has been deleted**";

/// A registered forum member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub fullname: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// User row ready to be inserted; the password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub fullname: String,
    pub password_hash: String,
}

/// Public projection of a freshly registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedUser {
    pub id: String,
    pub username: String,
    pub fullname: String,
}

/// A thread as read back for display, with the owner resolved to a username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadDetail {
    pub id: String,
    pub title: String,
    pub body: String,
    pub date: DateTime<Utc>,
    pub username: String,
}

/// One row of a thread's comment list. `is_deleted` is the tombstone flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub id: String,
    pub username: String,
    pub date: DateTime<Utc>,
    pub content: String,
    pub is_deleted: bool,
}

impl CommentRecord {
    /// Content as it may be shown to readers.
    pub fn display_content(&self) -> &str {
        if self.is_deleted {
            DELETED_COMMENT_CONTENT
        } else {
            &self.content
        }
    }
}

/// One row of a thread's reply list, carrying the id of the comment it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRecord {
    pub id: String,
    pub comment_id: String,
    pub username: String,
    pub date: DateTime<Utc>,
    pub content: String,
    pub is_deleted: bool,
}

impl ReplyRecord {
    pub fn display_content(&self) -> &str {
        if self.is_deleted {
            DELETED_REPLY_CONTENT
        } else {
            &self.content
        }
    }
}

/// The full read-side view of a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadWithComments {
    pub id: String,
    pub title: String,
    pub body: String,
    pub date: DateTime<Utc>,
    pub username: String,
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub username: String,
    pub date: DateTime<Utc>,
    pub content: String,
    pub like_count: u64,
    pub replies: Vec<ReplyView>,
}

/// Replies carry no like count; likes are comment-scoped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyView {
    pub id: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub username: String,
}

impl From<&ReplyRecord> for ReplyView {
    fn from(reply: &ReplyRecord) -> Self {
        Self {
            id: reply.id.clone(),
            content: reply.display_content().to_string(),
            date: reply.date,
            username: reply.username.clone(),
        }
    }
}
