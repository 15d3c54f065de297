//! # rf-db-memory
//!
//! In-memory implementation of every `rf-core` repository contract, with the
//! same ordering and error semantics as the SQLite plugin. Used by tests and
//! by the `db-memory` build of the binary.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rf_core::entities::{AddComment, AddReply, AddThread, AddedComment, AddedReply, AddedThread};
use rf_core::error::{AppError, Result};
use rf_core::models::{CommentRecord, NewUser, ReplyRecord, ThreadDetail, User};
use rf_core::traits::{CommentRepo, LikeRepo, ReplyRepo, ThreadRepo, UserRepo};
use uuid::Uuid;

struct ThreadEntry {
    title: String,
    body: String,
    owner: String,
    date: DateTime<Utc>,
}

/// Shared by comments and replies; `parent_id` is the thread or comment id.
#[derive(Clone)]
struct PostEntry {
    seq: u64,
    parent_id: String,
    thread_id: String,
    owner: String,
    content: String,
    date: DateTime<Utc>,
    is_deleted: bool,
}

#[derive(Default)]
pub struct MemoryForumRepo {
    /// Insertion counter, breaks ties between equal timestamps.
    seq: AtomicU64,
    users: DashMap<String, User>,
    /// username -> user id; claimed before the user row is stored
    usernames: DashMap<String, String>,
    threads: DashMap<String, ThreadEntry>,
    comments: DashMap<String, PostEntry>,
    replies: DashMap<String, PostEntry>,
    /// (comment_id, owner) -> like id
    likes: DashMap<(String, String), String>,
}

impl MemoryForumRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    fn username_of(&self, user_id: &str) -> Option<String> {
        self.users.get(user_id).map(|user| user.username.clone())
    }

    fn new_post(&self, parent_id: &str, thread_id: &str, owner: &str, content: &str) -> PostEntry {
        PostEntry {
            seq: self.next_seq(),
            parent_id: parent_id.to_string(),
            thread_id: thread_id.to_string(),
            owner: owner.to_string(),
            content: content.to_string(),
            date: Utc::now(),
            is_deleted: false,
        }
    }
}

fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::now_v7().simple())
}

/// Rows in ascending (date, insertion) order, like `ORDER BY date, rowid`.
fn sorted_posts(
    table: &DashMap<String, PostEntry>,
    keep: impl Fn(&PostEntry) -> bool,
) -> Vec<(String, PostEntry)> {
    let mut rows: Vec<_> = table
        .iter()
        .filter(|entry| keep(entry.value()))
        .map(|entry| (entry.key().clone(), entry.value().clone()))
        .collect();
    rows.sort_by_key(|(_, post)| (post.date, post.seq));
    rows
}

#[async_trait]
impl ThreadRepo for MemoryForumRepo {
    async fn add_thread(&self, thread: &AddThread) -> Result<AddedThread> {
        let id = new_id("thread");
        self.threads.insert(
            id.clone(),
            ThreadEntry {
                title: thread.title.clone(),
                body: thread.body.clone(),
                owner: thread.owner.clone(),
                date: Utc::now(),
            },
        );
        Ok(AddedThread {
            id,
            title: thread.title.clone(),
            owner: thread.owner.clone(),
        })
    }

    async fn get_thread_by_id(&self, thread_id: &str) -> Result<ThreadDetail> {
        let thread = self
            .threads
            .get(thread_id)
            .ok_or_else(|| AppError::not_found("thread not found"))?;
        let username = self
            .username_of(&thread.owner)
            .ok_or_else(|| AppError::not_found("thread not found"))?;

        Ok(ThreadDetail {
            id: thread_id.to_string(),
            title: thread.title.clone(),
            body: thread.body.clone(),
            date: thread.date,
            username,
        })
    }

    async fn verify_thread_exists(&self, thread_id: &str) -> Result<()> {
        if self.threads.contains_key(thread_id) {
            Ok(())
        } else {
            Err(AppError::not_found("thread not found"))
        }
    }
}

#[async_trait]
impl CommentRepo for MemoryForumRepo {
    async fn add_comment(&self, comment: &AddComment) -> Result<AddedComment> {
        let id = new_id("comment");
        let entry = self.new_post(&comment.thread_id, &comment.thread_id, &comment.owner, &comment.content);
        self.comments.insert(id.clone(), entry);
        Ok(AddedComment {
            id,
            content: comment.content.clone(),
            owner: comment.owner.clone(),
        })
    }

    async fn get_comments_by_thread_id(&self, thread_id: &str) -> Result<Vec<CommentRecord>> {
        Ok(sorted_posts(&self.comments, |c| c.thread_id == thread_id)
            .into_iter()
            .filter_map(|(id, post)| {
                Some(CommentRecord {
                    id,
                    username: self.username_of(&post.owner)?,
                    date: post.date,
                    content: post.content,
                    is_deleted: post.is_deleted,
                })
            })
            .collect())
    }

    async fn verify_comment_in_thread(&self, comment_id: &str, thread_id: &str) -> Result<()> {
        match self.comments.get(comment_id) {
            Some(comment) if comment.thread_id == thread_id => Ok(()),
            _ => Err(AppError::not_found("comment or thread not found")),
        }
    }

    async fn verify_comment_owner(&self, comment_id: &str, owner: &str) -> Result<()> {
        match self.comments.get(comment_id) {
            Some(comment) if comment.owner == owner => Ok(()),
            _ => Err(AppError::forbidden()),
        }
    }

    async fn delete_comment_by_id(&self, comment_id: &str) -> Result<()> {
        let mut comment = self
            .comments
            .get_mut(comment_id)
            .ok_or_else(|| AppError::not_found("comment not found"))?;
        comment.is_deleted = true;
        Ok(())
    }
}

impl MemoryForumRepo {
    fn reply_records(&self, keep: impl Fn(&PostEntry) -> bool) -> Vec<ReplyRecord> {
        sorted_posts(&self.replies, keep)
            .into_iter()
            .filter_map(|(id, post)| {
                Some(ReplyRecord {
                    id,
                    username: self.username_of(&post.owner)?,
                    comment_id: post.parent_id,
                    date: post.date,
                    content: post.content,
                    is_deleted: post.is_deleted,
                })
            })
            .collect()
    }
}

#[async_trait]
impl ReplyRepo for MemoryForumRepo {
    async fn add_reply(&self, reply: &AddReply) -> Result<AddedReply> {
        let id = new_id("reply");
        let entry = self.new_post(&reply.comment_id, &reply.thread_id, &reply.owner, &reply.content);
        self.replies.insert(id.clone(), entry);
        Ok(AddedReply {
            id,
            content: reply.content.clone(),
            owner: reply.owner.clone(),
        })
    }

    async fn get_replies_by_thread_id(&self, thread_id: &str) -> Result<Vec<ReplyRecord>> {
        Ok(self.reply_records(|r| r.thread_id == thread_id))
    }

    async fn get_replies_by_comment_id(&self, comment_id: &str) -> Result<Vec<ReplyRecord>> {
        Ok(self.reply_records(|r| r.parent_id == comment_id))
    }

    async fn verify_reply_in_comment(&self, reply_id: &str, comment_id: &str) -> Result<()> {
        match self.replies.get(reply_id) {
            Some(reply) if reply.parent_id == comment_id => Ok(()),
            _ => Err(AppError::not_found("reply or comment not found")),
        }
    }

    async fn verify_reply_owner(&self, reply_id: &str, owner: &str) -> Result<()> {
        match self.replies.get(reply_id) {
            Some(reply) if reply.owner == owner => Ok(()),
            _ => Err(AppError::forbidden()),
        }
    }

    async fn delete_reply_by_id(&self, reply_id: &str) -> Result<()> {
        let mut reply = self
            .replies
            .get_mut(reply_id)
            .ok_or_else(|| AppError::not_found("reply not found"))?;
        reply.is_deleted = true;
        Ok(())
    }
}

#[async_trait]
impl LikeRepo for MemoryForumRepo {
    async fn is_comment_liked(&self, comment_id: &str, owner: &str) -> Result<bool> {
        Ok(self
            .likes
            .contains_key(&(comment_id.to_string(), owner.to_string())))
    }

    async fn like_comment(&self, comment_id: &str, owner: &str) -> Result<()> {
        self.likes
            .entry((comment_id.to_string(), owner.to_string()))
            .or_insert_with(|| new_id("like-comment"));
        Ok(())
    }

    async fn unlike_comment(&self, comment_id: &str, owner: &str) -> Result<()> {
        self.likes.remove(&(comment_id.to_string(), owner.to_string()));
        Ok(())
    }

    async fn get_like_count_by_comment_id(&self, comment_id: &str) -> Result<u64> {
        Ok(self
            .likes
            .iter()
            .filter(|like| like.key().0 == comment_id)
            .count() as u64)
    }
}

#[async_trait]
impl UserRepo for MemoryForumRepo {
    async fn add_user(&self, user: &NewUser) -> Result<User> {
        let id = new_id("user");
        match self.usernames.entry(user.username.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::Conflict("username already taken".to_string()))
            }
            Entry::Vacant(slot) => {
                slot.insert(id.clone());
            }
        }

        let stored = User {
            id,
            username: user.username.clone(),
            fullname: user.fullname.clone(),
            password_hash: user.password_hash.clone(),
        };
        self.users.insert(stored.id.clone(), stored.clone());
        log::debug!("in-memory user {} stored", stored.id);
        Ok(stored)
    }

    async fn verify_username_available(&self, username: &str) -> Result<()> {
        if self.usernames.contains_key(username) {
            return Err(AppError::Conflict("username already taken".to_string()));
        }
        Ok(())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User> {
        self.usernames
            .get(username)
            .and_then(|id| self.users.get(id.value()).map(|user| user.value().clone()))
            .ok_or_else(|| AppError::Unauthorized("wrong credentials".to_string()))
    }
}
