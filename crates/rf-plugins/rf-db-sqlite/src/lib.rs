//! # rf-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `rf-core` repository contracts. One `SqliteForumRepo` backs every
//! contract; the binary hands clones of the same `Arc` to each use case.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rf_core::entities::{AddComment, AddReply, AddThread, AddedComment, AddedReply, AddedThread};
use rf_core::error::{AppError, Result};
use rf_core::models::{CommentRecord, NewUser, ReplyRecord, ThreadDetail, User};
use rf_core::traits::{CommentRepo, LikeRepo, ReplyRepo, ThreadRepo, UserRepo};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

pub struct SqliteForumRepo {
    pool: SqlitePool,
}

impl SqliteForumRepo {
    /// Opens (or creates) the database at `url` and applies pending migrations.
    ///
    /// An in-memory database lives and dies with its connection, so the pool
    /// is pinned to a single connection that never expires in that case.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        log::info!("SQLite store ready at {}", url);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// Helper for prefixed, time-ordered ids (e.g. "comment-0192...")
fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::now_v7().simple())
}

fn db_error(err: sqlx::Error) -> AppError {
    log::error!("database error: {}", err);
    AppError::Internal(err.to_string())
}

#[derive(sqlx::FromRow)]
struct ThreadRow {
    id: String,
    title: String,
    body: String,
    date: DateTime<Utc>,
    username: String,
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: String,
    content: String,
    username: String,
    date: DateTime<Utc>,
    is_delete: bool,
}

#[derive(sqlx::FromRow)]
struct ReplyRow {
    id: String,
    comment_id: String,
    content: String,
    username: String,
    date: DateTime<Utc>,
    is_delete: bool,
}

impl From<ReplyRow> for ReplyRecord {
    fn from(row: ReplyRow) -> Self {
        ReplyRecord {
            id: row.id,
            comment_id: row.comment_id,
            username: row.username,
            date: row.date,
            content: row.content,
            is_deleted: row.is_delete,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    password: String,
    fullname: String,
}

#[async_trait]
impl ThreadRepo for SqliteForumRepo {
    async fn add_thread(&self, thread: &AddThread) -> Result<AddedThread> {
        let id = new_id("thread");
        sqlx::query("INSERT INTO threads (id, title, body, owner, date) VALUES (?, ?, ?, ?, ?)")
            .bind(&id)
            .bind(&thread.title)
            .bind(&thread.body)
            .bind(&thread.owner)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(AddedThread {
            id,
            title: thread.title.clone(),
            owner: thread.owner.clone(),
        })
    }

    async fn get_thread_by_id(&self, thread_id: &str) -> Result<ThreadDetail> {
        let row: Option<ThreadRow> = sqlx::query_as(
            "SELECT threads.id, threads.title, threads.body, threads.date, users.username
             FROM threads
             INNER JOIN users ON threads.owner = users.id
             WHERE threads.id = ?",
        )
        .bind(thread_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        let row = row.ok_or_else(|| AppError::not_found("thread not found"))?;
        Ok(ThreadDetail {
            id: row.id,
            title: row.title,
            body: row.body,
            date: row.date,
            username: row.username,
        })
    }

    async fn verify_thread_exists(&self, thread_id: &str) -> Result<()> {
        sqlx::query("SELECT id FROM threads WHERE id = ?")
            .bind(thread_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("thread not found"))
    }
}

#[async_trait]
impl CommentRepo for SqliteForumRepo {
    async fn add_comment(&self, comment: &AddComment) -> Result<AddedComment> {
        let id = new_id("comment");
        sqlx::query("INSERT INTO comments (id, content, owner, thread_id, date) VALUES (?, ?, ?, ?, ?)")
            .bind(&id)
            .bind(&comment.content)
            .bind(&comment.owner)
            .bind(&comment.thread_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(AddedComment {
            id,
            content: comment.content.clone(),
            owner: comment.owner.clone(),
        })
    }

    async fn get_comments_by_thread_id(&self, thread_id: &str) -> Result<Vec<CommentRecord>> {
        let rows: Vec<CommentRow> = sqlx::query_as(
            "SELECT comments.id, comments.content, users.username, comments.date, comments.is_delete
             FROM comments
             INNER JOIN users ON comments.owner = users.id
             WHERE comments.thread_id = ?
             ORDER BY comments.date ASC, comments.rowid ASC",
        )
        .bind(thread_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| CommentRecord {
                id: row.id,
                username: row.username,
                date: row.date,
                content: row.content,
                is_deleted: row.is_delete,
            })
            .collect())
    }

    async fn verify_comment_in_thread(&self, comment_id: &str, thread_id: &str) -> Result<()> {
        sqlx::query("SELECT id FROM comments WHERE id = ? AND thread_id = ?")
            .bind(comment_id)
            .bind(thread_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("comment or thread not found"))
    }

    async fn verify_comment_owner(&self, comment_id: &str, owner: &str) -> Result<()> {
        sqlx::query("SELECT id FROM comments WHERE id = ? AND owner = ?")
            .bind(comment_id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .map(|_| ())
            .ok_or_else(AppError::forbidden)
    }

    async fn delete_comment_by_id(&self, comment_id: &str) -> Result<()> {
        let result = sqlx::query("UPDATE comments SET is_delete = TRUE WHERE id = ?")
            .bind(comment_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("comment not found"));
        }
        Ok(())
    }
}

#[async_trait]
impl ReplyRepo for SqliteForumRepo {
    async fn add_reply(&self, reply: &AddReply) -> Result<AddedReply> {
        let id = new_id("reply");
        sqlx::query(
            "INSERT INTO replies (id, content, owner, comment_id, thread_id, date) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&reply.content)
        .bind(&reply.owner)
        .bind(&reply.comment_id)
        .bind(&reply.thread_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(AddedReply {
            id,
            content: reply.content.clone(),
            owner: reply.owner.clone(),
        })
    }

    async fn get_replies_by_thread_id(&self, thread_id: &str) -> Result<Vec<ReplyRecord>> {
        let rows: Vec<ReplyRow> = sqlx::query_as(
            "SELECT replies.id, replies.comment_id, replies.content, users.username, replies.date, replies.is_delete
             FROM replies
             INNER JOIN users ON replies.owner = users.id
             WHERE replies.thread_id = ?
             ORDER BY replies.date ASC, replies.rowid ASC",
        )
        .bind(thread_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(ReplyRecord::from).collect())
    }

    async fn get_replies_by_comment_id(&self, comment_id: &str) -> Result<Vec<ReplyRecord>> {
        let rows: Vec<ReplyRow> = sqlx::query_as(
            "SELECT replies.id, replies.comment_id, replies.content, users.username, replies.date, replies.is_delete
             FROM replies
             INNER JOIN users ON replies.owner = users.id
             WHERE replies.comment_id = ?
             ORDER BY replies.date ASC, replies.rowid ASC",
        )
        .bind(comment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(ReplyRecord::from).collect())
    }

    async fn verify_reply_in_comment(&self, reply_id: &str, comment_id: &str) -> Result<()> {
        sqlx::query("SELECT id FROM replies WHERE id = ? AND comment_id = ?")
            .bind(reply_id)
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("reply or comment not found"))
    }

    async fn verify_reply_owner(&self, reply_id: &str, owner: &str) -> Result<()> {
        sqlx::query("SELECT id FROM replies WHERE id = ? AND owner = ?")
            .bind(reply_id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .map(|_| ())
            .ok_or_else(AppError::forbidden)
    }

    async fn delete_reply_by_id(&self, reply_id: &str) -> Result<()> {
        let result = sqlx::query("UPDATE replies SET is_delete = TRUE WHERE id = ?")
            .bind(reply_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("reply not found"));
        }
        Ok(())
    }
}

#[async_trait]
impl LikeRepo for SqliteForumRepo {
    async fn is_comment_liked(&self, comment_id: &str, owner: &str) -> Result<bool> {
        let row = sqlx::query("SELECT id FROM comments_likes WHERE comment_id = ? AND owner = ?")
            .bind(comment_id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(row.is_some())
    }

    /// A like that already exists is left as is.
    async fn like_comment(&self, comment_id: &str, owner: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO comments_likes (id, comment_id, owner) VALUES (?, ?, ?)
             ON CONFLICT (comment_id, owner) DO NOTHING",
        )
        .bind(new_id("like-comment"))
        .bind(comment_id)
        .bind(owner)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn unlike_comment(&self, comment_id: &str, owner: &str) -> Result<()> {
        sqlx::query("DELETE FROM comments_likes WHERE comment_id = ? AND owner = ?")
            .bind(comment_id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn get_like_count_by_comment_id(&self, comment_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments_likes WHERE comment_id = ?")
            .bind(comment_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(count as u64)
    }
}

#[async_trait]
impl UserRepo for SqliteForumRepo {
    async fn add_user(&self, user: &NewUser) -> Result<User> {
        let id = new_id("user");
        sqlx::query("INSERT INTO users (id, username, password, fullname) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.fullname)
            .execute(&self.pool)
            .await
            .map_err(|err| {
                if err.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                    AppError::Conflict("username already taken".to_string())
                } else {
                    db_error(err)
                }
            })?;

        Ok(User {
            id,
            username: user.username.clone(),
            fullname: user.fullname.clone(),
            password_hash: user.password_hash.clone(),
        })
    }

    async fn verify_username_available(&self, username: &str) -> Result<()> {
        let taken = sqlx::query("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .is_some();

        if taken {
            return Err(AppError::Conflict("username already taken".to_string()));
        }
        Ok(())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, username, password, fullname FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        let row = row.ok_or_else(|| AppError::Unauthorized("wrong credentials".to_string()))?;
        Ok(User {
            id: row.id,
            username: row.username,
            fullname: row.fullname,
            password_hash: row.password,
        })
    }
}
