//! # Thread Aggregation
//!
//! Assembles the full read-side view of a thread from four independent
//! collections: the thread itself, its comments, its replies and the like
//! count of every comment. Comments and replies keep the ascending date
//! order the repositories return them in; soft-deleted items stay in place
//! with their content masked.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::try_join_all;
use futures_util::try_join;
use rf_core::{
    CommentRecord, CommentRepo, CommentView, LikeRepo, ReplyRecord, ReplyRepo, ReplyView, Result,
    ThreadQuery, ThreadRepo, ThreadWithComments,
};
use serde_json::Value;

pub struct GetThreadUseCase {
    threads: Arc<dyn ThreadRepo>,
    comments: Arc<dyn CommentRepo>,
    replies: Arc<dyn ReplyRepo>,
    likes: Arc<dyn LikeRepo>,
}

impl GetThreadUseCase {
    pub fn new(
        threads: Arc<dyn ThreadRepo>,
        comments: Arc<dyn CommentRepo>,
        replies: Arc<dyn ReplyRepo>,
        likes: Arc<dyn LikeRepo>,
    ) -> Self {
        Self { threads, comments, replies, likes }
    }

    pub async fn execute(&self, payload: &Value) -> Result<ThreadWithComments> {
        let ThreadQuery { thread_id } = ThreadQuery::try_from(payload)?;

        // Fail fast before touching the other collections.
        self.threads.verify_thread_exists(&thread_id).await?;

        let (thread, comments, replies) = try_join!(
            self.threads.get_thread_by_id(&thread_id),
            self.comments.get_comments_by_thread_id(&thread_id),
            self.replies.get_replies_by_thread_id(&thread_id),
        )?;

        let like_counts = try_join_all(
            comments
                .iter()
                .map(|comment| self.likes.get_like_count_by_comment_id(&comment.id)),
        )
        .await?;

        log::debug!(
            "aggregating thread {}: {} comments, {} replies",
            thread_id,
            comments.len(),
            replies.len()
        );

        Ok(ThreadWithComments {
            id: thread.id,
            title: thread.title,
            body: thread.body,
            date: thread.date,
            username: thread.username,
            comments: merge_comments(&comments, &replies, &like_counts),
        })
    }
}

/// Nests `replies` under their comments.
///
/// `like_counts[i]` is the like count of `comments[i]`. Replies are bucketed
/// by comment id once, so the merge is linear in comments plus replies and
/// each bucket keeps the order of the input slice.
pub fn merge_comments(
    comments: &[CommentRecord],
    replies: &[ReplyRecord],
    like_counts: &[u64],
) -> Vec<CommentView> {
    debug_assert_eq!(comments.len(), like_counts.len());

    let mut buckets: HashMap<&str, Vec<ReplyView>> = HashMap::new();
    for reply in replies {
        buckets
            .entry(reply.comment_id.as_str())
            .or_default()
            .push(ReplyView::from(reply));
    }

    comments
        .iter()
        .zip(like_counts.iter().copied())
        .map(|(comment, like_count)| CommentView {
            id: comment.id.clone(),
            username: comment.username.clone(),
            date: comment.date,
            content: comment.display_content().to_string(),
            like_count,
            replies: buckets.remove(comment.id.as_str()).unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rf_core::{
        AppError, MockCommentRepo, MockLikeRepo, MockReplyRepo, MockThreadRepo, ThreadDetail,
        DELETED_COMMENT_CONTENT, DELETED_REPLY_CONTENT,
    };
    use serde_json::json;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 1, 12, minute, 0).unwrap()
    }

    fn comment(id: &str, username: &str, minute: u32, is_deleted: bool) -> CommentRecord {
        CommentRecord {
            id: id.to_string(),
            username: username.to_string(),
            date: at(minute),
            content: format!("content of {id}"),
            is_deleted,
        }
    }

    fn reply(id: &str, comment_id: &str, minute: u32, is_deleted: bool) -> ReplyRecord {
        ReplyRecord {
            id: id.to_string(),
            comment_id: comment_id.to_string(),
            username: "replier".to_string(),
            date: at(minute),
            content: format!("content of {id}"),
            is_deleted,
        }
    }

    fn use_case(
        threads: MockThreadRepo,
        comments: MockCommentRepo,
        replies: MockReplyRepo,
        likes: MockLikeRepo,
    ) -> GetThreadUseCase {
        GetThreadUseCase::new(
            Arc::new(threads),
            Arc::new(comments),
            Arc::new(replies),
            Arc::new(likes),
        )
    }

    #[test]
    fn merge_nests_replies_under_their_comment_in_order() {
        let comments = vec![comment("c1", "user1", 0, false), comment("c2", "user2", 5, true)];
        let replies = vec![
            reply("r1", "c1", 1, false),
            reply("r2", "c1", 2, true),
            reply("r3", "c2", 6, false),
        ];

        let merged = merge_comments(&comments, &replies, &[0, 1]);

        assert_eq!(merged.len(), 2);
        let c1 = &merged[0];
        assert_eq!(c1.content, "content of c1");
        assert_eq!(c1.like_count, 0);
        let ids: Vec<_> = c1.replies.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["r1", "r2"]);
        assert_eq!(c1.replies[0].content, "content of r1");
        assert_eq!(c1.replies[1].content, DELETED_REPLY_CONTENT);

        let c2 = &merged[1];
        assert_eq!(c2.content, DELETED_COMMENT_CONTENT);
        assert_eq!(c2.like_count, 1);
        assert_eq!(c2.username, "user2");
        assert_eq!(c2.replies.len(), 1);
        assert_eq!(c2.replies[0].id, "r3");
    }

    #[test]
    fn merge_keeps_comments_without_replies() {
        let comments = vec![comment("c1", "user1", 0, false)];
        let merged = merge_comments(&comments, &[], &[0]);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].replies.is_empty());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn merge_rejects_missing_like_counts() {
        let comments = vec![comment("c1", "user1", 0, false), comment("c2", "user2", 5, false)];
        merge_comments(&comments, &[], &[4]);
    }

    #[test]
    fn merge_ignores_replies_of_unknown_comments() {
        let comments = vec![comment("c1", "user1", 0, false)];
        let replies = vec![reply("r9", "c9", 1, false)];
        let merged = merge_comments(&comments, &replies, &[3]);
        assert!(merged[0].replies.is_empty());
        assert_eq!(merged[0].like_count, 3);
    }

    #[tokio::test]
    async fn rejects_payload_without_thread_id() {
        let use_case = use_case(
            MockThreadRepo::new(),
            MockCommentRepo::new(),
            MockReplyRepo::new(),
            MockLikeRepo::new(),
        );

        let err = use_case.execute(&json!({})).await.unwrap_err();
        assert!(matches!(err, AppError::MissingField(_)));

        let err = use_case.execute(&json!({ "threadId": 123 })).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidFieldType(_)));
    }

    #[tokio::test]
    async fn missing_thread_fails_before_any_other_fetch() {
        let mut threads = MockThreadRepo::new();
        threads
            .expect_verify_thread_exists()
            .withf(|id| id == "thread-404")
            .times(1)
            .returning(|_| Err(AppError::not_found("thread not found")));
        threads.expect_get_thread_by_id().never();
        let mut comments = MockCommentRepo::new();
        comments.expect_get_comments_by_thread_id().never();
        let mut replies = MockReplyRepo::new();
        replies.expect_get_replies_by_thread_id().never();

        let use_case = use_case(threads, comments, replies, MockLikeRepo::new());
        let err = use_case.execute(&json!({ "threadId": "thread-404" })).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn orchestrates_the_full_aggregation() {
        let mut threads = MockThreadRepo::new();
        threads.expect_verify_thread_exists().times(1).returning(|_| Ok(()));
        threads.expect_get_thread_by_id().times(1).returning(|id| {
            Ok(ThreadDetail {
                id: id.to_string(),
                title: "test thread".to_string(),
                body: "this is body of thread".to_string(),
                date: at(0),
                username: "fulan".to_string(),
            })
        });

        let mut comments = MockCommentRepo::new();
        comments.expect_get_comments_by_thread_id().times(1).returning(|_| {
            Ok(vec![
                comment("comment-123", "fulan", 1, false),
                comment("comment-124", "fulan", 2, true),
            ])
        });

        let mut replies = MockReplyRepo::new();
        replies
            .expect_get_replies_by_thread_id()
            .times(1)
            .returning(|_| Ok(vec![reply("reply-123", "comment-123", 3, false)]));
        replies.expect_get_replies_by_comment_id().never();

        let mut likes = MockLikeRepo::new();
        likes
            .expect_get_like_count_by_comment_id()
            .times(2)
            .returning(|id| Ok(if id == "comment-123" { 2 } else { 0 }));

        let use_case = use_case(threads, comments, replies, likes);
        let thread = use_case.execute(&json!({ "threadId": "thread-123" })).await.unwrap();

        assert_eq!(thread.id, "thread-123");
        assert_eq!(thread.username, "fulan");
        assert_eq!(thread.comments.len(), 2);
        assert_eq!(thread.comments[0].like_count, 2);
        assert_eq!(thread.comments[0].replies[0].id, "reply-123");
        assert_eq!(thread.comments[1].content, DELETED_COMMENT_CONTENT);
        assert_eq!(thread.comments[1].like_count, 0);
        assert!(thread.comments[1].replies.is_empty());
    }

    #[tokio::test]
    async fn storage_failure_fails_the_whole_read() {
        let mut threads = MockThreadRepo::new();
        threads.expect_verify_thread_exists().returning(|_| Ok(()));
        threads.expect_get_thread_by_id().returning(|id| {
            Ok(ThreadDetail {
                id: id.to_string(),
                title: "t".to_string(),
                body: "b".to_string(),
                date: at(0),
                username: "u".to_string(),
            })
        });
        let mut comments = MockCommentRepo::new();
        comments
            .expect_get_comments_by_thread_id()
            .returning(|_| Ok(vec![comment("c1", "u", 1, false)]));
        let mut replies = MockReplyRepo::new();
        replies.expect_get_replies_by_thread_id().returning(|_| Ok(vec![]));
        let mut likes = MockLikeRepo::new();
        likes
            .expect_get_like_count_by_comment_id()
            .returning(|_| Err(AppError::Internal("connection reset".to_string())));

        let use_case = use_case(threads, comments, replies, likes);
        let err = use_case.execute(&json!({ "threadId": "thread-1" })).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
