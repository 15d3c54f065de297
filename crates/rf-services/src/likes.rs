use std::sync::Arc;

use rf_core::{CommentRepo, LikeRepo, Result, ThreadRepo, ToggleLike};
use serde_json::Value;

/// Flips the caller's like on a comment.
///
/// The read of the current state and the write that follows are two separate
/// repository calls; overlapping toggles from the same user are settled by
/// the storage layer's unique (comment, owner) constraint.
pub struct ToggleLikeUseCase {
    threads: Arc<dyn ThreadRepo>,
    comments: Arc<dyn CommentRepo>,
    likes: Arc<dyn LikeRepo>,
}

impl ToggleLikeUseCase {
    pub fn new(
        threads: Arc<dyn ThreadRepo>,
        comments: Arc<dyn CommentRepo>,
        likes: Arc<dyn LikeRepo>,
    ) -> Self {
        Self { threads, comments, likes }
    }

    /// Returns whether the comment is liked by the caller afterwards.
    pub async fn execute(&self, payload: &Value) -> Result<bool> {
        let ToggleLike { thread_id, comment_id, owner } = ToggleLike::try_from(payload)?;

        self.threads.verify_thread_exists(&thread_id).await?;
        self.comments.verify_comment_in_thread(&comment_id, &thread_id).await?;

        if self.likes.is_comment_liked(&comment_id, &owner).await? {
            self.likes.unlike_comment(&comment_id, &owner).await?;
            log::debug!("{} unliked comment {}", owner, comment_id);
            Ok(false)
        } else {
            self.likes.like_comment(&comment_id, &owner).await?;
            log::debug!("{} liked comment {}", owner, comment_id);
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_core::{AppError, MockCommentRepo, MockLikeRepo, MockThreadRepo};
    use serde_json::json;

    fn payload() -> Value {
        json!({ "threadId": "thread-123", "commentId": "comment-123", "owner": "user-123" })
    }

    fn existing_comment() -> (MockThreadRepo, MockCommentRepo) {
        let mut threads = MockThreadRepo::new();
        threads.expect_verify_thread_exists().returning(|_| Ok(()));
        let mut comments = MockCommentRepo::new();
        comments.expect_verify_comment_in_thread().returning(|_, _| Ok(()));
        (threads, comments)
    }

    #[tokio::test]
    async fn likes_when_not_yet_liked() {
        let (threads, comments) = existing_comment();
        let mut likes = MockLikeRepo::new();
        likes.expect_is_comment_liked().returning(|_, _| Ok(false));
        likes
            .expect_like_comment()
            .withf(|c, o| c == "comment-123" && o == "user-123")
            .times(1)
            .returning(|_, _| Ok(()));
        likes.expect_unlike_comment().never();

        let liked = ToggleLikeUseCase::new(Arc::new(threads), Arc::new(comments), Arc::new(likes))
            .execute(&payload())
            .await
            .unwrap();
        assert!(liked);
    }

    #[tokio::test]
    async fn unlikes_when_already_liked() {
        let (threads, comments) = existing_comment();
        let mut likes = MockLikeRepo::new();
        likes.expect_is_comment_liked().returning(|_, _| Ok(true));
        likes.expect_unlike_comment().times(1).returning(|_, _| Ok(()));
        likes.expect_like_comment().never();

        let liked = ToggleLikeUseCase::new(Arc::new(threads), Arc::new(comments), Arc::new(likes))
            .execute(&payload())
            .await
            .unwrap();
        assert!(!liked);
    }

    #[tokio::test]
    async fn comment_outside_thread_is_not_found_and_untouched() {
        let mut threads = MockThreadRepo::new();
        threads.expect_verify_thread_exists().returning(|_| Ok(()));
        let mut comments = MockCommentRepo::new();
        comments
            .expect_verify_comment_in_thread()
            .returning(|_, _| Err(AppError::not_found("comment not found in thread")));
        let mut likes = MockLikeRepo::new();
        likes.expect_is_comment_liked().never();
        likes.expect_like_comment().never();

        let err = ToggleLikeUseCase::new(Arc::new(threads), Arc::new(comments), Arc::new(likes))
            .execute(&payload())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn rejects_incomplete_payload() {
        let err = ToggleLikeUseCase::new(
            Arc::new(MockThreadRepo::new()),
            Arc::new(MockCommentRepo::new()),
            Arc::new(MockLikeRepo::new()),
        )
        .execute(&json!({ "threadId": "thread-123", "owner": "user-123" }))
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::MissingField(_)));
    }
}
