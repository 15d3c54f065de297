use std::sync::Arc;

use rf_core::{AddComment, AddedComment, CommentRepo, DeleteComment, Result, ThreadRepo};
use serde_json::Value;

pub struct AddCommentUseCase {
    threads: Arc<dyn ThreadRepo>,
    comments: Arc<dyn CommentRepo>,
}

impl AddCommentUseCase {
    pub fn new(threads: Arc<dyn ThreadRepo>, comments: Arc<dyn CommentRepo>) -> Self {
        Self { threads, comments }
    }

    pub async fn execute(&self, payload: &Value) -> Result<AddedComment> {
        let new_comment = AddComment::try_from(payload)?;
        self.threads.verify_thread_exists(&new_comment.thread_id).await?;

        let added = self.comments.add_comment(&new_comment).await?;
        log::info!("comment {} added to thread {}", added.id, new_comment.thread_id);
        Ok(added)
    }
}

pub struct DeleteCommentUseCase {
    comments: Arc<dyn CommentRepo>,
}

impl DeleteCommentUseCase {
    pub fn new(comments: Arc<dyn CommentRepo>) -> Self {
        Self { comments }
    }

    pub async fn execute(&self, payload: &Value) -> Result<()> {
        let DeleteComment { thread_id, comment_id, owner } = DeleteComment::try_from(payload)?;

        self.comments.verify_comment_in_thread(&comment_id, &thread_id).await?;
        self.comments.verify_comment_owner(&comment_id, &owner).await?;
        self.comments.delete_comment_by_id(&comment_id).await?;

        log::info!("comment {} soft-deleted by {}", comment_id, owner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_core::{AppError, MockCommentRepo, MockThreadRepo};
    use serde_json::json;

    fn add_payload() -> Value {
        json!({ "content": "a comment", "owner": "user-123", "threadId": "thread-123" })
    }

    #[tokio::test]
    async fn add_comment_returns_input_content_and_owner_with_fresh_id() {
        let mut threads = MockThreadRepo::new();
        threads
            .expect_verify_thread_exists()
            .withf(|id| id == "thread-123")
            .times(1)
            .returning(|_| Ok(()));
        let mut comments = MockCommentRepo::new();
        comments.expect_add_comment().times(1).returning(|c| {
            Ok(AddedComment {
                id: "comment-123".to_string(),
                content: c.content.clone(),
                owner: c.owner.clone(),
            })
        });

        let added = AddCommentUseCase::new(Arc::new(threads), Arc::new(comments))
            .execute(&add_payload())
            .await
            .unwrap();

        assert_eq!(
            added,
            AddedComment {
                id: "comment-123".to_string(),
                content: "a comment".to_string(),
                owner: "user-123".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn add_comment_to_missing_thread_inserts_nothing() {
        let mut threads = MockThreadRepo::new();
        threads
            .expect_verify_thread_exists()
            .returning(|_| Err(AppError::not_found("thread not found")));
        let mut comments = MockCommentRepo::new();
        comments.expect_add_comment().never();

        let err = AddCommentUseCase::new(Arc::new(threads), Arc::new(comments))
            .execute(&add_payload())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_comment_checks_pairing_then_owner_then_deletes() {
        let mut seq = mockall::Sequence::new();
        let mut comments = MockCommentRepo::new();
        comments
            .expect_verify_comment_in_thread()
            .withf(|c, t| c == "comment-123" && t == "thread-123")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        comments
            .expect_verify_comment_owner()
            .withf(|c, o| c == "comment-123" && o == "user-123")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        comments
            .expect_delete_comment_by_id()
            .withf(|c| c == "comment-123")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        DeleteCommentUseCase::new(Arc::new(comments))
            .execute(&json!({ "threadId": "thread-123", "commentId": "comment-123", "owner": "user-123" }))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn non_owner_cannot_delete_comment() {
        let mut comments = MockCommentRepo::new();
        comments.expect_verify_comment_in_thread().returning(|_, _| Ok(()));
        comments
            .expect_verify_comment_owner()
            .returning(|_, _| Err(AppError::forbidden()));
        comments.expect_delete_comment_by_id().never();

        let err = DeleteCommentUseCase::new(Arc::new(comments))
            .execute(&json!({ "threadId": "thread-123", "commentId": "comment-123", "owner": "user-999" }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn delete_comment_rejects_non_string_ids() {
        let err = DeleteCommentUseCase::new(Arc::new(MockCommentRepo::new()))
            .execute(&json!({ "threadId": 1, "commentId": "comment-123", "owner": "user-123" }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidFieldType(_)));
    }
}
