use std::sync::Arc;

use rf_core::{AddReply, AddedReply, CommentRepo, DeleteReply, ReplyRepo, Result, ThreadRepo};
use serde_json::Value;

pub struct AddReplyUseCase {
    threads: Arc<dyn ThreadRepo>,
    comments: Arc<dyn CommentRepo>,
    replies: Arc<dyn ReplyRepo>,
}

impl AddReplyUseCase {
    pub fn new(
        threads: Arc<dyn ThreadRepo>,
        comments: Arc<dyn CommentRepo>,
        replies: Arc<dyn ReplyRepo>,
    ) -> Self {
        Self { threads, comments, replies }
    }

    pub async fn execute(&self, payload: &Value) -> Result<AddedReply> {
        let new_reply = AddReply::try_from(payload)?;
        self.threads.verify_thread_exists(&new_reply.thread_id).await?;
        self.comments
            .verify_comment_in_thread(&new_reply.comment_id, &new_reply.thread_id)
            .await?;

        let added = self.replies.add_reply(&new_reply).await?;
        log::info!("reply {} added to comment {}", added.id, new_reply.comment_id);
        Ok(added)
    }
}

pub struct DeleteReplyUseCase {
    threads: Arc<dyn ThreadRepo>,
    comments: Arc<dyn CommentRepo>,
    replies: Arc<dyn ReplyRepo>,
}

impl DeleteReplyUseCase {
    pub fn new(
        threads: Arc<dyn ThreadRepo>,
        comments: Arc<dyn CommentRepo>,
        replies: Arc<dyn ReplyRepo>,
    ) -> Self {
        Self { threads, comments, replies }
    }

    pub async fn execute(&self, payload: &Value) -> Result<()> {
        let DeleteReply { thread_id, comment_id, reply_id, owner } = DeleteReply::try_from(payload)?;

        self.threads.verify_thread_exists(&thread_id).await?;
        self.comments.verify_comment_in_thread(&comment_id, &thread_id).await?;
        self.replies.verify_reply_in_comment(&reply_id, &comment_id).await?;
        self.replies.verify_reply_owner(&reply_id, &owner).await?;
        self.replies.delete_reply_by_id(&reply_id).await?;

        log::info!("reply {} soft-deleted by {}", reply_id, owner);
        Ok(())
    }
}
