//! rusty-forum/crates/rf-core/src/lib.rs
//!
//! The central domain types and interface definitions for Rusty-Forum.

pub mod entities;
pub mod error;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use entities::*;
pub use error::*;
pub use models::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use chrono::Utc;

    fn comment(is_deleted: bool) -> CommentRecord {
        CommentRecord {
            id: "comment-123".to_string(),
            username: "dicoding".to_string(),
            date: Utc::now(),
            content: "secret words".to_string(),
            is_deleted,
        }
    }

    #[test]
    fn deleted_comment_is_masked_not_removed() {
        let deleted = comment(true);
        assert_eq!(deleted.display_content(), DELETED_COMMENT_CONTENT);
        assert_eq!(deleted.display_content(), deleted.display_content());
        assert_eq!(comment(false).display_content(), "secret words");
    }

    #[test]
    fn reply_view_keeps_identity_when_deleted() {
        let reply = ReplyRecord {
            id: "reply-1".to_string(),
            comment_id: "comment-123".to_string(),
            username: "johndoe".to_string(),
            date: Utc::now(),
            content: "hello".to_string(),
            is_deleted: true,
        };
        let view = ReplyView::from(&reply);
        assert_eq!(view.id, "reply-1");
        assert_eq!(view.username, "johndoe");
        assert_eq!(view.content, DELETED_REPLY_CONTENT);
    }

    #[test]
    fn comment_view_serializes_like_count_in_camel_case() {
        let view = CommentView {
            id: "comment-1".to_string(),
            username: "dicoding".to_string(),
            date: Utc::now(),
            content: "hi".to_string(),
            like_count: 2,
            replies: vec![],
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["likeCount"], 2);
        assert!(json["replies"].as_array().unwrap().is_empty());
    }
}
