//! # rf-services
//!
//! Use cases orchestrating the repository contracts of `rf-core`. Each use
//! case receives its collaborators through its constructor and validates
//! the raw payload before any I/O.

pub mod comments;
pub mod get_thread;
pub mod likes;
pub mod replies;
pub mod threads;
pub mod users;

pub use comments::{AddCommentUseCase, DeleteCommentUseCase};
pub use get_thread::{merge_comments, GetThreadUseCase};
pub use likes::ToggleLikeUseCase;
pub use replies::{AddReplyUseCase, DeleteReplyUseCase};
pub use threads::AddThreadUseCase;
pub use users::{LoginUserUseCase, RegisterUserUseCase};
