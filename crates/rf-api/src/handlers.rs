//! # rf-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the use cases.
//! Handlers only assemble the raw payload (body, path params, authenticated
//! owner) and wrap the outcome in the response envelope; validation and
//! orchestration live in `rf-services`.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use rf_core::{AuthProvider, CommentRepo, LikeRepo, ReplyRepo, ThreadRepo, UserRepo};
use rf_services::{
    AddCommentUseCase, AddReplyUseCase, AddThreadUseCase, DeleteCommentUseCase,
    DeleteReplyUseCase, GetThreadUseCase, LoginUserUseCase, RegisterUserUseCase,
    ToggleLikeUseCase,
};
use serde_json::{json, Map, Value};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub auth: Arc<dyn AuthProvider>,
    register_user: RegisterUserUseCase,
    login_user: LoginUserUseCase,
    add_thread: AddThreadUseCase,
    get_thread: GetThreadUseCase,
    add_comment: AddCommentUseCase,
    delete_comment: DeleteCommentUseCase,
    add_reply: AddReplyUseCase,
    delete_reply: DeleteReplyUseCase,
    toggle_like: ToggleLikeUseCase,
}

impl AppState {
    /// Wires every use case to the given plugins.
    pub fn new(
        threads: Arc<dyn ThreadRepo>,
        comments: Arc<dyn CommentRepo>,
        replies: Arc<dyn ReplyRepo>,
        likes: Arc<dyn LikeRepo>,
        users: Arc<dyn UserRepo>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            register_user: RegisterUserUseCase::new(users.clone(), auth.clone()),
            login_user: LoginUserUseCase::new(users, auth.clone()),
            add_thread: AddThreadUseCase::new(threads.clone()),
            get_thread: GetThreadUseCase::new(
                threads.clone(),
                comments.clone(),
                replies.clone(),
                likes.clone(),
            ),
            add_comment: AddCommentUseCase::new(threads.clone(), comments.clone()),
            delete_comment: DeleteCommentUseCase::new(comments.clone()),
            add_reply: AddReplyUseCase::new(threads.clone(), comments.clone(), replies.clone()),
            delete_reply: DeleteReplyUseCase::new(threads.clone(), comments.clone(), replies),
            toggle_like: ToggleLikeUseCase::new(threads, comments, likes),
            auth,
        }
    }
}

type HandlerResult = Result<HttpResponse, ApiError>;

/// Copies `fields` over the request body. Route params and the owner win
/// over anything the client sent under the same key.
fn payload_with(body: Option<web::Json<Value>>, fields: &[(&str, &str)]) -> Value {
    let mut map = match body.map(web::Json::into_inner) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    for (key, value) in fields {
        map.insert((*key).to_string(), Value::String((*value).to_string()));
    }
    Value::Object(map)
}

fn success(data: Value) -> Value {
    json!({ "status": "success", "data": data })
}

pub async fn register_user(data: web::Data<AppState>, body: web::Json<Value>) -> HandlerResult {
    let added_user = data.register_user.execute(&body).await?;
    Ok(HttpResponse::Created().json(success(json!({ "addedUser": added_user }))))
}

pub async fn login(data: web::Data<AppState>, body: web::Json<Value>) -> HandlerResult {
    let access_token = data.login_user.execute(&body).await?;
    Ok(HttpResponse::Created().json(success(json!({ "accessToken": access_token }))))
}

pub async fn add_thread(
    data: web::Data<AppState>,
    user: AuthenticatedUser,
    body: Option<web::Json<Value>>,
) -> HandlerResult {
    let payload = payload_with(body, &[("owner", user.0.as_str())]);
    let added_thread = data.add_thread.execute(&payload).await?;
    Ok(HttpResponse::Created().json(success(json!({ "addedThread": added_thread }))))
}

/// Renders a thread with its comments, replies and like counts.
pub async fn get_thread(data: web::Data<AppState>, path: web::Path<String>) -> HandlerResult {
    let thread_id = path.into_inner();
    let thread = data.get_thread.execute(&json!({ "threadId": thread_id })).await?;
    Ok(HttpResponse::Ok().json(success(json!({ "thread": thread }))))
}

pub async fn add_comment(
    data: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: Option<web::Json<Value>>,
) -> HandlerResult {
    let thread_id = path.into_inner();
    let payload = payload_with(
        body,
        &[("threadId", thread_id.as_str()), ("owner", user.0.as_str())],
    );
    let added_comment = data.add_comment.execute(&payload).await?;
    Ok(HttpResponse::Created().json(success(json!({ "addedComment": added_comment }))))
}

pub async fn delete_comment(
    data: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> HandlerResult {
    let (thread_id, comment_id) = path.into_inner();
    let payload = json!({ "threadId": thread_id, "commentId": comment_id, "owner": user.0 });
    data.delete_comment.execute(&payload).await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "success" })))
}

pub async fn add_reply(
    data: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
    body: Option<web::Json<Value>>,
) -> HandlerResult {
    let (thread_id, comment_id) = path.into_inner();
    let payload = payload_with(
        body,
        &[
            ("threadId", thread_id.as_str()),
            ("commentId", comment_id.as_str()),
            ("owner", user.0.as_str()),
        ],
    );
    let added_reply = data.add_reply.execute(&payload).await?;
    Ok(HttpResponse::Created().json(success(json!({ "addedReply": added_reply }))))
}

pub async fn delete_reply(
    data: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String, String)>,
) -> HandlerResult {
    let (thread_id, comment_id, reply_id) = path.into_inner();
    let payload = json!({
        "threadId": thread_id,
        "commentId": comment_id,
        "replyId": reply_id,
        "owner": user.0,
    });
    data.delete_reply.execute(&payload).await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "success" })))
}

pub async fn toggle_like(
    data: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> HandlerResult {
    let (thread_id, comment_id) = path.into_inner();
    let payload = json!({ "threadId": thread_id, "commentId": comment_id, "owner": user.0 });
    let liked = data.toggle_like.execute(&payload).await?;
    log::debug!("comment {} liked state is now {}", comment_id, liked);
    Ok(HttpResponse::Ok().json(json!({ "status": "success" })))
}
