//! # Payload Entities
//!
//! Value objects built from raw JSON payloads. Construction validates that
//! every required field is present and is a string; nothing is coerced and
//! unknown keys are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

/// Falsy values (`null`, `""`, `false`, `0`) count as absent.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(_) => true,
    }
}

/// Reads `fields` out of `payload`. Presence of every field is checked
/// before any type check.
fn read_fields<const N: usize>(
    payload: &Value,
    fields: [&str; N],
    context: &str,
) -> Result<[String; N]> {
    if !fields.iter().all(|field| is_present(payload.get(field))) {
        return Err(AppError::MissingField(context.to_string()));
    }

    let mut values: [String; N] = std::array::from_fn(|_| String::new());
    for (slot, field) in values.iter_mut().zip(fields) {
        *slot = payload[field]
            .as_str()
            .ok_or_else(|| AppError::InvalidFieldType(context.to_string()))?
            .to_string();
    }
    Ok(values)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddThread {
    pub title: String,
    pub body: String,
    pub owner: String,
}

impl TryFrom<&Value> for AddThread {
    type Error = AppError;

    fn try_from(payload: &Value) -> Result<Self> {
        let [title, body, owner] = read_fields(payload, ["title", "body", "owner"], "add thread")?;
        Ok(Self { title, body, owner })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedThread {
    pub id: String,
    pub title: String,
    pub owner: String,
}

impl TryFrom<&Value> for AddedThread {
    type Error = AppError;

    fn try_from(payload: &Value) -> Result<Self> {
        let [id, title, owner] = read_fields(payload, ["id", "title", "owner"], "added thread")?;
        Ok(Self { id, title, owner })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddComment {
    pub content: String,
    pub owner: String,
    pub thread_id: String,
}

impl TryFrom<&Value> for AddComment {
    type Error = AppError;

    fn try_from(payload: &Value) -> Result<Self> {
        let [content, owner, thread_id] =
            read_fields(payload, ["content", "owner", "threadId"], "add comment")?;
        Ok(Self { content, owner, thread_id })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedComment {
    pub id: String,
    pub content: String,
    pub owner: String,
}

impl TryFrom<&Value> for AddedComment {
    type Error = AppError;

    fn try_from(payload: &Value) -> Result<Self> {
        let [id, content, owner] = read_fields(payload, ["id", "content", "owner"], "added comment")?;
        Ok(Self { id, content, owner })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddReply {
    pub content: String,
    pub owner: String,
    pub thread_id: String,
    pub comment_id: String,
}

impl TryFrom<&Value> for AddReply {
    type Error = AppError;

    fn try_from(payload: &Value) -> Result<Self> {
        let [content, owner, thread_id, comment_id] = read_fields(
            payload,
            ["content", "owner", "threadId", "commentId"],
            "add reply",
        )?;
        Ok(Self { content, owner, thread_id, comment_id })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedReply {
    pub id: String,
    pub content: String,
    pub owner: String,
}

impl TryFrom<&Value> for AddedReply {
    type Error = AppError;

    fn try_from(payload: &Value) -> Result<Self> {
        let [id, content, owner] = read_fields(payload, ["id", "content", "owner"], "added reply")?;
        Ok(Self { id, content, owner })
    }
}

/// Input of the thread aggregation read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadQuery {
    pub thread_id: String,
}

impl TryFrom<&Value> for ThreadQuery {
    type Error = AppError;

    fn try_from(payload: &Value) -> Result<Self> {
        let [thread_id] = read_fields(payload, ["threadId"], "get thread")?;
        Ok(Self { thread_id })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteComment {
    pub thread_id: String,
    pub comment_id: String,
    pub owner: String,
}

impl TryFrom<&Value> for DeleteComment {
    type Error = AppError;

    fn try_from(payload: &Value) -> Result<Self> {
        let [thread_id, comment_id, owner] =
            read_fields(payload, ["threadId", "commentId", "owner"], "delete comment")?;
        Ok(Self { thread_id, comment_id, owner })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteReply {
    pub thread_id: String,
    pub comment_id: String,
    pub reply_id: String,
    pub owner: String,
}

impl TryFrom<&Value> for DeleteReply {
    type Error = AppError;

    fn try_from(payload: &Value) -> Result<Self> {
        let [thread_id, comment_id, reply_id, owner] = read_fields(
            payload,
            ["threadId", "commentId", "replyId", "owner"],
            "delete reply",
        )?;
        Ok(Self { thread_id, comment_id, reply_id, owner })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleLike {
    pub thread_id: String,
    pub comment_id: String,
    pub owner: String,
}

impl TryFrom<&Value> for ToggleLike {
    type Error = AppError;

    fn try_from(payload: &Value) -> Result<Self> {
        let [thread_id, comment_id, owner] =
            read_fields(payload, ["threadId", "commentId", "owner"], "toggle like")?;
        Ok(Self { thread_id, comment_id, owner })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUser {
    pub username: String,
    pub password: String,
    pub fullname: String,
}

impl TryFrom<&Value> for RegisterUser {
    type Error = AppError;

    fn try_from(payload: &Value) -> Result<Self> {
        let [username, password, fullname] =
            read_fields(payload, ["username", "password", "fullname"], "register user")?;
        Ok(Self { username, password, fullname })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginUser {
    pub username: String,
    pub password: String,
}

impl TryFrom<&Value> for LoginUser {
    type Error = AppError;

    fn try_from(payload: &Value) -> Result<Self> {
        let [username, password] = read_fields(payload, ["username", "password"], "login user")?;
        Ok(Self { username, password })
    }
}
