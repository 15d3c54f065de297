//! # AppError
//!
//! Centralized error handling for the Rusty-Forum ecosystem.
//! Every repository contract and use case reports failures through this type.

use thiserror::Error;

/// The primary error type for all rf-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Payload is missing one or more required fields
    #[error("{0}: payload does not contain the needed properties")]
    MissingField(String),

    /// A payload field has the wrong primitive type
    #[error("{0}: payload does not meet the data type specification")]
    InvalidFieldType(String),

    /// Referenced entity (or entity-under-parent pairing) is absent
    #[error("{0}")]
    NotFound(String),

    /// Authenticated, but not the owner of the resource being mutated
    #[error("{0}")]
    Forbidden(String),

    /// Missing or invalid credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Resource already exists (e.g., taken username)
    #[error("{0}")]
    Conflict(String),

    /// Contract method with no backing implementation
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    /// Infrastructure failure (e.g., DB down)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn forbidden() -> Self {
        Self::Forbidden("you are not allowed to access this resource".to_string())
    }
}

/// A specialized Result type for Rusty-Forum logic.
pub type Result<T> = std::result::Result<T, AppError>;
