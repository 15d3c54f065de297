//! Bearer-token authentication extractor.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use rf_core::AppError;

use crate::error::ApiError;
use crate::handlers::AppState;

/// The id of the user carried by a valid `Authorization: Bearer` token.
///
/// Listing it as a handler argument makes the route require authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("application state is not configured".to_string()))?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing authentication".to_string()))?;

    state
        .auth
        .verify_token(token)
        .map(AuthenticatedUser)
        .ok_or_else(|| AppError::Unauthorized("invalid or expired access token".to_string()).into())
}
