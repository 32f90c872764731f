use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

/// Header carrying the opaque user id set by the upstream auth gateway
pub const USER_ID_HEADER: &str = "x-user-id";

/// The signed-in user's opaque uid
///
/// Extracting it rejects the request with `401` when the header is missing or blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

impl CurrentUser {
    pub fn uid(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|uid| !uid.is_empty())
            .map(|uid| CurrentUser(uid.to_string()))
            .ok_or_else(|| AppError::Unauthorized("sign in required".to_string()))
    }
}
