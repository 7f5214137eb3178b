//! Extractor for the identity supplied by the upstream authentication layer.
//!
//! The gateway in front of the server authenticates callers and forwards
//! the result as trusted headers. Requests without them are rejected.

use super::error::ApiError;
use crate::identity::{Actor, UserId, UserRole};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

/// Header carrying the authenticated user's UUID.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated user's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Acting principal extracted from trusted request headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedActor(pub Actor);

fn header_value<'a>(parts: &'a Parts, name: &'static str) -> Result<&'a str, ApiError> {
    parts
        .headers
        .get(name)
        .ok_or_else(|| ApiError::unauthorized(format!("missing {name} header")))?
        .to_str()
        .map_err(|_| ApiError::unauthorized(format!("malformed {name} header")))
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = Uuid::parse_str(header_value(parts, USER_ID_HEADER)?.trim())
            .map_err(|_| ApiError::unauthorized(format!("malformed {USER_ID_HEADER} header")))?;
        let role = UserRole::try_from(header_value(parts, USER_ROLE_HEADER)?)
            .map_err(|err| ApiError::unauthorized(err.to_string()))?;
        Ok(Self(Actor::new(UserId::from_uuid(user_id), role)))
    }
}
