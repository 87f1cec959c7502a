use axum::{extract::FromRequestParts, http::request::Parts};
use registrar_core::AppError;
use registrar_models::UserId;

/// Header carrying the authenticated user's id, set by the upstream gateway
/// after it has authenticated the caller.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// The user on whose behalf a request is made; recorded as `created_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub UserId);

impl Actor {
    pub fn user_id(&self) -> UserId {
        self.0
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Missing {ACTOR_HEADER} header")))?;

        let user_id = raw.trim().parse::<UserId>().map_err(|_| {
            AppError::unauthorized(anyhow::anyhow!("Invalid {ACTOR_HEADER} header"))
        })?;

        Ok(Actor(user_id))
    }
}
