//! Bearer token extractors — pull the opaque token from the Authorization
//! header, resolve it against the token store, and inject context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use glasscloud_core::error::AppError;
use glasscloud_service::context::RequestContext;

use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Like [`AuthUser`], but optional: public share endpoints accept
/// anonymous requests while still recognizing the owner when a valid
/// token is present.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<RequestContext>);

impl MaybeAuthUser {
    /// The viewer's user ID, if authenticated.
    pub fn user_id(&self) -> Option<i64> {
        self.0.as_ref().map(|ctx| ctx.user_id)
    }
}

/// The raw bearer token, for endpoints that operate on the token itself
/// (logout).
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

fn bearer_token(parts: &Parts) -> Result<String, AppError> {
    let auth_header = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))?;

    Ok(token.to_string())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user = state.token_manager.resolve(&token).await?;

        Ok(AuthUser(RequestContext::new(
            user.id,
            user.username,
            user.email,
        )))
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // An absent or malformed header means anonymous; a well-formed but
        // invalid token does too, so stale sessions can still browse
        // public shares.
        let Ok(token) = bearer_token(parts) else {
            return Ok(MaybeAuthUser(None));
        };

        match state.token_manager.resolve(&token).await {
            Ok(user) => Ok(MaybeAuthUser(Some(RequestContext::new(
                user.id,
                user.username,
                user.email,
            )))),
            Err(_) => Ok(MaybeAuthUser(None)),
        }
    }
}

impl FromRequestParts<AppState> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(BearerToken(bearer_token(parts)?))
    }
}
