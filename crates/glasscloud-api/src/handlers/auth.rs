//! Registration, login, logout, and identity handlers.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use glasscloud_core::error::AppError;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::UserResponse;
use crate::extractors::{AuthUser, BearerToken};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let (user, token) = state
        .account_service
        .register(&req.username, &req.password, &req.email)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "token": token.token,
            "user": UserResponse::from(user),
        }
    })))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let (user, token) = state
        .account_service
        .login(&req.username, &req.password)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "token": token.token,
            "user": UserResponse::from(user),
        }
    })))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<serde_json::Value>, AppError> {
    state.account_service.logout(&token).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "Logged out" } }),
    ))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Result<Json<serde_json::Value>, AppError> {
    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "id": auth.user_id,
            "username": auth.username,
            "email": auth.email,
        }
    })))
}
