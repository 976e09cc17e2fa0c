//! Share minting and public share access handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Response;

use glasscloud_core::error::AppError;

use crate::dto::request::ShareTargetQuery;
use crate::dto::response::{ItemResponse, ShareResponse};
use crate::extractors::{AuthUser, MaybeAuthUser};
use crate::handlers::item::build_download_response;
use crate::state::AppState;

/// POST /api/items/{id}/share
pub async fn create_share(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = state.share_service.share(&auth, id).await?;
    let base_url = share_base_url(&state, &headers);

    Ok(Json(serde_json::json!({
        "success": true,
        "data": ShareResponse::new(item, &base_url),
    })))
}

/// GET /api/public/{code} — resolve a share code
pub async fn access_share(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(code): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let share = state
        .share_service
        .resolve(&code, viewer.user_id())
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "item": ItemResponse::from(share.item),
            "owner": share.owner_username,
        }
    })))
}

/// GET /api/public/{code}/children?itemId=... — browse a shared folder
pub async fn share_children(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(code): Path<String>,
    Query(query): Query<ShareTargetQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (current, children) = state
        .share_service
        .browse(&code, query.item_id, viewer.user_id())
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "currentFolder": ItemResponse::from(current),
            "items": children.into_iter().map(ItemResponse::from).collect::<Vec<_>>(),
        }
    })))
}

/// GET /api/public/{code}/download?itemId=... — download through a share
pub async fn share_download(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(code): Path<String>,
    Query(query): Query<ShareTargetQuery>,
) -> Result<Response, AppError> {
    let item = state
        .share_service
        .download_target(&code, query.item_id, viewer.user_id())
        .await?;

    // Owners see their private descendants inside folder archives;
    // everyone else gets only the public subtree.
    let include_private = viewer.user_id() == Some(item.owner_id);
    let download = state.download_service.prepare(&item, include_private).await?;
    build_download_response(download)
}

/// The base URL share links are anchored at: configuration wins, the
/// request's Origin header is the fallback for unconfigured deployments.
fn share_base_url(state: &AppState, headers: &HeaderMap) -> String {
    let configured = state.config.server.public_base_url.trim();
    if !configured.is_empty() {
        return configured.to_string();
    }

    headers
        .get("origin")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}
