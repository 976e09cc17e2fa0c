//! Item tree handlers: listing, folder creation, upload, rename,
//! privacy, delete, and owner downloads.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use validator::Validate;

use glasscloud_core::error::AppError;
use glasscloud_service::{Download, DownloadBody, NewUpload};

use crate::dto::request::{CreateFolderRequest, ListItemsQuery, PrivacyRequest, RenameRequest};
use crate::dto::response::ItemResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/items?parentId=...
pub async fn list_items(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (current, children) = state.item_service.list(&auth, query.parent_id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "currentFolder": current.map(ItemResponse::from),
            "items": children.into_iter().map(ItemResponse::from).collect::<Vec<_>>(),
        }
    })))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFolderRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let folder = state
        .item_service
        .create_folder(&auth, &req.name, req.parent_id)
        .await?;

    Ok(Json(
        serde_json::json!({ "success": true, "data": ItemResponse::from(folder) }),
    ))
}

/// POST /api/files/upload — multipart upload
///
/// Expects a `file` part and an optional `parentId` text part.
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut parent_id: Option<i64> = None;
    let mut file_name: Option<String> = None;
    let mut mime: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "parentId" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?;
                if !text.trim().is_empty() {
                    parent_id = Some(
                        text.trim()
                            .parse::<i64>()
                            .map_err(|_| AppError::validation("Invalid parentId"))?,
                    );
                }
            }
            "file" => {
                file_name = field.file_name().map(String::from);
                mime = field.content_type().map(String::from);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let file_name = file_name.ok_or_else(|| AppError::validation("Missing file name"))?;
    let data = data.ok_or_else(|| AppError::validation("Missing file content"))?;

    let item = state
        .item_service
        .upload(
            &auth,
            NewUpload {
                file_name,
                mime,
                parent_id,
                data,
            },
        )
        .await?;

    Ok(Json(
        serde_json::json!({ "success": true, "data": ItemResponse::from(item) }),
    ))
}

/// PATCH /api/items/{id} — rename
pub async fn rename_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let item = state.item_service.rename(&auth, id, &req.name).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": ItemResponse::from(item) }),
    ))
}

/// PATCH /api/items/{id}/privacy
pub async fn set_privacy(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<PrivacyRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = state
        .item_service
        .set_privacy(&auth, id, req.is_private)
        .await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": ItemResponse::from(item) }),
    ))
}

/// DELETE /api/items/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = state.item_service.delete(&auth, id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "deleted": deleted } }),
    ))
}

/// GET /api/items/{id}/download
pub async fn download_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let item = state.item_service.find_owned(&auth, id).await?;
    let download = state.download_service.prepare(&item, true).await?;
    build_download_response(download)
}

/// Turn a prepared download into an HTTP response, streaming files and
/// buffering folder archives.
pub(crate) fn build_download_response(download: Download) -> Result<Response, AppError> {
    let disposition = format!(
        "attachment; filename=\"{}\"",
        download.file_name.replace(['"', '\r', '\n'], "_")
    );

    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, download.content_type)
        .header(header::CONTENT_DISPOSITION, disposition);

    let response = match download.body {
        DownloadBody::Stream { stream, size } => builder
            .header(header::CONTENT_LENGTH, size)
            .body(Body::from_stream(stream)),
        DownloadBody::Archive(data) => builder
            .header(header::CONTENT_LENGTH, data.len())
            .body(Body::from(data)),
    };

    response.map_err(|e| AppError::internal(format!("Response build failed: {e}")))
}
