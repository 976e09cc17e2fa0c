//! Health check handler.

use axum::Json;
use axum::extract::State;

use glasscloud_core::error::AppError;

use crate::state::AppState;

/// GET /api/health
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let db_ok = sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.db_pool)
        .await
        .is_ok();

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "status": if db_ok { "ok" } else { "degraded" },
            "database": db_ok,
        }
    })))
}
