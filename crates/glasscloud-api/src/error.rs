//! Maps domain `AppError` to HTTP responses.

// The `IntoResponse` impl for `AppError` lives in `glasscloud_core::error`
// next to the type itself, as required by the orphan rules.
pub use glasscloud_core::error::ApiErrorResponse;
