pub mod auth;
pub mod health;

pub use self::health::health;

use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Json},
};
use serde_json::json;

// Fallback for unknown routes, same error envelope as the API handlers.
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "error",
            "message": format!("Route {uri} not found"),
        })),
    )
}
