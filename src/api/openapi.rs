use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{auth, health};

/// OpenAPI document for the auth API, served by Swagger UI at `/api-docs`.
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::register::register,
        auth::login::login,
    ),
    components(schemas(
        auth::types::RegisterRequest,
        auth::types::LoginRequest,
        auth::types::AuthResponse,
        auth::types::UserPayload,
        auth::types::ErrorMessage,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Build the application router.
///
/// Add new endpoints here and to the `paths` list above so they are both
/// served and included in the generated `OpenAPI` spec. The fallback route
/// is wired by the caller and intentionally not documented.
pub(crate) fn router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health))
        .route("/api/auth/register", post(auth::register::register))
        .route("/api/auth/login", post(auth::login::login))
}
