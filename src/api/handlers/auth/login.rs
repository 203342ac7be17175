//! Login endpoint.

use axum::{
    extract::{ConnectInfo, Extension},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use sqlx::PgPool;
use std::{net::SocketAddr, sync::Arc};
use tracing::{debug, instrument};

use super::{
    password::{verify_password, DUMMY_HASH},
    rate_limit::RateLimitDecision,
    state::AuthState,
    storage, token,
    types::{AuthResponse, ErrorMessage, LoginRequest, UserPayload},
    utils::{bad_request, extract_client_ip, internal_error, present},
};

pub(super) const FIELDS_REQUIRED: &str = "All fields are required.";
pub(super) const INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub(super) const TOO_MANY_ATTEMPTS: &str = "Too many login attempts. Try again in 30 seconds.";

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing fields or invalid credentials", body = ErrorMessage),
        (status = 429, description = "Too many login attempts", body = ErrorMessage),
        (status = 500, description = "Unexpected internal failure", body = ErrorMessage),
    ),
    tag = "auth",
)]
#[instrument(skip_all)]
pub async fn login(
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    // Proxy-forwarded address first, socket peer address otherwise. Every
    // attempt counts, the limiter never learns the outcome.
    let client_key = extract_client_ip(&headers)
        .or_else(|| connect_info.map(|ConnectInfo(addr)| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string());

    if auth_state.rate_limiter().check(&client_key) == RateLimitDecision::Limited {
        debug!("Rate limited login attempt from {client_key}");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorMessage::new(TOO_MANY_ATTEMPTS)),
        )
            .into_response();
    }

    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return bad_request(FIELDS_REQUIRED),
    };

    let (Some(email), Some(password)) = (present(&request.email), present(&request.password))
    else {
        return bad_request(FIELDS_REQUIRED);
    };

    let production = auth_state.config().production();

    // Exact-match lookup, asymmetric with registration's case-insensitive
    // uniqueness (inherited behavior, see DESIGN.md).
    let user = match storage::find_by_email(&pool, email).await {
        Ok(user) => user,
        Err(err) => return internal_error(production, &err),
    };

    let Some(user) = user else {
        // Unknown email burns a verification so both failure paths answer
        // the same way.
        return match verify_password(password.to_string(), DUMMY_HASH.to_string()).await {
            Ok(_) => bad_request(INVALID_CREDENTIALS),
            Err(err) => internal_error(production, &err),
        };
    };

    match verify_password(password.to_string(), user.password_hash.clone()).await {
        Ok(true) => (),
        Ok(false) => return bad_request(INVALID_CREDENTIALS),
        Err(err) => return internal_error(production, &err),
    }

    let token = match token::issue(user.id, auth_state.config().token_secret()) {
        Ok(token) => token,
        Err(err) => return internal_error(production, &err),
    };

    debug!("Login successful");

    (
        StatusCode::OK,
        Json(AuthResponse {
            message: "Login successful.".to_string(),
            token,
            user: UserPayload::from(user),
        }),
    )
        .into_response()
}
