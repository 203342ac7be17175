//! Registration endpoint.

use crate::api::email::{spawn_welcome_email, EmailSender, WelcomeEmail};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::instrument;

use super::{
    password::hash_password,
    state::AuthState,
    storage::{self, Duplicate, InsertOutcome},
    token,
    types::{AuthResponse, ErrorMessage, RegisterRequest, UserPayload},
    utils::{bad_request, internal_error, present, profile_image_url, valid_email},
};

pub(super) const FIELDS_REQUIRED: &str = "Username, email and password are required.";
pub(super) const EMAIL_TAKEN: &str = "This email is already in use.";
pub(super) const USERNAME_TAKEN: &str = "This username is already taken.";

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation or uniqueness failure", body = ErrorMessage),
        (status = 500, description = "Unexpected internal failure", body = ErrorMessage),
    ),
    tag = "auth",
)]
#[instrument(skip(pool, auth_state, sender, payload))]
pub async fn register(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    sender: Extension<Arc<dyn EmailSender>>,
    payload: Option<Json<RegisterRequest>>,
) -> Response {
    let request: RegisterRequest = match payload {
        Some(Json(payload)) => payload,
        None => return bad_request(FIELDS_REQUIRED),
    };

    let (Some(username), Some(email), Some(password)) = (
        present(&request.username),
        present(&request.email),
        present(&request.password),
    ) else {
        return bad_request(FIELDS_REQUIRED);
    };

    if !valid_email(email) {
        return bad_request("Invalid email format.");
    }

    if password.len() < 6 {
        return bad_request("Password must be at least 6 characters long.");
    }

    if username.len() < 3 {
        return bad_request("Username must be at least 3 characters long.");
    }

    let production = auth_state.config().production();

    // Pre-check for a friendlier message; the unique indexes in the store
    // stay authoritative (see the insert below).
    match storage::find_by_email_or_username(&pool, email, username).await {
        Ok(Some(existing)) => {
            // Email wins when both match the same record.
            if existing.email.eq_ignore_ascii_case(email) {
                return bad_request(EMAIL_TAKEN);
            }
            return bad_request(USERNAME_TAKEN);
        }
        Ok(None) => (),
        Err(err) => return internal_error(production, &err),
    }

    let profile_image = profile_image_url(username);

    let password_hash = match hash_password(password.to_string()).await {
        Ok(hash) => hash,
        Err(err) => return internal_error(production, &err),
    };

    let user =
        match storage::insert_user(&pool, username, email, &password_hash, &profile_image).await {
            Ok(InsertOutcome::Created(user)) => user,
            Ok(InsertOutcome::Duplicate(Duplicate::Email)) => return bad_request(EMAIL_TAKEN),
            Ok(InsertOutcome::Duplicate(Duplicate::Username)) => {
                return bad_request(USERNAME_TAKEN)
            }
            Err(err) => return internal_error(production, &err),
        };

    let token = match token::issue(user.id, auth_state.config().token_secret()) {
        Ok(token) => token,
        Err(err) => return internal_error(production, &err),
    };

    // Fire-and-forget, failure is only visible in logs.
    spawn_welcome_email(
        sender.0.clone(),
        WelcomeEmail {
            to_email: user.email.clone(),
            username: user.username.clone(),
        },
    );

    (
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully.".to_string(),
            token,
            user: UserPayload::from(user),
        }),
    )
        .into_response()
}
