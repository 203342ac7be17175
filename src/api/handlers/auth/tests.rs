//! Auth module tests.
//!
//! These drive the real handlers through a router with a lazily-connected
//! pool. Every request here short-circuits before a query would run, so no
//! database is needed.

use super::rate_limit::{LoginRateLimiter, RateLimiter};
use super::state::{AuthConfig, AuthState};
use crate::api::email::{EmailSender, LogEmailSender};
use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    extract::ConnectInfo,
    http::{header::CONTENT_TYPE, Request, Response, StatusCode},
    routing::post,
    Extension, Router,
};
use secrecy::SecretString;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn test_app(limiter: Arc<dyn RateLimiter>) -> Router {
    // connect_lazy never opens a connection until a query runs.
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://mywallet@localhost:5432/mywallet")
        .expect("lazy pool");
    let config = AuthConfig::new(SecretString::from("test-secret".to_string()));
    let auth_state = Arc::new(AuthState::new(config, limiter));
    let sender: Arc<dyn EmailSender> = Arc::new(LogEmailSender);

    Router::new()
        .route("/api/auth/register", post(super::register::register))
        .route("/api/auth/login", post(super::login::login))
        .layer(Extension(auth_state))
        .layer(Extension(sender))
        .layer(Extension(pool))
}

fn rate_limited_app(max_attempts: u32, window: Duration) -> Router {
    test_app(Arc::new(LoginRateLimiter::new(max_attempts, window)))
}

fn json_request(uri: &str, body: &Value) -> Request<Body> {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 54321))));
    request
}

async fn body_json(response: Response<Body>) -> Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .context("collect response body")?;
    serde_json::from_slice(&bytes).context("parse response body")
}

async fn message_of(response: Response<Body>) -> Result<String> {
    let value = body_json(response).await?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .context("missing message field")
}

#[tokio::test]
async fn register_rejects_missing_fields() -> Result<()> {
    let app = rate_limited_app(3, Duration::from_secs(30));

    let bodies = [
        json!({}),
        json!({"username": "alice"}),
        json!({"username": "alice", "email": "a@b.com"}),
        json!({"username": "alice", "email": "a@b.com", "password": ""}),
    ];

    for body in bodies {
        let response = app
            .clone()
            .oneshot(json_request("/api/auth/register", &body))
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(message_of(response).await?, super::register::FIELDS_REQUIRED);
    }
    Ok(())
}

#[tokio::test]
async fn register_rejects_invalid_email_format() -> Result<()> {
    let app = rate_limited_app(3, Duration::from_secs(30));

    for email in ["not-an-email", "missing-at.example.com", "missing-domain@"] {
        let body = json!({"username": "alice", "email": email, "password": "secret1"});
        let response = app
            .clone()
            .oneshot(json_request("/api/auth/register", &body))
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(message_of(response).await?, "Invalid email format.");
    }
    Ok(())
}

#[tokio::test]
async fn register_rejects_short_password() -> Result<()> {
    let app = rate_limited_app(3, Duration::from_secs(30));

    let body = json!({"username": "alice", "email": "a@b.com", "password": "five5"});
    let response = app
        .oneshot(json_request("/api/auth/register", &body))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        message_of(response).await?,
        "Password must be at least 6 characters long."
    );
    Ok(())
}

#[tokio::test]
async fn register_rejects_short_username() -> Result<()> {
    let app = rate_limited_app(3, Duration::from_secs(30));

    let body = json!({"username": "al", "email": "a@b.com", "password": "secret1"});
    let response = app
        .oneshot(json_request("/api/auth/register", &body))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        message_of(response).await?,
        "Username must be at least 3 characters long."
    );
    Ok(())
}

#[tokio::test]
async fn register_validation_short_circuits_in_order() -> Result<()> {
    let app = rate_limited_app(3, Duration::from_secs(30));

    // Both the email and the password are invalid, the email message wins.
    let body = json!({"username": "al", "email": "nope", "password": "x"});
    let response = app
        .oneshot(json_request("/api/auth/register", &body))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message_of(response).await?, "Invalid email format.");
    Ok(())
}

#[tokio::test]
async fn login_rejects_missing_fields() -> Result<()> {
    let app = rate_limited_app(3, Duration::from_secs(30));

    let bodies = [
        json!({}),
        json!({"email": "a@b.com"}),
        json!({"password": "secret1"}),
        json!({"email": "", "password": "secret1"}),
    ];

    for body in bodies {
        let response = app
            .clone()
            .oneshot(json_request("/api/auth/login", &body))
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(message_of(response).await?, super::login::FIELDS_REQUIRED);
    }
    Ok(())
}

#[tokio::test]
async fn login_fourth_attempt_in_window_is_rejected() -> Result<()> {
    let app = rate_limited_app(3, Duration::from_secs(30));
    let body = json!({});

    for _ in 0..3 {
        let mut request = json_request("/api/auth/login", &body);
        request
            .headers_mut()
            .insert("x-forwarded-for", "9.9.9.9".parse()?);
        let response = app.clone().oneshot(request).await?;
        // Attempts below the ceiling reach the flow (and fail validation).
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let mut request = json_request("/api/auth/login", &body);
    request
        .headers_mut()
        .insert("x-forwarded-for", "9.9.9.9".parse()?);
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(message_of(response).await?, super::login::TOO_MANY_ATTEMPTS);
    Ok(())
}

#[tokio::test]
async fn login_rate_limit_keys_are_independent() -> Result<()> {
    let app = rate_limited_app(1, Duration::from_secs(30));
    let body = json!({});

    let mut request = json_request("/api/auth/login", &body);
    request
        .headers_mut()
        .insert("x-forwarded-for", "1.1.1.1".parse()?);
    assert_eq!(
        app.clone().oneshot(request).await?.status(),
        StatusCode::BAD_REQUEST
    );

    let mut request = json_request("/api/auth/login", &body);
    request
        .headers_mut()
        .insert("x-forwarded-for", "1.1.1.1".parse()?);
    assert_eq!(
        app.clone().oneshot(request).await?.status(),
        StatusCode::TOO_MANY_REQUESTS
    );

    let mut request = json_request("/api/auth/login", &body);
    request
        .headers_mut()
        .insert("x-forwarded-for", "2.2.2.2".parse()?);
    assert_eq!(
        app.clone().oneshot(request).await?.status(),
        StatusCode::BAD_REQUEST
    );
    Ok(())
}

#[tokio::test]
async fn login_attempt_after_window_elapsed_is_accepted() -> Result<()> {
    let app = rate_limited_app(1, Duration::from_millis(20));
    let body = json!({});

    let response = app
        .clone()
        .oneshot(json_request("/api/auth/login", &body))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request("/api/auth/login", &body))
        .await?;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    tokio::time::sleep(Duration::from_millis(40)).await;

    let response = app
        .clone()
        .oneshot(json_request("/api/auth/login", &body))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn validation_errors_use_the_single_message_envelope() -> Result<()> {
    let app = rate_limited_app(3, Duration::from_secs(30));

    let body = json!({"username": "al", "email": "a@b.com", "password": "secret1"});
    let response = app
        .oneshot(json_request("/api/auth/register", &body))
        .await?;

    let value = body_json(response).await?;
    let object = value.as_object().context("expected object body")?;
    assert_eq!(object.len(), 1, "validation errors carry only a message");
    Ok(())
}
