//! Database helpers for the users table.
//!
//! The functional unique indexes on `LOWER(username)` / `LOWER(email)` are
//! the authoritative uniqueness guard; the registration pre-check only
//! exists for a friendlier message. Index names are matched here when an
//! insert collides, keep them in sync with `db/schema.sql`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

/// One row of the users table. The password hash stays inside the auth
/// module; responses are built from `UserPayload`.
pub(super) struct UserRecord {
    pub(super) id: Uuid,
    pub(super) username: String,
    pub(super) email: String,
    pub(super) password_hash: String,
    pub(super) profile_image: String,
    pub(super) created_at: DateTime<Utc>,
}

/// Which uniqueness constraint an insert collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Duplicate {
    Email,
    Username,
}

/// Outcome of inserting a new account.
pub(super) enum InsertOutcome {
    Created(UserRecord),
    Duplicate(Duplicate),
}

fn record_from_row(row: &PgRow) -> UserRecord {
    UserRecord {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password"),
        profile_image: row.get("profile_image"),
        created_at: row.get("created_at"),
    }
}

/// Case-insensitive lookup used by the registration uniqueness pre-check.
pub(super) async fn find_by_email_or_username(
    pool: &PgPool,
    email: &str,
    username: &str,
) -> Result<Option<UserRecord>> {
    let query = "SELECT id, username, email, password, profile_image, created_at FROM users WHERE LOWER(email) = LOWER($1) OR LOWER(username) = LOWER($2)";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .bind(username)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup existing account")?;

    Ok(row.as_ref().map(record_from_row))
}

/// Exact-match lookup used by login.
pub(super) async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
    let query = "SELECT id, username, email, password, profile_image, created_at FROM users WHERE email = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup account by email")?;

    Ok(row.as_ref().map(record_from_row))
}

/// Insert a new account; id and creation timestamp are store-assigned.
///
/// A unique violation is reported as `InsertOutcome::Duplicate`, not an
/// error, so the caller can answer with the same message as the pre-check.
pub(super) async fn insert_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
    profile_image: &str,
) -> Result<InsertOutcome> {
    let query = "INSERT INTO users (username, email, password, profile_image) VALUES ($1, $2, $3, $4) RETURNING id, username, email, password, profile_image, created_at";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    match sqlx::query(query)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(profile_image)
        .fetch_one(pool)
        .instrument(span)
        .await
    {
        Ok(row) => Ok(InsertOutcome::Created(record_from_row(&row))),
        Err(err) => match duplicate_from_error(&err) {
            Some(duplicate) => Ok(InsertOutcome::Duplicate(duplicate)),
            None => Err(err).context("failed to insert user"),
        },
    }
}

/// Map a unique violation (SQLSTATE 23505) to the index it hit.
fn duplicate_from_error(err: &sqlx::Error) -> Option<Duplicate> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    if db_err.code().map_or(true, |code| code.as_ref() != "23505") {
        return None;
    }

    match db_err.constraint() {
        Some("users_username_lower_idx") => Some(Duplicate::Username),
        // Unknown unique constraint is attributed to the email, matching the
        // precedence of the registration pre-check.
        _ => Some(Duplicate::Email),
    }
}
