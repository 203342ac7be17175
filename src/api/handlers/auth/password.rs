//! bcrypt hashing and verification.
//!
//! Hashing is CPU-bound on purpose; both operations run on the blocking
//! thread pool so they never stall the async executor, and no lock is held
//! across them.

use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use tokio::task;

/// bcrypt digest of `"U*U"` (a fixed test vector). Login burns a
/// verification against it when the email is unknown, so both failure
/// paths perform a verification before answering.
pub(super) const DUMMY_HASH: &str = "$2a$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW";

/// Hash a plaintext password with a fresh salt.
pub(super) async fn hash_password(plaintext: String) -> Result<String> {
    task::spawn_blocking(move || hash(plaintext, DEFAULT_COST))
        .await
        .context("password hashing task aborted")?
        .context("failed to hash password")
}

/// True iff `plaintext` matches the stored bcrypt digest.
pub(super) async fn verify_password(plaintext: String, hashed: String) -> Result<bool> {
    task::spawn_blocking(move || verify(plaintext, &hashed))
        .await
        .context("password verification task aborted")?
        .context("failed to verify password")
}
