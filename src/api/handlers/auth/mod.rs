//! Auth handlers and supporting modules.
//!
//! Registration validates input, enforces case-insensitive uniqueness of
//! usernames and emails, hashes the password with bcrypt, and answers with a
//! signed session token. Login verifies credentials behind a fixed-window
//! rate limiter keyed by client address.
//!
//! ## Rate Limiting
//!
//! - **Attempt limit:** 3 login attempts per client within 30 seconds.
//! - The limiter counts attempts, not outcomes; it never learns whether a
//!   login succeeded.
//!
//! ## Session Tokens
//!
//! Tokens are HS256 JWTs carrying the user id and a 15 day expiration,
//! signed with the process-wide secret from `MYWALLET_TOKEN_SECRET`.
//!
//! > **Warning:** Rotating the secret invalidates all outstanding tokens.

pub(crate) mod login;
mod password;
mod rate_limit;
pub(crate) mod register;
mod state;
mod storage;
mod token;
pub(crate) mod types;
mod utils;

pub use rate_limit::{LoginRateLimiter, NoopRateLimiter, RateLimiter};
pub use state::{AuthConfig, AuthState};

#[cfg(test)]
mod tests;
