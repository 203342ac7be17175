//! # MyWallet Auth
//!
//! Credential management and session issuance for the MyWallet personal
//! finance API. This service registers users, authenticates them, and issues
//! the bearer tokens consumed by the transaction and subscription routes.
//!
//! ## Authentication
//!
//! Passwords are hashed with bcrypt before storage; the database never sees
//! a plaintext password. Successful registration and login both return a
//! signed HS256 JWT binding the user id to a 15 day expiration. Tokens are
//! stateless and non-revocable; rotating the signing secret invalidates
//! every outstanding token.
//!
//! ## Uniqueness
//!
//! Usernames and emails are unique case-insensitively. The database's
//! functional unique indexes are the authoritative guard; the in-flow lookup
//! only exists to produce a friendlier error message.
//!
//! ## Abuse protection
//!
//! The login endpoint sits behind a fixed-window rate limiter keyed by
//! client address (proxy-forwarded address preferred). The limiter counts
//! attempts, not outcomes.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
