//! Session token issuance.
//!
//! Tokens are HS256 JWTs carrying the user id and an expiration 15 days
//! out. This service never verifies tokens itself; the protected routes
//! downstream do, and the claim shape plus algorithm are the contract they
//! rely on.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed validity window for session tokens.
pub(super) const TOKEN_TTL_DAYS: i64 = 15;

#[derive(Serialize, Deserialize, Debug)]
pub(super) struct Claims {
    #[serde(rename = "userId")]
    pub(super) user_id: Uuid,
    pub(super) exp: i64,
}

/// Issue a signed session token for `user_id`.
///
/// # Errors
/// Returns an error if signing fails.
pub(super) fn issue(user_id: Uuid, secret: &SecretString) -> Result<String> {
    let expires_at = Utc::now() + Duration::days(TOKEN_TTL_DAYS);
    let claims = Claims {
        user_id,
        exp: expires_at.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .context("failed to sign session token")
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, errors::ErrorKind, DecodingKey, Validation};

    fn secret() -> SecretString {
        SecretString::from("test-secret".to_string())
    }

    fn decoding_key(value: &str) -> DecodingKey {
        DecodingKey::from_secret(value.as_bytes())
    }

    #[test]
    fn issued_token_round_trips_user_id() -> Result<()> {
        let user_id = Uuid::new_v4();
        let token = issue(user_id, &secret())?;

        let decoded = decode::<Claims>(&token, &decoding_key("test-secret"), &Validation::default())
            .context("decode issued token")?;
        assert_eq!(decoded.claims.user_id, user_id);
        Ok(())
    }

    #[test]
    fn expiration_is_fifteen_days_out() -> Result<()> {
        let token = issue(Uuid::new_v4(), &secret())?;
        let decoded = decode::<Claims>(&token, &decoding_key("test-secret"), &Validation::default())
            .context("decode issued token")?;

        let expected = (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp();
        assert!((decoded.claims.exp - expected).abs() < 60);
        Ok(())
    }

    #[test]
    fn wrong_secret_fails_validation() -> Result<()> {
        let token = issue(Uuid::new_v4(), &secret())?;
        let result = decode::<Claims>(&token, &decoding_key("other-secret"), &Validation::default());
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn expired_token_reports_expiry() -> Result<()> {
        let claims = Claims {
            user_id: Uuid::new_v4(),
            exp: (Utc::now() - Duration::days(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )?;

        let result = decode::<Claims>(&token, &decoding_key("test-secret"), &Validation::default());
        let err = result.expect_err("expired token must not validate");
        assert_eq!(err.kind(), &ErrorKind::ExpiredSignature);
        Ok(())
    }
}
