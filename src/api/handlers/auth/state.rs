//! Auth state and configuration.

use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;

use super::rate_limit::RateLimiter;

const DEFAULT_LOGIN_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_LOGIN_WINDOW: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct AuthConfig {
    token_secret: SecretString,
    production: bool,
    login_max_attempts: u32,
    login_window: Duration,
}

impl AuthConfig {
    #[must_use]
    pub fn new(token_secret: SecretString) -> Self {
        Self {
            token_secret,
            production: false,
            login_max_attempts: DEFAULT_LOGIN_MAX_ATTEMPTS,
            login_window: DEFAULT_LOGIN_WINDOW,
        }
    }

    #[must_use]
    pub fn with_production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    #[must_use]
    pub fn with_login_max_attempts(mut self, max_attempts: u32) -> Self {
        self.login_max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn with_login_window(mut self, window: Duration) -> Self {
        self.login_window = window;
        self
    }

    #[must_use]
    pub fn login_max_attempts(&self) -> u32 {
        self.login_max_attempts
    }

    #[must_use]
    pub fn login_window(&self) -> Duration {
        self.login_window
    }

    #[must_use]
    pub fn production(&self) -> bool {
        self.production
    }

    pub(super) fn token_secret(&self) -> &SecretString {
        &self.token_secret
    }
}

pub struct AuthState {
    config: AuthConfig,
    rate_limiter: Arc<dyn RateLimiter>,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, rate_limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            config,
            rate_limiter,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(super) fn rate_limiter(&self) -> &dyn RateLimiter {
        self.rate_limiter.as_ref()
    }
}
