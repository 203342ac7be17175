//! Rate limiting for the login endpoint.
//!
//! Fixed window per client key: the first attempt opens a window, up to the
//! ceiling passes within it, later attempts are rejected until the window
//! elapses. The limiter counts attempts, not outcomes; it has no knowledge
//! of whether a login succeeded.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited,
}

pub trait RateLimiter: Send + Sync {
    /// Register an attempt for `key` and decide whether it may proceed.
    fn check(&self, key: &str) -> RateLimitDecision;
}

/// Limiter for tests that target the flows behind it.
#[derive(Clone, Debug)]
pub struct NoopRateLimiter;

impl RateLimiter for NoopRateLimiter {
    fn check(&self, _key: &str) -> RateLimitDecision {
        RateLimitDecision::Allowed
    }
}

#[derive(Debug)]
struct Window {
    started_at: Instant,
    attempts: u32,
}

/// Fixed-window login limiter.
///
/// Check-and-increment happens under a single mutex guard, so concurrent
/// attempts from one key cannot exceed the ceiling within a window.
#[derive(Debug)]
pub struct LoginRateLimiter {
    max_attempts: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl LoginRateLimiter {
    #[must_use]
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }
}

impl RateLimiter for LoginRateLimiter {
    fn check(&self, key: &str) -> RateLimitDecision {
        let Ok(mut windows) = self.windows.lock() else {
            return RateLimitDecision::Limited; // Fail closed
        };

        // Elapsed windows are dropped, the next attempt opens a fresh one.
        windows.retain(|_, window| window.started_at.elapsed() < self.window);

        let window = windows.entry(key.to_string()).or_insert_with(|| Window {
            started_at: Instant::now(),
            attempts: 0,
        });

        if window.attempts >= self.max_attempts {
            return RateLimitDecision::Limited;
        }

        window.attempts += 1;
        RateLimitDecision::Allowed
    }
}
