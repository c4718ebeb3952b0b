//! In-memory rate limiting for API requests.
//!
//! DESIGN
//! ======
//! Sliding-window counters backed by `HashMap<(subject, class), VecDeque<Instant>>`.
//! Three request classes, each with its own per-subject budget per window:
//! - Read: catalog and dashboard reads (default 100/min)
//! - Write: creates, updates and deletes (default 30/min)
//! - Low stock: the low-stock listing (default 60/min)
//! - User admin: creating and deleting users (default 20/min)
//!
//! A rejected request is not recorded, so a client that backs off regains
//! capacity as soon as its oldest request leaves the window.
//!
//! Once per window the limiter sweeps every bucket and drops the ones whose
//! timestamps have all expired, so memory tracks active subjects only.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::config::env_parse;

const DEFAULT_READ_LIMIT: usize = 100;
const DEFAULT_WRITE_LIMIT: usize = 30;
const DEFAULT_LOW_STOCK_LIMIT: usize = 60;
const DEFAULT_USER_ADMIN_LIMIT: usize = 20;
const DEFAULT_WINDOW_SECS: u64 = 60;

/// Budget bucket a route draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RateClass {
    Read,
    Write,
    LowStock,
    UserAdmin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub read_limit: usize,
    pub write_limit: usize,
    pub low_stock_limit: usize,
    pub user_admin_limit: usize,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            read_limit: DEFAULT_READ_LIMIT,
            write_limit: DEFAULT_WRITE_LIMIT,
            low_stock_limit: DEFAULT_LOW_STOCK_LIMIT,
            user_admin_limit: DEFAULT_USER_ADMIN_LIMIT,
            window: Duration::from_secs(DEFAULT_WINDOW_SECS),
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            read_limit: env_parse("RATE_LIMIT_READS", DEFAULT_READ_LIMIT),
            write_limit: env_parse("RATE_LIMIT_WRITES", DEFAULT_WRITE_LIMIT),
            low_stock_limit: env_parse("RATE_LIMIT_LOW_STOCK", DEFAULT_LOW_STOCK_LIMIT),
            user_admin_limit: env_parse("RATE_LIMIT_USER_ADMIN", DEFAULT_USER_ADMIN_LIMIT),
            window: Duration::from_secs(env_parse("RATE_LIMIT_WINDOW_SECS", DEFAULT_WINDOW_SECS)),
        }
    }

    #[must_use]
    pub fn limit(&self, class: RateClass) -> usize {
        match class {
            RateClass::Read => self.read_limit,
            RateClass::Write => self.write_limit,
            RateClass::LowStock => self.low_stock_limit,
            RateClass::UserAdmin => self.user_admin_limit,
        }
    }
}

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("rate limit exceeded (max {limit} requests/{window_secs}s)")]
    Exceeded { class: RateClass, limit: usize, window_secs: u64 },
}

// =============================================================================
// RATE LIMITER
// =============================================================================

#[derive(Default)]
struct RateLimiterInner {
    buckets: HashMap<(String, RateClass), VecDeque<Instant>>,
    last_sweep: Option<Instant>,
}

impl RateLimiterInner {
    /// Drop buckets with no request left inside the window, at most once per window.
    fn sweep(&mut self, now: Instant, window: Duration) {
        if self.last_sweep.is_some_and(|at| now.duration_since(at) < window) {
            return;
        }
        self.last_sweep = Some(now);
        self.buckets.retain(|_, deque| {
            prune_window(deque, now, window);
            !deque.is_empty()
        });
    }
}

#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self { inner: Arc::new(Mutex::new(RateLimiterInner::default())), config }
    }

    /// Check the subject's budget for `class`, then record the request.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitError::Exceeded`] when the window is already full.
    pub fn check_and_record(&self, subject: &str, class: RateClass) -> Result<(), RateLimitError> {
        self.check_and_record_at(subject, class, Instant::now())
    }

    /// Internal: check + record with explicit timestamp (for testing).
    fn check_and_record_at(&self, subject: &str, class: RateClass, now: Instant) -> Result<(), RateLimitError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let cfg = self.config;
        let limit = cfg.limit(class);

        inner.sweep(now, cfg.window);
        let key = (subject.to_owned(), class);
        let deque = inner.buckets.entry(key.clone()).or_default();
        prune_window(deque, now, cfg.window);
        if deque.len() >= limit {
            if deque.is_empty() {
                inner.buckets.remove(&key);
            }
            return Err(RateLimitError::Exceeded { class, limit, window_secs: cfg.window.as_secs() });
        }
        deque.push_back(now);
        Ok(())
    }

    #[cfg(test)]
    fn tracked_buckets(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).buckets.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn prune_window(deque: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&front) = deque.front() {
        if now.duration_since(front) > window {
            deque.pop_front();
        } else {
            break;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
