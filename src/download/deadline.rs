//! Wall-clock deadline for the fetch stage.
//!
//! A [`Deadline`] is created when fetching starts and handed down the
//! pipeline. Loops call [`Deadline::check`] once per item, and every await on
//! the remote side goes through [`Deadline::guard`], so a single stalled
//! request cannot outlive the limit either. Expiry surfaces as
//! [`Error::TimedOut`]; anything already collected stays with the caller.
//!
//! Time comes from `tokio::time`, so tests can pause and advance the clock.

use std::future::Future;
use std::time::Duration;

use tokio::time::{timeout_at, Instant};

use crate::error::{Error, Result};

/// Stand-in expiry for limits that overflow `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Point in time after which fetching stops.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    limit: Duration,
    at: Instant,
}

impl Deadline {
    /// Start a deadline `limit` from now.
    ///
    /// Limits too large to represent are clamped to roughly thirty years.
    pub fn after(limit: Duration) -> Self {
        let now = Instant::now();
        let at = now
            .checked_add(limit)
            .unwrap_or_else(|| now + FAR_FUTURE);
        Self { limit, at }
    }

    /// The configured limit.
    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Time left before expiry.
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Fail with `TimedOut` if the deadline has passed.
    pub fn check(&self) -> Result<()> {
        if self.is_expired() {
            return Err(self.timed_out());
        }
        Ok(())
    }

    /// Run `fut`, abandoning it if the deadline passes first.
    pub async fn guard<F: Future>(&self, fut: F) -> Result<F::Output> {
        timeout_at(self.at, fut).await.map_err(|_| self.timed_out())
    }

    fn timed_out(&self) -> Error {
        Error::TimedOut(self.limit.as_secs())
    }
}
