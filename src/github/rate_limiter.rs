//! Rate limiting support
//!
//! GitHub meters the general REST surface and the search surface with
//! independent quotas, so each surface gets its own [`RateLimiter`].

use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;

/// Snapshot of a quota as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateState {
    pub remaining: u32,
    /// Unix epoch seconds at which the quota refills; 0 when unknown.
    pub reset_at: i64,
}

impl RateState {
    #[must_use]
    pub fn new(remaining: u32, reset_at: i64) -> Self {
        Self { remaining, reset_at }
    }

    /// Build a snapshot from `x-ratelimit-remaining` / `x-ratelimit-reset`
    /// header values. Both must be present and numeric.
    #[must_use]
    pub fn from_header_values(remaining: Option<&str>, reset: Option<&str>) -> Option<Self> {
        let remaining = remaining?.trim().parse::<u32>().ok()?;
        let reset_at = reset?.trim().parse::<i64>().ok()?;
        Some(Self { remaining, reset_at })
    }
}

/// Which quota a limiter tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateSurface {
    /// General REST surface, paced reactively from response headers
    Core,
    /// Search surface, paced proactively from `/rate_limit`
    Search,
}

impl RateSurface {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for RateSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Low-water-mark pacing for one quota surface.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    surface: RateSurface,
    low_water_mark: u32,
    safety_margin: Duration,
    last: Option<RateState>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(surface: RateSurface, low_water_mark: u32, safety_margin: Duration) -> Self {
        Self {
            surface,
            low_water_mark,
            safety_margin,
            last: None,
        }
    }

    #[must_use]
    pub fn surface(&self) -> RateSurface {
        self.surface
    }

    /// Most recently observed snapshot, if any.
    #[must_use]
    pub fn last(&self) -> Option<RateState> {
        self.last
    }

    /// How long to wait given `state`, evaluated at `now` (epoch seconds).
    ///
    /// Zero unless the quota is below the low-water mark and the reset lies
    /// in the future.
    #[must_use]
    pub fn wait_duration(&self, state: RateState, now: i64) -> Duration {
        if state.remaining >= self.low_water_mark || state.reset_at <= 0 || state.reset_at <= now {
            return Duration::ZERO;
        }
        let until_reset = u64::try_from(state.reset_at - now).unwrap_or(0);
        Duration::from_secs(until_reset) + self.safety_margin
    }

    /// Record `state` and suspend until the quota refills if it is running
    /// low. Returns the time spent waiting.
    pub async fn pace(&mut self, state: RateState) -> Duration {
        self.last = Some(state);
        let wait = self.wait_duration(state, Utc::now().timestamp());
        if !wait.is_zero() {
            info!(
                "{} rate limit low ({} remaining), waiting {wait:?}",
                self.surface, state.remaining
            );
            sleep(wait).await;
        }
        wait
    }
}
