//! Per-run mutable state threaded through every crawl step

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::github::rate_limiter::{RateLimiter, RateState, RateSurface};

/// Request and pacing counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStats {
    pub core_calls: u64,
    pub search_calls: u64,
    pub rate_probes: u64,
    pub waits: u64,
    pub waited: Duration,
}

/// Owned run context: both rate limiters plus the call counters.
///
/// Passed `&mut` into each component instead of sharing counters globally.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub core: RateLimiter,
    pub search: RateLimiter,
    pub stats: CallStats,
}

impl RunContext {
    #[must_use]
    pub fn new(core: RateLimiter, search: RateLimiter) -> Self {
        Self {
            core,
            search,
            stats: CallStats::default(),
        }
    }

    /// Context with the stock GitHub low-water marks.
    #[must_use]
    pub fn with_marks(core_mark: u32, search_mark: u32, safety_margin: Duration) -> Self {
        Self::new(
            RateLimiter::new(RateSurface::Core, core_mark, safety_margin),
            RateLimiter::new(RateSurface::Search, search_mark, safety_margin),
        )
    }

    /// Count one general-surface call and pace on its header snapshot.
    pub async fn observe_core(&mut self, rate: Option<RateState>) {
        self.stats.core_calls += 1;
        if let Some(state) = rate {
            let waited = self.core.pace(state).await;
            self.record_wait(waited);
        }
    }

    /// Pace the search surface from a freshly probed snapshot.
    pub async fn pace_search(&mut self, state: RateState) {
        self.stats.rate_probes += 1;
        let waited = self.search.pace(state).await;
        self.record_wait(waited);
    }

    pub(crate) fn count_search_call(&mut self) {
        self.stats.search_calls += 1;
    }

    fn record_wait(&mut self, waited: Duration) {
        if !waited.is_zero() {
            self.stats.waits += 1;
            self.stats.waited += waited;
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::with_marks(100, 5, Duration::from_secs(2))
    }
}
