//! Page-numbered retrieval over a possibly capped result source

use log::{debug, warn};
use std::future::Future;

use crate::github::context::RunContext;
use crate::github::error::GitHubResult;
use crate::github::rate_limiter::RateSurface;
use crate::github::source::{Fetched, GitHubSource};

/// Why a paged fetch stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The source returned an empty page
    Exhausted,
    /// The next page would cross the hard cap
    HardCap,
    /// The source reported its result window was exceeded
    ResultWindow,
}

/// Items gathered by a [`PagedFetcher`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedOutcome<T> {
    pub items: Vec<T>,
    /// Set when the source holds more than could be retrieved
    pub partial: bool,
    /// Pages that contributed items
    pub pages: u32,
    pub stop: StopReason,
}

/// Fetches pages 1, 2, 3, … until the source runs dry or a cap is hit.
#[derive(Debug, Clone, Copy)]
pub struct PagedFetcher {
    page_size: u32,
    hard_cap: Option<u32>,
    surface: RateSurface,
}

impl PagedFetcher {
    /// Uncapped fetcher over the general surface (listings).
    #[must_use]
    pub fn listing(page_size: u32) -> Self {
        Self {
            page_size,
            hard_cap: None,
            surface: RateSurface::Core,
        }
    }

    /// Capped fetcher over the search surface.
    #[must_use]
    pub fn search(page_size: u32, hard_cap: u32) -> Self {
        Self {
            page_size,
            hard_cap: Some(hard_cap),
            surface: RateSurface::Search,
        }
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// True when requesting `page` would reach past the hard cap.
    #[must_use]
    pub fn exceeds_cap(&self, page: u32) -> bool {
        self.hard_cap
            .is_some_and(|cap| u64::from(page) * u64::from(self.page_size) > u64::from(cap))
    }

    /// Run `fetch_page` for increasing page numbers starting at 1.
    ///
    /// Search pages are preceded by a `/rate_limit` probe; general pages are
    /// paced from their response headers. A result-window error ends the
    /// loop with `partial` set; any other error propagates.
    pub async fn fetch_all<S, T, F, Fut>(
        &self,
        source: &S,
        ctx: &mut RunContext,
        label: &str,
        mut fetch_page: F,
    ) -> GitHubResult<PagedOutcome<T>>
    where
        S: GitHubSource,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = GitHubResult<Fetched<Vec<T>>>>,
    {
        let mut items = Vec::new();
        let mut page = 1u32;

        let stop = loop {
            if self.exceeds_cap(page) {
                warn!(
                    "{label}: stopping before page {page}, {} result cap reached",
                    self.hard_cap.unwrap_or_default()
                );
                break StopReason::HardCap;
            }

            if self.surface == RateSurface::Search {
                match source.search_rate().await {
                    Ok(state) => ctx.pace_search(state).await,
                    Err(e) => warn!("{label}: search quota probe failed: {e}"),
                }
            }

            let result = fetch_page(page).await;
            match self.surface {
                RateSurface::Search => ctx.count_search_call(),
                RateSurface::Core => {
                    let rate = result.as_ref().ok().and_then(|f| f.rate);
                    ctx.observe_core(rate).await;
                }
            }

            match result {
                Ok(fetched) if fetched.data.is_empty() => break StopReason::Exhausted,
                Ok(fetched) => {
                    debug!("{label}: page {page} returned {} items", fetched.data.len());
                    items.extend(fetched.data);
                }
                Err(e) if e.is_result_window() => {
                    warn!("{label}: result window exceeded at page {page}: {e}");
                    break StopReason::ResultWindow;
                }
                Err(e) => return Err(e),
            }
            page += 1;
        };

        Ok(PagedOutcome {
            items,
            partial: stop != StopReason::Exhausted,
            pages: page - 1,
            stop,
        })
    }
}
