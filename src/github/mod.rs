//! GitHub API operations module
//!
//! Octocrab-backed transport plus the paging and rate pacing the crawl
//! relies on.

pub mod client;
pub mod context;
pub mod error;
pub mod paged;
pub mod rate_limiter;
pub mod source;

// Re-export client types
pub use client::{GitHubClient, GitHubClientBuilder};

// Re-export error types
pub use error::{GitHubError, GitHubResult};

pub use context::{CallStats, RunContext};
pub use paged::{PagedFetcher, PagedOutcome, StopReason};
pub use rate_limiter::{RateLimiter, RateState, RateSurface};
pub use source::{CommitRef, Fetched, GitHubSource, RepoId, repository_from_api_url};
