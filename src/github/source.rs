//! The seam between crawl logic and the GitHub transport.
//!
//! [`GitHubSource`] is implemented by [`GitHubClient`](crate::GitHubClient)
//! and by in-memory fakes in tests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::github::error::GitHubResult;
use crate::github::rate_limiter::RateState;

/// Repository identifier in `owner/name` form.
///
/// Equality is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoId(String);

impl RepoId {
    #[must_use]
    pub fn new(full_name: impl Into<String>) -> Self {
        Self(full_name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        self.0.split_once('/').map_or(self.0.as_str(), |(owner, _)| owner)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.0.split_once('/').map_or("", |(_, name)| name)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RepoId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RepoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Response payload together with the rate snapshot from its headers.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub rate: Option<RateState>,
}

impl<T> Fetched<T> {
    pub fn new(data: T, rate: Option<RateState>) -> Self {
        Self { data, rate }
    }

    /// Payload without a rate snapshot.
    pub fn bare(data: T) -> Self {
        Self { data, rate: None }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            data: f(self.data),
            rate: self.rate,
        }
    }
}

/// A commit authored by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRef {
    pub sha: String,
    pub url: String,
}

/// Read-only view of the source-control API used by discovery and analysis.
#[allow(async_fn_in_trait)]
pub trait GitHubSource {
    /// Login of the authenticated user.
    async fn viewer_login(&self) -> GitHubResult<String>;

    /// Current search-surface quota (`/rate_limit`).
    async fn search_rate(&self) -> GitHubResult<RateState>;

    /// Repositories the viewer owns, collaborates on, or belongs to via an org.
    async fn list_repositories(&self, page: u32, per_page: u32)
    -> GitHubResult<Fetched<Vec<RepoId>>>;

    /// Parent repository of each commit authored by `login` (one per item).
    async fn search_commit_repositories(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> GitHubResult<Fetched<Vec<RepoId>>>;

    /// Repository of each pull request authored by `login` (one per item).
    async fn search_pull_request_repositories(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> GitHubResult<Fetched<Vec<RepoId>>>;

    /// Language name to byte count.
    async fn languages(&self, repo: &RepoId) -> GitHubResult<Fetched<BTreeMap<String, u64>>>;

    async fn commits_by_author(
        &self,
        repo: &RepoId,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> GitHubResult<Fetched<Vec<CommitRef>>>;

    /// Paths of the files changed by `sha`.
    async fn commit_files(&self, repo: &RepoId, sha: &str) -> GitHubResult<Fetched<Vec<String>>>;

    /// One slot per issue opened by `login`, any state: the HTML URL for
    /// pull requests, `None` for plain issues.
    async fn pull_requests_by_creator(
        &self,
        repo: &RepoId,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> GitHubResult<Fetched<Vec<Option<String>>>>;

    /// Decoded text of a file on the default branch.
    async fn file_contents(&self, repo: &RepoId, path: &str) -> GitHubResult<Fetched<String>>;
}

/// Extract `owner/name` from an API repository URL such as
/// `https://api.github.com/repos/owner/name`.
#[must_use]
pub fn repository_from_api_url(url: &str) -> Option<RepoId> {
    let (_, rest) = url.split_once("/repos/")?;
    let mut parts = rest.trim_end_matches('/').split('/');
    let owner = parts.next().filter(|s| !s.is_empty())?;
    let name = parts.next().filter(|s| !s.is_empty())?;
    Some(RepoId::new(format!("{owner}/{name}")))
}
