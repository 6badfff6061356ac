//! GitHub API client wrapper
//!
//! Provides clean API for GitHub operations without exposing Octocrab.
//! Every REST call goes through [`GitHubClient::get_json`], which returns the
//! decoded body together with the `x-ratelimit-*` header snapshot so callers
//! can pace the general surface reactively.
//!
//! # Examples
//!
//! ```rust,no_run
//! use skilltrace::{GitHubClient, GitHubSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gh = GitHubClient::with_token("ghp_...")?;
//!     let login = gh.viewer_login().await?;
//!     println!("Authenticated as {login}");
//!     Ok(())
//! }
//! ```

use crate::github::error::{GitHubError, GitHubResult};
use crate::github::rate_limiter::RateState;
use crate::github::source::{CommitRef, Fetched, GitHubSource, RepoId};
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;

mod repositories;
mod search;
mod users;

/// GitHub API client wrapper that encapsulates Octocrab.
///
/// Cloning is cheap (Arc clone).
#[derive(Clone, Debug)]
pub struct GitHubClient {
    inner: Arc<Octocrab>,
}

impl GitHubClient {
    /// Create a new client builder
    #[must_use]
    pub fn builder() -> GitHubClientBuilder {
        GitHubClientBuilder::new()
    }

    /// Convenience: create client with personal access token
    pub fn with_token(token: impl Into<String>) -> GitHubResult<Self> {
        Self::builder().personal_token(token).build()
    }

    /// Get inner Octocrab client
    #[must_use]
    pub fn inner(&self) -> &Arc<Octocrab> {
        &self.inner
    }

    /// GET `route` and decode the JSON body, keeping the rate headers.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        route: &str,
    ) -> GitHubResult<Fetched<T>> {
        let response = self.inner._get(route).await?;

        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let rate = RateState::from_header_values(
            header("x-ratelimit-remaining").as_deref(),
            header("x-ratelimit-reset").as_deref(),
        );
        let status = response.status();

        let body = self.inner.body_to_string(response).await?;
        if !status.is_success() {
            return Err(GitHubError::from_status(status.as_u16(), &body));
        }

        let data = serde_json::from_str::<T>(&body)?;
        Ok(Fetched::new(data, rate))
    }
}

impl GitHubSource for GitHubClient {
    async fn viewer_login(&self) -> GitHubResult<String> {
        self.current_login().await
    }

    async fn search_rate(&self) -> GitHubResult<RateState> {
        self.search_quota().await
    }

    async fn list_repositories(
        &self,
        page: u32,
        per_page: u32,
    ) -> GitHubResult<Fetched<Vec<RepoId>>> {
        self.affiliated_repositories(page, per_page).await
    }

    async fn search_commit_repositories(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> GitHubResult<Fetched<Vec<RepoId>>> {
        self.commit_search_repositories(login, page, per_page).await
    }

    async fn search_pull_request_repositories(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> GitHubResult<Fetched<Vec<RepoId>>> {
        self.pull_request_search_repositories(login, page, per_page)
            .await
    }

    async fn languages(&self, repo: &RepoId) -> GitHubResult<Fetched<BTreeMap<String, u64>>> {
        self.repo_languages(repo).await
    }

    async fn commits_by_author(
        &self,
        repo: &RepoId,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> GitHubResult<Fetched<Vec<CommitRef>>> {
        self.list_author_commits(repo, login, page, per_page).await
    }

    async fn commit_files(&self, repo: &RepoId, sha: &str) -> GitHubResult<Fetched<Vec<String>>> {
        self.changed_files(repo, sha).await
    }

    async fn pull_requests_by_creator(
        &self,
        repo: &RepoId,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> GitHubResult<Fetched<Vec<Option<String>>>> {
        self.list_created_pull_requests(repo, login, page, per_page)
            .await
    }

    async fn file_contents(&self, repo: &RepoId, path: &str) -> GitHubResult<Fetched<String>> {
        self.decoded_file(repo, path).await
    }
}

/// Builder for creating `GitHubClient`
pub struct GitHubClientBuilder {
    token: Option<String>,
    base_uri: Option<String>,
}

impl GitHubClientBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: None,
            base_uri: None,
        }
    }

    /// Set personal access token for authentication
    #[must_use]
    pub fn personal_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set base URI (for GitHub Enterprise)
    #[must_use]
    pub fn base_uri(mut self, uri: impl Into<String>) -> Self {
        self.base_uri = Some(uri.into());
        self
    }

    /// Build the `GitHubClient`
    pub fn build(self) -> GitHubResult<GitHubClient> {
        let mut builder = Octocrab::builder();

        match self.token {
            Some(token) if !token.trim().is_empty() => {
                builder = builder.personal_token(token);
            }
            _ => return Err(GitHubError::AuthRequired),
        }

        if let Some(uri) = self.base_uri {
            builder = builder
                .base_uri(&uri)
                .map_err(|e| GitHubError::ClientSetup(e.to_string()))?;
        }

        let octocrab = builder
            .build()
            .map_err(|e| GitHubError::ClientSetup(e.to_string()))?;

        Ok(GitHubClient {
            inner: Arc::new(octocrab),
        })
    }
}

impl Default for GitHubClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
