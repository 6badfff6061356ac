//! Search API methods
//!
//! The search surface has its own, much smaller quota and refuses to page
//! past the first 1000 results of any query.

use super::GitHubClient;
use crate::github::error::GitHubResult;
use crate::github::rate_limiter::RateState;
use crate::github::source::{Fetched, RepoId, repository_from_api_url};
use serde::Deserialize;

#[derive(Deserialize)]
struct SearchPage<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Deserialize)]
struct CommitHit {
    repository: Option<RepositoryRef>,
}

#[derive(Deserialize)]
struct RepositoryRef {
    full_name: String,
}

#[derive(Deserialize)]
struct IssueHit {
    repository_url: Option<String>,
}

impl GitHubClient {
    /// Remaining search quota from `/rate_limit`
    pub(crate) async fn search_quota(&self) -> GitHubResult<RateState> {
        let rate_limit = self.inner.ratelimit().get().await?;
        let search = rate_limit.resources.search;
        Ok(RateState::new(
            u32::try_from(search.remaining).unwrap_or(u32::MAX),
            i64::try_from(search.reset).unwrap_or(0),
        ))
    }

    pub(crate) async fn commit_search_repositories(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> GitHubResult<Fetched<Vec<RepoId>>> {
        let q = urlencoding::encode(&format!("author:{login}")).into_owned();
        let route = format!("/search/commits?q={q}&per_page={per_page}&page={page}");
        let fetched = self.get_json::<SearchPage<CommitHit>>(&route).await?;
        Ok(fetched.map(|p| {
            p.items
                .into_iter()
                .filter_map(|hit| hit.repository.map(|r| RepoId::new(r.full_name)))
                .collect()
        }))
    }

    pub(crate) async fn pull_request_search_repositories(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> GitHubResult<Fetched<Vec<RepoId>>> {
        let q = urlencoding::encode(&format!("author:{login} type:pr")).into_owned();
        let route = format!("/search/issues?q={q}&per_page={per_page}&page={page}");
        let fetched = self.get_json::<SearchPage<IssueHit>>(&route).await?;
        Ok(fetched.map(|p| {
            p.items
                .into_iter()
                .filter_map(|hit| hit.repository_url.as_deref().and_then(repository_from_api_url))
                .collect()
        }))
    }
}
