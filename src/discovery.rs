//! Repository discovery across the three activity sources

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::github::{GitHubResult, GitHubSource, PagedFetcher, RepoId, RunContext};

/// Insertion-ordered set of repositories, deduplicated by exact name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoSet {
    order: Vec<RepoId>,
    seen: HashSet<RepoId>,
}

impl RepoSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when `repo` was already present.
    pub fn insert(&mut self, repo: RepoId) -> bool {
        if self.seen.contains(&repo) {
            return false;
        }
        self.seen.insert(repo.clone());
        self.order.push(repo);
        true
    }

    #[must_use]
    pub fn contains(&self, repo: &RepoId) -> bool {
        self.seen.contains(repo)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RepoId> {
        self.order.iter()
    }

    /// First `max` repositories in discovery order.
    #[must_use]
    pub fn truncated(&self, max: usize) -> Vec<RepoId> {
        self.order.iter().take(max).cloned().collect()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<RepoId> {
        self.order
    }
}

impl Extend<RepoId> for RepoSet {
    fn extend<I: IntoIterator<Item = RepoId>>(&mut self, iter: I) {
        for repo in iter {
            self.insert(repo);
        }
    }
}

/// Per-source hit counts, before deduplication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCounts {
    pub listing: usize,
    pub commit_search: usize,
    pub pr_search: usize,
}

/// Result of a discovery pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOutcome {
    pub repositories: RepoSet,
    /// A search source hit its cap; some repositories may be missing
    pub incomplete: bool,
    pub counts: SourceCounts,
}

/// Runs the listing, commit-search and PR-search fetchers and unions them.
#[derive(Debug, Clone, Copy)]
pub struct RepoDiscoverer {
    listing: PagedFetcher,
    search: PagedFetcher,
}

impl RepoDiscoverer {
    #[must_use]
    pub fn new(page_size: u32, search_hard_cap: u32) -> Self {
        Self {
            listing: PagedFetcher::listing(page_size),
            search: PagedFetcher::search(page_size, search_hard_cap),
        }
    }

    pub async fn discover<S: GitHubSource>(
        &self,
        source: &S,
        ctx: &mut RunContext,
        login: &str,
    ) -> GitHubResult<DiscoveryOutcome> {
        let per_page = self.listing.page_size();
        let owned = self
            .listing
            .fetch_all(source, ctx, "repository listing", move |page| {
                source.list_repositories(page, per_page)
            })
            .await?;

        let per_page = self.search.page_size();
        let commits = self
            .search
            .fetch_all(source, ctx, "commit search", move |page| {
                source.search_commit_repositories(login, page, per_page)
            })
            .await?;

        let pulls = self
            .search
            .fetch_all(source, ctx, "pull request search", move |page| {
                source.search_pull_request_repositories(login, page, per_page)
            })
            .await?;

        let counts = SourceCounts {
            listing: owned.items.len(),
            commit_search: commits.items.len(),
            pr_search: pulls.items.len(),
        };
        let incomplete = commits.partial || pulls.partial;

        let mut repositories = RepoSet::new();
        repositories.extend(owned.items);
        repositories.extend(commits.items);
        repositories.extend(pulls.items);

        if incomplete {
            warn!("Search results were capped; discovery may be incomplete");
        }
        info!(
            "Discovered {} repositories for {login} (listing {}, commit hits {}, PR hits {})",
            repositories.len(),
            counts.listing,
            counts.commit_search,
            counts.pr_search
        );

        Ok(DiscoveryOutcome {
            repositories,
            incomplete,
            counts,
        })
    }
}
