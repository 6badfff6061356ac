//! Repository analysis logic
//!
//! Each repository is analyzed in four independent parts (languages, commits,
//! pull requests, manifests). A failure in one part is logged and leaves that
//! part empty; the others still run.

pub mod manifests;
mod types;

use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::path::Path;

use crate::github::{GitHubSource, PagedFetcher, RepoId, RunContext};

pub use manifests::ManifestKind;
pub use types::{RepoAnalysis, SubAnalysis};

/// Lower-cased extension of the final path component, if it has one.
///
/// Dotfiles such as `.gitignore` have no extension.
#[must_use]
pub fn file_extension(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_lowercase)
}

/// Per-repository analyzer scoped to one user's activity.
#[derive(Debug, Clone)]
pub struct RepoAnalyzer {
    login: String,
    pages: PagedFetcher,
    manifests: Vec<ManifestKind>,
}

impl RepoAnalyzer {
    #[must_use]
    pub fn new(login: impl Into<String>, page_size: u32) -> Self {
        Self {
            login: login.into(),
            pages: PagedFetcher::listing(page_size),
            manifests: ManifestKind::ALL.to_vec(),
        }
    }

    /// Restrict the manifests probed per repository.
    #[must_use]
    pub fn with_manifests(mut self, manifests: Vec<ManifestKind>) -> Self {
        self.manifests = manifests;
        self
    }

    /// Analyze every repository in order, one at a time.
    pub async fn analyze_all<S: GitHubSource>(
        &self,
        source: &S,
        ctx: &mut RunContext,
        repos: &[RepoId],
    ) -> BTreeMap<RepoId, RepoAnalysis> {
        let mut analyses = BTreeMap::new();
        for (i, repo) in repos.iter().enumerate() {
            info!("Analyzing {repo} ({}/{})", i + 1, repos.len());
            let analysis = self.analyze(source, ctx, repo).await;
            analyses.insert(repo.clone(), analysis);
        }
        analyses
    }

    /// Analyze one repository. Never fails; failed parts stay empty.
    pub async fn analyze<S: GitHubSource>(
        &self,
        source: &S,
        ctx: &mut RunContext,
        repo: &RepoId,
    ) -> RepoAnalysis {
        let mut analysis = RepoAnalysis::default();

        self.collect_languages(source, ctx, repo, &mut analysis).await;
        self.collect_commits(source, ctx, repo, &mut analysis).await;
        self.collect_pull_requests(source, ctx, repo, &mut analysis)
            .await;
        self.collect_dependencies(source, ctx, repo, &mut analysis)
            .await;

        debug!(
            "{repo}: {} commits, {} PRs, {} dependencies, {} file types",
            analysis.commit_count,
            analysis.pr_count,
            analysis.dependencies.len(),
            analysis.file_extensions.len()
        );
        analysis
    }

    async fn collect_languages<S: GitHubSource>(
        &self,
        source: &S,
        ctx: &mut RunContext,
        repo: &RepoId,
        analysis: &mut RepoAnalysis,
    ) {
        match source.languages(repo).await {
            Ok(fetched) => {
                ctx.observe_core(fetched.rate).await;
                analysis.languages = fetched.data;
            }
            Err(e) => {
                ctx.observe_core(None).await;
                warn!(
                    "Failed to fetch {} for {repo}: {e}",
                    SubAnalysis::Languages.as_str()
                );
            }
        }
    }

    async fn collect_commits<S: GitHubSource>(
        &self,
        source: &S,
        ctx: &mut RunContext,
        repo: &RepoId,
        analysis: &mut RepoAnalysis,
    ) {
        let login = self.login.as_str();
        let per_page = self.pages.page_size();
        let label = format!("{repo} commits");

        let commits = match self
            .pages
            .fetch_all(source, ctx, &label, move |page| {
                source.commits_by_author(repo, login, page, per_page)
            })
            .await
        {
            Ok(outcome) => outcome.items,
            Err(e) if e.is_empty_repository() => {
                debug!("{repo} is empty, skipping commit analysis");
                return;
            }
            Err(e) => {
                warn!(
                    "Failed to fetch {} for {repo}: {e}",
                    SubAnalysis::Commits.as_str()
                );
                return;
            }
        };

        analysis.commit_count = commits.len() as u64;
        for commit in commits {
            match source.commit_files(repo, &commit.sha).await {
                Ok(fetched) => {
                    ctx.observe_core(fetched.rate).await;
                    analysis.add_file_extensions(
                        fetched.data.iter().filter_map(|f| file_extension(f)),
                    );
                }
                Err(e) => {
                    ctx.observe_core(None).await;
                    warn!("Failed to fetch files of {repo}@{}: {e}", commit.sha);
                }
            }
            analysis.evidence.push(commit.url);
        }
    }

    async fn collect_pull_requests<S: GitHubSource>(
        &self,
        source: &S,
        ctx: &mut RunContext,
        repo: &RepoId,
        analysis: &mut RepoAnalysis,
    ) {
        let login = self.login.as_str();
        let per_page = self.pages.page_size();
        let label = format!("{repo} pull requests");

        match self
            .pages
            .fetch_all(source, ctx, &label, move |page| {
                source.pull_requests_by_creator(repo, login, page, per_page)
            })
            .await
        {
            Ok(outcome) => {
                let pulls: Vec<String> = outcome.items.into_iter().flatten().collect();
                analysis.pr_count = pulls.len() as u64;
                analysis.evidence.extend(pulls);
            }
            Err(e) => warn!(
                "Failed to fetch {} for {repo}: {e}",
                SubAnalysis::PullRequests.as_str()
            ),
        }
    }

    async fn collect_dependencies<S: GitHubSource>(
        &self,
        source: &S,
        ctx: &mut RunContext,
        repo: &RepoId,
        analysis: &mut RepoAnalysis,
    ) {
        for kind in &self.manifests {
            let path = kind.file_name();
            match source.file_contents(repo, path).await {
                Ok(fetched) => {
                    ctx.observe_core(fetched.rate).await;
                    let deps = kind.extract(&fetched.data);
                    debug!("{repo}/{path}: {} dependencies", deps.len());
                    analysis.add_dependencies(deps);
                }
                Err(e) => {
                    ctx.observe_core(None).await;
                    debug!("Skipping {repo}/{path}: {e}");
                }
            }
        }
    }
}
