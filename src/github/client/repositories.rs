//! Repositories API methods

use super::GitHubClient;
use crate::github::error::{GitHubError, GitHubResult};
use crate::github::source::{CommitRef, Fetched, RepoId};
use octocrab::models::repos::Content;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Deserialize)]
struct RepoItem {
    full_name: String,
}

#[derive(Deserialize)]
struct CommitItem {
    sha: String,
    html_url: String,
}

#[derive(Deserialize)]
struct CommitDetail {
    #[serde(default)]
    files: Vec<CommitFile>,
}

#[derive(Deserialize)]
struct CommitFile {
    filename: String,
}

#[derive(Deserialize)]
struct IssueItem {
    html_url: String,
    pull_request: Option<serde_json::Value>,
}

impl GitHubClient {
    /// Repositories the viewer owns, collaborates on, or reaches via an org
    pub(crate) async fn affiliated_repositories(
        &self,
        page: u32,
        per_page: u32,
    ) -> GitHubResult<Fetched<Vec<RepoId>>> {
        let route = format!(
            "/user/repos?affiliation=owner,collaborator,organization_member&per_page={per_page}&page={page}"
        );
        let fetched = self.get_json::<Vec<RepoItem>>(&route).await?;
        Ok(fetched.map(|items| items.into_iter().map(|r| RepoId::new(r.full_name)).collect()))
    }

    /// Language histogram in bytes
    pub(crate) async fn repo_languages(
        &self,
        repo: &RepoId,
    ) -> GitHubResult<Fetched<BTreeMap<String, u64>>> {
        self.get_json(&format!("/repos/{repo}/languages")).await
    }

    /// Commits in `repo` authored by `login`
    pub(crate) async fn list_author_commits(
        &self,
        repo: &RepoId,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> GitHubResult<Fetched<Vec<CommitRef>>> {
        let author = urlencoding::encode(login);
        let route =
            format!("/repos/{repo}/commits?author={author}&per_page={per_page}&page={page}");
        let fetched = self.get_json::<Vec<CommitItem>>(&route).await?;
        Ok(fetched.map(|items| {
            items
                .into_iter()
                .map(|c| CommitRef {
                    sha: c.sha,
                    url: c.html_url,
                })
                .collect()
        }))
    }

    /// Filenames touched by a single commit
    pub(crate) async fn changed_files(
        &self,
        repo: &RepoId,
        sha: &str,
    ) -> GitHubResult<Fetched<Vec<String>>> {
        let fetched = self
            .get_json::<CommitDetail>(&format!("/repos/{repo}/commits/{sha}"))
            .await?;
        Ok(fetched.map(|detail| detail.files.into_iter().map(|f| f.filename).collect()))
    }

    /// Issues opened by `login`, any state, with the URL kept only for
    /// pull requests.
    ///
    /// The issues endpoint supports a `creator` filter the pulls endpoint
    /// lacks. Plain issues stay in the page as `None` so a page holding only
    /// issues is not mistaken for the end of the listing.
    pub(crate) async fn list_created_pull_requests(
        &self,
        repo: &RepoId,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> GitHubResult<Fetched<Vec<Option<String>>>> {
        let creator = urlencoding::encode(login);
        let route = format!(
            "/repos/{repo}/issues?creator={creator}&state=all&per_page={per_page}&page={page}"
        );
        let fetched = self.get_json::<Vec<IssueItem>>(&route).await?;
        Ok(fetched.map(|items| {
            items
                .into_iter()
                .map(|i| i.pull_request.is_some().then_some(i.html_url))
                .collect()
        }))
    }

    /// Decoded text of a file on the default branch
    pub(crate) async fn decoded_file(
        &self,
        repo: &RepoId,
        path: &str,
    ) -> GitHubResult<Fetched<String>> {
        let fetched = self
            .get_json::<Content>(&format!("/repos/{repo}/contents/{path}"))
            .await?;
        let rate = fetched.rate;
        let text = fetched
            .data
            .decoded_content()
            .ok_or_else(|| GitHubError::Decode(format!("{repo}/{path} has no decodable content")))?;
        Ok(Fetched::new(text, rate))
    }
}
