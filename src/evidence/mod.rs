//! Evidence links and their classification

mod sampler;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::github::RepoId;

pub use sampler::{EvidenceSampler, sample_by_category, sample_by_repository};

/// What an evidence URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    PullRequest,
    Commit,
    Other,
}

/// An evidence URL with its owning repository and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceLink {
    pub url: String,
    pub repository: Option<RepoId>,
    pub kind: LinkKind,
}

impl EvidenceLink {
    /// Classify `url`. Anything that is not a github.com pull or commit page
    /// becomes [`LinkKind::Other`].
    #[must_use]
    pub fn parse(url: &str) -> Self {
        lazy_static! {
            static ref LINK_RE: Result<Regex, regex::Error> = Regex::new(
                r"^https?://(?:www\.)?github\.com/([^/\s]+)/([^/\s]+)/(pull|commit)/([^/\s?#]+)"
            );
            static ref REPO_RE: Result<Regex, regex::Error> =
                Regex::new(r"^https?://(?:www\.)?github\.com/([^/\s]+)/([^/\s?#]+)");
        }

        if let Ok(link_re) = LINK_RE.as_ref()
            && let Some(caps) = link_re.captures(url)
        {
            let kind = match &caps[3] {
                "pull" => LinkKind::PullRequest,
                _ => LinkKind::Commit,
            };
            return Self {
                url: url.to_string(),
                repository: Some(RepoId::new(format!("{}/{}", &caps[1], &caps[2]))),
                kind,
            };
        }

        let repository = REPO_RE
            .as_ref()
            .ok()
            .and_then(|re| re.captures(url))
            .map(|caps| RepoId::new(format!("{}/{}", &caps[1], &caps[2])));

        Self {
            url: url.to_string(),
            repository,
            kind: LinkKind::Other,
        }
    }
}
