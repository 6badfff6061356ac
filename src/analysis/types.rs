//! Type definitions for per-repository analysis

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Evidence gathered from one repository.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct RepoAnalysis {
    /// Language name to byte count
    pub languages: BTreeMap<String, u64>,
    /// Distinct, in the order first declared
    pub dependencies: Vec<String>,
    /// Distinct, lower-cased, without the leading dot, in first-seen order
    pub file_extensions: Vec<String>,
    pub commit_count: u64,
    pub pr_count: u64,
    /// Commit URLs first, then pull request URLs
    pub evidence: Vec<String>,
}

impl RepoAnalysis {
    /// Append dependency names not already recorded.
    pub fn add_dependencies(&mut self, names: impl IntoIterator<Item = String>) {
        push_distinct(&mut self.dependencies, names);
    }

    /// Append file extensions not already recorded.
    pub fn add_file_extensions(&mut self, extensions: impl IntoIterator<Item = String>) {
        push_distinct(&mut self.file_extensions, extensions);
    }
}

fn push_distinct(list: &mut Vec<String>, items: impl IntoIterator<Item = String>) {
    for item in items {
        if !list.contains(&item) {
            list.push(item);
        }
    }
}

/// Which part of an analysis a failure was confined to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubAnalysis {
    Languages,
    Commits,
    PullRequests,
    Manifests,
}

impl SubAnalysis {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Languages => "languages",
            Self::Commits => "commits",
            Self::PullRequests => "pull requests",
            Self::Manifests => "manifests",
        }
    }
}
