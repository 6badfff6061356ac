//! Folding per-repository analyses into one profile

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::analysis::RepoAnalysis;
use crate::github::RepoId;

/// One language's share of the total byte count.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct LanguageShare {
    pub language: String,
    pub bytes: u64,
    pub percent: f64,
}

/// Profile built from every analyzed repository.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct AggregateResult {
    /// Sorted by descending byte count
    pub languages: Vec<LanguageShare>,
    /// First-seen order, truncated
    pub dependencies: Vec<String>,
    /// First-seen order, truncated
    pub file_extensions: Vec<String>,
    pub evidence: Vec<String>,
    pub total_commits: u64,
    pub total_prs: u64,
    pub repositories: usize,
}

/// Top-N limits applied while folding.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    pub top_dependencies: usize,
    pub top_extensions: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            top_dependencies: 50,
            top_extensions: 30,
        }
    }
}

impl Aggregator {
    #[must_use]
    pub fn new(top_dependencies: usize, top_extensions: usize) -> Self {
        Self {
            top_dependencies,
            top_extensions,
        }
    }

    /// Pure fold over `analyses`.
    #[must_use]
    pub fn aggregate(&self, analyses: &BTreeMap<RepoId, RepoAnalysis>) -> AggregateResult {
        let mut bytes: HashMap<&str, u64> = HashMap::new();
        let mut dependencies = FirstSeen::default();
        let mut extensions = FirstSeen::default();
        let mut evidence = Vec::new();
        let mut total_commits = 0u64;
        let mut total_prs = 0u64;

        for analysis in analyses.values() {
            for (language, count) in &analysis.languages {
                *bytes.entry(language.as_str()).or_default() += count;
            }
            dependencies.extend(&analysis.dependencies);
            extensions.extend(&analysis.file_extensions);
            evidence.extend(analysis.evidence.iter().cloned());
            total_commits += analysis.commit_count;
            total_prs += analysis.pr_count;
        }

        AggregateResult {
            languages: language_shares(&bytes),
            dependencies: dependencies.take(self.top_dependencies),
            file_extensions: extensions.take(self.top_extensions),
            evidence,
            total_commits,
            total_prs,
            repositories: analyses.len(),
        }
    }
}

fn language_shares(bytes: &HashMap<&str, u64>) -> Vec<LanguageShare> {
    let total: u64 = bytes.values().sum();
    let denominator = if total == 0 { 1.0 } else { total as f64 };

    let mut shares: Vec<LanguageShare> = bytes
        .iter()
        .map(|(language, &count)| LanguageShare {
            language: (*language).to_string(),
            bytes: count,
            percent: (count as f64 * 100.0 / denominator * 100.0).round() / 100.0,
        })
        .collect();
    shares.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.language.cmp(&b.language)));
    shares
}

/// Deduplicating list that keeps first-seen order.
#[derive(Default)]
struct FirstSeen {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl FirstSeen {
    fn extend<'a>(&mut self, items: impl IntoIterator<Item = &'a String>) {
        for item in items {
            if self.seen.insert(item.clone()) {
                self.order.push(item.clone());
            }
        }
    }

    fn take(mut self, n: usize) -> Vec<String> {
        self.order.truncate(n);
        self.order
    }
}
