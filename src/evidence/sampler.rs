//! Bounded, diverse selection of evidence links for the prompt

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{HashMap, HashSet};

use super::{EvidenceLink, LinkKind};

/// Sampling limits for both selection policies.
#[derive(Debug, Clone, Copy)]
pub struct EvidenceSampler {
    pub per_category: usize,
    pub category_max: usize,
    pub sample_size: usize,
}

impl Default for EvidenceSampler {
    fn default() -> Self {
        Self {
            per_category: 10,
            category_max: 20,
            sample_size: 12,
        }
    }
}

impl EvidenceSampler {
    /// Category-balanced sample stored alongside a cached analysis.
    pub fn highlights<R: Rng + ?Sized>(&self, evidence: &[String], rng: &mut R) -> Vec<String> {
        sample_by_category(evidence, self.per_category, self.category_max, rng)
    }

    /// Repository-balanced sample drawn fresh for each prompt.
    pub fn fresh<R: Rng + ?Sized>(&self, evidence: &[String], rng: &mut R) -> Vec<String> {
        sample_by_repository(evidence, self.sample_size, rng)
    }
}

/// Up to `per_category` links from each of PRs, commits, and everything else
/// (in that priority), shuffled, then cut to `max`.
pub fn sample_by_category<R: Rng + ?Sized>(
    evidence: &[String],
    per_category: usize,
    max: usize,
    rng: &mut R,
) -> Vec<String> {
    let links = distinct_links(evidence);

    let mut selected: Vec<String> = [LinkKind::PullRequest, LinkKind::Commit, LinkKind::Other]
        .iter()
        .flat_map(|kind| {
            links
                .iter()
                .filter(move |link| link.kind == *kind)
                .take(per_category)
                .map(|link| link.url.clone())
        })
        .collect();

    selected.shuffle(rng);
    selected.truncate(max);
    selected
}

/// At most `max` links spread across repositories.
///
/// A pool no larger than `max` comes back unchanged. Otherwise one PR per
/// repository is taken, then one commit per repository, then random fill from
/// what is left, and the result is shuffled.
pub fn sample_by_repository<R: Rng + ?Sized>(
    evidence: &[String],
    max: usize,
    rng: &mut R,
) -> Vec<String> {
    if evidence.len() <= max {
        return evidence.to_vec();
    }

    let links = distinct_links(evidence);

    // Group indices by repository, groups in first-seen order
    let mut group_of: HashMap<Option<&str>, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (i, link) in links.iter().enumerate() {
        let key = link.repository.as_ref().map(|r| r.as_str());
        let g = *group_of.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[g].push(i);
    }

    let mut taken: HashSet<usize> = HashSet::new();
    let mut selected: Vec<usize> = Vec::with_capacity(max);

    for kind in [LinkKind::PullRequest, LinkKind::Commit] {
        for group in &groups {
            if selected.len() >= max {
                break;
            }
            let candidates: Vec<usize> = group
                .iter()
                .copied()
                .filter(|i| links[*i].kind == kind && !taken.contains(i))
                .collect();
            if let Some(&pick) = candidates.choose(rng) {
                taken.insert(pick);
                selected.push(pick);
            }
        }
    }

    if selected.len() < max {
        let mut rest: Vec<usize> = (0..links.len()).filter(|i| !taken.contains(i)).collect();
        rest.shuffle(rng);
        selected.extend(rest.into_iter().take(max - selected.len()));
    }

    selected.shuffle(rng);
    selected.into_iter().map(|i| links[i].url.clone()).collect()
}

/// Parsed links with duplicate URLs removed, first occurrence kept.
fn distinct_links(evidence: &[String]) -> Vec<EvidenceLink> {
    let mut seen = HashSet::new();
    evidence
        .iter()
        .filter(|url| seen.insert(url.as_str()))
        .map(|url| EvidenceLink::parse(url))
        .collect()
}
