//! Run report: console rendering and JSON export

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::Path;

use crate::aggregate::{AggregateResult, LanguageShare};
use crate::error::{RunError, RunResult};
use crate::github::CallStats;
use crate::skills::Recommendation;

/// Languages shown in the console summary
const REPORT_LANGUAGES: usize = 8;

/// Aggregate figures without the raw evidence pool.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct ProfileSummary {
    pub repositories: usize,
    pub total_commits: u64,
    pub total_prs: u64,
    pub languages: Vec<LanguageShare>,
    pub dependencies: Vec<String>,
    pub file_extensions: Vec<String>,
    pub evidence_links: usize,
}

impl From<&AggregateResult> for ProfileSummary {
    fn from(aggregate: &AggregateResult) -> Self {
        Self {
            repositories: aggregate.repositories,
            total_commits: aggregate.total_commits,
            total_prs: aggregate.total_prs,
            languages: aggregate.languages.clone(),
            dependencies: aggregate.dependencies.clone(),
            file_extensions: aggregate.file_extensions.clone(),
            evidence_links: aggregate.evidence.len(),
        }
    }
}

/// Everything a run produced.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RunReport {
    pub user: String,
    pub generated_at: DateTime<Utc>,
    pub profile: ProfileSummary,
    /// Sorted by descending score
    pub recommendations: Vec<Recommendation>,
    /// Model-proposed names absent from the catalog
    pub rejected: Vec<String>,
    pub response_unparseable: bool,
    pub highlights: Vec<String>,
    /// Evidence sent to the model
    pub sample: Vec<String>,
    pub discovery_incomplete: bool,
    pub from_cache: bool,
    pub stats: CallStats,
}

/// Plain-text report for the terminal.
#[must_use]
pub fn render_report(report: &RunReport) -> String {
    let mut out = String::new();
    let profile = &report.profile;

    let _ = writeln!(
        out,
        "Skills for {}: {} repositories, {} commits, {} pull requests{}",
        report.user,
        profile.repositories,
        profile.total_commits,
        profile.total_prs,
        if report.from_cache { " (cached analysis)" } else { "" }
    );
    if report.discovery_incomplete {
        out.push_str("Note: repository discovery hit a search limit; results may be incomplete.\n");
    }

    if !profile.languages.is_empty() {
        out.push_str("\nTop languages:\n");
        for share in profile.languages.iter().take(REPORT_LANGUAGES) {
            let _ = writeln!(out, "  {:<20} {:>6.2}%", share.language, share.percent);
        }
    }

    out.push('\n');
    if report.recommendations.is_empty() {
        out.push_str("No skills recommended.\n");
    } else {
        let _ = writeln!(out, "{:>5}  {:<28} {}", "Score", "Skill", "Reason");
        for rec in &report.recommendations {
            let _ = writeln!(out, "{:>5}  {:<28} {}", rec.score, rec.name, rec.info);
        }
    }
    if report.response_unparseable {
        out.push_str("\nThe model response could not be parsed.\n");
    }

    if !report.rejected.is_empty() {
        let _ = writeln!(
            out,
            "\nIgnored {} suggestion(s) not in the catalog: {}",
            report.rejected.len(),
            report.rejected.join(", ")
        );
    }

    let stats = &report.stats;
    let _ = writeln!(
        out,
        "\nAPI calls: {} core, {} search; waited {:.1}s over {} pause(s)",
        stats.core_calls,
        stats.search_calls,
        stats.waited.as_secs_f64(),
        stats.waits
    );

    out
}

/// Write `report` as pretty JSON.
pub async fn export_report(report: &RunReport, path: &Path) -> RunResult<()> {
    let body = serde_json::to_string_pretty(report)?;
    tokio::fs::write(path, body)
        .await
        .map_err(|source| RunError::Export {
            path: path.to_path_buf(),
            source,
        })
}
