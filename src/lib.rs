//! `skilltrace` - skill inference from GitHub activity
//!
//! Discovers the repositories a developer has touched, analyzes their
//! languages, dependencies and authored work, and asks a language model to
//! score skills from a fixed catalog. Model output is repaired and checked
//! against that catalog, so no recommendation names a skill the catalog
//! does not contain.

// Module declarations
pub mod aggregate;
pub mod analysis;
pub mod cache;
pub mod config;
pub mod discovery;
pub mod error;
pub mod evidence;
pub mod generation;
pub mod github;
pub mod pipeline;
pub mod prompt;
pub mod report;
pub mod skills;

// Re-export GitHub client types
pub use github::{GitHubClient, GitHubClientBuilder, GitHubSource};

// Re-export GitHub error types
pub use github::{GitHubError, GitHubResult};

// Re-export crawl building blocks
pub use github::{
    CallStats, CommitRef, Fetched, PagedFetcher, PagedOutcome, RateLimiter, RateState,
    RateSurface, RepoId, RunContext, StopReason, repository_from_api_url,
};

pub use aggregate::{AggregateResult, Aggregator, LanguageShare};
pub use analysis::{RepoAnalysis, RepoAnalyzer};
pub use cache::{AnalysisCache, CacheError, CachedRun, JsonFileCache};
pub use config::{Cli, ConfigError, RunConfig};
pub use discovery::{DiscoveryOutcome, RepoDiscoverer, RepoSet};
pub use error::{RunError, RunResult};
pub use evidence::{EvidenceLink, EvidenceSampler, LinkKind};
pub use generation::{GenerationError, Provider, ProviderKind, TextGenerator};
pub use pipeline::SkillRun;
pub use prompt::build_prompt;
pub use report::{RunReport, export_report, render_report};
pub use skills::{
    CatalogError, Recommendation, RecoveryError, RecoveryOutcome, ResponseRecoveryParser, Skill,
    SkillCatalogClient,
};
