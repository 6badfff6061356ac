//! Run configuration and its command-line mapping

use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::generation::ProviderKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("Could not determine a cache directory; pass --cache-dir")]
    NoCacheDir,
}

/// Settings for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub github_token: String,
    pub github_api_url: Option<String>,
    /// Resolved from the token when unset
    pub user: Option<String>,
    pub max_repos: usize,
    pub page_size: u32,
    /// Highest result offset the search surface will serve
    pub search_hard_cap: u32,
    pub core_low_water_mark: u32,
    pub search_low_water_mark: u32,
    pub rate_safety_margin: Duration,
    pub top_dependencies: usize,
    pub top_extensions: usize,
    pub per_category_limit: usize,
    pub category_sample_size: usize,
    pub evidence_sample_size: usize,
    pub min_score: u8,
    pub catalog_url: String,
    pub catalog_token: Option<String>,
    pub provider: ProviderKind,
    pub model: Option<String>,
    pub provider_api_key: String,
    pub provider_base_url: Option<String>,
    pub cache_dir: PathBuf,
    pub cache_ttl: Duration,
    /// Ignore any cached analysis
    pub refresh: bool,
    pub export: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            github_token: String::new(),
            github_api_url: None,
            user: None,
            max_repos: 30,
            page_size: 100,  // GitHub API max
            search_hard_cap: 1000,
            core_low_water_mark: 100,
            search_low_water_mark: 5,
            rate_safety_margin: Duration::from_secs(2),
            top_dependencies: 50,
            top_extensions: 30,
            per_category_limit: 10,
            category_sample_size: 20,
            evidence_sample_size: 12,
            min_score: 40,
            catalog_url: String::new(),
            catalog_token: None,
            provider: ProviderKind::OpenAi,
            model: None,
            provider_api_key: String::new(),
            provider_base_url: None,
            cache_dir: default_cache_dir().unwrap_or_else(|| PathBuf::from(".skilltrace-cache")),
            cache_ttl: Duration::from_secs(24 * 3600),
            refresh: false,
            export: None,
        }
    }
}

impl RunConfig {
    /// Reject settings no run could succeed with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.github_token.trim().is_empty() {
            return Err(ConfigError::Missing("github token"));
        }
        if self.catalog_url.trim().is_empty() {
            return Err(ConfigError::Missing("catalog url"));
        }
        if self.provider_api_key.trim().is_empty() {
            return Err(ConfigError::Missing("provider api key"));
        }
        if self.page_size == 0 {
            return Err(invalid("page_size", "must be at least 1"));
        }
        if self.evidence_sample_size == 0 {
            return Err(invalid("evidence_sample_size", "must be at least 1"));
        }
        if self.min_score > 100 {
            return Err(invalid(
                "min_score",
                format!("{} is above the 100 maximum", self.min_score),
            ));
        }
        if self.max_repos == 0 {
            return Err(invalid("max_repos", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.into(),
    }
}

/// Platform cache directory for this tool
#[must_use]
pub fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("dev", "skilltrace", "skilltrace").map(|dirs| dirs.cache_dir().to_path_buf())
}

#[derive(Parser, Debug)]
#[command(name = "skilltrace")]
#[command(about = "Infer a developer's skills from their GitHub activity")]
#[command(after_help = "\x1b[36mExamples:\x1b[0m
  skilltrace --catalog-url https://skills.example.com/api/skills
  skilltrace --user octocat --provider anthropic --export run.json")]
pub struct Cli {
    /// GitHub token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub API base URL (for GitHub Enterprise)
    #[arg(long, env = "GITHUB_API_URL")]
    pub github_api_url: Option<String>,

    /// User to analyze (default: the token's owner)
    #[arg(short, long, env = "SKILLTRACE_USER")]
    pub user: Option<String>,

    /// Maximum repositories to analyze
    #[arg(long, env = "SKILLTRACE_MAX_REPOS", default_value = "30")]
    pub max_repos: usize,

    /// Evidence links included in the prompt
    #[arg(long, env = "SKILLTRACE_SAMPLE_SIZE", default_value = "12")]
    pub sample_size: usize,

    /// Drop recommendations scored below this
    #[arg(long, env = "SKILLTRACE_MIN_SCORE", default_value = "40")]
    pub min_score: u8,

    /// Skill catalog listing URL
    #[arg(long, env = "SKILLTRACE_CATALOG_URL")]
    pub catalog_url: Option<String>,

    /// Bearer token for the skill catalog
    #[arg(long, env = "SKILLTRACE_CATALOG_TOKEN", hide_env_values = true)]
    pub catalog_token: Option<String>,

    /// Text generation provider (openai or anthropic)
    #[arg(long, env = "SKILLTRACE_PROVIDER", default_value = "openai")]
    pub provider: ProviderKind,

    /// Model name (default: provider's default)
    #[arg(long, env = "SKILLTRACE_MODEL")]
    pub model: Option<String>,

    /// Provider API key
    #[arg(long, env = "SKILLTRACE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Provider base URL
    #[arg(long, env = "SKILLTRACE_PROVIDER_URL")]
    pub provider_url: Option<String>,

    /// Directory for cached analyses
    #[arg(long, env = "SKILLTRACE_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Hours before a cached analysis expires
    #[arg(long, default_value = "24")]
    pub cache_ttl_hours: u64,

    /// Re-analyze even when a cached analysis exists
    #[arg(long)]
    pub refresh: bool,

    /// Write the run report as JSON to this path
    #[arg(long)]
    pub export: Option<PathBuf>,
}

impl Cli {
    /// Build and validate a [`RunConfig`], defaults filling what the CLI leaves out.
    pub fn into_config(self) -> Result<RunConfig, ConfigError> {
        let cache_dir = match self.cache_dir {
            Some(dir) => dir,
            None => default_cache_dir().ok_or(ConfigError::NoCacheDir)?,
        };

        let config = RunConfig {
            github_token: self.token.ok_or(ConfigError::Missing("github token"))?,
            github_api_url: self.github_api_url,
            user: self.user.filter(|u| !u.trim().is_empty()),
            max_repos: self.max_repos,
            evidence_sample_size: self.sample_size,
            min_score: self.min_score,
            catalog_url: self.catalog_url.ok_or(ConfigError::Missing("catalog url"))?,
            catalog_token: self.catalog_token,
            provider: self.provider,
            model: self.model,
            provider_api_key: self.api_key.ok_or(ConfigError::Missing("provider api key"))?,
            provider_base_url: self.provider_url,
            cache_dir,
            cache_ttl: Duration::from_secs(self.cache_ttl_hours.saturating_mul(3600)),
            refresh: self.refresh,
            export: self.export,
            ..RunConfig::default()
        };

        config.validate()?;
        Ok(config)
    }
}
