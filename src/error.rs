//! Errors that end a run

use thiserror::Error;

use crate::config::ConfigError;
use crate::generation::GenerationError;
use crate::github::GitHubError;
use crate::skills::CatalogError;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),

    #[error("Skill catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Skill catalog is empty")]
    EmptyCatalog,

    #[error("Failed to write report to {path}: {source}")]
    Export {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type RunResult<T> = Result<T, RunError>;
