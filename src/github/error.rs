//! GitHub API error types

use serde::Deserialize;
use thiserror::Error;

/// Error types for GitHub API operations
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Octocrab library error
    #[error("Octocrab error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Non-success response that does not map onto a more specific variant
    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Repository has no commits yet (409 "Git Repository is empty.")
    #[error("Repository is empty")]
    EmptyRepository,

    /// Search endpoints refuse to page past their result window
    #[error("Search result window exceeded: {0}")]
    ResultWindowExceeded(String),

    /// Authentication required or failed
    #[error("Authentication required")]
    AuthRequired,

    /// Response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Client setup/configuration error
    #[error("Client setup failed: {0}")]
    ClientSetup(String),
}

/// Convenience result alias for GitHub operations
pub type GitHubResult<T> = Result<T, GitHubError>;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl GitHubError {
    /// Classify a non-success HTTP response by status code and body message.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.message)
            .unwrap_or_else(|_| body.trim().to_string());
        let lower = message.to_lowercase();

        match status {
            401 => GitHubError::AuthRequired,
            404 => GitHubError::NotFound(message),
            409 if lower.contains("empty") => GitHubError::EmptyRepository,
            422 if lower.contains("1000")
                || lower.contains("beyond")
                || lower.contains("result window") =>
            {
                GitHubError::ResultWindowExceeded(message)
            }
            _ => GitHubError::Api { status, message },
        }
    }

    /// True for the recoverable "search results capped" signal.
    #[must_use]
    pub fn is_result_window(&self) -> bool {
        matches!(self, GitHubError::ResultWindowExceeded(_))
    }

    /// True when the repository simply has no history yet.
    #[must_use]
    pub fn is_empty_repository(&self) -> bool {
        matches!(self, GitHubError::EmptyRepository)
    }
}

impl From<serde_json::Error> for GitHubError {
    fn from(e: serde_json::Error) -> Self {
        GitHubError::Decode(e.to_string())
    }
}
