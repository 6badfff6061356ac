//! Text generation backends
//!
//! The pipeline only needs a prompt in and text out; [`TextGenerator`] is the
//! seam, [`Provider`] picks a concrete backend from configuration.

mod anthropic;
mod openai;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;

/// User-Agent header for provider requests
pub(crate) const USER_AGENT: &str = concat!("skilltrace/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },
}

/// Produces free text for a prompt.
///
/// A reply without text is `Ok` with an empty string; only transport and
/// status failures are errors.
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Which backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Anthropic,
}

impl ProviderKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(format!("unknown provider '{other}' (expected openai or anthropic)")),
        }
    }
}

/// A configured backend.
#[derive(Debug, Clone)]
pub enum Provider {
    OpenAi(OpenAiProvider),
    Anthropic(AnthropicProvider),
}

impl Provider {
    /// Build the backend for `kind`. `None` for `model` or `base_url` means
    /// the backend's own default.
    pub fn new(
        kind: ProviderKind,
        api_key: impl Into<String>,
        model: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, GenerationError> {
        Ok(match kind {
            ProviderKind::OpenAi => Self::OpenAi(OpenAiProvider::new(api_key, model, base_url)?),
            ProviderKind::Anthropic => {
                Self::Anthropic(AnthropicProvider::new(api_key, model, base_url)?)
            }
        })
    }

    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::OpenAi(_) => ProviderKind::OpenAi,
            Self::Anthropic(_) => ProviderKind::Anthropic,
        }
    }
}

impl TextGenerator for Provider {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        match self {
            Self::OpenAi(p) => p.generate(prompt).await,
            Self::Anthropic(p) => p.generate(prompt).await,
        }
    }
}

/// Strip a trailing slash so endpoint paths can be appended.
pub(crate) fn base_url(url: Option<String>, default: &str) -> String {
    url.unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}
