//! Persisted per-user analysis with TTL expiry

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::analysis::RepoAnalysis;
use crate::github::RepoId;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cache entry could not be (de)serialized: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Everything that is expensive to rebuild for one user.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CachedRun {
    pub user: String,
    pub cached_at: DateTime<Utc>,
    pub analyses: BTreeMap<RepoId, RepoAnalysis>,
    pub discovery_incomplete: bool,
    /// Category-balanced evidence sample
    pub evidence_highlights: Vec<String>,
}

impl CachedRun {
    #[must_use]
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.cached_at > chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX)
    }
}

/// Storage for [`CachedRun`]s keyed by user.
#[allow(async_fn_in_trait)]
pub trait AnalysisCache {
    /// `Ok(None)` on a miss, including an expired entry.
    async fn load(&self, user: &str) -> Result<Option<CachedRun>, CacheError>;

    async fn store(&self, run: &CachedRun) -> Result<(), CacheError>;
}

/// One JSON file per user under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileCache {
    dir: PathBuf,
    ttl: Duration,
}

impl JsonFileCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `{dir}/{user}.json`, with path separators in `user` replaced.
    #[must_use]
    pub fn entry_path(&self, user: &str) -> PathBuf {
        let file: String = user
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

impl AnalysisCache for JsonFileCache {
    async fn load(&self, user: &str) -> Result<Option<CachedRun>, CacheError> {
        let path = self.entry_path(user);
        let body = match tokio::fs::read_to_string(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No cached analysis for {user}");
                return Ok(None);
            }
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        let run: CachedRun = serde_json::from_str(&body)?;
        if run.is_expired(self.ttl, Utc::now()) {
            info!("Cached analysis for {user} from {} has expired", run.cached_at);
            return Ok(None);
        }

        info!(
            "Using cached analysis for {user} from {} ({} repositories)",
            run.cached_at,
            run.analyses.len()
        );
        Ok(Some(run))
    }

    async fn store(&self, run: &CachedRun) -> Result<(), CacheError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| CacheError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.entry_path(&run.user);
        let body = serde_json::to_string_pretty(run)?;
        tokio::fs::write(&path, body)
            .await
            .map_err(|source| CacheError::Io {
                path: path.clone(),
                source,
            })?;

        debug!("Wrote {}", path.display());
        info!("Stored analysis for {}", run.user);
        Ok(())
    }
}
