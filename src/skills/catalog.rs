//! Skill catalog client
//!
//! The catalog pages with `?page=N` and names the following page in the
//! `X-Next-Page` response header; the last page omits it.

use log::{debug, info, warn};
use std::collections::HashSet;
use reqwest::Client;
use thiserror::Error;

use super::Skill;

/// Header carrying the next page number
pub const NEXT_PAGE_HEADER: &str = "x-next-page";

/// User-Agent header for catalog requests
const USER_AGENT: &str = concat!("skilltrace/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog returned {status} for page {page}")]
    Status { status: u16, page: String },

    #[error("Catalog page {page} could not be decoded: {message}")]
    Decode { page: String, message: String },
}

/// Paged reader over the skill catalog listing.
#[derive(Debug, Clone)]
pub struct SkillCatalogClient {
    client: Client,
    url: String,
    token: Option<String>,
}

impl SkillCatalogClient {
    pub fn new(url: impl Into<String>, token: Option<String>) -> Result<Self, CatalogError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            url: url.into(),
            token,
        })
    }

    /// Every catalog entry across all pages.
    pub async fn fetch_all(&self) -> Result<Vec<Skill>, CatalogError> {
        let mut skills = Vec::new();
        let mut visited = HashSet::new();
        let mut page = Some("1".to_string());

        while let Some(current) = page {
            let (batch, next) = self.fetch_page(&current).await?;
            debug!("Catalog page {current}: {} skills", batch.len());
            skills.extend(batch);
            visited.insert(current);

            page = match next {
                Some(n) if visited.contains(&n) => {
                    warn!("Catalog points back to page {n}, stopping");
                    None
                }
                other => other,
            };
        }

        info!("Loaded {} catalog skills", skills.len());
        Ok(skills)
    }

    async fn fetch_page(&self, page: &str) -> Result<(Vec<Skill>, Option<String>), CatalogError> {
        let mut request = self.client.get(&self.url).query(&[("page", page)]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                page: page.to_string(),
            });
        }

        let next = response
            .headers()
            .get(NEXT_PAGE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let body = response.text().await?;
        let skills =
            serde_json::from_str::<Vec<Skill>>(&body).map_err(|e| CatalogError::Decode {
                page: page.to_string(),
                message: e.to_string(),
            })?;

        Ok((skills, next))
    }
}
