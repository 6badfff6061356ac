//! Skill catalog entries and validated recommendations

pub mod catalog;
pub mod recovery;

use serde::{Deserialize, Deserializer, Serialize};

pub use catalog::{CatalogError, SkillCatalogClient};
pub use recovery::{RecoveryError, RecoveryOutcome, ResponseRecoveryParser};

/// Authoritative catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Skill {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

impl Skill {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A catalog skill the model scored for this user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Copied from the catalog
    pub id: String,
    /// Catalog spelling of the name
    pub name: String,
    /// 0..=100
    pub score: u8,
    pub info: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}
