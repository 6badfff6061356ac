//! Recovery of structured recommendations from free-form model output
//!
//! Models are asked for a JSON array but may wrap it in prose or code fences,
//! leave trailing commas, or stop mid-entry. [`repair`] applies a fixed
//! sequence of textual fixes; [`ResponseRecoveryParser`] then validates each
//! entry and keeps only names present in the skill catalog.

use lazy_static::lazy_static;
use log::{debug, error, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use super::{Recommendation, Skill};

const NAME_KEYS: [&str; 4] = ["name", "skill", "skill_name", "tag"];
const REASON_KEYS: [&str; 3] = ["reason", "info", "justification"];

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("Response is not valid JSON after repair: {0}")]
    Unparseable(String),

    #[error("Response parsed but is not an array")]
    NotAnArray,
}

/// Drop a leading ```` ```lang ```` marker and a trailing ```` ``` ````.
#[must_use]
pub fn strip_code_fence(text: &str) -> String {
    lazy_static! {
        static ref OPEN_FENCE_RE: Result<Regex, regex::Error> = Regex::new(r"^\s*```[\w-]*");
        static ref CLOSE_FENCE_RE: Result<Regex, regex::Error> = Regex::new(r"```\s*$");
    }

    let mut out = text.trim().to_string();
    if let Ok(re) = OPEN_FENCE_RE.as_ref() {
        out = re.replace(&out, "").into_owned();
    }
    if let Ok(re) = CLOSE_FENCE_RE.as_ref() {
        out = re.replace(&out, "").into_owned();
    }
    out.trim().to_string()
}

/// Keep only the span from the first `[` to the last `]`.
///
/// With an opening bracket but no closing one after it, text before the
/// opening bracket is still dropped.
#[must_use]
pub fn isolate_array(text: &str) -> String {
    match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if start < end => text[start..=end].to_string(),
        (Some(start), _) => text[start..].to_string(),
        _ => text.to_string(),
    }
}

/// Remove commas that directly precede `]` or `}`.
#[must_use]
pub fn remove_trailing_commas(text: &str) -> String {
    lazy_static! {
        static ref TRAILING_COMMA_RE: Result<Regex, regex::Error> = Regex::new(r",\s*([\]}])");
    }

    match TRAILING_COMMA_RE.as_ref() {
        Ok(re) => re.replace_all(text, "$1").into_owned(),
        Err(_) => text.to_string(),
    }
}

/// Close an array cut off mid-stream after its last complete entry.
#[must_use]
pub fn close_truncated_array(text: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.ends_with(']') {
        return trimmed.to_string();
    }
    match trimmed.rfind('}') {
        Some(end) => format!("{}]", &trimmed[..=end]),
        None => format!("{trimmed}]"),
    }
}

/// Drop anything after the final `]`.
#[must_use]
pub fn trim_after_array(text: &str) -> String {
    match text.rfind(']') {
        Some(end) => text[..=end].to_string(),
        None => text.to_string(),
    }
}

/// Apply every repair step in order. Never fails.
#[must_use]
pub fn repair(raw: &str) -> String {
    let text = strip_code_fence(raw);
    let text = isolate_array(&text);
    let text = remove_trailing_commas(&text);
    let text = close_truncated_array(&text);
    trim_after_array(&text)
}

/// Repair `raw` and parse it as a JSON array.
pub fn parse_entries(raw: &str) -> Result<Vec<Value>, RecoveryError> {
    let repaired = repair(raw);
    match serde_json::from_str::<Value>(&repaired) {
        Ok(Value::Array(entries)) => Ok(entries),
        Ok(_) => Err(RecoveryError::NotAnArray),
        Err(e) => Err(RecoveryError::Unparseable(e.to_string())),
    }
}

/// An entry that carries all required fields, before catalog resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateEntry {
    pub name: String,
    pub score: f64,
    pub reason: String,
}

impl CandidateEntry {
    /// `None` unless the entry has a string name, numeric score and string reason.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            name: first_string(object, &NAME_KEYS)?.trim().to_string(),
            score: object.get("score")?.as_f64()?,
            reason: first_string(object, &REASON_KEYS)?.to_string(),
        })
    }
}

fn first_string<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| object.get(*key).and_then(Value::as_str))
}

/// Clamp into `0..=100` and round to the nearest integer.
#[must_use]
pub fn clamp_score(score: f64) -> u8 {
    score.clamp(0.0, 100.0).round() as u8
}

/// What came out of one model response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryOutcome {
    /// Sorted by descending score
    pub recommendations: Vec<Recommendation>,
    /// Names absent from the catalog
    pub rejected: Vec<String>,
    /// Entries missing a required field
    pub discarded: usize,
    /// Catalog matches under the score floor
    pub below_floor: usize,
    pub parse_failed: bool,
}

/// Validates model output against the skill catalog.
#[derive(Debug, Clone, Copy)]
pub struct ResponseRecoveryParser {
    min_score: u8,
}

impl Default for ResponseRecoveryParser {
    fn default() -> Self {
        Self { min_score: 40 }
    }
}

impl ResponseRecoveryParser {
    #[must_use]
    pub fn new(min_score: u8) -> Self {
        Self { min_score }
    }

    /// Turn `raw` into catalog-backed recommendations. An unrecoverable
    /// response yields an empty outcome with `parse_failed` set.
    #[must_use]
    pub fn recover(&self, raw: &str, catalog: &[Skill]) -> RecoveryOutcome {
        let entries = match parse_entries(raw) {
            Ok(entries) => entries,
            Err(e) => {
                error!("Could not recover recommendations from model output: {e}");
                return RecoveryOutcome {
                    parse_failed: true,
                    ..RecoveryOutcome::default()
                };
            }
        };

        let by_name: HashMap<String, &Skill> = catalog
            .iter()
            .map(|skill| (skill.name.to_lowercase(), skill))
            .collect();

        let mut outcome = RecoveryOutcome::default();
        let mut seen_ids = HashSet::new();

        for value in &entries {
            let Some(entry) = CandidateEntry::from_value(value) else {
                debug!("Discarding malformed entry: {value}");
                outcome.discarded += 1;
                continue;
            };

            let Some(skill) = by_name.get(&entry.name.to_lowercase()) else {
                warn!("Rejected skill not in catalog: {}", entry.name);
                outcome.rejected.push(entry.name);
                continue;
            };

            let score = clamp_score(entry.score);
            if score < self.min_score {
                outcome.below_floor += 1;
                continue;
            }
            if !seen_ids.insert(skill.id.clone()) {
                debug!("Duplicate recommendation for {}", skill.name);
                continue;
            }

            outcome.recommendations.push(Recommendation {
                id: skill.id.clone(),
                name: skill.name.clone(),
                score,
                info: entry.reason,
            });
        }

        outcome
            .recommendations
            .sort_by(|a, b| b.score.cmp(&a.score));
        outcome
    }
}
