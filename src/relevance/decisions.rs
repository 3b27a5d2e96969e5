//! Defensive reading of the oracle's decision list.
//!
//! The response is untyped text from an external model. Code fences, prose
//! around the JSON, numeric ids and string booleans are tolerated; entries
//! that still make no sense are skipped.

use std::collections::HashMap;

use serde_json::{Map, Value};
use thiserror::Error;

const DECISIONS_KEY: &str = "decisions";
const MAX_REASON_WORDS: usize = 19;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub id: String,
    pub include: bool,
    pub reason: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecisionError {
    #[error("response is not JSON: {0}")]
    NotJson(String),

    #[error("response has no decision list")]
    MissingList,

    #[error("decision list has no usable entries")]
    NoValidEntries,
}

/// Decisions keyed by email id. A later entry for the same id replaces an
/// earlier one.
pub fn parse_decisions(response: &str) -> Result<HashMap<String, Decision>, DecisionError> {
    let value = parse_json(response)?;
    let entries = decision_list(&value).ok_or(DecisionError::MissingList)?;

    let decisions: HashMap<String, Decision> = entries
        .iter()
        .filter_map(Value::as_object)
        .filter_map(parse_entry)
        .map(|d| (d.id.clone(), d))
        .collect();

    if decisions.is_empty() {
        return Err(DecisionError::NoValidEntries);
    }
    Ok(decisions)
}

fn parse_json(response: &str) -> Result<Value, DecisionError> {
    let trimmed = response.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    // Fenced or wrapped in prose: try the outermost object, then array.
    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(start), Some(end)) = (trimmed.find(open), trimmed.rfind(close))
            && start < end
            && let Ok(value) = serde_json::from_str(&trimmed[start..=end])
        {
            return Ok(value);
        }
    }

    let err = serde_json::from_str::<Value>(trimmed)
        .err()
        .map(|e| e.to_string())
        .unwrap_or_default();
    Err(DecisionError::NotJson(err))
}

fn decision_list(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => map
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(DECISIONS_KEY))
            .and_then(|(_, v)| v.as_array())
            .or_else(|| map.values().find_map(Value::as_array)),
        _ => None,
    }
}

fn parse_entry(entry: &Map<String, Value>) -> Option<Decision> {
    let id = match entry.get("id")? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if id.is_empty() {
        return None;
    }

    let include = match entry.get("include")? {
        Value::Bool(b) => *b,
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "include" => true,
            "false" | "no" | "exclude" => false,
            _ => return None,
        },
        Value::Number(n) => n.as_f64()? != 0.0,
        _ => return None,
    };

    let reason = entry
        .get("reason")
        .and_then(Value::as_str)
        .map(|r| {
            r.split_whitespace()
                .take(MAX_REASON_WORDS)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    Some(Decision { id, include, reason })
}
