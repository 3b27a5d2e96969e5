//! Pattern banks shared by the extraction and filtering stages.
//!
//! Tables are plain ordered collections compiled once and shared behind an
//! `Arc`. Every bank has a built-in default (see [`defaults`]) and can be
//! replaced from a JSON file whose keys mirror [`PatternSource`]; keys the
//! file omits keep their defaults.

pub mod defaults;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, LazyLock};
use thiserror::Error;
use tracing::info;

static BUILTIN: LazyLock<Arc<PatternTables>> = LazyLock::new(|| {
    Arc::new(PatternTables::compile(&PatternSource::default()).expect("built-in patterns compile"))
});

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("invalid pattern in {table}: {source}")]
    InvalidPattern {
        table: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read pattern file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed pattern file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Uncompiled pattern banks, as they appear in a pattern file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternSource {
    pub boilerplate_phrases: Vec<String>,
    pub standalone_phrases: Vec<String>,
    pub irrelevant_links: Vec<String>,
    pub relevant_links: Vec<String>,
    pub generic_link_phrases: Vec<String>,
    pub content_indicators: Vec<String>,
    pub boilerplate_indicators: Vec<String>,
    pub noise_markers: Vec<String>,
    pub positive_names: Vec<String>,
    pub negative_names: Vec<String>,
}

impl Default for PatternSource {
    fn default() -> Self {
        defaults::source()
    }
}

/// Compiled pattern banks.
///
/// Alternation tables are `None` when their source list is empty so that an
/// empty list never turns into a pattern that matches everything.
#[derive(Debug)]
pub struct PatternTables {
    pub boilerplate_phrases: Vec<Regex>,
    pub standalone_phrases: Option<Regex>,
    pub irrelevant_links: Vec<Regex>,
    pub relevant_links: Vec<Regex>,
    pub generic_link_phrases: HashSet<String>,
    pub content_indicators: Vec<String>,
    pub boilerplate_indicators: Vec<String>,
    pub noise_markers: Option<Regex>,
    pub positive_names: Option<Regex>,
    pub negative_names: Option<Regex>,
}

impl PatternTables {
    /// The built-in tables, compiled on first use.
    pub fn builtin() -> Arc<PatternTables> {
        BUILTIN.clone()
    }

    pub fn compile(source: &PatternSource) -> Result<Self, PatternError> {
        Ok(Self {
            boilerplate_phrases: compile_all("boilerplate_phrases", &source.boilerplate_phrases)?,
            standalone_phrases: phrase_alternation(
                "standalone_phrases",
                &source.standalone_phrases,
            )?,
            irrelevant_links: compile_all("irrelevant_links", &source.irrelevant_links)?,
            relevant_links: compile_all("relevant_links", &source.relevant_links)?,
            generic_link_phrases: lowercase(&source.generic_link_phrases).into_iter().collect(),
            content_indicators: lowercase(&source.content_indicators),
            boilerplate_indicators: lowercase(&source.boilerplate_indicators),
            noise_markers: token_alternation("noise_markers", &source.noise_markers)?,
            positive_names: fragment_alternation("positive_names", &source.positive_names)?,
            negative_names: fragment_alternation("negative_names", &source.negative_names)?,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, PatternError> {
        let source: PatternSource = serde_json::from_str(json)?;
        Self::compile(&source)
    }

    pub fn from_file(path: &Path) -> Result<Self, PatternError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Load tables from `path` when given, otherwise share the built-in ones.
    pub fn load(path: Option<&Path>) -> Result<Arc<Self>, PatternError> {
        match path {
            Some(path) => {
                let tables = Self::from_file(path)?;
                info!(path = %path.display(), "Loaded pattern tables from file");
                Ok(Arc::new(tables))
            }
            None => Ok(Self::builtin()),
        }
    }

    /// Number of boilerplate indicators present in already-lowercased text.
    pub fn boilerplate_hits(&self, lower: &str) -> usize {
        self.boilerplate_indicators
            .iter()
            .filter(|indicator| lower.contains(indicator.as_str()))
            .count()
    }

    /// Number of main-content indicators present in already-lowercased text.
    pub fn content_hits(&self, lower: &str) -> usize {
        self.content_indicators
            .iter()
            .filter(|indicator| lower.contains(indicator.as_str()))
            .count()
    }
}

fn compile_all(table: &'static str, patterns: &[String]) -> Result<Vec<Regex>, PatternError> {
    patterns
        .iter()
        .map(|p| Regex::new(p).map_err(|source| PatternError::InvalidPattern { table, source }))
        .collect()
}

fn lowercase(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn escaped_alternation(items: &[String]) -> Option<String> {
    let mut items = lowercase(items);
    if items.is_empty() {
        return None;
    }
    // Longer phrases first so "click here to read" wins over "click here".
    items.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    items.dedup();
    let escaped: Vec<String> = items.iter().map(|s| regex::escape(s)).collect();
    Some(escaped.join("|"))
}

fn build(table: &'static str, pattern: Option<String>) -> Result<Option<Regex>, PatternError> {
    pattern
        .map(|p| Regex::new(&p).map_err(|source| PatternError::InvalidPattern { table, source }))
        .transpose()
}

/// Whole-word, case-insensitive phrase match.
fn phrase_alternation(
    table: &'static str,
    items: &[String],
) -> Result<Option<Regex>, PatternError> {
    build(
        table,
        escaped_alternation(items).map(|alt| format!(r"(?i)\b(?:{alt})\b")),
    )
}

/// Matches a class/id token delimited by anything that is not a letter or digit.
fn token_alternation(
    table: &'static str,
    items: &[String],
) -> Result<Option<Regex>, PatternError> {
    build(
        table,
        escaped_alternation(items).map(|alt| format!(r"(?i)(?:^|[^a-z0-9])(?:{alt})(?:$|[^a-z0-9])")),
    )
}

/// Plain substring match anywhere in a class/id attribute.
fn fragment_alternation(
    table: &'static str,
    items: &[String],
) -> Result<Option<Regex>, PatternError> {
    build(
        table,
        escaped_alternation(items).map(|alt| format!("(?i)(?:{alt})")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_compile() {
        let tables = PatternTables::compile(&PatternSource::default()).unwrap();
        assert_eq!(
            tables.boilerplate_phrases.len(),
            defaults::BOILERPLATE_PHRASES.len()
        );
        assert_eq!(tables.relevant_links.len(), defaults::RELEVANT_LINKS.len());
        assert!(tables.standalone_phrases.is_some());
        assert!(tables.noise_markers.is_some());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let tables =
            PatternTables::from_json_str(r#"{"standalone_phrases": ["totally custom"]}"#).unwrap();

        let standalone = tables.standalone_phrases.unwrap();
        assert!(standalone.is_match("a Totally Custom phrase"));
        assert!(!standalone.is_match("click here"));
        assert_eq!(
            tables.irrelevant_links.len(),
            defaults::IRRELEVANT_LINKS.len()
        );
    }

    #[test]
    fn test_invalid_regex_names_table() {
        let err = PatternTables::from_json_str(r#"{"relevant_links": ["(unclosed"]}"#).unwrap_err();
        match err {
            PatternError::InvalidPattern { table, .. } => assert_eq!(table, "relevant_links"),
            other => panic!("Expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_list_matches_nothing() {
        let tables = PatternTables::from_json_str(r#"{"noise_markers": []}"#).unwrap();
        assert!(tables.noise_markers.is_none());
    }

    #[test]
    fn test_noise_markers_are_token_bounded() {
        let tables = PatternTables::builtin();
        let markers = tables.noise_markers.as_ref().unwrap();
        assert!(markers.is_match("email_footer"));
        assert!(markers.is_match("social-links"));
        assert!(markers.is_match("nav"));
        assert!(!markers.is_match("canvas"));
        assert!(!markers.is_match("headerless-story"));
    }

    #[test]
    fn test_indicator_counts() {
        let tables = PatternTables::builtin();
        assert_eq!(tables.content_hits("according to the report, key insights"), 3);
        assert_eq!(tables.boilerplate_hits("unsubscribe | privacy policy"), 2);
    }
}
