use serde::{Deserialize, Serialize};

/// Plain text of an email body plus the absolute links found in it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedContent {
    pub text: String,
    /// Unique http(s) links in document order.
    pub links: Vec<String>,
}

impl CleanedContent {
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Collapse every run of whitespace to a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
