//! Anchor extraction and relevance classification for newsletter links.
//!
//! This path runs off the raw HTML body and is independent of the text
//! extraction cascade.

pub mod classify;
pub mod extract;

pub use classify::{classify, is_relevant, normalize_url};
pub use extract::{ExtractedLink, extract_links};

use url::Url;

use crate::patterns::PatternTables;

/// Extract anchors from `html` and keep the ones worth following.
pub fn enrich(html: &str, base: Option<&Url>, tables: &PatternTables) -> Vec<ExtractedLink> {
    classify(extract_links(html, base), tables)
}
