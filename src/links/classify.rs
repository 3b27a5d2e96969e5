use std::collections::HashSet;

use tracing::debug;
use url::Url;

use crate::links::ExtractedLink;
use crate::patterns::PatternTables;

const MIN_TEXT_CHARS: usize = 3;
const MIN_PHRASE_WORDS: usize = 3;
const MAX_PHRASE_WORDS: usize = 30;

/// Keep links whose anchor text looks like content, then drop every link
/// whose normalized URL was already kept. Order is preserved.
pub fn classify(links: Vec<ExtractedLink>, tables: &PatternTables) -> Vec<ExtractedLink> {
    let total = links.len();
    let mut seen: HashSet<String> = HashSet::new();

    let kept: Vec<ExtractedLink> = links
        .into_iter()
        .filter(|link| is_relevant(&link.text, tables))
        .filter(|link| seen.insert(normalize_url(&link.url)))
        .collect();

    debug!(total, kept = kept.len(), "Classified links");
    kept
}

/// Whether anchor text points at something worth reading.
pub fn is_relevant(text: &str, tables: &PatternTables) -> bool {
    let text = text.trim();
    if text.chars().count() < MIN_TEXT_CHARS {
        return false;
    }
    if tables.irrelevant_links.iter().any(|re| re.is_match(text)) {
        return false;
    }
    if tables.relevant_links.iter().any(|re| re.is_match(text)) {
        return true;
    }

    let words = text.split_whitespace().count();
    (MIN_PHRASE_WORDS..=MAX_PHRASE_WORDS).contains(&words)
        && !tables.generic_link_phrases.contains(&text.to_lowercase())
}

/// The URL without its query string and fragment. Strings that do not parse
/// as URLs are their own normalized form.
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => raw.to_string(),
    }
}
