pub mod candidates;
pub mod encoding;
pub mod fallback;
pub mod model;
pub mod noise;
pub mod reader;
pub mod text;

#[cfg(test)]
mod tests;

pub use model::CleanedContent;

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::extractor::model::normalize_whitespace;
use crate::patterns::PatternTables;

/// Links returned alongside the text, in document order.
pub const MAX_LINKS: usize = 10;
/// Bodies above this size are never turned into a DOM.
pub const MAX_DOM_BYTES: usize = 2 * 1024 * 1024;
/// Reader and candidate results shorter than this fall through to the next
/// strategy.
pub const MIN_USABLE_CHARS: usize = 100;

static ANCHORS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// An email body after the DOM-level cleanup shared by every strategy.
pub struct ParsedEmail<'a> {
    pub raw: &'a str,
    /// Sanitized document with noise removed. `None` for oversized input.
    pub cleaned: Option<Html>,
    pub links: Vec<String>,
}

impl<'a> ParsedEmail<'a> {
    pub fn parse(html: &'a str, tables: &PatternTables) -> Self {
        if html.len() > MAX_DOM_BYTES {
            debug!(bytes = html.len(), "Body too large for DOM parsing");
            return Self {
                raw: html,
                cleaned: None,
                links: fallback::raw_links(html, MAX_LINKS),
            };
        }

        let links = document_links(&Html::parse_document(html));
        let mut cleaned = Html::parse_document(&noise::sanitize(html));
        noise::remove_noise(&mut cleaned, tables);

        Self {
            raw: html,
            cleaned: Some(cleaned),
            links,
        }
    }

    fn body(&self) -> Option<ElementRef<'_>> {
        let root = self.cleaned.as_ref()?.root_element();
        root.children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "body")
            .or(Some(root))
    }
}

/// One way of turning a parsed email into text, tried in [`Strategy::CASCADE`]
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Reader,
    Candidates,
    Aggressive,
    TagStrip,
}

impl Strategy {
    pub const CASCADE: [Strategy; 4] = [
        Strategy::Reader,
        Strategy::Candidates,
        Strategy::Aggressive,
        Strategy::TagStrip,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Reader => "reader",
            Strategy::Candidates => "candidates",
            Strategy::Aggressive => "aggressive",
            Strategy::TagStrip => "tag_strip",
        }
    }

    /// Characters of normalized text the result needs to be accepted.
    pub fn min_chars(&self) -> usize {
        match self {
            Strategy::Reader | Strategy::Candidates => MIN_USABLE_CHARS,
            Strategy::Aggressive | Strategy::TagStrip => 1,
        }
    }

    pub fn run(&self, email: &ParsedEmail<'_>, tables: &PatternTables) -> Option<CleanedContent> {
        let text = match self {
            Strategy::Reader => reader::extract(email.body()?, tables),
            Strategy::Candidates => candidates::extract(email.body()?, tables),
            Strategy::Aggressive => fallback::aggressive(email.body()?, tables),
            Strategy::TagStrip => fallback::strip_tags(email.raw, tables),
        }?;

        let text = finish(&text);
        if text.is_empty() {
            return None;
        }
        Some(CleanedContent {
            text,
            links: email.links.clone(),
        })
    }
}

/// Turn an HTML email body into plain text plus its links.
///
/// Never fails: the strategies in [`Strategy::CASCADE`] are tried in order
/// and the first one reaching its minimum length wins. When none does, the
/// longest partial result is returned, and empty input yields empty content.
pub fn extract(html: &str, tables: &PatternTables) -> CleanedContent {
    if html.trim().is_empty() {
        return CleanedContent::default();
    }

    let html = encoding::repair(html);
    let email = ParsedEmail::parse(&html, tables);
    let mut best: Option<CleanedContent> = None;

    for strategy in Strategy::CASCADE {
        let Some(content) = strategy.run(&email, tables) else {
            continue;
        };
        let chars = content.text.chars().count();
        if chars >= strategy.min_chars() {
            debug!(strategy = strategy.name(), chars, "Extraction strategy accepted");
            return content;
        }
        if best.as_ref().is_none_or(|b| b.text.chars().count() < chars) {
            best = Some(content);
        }
    }

    best.unwrap_or_else(|| CleanedContent {
        text: String::new(),
        links: email.links,
    })
}

/// Extraction without a DOM, for input whose DOM pass could not complete.
pub fn extract_without_dom(html: &str, tables: &PatternTables) -> CleanedContent {
    CleanedContent {
        text: fallback::strip_tags(&encoding::repair(html), tables)
            .map(|text| finish(&text))
            .unwrap_or_default(),
        links: fallback::raw_links(html, MAX_LINKS),
    }
}

/// Mojibake is repaired before any whitespace is collapsed, since some of the
/// broken sequences end in a no-break space.
fn finish(text: &str) -> String {
    normalize_whitespace(&encoding::repair(text))
}

fn document_links(document: &Html) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for anchor in document.select(&ANCHORS) {
        if links.len() >= MAX_LINKS {
            break;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        let is_http = Url::parse(href).is_ok_and(|url| matches!(url.scheme(), "http" | "https"));
        if is_http && !links.iter().any(|link| link == href) {
            links.push(href.to_string());
        }
    }
    links
}
