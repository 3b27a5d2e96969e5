//! Last-resort extraction paths.
//!
//! [`aggressive`] works on an already cleaned DOM; [`strip_tags`] and
//! [`raw_links`] work on the raw string and are used when no DOM could be
//! built at all.

use std::sync::LazyLock;

use linkify::{LinkFinder, LinkKind};
use regex::{Captures, Regex};
use scraper::ElementRef;

use crate::extractor::model::normalize_whitespace;
use crate::extractor::text::block_text;
use crate::patterns::PatternTables;

const MIN_FRAGMENT_CHARS: usize = 20;
const MAX_FRAGMENTS: usize = 10;

static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t\r\f\v]*\n").unwrap());

static INVISIBLE_BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|head|title|noscript|template)\b[^>]*>.*?</(?:script|style|head|title|noscript|template)\s*>|<!--.*?-->")
        .unwrap()
});

static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(?:p|div|br|tr|td|th|table|li|ul|ol|h[1-6]|section|article|header|footer|blockquote|pre|center|hr)\b[^>]*>")
        .unwrap()
});

static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(?:#(\d+)|#[xX]([0-9a-fA-F]+)|([a-zA-Z]+));").unwrap());

static HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)href\s*=\s*["']([^"']+)["']"#).unwrap());

/// Split the text under `body` on blank lines and keep the first fragments
/// that are long enough and free of boilerplate indicators.
pub fn aggressive(body: ElementRef<'_>, tables: &PatternTables) -> Option<String> {
    fragments(&block_text(body), tables)
}

/// Regex-only tag stripping for input that never made it into a DOM.
pub fn strip_tags(html: &str, tables: &PatternTables) -> Option<String> {
    let text = INVISIBLE_BLOCKS.replace_all(html, " ");
    let text = BLOCK_TAG.replace_all(&text, "\n\n");
    let text = ANY_TAG.replace_all(&text, " ");
    let text = decode_entities(&text);
    fragments(&text, tables)
}

/// Absolute http(s) links found in a raw string, from `href` attributes first
/// and bare URLs second, unique and in order of appearance.
pub fn raw_links(html: &str, limit: usize) -> Vec<String> {
    let from_attrs = HREF
        .captures_iter(html)
        .map(|caps| decode_entities(caps[1].trim()));

    let visible = ANY_TAG.replace_all(html, " ");
    let finder = LinkFinder::new();
    let bare = finder
        .links(&visible)
        .filter(|link| *link.kind() == LinkKind::Url)
        .map(|link| decode_entities(link.as_str()));

    let mut links: Vec<String> = Vec::new();
    for link in from_attrs.chain(bare) {
        if links.len() >= limit {
            break;
        }
        if is_http(&link) && !links.contains(&link) {
            links.push(link);
        }
    }
    links
}

fn is_http(link: &str) -> bool {
    url::Url::parse(link).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

fn fragments(text: &str, tables: &PatternTables) -> Option<String> {
    let kept: Vec<String> = BLANK_LINE
        .split(text)
        .map(normalize_whitespace)
        .filter(|fragment| fragment.chars().count() >= MIN_FRAGMENT_CHARS)
        .filter(|fragment| tables.boilerplate_hits(&fragment.to_lowercase()) == 0)
        .take(MAX_FRAGMENTS)
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join("\n\n"))
    }
}

fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let decoded = if let Some(dec) = caps.get(1) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32)
            } else {
                caps.get(3).and_then(|name| named_entity(name.as_str()))
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "ndash" => '–',
        "mdash" => '—',
        "hellip" => '…',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "bull" => '•',
        "middot" => '·',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "euro" => '€',
        "pound" => '£',
        _ => return None,
    };
    Some(c)
}
