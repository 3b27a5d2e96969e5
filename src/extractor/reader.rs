//! Readability-style content scoring.
//!
//! Leaf blocks with enough text are scored and hand their score to their
//! parent (in full) and grandparent (in half), so paragraphs sharing one
//! container reinforce it. Containers start from a per-tag base score plus a
//! class/id weight, and the final ranking scales each container by how little
//! of its text is link text.

use std::collections::HashMap;

use ego_tree::NodeId;
use scraper::ElementRef;

use crate::extractor::text::{
    block_text, elements_within, flat_text, has_block_children, link_density,
};
use crate::patterns::PatternTables;

const SCORABLE_TAGS: &[&str] = &[
    "p", "td", "pre", "blockquote", "div", "section", "article", "li",
];
const MIN_PARAGRAPH_CHARS: usize = 25;
/// Blocks nested deeper than this below the body are not scored.
const MAX_SCORING_DEPTH: usize = 64;
const LENGTH_BONUS_CAP: f64 = 3.0;
const CLASS_WEIGHT: f64 = 25.0;
const GRANDPARENT_SHARE: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    element: ElementRef<'a>,
    score: f64,
}

/// Pick the best-scoring container under `body` and return its text with
/// paragraph breaks. `None` when nothing in the document can be scored.
pub fn extract(body: ElementRef<'_>, tables: &PatternTables) -> Option<String> {
    let candidates = score_candidates(body, tables);
    let chosen = choose(&candidates)?;
    let text = block_text(chosen);
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn score_candidates<'a>(body: ElementRef<'a>, tables: &PatternTables) -> HashMap<NodeId, Candidate<'a>> {
    let mut candidates: HashMap<NodeId, Candidate<'a>> = HashMap::new();

    for (element, _) in elements_within(body, MAX_SCORING_DEPTH) {
        if !SCORABLE_TAGS.contains(&element.value().name()) || has_block_children(element) {
            continue;
        }

        let text = flat_text(element);
        let len = text.chars().count();
        if len < MIN_PARAGRAPH_CHARS {
            continue;
        }

        let commas = text.matches(',').count() as f64;
        let content_score = 1.0 + commas + (len as f64 / 100.0).min(LENGTH_BONUS_CAP);

        let ancestors = element.ancestors().filter_map(ElementRef::wrap).take(2);
        for (ancestor, share) in ancestors.zip([1.0, GRANDPARENT_SHARE]) {
            let candidate = candidates.entry(ancestor.id()).or_insert_with(|| Candidate {
                element: ancestor,
                score: initial_score(ancestor, tables),
            });
            candidate.score += content_score * share;
        }
    }

    candidates
}

fn choose<'a>(candidates: &HashMap<NodeId, Candidate<'a>>) -> Option<ElementRef<'a>> {
    let mut best_scaled: Option<(ElementRef<'a>, f64)> = None;
    let mut best_raw: Option<(ElementRef<'a>, f64)> = None;

    for candidate in candidates.values() {
        if is_root(candidate.element) {
            continue;
        }

        if best_raw.is_none_or(|(_, s)| candidate.score > s) {
            best_raw = Some((candidate.element, candidate.score));
        }

        let scaled = candidate.score * (1.0 - link_density(candidate.element));
        if scaled > 0.0 && best_scaled.is_none_or(|(_, s)| scaled > s) {
            best_scaled = Some((candidate.element, scaled));
        }
    }

    best_scaled.or(best_raw).map(|(element, _)| element)
}

fn is_root(element: ElementRef<'_>) -> bool {
    matches!(element.value().name(), "html" | "body")
}

fn initial_score(element: ElementRef<'_>, tables: &PatternTables) -> f64 {
    tag_base_score(element.value().name()) + class_weight(element, tables)
}

fn tag_base_score(tag: &str) -> f64 {
    match tag {
        "div" | "article" | "section" | "main" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    }
}

fn class_weight(element: ElementRef<'_>, tables: &PatternTables) -> f64 {
    let el = element.value();
    let mut weight = 0.0;

    for value in ["class", "id"].iter().filter_map(|attr| el.attr(attr)) {
        if tables
            .negative_names
            .as_ref()
            .is_some_and(|re| re.is_match(value))
        {
            weight -= CLASS_WEIGHT;
        }
        if tables
            .positive_names
            .as_ref()
            .is_some_and(|re| re.is_match(value))
        {
            weight += CLASS_WEIGHT;
        }
    }

    weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::model::normalize_whitespace;
    use scraper::Html;

    fn body(doc: &Html) -> ElementRef<'_> {
        doc.root_element()
            .children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "body")
            .unwrap()
    }

    #[test]
    fn test_prefers_container_with_many_paragraphs() {
        let html = r#"
            <div class="sidebar"><p>Sidebar blurb that is long enough to be scored, barely.</p></div>
            <div class="content">
                <p>The first paragraph of the story talks about a new model release, with details.</p>
                <p>The second paragraph covers benchmarks, pricing, and availability for developers.</p>
                <p>The third paragraph quotes the founders, who expect growth, and more launches.</p>
            </div>"#;
        let doc = Html::parse_document(html);
        let text = normalize_whitespace(&extract(body(&doc), &PatternTables::builtin()).unwrap());
        assert!(text.starts_with("The first paragraph"));
        assert!(text.contains("third paragraph"));
        assert!(!text.contains("Sidebar"));
    }

    #[test]
    fn test_link_heavy_block_loses() {
        let html = r#"
            <div id="links">
                <p><a href="https://a.com">A long list of links that looks like content, but is not</a></p>
                <p><a href="https://b.com">Another long run of anchor text, repeated, for navigation</a></p>
            </div>
            <div id="story">
                <p>Plain prose about the quarter's results, the market, and what analysts expect next.</p>
            </div>"#;
        let doc = Html::parse_document(html);
        let text = normalize_whitespace(&extract(body(&doc), &PatternTables::builtin()).unwrap());
        assert!(text.starts_with("Plain prose"));
    }

    #[test]
    fn test_root_is_never_chosen() {
        let doc = Html::parse_document(
            "<body><p>Only a single paragraph directly in the body of the email.</p></body>",
        );
        assert!(extract(body(&doc), &PatternTables::builtin()).is_none());
    }

    #[test]
    fn test_short_text_is_not_scored() {
        let doc = Html::parse_document("<div><p>Too short</p></div>");
        assert!(extract(body(&doc), &PatternTables::builtin()).is_none());
    }

    #[test]
    fn test_falls_back_to_raw_score_when_nothing_qualifies() {
        let html = r#"<ul class="sidebar"><li><a href="https://a.com">Every character of this item is link text</a></li></ul>"#;
        let doc = Html::parse_document(html);
        let text = extract(body(&doc), &PatternTables::builtin()).unwrap();
        assert!(text.contains("Every character"));
    }
}
