use ego_tree::iter::Edge;
use scraper::{ElementRef, node::Node};

use crate::extractor::model::normalize_whitespace;

const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "center",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

pub fn is_block(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

pub fn has_block_children(element: ElementRef<'_>) -> bool {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .any(|child| is_block(child.value().name()))
}

/// Text of `element` with a blank line at every block boundary, so callers
/// can split it back into paragraphs.
pub fn block_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    walk(element, &mut out);
    out
}

/// Elements under `root`, `root` included, in document order, each paired
/// with its depth below `root`. Subtrees starting deeper than `max_depth` are
/// skipped, though still walked.
pub fn elements_within<'a>(root: ElementRef<'a>, max_depth: usize) -> Vec<(ElementRef<'a>, usize)> {
    let mut found = Vec::new();
    let mut depth = 0usize;
    for edge in root.traverse() {
        match edge {
            Edge::Open(node) => {
                if let Some(element) = ElementRef::wrap(node) {
                    if depth <= max_depth {
                        found.push((element, depth));
                    }
                    depth += 1;
                }
            }
            Edge::Close(node) => {
                if node.value().is_element() {
                    depth = depth.saturating_sub(1);
                }
            }
        }
    }
    found
}

/// Text of `element` on a single line.
pub fn flat_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&block_text(element))
}

/// Number of characters of `element`'s text that sit inside anchors.
pub fn link_text_chars(element: ElementRef<'_>) -> usize {
    element
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "a")
        .map(|a| {
            a.text()
                .map(|t| t.chars().filter(|c| !c.is_whitespace()).count())
                .sum::<usize>()
        })
        .sum()
}

/// Share of `element`'s visible characters that are anchor text.
pub fn link_density(element: ElementRef<'_>) -> f64 {
    let total: usize = element
        .text()
        .map(|t| t.chars().filter(|c| !c.is_whitespace()).count())
        .sum();
    if total == 0 {
        return 0.0;
    }
    (link_text_chars(element) as f64 / total as f64).min(1.0)
}

fn walk(element: ElementRef<'_>, out: &mut String) {
    for edge in element.traverse() {
        match edge {
            Edge::Open(node) | Edge::Close(node) if node.id() == element.id() => {}
            Edge::Open(node) => match node.value() {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) if el.name() == "br" => out.push('\n'),
                Node::Element(el) if is_block(el.name()) => out.push_str("\n\n"),
                _ => {}
            },
            Edge::Close(node) => {
                if let Node::Element(el) = node.value()
                    && is_block(el.name())
                {
                    out.push_str("\n\n");
                }
            }
        }
    }
}
