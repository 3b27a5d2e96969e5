use std::sync::LazyLock;

use ammonia::Builder;
use ego_tree::NodeId;
use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;

use crate::patterns::PatternTables;

/// Elements dropped outright, whatever their attributes.
const NOISE_TAGS: &[&str] = &[
    "style", "script", "noscript", "template", "head", "footer", "header", "nav", "iframe",
    "svg", "form", "button",
];

static HIDDEN_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)display\s*:\s*none|visibility\s*:\s*hidden|mso-hide\s*:\s*all|(?:max-height|font-size|opacity)\s*:\s*0(?:px|em|%)?\s*(?:!important)?\s*(?:;|$)",
    )
    .unwrap()
});

/// Sanitize untrusted email HTML with Ammonia.
///
/// Scripts, styles and the document head are dropped together with their
/// content; class, id and style attributes survive so the noise pass can
/// still see them.
pub fn sanitize(html: &str) -> String {
    Builder::default()
        .add_tags(&[
            "article", "aside", "center", "footer", "header", "main", "nav", "section", "tfoot",
        ])
        .add_generic_attributes(&["class", "id", "style", "hidden", "aria-hidden"])
        .add_clean_content_tags(&["title", "noscript"])
        .clean(html)
        .to_string()
}

/// Detach structural noise from `document`: deny-listed tags, elements whose
/// class or id names footer/navigation/unsubscribe furniture, and elements
/// hidden with inline styles. Returns the number of removed subtrees.
pub fn remove_noise(document: &mut Html, tables: &PatternTables) -> usize {
    let noisy: Vec<NodeId> = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| is_noise(*el, tables))
        .map(|el| el.id())
        .collect();

    for id in &noisy {
        if let Some(mut node) = document.tree.get_mut(*id) {
            node.detach();
        }
    }

    debug!(removed = noisy.len(), "Removed noise elements");
    noisy.len()
}

fn is_noise(element: ElementRef<'_>, tables: &PatternTables) -> bool {
    let el = element.value();
    let tag = el.name();
    if tag == "html" || tag == "body" {
        return false;
    }
    if NOISE_TAGS.contains(&tag) {
        return true;
    }
    if el.attr("style").is_some_and(|style| HIDDEN_STYLE.is_match(style)) {
        return true;
    }
    if el.attr("hidden").is_some() || el.attr("aria-hidden") == Some("true") {
        return true;
    }
    match tables.noise_markers.as_ref() {
        Some(markers) => ["class", "id"]
            .iter()
            .filter_map(|attr| el.attr(attr))
            .any(|value| markers.is_match(value)),
        None => false,
    }
}
