use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::extractor::model::normalize_whitespace;

static ANCHORS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

const NON_NAVIGATIONAL: &[&str] = &["mailto:", "tel:", "sms:", "javascript:", "data:"];

/// An anchor as found in an email body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedLink {
    /// Visible anchor text, whitespace-normalized and never empty.
    pub text: String,
    /// The `href` attribute as written.
    pub href: String,
    /// `href` resolved to an absolute URL, or `href` itself when it cannot be.
    pub url: String,
}

/// Collect every navigational anchor with visible text, in document order.
///
/// Relative hrefs are resolved against `base` when one is given.
pub fn extract_links(html: &str, base: Option<&Url>) -> Vec<ExtractedLink> {
    let document = Html::parse_document(html);

    document
        .select(&ANCHORS)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?.trim();
            if href.is_empty() || href.starts_with('#') || is_non_navigational(href) {
                return None;
            }

            let text = normalize_whitespace(&anchor.text().collect::<String>());
            if text.is_empty() {
                return None;
            }

            Some(ExtractedLink {
                url: resolve(href, base),
                href: href.to_string(),
                text,
            })
        })
        .collect()
}

fn is_non_navigational(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    NON_NAVIGATIONAL
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

fn resolve(href: &str, base: Option<&Url>) -> String {
    let resolved = match base {
        Some(base) => base.join(href),
        None => Url::parse(href),
    };
    match resolved {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_text_href_and_url() {
        let html = r#"<a href="https://a.com/story"> The <b>big</b>
            story </a>"#;
        let links = extract_links(html, None);
        assert_eq!(
            links,
            vec![ExtractedLink {
                text: "The big story".to_string(),
                href: "https://a.com/story".to_string(),
                url: "https://a.com/story".to_string(),
            }]
        );
    }

    #[test]
    fn test_drops_empty_text_and_non_navigational() {
        let html = r##"
            <a href="https://a.com/img"><img src="https://a.com/i.png"></a>
            <a href="mailto:editor@a.com">Email the editor</a>
            <a href="tel:+15551234">Call us</a>
            <a href="JavaScript:void(0)">Toggle</a>
            <a href="#top">Back to top</a>
            <a href="  ">Blank</a>
            <a href="https://a.com/keep">Keep me</a>"##;
        let links = extract_links(html, None);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text, "Keep me");
    }

    #[test]
    fn test_resolves_relative_against_base() {
        let base = Url::parse("https://news.example.com/issues/42/").unwrap();
        let links = extract_links(r#"<a href="../41/">Previous issue recap</a>"#, Some(&base));
        assert_eq!(links[0].url, "https://news.example.com/issues/41/");
        assert_eq!(links[0].href, "../41/");
    }

    #[test]
    fn test_unresolvable_keeps_raw_href() {
        let links = extract_links(r#"<a href="/relative/path">Relative story</a>"#, None);
        assert_eq!(links[0].url, "/relative/path");
    }
}
