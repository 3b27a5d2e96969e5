use std::fs;

use crate::extractor::{
    CleanedContent, MAX_DOM_BYTES, MAX_LINKS, ParsedEmail, Strategy, extract, extract_without_dom,
};
use crate::patterns::PatternTables;

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

#[test]
fn test_extract_newsletter() {
    let html = fixture("newsletter.html");
    let content = extract(&html, &PatternTables::builtin());

    assert!(content.text.contains("According to a new report"));
    assert!(content.text.contains("Series B funding round"));
    assert!(content.text.contains("Key insights from the study"));
    assert!(!content.text.contains("Unsubscribe"));
    assert!(!content.text.contains("You are receiving"));
    assert!(!content.text.contains("Twitter"));
    assert!(!content.text.contains("View this email"));
    assert!(!content.text.contains("display:none"));
    assert!(!content.text.contains("chips, funding and a new model"));
    assert!(!content.text.contains("  "));

    // Links come from the original document, before any noise removal.
    assert_eq!(content.links.len(), 7);
    assert_eq!(content.links[0], "https://signal.example.com/view?id=142");
    assert!(
        content
            .links
            .contains(&"https://signal.example.com/unsubscribe?u=abc".to_string())
    );
}

#[test]
fn test_footer_is_removed_before_scoring() {
    let html = fixture("scenario_a.html");
    let content = extract(&html, &PatternTables::builtin());

    assert!(!content.text.to_lowercase().contains("unsubscribe"));
    assert!(content.text.contains("startup"));
    assert!(content.text.contains("funding"));
}

#[test]
fn test_empty_body() {
    let tables = PatternTables::builtin();
    assert_eq!(extract("", &tables), CleanedContent::default());
    assert_eq!(extract("  \n\t ", &tables), CleanedContent::default());
}

#[test]
fn test_markup_without_text() {
    let content = extract(
        r#"<html><body><img src="https://t.example.com/pixel.gif"></body></html>"#,
        &PatternTables::builtin(),
    );
    assert_eq!(content.text, "");
    assert!(content.links.is_empty());
}

#[test]
fn test_malformed_markup_still_extracts() {
    let html = fixture("malformed.html");
    let content = extract(&html, &PatternTables::builtin());

    assert!(content.text.contains("long awaited guidance on model audits"));
    assert_eq!(content.links, vec!["https://policy.example.org/guidance"]);
}

#[test]
fn test_mojibake_is_repaired() {
    let html = fixture("mojibake.html");
    let content = extract(&html, &PatternTables::builtin());

    assert!(content.text.contains("It\u{2019}s been a big week for the café chain"));
    assert!(content.text.contains("€2.1 billion \u{2014} a record \u{2014}"));
    assert!(content.text.contains("\u{201c}the best quarter we have ever had\u{201d}"));
    assert!(content.text.contains("Müller Research"));
    assert!(content.text.contains("Voilà: the café à la carte menu"));
    assert!(!content.text.contains('\u{c3}'));
}

#[test]
fn test_mojibake_ending_in_no_break_space_survives_every_strategy() {
    // "à" read as Windows-1252 is "Ã" followed by U+00A0.
    let html = "<p>Voil\u{c3}\u{a0}, the terrace opens at noon.</p>";
    let tables = PatternTables::builtin();

    assert_eq!(extract(html, &tables).text, "Voilà, the terrace opens at noon.");
    assert_eq!(
        extract_without_dom(html, &tables).text,
        "Voilà, the terrace opens at noon."
    );
}

#[test]
fn test_deeply_nested_markup_extracts() {
    let depth = 10_000;
    let paragraph = "Deeply nested newsletters still carry a readable story at the bottom of the markup.";
    let html = format!(
        "<html><body>{}<p>{paragraph}</p>{}</body></html>",
        "<div>".repeat(depth),
        "</div>".repeat(depth)
    );

    let content = extract(&html, &PatternTables::builtin());
    assert!(content.text.contains(paragraph));
}

#[test]
fn test_short_body_degrades_instead_of_failing() {
    let content = extract(
        "<div>Short but real note here.</div>",
        &PatternTables::builtin(),
    );
    assert_eq!(content.text, "Short but real note here.");
}

#[test]
fn test_links_are_absolute_unique_and_capped() {
    let mut html = String::from(
        r#"<a href="/relative">rel</a><a href="mailto:a@b.com">mail</a><a href="javascript:void(0)">js</a>"#,
    );
    for i in 0..15 {
        html.push_str(&format!(r#"<p><a href="https://news.example.com/{i}">Story {i}</a></p>"#));
        html.push_str(&format!(r#"<a href="https://news.example.com/{i}">Again {i}</a>"#));
    }

    let content = extract(&html, &PatternTables::builtin());
    assert_eq!(content.links.len(), MAX_LINKS);
    assert_eq!(content.links[0], "https://news.example.com/0");
    assert_eq!(content.links[9], "https://news.example.com/9");
}

#[test]
fn test_oversized_body_skips_dom() {
    let paragraph = "<p>Quarterly results beat expectations across every region this year.</p>\n\n";
    let mut html = String::from(r#"<a href="https://big.example.com/story">story</a>"#);
    while html.len() <= MAX_DOM_BYTES {
        html.push_str(paragraph);
    }

    let tables = PatternTables::builtin();
    let parsed = ParsedEmail::parse(&html, &tables);
    assert!(parsed.cleaned.is_none());
    assert_eq!(parsed.links, vec!["https://big.example.com/story"]);

    let content = extract(&html, &tables);
    assert!(content.text.starts_with("Quarterly results beat expectations"));
    assert_eq!(content.links, vec!["https://big.example.com/story"]);
}

#[test]
fn test_dom_strategies_yield_nothing_without_dom() {
    let html = "<p>Some perfectly ordinary paragraph that would normally be extracted.</p>";
    let tables = PatternTables::builtin();
    let parsed = ParsedEmail {
        raw: html,
        cleaned: None,
        links: Vec::new(),
    };

    assert!(Strategy::Reader.run(&parsed, &tables).is_none());
    assert!(Strategy::Candidates.run(&parsed, &tables).is_none());
    assert!(Strategy::Aggressive.run(&parsed, &tables).is_none());
    let stripped = Strategy::TagStrip.run(&parsed, &tables).unwrap();
    assert!(stripped.text.starts_with("Some perfectly ordinary paragraph"));
}

#[test]
fn test_extract_without_dom_matches_regex_path() {
    let html = r#"<div>Regex path keeps the important sentence here.</div><a href="https://x.example.com/a">a</a>"#;
    let content = extract_without_dom(html, &PatternTables::builtin());
    assert_eq!(content.text, "Regex path keeps the important sentence here.");
    assert_eq!(content.links, vec!["https://x.example.com/a"]);
}
