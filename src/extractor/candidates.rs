use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

use crate::extractor::text::{elements_within, flat_text};
use crate::patterns::PatternTables;

const CANDIDATE_TAGS: &[&str] = &["td", "div", "p", "article", "section"];
const MIN_CANDIDATE_CHARS: usize = 40;
/// Elements nested deeper than this below the body are never scored.
const MAX_CANDIDATE_DEPTH: usize = 64;
const MAX_SELECTED: usize = 5;
const WORD_SOFT_CAP: usize = 900;

const SENTENCE_WEIGHT: f64 = 2.0;
const SENTENCE_CAP: usize = 10;
const WORD_WEIGHT: f64 = 0.25;
const WORD_CAP: usize = 200;
const WORD_LENGTH_BONUS: f64 = 5.0;
const CONTENT_WEIGHT: f64 = 8.0;
const BOILERPLATE_PENALTY: f64 = 12.0;
const DEPTH_PENALTY: f64 = 0.5;
const EARLY_BONUS: f64 = 10.0;
const EARLY_DECAY: f64 = 10.0;

static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+(?:\s|$)").unwrap());

#[derive(Debug, Clone)]
struct Candidate {
    index: usize,
    text: String,
    words: usize,
    score: f64,
}

/// Score block-level elements and stitch the best few back together in
/// document order.
pub fn extract(body: ElementRef<'_>, tables: &PatternTables) -> Option<String> {
    let body_depth = body.ancestors().count();
    let mut candidates: Vec<Candidate> = elements_within(body, MAX_CANDIDATE_DEPTH)
        .into_iter()
        .filter(|(el, _)| CANDIDATE_TAGS.contains(&el.value().name()))
        .enumerate()
        .filter_map(|(index, (el, depth))| {
            let text = flat_text(el);
            if text.chars().count() < MIN_CANDIDATE_CHARS {
                return None;
            }
            let depth = body_depth + depth;
            let score = score(&text, index, depth, tables);
            (score > 0.0).then(|| Candidate {
                index,
                words: text.split_whitespace().count(),
                text,
                score,
            })
        })
        .collect();

    candidates.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));

    let mut selected: Vec<Candidate> = Vec::new();
    let mut total_words = 0;
    for candidate in candidates {
        if selected.len() >= MAX_SELECTED || total_words >= WORD_SOFT_CAP {
            break;
        }
        let overlaps = selected
            .iter()
            .any(|s| s.text.contains(&candidate.text) || candidate.text.contains(&s.text));
        if overlaps {
            continue;
        }
        total_words += candidate.words;
        selected.push(candidate);
    }

    if selected.is_empty() {
        return None;
    }

    selected.sort_by_key(|c| c.index);
    Some(
        selected
            .into_iter()
            .map(|c| c.text)
            .collect::<Vec<_>>()
            .join("\n\n"),
    )
}

fn score(text: &str, index: usize, depth: usize, tables: &PatternTables) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }

    let sentences = SENTENCE_END.find_iter(text).count().max(1).min(SENTENCE_CAP);
    let letters: usize = words.iter().map(|w| w.chars().count()).sum();
    let avg_word_len = letters as f64 / words.len() as f64;
    let lower = text.to_lowercase();

    let mut score = sentences as f64 * SENTENCE_WEIGHT;
    score += words.len().min(WORD_CAP) as f64 * WORD_WEIGHT;
    if (4.0..=8.0).contains(&avg_word_len) {
        score += WORD_LENGTH_BONUS;
    }
    score += tables.content_hits(&lower) as f64 * CONTENT_WEIGHT;
    score -= tables.boilerplate_hits(&lower) as f64 * BOILERPLATE_PENALTY;
    score -= depth as f64 * DEPTH_PENALTY;
    score += EARLY_BONUS / (1.0 + index as f64 / EARLY_DECAY);
    score
}
