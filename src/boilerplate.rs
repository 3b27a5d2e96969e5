use crate::extractor::model::normalize_whitespace;
use crate::patterns::PatternTables;

/// Removing one phrase can join its neighbours into a new match, so the
/// passes repeat until nothing changes.
const MAX_PASSES: usize = 8;

const SEPARATORS: &[char] = &['|', '•', '·'];
const STRAY_PUNCTUATION: &[&str] = &[".", ",", ";", ":"];

/// Strip promotional, legal and footer phrases from cleaned text.
///
/// Phrase regexes run first, then standalone phrases as whole words, then
/// separators and punctuation left dangling by those removals are dropped.
/// Running it on its own output changes nothing.
pub fn remove_boilerplate(text: &str, tables: &PatternTables) -> String {
    let mut current = normalize_whitespace(text);
    for _ in 0..MAX_PASSES {
        let next = single_pass(&current, tables);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn single_pass(text: &str, tables: &PatternTables) -> String {
    let mut out = text.to_string();
    for pattern in &tables.boilerplate_phrases {
        if pattern.is_match(&out) {
            out = pattern.replace_all(&out, " ").into_owned();
        }
    }
    if let Some(standalone) = &tables.standalone_phrases {
        out = standalone.replace_all(&out, " ").into_owned();
    }
    drop_orphans(&out)
}

fn is_separator(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| SEPARATORS.contains(&c))
}

/// A separator survives only between two words; lone punctuation never does.
/// The result is whitespace-normalized.
fn drop_orphans(text: &str) -> String {
    let tokens: Vec<&str> = text
        .split_whitespace()
        .filter(|token| !STRAY_PUNCTUATION.contains(token))
        .collect();
    let is_word = |index: Option<usize>| {
        index
            .and_then(|i| tokens.get(i))
            .is_some_and(|token| !is_separator(token))
    };

    tokens
        .iter()
        .enumerate()
        .filter(|(i, token)| {
            !is_separator(token) || (is_word(i.checked_sub(1)) && is_word(Some(i + 1)))
        })
        .map(|(_, token)| *token)
        .collect::<Vec<_>>()
        .join(" ")
}


#[cfg(all(test, feature = "fuzz"))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn remove_boilerplate_is_idempotent(words in prop::collection::vec(
            prop_oneof![
                "[a-zA-Z]{1,10}",
                Just("unsubscribe".to_string()),
                Just("click here".to_string()),
                Just("privacy policy".to_string()),
                Just("follow us on twitter".to_string()),
                Just("all rights reserved.".to_string()),
                Just("|".to_string()),
            ],
            0..40,
        )) {
            let tables = PatternTables::builtin();
            let text = words.join(" ");
            let once = remove_boilerplate(&text, &tables);
            prop_assert_eq!(remove_boilerplate(&once, &tables), once);
        }
    }
}
