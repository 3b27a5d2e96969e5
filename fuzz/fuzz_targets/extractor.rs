#![no_main]

use libfuzzer_sys::fuzz_target;

use letterbox::boilerplate::remove_boilerplate;
use letterbox::extractor::{MAX_LINKS, extract, extract_without_dom};
use letterbox::links::enrich;
use letterbox::patterns::PatternTables;

fuzz_target!(|data: &[u8]| {
    // Convert raw bytes to string, handling invalid UTF-8 gracefully
    let html = String::from_utf8_lossy(data);
    let tables = PatternTables::builtin();

    // None of these may panic, whatever the input
    let content = extract(&html, &tables);
    assert!(content.links.len() <= MAX_LINKS);

    let cleaned = remove_boilerplate(&content.text, &tables);
    assert_eq!(remove_boilerplate(&cleaned, &tables), cleaned);

    let _ = extract_without_dom(&html, &tables);
    let _ = enrich(&html, None, &tables);
});
