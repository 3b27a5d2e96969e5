//! Repair of UTF-8 text that was decoded as Windows-1252 somewhere upstream.
//!
//! Replacements run in table order. The three-character `â€…` sequences come
//! first so the bare `â€` prefix, and later the single `Ã`/`Â` lead bytes, only
//! see what the longer entries left behind.

const MOJIBAKE: &[(&str, &str)] = &[
    ("\u{e2}\u{20ac}\u{2122}", "\u{2019}"), // ’
    ("\u{e2}\u{20ac}\u{2dc}", "\u{2018}"),  // ‘
    ("\u{e2}\u{20ac}\u{153}", "\u{201c}"),  // “
    ("\u{e2}\u{20ac}\u{9d}", "\u{201d}"),   // ”
    ("\u{e2}\u{20ac}\u{201d}", "\u{2014}"), // —
    ("\u{e2}\u{20ac}\u{201c}", "\u{2013}"), // –
    ("\u{e2}\u{20ac}\u{a6}", "\u{2026}"),   // …
    ("\u{e2}\u{20ac}\u{a2}", "\u{2022}"),   // •
    ("\u{e2}\u{201a}\u{ac}", "\u{20ac}"),   // €
    ("\u{e2}\u{201e}\u{a2}", "\u{2122}"),   // ™
    ("\u{e2}\u{20ac}", "\u{201d}"),
    ("\u{c3}\u{a9}", "é"),
    ("\u{c3}\u{a8}", "è"),
    ("\u{c3}\u{aa}", "ê"),
    ("\u{c3}\u{ab}", "ë"),
    ("\u{c3}\u{a1}", "á"),
    ("\u{c3}\u{a2}", "â"),
    ("\u{c3}\u{a4}", "ä"),
    ("\u{c3}\u{a7}", "ç"),
    ("\u{c3}\u{b1}", "ñ"),
    ("\u{c3}\u{b6}", "ö"),
    ("\u{c3}\u{bc}", "ü"),
    ("\u{c3}\u{b3}", "ó"),
    ("\u{c3}\u{ba}", "ú"),
    ("\u{c3}\u{b4}", "ô"),
    ("\u{c3}\u{ae}", "î"),
    ("\u{c3}\u{af}", "ï"),
    ("\u{c3}\u{ad}", "í"),
    ("\u{c3}\u{a0}", "à"),
    ("\u{c3}\u{2030}", "É"),
    ("\u{c3}\u{20ac}", "À"),
    ("\u{c3}\u{153}", "Ü"),
    ("\u{c3}\u{2013}", "Ö"),
    ("\u{c3}\u{201e}", "Ä"),
    ("\u{c3}\u{178}", "ß"),
    ("\u{c3}\u{b8}", "ø"),
    ("\u{c3}\u{a5}", "å"),
    ("\u{c2}\u{a3}", "£"),
    ("\u{c2}\u{a9}", "©"),
    ("\u{c2}\u{ae}", "®"),
    ("\u{c2}\u{b0}", "°"),
    ("\u{c2}\u{b7}", "·"),
    ("\u{c2}\u{bb}", "»"),
    ("\u{c2}\u{ab}", "«"),
    ("\u{c2}\u{a0}", " "),
    ("\u{c2} ", " "),
];

/// Replace known mojibake sequences, then turn any remaining C1 control
/// characters into spaces. ASCII input is returned untouched.
pub fn repair(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }

    let mut repaired = text.to_string();
    for (broken, fixed) in MOJIBAKE {
        if repaired.contains(broken) {
            repaired = repaired.replace(broken, fixed);
        }
    }

    repaired
        .chars()
        .map(|c| if ('\u{80}'..='\u{9f}').contains(&c) { ' ' } else { c })
        .collect()
}
