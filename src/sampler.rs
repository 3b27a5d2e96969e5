//! Positional sampling of long texts.
//!
//! Footers and boilerplate pile up at the end of a newsletter while the
//! relevant signal can sit anywhere, so a long text is never truncated into a
//! single run. Instead a sample takes a head, a middle block from around the
//! 30% mark and a shorter tail block, joined by markers the model can see.

const MIDDLE_START_PERCENT: usize = 30;
const LATER_START_PERCENT: usize = 60;

pub const MIDDLE_MARKER: &str = "... [middle] ...";
pub const LATER_MARKER: &str = "... [later] ...";
pub const END_MARKER: &str = "... [end] ...";

/// Where the third block of a sample comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tail {
    /// A block starting around the 60% mark.
    Later,
    /// The last words of the text.
    End,
}

impl Tail {
    fn marker(&self) -> &'static str {
        match self {
            Tail::Later => LATER_MARKER,
            Tail::End => END_MARKER,
        }
    }
}

/// Relative sizes of the three blocks of a sample.
///
/// The ratios are scaled to the budget; the head and middle are rounded
/// down and the tail takes whatever is left, so the blocks always add up to
/// the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleShape {
    pub head: usize,
    pub middle: usize,
    pub tail: usize,
    pub tail_kind: Tail,
}

impl SampleShape {
    /// 50/35/15 with the tail anchored at the end of the text.
    pub const DEFAULT: SampleShape = SampleShape {
        head: 50,
        middle: 35,
        tail: 15,
        tail_kind: Tail::End,
    };

    /// 40/25/15 with a tail from the 60% mark, leaving room for a subject
    /// line in front of the sample.
    pub const SNIPPET: SampleShape = SampleShape {
        head: 40,
        middle: 25,
        tail: 15,
        tail_kind: Tail::Later,
    };

    fn sizes(&self, budget: usize) -> (usize, usize, usize) {
        let total = self.head + self.middle + self.tail;
        if total == 0 {
            return (budget, 0, 0);
        }
        let head = budget * self.head / total;
        let middle = budget * self.middle / total;
        (head, middle, budget - head - middle)
    }
}

impl Default for SampleShape {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Sample `words` down to about `budget` words with the default shape.
pub fn sample(words: &[&str], budget: usize) -> String {
    sample_with(words, budget, SampleShape::DEFAULT)
}

pub fn sample_with(words: &[&str], budget: usize, shape: SampleShape) -> String {
    if words.len() <= budget {
        return words.join(" ");
    }
    if budget == 0 {
        return String::new();
    }

    let len = words.len();
    let (head_len, middle_len, tail_len) = shape.sizes(budget);

    let head_end = head_len.min(len);
    let middle_start = (len * MIDDLE_START_PERCENT / 100).max(head_end).min(len);
    let middle_end = (middle_start + middle_len).min(len);
    let (tail_start, tail_end) = match shape.tail_kind {
        Tail::Later => {
            let start = (len * LATER_START_PERCENT / 100).max(middle_end).min(len);
            (start, (start + tail_len).min(len))
        }
        Tail::End => (len.saturating_sub(tail_len).max(middle_end), len),
    };

    let mut out = words[..head_end].join(" ");
    push_section(&mut out, MIDDLE_MARKER, &words[middle_start..middle_end]);
    push_section(&mut out, shape.tail_kind.marker(), &words[tail_start..tail_end]);
    out
}

fn push_section(out: &mut String, marker: &str, words: &[&str]) {
    if words.is_empty() {
        return;
    }
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(marker);
    out.push(' ');
    out.push_str(&words.join(" "));
}

/// Words of `sampled` with the section markers taken out.
pub fn strip_markers(sampled: &str) -> String {
    [MIDDLE_MARKER, LATER_MARKER, END_MARKER]
        .iter()
        .fold(sampled.to_string(), |text, marker| text.replace(marker, " "))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
