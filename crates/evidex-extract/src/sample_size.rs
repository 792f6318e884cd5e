//! Stated sample sizes.
//!
//! Patterns are tried in order and the first in-range match wins. Counts
//! outside the configured bounds are treated as false matches (years, doses,
//! identifiers), not clamped.

use std::sync::LazyLock;

use regex::Regex;

use crate::scanner::parse_count;

const COUNT: &str = r"(?P<count>\d{1,3}(?:,\d{3})+|\d+)";
const SUBJECTS: &str = r"(?:patients|subjects|participants|individuals|cases)";

static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        format!(r"(?i)\bn\s*=\s*{COUNT}"),
        format!(r"(?i)\bsample\s+size\s+(?:of\s+|was\s+|=\s*)?{COUNT}"),
        format!(
            r"(?i)\b(?:enrolled|included|studied|randomi[sz]ed|recruited)\s+{COUNT}\s+(?:\w+\s+)?{SUBJECTS}"
        ),
        format!(
            r"(?i)\b(?:cohort|trial|study|series)\s+(?:of|with|including)\s+{COUNT}\s+(?:\w+\s+){{0,2}}?{SUBJECTS}"
        ),
        format!(r"(?i)\b{COUNT}\s+(?:\w+\s+)?{SUBJECTS}\b"),
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid sample size pattern"))
    .collect()
});

/// Accepted range for a stated sample size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBounds {
    pub min: u32,
    pub max: u32,
}

impl SizeBounds {
    #[must_use]
    pub const fn contains(self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// First stated sample size in `text` within `bounds`.
#[must_use]
pub fn find(text: &str, bounds: SizeBounds) -> Option<u32> {
    PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures_iter(text)
            .filter_map(|caps| parse_count(caps.name("count")?.as_str()))
            .find(|value| bounds.contains(*value))
    })
}

/// `n = …` only, for table captions and cells.
#[must_use]
pub fn find_explicit(text: &str, bounds: SizeBounds) -> Option<u32> {
    PATTERNS[0]
        .captures_iter(text)
        .filter_map(|caps| parse_count(caps.name("count")?.as_str()))
        .find(|value| bounds.contains(*value))
}
