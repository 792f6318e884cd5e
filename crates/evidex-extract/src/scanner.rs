//! Numeric efficacy mentions in free text.
//!
//! A mention is a percentage (`72%`, `72.5 %`) or a fraction (`50 of 72`,
//! `50/72`, `50 out of 72`) that sits within a character window of an
//! efficacy term in the same sentence. Interval bounds are masked out before
//! scanning so `95% CI` and its limits never count as rates.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::vocabulary::{self, Direction, Span};

static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<value>\d+(?:\.\d+)?)\s*%").expect("valid percent pattern"));

static FRACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?P<num>\d{1,3}(?:,\d{3})+|\d+)\s*(?:/|out\s+of|of)\s*(?P<den>\d{1,3}(?:,\d{3})+|\d+)\b(?P<pct>\s*%)?",
    )
    .expect("valid fraction pattern")
});

static INTERVAL_PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[(\[][^()\[\]]*\b(?:CI|confidence\s+intervals?|IQR|range)\b[^()\[\]]*[)\]]")
        .expect("valid interval pattern")
});

static INTERVAL_INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d+(?:\.\d+)?\s*%\s*(?:CI|confidence\s+intervals?)\b[\s:,]*(?:(?:of|was|from)\s+)?(?:\d+(?:\.\d+)?\s*%?\s*(?:-|–|to|,)\s*\d+(?:\.\d+)?\s*%?)?",
    )
    .expect("valid inline interval pattern")
});

/// A proportion stated in the text, before direction is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Proportion {
    pub value: f64,
    /// Denominator of a fraction, which is also its sample size.
    pub denominator: Option<u32>,
}

/// A rate found near efficacy vocabulary, already in the non-response
/// direction.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Mention {
    pub rate: f64,
    pub denominator: Option<u32>,
    pub subgroup: Option<&'static str>,
}

pub(crate) fn parse_count(raw: &str) -> Option<u32> {
    raw.replace(',', "").parse().ok()
}

fn fraction_from(caps: &Captures<'_>) -> Option<Proportion> {
    if caps.name("pct").is_some() {
        return None;
    }
    let numerator = parse_count(caps.name("num")?.as_str())?;
    let denominator = parse_count(caps.name("den")?.as_str())?;
    if denominator == 0 || numerator > denominator {
        return None;
    }
    Some(Proportion {
        value: f64::from(numerator) / f64::from(denominator),
        denominator: Some(denominator),
    })
}

fn percent_from(caps: &Captures<'_>, text: &str) -> Option<Proportion> {
    let whole = caps.get(0)?;
    if followed_by_interval(&text[whole.end()..]) {
        return None;
    }
    let value: f64 = caps.name("value")?.as_str().parse().ok()?;
    (0.0..=100.0).contains(&value).then_some(Proportion {
        value: value / 100.0,
        denominator: None,
    })
}

fn followed_by_interval(rest: &str) -> bool {
    let rest = rest.trim_start().to_ascii_lowercase();
    rest.starts_with("confidence")
        || (rest.starts_with("ci") && !rest[2..].starts_with(|c: char| c.is_ascii_alphabetic()))
}

/// Every valid proportion in `text` with its byte span, fractions first.
///
/// Percentages overlapping a fraction are ignored. Out-of-range values and
/// impossible fractions are discarded here.
pub(crate) fn proportions(text: &str) -> Vec<Span<Proportion>> {
    let mut found: Vec<Span<Proportion>> = FRACTION
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Span {
                start: whole.start(),
                end: whole.end(),
                value: fraction_from(&caps)?,
            })
        })
        .collect();
    let fractions = found.len();
    for caps in PERCENT.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let overlaps = found[..fractions]
            .iter()
            .any(|f| whole.start() < f.end && f.start < whole.end());
        if overlaps {
            continue;
        }
        if let Some(value) = percent_from(&caps, text) {
            found.push(Span {
                start: whole.start(),
                end: whole.end(),
                value,
            });
        }
    }
    found.sort_by_key(|span| span.start);
    found
}

/// Replace interval statements with spaces, keeping byte offsets intact.
fn mask_intervals(text: &str) -> String {
    let blank = |caps: &Captures<'_>| " ".repeat(caps[0].len());
    let masked = INTERVAL_PARENTHETICAL.replace_all(text, blank);
    INTERVAL_INLINE.replace_all(&masked, blank).into_owned()
}

/// Split into sentences at `.`, `!`, `?`, `;` followed by whitespace, and at
/// line breaks. Decimal points are never followed by whitespace.
fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let boundary = match c {
            '\n' => true,
            '.' | '!' | '?' | ';' => chars.peek().is_none_or(|(_, next)| next.is_whitespace()),
            _ => false,
        };
        if boundary {
            let end = i + c.len_utf8();
            if !text[start..end].trim().is_empty() {
                out.push(&text[start..end]);
            }
            start = end;
        }
    }
    if !text[start..].trim().is_empty() {
        out.push(&text[start..]);
    }
    out
}

/// Characters between two spans; zero when they overlap.
fn gap<A, B>(text: &str, a: &Span<A>, b: &Span<B>) -> usize {
    if a.end <= b.start {
        text[a.end..b.start].chars().count()
    } else if b.end <= a.start {
        text[b.end..a.start].chars().count()
    } else {
        0
    }
}

/// Nearest span within `window` characters of `target`. Ties go to the span
/// after the target.
fn nearest<'s, T, U>(
    text: &str,
    target: &Span<T>,
    candidates: &'s [Span<U>],
    window: usize,
) -> Option<&'s Span<U>> {
    candidates
        .iter()
        .map(|c| (gap(text, target, c), c.start < target.start, c))
        .filter(|(distance, _, _)| *distance <= window)
        .min_by_key(|(distance, before, _)| (*distance, *before))
        .map(|(_, _, c)| c)
}

/// Scan `text` for efficacy mentions.
///
/// Each number takes its direction from the nearest efficacy term and its
/// subgroup from the nearest subgroup label, both within `window` characters
/// in the same sentence. Numbers with no efficacy term in range are ignored.
pub(crate) fn scan(text: &str, window: usize) -> Vec<Mention> {
    let masked = mask_intervals(text);
    let mut mentions = Vec::new();
    for sentence in sentences(&masked) {
        let terms = vocabulary::efficacy_terms(sentence);
        if terms.is_empty() {
            continue;
        }
        let labels = vocabulary::subgroup_labels(sentence);
        for number in proportions(sentence) {
            let Some(term) = nearest(sentence, &number, &terms, window) else {
                continue;
            };
            let direction: Direction = term.value;
            mentions.push(Mention {
                rate: direction.to_non_response(number.value.value),
                denominator: number.value.denominator,
                subgroup: nearest(sentence, &number, &labels, window).map(|label| label.value),
            });
        }
    }
    mentions
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn fraction_with_response_wording_is_inverted() {
        let mentions = scan("50 of 72 patients responded to clopidogrel.", 80);
        assert_eq!(mentions.len(), 1);
        assert!(approx(mentions[0].rate, 22.0 / 72.0));
        assert_eq!(mentions[0].denominator, Some(72));
        assert_eq!(mentions[0].subgroup, None);
    }

    #[rstest]
    #[case("Non-response was observed in 30% of patients.", 0.30)]
    #[case("The response rate was 72.5 % at one year.", 0.275)]
    #[case("Overall, 12 out of 40 patients did not respond.", 0.30)]
    #[case("Treatment failure occurred in 9/60 subjects.", 0.15)]
    fn single_mentions(#[case] text: &str, #[case] expected: f64) {
        let mentions = scan(text, 80);
        assert_eq!(mentions.len(), 1, "{text}");
        assert!(approx(mentions[0].rate, expected), "{text}: {}", mentions[0].rate);
    }

    #[rstest]
    #[case("Response was 150% of baseline.")]
    #[case("Of 0/0 patients, none responded.")]
    #[case("In 80 of 72 cases the response was recorded.")]
    #[case("The hazard ratio was 1.2; 30% of the cohort was female.")]
    #[case("Patients responded well to therapy.")]
    fn no_valid_mention(#[case] text: &str) {
        assert!(scan(text, 80).is_empty(), "{text}");
    }

    #[test]
    fn confidence_intervals_are_not_rates() {
        let mentions = scan(
            "Non-response was 28% (95% CI 25%-31%) in the cohort; a 95% confidence interval of 20% to 35% applied to response.",
            80,
        );
        let rates: Vec<f64> = mentions.iter().map(|m| m.rate).collect();
        assert_eq!(rates.len(), 1, "{rates:?}");
        assert!(approx(rates[0], 0.28));
    }

    #[test]
    fn numbers_outside_window_are_ignored() {
        let filler = "x".repeat(100);
        let text = format!("Response was assessed {filler} and 40% were female.");
        assert!(scan(&text, 80).is_empty());
        assert_eq!(scan(&text, 200).len(), 1);
    }

    #[test]
    fn vocabulary_must_share_the_sentence() {
        assert!(scan("Non-response was assessed. 40% were female.", 80).is_empty());
    }

    #[test]
    fn subgroups_come_from_nearest_label() {
        let mentions = scan(
            "Non-response occurred in 45% of poor metabolizers and 15% of extensive metabolizers.",
            80,
        );
        let labelled: Vec<(Option<&str>, f64)> =
            mentions.iter().map(|m| (m.subgroup, m.rate)).collect();
        assert_eq!(labelled.len(), 2);
        assert_eq!(labelled[0].0, Some("PM"));
        assert_eq!(labelled[1].0, Some("EM"));
        assert!(approx(labelled[0].1, 0.45));
        assert!(approx(labelled[1].1, 0.15));
    }

    #[test]
    fn decimals_do_not_split_sentences() {
        assert_eq!(
            sentences("Rate was 72.5% overall. Next one! Last"),
            vec!["Rate was 72.5% overall.", " Next one!", " Last"]
        );
    }

    #[test]
    fn masking_keeps_offsets() {
        let text = "Response 28% (95% CI – 25% to 31%) end";
        let masked = mask_intervals(text);
        assert_eq!(masked.len(), text.len());
        assert!(!masked.contains("95%"));
        assert!(masked.contains("28%"));
    }
}
