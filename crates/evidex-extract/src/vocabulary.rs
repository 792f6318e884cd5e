//! Efficacy and subgroup vocabulary.
//!
//! Numbers only become observations when efficacy vocabulary is nearby; the
//! vocabulary term also fixes the direction. Non-response terms are listed
//! first so that `non-response` never matches as `response`.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Which outcome a stated proportion describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    NonResponse,
    Response,
}

impl Direction {
    /// Convert a proportion stated in this direction to a non-response rate.
    #[must_use]
    pub fn to_non_response(self, proportion: f64) -> f64 {
        match self {
            Self::NonResponse => proportion,
            Self::Response => 1.0 - proportion,
        }
    }
}

const NON_RESPONSE: &str = r"non[-\s]?respon(?:se|ses|ders?|sive|ding)|un-?responsive(?:ness)?|did\s+not\s+respond|failed\s+to\s+respond|not\s+respond(?:ing|ed)?|(?:no|poor|inadequate|insufficient)\s+respon(?:se|ders?)|treatment\s+failures?|resistan(?:ce|t)|refractory";

/// Terms that read a nearby proportion as the share that responded.
///
/// A false hit here inverts the figure (12% becomes 88% non-response), so
/// "outcome", which usually precedes adverse-event rates, is not one of them;
/// see [`names_efficacy_topic`]. "efficacy" and "effectiveness" carry the
/// same risk and stay because they rarely introduce anything but a response
/// rate.
const RESPONSE: &str = r"respon(?:se|ses|ders?|ded|ding|sive|d)|remissions?|efficacy|effectiveness|treatment\s+success|success\s+rate";

static EFFICACY_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:(?P<neg>{NON_RESPONSE})|(?P<pos>{RESPONSE}))\b"
    ))
    .expect("valid efficacy vocabulary")
});

static OUTCOME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\boutcomes?\b").expect("valid outcome pattern"));

static METABOLIZER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?P<kind>ultra-?rapid|poor|intermediate|extensive|normal|rapid)\s+metaboli[sz]ers?\b",
    )
    .expect("valid metabolizer pattern")
});

// Case-sensitive: lower-case `em`, `im` are ordinary words.
static PHENOTYPE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?P<code>PM|IM|EM|NM|RM|UM)s?\b").expect("valid code pattern"));

static CARRIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:(?P<non>non-?carriers?)|(?P<yes>carriers?))\b")
        .expect("valid carrier pattern")
});

const OVERALL_LABELS: &[&str] = &[
    "overall",
    "total",
    "all",
    "all patients",
    "all subjects",
    "all participants",
    "entire cohort",
    "whole cohort",
    "overall population",
];

/// A vocabulary hit at a byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span<T> {
    pub start: usize,
    pub end: usize,
    pub value: T,
}

/// Every efficacy term in `text` with the direction it implies.
pub(crate) fn efficacy_terms(text: &str) -> Vec<Span<Direction>> {
    EFFICACY_TERM
        .captures_iter(text)
        .filter_map(|caps| {
            let (m, direction) = match (caps.name("neg"), caps.name("pos")) {
                (Some(m), _) => (m, Direction::NonResponse),
                (None, Some(m)) => (m, Direction::Response),
                (None, None) => return None,
            };
            Some(Span {
                start: m.start(),
                end: m.end(),
                value: direction,
            })
        })
        .collect()
}

pub(crate) fn mentions_efficacy(text: &str) -> bool {
    EFFICACY_TERM.is_match(text)
}

/// Whether a table heading is about efficacy. Looser than
/// [`mentions_efficacy`]: "outcome" qualifies here but sets no direction.
pub(crate) fn names_efficacy_topic(text: &str) -> bool {
    mentions_efficacy(text) || OUTCOME.is_match(text)
}

/// Direction implied by a block of text such as a table caption.
///
/// Any non-response term wins; otherwise any response term; otherwise none.
pub(crate) fn dominant_direction(text: &str) -> Option<Direction> {
    let terms = efficacy_terms(text);
    if terms.iter().any(|t| t.value == Direction::NonResponse) {
        Some(Direction::NonResponse)
    } else {
        terms.first().map(|t| t.value)
    }
}

/// Canonical subgroup labels in `text`, in order of appearance.
pub(crate) fn subgroup_labels(text: &str) -> Vec<Span<&'static str>> {
    let mut labels: Vec<Span<&'static str>> = METABOLIZER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let kind = caps.name("kind")?.as_str().to_ascii_lowercase();
            let code = match kind.replace('-', "").as_str() {
                "ultrarapid" => "UM",
                "poor" => "PM",
                "intermediate" => "IM",
                "extensive" => "EM",
                "normal" => "NM",
                "rapid" => "RM",
                _ => return None,
            };
            Some(Span {
                start: whole.start(),
                end: whole.end(),
                value: code,
            })
        })
        .collect();

    labels.extend(PHENOTYPE_CODE.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let code = match caps.name("code")?.as_str() {
            "PM" => "PM",
            "IM" => "IM",
            "EM" => "EM",
            "NM" => "NM",
            "RM" => "RM",
            "UM" => "UM",
            _ => return None,
        };
        Some(Span {
            start: whole.start(),
            end: whole.end(),
            value: code,
        })
    }));

    labels.extend(CARRIER.captures_iter(text).filter_map(|caps| {
        let (m, label) = match (caps.name("non"), caps.name("yes")) {
            (Some(m), _) => (m, "non-carriers"),
            (None, Some(m)) => (m, "carriers"),
            (None, None) => return None,
        };
        Some(Span {
            start: m.start(),
            end: m.end(),
            value: label,
        })
    }));

    labels.sort_by_key(|span| span.start);
    labels
}

/// Whether a table row label stands for the whole study population.
pub(crate) fn is_overall_label(label: &str) -> bool {
    let lowered = label.trim().trim_end_matches(':').to_lowercase();
    OVERALL_LABELS.contains(&lowered.as_str())
}

/// Subgroup label for a table row's leading cell. `None` means overall.
pub(crate) fn row_label(cell: &str) -> Option<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() || is_overall_label(trimmed) {
        return None;
    }
    Some(
        subgroup_labels(trimmed)
            .first()
            .map_or_else(|| trimmed.to_string(), |span| span.value.to_string()),
    )
}
