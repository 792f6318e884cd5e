//! Extraction strategies, from most to least trusted.

mod nlp;
mod table;
mod text;

pub use nlp::{CandidateProposer, NlpAssistStrategy, NlpCandidate, PrecomputedCandidates};
pub use table::TableStrategy;
pub use text::{AbstractStrategy, FullTextStrategy};

use std::collections::HashSet;

use evidex_core::{EfficacyObservation, ExtractionMethod, LiteratureRecord};

use crate::context::RecordContext;

/// One way of turning a record into observations.
///
/// Strategies never fail: a record they cannot read yields no observations.
pub trait ExtractionStrategy: Send + Sync {
    fn method(&self) -> ExtractionMethod;

    /// Whether the record carries the input this strategy reads.
    fn applies_to(&self, record: &LiteratureRecord) -> bool;

    fn extract(
        &self,
        record: &LiteratureRecord,
        ctx: &RecordContext<'_>,
    ) -> Vec<EfficacyObservation>;
}

/// Drop repeated `(subgroup, rate)` pairs, keeping the first occurrence.
///
/// Rates are compared at 1e-9 so the same figure reached through a response
/// percentage and a non-response percentage collapses.
pub(crate) fn collapse_duplicates(observations: Vec<EfficacyObservation>) -> Vec<EfficacyObservation> {
    let mut seen: HashSet<(Option<String>, i64)> = HashSet::new();
    observations
        .into_iter()
        .filter(|obs| {
            #[allow(clippy::cast_possible_truncation)]
            let rate_key = (obs.rate() * 1e9).round() as i64;
            seen.insert((obs.subgroup_label().map(str::to_string), rate_key))
        })
        .collect()
}
