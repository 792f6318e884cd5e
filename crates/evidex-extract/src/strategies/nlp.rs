//! Candidates proposed by an external NLP extraction service.
//!
//! The service runs before the pipeline; its answers reach the chain through
//! a [`CandidateProposer`]. Candidates are the least trusted input and only
//! fill subgroups no pattern strategy covered.

use std::collections::HashMap;

use evidex_core::{EfficacyObservation, ExtractionMethod, LiteratureRecord, RecordKey};
use serde::{Deserialize, Serialize};

use super::{ExtractionStrategy, collapse_duplicates};
use crate::context::RecordContext;
use crate::vocabulary::Direction;

/// A proposed (text span → rate, sample size) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NlpCandidate {
    /// Source text the figure was read from.
    pub span: String,
    /// Proportion in `[0, 1]`, in the stated `direction`.
    pub rate: f64,
    #[serde(default)]
    pub sample_size: Option<u32>,
    pub confidence: f64,
    #[serde(default)]
    pub subgroup_label: Option<String>,
    pub direction: Direction,
}

/// Source of NLP candidates for a record.
pub trait CandidateProposer: Send + Sync {
    fn propose(&self, record: &LiteratureRecord) -> Vec<NlpCandidate>;
}

/// Candidates fetched ahead of time, keyed by record identity.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedCandidates {
    by_record: HashMap<RecordKey, Vec<NlpCandidate>>,
}

impl PrecomputedCandidates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: RecordKey, candidates: Vec<NlpCandidate>) {
        self.by_record.entry(key).or_default().extend(candidates);
    }
}

impl CandidateProposer for PrecomputedCandidates {
    fn propose(&self, record: &LiteratureRecord) -> Vec<NlpCandidate> {
        record
            .identity_key()
            .and_then(|key| self.by_record.get(&key).cloned())
            .unwrap_or_default()
    }
}

/// Lowest-trust strategy backed by a [`CandidateProposer`].
pub struct NlpAssistStrategy<P> {
    proposer: P,
}

impl<P: CandidateProposer> NlpAssistStrategy<P> {
    pub const fn new(proposer: P) -> Self {
        Self { proposer }
    }
}

impl<P: CandidateProposer> ExtractionStrategy for NlpAssistStrategy<P> {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::NlpAssist
    }

    fn applies_to(&self, record: &LiteratureRecord) -> bool {
        record.full_text.is_some() || record.abstract_text.is_some() || record.title.is_some()
    }

    fn extract(&self, record: &LiteratureRecord, ctx: &RecordContext<'_>) -> Vec<EfficacyObservation> {
        let min_confidence = ctx.config.nlp_min_confidence;
        let observations = self
            .proposer
            .propose(record)
            .into_iter()
            .filter(|candidate| {
                let confident = candidate.confidence.is_finite() && candidate.confidence >= min_confidence;
                // A figure must be stated, not inferred from wording.
                let numeric = candidate.span.chars().any(|c| c.is_ascii_digit());
                if !(confident && numeric) {
                    tracing::debug!(
                        record = %ctx.key,
                        confidence = candidate.confidence,
                        span = %candidate.span,
                        "discarding nlp candidate"
                    );
                }
                confident && numeric
            })
            .filter_map(|candidate| {
                ctx.observation(
                    candidate.direction.to_non_response(candidate.rate),
                    candidate.sample_size,
                    candidate.subgroup_label.as_deref(),
                    ExtractionMethod::NlpAssist,
                )
            })
            .collect();
        collapse_duplicates(observations)
    }
}
