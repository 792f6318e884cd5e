use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use evidex_core::{EfficacyObservation, LiteratureRecord, PooledEstimate, RecordKey};

use crate::error::SourceError;

/// A source that contributed nothing to an analysis, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SourceGap {
    pub source: String,
    pub reason: String,
    pub timed_out: bool,
}

impl From<&SourceError> for SourceGap {
    fn from(error: &SourceError) -> Self {
        Self {
            source: error.source_name().to_string(),
            reason: error.to_string(),
            timed_out: error.is_timeout(),
        }
    }
}

/// Everything an analysis saw, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvidenceReport {
    pub drug: String,
    pub estimate: PooledEstimate,
    /// Canonical records after deduplication.
    pub records: Vec<LiteratureRecord>,
    pub observations: Vec<EfficacyObservation>,
    /// Canonical records from which no figure could be extracted.
    pub extraction_misses: Vec<RecordKey>,
    pub source_gaps: Vec<SourceGap>,
    /// Raw records skipped because they had no usable identity.
    pub dropped_records: usize,
}
