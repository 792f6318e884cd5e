//! The normalize → deduplicate → extract → pool pipeline.

use evidex_config::EvidexConfig;
use evidex_core::PooledEstimate;
use evidex_extract::{CandidateProposer, Extractor};
use evidex_records::{SourceBatch, SourcePriority, deduplicate, normalize_batch};
use evidex_stats::Pooler;

use crate::gather::Gathered;
use crate::report::EvidenceReport;

/// Turns raw source batches for one drug into a pooled estimate.
///
/// Pure and synchronous; one engine can serve any number of analyses.
pub struct EvidenceEngine {
    priority: SourcePriority,
    extractor: Extractor,
    pooler: Pooler,
}

impl Default for EvidenceEngine {
    fn default() -> Self {
        Self::new(&EvidexConfig::default())
    }
}

impl EvidenceEngine {
    #[must_use]
    pub fn new(config: &EvidexConfig) -> Self {
        Self {
            priority: SourcePriority::new(config.sources.priority.iter().cloned()),
            extractor: Extractor::from_config(&config.extraction),
            pooler: Pooler::new(config.pooling.clone()),
        }
    }

    /// Add NLP-assisted extraction after the pattern strategies.
    #[must_use]
    pub fn with_proposer<P: CandidateProposer + 'static>(mut self, proposer: P) -> Self {
        self.extractor = self.extractor.with_proposer(proposer);
        self
    }

    /// Pooled non-response estimate for `drug`.
    ///
    /// An empty `batches` slice, or batches with no usable records, gives an
    /// estimate with status `no_records`.
    #[must_use]
    pub fn pool(&self, drug: &str, batches: &[SourceBatch]) -> PooledEstimate {
        self.analyze(drug, batches).estimate
    }

    /// Like [`Self::pool`], keeping the intermediate records and observations.
    #[must_use]
    pub fn analyze(&self, drug: &str, batches: &[SourceBatch]) -> EvidenceReport {
        let mut normalized = Vec::new();
        let mut dropped_records = 0;
        for batch in batches {
            let (records, dropped) = normalize_batch(batch);
            tracing::debug!(
                %drug,
                source = %batch.provider,
                records = records.len(),
                dropped,
                "normalized source batch"
            );
            normalized.extend(records);
            dropped_records += dropped;
        }

        let raw = normalized.len();
        let records = deduplicate(normalized, &self.priority);
        tracing::debug!(%drug, raw, canonical = records.len(), "deduplicated records");

        let outcome = self.extractor.extract_all(&records);
        tracing::debug!(
            %drug,
            observations = outcome.observations.len(),
            records_with_data = outcome.records_with_data(),
            misses = outcome.misses.len(),
            "extracted observations"
        );

        let estimate = self.pooler.pool(&outcome.observations, records.len());
        EvidenceReport {
            drug: drug.to_string(),
            estimate,
            records,
            observations: outcome.observations,
            extraction_misses: outcome.misses,
            source_gaps: Vec::new(),
            dropped_records,
        }
    }

    /// Analyze gathered batches, carrying the gaps into the report.
    #[must_use]
    pub fn analyze_gathered(&self, drug: &str, gathered: Gathered) -> EvidenceReport {
        let mut report = self.analyze(drug, &gathered.batches);
        report.source_gaps = gathered.gaps;
        report
    }
}
