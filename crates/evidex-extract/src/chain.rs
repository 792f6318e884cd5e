//! The ordered strategy chain.

use std::collections::BTreeSet;

use evidex_config::ExtractionConfig;
use evidex_core::{EfficacyObservation, ExtractionMethod, LiteratureRecord, RecordKey};

use crate::context::RecordContext;
use crate::strategies::{
    AbstractStrategy, CandidateProposer, ExtractionStrategy, FullTextStrategy, NlpAssistStrategy,
    TableStrategy,
};

/// Observations for a set of records, plus the records that yielded none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionOutcome {
    pub observations: Vec<EfficacyObservation>,
    /// Records no strategy could read a figure from. Expected and common.
    pub misses: Vec<RecordKey>,
}

impl ExtractionOutcome {
    /// Distinct records with at least one observation.
    #[must_use]
    pub fn records_with_data(&self) -> usize {
        self.observations
            .iter()
            .map(EfficacyObservation::record_ref)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Runs strategies in order of trust.
///
/// The first strategy that yields observations for a record is accepted.
/// Later strategies only add observations for subgroups not yet covered
/// (the overall population counts as a subgroup), and the chain stops as
/// soon as an overall figure exists. A record can therefore combine a text
/// figure for the whole cohort with per-genotype rows from a table, but never
/// two overall figures from different methods.
pub struct Extractor {
    config: ExtractionConfig,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

impl Extractor {
    /// Table, full-text, and abstract strategies, in that order.
    #[must_use]
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            config: config.clone(),
            strategies: vec![
                Box::new(TableStrategy),
                Box::new(FullTextStrategy),
                Box::new(AbstractStrategy),
            ],
        }
    }

    /// Append an NLP assist strategy after the pattern strategies.
    #[must_use]
    pub fn with_proposer<P: CandidateProposer + 'static>(self, proposer: P) -> Self {
        self.with_strategy(NlpAssistStrategy::new(proposer))
    }

    /// Append a strategy at the lowest priority.
    #[must_use]
    pub fn with_strategy<S: ExtractionStrategy + 'static>(mut self, strategy: S) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    #[must_use]
    pub fn methods(&self) -> Vec<ExtractionMethod> {
        self.strategies.iter().map(|s| s.method()).collect()
    }

    /// Observations for one record.
    #[must_use]
    pub fn extract(&self, record: &LiteratureRecord) -> Vec<EfficacyObservation> {
        let Some(ctx) = RecordContext::new(record, &self.config) else {
            tracing::debug!(record = %record.label(), "skipping record without identity");
            return Vec::new();
        };

        let mut accepted: Vec<EfficacyObservation> = Vec::new();
        let mut covered: BTreeSet<Option<String>> = BTreeSet::new();
        for strategy in &self.strategies {
            if !strategy.applies_to(record) {
                continue;
            }
            let found = strategy.extract(record, &ctx);
            if found.is_empty() {
                continue;
            }
            let before = accepted.len();
            let mut added_labels = BTreeSet::new();
            for observation in found {
                let label = observation.subgroup_label().map(str::to_string);
                if !covered.contains(&label) {
                    added_labels.insert(label);
                    accepted.push(observation);
                }
            }
            covered.extend(added_labels);
            tracing::debug!(
                record = %ctx.key,
                method = %strategy.method(),
                added = accepted.len() - before,
                "extraction strategy matched"
            );
            if covered.contains(&None) {
                break;
            }
        }
        accepted
    }

    /// Extract from every record, collecting misses.
    #[must_use]
    pub fn extract_all(&self, records: &[LiteratureRecord]) -> ExtractionOutcome {
        let mut outcome = ExtractionOutcome::default();
        for record in records {
            let observations = self.extract(record);
            if observations.is_empty() {
                if let Some(key) = record.identity_key() {
                    tracing::debug!(record = %key, "no extractable efficacy data");
                    outcome.misses.push(key);
                }
            } else {
                outcome.observations.extend(observations);
            }
        }
        tracing::debug!(
            records = records.len(),
            observations = outcome.observations.len(),
            misses = outcome.misses.len(),
            "extraction finished"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidex_core::DataTable;
    use pretty_assertions::assert_eq;

    use crate::strategies::{NlpCandidate, PrecomputedCandidates};
    use crate::vocabulary::Direction;

    fn base(pmid: &str) -> LiteratureRecord {
        let mut record = LiteratureRecord::new("pubmed");
        record.pmid = Some(pmid.into());
        record.title = Some("Clopidogrel outcomes".into());
        record
    }

    fn labels(observations: &[EfficacyObservation]) -> Vec<(Option<&str>, ExtractionMethod)> {
        observations
            .iter()
            .map(|o| (o.subgroup_label(), o.extraction_method()))
            .collect()
    }

    #[test]
    fn default_chain_order() {
        assert_eq!(
            Extractor::default().methods(),
            vec![
                ExtractionMethod::StructuredTable,
                ExtractionMethod::FullTextPattern,
                ExtractionMethod::AbstractPattern,
            ]
        );
    }

    #[test]
    fn table_overall_stops_the_chain() {
        let mut record = base("1");
        record.full_text = Some("Non-response was 40% overall.".into());
        record.abstract_text = Some("Non-response was 41%.".into());
        record.tables = vec![DataTable {
            caption: "Response by phenotype".into(),
            header: vec!["Group".into(), "Response".into()],
            rows: vec![
                vec!["Overall".into(), "70%".into()],
                vec!["PM".into(), "50%".into()],
            ],
        }];
        record.sync_table_flag();

        let obs = Extractor::default().extract(&record);
        assert_eq!(
            labels(&obs),
            vec![
                (None, ExtractionMethod::StructuredTable),
                (Some("PM"), ExtractionMethod::StructuredTable),
            ]
        );
    }

    #[test]
    fn text_overall_complements_table_subgroups() {
        let mut record = base("2");
        record.full_text = Some("Overall, non-response was 30%.".into());
        record.tables = vec![DataTable {
            caption: "Non-response by genotype".into(),
            header: vec!["Genotype".into(), "Rate".into()],
            rows: vec![
                vec!["PM".into(), "45%".into()],
                vec!["EM".into(), "20%".into()],
            ],
        }];
        record.sync_table_flag();

        let obs = Extractor::default().extract(&record);
        assert_eq!(
            labels(&obs),
            vec![
                (Some("PM"), ExtractionMethod::StructuredTable),
                (Some("EM"), ExtractionMethod::StructuredTable),
                (None, ExtractionMethod::FullTextPattern),
            ]
        );
    }

    #[test]
    fn abstract_used_when_nothing_better() {
        let mut record = base("3");
        record.abstract_text = Some("50 of 72 patients responded.".into());
        let obs = Extractor::default().extract(&record);
        assert_eq!(labels(&obs), vec![(None, ExtractionMethod::AbstractPattern)]);
    }

    #[test]
    fn nlp_runs_last_and_only_fills_gaps() {
        let mut record = base("4");
        record.abstract_text = Some("Poor metabolizers: non-response 60%.".into());
        let mut proposer = PrecomputedCandidates::new();
        proposer.insert(
            record.identity_key().unwrap(),
            vec![
                NlpCandidate {
                    span: "PM non-response 61%".into(),
                    rate: 0.61,
                    sample_size: None,
                    confidence: 0.9,
                    subgroup_label: Some("PM".into()),
                    direction: Direction::NonResponse,
                },
                NlpCandidate {
                    span: "overall 35% did not respond".into(),
                    rate: 0.35,
                    sample_size: Some(300),
                    confidence: 0.9,
                    subgroup_label: None,
                    direction: Direction::NonResponse,
                },
            ],
        );
        let extractor = Extractor::default().with_proposer(proposer);
        let obs = extractor.extract(&record);
        assert_eq!(
            labels(&obs),
            vec![
                (Some("PM"), ExtractionMethod::AbstractPattern),
                (None, ExtractionMethod::NlpAssist),
            ]
        );
    }

    #[test]
    fn extract_all_counts_misses() {
        let mut with_data = base("5");
        with_data.abstract_text = Some("Non-response occurred in 22%.".into());
        let mut without = base("6");
        without.abstract_text = Some("Clopidogrel was well tolerated.".into());

        let outcome = Extractor::default().extract_all(&[with_data, without]);
        assert_eq!(outcome.observations.len(), 1);
        assert_eq!(outcome.records_with_data(), 1);
        assert_eq!(
            outcome.misses.iter().map(RecordKey::as_str).collect::<Vec<_>>(),
            vec!["pmid:6"]
        );
    }
}
