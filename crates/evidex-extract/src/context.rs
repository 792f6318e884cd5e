//! Per-record state shared by every strategy in the chain.

use evidex_config::ExtractionConfig;
use evidex_core::{
    EfficacyObservation, ExtractionMethod, LiteratureRecord, RecordKey, SampleSize, StudyDesign,
};

use crate::design;
use crate::sample_size::{self, SizeBounds};

/// What strategies need to know about the record besides its text.
#[derive(Debug, Clone)]
pub struct RecordContext<'a> {
    pub key: RecordKey,
    pub design: StudyDesign,
    /// Sample size stated anywhere in the record's full text or abstract.
    pub stated_sample_size: Option<u32>,
    pub config: &'a ExtractionConfig,
}

impl<'a> RecordContext<'a> {
    /// Build the context for `record`. `None` if the record has no identity,
    /// which normalized records always have.
    #[must_use]
    pub fn new(record: &LiteratureRecord, config: &'a ExtractionConfig) -> Option<Self> {
        let key = record.identity_key()?;
        let bounds = bounds(config);
        let stated_sample_size = [record.full_text.as_deref(), record.abstract_text.as_deref()]
            .into_iter()
            .flatten()
            .find_map(|text| sample_size::find(text, bounds));
        Some(Self {
            key,
            design: design::classify(record),
            stated_sample_size,
            config,
        })
    }

    #[must_use]
    pub fn bounds(&self) -> SizeBounds {
        bounds(self.config)
    }

    /// Resolve a sample size: a locally stated one, else the record's, else
    /// the configured fallback marked as estimated.
    ///
    /// With the fallback disabled this yields a zero size, which observation
    /// validation then rejects.
    #[must_use]
    pub fn sample_size(&self, local: Option<u32>) -> SampleSize {
        local
            .filter(|n| *n > 0)
            .or(self.stated_sample_size)
            .map_or_else(
                || SampleSize::estimated(self.config.fallback_sample_size),
                SampleSize::observed,
            )
    }

    /// Validate an observation for this record. Invalid ones are logged at
    /// debug level and dropped.
    #[must_use]
    pub fn observation(
        &self,
        rate: f64,
        local_sample_size: Option<u32>,
        subgroup: Option<&str>,
        method: ExtractionMethod,
    ) -> Option<EfficacyObservation> {
        let sample_size = self.sample_size(local_sample_size);
        match EfficacyObservation::new(self.key.clone(), rate, sample_size, method, self.design) {
            Ok(observation) => Some(match subgroup {
                Some(label) => observation.with_subgroup(label),
                None => observation,
            }),
            Err(error) => {
                tracing::debug!(record = %self.key, %method, %error, "dropping invalid observation");
                None
            }
        }
    }
}

const fn bounds(config: &ExtractionConfig) -> SizeBounds {
    SizeBounds {
        min: config.min_sample_size,
        max: config.max_sample_size,
    }
}
