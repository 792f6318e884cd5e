//! Validated efficacy observations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ExtractionMethod, StudyDesign};
use crate::errors::InvalidObservation;
use crate::record::RecordKey;

/// Number of subjects behind an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SampleSize {
    pub value: u32,
    /// `true` when no size was stated and a configured fallback was used.
    pub is_estimated: bool,
}

impl SampleSize {
    #[must_use]
    pub const fn observed(value: u32) -> Self {
        Self {
            value,
            is_estimated: false,
        }
    }

    #[must_use]
    pub const fn estimated(value: u32) -> Self {
        Self {
            value,
            is_estimated: true,
        }
    }
}

/// One extracted quantitative datum, always in the non-response direction.
///
/// Construction goes through [`EfficacyObservation::new`], which enforces
/// `rate` in `[0, 1]` and a positive sample size. Deserialization applies the
/// same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "ObservationFields")]
pub struct EfficacyObservation {
    record_ref: RecordKey,
    rate: f64,
    sample_size: SampleSize,
    subgroup_label: Option<String>,
    extraction_method: ExtractionMethod,
    study_design_tier: StudyDesign,
}

#[derive(Deserialize, JsonSchema)]
struct ObservationFields {
    record_ref: RecordKey,
    rate: f64,
    sample_size: SampleSize,
    subgroup_label: Option<String>,
    extraction_method: ExtractionMethod,
    study_design_tier: StudyDesign,
}

impl TryFrom<ObservationFields> for EfficacyObservation {
    type Error = InvalidObservation;

    fn try_from(fields: ObservationFields) -> Result<Self, Self::Error> {
        let observation = Self::new(
            fields.record_ref,
            fields.rate,
            fields.sample_size,
            fields.extraction_method,
            fields.study_design_tier,
        )?;
        Ok(match fields.subgroup_label {
            Some(label) => observation.with_subgroup(label),
            None => observation,
        })
    }
}

impl EfficacyObservation {
    /// Validate and build an overall-population observation.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidObservation`] if `rate` is not finite, lies outside
    /// `[0, 1]`, or `sample_size` is zero. Values are never clamped.
    pub fn new(
        record_ref: RecordKey,
        rate: f64,
        sample_size: SampleSize,
        extraction_method: ExtractionMethod,
        study_design_tier: StudyDesign,
    ) -> Result<Self, InvalidObservation> {
        if !rate.is_finite() {
            return Err(InvalidObservation::NonFiniteRate);
        }
        if !(0.0..=1.0).contains(&rate) {
            return Err(InvalidObservation::RateOutOfRange(rate));
        }
        if sample_size.value == 0 {
            return Err(InvalidObservation::ZeroSampleSize);
        }
        Ok(Self {
            record_ref,
            rate,
            sample_size,
            subgroup_label: None,
            extraction_method,
            study_design_tier,
        })
    }

    /// Attach a subgroup label. Blank labels mean "overall population".
    #[must_use]
    pub fn with_subgroup(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        let trimmed = label.trim();
        self.subgroup_label = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    #[must_use]
    pub const fn record_ref(&self) -> &RecordKey {
        &self.record_ref
    }

    /// Non-response proportion in `[0, 1]`.
    #[must_use]
    pub const fn rate(&self) -> f64 {
        self.rate
    }

    #[must_use]
    pub const fn sample_size(&self) -> SampleSize {
        self.sample_size
    }

    #[must_use]
    pub fn subgroup_label(&self) -> Option<&str> {
        self.subgroup_label.as_deref()
    }

    #[must_use]
    pub const fn extraction_method(&self) -> ExtractionMethod {
        self.extraction_method
    }

    #[must_use]
    pub const fn study_design_tier(&self) -> StudyDesign {
        self.study_design_tier
    }

    /// Whether this observation describes the whole study population.
    #[must_use]
    pub const fn is_overall(&self) -> bool {
        self.subgroup_label.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::LiteratureRecord;

    fn key() -> RecordKey {
        let mut record = LiteratureRecord::new("pubmed");
        record.pmid = Some("1".into());
        record.identity_key().unwrap()
    }

    fn build(rate: f64, n: u32) -> Result<EfficacyObservation, InvalidObservation> {
        EfficacyObservation::new(
            key(),
            rate,
            SampleSize::observed(n),
            ExtractionMethod::AbstractPattern,
            StudyDesign::Unknown,
        )
    }

    #[test]
    fn accepts_boundary_rates() {
        assert!(build(0.0, 1).is_ok());
        assert!(build(1.0, 1).is_ok());
    }

    #[test]
    fn rejects_out_of_range_rate() {
        assert_eq!(build(1.2, 10), Err(InvalidObservation::RateOutOfRange(1.2)));
        assert_eq!(build(-0.1, 10), Err(InvalidObservation::RateOutOfRange(-0.1)));
    }

    #[test]
    fn rejects_non_finite_rate() {
        assert_eq!(build(f64::NAN, 10), Err(InvalidObservation::NonFiniteRate));
        assert_eq!(build(f64::INFINITY, 10), Err(InvalidObservation::NonFiniteRate));
    }

    #[test]
    fn rejects_zero_sample_size() {
        assert_eq!(build(0.3, 0), Err(InvalidObservation::ZeroSampleSize));
    }

    #[test]
    fn blank_subgroup_means_overall() {
        let obs = build(0.3, 10).unwrap().with_subgroup("  ");
        assert!(obs.is_overall());
        let obs = obs.with_subgroup(" PM ");
        assert_eq!(obs.subgroup_label(), Some("PM"));
    }

    #[test]
    fn deserialization_enforces_invariants() {
        let valid = serde_json::to_value(build(0.25, 40).unwrap().with_subgroup("EM")).unwrap();
        let recovered: EfficacyObservation = serde_json::from_value(valid.clone()).unwrap();
        assert_eq!(recovered.subgroup_label(), Some("EM"));

        let mut invalid = valid;
        invalid["rate"] = serde_json::json!(1.5);
        assert!(serde_json::from_value::<EfficacyObservation>(invalid).is_err());
    }
}
