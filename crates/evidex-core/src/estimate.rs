//! Pooled estimate output types.
//!
//! Absence of data is a first-class value: every statistic is an `Option`,
//! and [`EvidenceStatus`] says why it is empty. There is no numeric fallback
//! anywhere in this type.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EvidenceStatus, HeterogeneityCategory, QualityCategory};

/// Heterogeneity metrics for two or more observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HeterogeneityStats {
    pub category: HeterogeneityCategory,
    /// Population standard deviation of rates over their mean.
    pub coefficient_of_variation: f64,
    /// I²-style percentage of variance beyond binomial sampling variance.
    pub i_squared: f64,
}

/// Heterogeneity of the observations behind an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Heterogeneity {
    /// Fewer than two contributing records; this is not the same as "low".
    NotAssessable { observations: usize, studies: usize },
    Assessed(HeterogeneityStats),
}

impl Heterogeneity {
    #[must_use]
    pub const fn stats(&self) -> Option<&HeterogeneityStats> {
        match self {
            Self::Assessed(stats) => Some(stats),
            Self::NotAssessable { .. } => None,
        }
    }

    #[must_use]
    pub const fn category(&self) -> Option<HeterogeneityCategory> {
        match self {
            Self::Assessed(stats) => Some(stats.category),
            Self::NotAssessable { .. } => None,
        }
    }
}

/// The four capped sub-scores that make up the quality score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QualityComponents {
    /// 0-2, from the number of contributing studies.
    pub study_count: f64,
    /// 0-1, from the average sample size.
    pub sample_size: f64,
    /// 0-1, from the best extraction method achieved.
    pub extraction_method: f64,
    /// 0-1, from the strongest study design present.
    pub study_design: f64,
}

impl QualityComponents {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.study_count + self.sample_size + self.extraction_method + self.study_design
    }
}

/// Evidence quality on a 0-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QualityAssessment {
    pub score: f64,
    pub category: QualityCategory,
    pub components: QualityComponents,
}

/// Output of the statistical pooler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PooledEstimate {
    pub status: EvidenceStatus,
    pub overall_rate: Option<f64>,
    pub ci_lower: Option<f64>,
    pub ci_upper: Option<f64>,
    /// Distinct records contributing at least one observation.
    pub n_studies: usize,
    pub n_observations: usize,
    /// Observations whose sample size was a configured fallback.
    pub estimated_sample_sizes: usize,
    pub heterogeneity: Heterogeneity,
    pub quality: Option<QualityAssessment>,
    #[serde(default)]
    pub subgroup_estimates: BTreeMap<String, PooledEstimate>,
    /// Human-readable explanation, set whenever a statistic is missing.
    pub message: Option<String>,
}

impl PooledEstimate {
    /// Retrieval returned nothing at all.
    #[must_use]
    pub fn no_records() -> Self {
        Self::empty(EvidenceStatus::NoRecords, "no records found".to_string())
    }

    /// Records existed but none produced an observation.
    #[must_use]
    pub fn no_extractable_data(records_found: usize) -> Self {
        Self::empty(
            EvidenceStatus::NoExtractableData,
            format!("{records_found} records found but no extractable efficacy data"),
        )
    }

    fn empty(status: EvidenceStatus, message: String) -> Self {
        Self {
            status,
            overall_rate: None,
            ci_lower: None,
            ci_upper: None,
            n_studies: 0,
            n_observations: 0,
            estimated_sample_sizes: 0,
            heterogeneity: Heterogeneity::NotAssessable {
                observations: 0,
                studies: 0,
            },
            quality: None,
            subgroup_estimates: BTreeMap::new(),
            message: Some(message),
        }
    }

    /// Width of the confidence interval, if one was computed.
    #[must_use]
    pub fn ci_width(&self) -> Option<f64> {
        Some(self.ci_upper? - self.ci_lower?)
    }
}
