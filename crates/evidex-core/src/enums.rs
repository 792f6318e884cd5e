//! Provenance, design, and category enums for Evidex.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ExtractionMethod
// ---------------------------------------------------------------------------

/// Which extraction strategy produced an observation.
///
/// Ordered from most to least trusted; the ordering is used when picking the
/// best method across a set of observations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    StructuredTable,
    FullTextPattern,
    AbstractPattern,
    NlpAssist,
}

impl ExtractionMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StructuredTable => "structured_table",
            Self::FullTextPattern => "full_text_pattern",
            Self::AbstractPattern => "abstract_pattern",
            Self::NlpAssist => "nlp_assist",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StudyDesign
// ---------------------------------------------------------------------------

/// Study design tier of the publication an observation came from.
///
/// Ordered from strongest to weakest design.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum StudyDesign {
    MetaAnalysis,
    RandomizedTrial,
    Observational,
    Unknown,
}

impl StudyDesign {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MetaAnalysis => "meta_analysis",
            Self::RandomizedTrial => "randomized_trial",
            Self::Observational => "observational",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StudyDesign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// HeterogeneityCategory
// ---------------------------------------------------------------------------

/// Between-observation disagreement, beyond what sampling variance explains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HeterogeneityCategory {
    Low,
    Moderate,
    High,
}

impl HeterogeneityCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

impl fmt::Display for HeterogeneityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// QualityCategory
// ---------------------------------------------------------------------------

/// Evidence quality rating derived from the 0-5 quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QualityCategory {
    High,
    Moderate,
    Low,
    VeryLow,
}

impl QualityCategory {
    /// Map a 0-5 quality score to its category.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 3.75 {
            Self::High
        } else if score >= 2.5 {
            Self::Moderate
        } else if score >= 1.25 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
            Self::VeryLow => "very_low",
        }
    }
}

impl fmt::Display for QualityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EvidenceStatus
// ---------------------------------------------------------------------------

/// Whether a pooled estimate carries statistics, and if not, why.
///
/// `NoRecords` and `NoExtractableData` are different upstream states: the
/// first means retrieval came back empty, the second that records existed
/// but none contained a usable numeric efficacy pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStatus {
    Pooled,
    NoRecords,
    NoExtractableData,
}

impl EvidenceStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pooled => "pooled",
            Self::NoRecords => "no_records",
            Self::NoExtractableData => "no_extractable_data",
        }
    }

    /// Whether statistics are present.
    #[must_use]
    pub const fn has_statistics(self) -> bool {
        matches!(self, Self::Pooled)
    }
}

impl fmt::Display for EvidenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
