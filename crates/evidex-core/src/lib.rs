//! # evidex-core
//!
//! Core types shared across all Evidex crates.
//!
//! This crate provides the foundational types of the evidence pipeline:
//! - `LiteratureRecord`, the canonical shape every provider record converges to
//! - `RecordKey` identity keys and the normalization helpers behind them
//! - `EfficacyObservation`, validated at construction time
//! - `PooledEstimate` and its heterogeneity / quality sub-types
//! - Shared enums (extraction method, study design, categories, status)
//! - Observation validation errors

pub mod enums;
pub mod errors;
pub mod estimate;
pub mod observation;
pub mod record;

pub use enums::{
    EvidenceStatus, ExtractionMethod, HeterogeneityCategory, QualityCategory, StudyDesign,
};
pub use errors::InvalidObservation;
pub use estimate::{Heterogeneity, HeterogeneityStats, PooledEstimate, QualityAssessment, QualityComponents};
pub use observation::{EfficacyObservation, SampleSize};
pub use record::{DataTable, LiteratureRecord, RecordKey, SourceId};
