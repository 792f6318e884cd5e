//! Observation validation errors.
//!
//! Data-quality problems never escape the pipeline as errors. The only
//! fallible constructor in this crate is [`EfficacyObservation::new`], and
//! its callers drop rejected candidates after logging them.
//!
//! [`EfficacyObservation::new`]: crate::EfficacyObservation::new

use thiserror::Error;

/// A would-be observation that violates a numeric invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidObservation {
    /// Rate is NaN or infinite.
    #[error("rate is not a finite number")]
    NonFiniteRate,

    /// Rate lies outside the closed unit interval.
    #[error("rate {0} is outside [0, 1]")]
    RateOutOfRange(f64),

    /// Sample size must be a positive count.
    #[error("sample size must be positive")]
    ZeroSampleSize,
}
