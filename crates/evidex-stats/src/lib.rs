//! # evidex-stats
//!
//! Statistical pooling for Evidex.
//!
//! - [`variance`]: boundary-adjusted binomial variance and weights
//! - [`pooler`]: inverse-variance pooling, dispersion-inflated intervals,
//!   and per-subgroup estimates
//! - [`heterogeneity`]: coefficient of variation and an I²-style statistic
//! - [`quality`]: the 0-5 evidence quality score
//!
//! Pooling never invents numbers. Empty input yields an estimate whose status
//! says why it is empty.

pub mod heterogeneity;
pub mod pooler;
pub mod quality;
pub mod variance;

pub use pooler::Pooler;
