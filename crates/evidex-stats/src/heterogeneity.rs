//! Disagreement between observations beyond sampling noise.

use std::collections::BTreeSet;

use evidex_core::{EfficacyObservation, Heterogeneity, HeterogeneityCategory, HeterogeneityStats};

use crate::variance::binomial_variance;

const LOW_CV: f64 = 0.15;
const LOW_I_SQUARED: f64 = 25.0;
const MODERATE_CV: f64 = 0.30;
const MODERATE_I_SQUARED: f64 = 50.0;

/// Assess heterogeneity. Needs observations from at least two distinct
/// records; strata or repeated figures of a single record do not count.
///
/// The coefficient of variation is the population standard deviation of the
/// rates over their mean. The I²-style statistic compares the observed
/// variance of rates with the mean binomial variance expected from sampling
/// alone.
#[must_use]
pub fn assess(observations: &[EfficacyObservation], variance_floor: f64) -> Heterogeneity {
    let studies = observations
        .iter()
        .map(EfficacyObservation::record_ref)
        .collect::<BTreeSet<_>>()
        .len();
    if studies < 2 {
        return Heterogeneity::NotAssessable {
            observations: observations.len(),
            studies,
        };
    }

    #[allow(clippy::cast_precision_loss)]
    let k = observations.len() as f64;
    let mean = observations.iter().map(EfficacyObservation::rate).sum::<f64>() / k;
    let observed = observations
        .iter()
        .map(|o| (o.rate() - mean).powi(2))
        .sum::<f64>()
        / k;
    let std_dev = observed.sqrt();
    let coefficient_of_variation = if std_dev > 0.0 && mean > 0.0 {
        std_dev / mean
    } else {
        0.0
    };

    let expected = observations
        .iter()
        .map(|o| binomial_variance(o.rate(), o.sample_size().value, variance_floor))
        .sum::<f64>()
        / k;
    let i_squared = if observed > 0.0 {
        ((observed - expected) / observed * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    Heterogeneity::Assessed(HeterogeneityStats {
        category: categorize(coefficient_of_variation, i_squared),
        coefficient_of_variation,
        i_squared,
    })
}

fn categorize(cv: f64, i_squared: f64) -> HeterogeneityCategory {
    if cv < LOW_CV && i_squared < LOW_I_SQUARED {
        HeterogeneityCategory::Low
    } else if cv < MODERATE_CV && i_squared < MODERATE_I_SQUARED {
        HeterogeneityCategory::Moderate
    } else {
        HeterogeneityCategory::High
    }
}
