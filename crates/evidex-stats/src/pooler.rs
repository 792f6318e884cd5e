//! Inverse-variance pooling with dispersion-inflated intervals.

use std::collections::{BTreeMap, BTreeSet};

use evidex_config::PoolingConfig;
use evidex_core::{
    EfficacyObservation, EvidenceStatus, Heterogeneity, PooledEstimate, RecordKey,
};

use crate::{heterogeneity, quality, variance};

/// Combines observations into a [`PooledEstimate`].
#[derive(Debug, Clone, Default)]
pub struct Pooler {
    config: PoolingConfig,
}

impl Pooler {
    #[must_use]
    pub const fn new(config: PoolingConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &PoolingConfig {
        &self.config
    }

    /// Pool every observation for a drug.
    ///
    /// `records_found` is the number of canonical records retrieval produced;
    /// it only decides which empty status to report when there are no
    /// observations at all.
    ///
    /// The overall rate is pooled from each record's overall-population
    /// observations, or from its subgroup observations when the record has no
    /// overall one. Every subgroup label is also pooled on its own.
    #[must_use]
    pub fn pool(&self, observations: &[EfficacyObservation], records_found: usize) -> PooledEstimate {
        if observations.is_empty() {
            let estimate = if records_found == 0 {
                PooledEstimate::no_records()
            } else {
                PooledEstimate::no_extractable_data(records_found)
            };
            tracing::info!(records = records_found, status = %estimate.status, "nothing to pool");
            return estimate;
        }

        let overall_input = overall_input(observations);
        let mut estimate = self.estimate(&overall_input);
        estimate.estimated_sample_sizes = observations
            .iter()
            .filter(|o| o.sample_size().is_estimated)
            .count();
        estimate.subgroup_estimates = subgroups(observations)
            .into_iter()
            .map(|(label, group)| (label.to_string(), self.estimate(&group)))
            .collect();

        tracing::info!(
            records = records_found,
            studies = estimate.n_studies,
            observations = estimate.n_observations,
            subgroups = estimate.subgroup_estimates.len(),
            rate = ?estimate.overall_rate,
            "pooled efficacy estimate"
        );
        estimate
    }

    /// Pool one non-empty set of observations.
    fn estimate(&self, observations: &[EfficacyObservation]) -> PooledEstimate {
        let floor = self.config.variance_floor;
        let weights: Vec<f64> = observations
            .iter()
            .map(|o| variance::weight(o.rate(), o.sample_size().value, floor))
            .collect();
        let total_weight: f64 = weights.iter().sum();
        let rate = (observations
            .iter()
            .zip(&weights)
            .map(|(o, w)| w * o.rate())
            .sum::<f64>()
            / total_weight)
            .clamp(0.0, 1.0);

        let spread = dispersion(observations, &weights, rate);
        let standard_error = (spread / total_weight).sqrt();
        let margin = self.config.z_score * standard_error;

        let heterogeneity = heterogeneity::assess(observations, floor);
        let message = match heterogeneity {
            Heterogeneity::NotAssessable {
                observations,
                studies,
            } => Some(format!(
                "heterogeneity not assessable: {observations} observation(s) from {studies} record(s)"
            )),
            Heterogeneity::Assessed(_) => None,
        };

        PooledEstimate {
            status: EvidenceStatus::Pooled,
            overall_rate: Some(rate),
            ci_lower: Some((rate - margin).max(0.0)),
            ci_upper: Some((rate + margin).min(1.0)),
            n_studies: observations
                .iter()
                .map(EfficacyObservation::record_ref)
                .collect::<BTreeSet<_>>()
                .len(),
            n_observations: observations.len(),
            estimated_sample_sizes: observations
                .iter()
                .filter(|o| o.sample_size().is_estimated)
                .count(),
            heterogeneity,
            quality: quality::assess(observations),
            subgroup_estimates: BTreeMap::new(),
            message,
        }
    }
}

/// Variance multiplier: `max(1, Q / (k - 1))`, or 1 for a single observation.
///
/// Disagreement beyond sampling noise widens the interval instead of letting
/// many discordant studies produce a falsely narrow one.
fn dispersion(observations: &[EfficacyObservation], weights: &[f64], rate: f64) -> f64 {
    if observations.len() < 2 {
        return 1.0;
    }
    let q: f64 = observations
        .iter()
        .zip(weights)
        .map(|(o, w)| w * (o.rate() - rate).powi(2))
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let degrees = (observations.len() - 1) as f64;
    (q / degrees).max(1.0)
}

/// Per record: its overall observations, else its subgroup observations.
fn overall_input(observations: &[EfficacyObservation]) -> Vec<EfficacyObservation> {
    let mut by_record: BTreeMap<&RecordKey, Vec<&EfficacyObservation>> = BTreeMap::new();
    for observation in observations {
        by_record.entry(observation.record_ref()).or_default().push(observation);
    }
    by_record
        .into_values()
        .flat_map(|group| {
            let has_overall = group.iter().any(|o| o.is_overall());
            group
                .into_iter()
                .filter(move |o| !has_overall || o.is_overall())
                .cloned()
        })
        .collect()
}

fn subgroups(observations: &[EfficacyObservation]) -> BTreeMap<&str, Vec<EfficacyObservation>> {
    let mut groups: BTreeMap<&str, Vec<EfficacyObservation>> = BTreeMap::new();
    for observation in observations {
        if let Some(label) = observation.subgroup_label() {
            groups.entry(label).or_default().push(observation.clone());
        }
    }
    groups
}
