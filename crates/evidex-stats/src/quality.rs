//! Evidence quality on a 0-5 scale.

use std::collections::BTreeSet;

use evidex_core::{
    EfficacyObservation, ExtractionMethod, QualityAssessment, QualityCategory, QualityComponents,
    StudyDesign,
};

const MAX_SCORE: f64 = 5.0;

/// Up to 2 points for the number of contributing records. A single study
/// earns none.
#[must_use]
pub fn study_count_points(studies: usize) -> f64 {
    match studies {
        0 | 1 => 0.0,
        2 => 1.0,
        3 | 4 => 1.5,
        _ => 2.0,
    }
}

/// Up to 1 point for the average sample size.
#[must_use]
pub fn sample_size_points(average: f64) -> f64 {
    if average >= 1000.0 {
        1.0
    } else if average >= 500.0 {
        0.7
    } else if average >= 100.0 {
        0.4
    } else {
        0.0
    }
}

#[must_use]
pub const fn method_points(method: ExtractionMethod) -> f64 {
    match method {
        ExtractionMethod::StructuredTable => 1.0,
        ExtractionMethod::FullTextPattern => 0.7,
        ExtractionMethod::AbstractPattern => 0.4,
        ExtractionMethod::NlpAssist => 0.2,
    }
}

#[must_use]
pub const fn design_points(design: StudyDesign) -> f64 {
    match design {
        StudyDesign::MetaAnalysis => 1.0,
        StudyDesign::RandomizedTrial => 0.5,
        StudyDesign::Observational | StudyDesign::Unknown => 0.0,
    }
}

/// Score a set of observations. `None` when there are none.
#[must_use]
pub fn assess(observations: &[EfficacyObservation]) -> Option<QualityAssessment> {
    if observations.is_empty() {
        return None;
    }
    let studies = observations
        .iter()
        .map(EfficacyObservation::record_ref)
        .collect::<BTreeSet<_>>()
        .len();
    #[allow(clippy::cast_precision_loss)]
    let average_size = observations
        .iter()
        .map(|o| f64::from(o.sample_size().value))
        .sum::<f64>()
        / observations.len() as f64;
    let best_method = observations.iter().map(EfficacyObservation::extraction_method).min()?;
    let best_design = observations.iter().map(EfficacyObservation::study_design_tier).min()?;

    let components = QualityComponents {
        study_count: study_count_points(studies),
        sample_size: sample_size_points(average_size),
        extraction_method: method_points(best_method),
        study_design: design_points(best_design),
    };
    let score = components.total().clamp(0.0, MAX_SCORE);
    Some(QualityAssessment {
        score,
        category: QualityCategory::from_score(score),
        components,
    })
}
