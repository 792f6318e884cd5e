//! Pattern scanning over full text and abstracts.

use evidex_core::{EfficacyObservation, ExtractionMethod, LiteratureRecord};

use super::{ExtractionStrategy, collapse_duplicates};
use crate::context::RecordContext;
use crate::scanner;

fn scan_text(text: &str, ctx: &RecordContext<'_>, method: ExtractionMethod) -> Vec<EfficacyObservation> {
    let observations = scanner::scan(text, ctx.config.window_chars)
        .into_iter()
        .filter_map(|mention| {
            ctx.observation(mention.rate, mention.denominator, mention.subgroup, method)
        })
        .collect();
    collapse_duplicates(observations)
}

/// Percentages and fractions near efficacy vocabulary in the full text.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullTextStrategy;

impl ExtractionStrategy for FullTextStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::FullTextPattern
    }

    fn applies_to(&self, record: &LiteratureRecord) -> bool {
        record.full_text.is_some()
    }

    fn extract(&self, record: &LiteratureRecord, ctx: &RecordContext<'_>) -> Vec<EfficacyObservation> {
        record
            .full_text
            .as_deref()
            .map(|text| scan_text(text, ctx, self.method()))
            .unwrap_or_default()
    }
}

/// The same scan over the abstract only.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbstractStrategy;

impl ExtractionStrategy for AbstractStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::AbstractPattern
    }

    fn applies_to(&self, record: &LiteratureRecord) -> bool {
        record.abstract_text.is_some()
    }

    fn extract(&self, record: &LiteratureRecord, ctx: &RecordContext<'_>) -> Vec<EfficacyObservation> {
        record
            .abstract_text
            .as_deref()
            .map(|text| scan_text(text, ctx, self.method()))
            .unwrap_or_default()
    }
}
