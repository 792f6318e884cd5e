//! Structured tables recovered from full text.

use evidex_core::{DataTable, EfficacyObservation, ExtractionMethod, LiteratureRecord};

use super::{ExtractionStrategy, collapse_duplicates};
use crate::context::RecordContext;
use crate::sample_size::{SizeBounds, find_explicit};
use crate::scanner::{self, parse_count};
use crate::vocabulary::{self, Direction};

const SIZE_HEADERS: &[&str] = &["n", "no.", "no", "patients", "sample size", "subjects", "participants"];

/// One observation per data row of every table whose caption or header uses
/// efficacy vocabulary. Rows whose direction cannot be told from the row, its
/// column header, or the table heading are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableStrategy;

impl ExtractionStrategy for TableStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::StructuredTable
    }

    fn applies_to(&self, record: &LiteratureRecord) -> bool {
        record.has_structured_tables && record.full_text.is_some()
    }

    fn extract(&self, record: &LiteratureRecord, ctx: &RecordContext<'_>) -> Vec<EfficacyObservation> {
        let observations = record
            .tables
            .iter()
            .flat_map(|table| TableReader::new(table, ctx.bounds()).map(|reader| reader.read(ctx)))
            .flatten()
            .collect();
        collapse_duplicates(observations)
    }
}

/// Column layout and defaults of one matched table.
struct TableReader<'t> {
    table: &'t DataTable,
    direction: Option<Direction>,
    value_column: Option<usize>,
    size_column: Option<usize>,
    caption_size: Option<u32>,
    bounds: SizeBounds,
}

impl<'t> TableReader<'t> {
    /// `None` unless the caption or header is about efficacy.
    fn new(table: &'t DataTable, bounds: SizeBounds) -> Option<Self> {
        let heading = format!("{} {}", table.caption, table.header.join(" "));
        if !vocabulary::names_efficacy_topic(&heading) {
            return None;
        }
        let value_column = table
            .header
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, cell)| vocabulary::mentions_efficacy(cell))
            .map(|(i, _)| i);
        let size_column = table
            .header
            .iter()
            .position(|cell| SIZE_HEADERS.contains(&cell.trim().to_lowercase().as_str()));
        Some(Self {
            table,
            direction: vocabulary::dominant_direction(&heading),
            value_column,
            size_column,
            caption_size: find_explicit(&table.caption, bounds),
            bounds,
        })
    }

    fn read(&self, ctx: &RecordContext<'_>) -> Vec<EfficacyObservation> {
        self.table
            .rows
            .iter()
            .filter_map(|row| self.read_row(row, ctx))
            .collect()
    }

    fn read_row(&self, row: &[String], ctx: &RecordContext<'_>) -> Option<EfficacyObservation> {
        let (lead, _) = row.split_first()?;

        // A leading cell that is itself a value means an unlabeled row.
        let lead_has_value = !scanner::proportions(lead).is_empty();
        let value_index = match self.value_column {
            Some(i) if i < row.len() => i,
            _ if lead_has_value => 0,
            _ => (1..row.len()).find(|&i| {
                Some(i) != self.size_column && !scanner::proportions(&row[i]).is_empty()
            })?,
        };
        let proportion = scanner::proportions(&row[value_index]).into_iter().next()?.value;

        // "Responders" / "Non-responders" rows name a direction, not a subgroup.
        let lead_direction = vocabulary::dominant_direction(lead);
        let label = if lead_has_value || lead_direction.is_some() {
            None
        } else {
            vocabulary::row_label(lead)
        };
        let direction = lead_direction
            .or_else(|| {
                self.table
                    .header
                    .get(value_index)
                    .and_then(|cell| vocabulary::dominant_direction(cell))
            })
            .or(self.direction)?;

        let row_size = self
            .size_column
            .and_then(|i| row.get(i))
            .and_then(|cell| parse_count(cell.trim()))
            .filter(|n| self.bounds.contains(*n))
            .or_else(|| find_explicit(&row.join(" "), self.bounds));
        let local = row_size.or(proportion.denominator).or(self.caption_size);

        ctx.observation(
            direction.to_non_response(proportion.value),
            local,
            label.as_deref(),
            ExtractionMethod::StructuredTable,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidex_config::ExtractionConfig;
    use evidex_core::SampleSize;
    use pretty_assertions::assert_eq;

    fn table(caption: &str, header: &[&str], rows: &[&[&str]]) -> DataTable {
        DataTable {
            caption: caption.into(),
            header: header.iter().map(|s| (*s).to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|s| (*s).to_string()).collect())
                .collect(),
        }
    }

    fn record_with(tables: Vec<DataTable>) -> LiteratureRecord {
        let mut record = LiteratureRecord::new("pubmed");
        record.pmid = Some("5".into());
        record.full_text = Some("Full text body.".into());
        record.tables = tables;
        record.sync_table_flag();
        record
    }

    fn summary(observations: &[EfficacyObservation]) -> Vec<(Option<String>, f64, u32)> {
        observations
            .iter()
            .map(|o| {
                (
                    o.subgroup_label().map(str::to_string),
                    (o.rate() * 1000.0).round() / 1000.0,
                    o.sample_size().value,
                )
            })
            .collect()
    }

    #[test]
    fn response_table_rows_become_non_response_observations() {
        let record = record_with(vec![table(
            "Clopidogrel response by CYP2C19 phenotype (n = 2,000)",
            &["Phenotype", "Response"],
            &[&["Overall", "72%"], &["PM", "45%"], &["EM", "85%"]],
        )]);
        let config = ExtractionConfig::default();
        let ctx = RecordContext::new(&record, &config).unwrap();
        let obs = TableStrategy.extract(&record, &ctx);

        assert_eq!(
            summary(&obs),
            vec![
                (None, 0.28, 2000),
                (Some("PM".into()), 0.55, 2000),
                (Some("EM".into()), 0.15, 2000),
            ]
        );
        assert!(obs.iter().all(|o| o.extraction_method() == ExtractionMethod::StructuredTable));
        assert!(obs.iter().all(|o| !o.sample_size().is_estimated));
    }

    #[test]
    fn row_sizes_and_fractions_override_caption() {
        let record = record_with(vec![table(
            "Non-response by genotype",
            &["Genotype", "N", "Non-response"],
            &[
                &["Poor metabolizers", "120", "54 (45%)"],
                &["*1/*1", "", "30/200"],
            ],
        )]);
        let config = ExtractionConfig::default();
        let ctx = RecordContext::new(&record, &config).unwrap();
        let obs = TableStrategy.extract(&record, &ctx);

        assert_eq!(
            summary(&obs),
            vec![(Some("PM".into()), 0.45, 120), (Some("*1/*1".into()), 0.15, 200)]
        );
    }

    #[test]
    fn direction_rows_are_overall() {
        let record = record_with(vec![table(
            "Treatment outcome",
            &["Group", "%"],
            &[&["Responders", "70%"], &["Non-responders", "30%"]],
        )]);
        let config = ExtractionConfig::default();
        let ctx = RecordContext::new(&record, &config).unwrap();
        let obs = TableStrategy.extract(&record, &ctx);

        // Both rows state the same 30% non-response.
        assert_eq!(obs.len(), 1);
        assert!(obs[0].is_overall());
        assert!((obs[0].rate() - 0.30).abs() < 1e-9);
        assert_eq!(obs[0].sample_size(), SampleSize::estimated(100));
    }

    #[test]
    fn unrelated_tables_are_ignored() {
        let record = record_with(vec![table(
            "Baseline characteristics",
            &["Variable", "Value"],
            &[&["Male sex", "64%"], &["Diabetes", "31%"]],
        )]);
        let config = ExtractionConfig::default();
        let ctx = RecordContext::new(&record, &config).unwrap();
        assert!(TableStrategy.extract(&record, &ctx).is_empty());
    }

    #[test]
    fn outcome_rows_without_direction_are_skipped() {
        let record = record_with(vec![table(
            "Clinical outcomes at 12 months",
            &["Outcome", "Rate"],
            &[&["Stent thrombosis", "12%"], &["Major bleeding", "3%"]],
        )]);
        let config = ExtractionConfig::default();
        let ctx = RecordContext::new(&record, &config).unwrap();
        assert!(TableStrategy.extract(&record, &ctx).is_empty());
    }

    #[test]
    fn requires_tables_and_full_text() {
        let mut record = record_with(vec![DataTable::default()]);
        assert!(TableStrategy.applies_to(&record));
        record.full_text = None;
        assert!(!TableStrategy.applies_to(&record));
        record.full_text = Some("text".into());
        record.tables.clear();
        record.sync_table_flag();
        assert!(!TableStrategy.applies_to(&record));
    }
}
