//! Canonical literature record and identity keys.
//!
//! Every provider-specific shape is converted into a [`LiteratureRecord`] at
//! the normalizer boundary. Nothing downstream of normalization branches on
//! provider identity again; the only trace of provenance is
//! `origin_sources` and the optional `source_id`.

use std::collections::BTreeSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Source-native identifier, e.g. `("semantic_scholar", "649def34f8be")`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct SourceId {
    pub source: String,
    pub native_id: String,
}

/// Stable identity key of a publication.
///
/// Built from the strongest identifier available, in order: PubMed id, DOI,
/// normalized title, source-native id. The prefix keeps keys from different
/// identifier spaces apart.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct RecordKey(String);

impl RecordKey {
    fn prefixed(prefix: &str, value: &str) -> Self {
        Self(format!("{prefix}:{value}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A table recovered from a full-text article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DataTable {
    /// Caption or title text, possibly empty.
    #[serde(default)]
    pub caption: String,
    /// Column header cells, possibly empty.
    #[serde(default)]
    pub header: Vec<String>,
    /// Data rows, each a list of cell texts.
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

/// One bibliographic item after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LiteratureRecord {
    pub source_id: Option<SourceId>,
    /// Normalized PubMed id (digits only).
    pub pmid: Option<String>,
    /// Normalized DOI (lower-cased, resolver prefix stripped).
    pub doi: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub full_text: Option<String>,
    pub year: Option<i32>,
    pub journal: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub is_open_access: bool,
    #[serde(default)]
    pub has_structured_tables: bool,
    #[serde(default)]
    pub tables: Vec<DataTable>,
    /// Names of every source that independently returned this record.
    pub origin_sources: BTreeSet<String>,
}

impl LiteratureRecord {
    /// Create an empty record returned by `source`.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source_id: None,
            pmid: None,
            doi: None,
            title: None,
            abstract_text: None,
            full_text: None,
            year: None,
            journal: None,
            authors: Vec::new(),
            is_open_access: false,
            has_structured_tables: false,
            tables: Vec::new(),
            origin_sources: BTreeSet::from([source.into()]),
        }
    }

    /// Identity key used for deduplication and as the observation back-reference.
    ///
    /// The strongest key among [`Self::identifier_keys`], then
    /// [`Self::title_key`], then [`Self::source_key`]. Returns `None` only for
    /// a record with no identifier and no usable title, which the normalizer
    /// never emits.
    #[must_use]
    pub fn identity_key(&self) -> Option<RecordKey> {
        self.identifier_keys()
            .into_iter()
            .next()
            .or_else(|| self.title_key())
            .or_else(|| self.source_key())
    }

    /// Keys of the cross-source identifiers the record carries: PMID first,
    /// then DOI.
    #[must_use]
    pub fn identifier_keys(&self) -> Vec<RecordKey> {
        let pmid = self
            .pmid
            .as_deref()
            .and_then(normalize_pmid)
            .map(|pmid| RecordKey::prefixed("pmid", &pmid));
        let doi = self
            .doi
            .as_deref()
            .and_then(normalize_doi)
            .map(|doi| RecordKey::prefixed("doi", &doi));
        pmid.into_iter().chain(doi).collect()
    }

    #[must_use]
    pub fn title_key(&self) -> Option<RecordKey> {
        let title = normalize_title(self.title.as_deref()?);
        (!title.is_empty()).then(|| RecordKey::prefixed("title", &title))
    }

    #[must_use]
    pub fn source_key(&self) -> Option<RecordKey> {
        self.source_id.as_ref().map(|id| {
            RecordKey::prefixed("source", &format!("{}:{}", id.source, id.native_id))
        })
    }

    /// Replace `has_structured_tables` with the truth about `tables`.
    pub fn sync_table_flag(&mut self) {
        self.has_structured_tables = !self.tables.is_empty();
    }

    /// Title (or identifier) for log lines.
    #[must_use]
    pub fn label(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.identity_key().map(|k| k.to_string()))
            .unwrap_or_else(|| "<unidentified>".to_string())
    }
}

/// Lower-case, strip punctuation, collapse whitespace.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    let stripped: String = title
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical DOI: trimmed, lower-cased, resolver / `doi:` prefix removed.
///
/// Returns `None` unless the result looks like a DOI (`10.` prefix).
#[must_use]
pub fn normalize_doi(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_lowercase();
    let mut doi = lowered.as_str();
    for prefix in [
        "https://doi.org/",
        "http://doi.org/",
        "https://dx.doi.org/",
        "http://dx.doi.org/",
        "doi.org/",
        "doi:",
    ] {
        if let Some(rest) = doi.strip_prefix(prefix) {
            doi = rest.trim_start();
            break;
        }
    }
    doi.starts_with("10.").then(|| doi.to_string())
}

/// Canonical PubMed id: digits only, leading zeros and `PMID:` prefix removed.
#[must_use]
pub fn normalize_pmid(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("PMID:")
        .or_else(|| trimmed.strip_prefix("pmid:"))
        .unwrap_or(trimmed)
        .trim();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let canonical = digits.trim_start_matches('0');
    (!canonical.is_empty()).then(|| canonical.to_string())
}
