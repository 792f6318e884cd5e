//! # evidex-records
//!
//! Record normalization and cross-source deduplication for Evidex.
//!
//! Converts raw, provider-shaped records into canonical
//! [`LiteratureRecord`]s and merges records describing the same publication.
//! Supported provider shapes:
//! - PubMed E-utilities `esummary` (plus merged `efetch` abstract)
//! - Europe PMC REST search results
//! - Semantic Scholar Graph API papers
//! - bioRxiv / medRxiv preprint details
//!
//! Anything else goes through a best-effort generic mapping. Full text and
//! tables attached by the full-text collaborator are read for every provider.

pub mod dedup;

mod biorxiv;
mod error;
mod europe_pmc;
mod fields;
mod generic;
mod pubmed;
mod semantic_scholar;

pub use dedup::{SourcePriority, deduplicate};
pub use error::NormalizeError;

use std::fmt;

use evidex_core::LiteratureRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fields::Enrichment;

// ── Types ──────────────────────────────────────────────────────────

/// Bibliographic source a batch came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Provider {
    PubMed,
    EuropePmc,
    SemanticScholar,
    BioRxiv,
    /// Any other source, identified by name. Records are mapped generically.
    Other(String),
}

impl Provider {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::PubMed => pubmed::SOURCE,
            Self::EuropePmc => europe_pmc::SOURCE,
            Self::SemanticScholar => semantic_scholar::SOURCE,
            Self::BioRxiv => biorxiv::SOURCE,
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for Provider {
    fn from(name: &str) -> Self {
        let lowered = name.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match lowered.as_str() {
            "pubmed" | "ncbi" => Self::PubMed,
            "europe_pmc" | "europepmc" | "epmc" => Self::EuropePmc,
            "semantic_scholar" | "semanticscholar" | "s2" => Self::SemanticScholar,
            "biorxiv" | "medrxiv" => Self::BioRxiv,
            _ => Self::Other(name.trim().to_string()),
        }
    }
}

impl From<String> for Provider {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<Provider> for String {
    fn from(provider: Provider) -> Self {
        provider.as_str().to_string()
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw records returned by one source for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceBatch {
    pub provider: Provider,
    pub records: Vec<Value>,
}

impl SourceBatch {
    #[must_use]
    pub fn new(provider: impl Into<Provider>, records: Vec<Value>) -> Self {
        Self {
            provider: provider.into(),
            records,
        }
    }
}

// ── Normalization ──────────────────────────────────────────────────

/// Convert one raw record into a canonical [`LiteratureRecord`].
///
/// The provider's typed mapping is tried first; a payload that does not fit
/// it, or that yields no identity through it, is read by the generic mapping
/// instead.
///
/// # Errors
///
/// Returns [`NormalizeError::MissingIdentity`] when the record has neither a
/// usable title nor any identifier.
pub fn normalize(provider: &Provider, payload: &Value) -> Result<LiteratureRecord, NormalizeError> {
    let typed = match provider {
        Provider::PubMed => pubmed::normalize(payload),
        Provider::EuropePmc => europe_pmc::normalize(payload),
        Provider::SemanticScholar => semantic_scholar::normalize(payload),
        Provider::BioRxiv => biorxiv::normalize(payload),
        Provider::Other(_) => None,
    };
    let mut record = match typed {
        Some(record) if record.identity_key().is_some() => record,
        _ => generic::recover(provider.as_str(), payload),
    };

    let enrichment = Enrichment::read(payload);
    if enrichment.full_text.is_some() {
        record.full_text = enrichment.full_text;
    }
    if !enrichment.tables.is_empty() {
        record.tables = enrichment.tables;
    }
    record.is_open_access |= enrichment.is_open_access.unwrap_or(false);
    record.sync_table_flag();

    if record.identity_key().is_none() {
        return Err(NormalizeError::MissingIdentity {
            source_name: provider.as_str().to_string(),
        });
    }
    Ok(record)
}

/// Normalize every record of a batch, skipping the ones without identity.
///
/// Returns the normalized records and the number of skipped ones.
#[must_use]
pub fn normalize_batch(batch: &SourceBatch) -> (Vec<LiteratureRecord>, usize) {
    let mut records = Vec::with_capacity(batch.records.len());
    let mut dropped = 0;
    for payload in &batch.records {
        match normalize(&batch.provider, payload) {
            Ok(record) => records.push(record),
            Err(error) => {
                tracing::debug!(source = %batch.provider, %error, "skipping malformed record");
                dropped += 1;
            }
        }
    }
    (records, dropped)
}
