//! bioRxiv / medRxiv `details` API entries.
//!
//! Preprints carry a DOI and a `server` name instead of a journal; they are
//! always open access.

use evidex_core::record::normalize_doi;
use evidex_core::{LiteratureRecord, SourceId};
use serde_json::Value;

use crate::fields::{author_list, clean_text, parse_year};

#[derive(serde::Deserialize)]
struct Preprint {
    #[serde(default)]
    doi: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(default)]
    authors: Option<Value>,
    #[serde(default)]
    date: Option<Value>,
    #[serde(default)]
    server: Option<String>,
    #[serde(default)]
    version: Option<Value>,
}

pub(crate) const SOURCE: &str = "biorxiv";

pub(crate) fn normalize(payload: &Value) -> Option<LiteratureRecord> {
    let preprint: Preprint = match serde_json::from_value(payload.clone()) {
        Ok(preprint) => preprint,
        Err(error) => {
            tracing::debug!(%error, "biorxiv payload does not match preprint shape");
            return None;
        }
    };

    let doi = preprint.doi.as_deref().and_then(normalize_doi);
    let mut record = LiteratureRecord::new(SOURCE);
    record.source_id = doi.clone().map(|doi| SourceId {
        source: SOURCE.to_string(),
        native_id: match preprint.version.as_ref().and_then(crate::fields::scalar_text) {
            Some(version) => format!("{doi}v{version}"),
            None => doi,
        },
    });
    record.doi = doi;
    record.title = preprint.title.as_deref().and_then(clean_text);
    record.abstract_text = preprint.abstract_text.as_deref().and_then(clean_text);
    record.authors = preprint.authors.as_ref().map(author_list).unwrap_or_default();
    record.year = preprint.date.as_ref().and_then(parse_year);
    record.journal = preprint.server.as_deref().and_then(server_label);
    record.is_open_access = true;
    Some(record)
}

fn server_label(server: &str) -> Option<String> {
    match server.trim().to_ascii_lowercase().as_str() {
        "biorxiv" => Some("bioRxiv".to_string()),
        "medrxiv" => Some("medRxiv".to_string()),
        other => clean_text(other),
    }
}
