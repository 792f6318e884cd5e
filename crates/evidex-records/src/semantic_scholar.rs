//! Semantic Scholar Graph API `paper/search` entries.

use evidex_core::record::{normalize_doi, normalize_pmid};
use evidex_core::{LiteratureRecord, SourceId};
use serde_json::Value;

use crate::fields::{author_list, clean_text, parse_year, scalar_text};

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct Paper {
    #[serde(default)]
    paper_id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(default)]
    authors: Option<Value>,
    #[serde(default)]
    year: Option<Value>,
    #[serde(default)]
    venue: Option<String>,
    #[serde(default)]
    journal: Option<Value>,
    #[serde(default)]
    external_ids: Option<ExternalIds>,
    #[serde(default)]
    is_open_access: Option<bool>,
    #[serde(default)]
    open_access_pdf: Option<Value>,
}

#[derive(serde::Deserialize)]
struct ExternalIds {
    #[serde(default, rename = "PubMed")]
    pubmed: Option<Value>,
    #[serde(default, rename = "DOI")]
    doi: Option<String>,
}

pub(crate) const SOURCE: &str = "semantic_scholar";

pub(crate) fn normalize(payload: &Value) -> Option<LiteratureRecord> {
    let paper: Paper = match serde_json::from_value(payload.clone()) {
        Ok(paper) => paper,
        Err(error) => {
            tracing::debug!(%error, "semantic scholar payload does not match paper shape");
            return None;
        }
    };

    let mut record = LiteratureRecord::new(SOURCE);
    record.source_id = paper
        .paper_id
        .as_deref()
        .and_then(clean_text)
        .map(|native_id| SourceId {
            source: SOURCE.to_string(),
            native_id,
        });
    if let Some(ids) = &paper.external_ids {
        record.pmid = ids
            .pubmed
            .as_ref()
            .and_then(scalar_text)
            .and_then(|id| normalize_pmid(&id));
        record.doi = ids.doi.as_deref().and_then(normalize_doi);
    }
    record.title = paper.title.as_deref().and_then(clean_text);
    record.abstract_text = paper.abstract_text.as_deref().and_then(clean_text);
    record.authors = paper.authors.as_ref().map(author_list).unwrap_or_default();
    record.year = paper.year.as_ref().and_then(parse_year);
    // `journal` is an object with `name`; `venue` is a plain string.
    record.journal = paper
        .journal
        .as_ref()
        .and_then(|j| j.get("name"))
        .and_then(scalar_text)
        .or_else(|| paper.venue.as_deref().and_then(clean_text));
    record.is_open_access = paper.is_open_access.unwrap_or(false)
        || paper
            .open_access_pdf
            .as_ref()
            .and_then(|pdf| pdf.get("url"))
            .and_then(Value::as_str)
            .is_some_and(|url| !url.is_empty());
    Some(record)
}
