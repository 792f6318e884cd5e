//! Best-effort mapping for records that match no known provider shape.
//!
//! Looks up each field under every alias the supported providers (and common
//! hand-made fixtures) use. A wrongly typed field is skipped instead of
//! failing the whole record.

use evidex_core::record::{normalize_doi, normalize_pmid};
use evidex_core::{LiteratureRecord, SourceId};
use serde_json::Value;

use crate::fields::{author_list, clean_text, flag, text_field, year_field};

const TITLE: &[&str] = &["title", "Title", "articleTitle"];
const ABSTRACT: &[&str] = &["abstract", "abstractText", "abstract_text", "summary"];
const PMID: &[&str] = &["pmid", "PMID", "pubmed_id", "uid"];
const DOI: &[&str] = &["doi", "DOI", "elocationid"];
const YEAR: &[&str] = &[
    "year",
    "pubYear",
    "pub_year",
    "publication_year",
    "pubdate",
    "date",
];
const JOURNAL: &[&str] = &["journal", "journalTitle", "fulljournalname", "venue", "server"];
const AUTHORS: &[&str] = &["authors", "authorString", "author_list", "author"];
const NATIVE_ID: &[&str] = &["id", "paperId", "source_id", "native_id"];
const OPEN_ACCESS: &[&str] = &["is_open_access", "isOpenAccess", "open_access"];

pub(crate) fn recover(source: &str, payload: &Value) -> LiteratureRecord {
    let mut record = LiteratureRecord::new(source);
    if !payload.is_object() {
        return record;
    }

    record.source_id = text_field(payload, NATIVE_ID).map(|native_id| SourceId {
        source: source.to_string(),
        native_id,
    });
    record.pmid = text_field(payload, PMID).and_then(|id| normalize_pmid(&id));
    // `externalIds` nests both identifiers on Semantic Scholar-like payloads.
    if let Some(ids) = payload.get("externalIds") {
        if record.pmid.is_none() {
            record.pmid = text_field(ids, &["PubMed", "pubmed"]).and_then(|id| normalize_pmid(&id));
        }
        if record.doi.is_none() {
            record.doi = text_field(ids, &["DOI", "doi"]).and_then(|doi| normalize_doi(&doi));
        }
    }
    if record.doi.is_none() {
        record.doi = text_field(payload, DOI).and_then(|doi| normalize_doi(&doi));
    }
    record.title = text_field(payload, TITLE);
    record.abstract_text = text_field(payload, ABSTRACT);
    record.year = year_field(payload, YEAR);
    record.journal = JOURNAL
        .iter()
        .filter_map(|key| payload.get(key))
        .find_map(|value| match value {
            Value::Object(_) => text_field(value, &["name", "title"]),
            Value::String(s) => clean_text(s),
            _ => None,
        });
    record.authors = AUTHORS
        .iter()
        .filter_map(|key| payload.get(key))
        .map(author_list)
        .find(|authors| !authors.is_empty())
        .unwrap_or_default();
    record.is_open_access = OPEN_ACCESS
        .iter()
        .filter_map(|key| payload.get(key))
        .find_map(flag)
        .unwrap_or(false);
    record
}
