//! Europe PMC REST `search` results (`resultType=core`).

use evidex_core::record::{normalize_doi, normalize_pmid};
use evidex_core::{LiteratureRecord, SourceId};
use serde_json::Value;

use crate::fields::{author_list, clean_text, flag, parse_year, scalar_text};

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct EuropePmcResult {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    pmid: Option<Value>,
    #[serde(default)]
    pmcid: Option<String>,
    #[serde(default)]
    doi: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    abstract_text: Option<String>,
    #[serde(default)]
    author_string: Option<String>,
    #[serde(default)]
    author_list: Option<AuthorList>,
    #[serde(default)]
    pub_year: Option<Value>,
    #[serde(default)]
    journal_title: Option<String>,
    #[serde(default)]
    journal_info: Option<JournalInfo>,
    #[serde(default)]
    is_open_access: Option<Value>,
}

#[derive(serde::Deserialize)]
struct AuthorList {
    #[serde(default)]
    author: Vec<Author>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct Author {
    #[serde(default)]
    full_name: Option<String>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct JournalInfo {
    #[serde(default)]
    year_of_publication: Option<Value>,
    #[serde(default)]
    journal: Option<Journal>,
}

#[derive(serde::Deserialize)]
struct Journal {
    #[serde(default)]
    title: Option<String>,
}

pub(crate) const SOURCE: &str = "europe_pmc";

pub(crate) fn normalize(payload: &Value) -> Option<LiteratureRecord> {
    let result: EuropePmcResult = match serde_json::from_value(payload.clone()) {
        Ok(result) => result,
        Err(error) => {
            tracing::debug!(%error, "europe pmc payload does not match result shape");
            return None;
        }
    };

    let native_id = result.id.as_ref().and_then(scalar_text);
    let mut record = LiteratureRecord::new(SOURCE);
    record.source_id = native_id.map(|native_id| SourceId {
        source: SOURCE.to_string(),
        native_id,
    });
    record.pmid = result
        .pmid
        .as_ref()
        .and_then(scalar_text)
        .and_then(|id| normalize_pmid(&id));
    record.doi = result.doi.as_deref().and_then(normalize_doi);
    record.title = result.title.as_deref().and_then(clean_text);
    record.abstract_text = result.abstract_text.as_deref().and_then(clean_text);

    let structured_authors: Vec<String> = result
        .author_list
        .map(|list| {
            list.author
                .iter()
                .filter_map(|a| a.full_name.as_deref().and_then(clean_text))
                .collect()
        })
        .unwrap_or_default();
    record.authors = if structured_authors.is_empty() {
        result
            .author_string
            .map(|s| author_list(&Value::String(s)))
            .unwrap_or_default()
    } else {
        structured_authors
    };

    record.journal = result.journal_title.as_deref().and_then(clean_text).or_else(|| {
        result
            .journal_info
            .as_ref()
            .and_then(|info| info.journal.as_ref())
            .and_then(|j| j.title.as_deref())
            .and_then(clean_text)
    });
    record.year = result.pub_year.as_ref().and_then(parse_year).or_else(|| {
        result
            .journal_info
            .as_ref()
            .and_then(|info| info.year_of_publication.as_ref())
            .and_then(parse_year)
    });
    record.is_open_access = result.is_open_access.as_ref().and_then(flag).unwrap_or(false)
        || result.pmcid.is_some_and(|id| !id.trim().is_empty());
    Some(record)
}
