//! PubMed E-utilities `esummary` records.
//!
//! `esummary` has no abstract; the retrieval collaborator merges it in from
//! `efetch` under `abstract` when available. The DOI lives either in
//! `articleids` (`idtype = "doi"`) or in `elocationid` (`"doi: 10.…"`).

use evidex_core::LiteratureRecord;
use evidex_core::record::{normalize_doi, normalize_pmid};
use serde_json::Value;

use crate::fields::{author_list, clean_text, parse_year, scalar_text};

#[derive(serde::Deserialize)]
struct PubMedSummary {
    #[serde(default)]
    uid: Option<Value>,
    #[serde(default)]
    pmid: Option<Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(default)]
    authors: Option<Value>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    fulljournalname: Option<String>,
    #[serde(default)]
    pubdate: Option<Value>,
    #[serde(default)]
    elocationid: Option<String>,
    #[serde(default)]
    articleids: Vec<ArticleId>,
}

#[derive(serde::Deserialize)]
struct ArticleId {
    #[serde(default)]
    idtype: String,
    #[serde(default)]
    value: String,
}

pub(crate) const SOURCE: &str = "pubmed";

/// Map an `esummary` result entry. `None` if the payload does not have the
/// `esummary` shape at all.
pub(crate) fn normalize(payload: &Value) -> Option<LiteratureRecord> {
    let summary: PubMedSummary = match serde_json::from_value(payload.clone()) {
        Ok(summary) => summary,
        Err(error) => {
            tracing::debug!(%error, "pubmed payload does not match esummary shape");
            return None;
        }
    };

    let pmid = summary
        .pmid
        .as_ref()
        .or(summary.uid.as_ref())
        .and_then(scalar_text)
        .and_then(|id| normalize_pmid(&id));

    let doi = summary
        .articleids
        .iter()
        .find(|id| id.idtype.eq_ignore_ascii_case("doi"))
        .and_then(|id| normalize_doi(&id.value))
        .or_else(|| summary.elocationid.as_deref().and_then(normalize_doi));

    let has_pmc = summary
        .articleids
        .iter()
        .any(|id| id.idtype.eq_ignore_ascii_case("pmc") && !id.value.trim().is_empty());

    let mut record = LiteratureRecord::new(SOURCE);
    record.source_id = pmid.clone().map(|native_id| evidex_core::SourceId {
        source: SOURCE.to_string(),
        native_id,
    });
    record.pmid = pmid;
    record.doi = doi;
    record.title = summary.title.as_deref().and_then(clean_text);
    record.abstract_text = summary.abstract_text.as_deref().and_then(clean_text);
    record.authors = summary.authors.as_ref().map(author_list).unwrap_or_default();
    record.journal = summary
        .fulljournalname
        .as_deref()
        .and_then(clean_text)
        .or_else(|| summary.source.as_deref().and_then(clean_text));
    record.year = summary.pubdate.as_ref().and_then(parse_year);
    record.is_open_access = has_pmc;
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIXTURE: &str = r#"{
        "uid": "31415926",
        "pubdate": "2019 Mar 5",
        "source": "Pharmacogenomics J",
        "fulljournalname": "The pharmacogenomics journal",
        "title": "Clopidogrel non-response and <i>CYP2C19</i> genotype.",
        "authors": [
            {"name": "Smith J", "authtype": "Author"},
            {"name": "Lee K", "authtype": "Author"}
        ],
        "elocationid": "doi: 10.1038/s41397-019-0001-1",
        "articleids": [
            {"idtype": "pubmed", "value": "31415926"},
            {"idtype": "pmc", "value": "PMC6543210"}
        ],
        "abstract": "Among 2,000 patients, 28% were non-responders."
    }"#;

    #[test]
    fn maps_esummary_fields() {
        let payload: Value = serde_json::from_str(FIXTURE).unwrap();
        let record = normalize(&payload).unwrap();

        assert_eq!(record.pmid.as_deref(), Some("31415926"));
        assert_eq!(record.doi.as_deref(), Some("10.1038/s41397-019-0001-1"));
        assert_eq!(
            record.title.as_deref(),
            Some("Clopidogrel non-response and CYP2C19 genotype.")
        );
        assert_eq!(record.authors, vec!["Smith J", "Lee K"]);
        assert_eq!(record.journal.as_deref(), Some("The pharmacogenomics journal"));
        assert_eq!(record.year, Some(2019));
        assert!(record.is_open_access, "a PMC id means open access");
        assert_eq!(
            record.source_id.as_ref().map(|id| id.native_id.as_str()),
            Some("31415926")
        );
    }

    #[test]
    fn numeric_uid_and_missing_fields() {
        let payload = serde_json::json!({"uid": 42, "title": "Short"});
        let record = normalize(&payload).unwrap();
        assert_eq!(record.pmid.as_deref(), Some("42"));
        assert!(record.authors.is_empty());
        assert_eq!(record.year, None);
        assert_eq!(record.journal, None);
    }

    #[test]
    fn wrong_shape_is_not_an_esummary() {
        let payload = serde_json::json!({"title": {"nested": true}});
        assert!(normalize(&payload).is_none());
    }
}
