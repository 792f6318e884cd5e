//! Deduplication properties over normalized provider batches.

use evidex_core::LiteratureRecord;
use evidex_records::{Provider, SourceBatch, SourcePriority, deduplicate, normalize_batch};
use pretty_assertions::assert_eq;
use serde_json::json;

fn pubmed_batch() -> SourceBatch {
    SourceBatch::new(
        Provider::PubMed,
        vec![
            json!({
                "uid": "31415926",
                "title": "Clopidogrel non-response and CYP2C19 genotype",
                "pubdate": "2019 Mar 5",
                "fulljournalname": "Pharmacogenomics Journal",
                "authors": [{"name": "Smith J"}]
            }),
            json!({
                "uid": "27182818",
                "title": "Platelet reactivity on clopidogrel",
                "pubdate": "2016"
            }),
        ],
    )
}

fn europe_pmc_batch() -> SourceBatch {
    SourceBatch::new(
        Provider::EuropePmc,
        vec![
            json!({
                "id": "31415926",
                "pmid": "31415926",
                "doi": "10.1038/tpj.2019.1",
                "title": "Clopidogrel non-response and CYP2C19 genotype.",
                "pubYear": "2020",
                "journalTitle": "Pharmacogenomics J",
                "isOpenAccess": "Y",
                "abstractText": "Non-response occurred in 30% of carriers."
            }),
            json!({
                "id": "PPR1",
                "title": "Loss-of-function alleles and antiplatelet therapy",
                "pubYear": "2022"
            }),
        ],
    )
}

fn normalized(batches: &[SourceBatch]) -> Vec<LiteratureRecord> {
    batches
        .iter()
        .flat_map(|batch| normalize_batch(batch).0)
        .collect()
}

#[test]
fn dedup_is_idempotent() {
    let priority = SourcePriority::default();
    let once = deduplicate(normalized(&[pubmed_batch(), europe_pmc_batch()]), &priority);
    let twice = deduplicate(once.clone(), &priority);
    assert_eq!(once, twice);
}

#[test]
fn feeding_a_source_twice_does_not_double_count() {
    let priority = SourcePriority::default();
    let single = deduplicate(normalized(&[pubmed_batch(), europe_pmc_batch()]), &priority);
    let doubled = deduplicate(
        normalized(&[
            pubmed_batch(),
            europe_pmc_batch(),
            pubmed_batch(),
            europe_pmc_batch(),
        ]),
        &priority,
    );
    assert_eq!(single.len(), 3);
    assert_eq!(single, doubled);
}

#[test]
fn higher_priority_metadata_wins_regardless_of_order() {
    let priority = SourcePriority::default();
    let forward = deduplicate(normalized(&[pubmed_batch(), europe_pmc_batch()]), &priority);
    let reversed = deduplicate(normalized(&[europe_pmc_batch(), pubmed_batch()]), &priority);
    assert_eq!(forward, reversed);

    let merged = forward
        .iter()
        .find(|r| r.pmid.as_deref() == Some("31415926"))
        .unwrap();
    assert_eq!(merged.year, Some(2019));
    assert_eq!(merged.journal.as_deref(), Some("Pharmacogenomics Journal"));
    // Fields the higher-priority record lacks are filled from the other source.
    assert_eq!(merged.doi.as_deref(), Some("10.1038/tpj.2019.1"));
    assert!(merged.is_open_access);
    assert_eq!(
        merged.origin_sources.iter().collect::<Vec<_>>(),
        vec!["europe_pmc", "pubmed"]
    );
}

#[test]
fn configured_priority_flips_precedence() {
    let priority = SourcePriority::new(["europe_pmc", "pubmed"]);
    let merged = deduplicate(normalized(&[pubmed_batch(), europe_pmc_batch()]), &priority);
    let record = merged
        .iter()
        .find(|r| r.pmid.as_deref() == Some("31415926"))
        .unwrap();
    assert_eq!(record.year, Some(2020));
    assert_eq!(record.journal.as_deref(), Some("Pharmacogenomics J"));
}

#[test]
fn reworded_titles_without_identifiers_stay_separate() {
    // Known limitation: only exact normalized titles merge.
    let batch_a = SourceBatch::new(
        "custom_index",
        vec![json!({"title": "CYP2C19 genotype and clopidogrel response"})],
    );
    let batch_b = SourceBatch::new(
        Provider::BioRxiv,
        vec![json!({"title": "Clopidogrel response and CYP2C19 genotype", "server": "biorxiv"})],
    );
    let merged = deduplicate(normalized(&[batch_a, batch_b]), &SourcePriority::default());
    assert_eq!(merged.len(), 2);
}

#[test]
fn zero_sources_is_valid_input() {
    let merged = deduplicate(normalized(&[]), &SourcePriority::default());
    assert!(merged.is_empty());
}

#[test]
fn copies_sharing_a_doi_merge_when_only_one_has_a_pmid() {
    let pubmed = SourceBatch::new(
        Provider::PubMed,
        vec![json!({
            "uid": "30000001",
            "title": "Clopidogrel non-response in stable angina",
            "elocationid": "doi: 10.1000/abc"
        })],
    );
    let semantic_scholar = SourceBatch::new(
        Provider::SemanticScholar,
        vec![json!({
            "paperId": "ab12cd34",
            "externalIds": {"DOI": "10.1000/ABC"},
            "title": "Clopidogrel non-response in stable angina",
            "year": 2020
        })],
    );
    let priority = SourcePriority::default();

    for batches in [
        [pubmed.clone(), semantic_scholar.clone()],
        [semantic_scholar, pubmed],
    ] {
        let merged = deduplicate(normalized(&batches), &priority);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].identity_key().unwrap().as_str(), "pmid:30000001");
        assert_eq!(merged[0].doi.as_deref(), Some("10.1000/abc"));
        assert_eq!(
            merged[0].origin_sources.iter().collect::<Vec<_>>(),
            vec!["pubmed", "semantic_scholar"]
        );
        assert_eq!(deduplicate(merged.clone(), &priority), merged);
    }
}

#[test]
fn identifiers_chain_across_three_sources() {
    // PubMed has the PMID, bioRxiv the DOI only, Europe PMC both.
    let batches = [
        SourceBatch::new(
            Provider::PubMed,
            vec![json!({"uid": "30000002", "title": "Genotype-guided therapy"})],
        ),
        SourceBatch::new(
            Provider::EuropePmc,
            vec![json!({
                "id": "30000002",
                "pmid": "30000002",
                "doi": "10.1101/2020.01.01.000002",
                "title": "Genotype guided therapy."
            })],
        ),
        SourceBatch::new(
            Provider::BioRxiv,
            vec![json!({
                "doi": "10.1101/2020.01.01.000002",
                "version": "2",
                "title": "Genotype-guided antiplatelet therapy (preprint)"
            })],
        ),
    ];
    let merged = deduplicate(normalized(&batches), &SourcePriority::default());
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].origin_sources.len(), 3);
}
