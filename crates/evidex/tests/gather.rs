//! Concurrent source gathering with failures and timeouts.

use std::time::Duration;

use async_trait::async_trait;
use evidex::{EvidenceEngine, EvidenceStatus, Provider, RecordSource, gather_batches};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

struct Fixed {
    provider: &'static str,
    records: Vec<Value>,
}

#[async_trait]
impl RecordSource for Fixed {
    fn provider(&self) -> Provider {
        Provider::from(self.provider)
    }

    async fn fetch(&self, _query: &str) -> anyhow::Result<Vec<Value>> {
        Ok(self.records.clone())
    }
}

struct Failing;

#[async_trait]
impl RecordSource for Failing {
    fn provider(&self) -> Provider {
        Provider::SemanticScholar
    }

    async fn fetch(&self, _query: &str) -> anyhow::Result<Vec<Value>> {
        anyhow::bail!("HTTP 429 Too Many Requests")
    }
}

struct Stalled;

#[async_trait]
impl RecordSource for Stalled {
    fn provider(&self) -> Provider {
        Provider::BioRxiv
    }

    async fn fetch(&self, _query: &str) -> anyhow::Result<Vec<Value>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }
}

fn pubmed_source() -> Box<dyn RecordSource> {
    Box::new(Fixed {
        provider: "pubmed",
        records: vec![json!({
            "uid": "60000001",
            "title": "Clopidogrel non-response in a registry",
            "abstract": "Non-response occurred in 120 of 400 patients."
        })],
    })
}

#[tokio::test(start_paused = true)]
async fn failures_and_timeouts_become_gaps() {
    let sources: Vec<Box<dyn RecordSource>> = vec![pubmed_source(), Box::new(Failing), Box::new(Stalled)];
    let gathered = gather_batches(&sources, "clopidogrel", Duration::from_secs(10)).await;

    assert_eq!(gathered.batches.len(), 1);
    assert_eq!(gathered.batches[0].provider, Provider::PubMed);

    let gaps: Vec<_> = gathered
        .gaps
        .iter()
        .map(|gap| (gap.source.as_str(), gap.timed_out))
        .collect();
    assert_eq!(gaps, vec![("semantic_scholar", false), ("biorxiv", true)]);
    assert!(gathered.gaps[0].reason.contains("429"));

    let report = EvidenceEngine::default().analyze_gathered("clopidogrel", gathered);
    assert_eq!(report.source_gaps.len(), 2);
    assert_eq!(report.estimate.status, EvidenceStatus::Pooled);
    assert!((report.estimate.overall_rate.unwrap() - 0.3).abs() < 1e-12);
}

#[tokio::test(start_paused = true)]
async fn all_sources_down_is_valid_input() {
    let sources: Vec<Box<dyn RecordSource>> = vec![Box::new(Failing), Box::new(Stalled)];
    let gathered = gather_batches(&sources, "clopidogrel", Duration::from_millis(50)).await;

    assert!(gathered.batches.is_empty());
    let report = EvidenceEngine::default().analyze_gathered("clopidogrel", gathered);
    assert_eq!(report.estimate.status, EvidenceStatus::NoRecords);
    assert_eq!(report.estimate.message.as_deref(), Some("no records found"));
}

#[tokio::test]
async fn no_sources_gathers_nothing() {
    let gathered = gather_batches(&[], "clopidogrel", Duration::from_secs(1)).await;
    assert!(gathered.batches.is_empty());
    assert!(gathered.gaps.is_empty());
}
