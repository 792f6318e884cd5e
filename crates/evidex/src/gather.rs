//! Concurrent retrieval from record sources.
//!
//! The engine itself never performs I/O. Callers that do can implement
//! [`RecordSource`] for each client and let [`gather_batches`] query them
//! together, bounded by one timeout. A failing or slow source becomes a
//! [`SourceGap`]; whatever completed is returned.

use std::time::Duration;

use async_trait::async_trait;
use evidex_records::{Provider, SourceBatch};
use futures::future::join_all;
use serde_json::Value;

use crate::error::SourceError;
use crate::report::SourceGap;

/// A bibliographic source that can be queried for raw records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Which normalizer the returned payloads go through.
    fn provider(&self) -> Provider;

    /// Raw records for `query`, in the source's own shape.
    async fn fetch(&self, query: &str) -> anyhow::Result<Vec<Value>>;
}

/// Completed batches plus the sources that did not complete.
#[derive(Debug, Default)]
pub struct Gathered {
    pub batches: Vec<SourceBatch>,
    pub gaps: Vec<SourceGap>,
}

/// Query every source concurrently, each bounded by `timeout`.
///
/// Batches keep the order of `sources`. Zero completed sources is a valid
/// result.
pub async fn gather_batches(
    sources: &[Box<dyn RecordSource>],
    query: &str,
    timeout: Duration,
) -> Gathered {
    let fetches = sources.iter().map(|source| fetch_one(source.as_ref(), query, timeout));
    let mut gathered = Gathered::default();
    for result in join_all(fetches).await {
        match result {
            Ok(batch) => {
                tracing::debug!(source = %batch.provider, records = batch.records.len(), "source completed");
                gathered.batches.push(batch);
            }
            Err(error) => {
                tracing::warn!(source = error.source_name(), %error, "source unavailable");
                gathered.gaps.push(SourceGap::from(&error));
            }
        }
    }
    gathered
}

async fn fetch_one(
    source: &dyn RecordSource,
    query: &str,
    timeout: Duration,
) -> Result<SourceBatch, SourceError> {
    let provider = source.provider();
    match tokio::time::timeout(timeout, source.fetch(query)).await {
        Ok(Ok(records)) => Ok(SourceBatch::new(provider, records)),
        Ok(Err(error)) => Err(SourceError::Fetch {
            source_name: provider.to_string(),
            error,
        }),
        Err(_) => Err(SourceError::Timeout {
            source_name: provider.to_string(),
            timeout,
        }),
    }
}
