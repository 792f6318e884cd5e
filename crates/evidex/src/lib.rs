//! # evidex
//!
//! Evidence aggregation engine: turns literature records about a drug,
//! retrieved from several inconsistent sources, into one pooled non-response
//! estimate with an honest confidence interval, heterogeneity, and quality.
//!
//! ```text
//! SourceBatch ─▶ normalize ─▶ deduplicate ─▶ extract ─▶ pool ─▶ PooledEstimate
//! ```
//!
//! Missing evidence is reported through
//! [`EvidenceStatus`](evidex_core::EvidenceStatus) and a message, never as a
//! default number.

pub mod engine;
pub mod error;
pub mod gather;
pub mod report;
pub mod telemetry;

pub use engine::EvidenceEngine;
pub use error::SourceError;
pub use gather::{Gathered, RecordSource, gather_batches};
pub use report::{EvidenceReport, SourceGap};

pub use evidex_config::EvidexConfig;
pub use evidex_core::{EvidenceStatus, PooledEstimate};
pub use evidex_records::{Provider, SourceBatch};
