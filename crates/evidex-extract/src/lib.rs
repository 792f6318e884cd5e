//! # evidex-extract
//!
//! Efficacy extraction for Evidex.
//!
//! Turns canonical literature records into validated
//! [`EfficacyObservation`](evidex_core::EfficacyObservation)s through an
//! ordered chain of strategies:
//! - **Structured tables** whose caption or header names an efficacy outcome
//! - **Full-text patterns**: percentages and fractions near efficacy terms
//! - **Abstract patterns**: the same scan over the abstract only
//! - **NLP assist** (optional): candidates from an external service
//!
//! Every rate is normalized to the non-response direction. A record with no
//! numeric pattern contributes nothing; that is never an error.

pub mod chain;
pub mod context;
pub mod design;
pub mod sample_size;
pub mod strategies;
pub mod vocabulary;

mod scanner;

pub use chain::{ExtractionOutcome, Extractor};
pub use context::RecordContext;
pub use strategies::{
    AbstractStrategy, CandidateProposer, ExtractionStrategy, FullTextStrategy, NlpAssistStrategy,
    NlpCandidate, PrecomputedCandidates, TableStrategy,
};
pub use vocabulary::Direction;
