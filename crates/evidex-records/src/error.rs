//! Normalization error types.

use thiserror::Error;

/// Why a raw record could not become a [`LiteratureRecord`].
///
/// Every other defect in a raw record is absorbed: the normalizer keeps
/// whatever fields it could recover.
///
/// [`LiteratureRecord`]: evidex_core::LiteratureRecord
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The record has neither a usable title nor any identifier.
    #[error("record from {source_name} has no title and no identifier")]
    MissingIdentity { source_name: String },
}
