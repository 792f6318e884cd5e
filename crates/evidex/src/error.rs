use std::time::Duration;

/// Failure of one record source during gathering.
///
/// Never fatal to an analysis: each one becomes a [`SourceGap`](crate::SourceGap)
/// in the report and the remaining sources are used.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("source {source_name} failed: {error}")]
    Fetch {
        source_name: String,
        #[source]
        error: anyhow::Error,
    },

    #[error("source {source_name} timed out after {timeout:?}")]
    Timeout {
        source_name: String,
        timeout: Duration,
    },
}

impl SourceError {
    #[must_use]
    pub fn source_name(&self) -> &str {
        match self {
            Self::Fetch { source_name, .. } | Self::Timeout { source_name, .. } => source_name,
        }
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
