//! Source priority configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default metadata precedence: primary biomedical index first, general
/// science index last.
fn default_priority() -> Vec<String> {
    ["pubmed", "europe_pmc", "semantic_scholar", "biorxiv"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourcesConfig {
    /// Source names, highest priority first. Sources not listed rank below
    /// every listed source.
    #[serde(default = "default_priority")]
    pub priority: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            priority: default_priority(),
        }
    }
}

impl SourcesConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for name in &self.priority {
            if name.trim().is_empty() {
                return Err(ConfigError::invalid("sources.priority", "empty source name"));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::invalid(
                    "sources.priority",
                    format!("duplicate source '{name}'"),
                ));
            }
        }
        Ok(())
    }
}
