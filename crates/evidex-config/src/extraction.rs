//! Efficacy extraction configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Characters on either side of a number searched for efficacy vocabulary.
const fn default_window_chars() -> usize {
    80
}

/// Sample size assumed (and marked estimated) when the text states none.
const fn default_fallback_sample_size() -> u32 {
    100
}

const fn default_min_sample_size() -> u32 {
    10
}

const fn default_max_sample_size() -> u32 {
    1_000_000
}

/// Minimum confidence for candidates proposed by an external NLP service.
const fn default_nlp_min_confidence() -> f64 {
    0.6
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExtractionConfig {
    #[serde(default = "default_window_chars")]
    pub window_chars: usize,

    /// `0` disables the fallback: observations without a stated sample size
    /// are dropped.
    #[serde(default = "default_fallback_sample_size")]
    pub fallback_sample_size: u32,

    /// Stated sample sizes outside `[min_sample_size, max_sample_size]` are
    /// treated as false matches.
    #[serde(default = "default_min_sample_size")]
    pub min_sample_size: u32,

    #[serde(default = "default_max_sample_size")]
    pub max_sample_size: u32,

    #[serde(default = "default_nlp_min_confidence")]
    pub nlp_min_confidence: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            window_chars: default_window_chars(),
            fallback_sample_size: default_fallback_sample_size(),
            min_sample_size: default_min_sample_size(),
            max_sample_size: default_max_sample_size(),
            nlp_min_confidence: default_nlp_min_confidence(),
        }
    }
}

impl ExtractionConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.window_chars == 0 {
            return Err(ConfigError::invalid(
                "extraction.window_chars",
                "must be positive",
            ));
        }
        if self.min_sample_size == 0 || self.min_sample_size > self.max_sample_size {
            return Err(ConfigError::invalid(
                "extraction.min_sample_size",
                "must be positive and not exceed max_sample_size",
            ));
        }
        if !(0.0..=1.0).contains(&self.nlp_min_confidence) {
            return Err(ConfigError::invalid(
                "extraction.nlp_min_confidence",
                "must lie in [0, 1]",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ExtractionConfig::default();
        assert_eq!(config.window_chars, 80);
        assert_eq!(config.fallback_sample_size, 100);
        assert_eq!(config.min_sample_size, 10);
        assert_eq!(config.max_sample_size, 1_000_000);
        assert!((config.nlp_min_confidence - 0.6).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_window_rejected() {
        let config = ExtractionConfig {
            window_chars: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_sample_bounds_rejected() {
        let config = ExtractionConfig {
            min_sample_size: 500,
            max_sample_size: 100,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn nlp_confidence_out_of_range_rejected() {
        let config = ExtractionConfig {
            nlp_min_confidence: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
