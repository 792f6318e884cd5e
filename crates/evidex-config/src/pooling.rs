//! Statistical pooling configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Lower bound on any per-observation variance.
const fn default_variance_floor() -> f64 {
    1e-6
}

/// Two-sided 95% normal quantile.
const fn default_z_score() -> f64 {
    1.96
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PoolingConfig {
    #[serde(default = "default_variance_floor")]
    pub variance_floor: f64,

    #[serde(default = "default_z_score")]
    pub z_score: f64,
}

impl Default for PoolingConfig {
    fn default() -> Self {
        Self {
            variance_floor: default_variance_floor(),
            z_score: default_z_score(),
        }
    }
}

impl PoolingConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.variance_floor.is_finite() && self.variance_floor > 0.0) {
            return Err(ConfigError::invalid(
                "pooling.variance_floor",
                "must be a positive finite number",
            ));
        }
        if !(self.z_score.is_finite() && self.z_score > 0.0) {
            return Err(ConfigError::invalid(
                "pooling.z_score",
                "must be a positive finite number",
            ));
        }
        Ok(())
    }
}
