//! Dispatch configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.
//!
//! # デフォルト値
//! - `initial_gate`: `Closed`（全 topology 共通）
//! - `simulation.min_delay_ms` / `max_delay_ms`: 3000 / 5000
//! - `simulation.failure_probability`: 0.2
//! - `seed`: なし（OS のエントロピーを使う）

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Gate;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Gate position a controller starts in (same for every topology).
    pub initial_gate: Gate,

    /// Parameters of the simulated task handler.
    pub simulation: SimulationConfig,

    /// Seeds the simulated handler and the random selector.
    pub seed: Option<u64>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            initial_gate: Gate::Closed,
            simulation: SimulationConfig::default(),
            seed: None,
        }
    }
}

impl DispatchConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub failure_probability: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 3_000,
            max_delay_ms: 5_000,
            failure_probability: 0.2,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_delay_ms > self.max_delay_ms {
            return Err(ConfigError::Invalid(format!(
                "min_delay_ms ({}) exceeds max_delay_ms ({})",
                self.min_delay_ms, self.max_delay_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.failure_probability) {
            return Err(ConfigError::Invalid(format!(
                "failure_probability must be within [0, 1], got {}",
                self.failure_probability
            )));
        }
        Ok(())
    }
}
