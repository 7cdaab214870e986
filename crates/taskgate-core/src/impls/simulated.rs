//! SimulatedHandler - stand-in work for demos and load experiments.
//!
//! Waits a uniformly random delay, then fails with a fixed probability.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimulationConfig;
use crate::error::ProcessingError;
use crate::ports::TaskHandler;

pub struct SimulatedHandler {
    min_delay: Duration,
    max_delay: Duration,
    failure_probability: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedHandler {
    /// `config` is not validated here. An inverted window is swapped and the
    /// probability is clamped into `[0, 1]` (NaN counts as 0); use
    /// `SimulationConfig::validate` to reject such values instead.
    pub fn new(config: &SimulationConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn seeded(config: &SimulationConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &SimulationConfig, rng: StdRng) -> Self {
        let min_ms = config.min_delay_ms.min(config.max_delay_ms);
        let max_ms = config.min_delay_ms.max(config.max_delay_ms);
        Self {
            min_delay: Duration::from_millis(min_ms),
            max_delay: Duration::from_millis(max_ms),
            failure_probability: if config.failure_probability.is_nan() {
                0.0
            } else {
                config.failure_probability.clamp(0.0, 1.0)
            },
            rng: Mutex::new(rng),
        }
    }

    /// Draw the delay and the outcome for one call.
    fn roll(&self) -> (Duration, bool) {
        // a poisoned lock only means another roll panicked; the rng is still usable
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let min = self.min_delay.as_millis() as u64;
        let max = self.max_delay.as_millis() as u64;
        let delay = Duration::from_millis(rng.gen_range(min..=max));
        let fails = rng.gen_bool(self.failure_probability);
        (delay, fails)
    }
}

impl Default for SimulatedHandler {
    fn default() -> Self {
        Self::new(&SimulationConfig::default())
    }
}

#[async_trait]
impl TaskHandler for SimulatedHandler {
    async fn process(&self, _payload: &serde_json::Value) -> Result<(), ProcessingError> {
        let (delay, fails) = self.roll();
        tokio::time::sleep(delay).await;
        if fails {
            return Err(ProcessingError::new("simulated failure"));
        }
        Ok(())
    }
}
