//! ControllerBuilder - wiring of a controller and its queues.

use std::sync::Arc;

use super::core::{Controller, ControllerHandle};
use super::Topology;
use crate::config::{ConfigError, DispatchConfig};
use crate::domain::Gate;
use crate::impls::{RandomSelector, SimulatedHandler};
use crate::ports::{TaskHandler, WorkerSelector};

/// Builds and starts a controller.
///
/// # Example
/// ```ignore
/// let controller = ControllerBuilder::new(Topology::DynamicPool)
///     .with_initial_gate(Gate::Open)
///     .with_handler(Arc::new(SimulatedHandler::default()))
///     .spawn();
/// controller.submit(Task::new("1", payload))?;
/// ```
///
/// Unset parts default to a `Closed` gate, a `SimulatedHandler` with default
/// timings and an entropy-seeded `RandomSelector`.
pub struct ControllerBuilder {
    topology: Topology,
    initial_gate: Gate,
    handler: Option<Arc<dyn TaskHandler>>,
    selector: Option<Box<dyn WorkerSelector>>,
}

impl ControllerBuilder {
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            initial_gate: Gate::default(),
            handler: None,
            selector: None,
        }
    }

    /// Gate, simulated handler and selector taken from `config`.
    ///
    /// `config` is validated first. With a seed set, the handler and the
    /// selector get distinct streams derived from it, so whole runs are
    /// reproducible.
    pub fn from_config(topology: Topology, config: &DispatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (handler, selector) = match config.seed {
            Some(seed) => (
                SimulatedHandler::seeded(&config.simulation, seed),
                RandomSelector::seeded(seed.wrapping_add(1)),
            ),
            None => (
                SimulatedHandler::new(&config.simulation),
                RandomSelector::new(),
            ),
        };
        Ok(Self::new(topology)
            .with_initial_gate(config.initial_gate)
            .with_handler(Arc::new(handler))
            .with_selector(selector))
    }

    pub fn with_initial_gate(mut self, gate: Gate) -> Self {
        self.initial_gate = gate;
        self
    }

    pub fn with_handler(mut self, handler: Arc<dyn TaskHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Load-balancing policy. Ignored by `Topology::Single`.
    pub fn with_selector(mut self, selector: impl WorkerSelector + 'static) -> Self {
        self.selector = Some(Box::new(selector));
        self
    }

    /// Start the controller and its initial queues.
    ///
    /// # Panics
    /// When called outside a tokio runtime.
    pub fn spawn(self) -> ControllerHandle {
        let handler = self
            .handler
            .unwrap_or_else(|| Arc::new(SimulatedHandler::default()));
        let selector = self
            .selector
            .unwrap_or_else(|| Box::new(RandomSelector::new()));
        Controller::spawn(self.topology, self.initial_gate, handler, selector)
    }
}
