//! WorkerSelector implementations.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ports::WorkerSelector;

/// Uniformly random choice among the live queues.
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence of choices for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerSelector for RandomSelector {
    fn select(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len.max(1))
    }
}

/// Cycles through the queues in index order.
#[derive(Debug, Default)]
pub struct RoundRobinSelector {
    next: usize,
}

impl RoundRobinSelector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkerSelector for RoundRobinSelector {
    fn select(&mut self, len: usize) -> usize {
        let picked = self.next % len.max(1);
        self.next = picked + 1;
        picked
    }
}
