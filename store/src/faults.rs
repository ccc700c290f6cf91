use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dto::Operation;

/// Decides whether a store call should fail with a simulated transient error.
///
/// Consulted once per operation, after the simulated latency.
pub trait FaultPolicy: Send + Sync {
    fn should_fail(&self, kind: &'static str, op: Operation) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoFaults;

impl FaultPolicy for NoFaults {
    fn should_fail(&self, _kind: &'static str, _op: Operation) -> bool {
        false
    }
}

/// Fails each call independently with a fixed probability.
///
/// The probability is clamped to `[0, 1]`. With the same seed the sequence of
/// outcomes is the same on every run.
#[derive(Debug)]
pub struct RandomFaults {
    probability: f64,
    rng: Mutex<StdRng>,
}

impl RandomFaults {
    pub fn seeded(probability: f64, seed: u64) -> Self {
        Self::with_rng(probability, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(probability: f64) -> Self {
        Self::with_rng(probability, StdRng::from_os_rng())
    }

    fn with_rng(probability: f64, rng: StdRng) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            rng: Mutex::new(rng),
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl FaultPolicy for RandomFaults {
    fn should_fail(&self, _kind: &'static str, _op: Operation) -> bool {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random::<f64>() < self.probability
    }
}
