// src/simulation/mod.rs

//! Local execution backends.
//!
//! [`StateVectorBackend`] evaluates a circuit exactly and samples shots from
//! the resulting distribution; it is an ideal, noiseless device.
//! [`NoisyBackend`] wraps any backend with a simple depth-dependent
//! scrambling of outcomes, used to emulate hardware platforms.

pub(crate) mod engine;
mod noise;

pub use noise::NoisyBackend;

use crate::backend::{ExecutionBackend, MeasurementSet};
use crate::circuits::SearchCircuit;
use crate::core::constants::search_constants::{DEFAULT_SEED, PROBABILITY_TOLERANCE};
use crate::core::{BitPattern, Result, SearchError};
use crate::validation::check_normalization;
use engine::SimulationEngine;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

/// Ideal sampling backend driven by a seeded PRNG, so repeated runs with the
/// same seed produce identical measurements.
pub struct StateVectorBackend {
    rng: StdRng,
}

impl StateVectorBackend {
    /// Creates a backend seeded with the crate default seed.
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Creates a backend with an explicit seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Exact outcome distribution of `circuit` run from `|0...0⟩`.
    ///
    /// Outcomes with probability at or below `PROBABILITY_TOLERANCE` are
    /// dropped and the remainder renormalised, so numerically impossible
    /// outcomes are never sampled.
    ///
    /// # Errors
    /// `SearchError::InvalidOperation` for operations addressing units outside
    /// the circuit, `SearchError::Simulation` if the state loses normalisation.
    pub fn outcome_distribution(&self, circuit: &SearchCircuit) -> Result<Vec<(BitPattern, f64)>> {
        let mut engine = SimulationEngine::init(circuit.units())?;
        for op in circuit.operations() {
            engine.apply_operation(op)?;
        }
        check_normalization(engine.state(), None)?;

        let kept: Vec<(usize, f64)> = engine
            .state()
            .probabilities()
            .into_iter()
            .enumerate()
            .filter(|(_, p)| *p > PROBABILITY_TOLERANCE)
            .collect();
        let total: f64 = kept.iter().map(|(_, p)| p).sum();
        if kept.is_empty() || total <= PROBABILITY_TOLERANCE {
            return Err(SearchError::Simulation {
                message: "No outcome has a non-negligible probability".to_string(),
            });
        }

        Ok(kept
            .into_iter()
            .map(|(k, p)| (BitPattern::from_index(k, circuit.units()), p / total))
            .collect())
    }
}

impl Default for StateVectorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionBackend for StateVectorBackend {
    fn name(&self) -> &str {
        "Local state-vector simulator"
    }

    fn submit(&mut self, circuit: SearchCircuit, shots: usize) -> Result<MeasurementSet> {
        if shots == 0 {
            return Err(SearchError::configuration("shot count must be positive"));
        }
        let distribution = self
            .outcome_distribution(&circuit)
            .map_err(|e| SearchError::backend(format!("simulation failed: {}", e)))?;
        trace!(outcomes = distribution.len(), depth = circuit.depth(), "sampling circuit");

        let mut counts = vec![0usize; distribution.len()];
        for _ in 0..shots {
            let p_sample: f64 = self.rng.random::<f64>();
            let mut cumulative = 0.0;
            // Falls back to the last outcome if rounding leaves p_sample above the sum.
            let mut chosen = distribution.len() - 1;
            for (i, (_, p)) in distribution.iter().enumerate() {
                cumulative += *p;
                if p_sample < cumulative {
                    chosen = i;
                    break;
                }
            }
            counts[chosen] += 1;
        }

        let mut measurements = MeasurementSet::new(circuit.units());
        for ((pattern, _), count) in distribution.into_iter().zip(counts) {
            measurements.record_many(pattern, count)?;
        }
        Ok(measurements)
    }
}
