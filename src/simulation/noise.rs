// src/simulation/noise.rs

use crate::backend::{ExecutionBackend, MeasurementSet};
use crate::circuits::SearchCircuit;
use crate::core::{BitPattern, Result, SearchError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Wraps a backend and scrambles its outcomes with a probability that grows
/// with circuit depth.
///
/// Each shot is independently replaced by a uniformly random outcome with
/// probability `1 - (1 - error_rate)^depth`. This is a toy stand-in for
/// hardware, not a physical noise model: it only makes deeper circuits less
/// reliable.
pub struct NoisyBackend<B> {
    inner: B,
    error_rate: f64,
    name: String,
    rng: StdRng,
}

impl<B: ExecutionBackend> NoisyBackend<B> {
    /// # Errors
    /// `SearchError::Configuration` if `error_rate` is not in `[0, 1]`.
    pub fn new(inner: B, error_rate: f64, name: impl Into<String>, seed: u64) -> Result<Self> {
        if !error_rate.is_finite() || !(0.0..=1.0).contains(&error_rate) {
            return Err(SearchError::configuration(format!(
                "per-operation error rate {} must lie in [0, 1]",
                error_rate
            )));
        }
        Ok(Self { inner, error_rate, name: name.into(), rng: StdRng::seed_from_u64(seed) })
    }

    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Probability that a shot of a `depth`-operation circuit is scrambled.
    pub fn scramble_probability(&self, depth: usize) -> f64 {
        let depth = i32::try_from(depth).unwrap_or(i32::MAX);
        1.0 - (1.0 - self.error_rate).powi(depth)
    }
}

impl<B: ExecutionBackend> ExecutionBackend for NoisyBackend<B> {
    fn name(&self) -> &str {
        &self.name
    }

    fn submit(&mut self, circuit: SearchCircuit, shots: usize) -> Result<MeasurementSet> {
        let units = circuit.units();
        let scramble = self.scramble_probability(circuit.depth());
        let clean = self.inner.submit(circuit, shots)?;
        clean.validate_response(units, shots)?;
        if scramble <= 0.0 {
            return Ok(clean);
        }

        let outcomes = 1usize << units;
        let mut noisy = MeasurementSet::new(units);
        for (pattern, count) in clean.iter() {
            for _ in 0..count {
                if self.rng.random::<f64>() < scramble {
                    let index = self.rng.random_range(0..outcomes);
                    noisy.record(BitPattern::from_index(index, units))?;
                } else {
                    noisy.record(pattern.clone())?;
                }
            }
        }
        Ok(noisy)
    }
}
