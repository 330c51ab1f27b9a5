// src/circuits/strategy.rs

//! The two competing circuit-construction strategies.

use super::{CircuitBuilder, SearchCircuit};
use crate::core::{
    AUGMENTED_ITERATIONS, BASELINE_DEEP_ITERATIONS, BASELINE_DEPTH_THRESHOLD,
    BASELINE_SHALLOW_ITERATIONS, BitPattern, Result, SearchError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Anything that can turn a target pattern and an iteration count into a
/// complete search circuit.
pub trait SearchStrategy {
    /// Builds the circuit searching for `target` with `iterations`
    /// oracle + diffusion rounds.
    fn build(&self, target: &BitPattern, iterations: usize) -> Result<SearchCircuit>;
}

/// Circuit-construction policy compared by the experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Plain iterative search: superposition, then `iterations` rounds of
    /// oracle + diffusion.
    Baseline,
    /// The same search with a decoupling pulse on every unit after the
    /// superposition, between consecutive rounds, and after the last round.
    Augmented,
}

impl Strategy {
    /// Both strategies, in the order the experiment runs them.
    pub const ALL: [Strategy; 2] = [Strategy::Baseline, Strategy::Augmented];

    /// Key used for this strategy in result artifacts.
    pub fn key(&self) -> &'static str {
        match self {
            Strategy::Baseline => "standard",
            Strategy::Augmented => "vermicular",
        }
    }

    /// Iteration count for the next stage given the summed depth of all
    /// earlier stages in the same pass.
    ///
    /// Baseline uses one round until the accumulated depth reaches
    /// [`BASELINE_DEPTH_THRESHOLD`], two from then on. Augmented always uses
    /// [`AUGMENTED_ITERATIONS`].
    pub fn iterations_for(&self, cumulative_depth: usize) -> usize {
        match self {
            Strategy::Baseline if cumulative_depth < BASELINE_DEPTH_THRESHOLD => {
                BASELINE_SHALLOW_ITERATIONS
            }
            Strategy::Baseline => BASELINE_DEEP_ITERATIONS,
            Strategy::Augmented => AUGMENTED_ITERATIONS,
        }
    }

    /// Binds the strategy to a unit count, giving a [`SearchStrategy`].
    pub fn for_units(self, units: usize) -> StrategyBuilder {
        StrategyBuilder { strategy: self, units }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Baseline => f.pad("Standard"),
            Strategy::Augmented => f.pad("VERMICULAR"),
        }
    }
}

/// A [`Strategy`] bound to the width of the search space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyBuilder {
    strategy: Strategy,
    units: usize,
}

impl StrategyBuilder {
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn units(&self) -> usize {
        self.units
    }

    fn baseline(&self, target: &BitPattern, iterations: usize) -> Result<SearchCircuit> {
        let mut builder = CircuitBuilder::new(self.units).superposition();
        for _ in 0..iterations {
            builder = builder.oracle(target)?.diffusion();
        }
        Ok(builder.build())
    }

    fn augmented(&self, target: &BitPattern, iterations: usize) -> Result<SearchCircuit> {
        let mut builder = CircuitBuilder::new(self.units).superposition().decoupling_pulse();
        for round in 0..iterations {
            builder = builder.oracle(target)?.diffusion();
            if round + 1 < iterations {
                builder = builder.decoupling_pulse();
            }
        }
        Ok(builder.decoupling_pulse().build())
    }
}

impl SearchStrategy for StrategyBuilder {
    fn build(&self, target: &BitPattern, iterations: usize) -> Result<SearchCircuit> {
        if iterations == 0 {
            return Err(SearchError::configuration("iteration count must be at least 1"));
        }
        let circuit = match self.strategy {
            Strategy::Baseline => self.baseline(target, iterations)?,
            Strategy::Augmented => self.augmented(target, iterations)?,
        };
        debug!(
            strategy = %self.strategy,
            target = %target,
            iterations,
            depth = circuit.depth(),
            "built search circuit"
        );
        Ok(circuit)
    }
}
