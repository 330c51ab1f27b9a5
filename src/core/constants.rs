//! Fixed policy values of the multi-stage comparison.

/// Policy constants shared by the circuit builders and the stage sequencer.
pub mod search_constants {
    /// Width of the search space (number of units) in the reference scenario.
    pub const SEARCH_WIDTH: usize = 2;

    /// Accumulated circuit depth at which the baseline strategy switches from
    /// [`BASELINE_SHALLOW_ITERATIONS`] to [`BASELINE_DEEP_ITERATIONS`].
    ///
    /// The rule is a fixed heuristic reproducing a specific comparison: once
    /// prior stages have accumulated this much depth, baseline searches add an
    /// extra iteration to compensate for assumed fidelity loss.
    pub const BASELINE_DEPTH_THRESHOLD: usize = 2;

    /// Baseline iteration count while accumulated depth is below the threshold.
    pub const BASELINE_SHALLOW_ITERATIONS: usize = 1;

    /// Baseline iteration count once accumulated depth reaches the threshold.
    pub const BASELINE_DEEP_ITERATIONS: usize = 2;

    /// Augmented strategy iteration count, independent of accumulated depth.
    pub const AUGMENTED_ITERATIONS: usize = 1;

    /// Outcomes with probability at or below this are treated as impossible.
    pub const PROBABILITY_TOLERANCE: f64 = 1e-12;

    /// Largest unit count the state-vector simulator accepts.
    pub const MAX_SIMULATED_UNITS: usize = 16;

    /// Seed used by the simulator when none is configured.
    pub const DEFAULT_SEED: u64 = 0x5eed_0f_9a7e;
}
