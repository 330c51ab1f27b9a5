// src/lib.rs

//! `vermicular` - Multi-stage quantum search with and without decoupling pulses
//!
//! A search over a catalog of targets is run twice: once with plain
//! iterative amplitude amplification (the baseline) and once with the same
//! circuits interleaved with decoupling pulses (the augmented, VERMICULAR
//! variant). Stage success rates are multiplied into an overall success
//! and the two passes are compared side by side.

pub mod core;
pub mod operations;
pub mod circuits;
pub mod catalog;
pub mod backend;
pub mod simulation;
pub mod validation;
pub mod sequencer;
pub mod report;
pub mod config;
pub mod experiment;

// Re-export the most common types for easier top-level use
pub use core::{BitPattern, Result, SearchError, UnitId};
pub use operations::Operation;
pub use circuits::{CircuitBuilder, SearchCircuit, SearchStrategy, Strategy};
pub use catalog::{TargetCatalog, TargetFragment};
pub use backend::{ExecutionBackend, MeasurementSet, success_rate};
pub use simulation::{NoisyBackend, StateVectorBackend};
pub use sequencer::{AlgorithmRun, StageObserver, StagePlan, StageResult, StageSequencer, plan_pass};
pub use report::{ComparisonSummary, Ratio, ResultsDocument, compare};
pub use config::{ExperimentConfig, Platform};
pub use experiment::{Experiment, ExperimentOutcome};

// Example 1: A single stage on the ideal simulator
// One oracle + diffusion round over two units finds any target with
// certainty, with or without decoupling pulses.
/// ```
/// use vermicular::{BitPattern, SearchStrategy, StateVectorBackend, Strategy};
/// use vermicular::{ExecutionBackend, success_rate};
///
/// let target: BitPattern = "10".parse().unwrap();
/// let circuit = Strategy::Augmented.for_units(2).build(&target, 1).unwrap();
/// println!("{}", circuit);
/// assert_eq!(circuit.depth(), 22);
///
/// let mut backend = StateVectorBackend::with_seed(7);
/// let measurements = backend.submit(circuit, 500).unwrap();
/// assert_eq!(success_rate(&measurements, &target).unwrap(), 1.0);
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Full comparison over the reference catalog
// The baseline switches to two rounds once depth has accumulated and
// overshoots; the augmented pass keeps one round per stage.
/// ```
/// use vermicular::{Experiment, ExperimentConfig, Ratio, StateVectorBackend};
///
/// let experiment = Experiment::new(ExperimentConfig::default()).unwrap();
/// let mut backend = StateVectorBackend::with_seed(42);
/// let outcome = experiment.run(&mut backend).unwrap();
///
/// println!("{}", outcome.summary);
/// assert_eq!(outcome.summary.augmented_total(), 1.0);
/// assert!(outcome.summary.baseline_total() < 0.2);
/// match outcome.summary.overall() {
///     Ratio::Finite(v) => assert!(v > 5.0),
///     Ratio::Unbounded => {} // every baseline shot missed in a later stage
/// }
/// ```
#[doc(hidden)]
const _: () = ();
