// src/sequencer/mod.rs

//! Runs one strategy over every target of a catalog, stage by stage.
//!
//! Overall success of a pass is the product of its stage success rates: the
//! chained search only succeeds if every stage does.

use crate::backend::{ExecutionBackend, success_rate};
use crate::catalog::{TargetCatalog, TargetFragment};
use crate::circuits::{SearchCircuit, SearchStrategy, Strategy};
use crate::core::{BitPattern, Result, SearchError};
use crate::validation::check_rate;
use std::time::{Duration, Instant};
use tracing::info;

/// Outcome of a single stage of a pass.
#[derive(Debug, Clone, PartialEq)]
pub struct StageResult {
    target: TargetFragment,
    iterations: usize,
    success_rate: f64,
    depth: usize,
    elapsed: Duration,
}

impl StageResult {
    /// # Errors
    /// `SearchError::InvalidOperation` if `success_rate` is not in `[0, 1]`.
    pub fn new(
        target: TargetFragment,
        iterations: usize,
        success_rate: f64,
        depth: usize,
        elapsed: Duration,
    ) -> Result<Self> {
        check_rate(success_rate)?;
        Ok(Self { target, iterations, success_rate, depth, elapsed })
    }

    pub fn target(&self) -> &TargetFragment {
        &self.target
    }

    /// Oracle + diffusion rounds used for this stage.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }

    /// Operation count of the stage's circuit.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Wall time spent waiting on the backend.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// All stages of one strategy pass, in catalog order.
///
/// The total success is always derived from the stored stages, so it can
/// never go stale.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmRun {
    strategy: Strategy,
    stages: Vec<StageResult>,
}

impl AlgorithmRun {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy, stages: Vec::new() }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn stages(&self) -> &[StageResult] {
        &self.stages
    }

    pub fn push(&mut self, stage: StageResult) {
        self.stages.push(stage);
    }

    /// Summed depth of all recorded stages.
    pub fn cumulative_depth(&self) -> usize {
        self.stages.iter().map(StageResult::depth).sum()
    }

    /// Product of all stage success rates; `0.0` for a run with no stages.
    pub fn total_success(&self) -> f64 {
        if self.stages.is_empty() {
            return 0.0;
        }
        self.stages.iter().map(StageResult::success_rate).product()
    }

    /// Running product of stage success rates after each stage.
    pub fn cumulative_success(&self) -> Vec<f64> {
        self.stages
            .iter()
            .scan(1.0, |acc, stage| {
                *acc *= stage.success_rate();
                Some(*acc)
            })
            .collect()
    }

    /// Per-stage success rates, in order.
    pub fn stage_rates(&self) -> Vec<f64> {
        self.stages.iter().map(StageResult::success_rate).collect()
    }
}

/// Observer notified after every completed stage, e.g. to draw progress.
pub trait StageObserver {
    /// Called once before the first stage of a pass.
    fn pass_started(&mut self, _strategy: Strategy, _catalog: &TargetCatalog) {}

    fn stage_completed(&mut self, stage_index: usize, stage: &StageResult, cumulative_depth: usize);
}

impl StageObserver for () {
    fn stage_completed(&mut self, _: usize, _: &StageResult, _: usize) {}
}

/// Circuit and iteration count of one stage, decided before execution.
#[derive(Debug, Clone, PartialEq)]
pub struct StagePlan {
    pub iterations: usize,
    pub circuit: SearchCircuit,
}

/// Builds every stage circuit of a `strategy` pass over `catalog`.
///
/// The iteration count of each stage follows [`Strategy::iterations_for`]
/// applied to the depth of the circuits planned before it. Depth does not
/// depend on measured results, so the plan is exactly what a pass runs.
pub fn plan_pass(strategy: Strategy, catalog: &TargetCatalog) -> Result<Vec<StagePlan>> {
    let builder = strategy.for_units(catalog.width());
    let mut cumulative_depth = 0usize;
    let mut plan = Vec::with_capacity(catalog.len());
    for target in catalog {
        let iterations = strategy.iterations_for(cumulative_depth);
        let circuit = builder.build(target.pattern(), iterations)?;
        cumulative_depth += circuit.depth();
        plan.push(StagePlan { iterations, circuit });
    }
    Ok(plan)
}

/// Drives strategy passes against one backend with a fixed shot count.
///
/// Stages run strictly one after another; the only shared state is the
/// pass-local cumulative depth, which starts at zero for every pass.
pub struct StageSequencer<'a, B: ExecutionBackend + ?Sized> {
    backend: &'a mut B,
    shots: usize,
}

impl<'a, B: ExecutionBackend + ?Sized> StageSequencer<'a, B> {
    /// # Errors
    /// `SearchError::Configuration` if `shots` is zero.
    pub fn new(backend: &'a mut B, shots: usize) -> Result<Self> {
        if shots == 0 {
            return Err(SearchError::configuration("shot count must be positive"));
        }
        Ok(Self { backend, shots })
    }

    pub fn shots(&self) -> usize {
        self.shots
    }

    /// Runs `strategy` over every target of `catalog`.
    pub fn run(&mut self, strategy: Strategy, catalog: &TargetCatalog) -> Result<AlgorithmRun> {
        self.run_observed(strategy, catalog, &mut ())
    }

    /// Same as [`StageSequencer::run`], reporting each stage to `observer`.
    ///
    /// # Errors
    /// Every stage circuit is built before the first submission, so
    /// configuration errors surface before the backend is called. Backend
    /// errors abort the pass. Nothing is retried.
    pub fn run_observed<O: StageObserver + ?Sized>(
        &mut self,
        strategy: Strategy,
        catalog: &TargetCatalog,
        observer: &mut O,
    ) -> Result<AlgorithmRun> {
        let plan = plan_pass(strategy, catalog)?;
        let mut run = AlgorithmRun::new(strategy);
        let mut cumulative_depth = 0usize;
        observer.pass_started(strategy, catalog);

        for (index, (target, stage_plan)) in catalog.iter().zip(plan).enumerate() {
            let StagePlan { iterations, circuit } = stage_plan;
            let depth = circuit.depth();

            let (rate, elapsed) = self.measure(circuit, target.pattern())?;
            let stage = StageResult::new(target.clone(), iterations, rate, depth, elapsed)?;
            cumulative_depth += depth;

            info!(
                strategy = %strategy,
                stage = index + 1,
                target = %target,
                success_rate = rate,
                depth,
                cumulative_depth,
                elapsed_ms = elapsed.as_millis() as u64,
                "stage completed"
            );
            observer.stage_completed(index, &stage, cumulative_depth);
            run.push(stage);
        }

        info!(strategy = %strategy, total_success = run.total_success(), "pass completed");
        Ok(run)
    }

    fn measure(&mut self, circuit: SearchCircuit, target: &BitPattern) -> Result<(f64, Duration)> {
        let units = circuit.units();
        let start = Instant::now();
        let measurements = self.backend.submit(circuit, self.shots)?;
        let elapsed = start.elapsed();
        measurements.validate_response(units, self.shots)?;
        Ok((success_rate(&measurements, target)?, elapsed))
    }
}
