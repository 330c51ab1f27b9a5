// src/experiment/mod.rs

//! One complete comparison: a baseline pass and an augmented pass over the
//! same catalog on the same backend, followed by the side-by-side summary.

use crate::backend::ExecutionBackend;
use crate::catalog::TargetCatalog;
use crate::circuits::Strategy;
use crate::config::{ExperimentConfig, Platform};
use crate::core::Result;
use crate::report::{ComparisonSummary, ResultsDocument, compare};
use crate::sequencer::{AlgorithmRun, StageObserver, StageSequencer};
use crate::simulation::{NoisyBackend, StateVectorBackend};
use chrono::{DateTime, Local};
use tracing::info;

/// A validated configuration ready to run.
#[derive(Debug, Clone)]
pub struct Experiment {
    config: ExperimentConfig,
    catalog: TargetCatalog,
}

/// Everything a finished comparison produced.
#[derive(Debug, Clone)]
pub struct ExperimentOutcome {
    pub platform: Platform,
    pub device: String,
    pub catalog: TargetCatalog,
    pub baseline: AlgorithmRun,
    pub augmented: AlgorithmRun,
    pub summary: ComparisonSummary,
}

impl Experiment {
    /// # Errors
    /// Whatever [`ExperimentConfig::validate`] rejects.
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        config.validate()?;
        let catalog = config.catalog()?;
        Ok(Self { config, catalog })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TargetCatalog {
        &self.catalog
    }

    /// Backend for the configured platform.
    ///
    /// The simulator platform gets the ideal state-vector backend. Hardware
    /// platforms are emulated locally by wrapping it in a [`NoisyBackend`]
    /// with the platform's error rate.
    pub fn platform_backend(&self) -> Result<Box<dyn ExecutionBackend>> {
        let seed = self.config.seed;
        let ideal = StateVectorBackend::with_seed(seed);
        match self.config.platform {
            Platform::Simulator if self.config.error_rate.is_none() => Ok(Box::new(ideal)),
            platform => Ok(Box::new(NoisyBackend::new(
                ideal,
                self.config.effective_error_rate(),
                platform.profile().device_name,
                seed.wrapping_add(1),
            )?)),
        }
    }

    /// Runs both passes against `backend`.
    pub fn run<B: ExecutionBackend + ?Sized>(&self, backend: &mut B) -> Result<ExperimentOutcome> {
        self.run_observed(backend, &mut ())
    }

    /// Runs both passes against `backend`, reporting every stage to
    /// `observer`. The baseline pass always runs first.
    ///
    /// # Errors
    /// The first configuration or backend error aborts the experiment.
    pub fn run_observed<B, O>(&self, backend: &mut B, observer: &mut O) -> Result<ExperimentOutcome>
    where
        B: ExecutionBackend + ?Sized,
        O: StageObserver + ?Sized,
    {
        let device = backend.name().to_string();
        info!(
            platform = %self.config.platform,
            device = %device,
            shots = self.config.effective_shots(),
            targets = self.catalog.len(),
            "starting comparison"
        );

        let mut sequencer = StageSequencer::new(backend, self.config.effective_shots())?;
        let baseline = sequencer.run_observed(Strategy::Baseline, &self.catalog, observer)?;
        let augmented = sequencer.run_observed(Strategy::Augmented, &self.catalog, observer)?;
        let summary = compare(&baseline, &augmented)?;

        Ok(ExperimentOutcome {
            platform: self.config.platform,
            device,
            catalog: self.catalog.clone(),
            baseline,
            augmented,
            summary,
        })
    }
}

impl ExperimentOutcome {
    /// The persistable record of this outcome, stamped with `created`.
    pub fn document(&self, created: DateTime<Local>) -> Result<ResultsDocument> {
        ResultsDocument::new(
            self.platform.key(),
            &self.device,
            created,
            &self.catalog,
            &self.baseline,
            &self.augmented,
        )
    }
}
