// src/report/artifact.rs

use super::{Ratio, compare};
use crate::catalog::TargetCatalog;
use crate::core::Result;
use crate::sequencer::AlgorithmRun;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Per-strategy section of the results file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyRecord {
    pub stages: Vec<f64>,
    pub total: f64,
    pub depths: Vec<usize>,
    pub iterations: Vec<usize>,
    pub cumulative: Vec<f64>,
    pub elapsed_secs: Vec<f64>,
}

impl From<&AlgorithmRun> for StrategyRecord {
    fn from(run: &AlgorithmRun) -> Self {
        Self {
            stages: run.stage_rates(),
            total: run.total_success(),
            depths: run.stages().iter().map(|s| s.depth()).collect(),
            iterations: run.stages().iter().map(|s| s.iterations()).collect(),
            cumulative: run.cumulative_success(),
            elapsed_secs: run.stages().iter().map(|s| s.elapsed().as_secs_f64()).collect(),
        }
    }
}

/// The persisted record of one comparison.
///
/// Field names and nesting (`targets`, `results.standard`,
/// `results.vermicular`, `improvement_factor`) are consumed by existing tools
/// and must not change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsDocument {
    pub platform: String,
    pub device: String,
    pub timestamp: String,
    /// `[name, pattern]` pairs in stage order.
    pub targets: Vec<(String, String)>,
    /// Keyed by [`crate::circuits::Strategy::key`].
    pub results: BTreeMap<String, StrategyRecord>,
    /// Augmented total over baseline total, `null` when the baseline total is zero.
    pub improvement_factor: Ratio,
}

impl ResultsDocument {
    /// Assembles the document from two finished runs.
    ///
    /// # Errors
    /// Same as [`compare`]: the runs must pair up stage by stage.
    pub fn new(
        platform: &str,
        device: &str,
        created: DateTime<Local>,
        catalog: &TargetCatalog,
        baseline: &AlgorithmRun,
        augmented: &AlgorithmRun,
    ) -> Result<Self> {
        let summary = compare(baseline, augmented)?;
        let results = [baseline, augmented]
            .into_iter()
            .map(|run| (run.strategy().key().to_string(), StrategyRecord::from(run)))
            .collect();

        Ok(Self {
            platform: platform.to_string(),
            device: device.to_string(),
            timestamp: created.format("%Y%m%d_%H%M%S").to_string(),
            targets: catalog
                .iter()
                .map(|t| (t.name().to_string(), t.pattern().to_string()))
                .collect(),
            results,
            improvement_factor: summary.overall(),
        })
    }

    /// File name used when saving into a directory.
    pub fn file_name(&self) -> String {
        format!("vermicular_demo_results_{}_{}.json", self.platform, self.timestamp)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the document as pretty JSON into `dir`, returning the file path.
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        fs::write(&path, self.to_json()?)?;
        info!(path = %path.display(), "results saved");
        Ok(path)
    }
}
