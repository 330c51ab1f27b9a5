// src/report/mod.rs

//! Side-by-side comparison of a baseline pass and an augmented pass.
//!
//! Everything here is derived on demand from two finished
//! [`AlgorithmRun`]s; nothing is stored between calls.

mod artifact;

pub use artifact::{ResultsDocument, StrategyRecord};

use crate::circuits::Strategy;
use crate::core::{Result, SearchError};
use crate::sequencer::AlgorithmRun;
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::warn;

/// Overall ratio above which the augmented pass counts as clearly better.
pub const CLEAR_ADVANTAGE_RATIO: f64 = 2.0;

/// Ratio of an augmented rate to a baseline rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    /// Ordinary quotient.
    Finite(f64),
    /// Baseline rate of exactly zero. Also used for `0 / 0`, which has no
    /// meaningful value either.
    Unbounded,
}

impl Ratio {
    /// `augmented / baseline`, or [`Ratio::Unbounded`] when `baseline` is zero.
    pub fn of(augmented: f64, baseline: f64) -> Self {
        if baseline == 0.0 {
            Ratio::Unbounded
        } else {
            Ratio::Finite(augmented / baseline)
        }
    }

    /// The numeric value, `None` for the unbounded sentinel.
    pub fn value(&self) -> Option<f64> {
        match self {
            Ratio::Finite(v) => Some(*v),
            Ratio::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Ratio::Unbounded)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Finite(v) => write!(f, "{:.1}x", v),
            Ratio::Unbounded => write!(f, "∞"),
        }
    }
}

/// Serialized as a number, or `null` for the sentinel.
impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

/// One row of the stage-by-stage comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct StageComparison {
    pub stage: usize,
    pub target_name: String,
    pub pattern: String,
    pub baseline_rate: f64,
    pub augmented_rate: f64,
    pub ratio: Ratio,
}

/// Read-only pairing of a baseline and an augmented run over the same catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSummary {
    stages: Vec<StageComparison>,
    baseline_total: f64,
    augmented_total: f64,
    overall: Ratio,
}

impl ComparisonSummary {
    pub fn stages(&self) -> &[StageComparison] {
        &self.stages
    }

    pub fn baseline_total(&self) -> f64 {
        self.baseline_total
    }

    pub fn augmented_total(&self) -> f64 {
        self.augmented_total
    }

    /// Ratio of total successes, augmented over baseline.
    pub fn overall(&self) -> Ratio {
        self.overall
    }

    /// `true` when the overall ratio is finite and above
    /// [`CLEAR_ADVANTAGE_RATIO`].
    pub fn shows_clear_advantage(&self) -> bool {
        matches!(self.overall, Ratio::Finite(v) if v > CLEAR_ADVANTAGE_RATIO)
    }
}

/// Compares two finished runs stage by stage.
///
/// # Errors
/// `SearchError::Configuration` if the runs have the wrong strategies, a
/// different number of stages, or different targets at some stage.
pub fn compare(baseline: &AlgorithmRun, augmented: &AlgorithmRun) -> Result<ComparisonSummary> {
    if baseline.strategy() != Strategy::Baseline || augmented.strategy() != Strategy::Augmented {
        return Err(SearchError::configuration(format!(
            "expected a {} run and a {} run, got {} and {}",
            Strategy::Baseline,
            Strategy::Augmented,
            baseline.strategy(),
            augmented.strategy()
        )));
    }
    if baseline.stages().len() != augmented.stages().len() {
        return Err(SearchError::configuration(format!(
            "runs cover {} and {} stages",
            baseline.stages().len(),
            augmented.stages().len()
        )));
    }

    let mut stages = Vec::with_capacity(baseline.stages().len());
    for (i, (b, a)) in baseline.stages().iter().zip(augmented.stages()).enumerate() {
        if b.target() != a.target() {
            return Err(SearchError::configuration(format!(
                "stage {} searched for {} in one run and {} in the other",
                i + 1,
                b.target(),
                a.target()
            )));
        }
        let ratio = Ratio::of(a.success_rate(), b.success_rate());
        if ratio.is_unbounded() {
            warn!(stage = i + 1, target = %b.target(), "baseline rate is zero, stage ratio unbounded");
        }
        stages.push(StageComparison {
            stage: i + 1,
            target_name: b.target().name().to_string(),
            pattern: b.target().pattern().to_string(),
            baseline_rate: b.success_rate(),
            augmented_rate: a.success_rate(),
            ratio,
        });
    }

    let baseline_total = baseline.total_success();
    let augmented_total = augmented.total_success();
    let overall = Ratio::of(augmented_total, baseline_total);
    if overall.is_unbounded() {
        warn!("baseline total success is zero, improvement ratio unbounded");
    }

    Ok(ComparisonSummary { stages, baseline_total, augmented_total, overall })
}

/// Text bar of `width` cells, filled in proportion to `fraction`.
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((width as f64) * fraction.clamp(0.0, 1.0)) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

impl fmt::Display for ComparisonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(70);
        writeln!(f, "Stage-by-Stage Success Rates:")?;
        writeln!(
            f,
            "{:<10} {:<10} {:<15} {:<15} {:<10}",
            "Stage", "Target", Strategy::Baseline, Strategy::Augmented, "Advantage"
        )?;
        writeln!(f, "{}", rule)?;
        for row in &self.stages {
            writeln!(
                f,
                "{:<10} {:<10} {:<15} {:<15} {:<10}",
                row.stage,
                row.target_name,
                format!("{:.1}%", row.baseline_rate * 100.0),
                format!("{:.1}%", row.augmented_rate * 100.0),
                row.ratio.to_string()
            )?;
        }
        writeln!(f, "{}", rule)?;
        writeln!(f)?;
        writeln!(f, "TOTAL SUCCESS RATES:")?;
        writeln!(f, "  {:<17} {:.1}%", format!("{}:", Strategy::Baseline), self.baseline_total * 100.0)?;
        writeln!(f, "  {:<17} {:.1}%", format!("{}:", Strategy::Augmented), self.augmented_total * 100.0)?;
        writeln!(f, "  {:<17} {}", "Improvement:", self.overall)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<12}[{}] {:.1}%",
            format!("{}:", Strategy::Baseline),
            progress_bar(self.baseline_total, 40),
            self.baseline_total * 100.0
        )?;
        write!(
            f,
            "{:<12}[{}] {:.1}%",
            format!("{}:", Strategy::Augmented),
            progress_bar(self.augmented_total, 40),
            self.augmented_total * 100.0
        )
    }
}
