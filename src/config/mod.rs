//! Experiment configuration.
//!
//! [`ExperimentConfig`] resolves everything a run needs (platform, shot
//! count, seed, targets) before any circuit is built. It can be loaded from
//! JSON and overridden from the command line.
//!
//! # Example
//!
//! ```rust
//! use vermicular::config::{ExperimentConfig, Platform};
//!
//! let cfg = ExperimentConfig::default();
//! cfg.validate().expect("default config is valid");
//!
//! assert_eq!(cfg.platform, Platform::Simulator);
//! assert_eq!(cfg.effective_shots(), 1000);
//! ```

use crate::catalog::{TargetCatalog, TargetFragment};
use crate::circuits::Strategy;
use crate::core::constants::search_constants::{DEFAULT_SEED, SEARCH_WIDTH};
use crate::core::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Where circuits are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Local ideal simulator (free).
    Simulator,
    /// IQM Garnet profile.
    Iqm,
    /// Rigetti Ankaa-3 profile.
    Rigetti,
}

/// Static description of a platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformProfile {
    pub device_name: &'static str,
    pub cost_per_shot: f64,
    pub shots_per_test: usize,
    /// Per-operation error rate used to emulate the device locally.
    pub error_rate: f64,
}

impl Platform {
    /// Menu order of the interactive platform selection.
    pub const ALL: [Platform; 3] = [Platform::Simulator, Platform::Iqm, Platform::Rigetti];

    pub fn profile(&self) -> PlatformProfile {
        match self {
            Platform::Simulator => PlatformProfile {
                device_name: "Local state-vector simulator",
                cost_per_shot: 0.0,
                shots_per_test: 1000,
                error_rate: 0.0,
            },
            Platform::Iqm => PlatformProfile {
                device_name: "IQM Garnet",
                cost_per_shot: 0.00035,
                shots_per_test: 200,
                error_rate: 0.005,
            },
            Platform::Rigetti => PlatformProfile {
                device_name: "Rigetti Ankaa-3",
                cost_per_shot: 0.00035,
                shots_per_test: 200,
                error_rate: 0.008,
            },
        }
    }

    /// Key used in file names and result documents.
    pub fn key(&self) -> &'static str {
        match self {
            Platform::Simulator => "simulator",
            Platform::Iqm => "iqm",
            Platform::Rigetti => "rigetti",
        }
    }

    pub fn is_free(&self) -> bool {
        self.profile().cost_per_shot == 0.0
    }

    /// Platform for a 1-based menu choice; anything unrecognised falls back
    /// to the simulator.
    pub fn from_menu_choice(choice: &str) -> Self {
        match choice.trim() {
            "2" => Platform::Iqm,
            "3" => Platform::Rigetti,
            _ => Platform::Simulator,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

impl FromStr for Platform {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        Platform::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SearchError::configuration(format!("unknown platform '{}'", s)))
    }
}

// ---------------------------------------------------------------------------
// ExperimentConfig
// ---------------------------------------------------------------------------

/// Complete configuration of a comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub platform: Platform,
    /// Overrides the platform's shots per test.
    pub shots: Option<usize>,
    /// Overrides the platform's emulated error rate.
    pub error_rate: Option<f64>,
    /// Seed for the simulator and noise PRNGs.
    pub seed: u64,
    /// Targets searched in order.
    pub targets: Vec<TargetFragment>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            platform: Platform::Simulator,
            shots: None,
            error_rate: None,
            seed: DEFAULT_SEED,
            targets: TargetCatalog::reference().targets().to_vec(),
        }
    }
}

impl ExperimentConfig {
    /// Loads a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn from_json(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Shots per circuit after applying the override.
    pub fn effective_shots(&self) -> usize {
        self.shots.unwrap_or(self.platform.profile().shots_per_test)
    }

    /// Emulated per-operation error rate after applying the override.
    pub fn effective_error_rate(&self) -> f64 {
        self.error_rate.unwrap_or(self.platform.profile().error_rate)
    }

    /// Number of circuits a full comparison submits.
    pub fn circuit_count(&self) -> usize {
        Strategy::ALL.len() * self.targets.len()
    }

    /// Estimated spend of a full comparison on this platform.
    pub fn estimated_cost(&self) -> f64 {
        self.effective_shots() as f64
            * self.platform.profile().cost_per_shot
            * self.circuit_count() as f64
    }

    /// The validated target catalog. Every pattern must be exactly
    /// [`SEARCH_WIDTH`] bits wide.
    pub fn catalog(&self) -> Result<TargetCatalog> {
        TargetCatalog::with_width(self.targets.clone(), SEARCH_WIDTH)
    }

    /// # Errors
    /// `SearchError::Configuration` for a zero shot count, an error rate
    /// outside `[0, 1]`, or an invalid target list (empty, or any pattern
    /// not [`SEARCH_WIDTH`] bits wide).
    pub fn validate(&self) -> Result<()> {
        if self.effective_shots() == 0 {
            return Err(SearchError::configuration("shot count must be positive"));
        }
        let rate = self.effective_error_rate();
        if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
            return Err(SearchError::configuration(format!(
                "error rate {} must lie in [0, 1]",
                rate
            )));
        }
        self.catalog()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        assert!(Platform::Simulator.is_free());
        assert!(!Platform::Iqm.is_free());
        assert_eq!(Platform::Rigetti.profile().shots_per_test, 200);
    }

    #[test]
    fn test_menu_choice() {
        assert_eq!(Platform::from_menu_choice("1"), Platform::Simulator);
        assert_eq!(Platform::from_menu_choice(" 2\n"), Platform::Iqm);
        assert_eq!(Platform::from_menu_choice("3"), Platform::Rigetti);
        assert_eq!(Platform::from_menu_choice("9"), Platform::Simulator);
    }

    #[test]
    fn test_parse_platform() -> Result<()> {
        assert_eq!("IQM".parse::<Platform>()?, Platform::Iqm);
        assert!("dwave".parse::<Platform>().is_err());
        Ok(())
    }

    #[test]
    fn test_estimated_cost() {
        let cfg = ExperimentConfig { platform: Platform::Iqm, ..Default::default() };
        // 200 shots * 0.00035 * (2 strategies * 3 targets)
        assert!((cfg.estimated_cost() - 0.42).abs() < 1e-12);
        assert_eq!(ExperimentConfig::default().estimated_cost(), 0.0);
    }

    #[test]
    fn test_validation() {
        let zero_shots = ExperimentConfig { shots: Some(0), ..Default::default() };
        assert!(matches!(zero_shots.validate(), Err(SearchError::Configuration { .. })));

        let bad_rate = ExperimentConfig { error_rate: Some(2.0), ..Default::default() };
        assert!(matches!(bad_rate.validate(), Err(SearchError::Configuration { .. })));

        let no_targets = ExperimentConfig { targets: vec![], ..Default::default() };
        assert!(matches!(no_targets.validate(), Err(SearchError::Configuration { .. })));
    }

    #[test]
    fn test_rejects_targets_of_other_width() -> Result<()> {
        let wide = ExperimentConfig {
            targets: vec![TargetFragment::parse("Wide", "101")?, TargetFragment::parse("Also", "011")?],
            ..Default::default()
        };
        assert!(matches!(wide.validate(), Err(SearchError::Configuration { .. })));
        assert!(matches!(wide.catalog(), Err(SearchError::Configuration { .. })));

        let narrow = ExperimentConfig { targets: vec![TargetFragment::parse("One", "1")?], ..Default::default() };
        assert!(matches!(narrow.validate(), Err(SearchError::Configuration { .. })));
        Ok(())
    }

    #[test]
    fn test_partial_json_uses_defaults() -> Result<()> {
        let cfg: ExperimentConfig = serde_json::from_str(
            r#"{ "platform": "rigetti", "targets": [ { "name": "Delta", "pattern": "01" } ] }"#,
        )?;
        assert_eq!(cfg.platform, Platform::Rigetti);
        assert_eq!(cfg.effective_shots(), 200);
        assert_eq!(cfg.seed, DEFAULT_SEED);
        assert_eq!(cfg.catalog()?.targets()[0].pattern().to_string(), "01");
        Ok(())
    }
}
