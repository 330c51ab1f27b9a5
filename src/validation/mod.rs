// src/validation/mod.rs

//! Sanity checks on simulated states and on estimated rates.

use crate::core::{AmplitudeState, Result, SearchError};

// Default tolerance values (can be overridden by caller)
const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;

/// Checks that the state vector is normalized (sum of squared amplitudes ≈ 1.0).
///
/// # Arguments
/// * `state` - The `AmplitudeState` to check.
/// * `tolerance` - Allowed deviation from 1.0 (defaults to 1e-9).
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(SearchError::Simulation)` otherwise.
pub fn check_normalization(state: &AmplitudeState, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    let norm_sq: f64 = state.vector().iter().map(|c| c.norm_sqr()).sum();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(SearchError::Simulation {
            message: format!(
                "State vector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})",
                norm_sq, effective_tolerance
            ),
        })
    } else {
        Ok(())
    }
}

/// Checks that `rate` is a finite probability in `[0, 1]`.
pub fn check_rate(rate: f64) -> Result<()> {
    if rate.is_finite() && (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(SearchError::InvalidOperation {
            message: format!("success rate {} is not a probability in [0, 1]", rate),
        })
    }
}
