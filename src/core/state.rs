// src/core/state.rs

use num_complex::Complex;
use std::fmt;

/// Complex amplitude vector over all `2^N` basis states of an `N`-unit register.
///
/// Basis index `k` encodes unit `i` in bit `N - 1 - i`, so unit 0 is the most
/// significant bit (matching [`crate::core::BitPattern::from_index`]).
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct AmplitudeState {
    state_vector: Vec<Complex<f64>>,
}

impl AmplitudeState {
    /// Wraps an amplitude vector. Normalisation is checked separately by
    /// [`crate::validation::check_normalization`].
    pub(crate) fn new(initial_vector: Vec<Complex<f64>>) -> Self {
        Self { state_vector: initial_vector }
    }

    /// Provides read-only access to the amplitudes.
    pub fn vector(&self) -> &[Complex<f64>] {
        &self.state_vector
    }

    /// Provides mutable access for the simulation engine.
    pub(crate) fn vector_mut(&mut self) -> &mut [Complex<f64>] {
        &mut self.state_vector
    }

    /// Number of basis states represented.
    pub fn dim(&self) -> usize {
        self.state_vector.len()
    }

    /// Born-rule probabilities `|c_k|^2`, indexed like the amplitudes.
    pub fn probabilities(&self) -> Vec<f64> {
        self.state_vector.iter().map(|c| c.norm_sqr()).collect()
    }
}

impl fmt::Display for AmplitudeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amplitudes[")?;
        for (i, c) in self.state_vector.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}
