// src/simulation/engine.rs
use crate::core::constants::search_constants::MAX_SIMULATED_UNITS;
use crate::core::{AmplitudeState, Result, SearchError, UnitId};
use crate::operations::Operation;
use num_complex::Complex;
use num_traits::Zero; // For Complex::zero()
use std::f64::consts::FRAC_1_SQRT_2;

/// Dense state-vector engine for the handful of operations search circuits use.
/// (Internal visibility)
pub(crate) struct SimulationEngine {
    /// Amplitudes over `2^num_units` basis states; unit 0 is the most
    /// significant bit of the basis index.
    state: AmplitudeState,
    num_units: usize,
}

impl SimulationEngine {
    /// Initializes the engine in `|0...0⟩`.
    pub(crate) fn init(num_units: usize) -> Result<Self> {
        if num_units == 0 {
            return Err(SearchError::InvalidOperation {
                message: "Cannot initialize simulation engine with zero units".to_string(),
            });
        }
        if num_units > MAX_SIMULATED_UNITS {
            return Err(SearchError::Simulation {
                message: format!(
                    "{} units exceed the simulator limit of {}",
                    num_units, MAX_SIMULATED_UNITS
                ),
            });
        }

        let dim = 1usize << num_units;
        let mut initial_vec = vec![Complex::zero(); dim];
        initial_vec[0] = Complex::new(1.0, 0.0);

        Ok(Self { state: AmplitudeState::new(initial_vec), num_units })
    }

    // Crate-visible setter for tests that start from arbitrary states
    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: AmplitudeState) -> Result<()> {
        if state.dim() != self.state.dim() {
            Err(SearchError::Simulation {
                message: format!(
                    "Cannot set state: provided dimension {} does not match engine dimension {}",
                    state.dim(),
                    self.state.dim()
                ),
            })
        } else {
            self.state = state;
            Ok(())
        }
    }

    pub(crate) fn state(&self) -> &AmplitudeState {
        &self.state
    }

    /// Applies a single operation to the state.
    pub(crate) fn apply_operation(&mut self, op: &Operation) -> Result<()> {
        match op {
            Operation::Mix { target } => {
                let idx = self.unit_index(target)?;
                self.apply_single_unit_gate(idx, &mix_matrix())
            }
            // A pulse half is physically the same flip; only its role differs.
            Operation::Flip { target } | Operation::PulseFlip { target } => {
                let idx = self.unit_index(target)?;
                self.apply_single_unit_gate(idx, &flip_matrix())
            }
            Operation::ConditionalPhase { units } => self.apply_conditional_phase(units),
        }
    }

    /// Helper to validate a unit, returning a specific error if out of range.
    fn unit_index(&self, unit: &UnitId) -> Result<usize> {
        if unit.index() < self.num_units {
            Ok(unit.index())
        } else {
            Err(SearchError::InvalidOperation {
                message: format!("{} is outside the {}-unit register", unit, self.num_units),
            })
        }
    }

    /// Applies a 2x2 matrix to one unit of the global state vector.
    fn apply_single_unit_gate(&mut self, target_idx: usize, matrix: &[[Complex<f64>; 2]; 2]) -> Result<()> {
        let k = self.num_units - 1 - target_idx; // Bit position (from right, 0-based)
        let k_mask = 1usize << k;
        let lower_mask = k_mask - 1;
        let upper_mask = !((k_mask << 1) - 1);

        let dim = self.state.dim();
        let mut new_vec = vec![Complex::zero(); dim];
        let amps = self.state.vector();

        // Iterate over pairs of basis states differing only at the target bit
        for i in 0..dim / 2 {
            let i0 = ((i << 1) & upper_mask) | (i & lower_mask);
            let i1 = i0 | k_mask;

            let psi_0 = amps[i0];
            let psi_1 = amps[i1];

            new_vec[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            new_vec[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }

        self.state = AmplitudeState::new(new_vec);
        Ok(())
    }

    /// Negates every amplitude whose basis state has all `units` set to 1.
    fn apply_conditional_phase(&mut self, units: &[UnitId]) -> Result<()> {
        if units.is_empty() {
            return Err(SearchError::InvalidOperation {
                message: "Conditional phase needs at least one unit".to_string(),
            });
        }
        let mut mask = 0usize;
        for unit in units {
            let idx = self.unit_index(unit)?;
            mask |= 1 << (self.num_units - 1 - idx);
        }
        for (k, amp) in self.state.vector_mut().iter_mut().enumerate() {
            if k & mask == mask {
                *amp = -*amp;
            }
        }
        Ok(())
    }
}

/// Equal mixing (Hadamard) matrix.
fn mix_matrix() -> [[Complex<f64>; 2]; 2] {
    [
        [Complex::new(FRAC_1_SQRT_2, 0.0), Complex::new(FRAC_1_SQRT_2, 0.0)],
        [Complex::new(FRAC_1_SQRT_2, 0.0), Complex::new(-FRAC_1_SQRT_2, 0.0)],
    ]
}

/// Level swap (X) matrix.
fn flip_matrix() -> [[Complex<f64>; 2]; 2] {
    [
        [Complex::zero(), Complex::new(1.0, 0.0)],
        [Complex::new(1.0, 0.0), Complex::zero()],
    ]
}
