// src/backend/mod.rs

//! The execution boundary: something that runs a circuit for a number of
//! shots and reports what was measured.
//!
//! The core never inspects which backend it talks to or what it costs.
//! Calls are synchronous and never retried, since a remote backend may bill
//! per shot.

mod measurement;

pub use measurement::{MeasurementSet, success_rate};

use crate::circuits::SearchCircuit;
use crate::core::Result;

/// Executes circuits and samples their outcomes.
pub trait ExecutionBackend {
    /// Human-readable identifier of the device behind this backend.
    fn name(&self) -> &str;

    /// Runs `circuit` `shots` times and returns the multiset of measured
    /// outcomes, one bit string of width `circuit.units()` per shot.
    ///
    /// # Errors
    /// `SearchError::Backend` when the device fails or cannot run the circuit.
    fn submit(&mut self, circuit: SearchCircuit, shots: usize) -> Result<MeasurementSet>;
}

impl<B: ExecutionBackend + ?Sized> ExecutionBackend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn submit(&mut self, circuit: SearchCircuit, shots: usize) -> Result<MeasurementSet> {
        (**self).submit(circuit, shots)
    }
}
