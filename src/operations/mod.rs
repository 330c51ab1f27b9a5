// src/operations/mod.rs

//! The atomic steps a search circuit is made of.
//!
//! Operations are ordered and do not commute in general, so a circuit is a
//! plain sequence rather than a set.

use crate::core::UnitId;

/// A single circuit step addressed to one or more units.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Equal mixing of a unit's two levels.
    ///
    /// Analogy: the Hadamard gate.
    Mix {
        /// The unit being mixed.
        target: UnitId,
    },

    /// Swaps a unit's two levels.
    ///
    /// Analogy: the X (NOT) gate.
    Flip {
        /// The unit being flipped.
        target: UnitId,
    },

    /// Negates the amplitude of every basis state in which all addressed
    /// units are `1`. Over two units this is the CZ gate.
    ConditionalPhase {
        /// The units that must all be `1` for the sign flip to apply.
        units: Vec<UnitId>,
    },

    /// One half of a decoupling pulse. A pulse is two consecutive
    /// `PulseFlip`s on the same unit: logically an identity, but kept in the
    /// circuit because it occupies time on the device.
    PulseFlip {
        /// The unit receiving the pulse.
        target: UnitId,
    },
}

impl Operation {
    /// Returns a list of all units directly mentioned in the operation.
    pub fn involved_units(&self) -> Vec<UnitId> {
        match self {
            Operation::Mix { target }
            | Operation::Flip { target }
            | Operation::PulseFlip { target } => vec![*target],
            Operation::ConditionalPhase { units } => units.clone(),
        }
    }

    /// `true` for operations that belong to a decoupling pulse.
    pub fn is_pulse(&self) -> bool {
        matches!(self, Operation::PulseFlip { .. })
    }
}
