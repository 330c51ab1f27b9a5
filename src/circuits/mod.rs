// src/circuits/mod.rs

//! Defines search circuits and the builders that assemble them.
//!
//! A [`SearchCircuit`] is an immutable, ordered list of operations over a
//! fixed number of units. [`CircuitBuilder`] composes circuits from the shared
//! blocks in [`oracle`]; [`strategy`] turns a target and an iteration count
//! into a complete circuit for one of the competing strategies.

pub mod oracle;
pub mod strategy;

pub use oracle::{decoupling_operations, diffusion_operations, oracle_operations};
pub use strategy::{SearchStrategy, Strategy, StrategyBuilder};

use crate::core::{BitPattern, Result, UnitId};
use crate::operations::Operation;
use std::collections::BTreeSet;
use std::fmt;

/// An ordered sequence of operations over `units` search units.
///
/// Built fresh for each stage and never mutated afterwards; the backend
/// consumes it by value.
#[derive(Clone, PartialEq, Eq)]
pub struct SearchCircuit {
    units: usize,
    operations: Vec<Operation>,
}

impl SearchCircuit {
    fn new(units: usize) -> Self {
        Self { units, operations: Vec::new() }
    }

    /// Number of units the circuit acts on (and the width of its outcomes).
    pub fn units(&self) -> usize {
        self.units
    }

    /// Returns a slice containing the ordered sequence of operations.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Circuit depth, counted as the number of operations.
    pub fn depth(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Number of complete decoupling pulses in the circuit.
    pub fn pulse_count(&self) -> usize {
        self.operations.iter().filter(|op| op.is_pulse()).count() / 2
    }

    /// A copy of this circuit with every decoupling pulse removed.
    pub fn without_pulses(&self) -> SearchCircuit {
        SearchCircuit {
            units: self.units,
            operations: self.operations.iter().filter(|op| !op.is_pulse()).cloned().collect(),
        }
    }

    /// Set of units referenced by at least one operation.
    pub fn touched_units(&self) -> BTreeSet<UnitId> {
        self.operations.iter().flat_map(Operation::involved_units).collect()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// Method-chaining helper for assembling a [`SearchCircuit`] block by block.
pub struct CircuitBuilder {
    circuit: SearchCircuit,
}

impl CircuitBuilder {
    /// Creates an empty builder for a `units`-wide circuit.
    pub fn new(units: usize) -> Self {
        Self { circuit: SearchCircuit::new(units) }
    }

    /// Appends a single operation.
    pub fn add_op(mut self, op: Operation) -> Self {
        self.circuit.operations.push(op);
        self
    }

    /// Appends every operation of `ops`, in order.
    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.circuit.operations.extend(ops);
        self
    }

    /// Mixes every unit, producing the uniform superposition from `|0...0⟩`.
    pub fn superposition(self) -> Self {
        let units = self.circuit.units;
        self.add_ops(oracle::all_units(units).map(|target| Operation::Mix { target }))
    }

    /// Appends the oracle marking `target`.
    ///
    /// # Errors
    /// `SearchError::Configuration` when the pattern width differs from the
    /// builder's unit count.
    pub fn oracle(self, target: &BitPattern) -> Result<Self> {
        let ops = oracle_operations(target, self.circuit.units)?;
        Ok(self.add_ops(ops))
    }

    /// Appends the diffusion (inversion about the mean) block.
    pub fn diffusion(self) -> Self {
        let units = self.circuit.units;
        self.add_ops(diffusion_operations(units))
    }

    /// Appends one decoupling pulse on every unit.
    pub fn decoupling_pulse(self) -> Self {
        let units = self.circuit.units;
        self.add_ops(decoupling_operations(units))
    }

    /// Finalizes the construction process and returns the built circuit.
    pub fn build(self) -> SearchCircuit {
        self.circuit
    }
}

impl fmt::Display for SearchCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operations.is_empty() || self.units == 0 {
            return writeln!(f, "SearchCircuit[0 operations on {} units]", self.units);
        }

        let ops = &self.operations;
        let num_ops = ops.len();
        let num_units = self.units;

        let labels: Vec<String> = (0..num_units).map(|i| format!("{}: ", UnitId(i))).collect();
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let label_padding = " ".repeat(label_width);

        const GATE_WIDTH: usize = 7; // e.g. "───H───"
        const WIRE: &str = "───────";
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        // op_grid[row][time] holds the gate or wire segment,
        // v_connect[row][time] the connector drawn below that row.
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_ops]; num_units];
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_ops]; num_units];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!(
                    "{}{}{}",
                    H_WIRE.to_string().repeat(pre_dashes),
                    symbol,
                    H_WIRE.to_string().repeat(post_dashes)
                )
            }
        }

        for (t, op) in ops.iter().enumerate() {
            match op {
                Operation::Mix { target } | Operation::Flip { target } | Operation::PulseFlip { target } => {
                    let symbol = match op {
                        Operation::Mix { .. } => "H",
                        Operation::Flip { .. } => "X",
                        _ => "DD",
                    };
                    if let Some(row) = op_grid.get_mut(target.index()) {
                        row[t] = format_gate(symbol);
                    }
                }
                Operation::ConditionalPhase { units } => {
                    let rows: Vec<usize> = units.iter().map(UnitId::index).filter(|r| *r < num_units).collect();
                    for r in &rows {
                        op_grid[*r][t] = format_gate("●");
                    }
                    if let (Some(r_min), Some(r_max)) = (rows.iter().min(), rows.iter().max()) {
                        for row_vec in v_connect.iter_mut().take(*r_max).skip(*r_min) {
                            row_vec[t] = V_WIRE;
                        }
                    }
                }
            }
        }

        writeln!(f, "SearchCircuit[{} operations on {} units]", num_ops, num_units)?;
        for r in 0..num_units {
            write!(f, "{:<width$}", labels[r], width = label_width)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < num_units - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_ops {
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), v_connect[r][t], " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for SearchCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
