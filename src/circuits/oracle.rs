// src/circuits/oracle.rs

//! Operation blocks shared by every search strategy: the phase oracle that
//! marks one target pattern and the diffusion block that inverts amplitudes
//! about their mean.

use crate::core::{BitPattern, Result, SearchError, UnitId};
use crate::operations::Operation;

/// Builds the oracle marking `target` within a `units`-wide search space.
///
/// Every unit whose target bit is `0` is flipped, the conditional phase over
/// all units negates the (relabelled) all-ones state, and the same flips are
/// applied again to undo the relabelling. The result negates exactly the
/// amplitude of `target`.
///
/// Stateless: equal inputs always give operation-for-operation equal output.
///
/// # Errors
/// `SearchError::Configuration` if the pattern width differs from `units`.
pub fn oracle_operations(target: &BitPattern, units: usize) -> Result<Vec<Operation>> {
    if target.width() != units {
        return Err(SearchError::configuration(format!(
            "target pattern '{}' has width {} but the circuit has {} units",
            target,
            target.width(),
            units
        )));
    }

    let relabel: Vec<Operation> = target
        .zero_units()
        .map(|target| Operation::Flip { target })
        .collect();

    let mut ops = Vec::with_capacity(relabel.len() * 2 + 1);
    ops.extend(relabel.iter().cloned());
    ops.push(conditional_phase_all(units));
    ops.extend(relabel);
    Ok(ops)
}

/// Builds the diffusion block: mix, flip, conditional phase, flip, mix.
pub fn diffusion_operations(units: usize) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(4 * units + 1);
    ops.extend(all_units(units).map(|target| Operation::Mix { target }));
    ops.extend(all_units(units).map(|target| Operation::Flip { target }));
    ops.push(conditional_phase_all(units));
    ops.extend(all_units(units).map(|target| Operation::Flip { target }));
    ops.extend(all_units(units).map(|target| Operation::Mix { target }));
    ops
}

/// One decoupling pulse on every unit, unit by unit: `P0 P0 P1 P1 ...`.
pub fn decoupling_operations(units: usize) -> Vec<Operation> {
    all_units(units)
        .flat_map(|target| [Operation::PulseFlip { target }, Operation::PulseFlip { target }])
        .collect()
}

pub(crate) fn conditional_phase_all(units: usize) -> Operation {
    Operation::ConditionalPhase { units: all_units(units).collect() }
}

pub(crate) fn all_units(units: usize) -> impl Iterator<Item = UnitId> {
    (0..units).map(UnitId)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flip(i: usize) -> Operation {
        Operation::Flip { target: UnitId(i) }
    }

    #[test]
    fn test_oracle_for_each_two_unit_pattern() -> Result<()> {
        let cz = conditional_phase_all(2);
        assert_eq!(oracle_operations(&"11".parse()?, 2)?, vec![cz.clone()]);
        assert_eq!(
            oracle_operations(&"00".parse()?, 2)?,
            vec![flip(0), flip(1), cz.clone(), flip(0), flip(1)]
        );
        assert_eq!(oracle_operations(&"10".parse()?, 2)?, vec![flip(1), cz.clone(), flip(1)]);
        assert_eq!(oracle_operations(&"01".parse()?, 2)?, vec![flip(0), cz, flip(0)]);
        Ok(())
    }

    #[test]
    fn test_oracle_is_deterministic() -> Result<()> {
        let target: BitPattern = "010".parse()?;
        assert_eq!(oracle_operations(&target, 3)?, oracle_operations(&target, 3)?);
        Ok(())
    }

    #[test]
    fn test_oracle_rejects_width_mismatch() -> Result<()> {
        let target: BitPattern = "101".parse()?;
        assert!(matches!(
            oracle_operations(&target, 2),
            Err(SearchError::Configuration { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_diffusion_layout() {
        let ops = diffusion_operations(2);
        assert_eq!(ops.len(), 9);
        assert_eq!(ops[0], Operation::Mix { target: UnitId(0) });
        assert_eq!(ops[2], flip(0));
        assert_eq!(ops[4], conditional_phase_all(2));
        assert_eq!(ops[8], Operation::Mix { target: UnitId(1) });
    }

    #[test]
    fn test_decoupling_pairs() {
        let p = |i| Operation::PulseFlip { target: UnitId(i) };
        assert_eq!(decoupling_operations(2), vec![p(0), p(0), p(1), p(1)]);
    }
}
