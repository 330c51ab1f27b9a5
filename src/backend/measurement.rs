// src/backend/measurement.rs

use crate::core::{BitPattern, Result, SearchError};
use std::collections::BTreeMap;
use std::fmt;

/// Multiset of measured outcomes, one entry per shot. Order is irrelevant,
/// so outcomes are stored as counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementSet {
    width: usize,
    counts: BTreeMap<BitPattern, usize>,
    total: usize,
}

impl MeasurementSet {
    /// Creates an empty set for outcomes of `width` bits.
    pub fn new(width: usize) -> Self {
        Self { width, counts: BTreeMap::new(), total: 0 }
    }

    /// Collects shot outcomes into a set.
    ///
    /// # Errors
    /// `SearchError::Backend` if any outcome has the wrong width.
    pub fn from_outcomes<I>(width: usize, outcomes: I) -> Result<Self>
    where
        I: IntoIterator<Item = BitPattern>,
    {
        let mut set = Self::new(width);
        for outcome in outcomes {
            set.record(outcome)?;
        }
        Ok(set)
    }

    /// Adds one shot.
    ///
    /// # Errors
    /// `SearchError::Backend` if the outcome width differs from the set's.
    pub fn record(&mut self, outcome: BitPattern) -> Result<()> {
        self.record_many(outcome, 1)
    }

    /// Adds `count` shots that all produced `outcome`.
    pub fn record_many(&mut self, outcome: BitPattern, count: usize) -> Result<()> {
        if outcome.width() != self.width {
            return Err(SearchError::backend(format!(
                "measured outcome '{}' has width {}, expected {}",
                outcome,
                outcome.width(),
                self.width
            )));
        }
        if count > 0 {
            *self.counts.entry(outcome).or_insert(0) += count;
            self.total += count;
        }
        Ok(())
    }

    /// Outcome width in bits.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of shots recorded.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// How many shots produced exactly `outcome`.
    pub fn count(&self, outcome: &BitPattern) -> usize {
        self.counts.get(outcome).copied().unwrap_or(0)
    }

    /// Distinct outcomes with their counts, in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&BitPattern, usize)> {
        self.counts.iter().map(|(pattern, count)| (pattern, *count))
    }

    /// Checks a backend response against the request that produced it.
    ///
    /// # Errors
    /// `SearchError::Backend` if the set is empty, has the wrong outcome width,
    /// or does not contain exactly `shots` samples.
    pub fn validate_response(&self, units: usize, shots: usize) -> Result<()> {
        if self.is_empty() {
            return Err(SearchError::backend("backend returned no measurements"));
        }
        if self.width != units {
            return Err(SearchError::backend(format!(
                "backend returned {}-bit outcomes for a {}-unit circuit",
                self.width, units
            )));
        }
        if self.total != shots {
            return Err(SearchError::backend(format!(
                "backend returned {} samples for {} requested shots",
                self.total, shots
            )));
        }
        Ok(())
    }
}

impl fmt::Display for MeasurementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Measurements[{} shots:", self.total)?;
        for (pattern, count) in self.iter() {
            write!(f, " {}={}", pattern, count)?;
        }
        write!(f, "]")
    }
}

/// Fraction of shots whose outcome equals `target` exactly.
///
/// # Errors
/// `SearchError::Configuration` for an empty set (a zero-shot request) or a
/// target whose width differs from the outcomes.
pub fn success_rate(measurements: &MeasurementSet, target: &BitPattern) -> Result<f64> {
    if measurements.is_empty() {
        return Err(SearchError::configuration(
            "cannot estimate a success rate from zero shots",
        ));
    }
    if target.width() != measurements.width() {
        return Err(SearchError::configuration(format!(
            "target '{}' has width {} but outcomes have width {}",
            target,
            target.width(),
            measurements.width()
        )));
    }
    Ok(measurements.count(target) as f64 / measurements.total() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(outcomes: &[&str]) -> Result<MeasurementSet> {
        let parsed = outcomes
            .iter()
            .map(|s| s.parse::<BitPattern>())
            .collect::<Result<Vec<_>>>()?;
        MeasurementSet::from_outcomes(2, parsed)
    }

    #[test]
    fn test_success_rate_counts_exact_matches() -> Result<()> {
        let m = set(&["10", "10", "11", "00"])?;
        assert_eq!(success_rate(&m, &"10".parse()?)?, 0.5);
        assert_eq!(success_rate(&m, &"01".parse()?)?, 0.0);
        Ok(())
    }

    #[test]
    fn test_success_rate_of_empty_set_is_configuration_error() -> Result<()> {
        let m = MeasurementSet::new(2);
        assert!(matches!(
            success_rate(&m, &"10".parse()?),
            Err(SearchError::Configuration { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_wrong_width_outcome_is_backend_error() -> Result<()> {
        let mut m = MeasurementSet::new(2);
        assert!(matches!(m.record("101".parse()?), Err(SearchError::Backend { .. })));
        Ok(())
    }

    #[test]
    fn test_validate_response() -> Result<()> {
        let m = set(&["10", "11"])?;
        m.validate_response(2, 2)?;
        assert!(matches!(m.validate_response(2, 3), Err(SearchError::Backend { .. })));
        assert!(matches!(m.validate_response(3, 2), Err(SearchError::Backend { .. })));
        assert!(matches!(
            MeasurementSet::new(2).validate_response(2, 1),
            Err(SearchError::Backend { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_display_lists_counts() -> Result<()> {
        let m = set(&["11", "00", "11"])?;
        assert_eq!(m.to_string(), "Measurements[3 shots: 00=1 11=2]");
        Ok(())
    }
}
