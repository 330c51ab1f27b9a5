// src/core/pattern.rs

use super::error::{Result, SearchError, UnitId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fixed-length sequence of bits, written most naturally as a string such
/// as `"10"`. Position `i` holds the value of unit `i`.
///
/// Used both for target patterns and for measured outcomes, so that a
/// successful shot is simply an outcome equal to the target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BitPattern {
    bits: Vec<bool>,
}

impl BitPattern {
    /// Builds a pattern from explicit bit values.
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Decodes basis-state index `index` of a `width`-unit register.
    /// Unit 0 is the most significant bit of the index.
    pub fn from_index(index: usize, width: usize) -> Self {
        let bits = (0..width)
            .map(|unit| (index >> (width - 1 - unit)) & 1 == 1)
            .collect();
        Self { bits }
    }

    /// Inverse of [`BitPattern::from_index`].
    pub fn to_index(&self) -> usize {
        self.bits
            .iter()
            .fold(0usize, |acc, bit| (acc << 1) | usize::from(*bit))
    }

    /// Number of bits (units) in the pattern.
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    /// Bit values in unit order.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Units whose bit is `0`.
    pub fn zero_units(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, bit)| !**bit)
            .map(|(i, _)| UnitId(i))
    }
}

impl FromStr for BitPattern {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(SearchError::configuration("bit pattern cannot be empty"));
        }
        let bits = s
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(SearchError::configuration(format!(
                    "bit pattern '{}' contains non-binary character '{}'",
                    s, other
                ))),
            })
            .collect::<Result<Vec<bool>>>()?;
        Ok(Self { bits })
    }
}

impl TryFrom<String> for BitPattern {
    type Error = SearchError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<BitPattern> for String {
    fn from(pattern: BitPattern) -> Self {
        pattern.to_string()
    }
}

impl fmt::Display for BitPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() -> Result<()> {
        let p: BitPattern = "10".parse()?;
        assert_eq!(p.bits(), &[true, false]);
        assert_eq!(p.to_string(), "10");
        assert_eq!(p.width(), 2);
        Ok(())
    }

    #[test]
    fn test_index_uses_unit_zero_as_msb() -> Result<()> {
        let p: BitPattern = "10".parse()?;
        assert_eq!(p.to_index(), 2);
        assert_eq!(BitPattern::from_index(2, 2), p);
        assert_eq!(BitPattern::from_index(1, 3).to_string(), "001");
        Ok(())
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!("".parse::<BitPattern>(), Err(SearchError::Configuration { .. })));
        assert!(matches!("0x".parse::<BitPattern>(), Err(SearchError::Configuration { .. })));
    }

    #[test]
    fn test_zero_units() -> Result<()> {
        let p: BitPattern = "010".parse()?;
        let zeros: Vec<UnitId> = p.zero_units().collect();
        assert_eq!(zeros, vec![UnitId(0), UnitId(2)]);
        Ok(())
    }

    #[test]
    fn test_serde_as_string() -> Result<()> {
        let p: BitPattern = "11".parse()?;
        let json = serde_json::to_string(&p)?;
        assert_eq!(json, "\"11\"");
        let back: BitPattern = serde_json::from_str(&json)?;
        assert_eq!(back, p);
        assert!(serde_json::from_str::<BitPattern>("\"12\"").is_err());
        Ok(())
    }
}
