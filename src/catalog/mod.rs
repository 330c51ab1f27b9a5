// src/catalog/mod.rs

//! The ordered list of named targets that a multi-stage search must find.

use crate::core::{BitPattern, Result, SEARCH_WIDTH, SearchError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named search target, e.g. `("Alpha", "00")`. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetFragment {
    name: String,
    pattern: BitPattern,
}

impl TargetFragment {
    /// Creates a fragment from a name and an already parsed pattern.
    pub fn new(name: impl Into<String>, pattern: BitPattern) -> Self {
        Self { name: name.into(), pattern }
    }

    /// Parses `pattern` (a string of `0`/`1`) and creates a fragment.
    pub fn parse(name: impl Into<String>, pattern: &str) -> Result<Self> {
        Ok(Self::new(name, pattern.parse()?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &BitPattern {
        &self.pattern
    }
}

impl fmt::Display for TargetFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (|{}⟩)", self.name, self.pattern)
    }
}

/// Ordered, non-empty, read-only set of targets sharing a single width.
///
/// Stages are searched in catalog order; the width is the unit count of
/// every circuit built for this catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetCatalog {
    targets: Vec<TargetFragment>,
    width: usize,
}

impl TargetCatalog {
    /// Validates and freezes a list of targets.
    ///
    /// # Errors
    /// `SearchError::Configuration` if the list is empty or the patterns do
    /// not all share the width of the first one.
    pub fn new(targets: Vec<TargetFragment>) -> Result<Self> {
        let width = targets
            .first()
            .map(|t| t.pattern().width())
            .ok_or_else(|| SearchError::configuration("target catalog cannot be empty"))?;

        if let Some(odd) = targets.iter().find(|t| t.pattern().width() != width) {
            return Err(SearchError::configuration(format!(
                "target '{}' has width {} but the catalog width is {}",
                odd.name(),
                odd.pattern().width(),
                width
            )));
        }
        Ok(Self { targets, width })
    }

    /// Like [`TargetCatalog::new`], additionally requiring a specific width.
    pub fn with_width(targets: Vec<TargetFragment>, width: usize) -> Result<Self> {
        let catalog = Self::new(targets)?;
        if catalog.width != width {
            return Err(SearchError::configuration(format!(
                "catalog width {} does not match required unit count {}",
                catalog.width, width
            )));
        }
        Ok(catalog)
    }

    /// The three password fragments of the reference scenario:
    /// Alpha `00`, Beta `11`, Gamma `10`.
    pub fn reference() -> Self {
        let targets = vec![
            TargetFragment::new("Alpha", BitPattern::from_bits(vec![false, false])),
            TargetFragment::new("Beta", BitPattern::from_bits(vec![true, true])),
            TargetFragment::new("Gamma", BitPattern::from_bits(vec![true, false])),
        ];
        Self { targets, width: SEARCH_WIDTH }
    }

    /// Width shared by every pattern in the catalog.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn targets(&self) -> &[TargetFragment] {
        &self.targets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TargetFragment> {
        self.targets.iter()
    }
}

impl<'a> IntoIterator for &'a TargetCatalog {
    type Item = &'a TargetFragment;
    type IntoIter = std::slice::Iter<'a, TargetFragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}
