//! Error handling logic

use std::fmt;
use thiserror::Error;

/// Identifier of a single search unit (one two-level element of the search space).
/// Unit `i` corresponds to position `i` of every target pattern and every
/// measured outcome string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub usize);

impl UnitId {
    /// Position of this unit inside patterns and outcome strings.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U({})", self.0)
    }
}

/// Failures raised while building, executing or evaluating search circuits.
///
/// Nothing in the crate retries on any of these; they surface to the caller
/// as soon as they occur.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Invalid experiment setup: a target pattern whose width differs from the
    /// circuit's unit count, a zero shot count, an empty catalog and the like.
    /// Always raised before the affected stage reaches a backend.
    #[error("Configuration Error: {message}")]
    Configuration {
        /// Configuration failure message
        message: String,
    },

    /// The execution backend failed, or returned malformed data
    /// (wrong outcome width, empty or short multiset).
    #[error("Backend Error: {message}")]
    Backend {
        /// Backend failure message
        message: String,
    },

    /// An operation that is inconsistent with the circuit it is applied to.
    #[error("Invalid Operation: {message}")]
    InvalidOperation {
        /// InvalidOperation failure message
        message: String,
    },

    /// Numerical failure inside the state-vector simulator.
    #[error("Simulation Process Error: {message}")]
    Simulation {
        /// Simulation failure message
        message: String,
    },

    /// Reading a config file or writing a results artifact failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SearchError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        SearchError::Configuration { message: message.into() }
    }

    pub(crate) fn backend(message: impl Into<String>) -> Self {
        SearchError::Backend { message: message.into() }
    }
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, SearchError>;
