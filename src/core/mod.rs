// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod pattern;
pub mod state;

// Re-export public types for convenient access via `vermicular::core::TypeName`
pub use error::{Result, SearchError, UnitId};
pub use pattern::BitPattern;
pub use state::AmplitudeState;

pub mod constants;
pub use constants::search_constants::{
    AUGMENTED_ITERATIONS, BASELINE_DEEP_ITERATIONS, BASELINE_DEPTH_THRESHOLD,
    BASELINE_SHALLOW_ITERATIONS, SEARCH_WIDTH,
};
