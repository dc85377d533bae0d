// src/core/mod.rs

//! Core data structures and types

// Declare modules within core
pub mod constants;
pub mod error;
pub mod operator;
pub mod state;

// Re-export public types for convenient access via `qtraj::core::TypeName`
pub use error::{QtrajError, Result};
pub use operator::Operator;
pub use state::DensityMatrix;
pub use constants::{
    DEFAULT_HERMITICITY_TOLERANCE, DEFAULT_TRACE_TOLERANCE, IMAGINARY_TOLERANCE, TRACE_EPSILON,
};
