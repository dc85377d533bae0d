//! Error handling logic

use thiserror::Error;

/// Error types raised while integrating trajectories or solving the control problem.
/// A run either completes every step or aborts with one of these; no partial
/// results are returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)] // Eq useful for testing error variants
pub enum QtrajError {
    /// Renormalization hit a trace that is numerically zero or not finite.
    #[error("Invalid Density Matrix at step {step}: {message}")]
    InvalidDensityMatrix {
        /// Index of the trajectory step that produced the state
        step: usize,
        /// InvalidDensityMatrix failure message
        message: String,
    },

    /// A configuration value is outside its allowed range.
    #[error("Invalid Parameter: {message}")]
    InvalidParameter {
        /// InvalidParameter failure message
        message: String,
    },

    /// Operator differs from its conjugate transpose beyond tolerance.
    #[error("Hermiticity Violation: {message}")]
    NonHermitian {
        /// NonHermitian failure message
        message: String,
    },

    /// State trace deviates from one beyond tolerance.
    #[error("Trace Violation: {message}")]
    TraceViolation {
        /// TraceViolation failure message
        message: String,
    },

    /// A Bloch component lies outside `[-1, 1]` beyond tolerance.
    #[error("Bloch Bound Violation: {message}")]
    BlochBoundViolation {
        /// BlochBoundViolation failure message
        message: String,
    },

    /// An expectation value carried a non-negligible imaginary part.
    #[error("Complex Expectation: {message}")]
    ComplexExpectation {
        /// ComplexExpectation failure message
        message: String,
    },

    /// The ODE solver produced a non-finite state.
    #[error("Integration Error: {message}")]
    IntegrationError {
        /// IntegrationError failure message
        message: String,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, QtrajError>;
