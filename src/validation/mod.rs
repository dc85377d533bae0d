// src/validation/mod.rs

//! Provides functions to validate `DensityMatrix` states and trajectories.

use crate::bloch::BlochVector;
use crate::core::{
    DEFAULT_HERMITICITY_TOLERANCE, DEFAULT_TRACE_TOLERANCE, DensityMatrix, Operator, QtrajError,
    Result,
};
use crate::core::state::trace_deviation;
use crate::simulation::Trajectory;

// Default tolerance for Bloch components (can be overridden by caller)
const DEFAULT_BLOCH_TOLERANCE: f64 = 1e-9;

/// Checks that the trace of the state equals one.
///
/// # Arguments
/// * `state` - The `DensityMatrix` to check.
/// * `tolerance` - Allowed deviation from 1.0 (e.g., 1e-9). Defaults are available.
///
/// # Returns
/// * `Ok(())` if the trace is one within tolerance.
/// * `Err(QtrajError::TraceViolation)` otherwise.
pub fn check_trace(state: &DensityMatrix, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_TRACE_TOLERANCE);
    let deviation = trace_deviation(state);
    if deviation > effective_tolerance {
        Err(QtrajError::TraceViolation {
            message: format!("Tr(rho) = {} (Deviation {:.3e} > {})", state.trace(), deviation, effective_tolerance)
        })
    } else {
        Ok(())
    }
}

/// Checks that an operator equals its conjugate transpose.
///
/// # Returns
/// * `Ok(())` if `‖op − op†‖_F` is below tolerance.
/// * `Err(QtrajError::NonHermitian)` otherwise.
pub fn check_hermiticity(op: &Operator, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_HERMITICITY_TOLERANCE);
    let distance = (*op - op.dagger()).frobenius_norm();
    if distance < effective_tolerance {
        Ok(())
    } else {
        Err(QtrajError::NonHermitian {
            message: format!("||op - op^dagger|| = {:.3e} (Threshold {})", distance, effective_tolerance)
        })
    }
}

/// Checks the physical bound `|component| <= 1` for each Bloch component.
///
/// # Returns
/// * `Ok(())` if every component lies in `[-1 - tol, 1 + tol]`.
/// * `Err(QtrajError::BlochBoundViolation)` naming the first offending axis.
pub fn check_bloch_bounds(vector: &BlochVector, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_BLOCH_TOLERANCE);
    for (axis, value) in ["x", "y", "z"].iter().zip(vector.components()) {
        if value.abs() > 1.0 + effective_tolerance {
            return Err(QtrajError::BlochBoundViolation {
                message: format!("Component {} = {:.6} outside [-1, 1] (Tolerance {})", axis, value, effective_tolerance)
            });
        }
    }
    Ok(())
}

/// Performs the density-matrix invariant checks on one state.
/// Uses default tolerance values unless specified.
///
/// # Arguments
/// * `state` - The `DensityMatrix` to validate.
/// * `trace_tolerance` - Optional allowed deviation from 1.0 for the trace.
/// * `hermiticity_tolerance` - Optional bound on `‖ρ − ρ†‖_F`.
pub fn validate_state(
    state: &DensityMatrix,
    trace_tolerance: Option<f64>,
    hermiticity_tolerance: Option<f64>,
) -> Result<()> {
    check_hermiticity(state.operator(), hermiticity_tolerance)?;
    check_trace(state, trace_tolerance)?;
    Ok(())
}

/// Validates every state of a trajectory, prefixing failures with the step index.
pub fn validate_trajectory(
    trajectory: &Trajectory,
    trace_tolerance: Option<f64>,
    hermiticity_tolerance: Option<f64>,
) -> Result<()> {
    for (step, state) in trajectory.states().iter().enumerate() {
        validate_state(state, trace_tolerance, hermiticity_tolerance).map_err(|e| match e {
            QtrajError::TraceViolation { message } => QtrajError::TraceViolation {
                message: format!("step {}: {}", step, message),
            },
            QtrajError::NonHermitian { message } => QtrajError::NonHermitian {
                message: format!("step {}: {}", step, message),
            },
            other => other,
        })?;
    }
    Ok(())
}
