// src/core/state.rs

use super::constants::{DEFAULT_HERMITICITY_TOLERANCE, DEFAULT_TRACE_TOLERANCE};
use super::error::{QtrajError, Result};
use super::operator::Operator;
use num_complex::Complex64;
use std::fmt;

/// The state of a two-level system at one time step.
///
/// A 2×2 complex Hermitian matrix with unit trace. Values of this type are only
/// produced by constructors that either build a valid state by construction or
/// check the invariants, so a `DensityMatrix` can be handed to expectation
/// values without further checks.
///
/// Positivity is not enforced: the trajectory integrator keeps Hermiticity and
/// trace exact but its Euler update can step outside the Bloch ball.
#[derive(Debug, Clone, Copy, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct DensityMatrix {
    matrix: Operator,
}

impl DensityMatrix {
    /// Wraps an operator the caller has already made Hermitian with unit trace.
    pub(crate) fn new_unchecked(matrix: Operator) -> Self {
        Self { matrix }
    }

    /// The pure state |0⟩⟨0|, the default starting point of a trajectory.
    pub fn ground() -> Self {
        Self::new_unchecked(Operator::from_real([[1.0, 0.0], [0.0, 0.0]]))
    }

    /// The pure state |1⟩⟨1|.
    pub fn excited() -> Self {
        Self::new_unchecked(Operator::from_real([[0.0, 0.0], [0.0, 1.0]]))
    }

    /// Builds `|ψ⟩⟨ψ|` from a ket, normalizing it first.
    ///
    /// # Returns
    /// * `Err(QtrajError::InvalidParameter)` if the ket has zero or non-finite norm.
    pub fn from_pure(ket: [Complex64; 2]) -> Result<Self> {
        let norm_sq: f64 = ket.iter().map(|c| c.norm_sqr()).sum();
        if !norm_sq.is_finite() || norm_sq < f64::EPSILON {
            return Err(QtrajError::InvalidParameter {
                message: format!("Cannot build a pure state from ket with squared norm {}", norm_sq),
            });
        }
        let scale = 1.0 / norm_sq.sqrt();
        let normalized = [ket[0] * scale, ket[1] * scale];
        Ok(Self::new_unchecked(Operator::projector(&normalized)))
    }

    /// Builds `(I + x·σx + y·σy + z·σz) / 2`.
    ///
    /// Any finite vector gives a Hermitian, unit-trace matrix; vectors longer than
    /// one describe non-physical states and are accepted as such.
    pub fn from_bloch(x: f64, y: f64, z: f64) -> Result<Self> {
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Err(QtrajError::InvalidParameter {
                message: format!("Bloch components must be finite, got ({}, {}, {})", x, y, z),
            });
        }
        let matrix = (Operator::identity()
            + Operator::pauli_x().scale(x)
            + Operator::pauli_y().scale(y)
            + Operator::pauli_z().scale(z))
        .scale(0.5);
        Ok(Self::new_unchecked(matrix))
    }

    /// Validates an arbitrary operator as a density matrix using default tolerances.
    ///
    /// # Returns
    /// * `Err(QtrajError::NonHermitian)` if `‖ρ − ρ†‖_F` is not below tolerance.
    /// * `Err(QtrajError::TraceViolation)` if the trace is not one within tolerance.
    pub fn from_operator(matrix: Operator) -> Result<Self> {
        if !matrix.is_hermitian(DEFAULT_HERMITICITY_TOLERANCE) {
            return Err(QtrajError::NonHermitian {
                message: format!("Operator {} is not Hermitian", matrix),
            });
        }
        let trace = matrix.trace();
        if (trace - Complex64::new(1.0, 0.0)).norm() > DEFAULT_TRACE_TOLERANCE {
            return Err(QtrajError::TraceViolation {
                message: format!("Operator trace {} differs from 1", trace),
            });
        }
        Ok(Self::new_unchecked(matrix))
    }

    /// Read-only access to the underlying matrix.
    pub fn operator(&self) -> &Operator {
        &self.matrix
    }

    pub fn trace(&self) -> Complex64 {
        self.matrix.trace()
    }

    /// `Tr(ρ²)`; one for pure states, one half for the maximally mixed state.
    pub fn purity(&self) -> f64 {
        self.matrix.trace_product(&self.matrix).re
    }

    /// Arithmetic mean of a non-empty set of states.
    pub(crate) fn mean<'a, I>(states: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a DensityMatrix>,
    {
        let mut sum = Operator::zero();
        let mut count = 0usize;
        for state in states {
            sum = sum + state.matrix;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some(Self::new_unchecked(sum.scale(1.0 / count as f64)))
    }
}

impl Default for DensityMatrix {
    fn default() -> Self {
        Self::ground()
    }
}

impl fmt::Display for DensityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rho{}", self.matrix)
    }
}

/// Distance of the trace from one in the complex plane.
pub(crate) fn trace_deviation(state: &DensityMatrix) -> f64 {
    (state.trace() - Complex64::new(1.0, 0.0)).norm()
}
