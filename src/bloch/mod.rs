// src/bloch/mod.rs

//! Projection of density matrices onto the Pauli basis.
//!
//! A single-qubit state is fully described by the three real expectation values
//! `(⟨σx⟩, ⟨σy⟩, ⟨σz⟩)`. This module computes them for individual states and
//! whole trajectories; drawing the sphere is left to the caller.

use crate::core::{DensityMatrix, IMAGINARY_TOLERANCE, Operator, QtrajError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expectation values of the three Pauli operators against one state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BlochVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl BlochVector {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length; one for pure states, below one for mixtures.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn components(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Builds the state this vector describes.
    pub fn to_density_matrix(&self) -> Result<DensityMatrix> {
        DensityMatrix::from_bloch(self.x, self.y, self.z)
    }
}

impl From<BlochVector> for [f64; 3] {
    fn from(v: BlochVector) -> [f64; 3] {
        v.components()
    }
}

impl fmt::Display for BlochVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }
}

/// Three fixed observables defining the projection axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PauliBasis {
    x: Operator,
    y: Operator,
    z: Operator,
}

impl PauliBasis {
    /// The standard basis `(σx, σy, σz)`.
    pub fn standard() -> Self {
        Self {
            x: Operator::pauli_x(),
            y: Operator::pauli_y(),
            z: Operator::pauli_z(),
        }
    }

    /// Uses caller-supplied observables as the three axes.
    pub fn new(x: Operator, y: Operator, z: Operator) -> Self {
        Self { x, y, z }
    }

    pub fn operators(&self) -> [&Operator; 3] {
        [&self.x, &self.y, &self.z]
    }

    /// Projects one state onto the basis.
    pub fn project(&self, state: &DensityMatrix) -> Result<BlochVector> {
        Ok(BlochVector {
            x: expectation(&self.x, state)?,
            y: expectation(&self.y, state)?,
            z: expectation(&self.z, state)?,
        })
    }
}

impl Default for PauliBasis {
    fn default() -> Self {
        Self::standard()
    }
}

/// Real expectation value `Tr(Oρ)` of a Hermitian observable.
///
/// Floating-point residue in the imaginary part is discarded as long as it stays
/// below [`IMAGINARY_TOLERANCE`].
///
/// # Returns
/// * `Err(QtrajError::ComplexExpectation)` if the imaginary part is larger, which
///   means the observable is not Hermitian.
pub fn expectation(observable: &Operator, state: &DensityMatrix) -> Result<f64> {
    let value = observable.trace_product(state.operator());
    if value.im.abs() > IMAGINARY_TOLERANCE {
        return Err(QtrajError::ComplexExpectation {
            message: format!("Tr(O rho) = {} has imaginary part above {:e}", value, IMAGINARY_TOLERANCE),
        });
    }
    Ok(value.re)
}

/// Projects a state onto the standard Pauli basis.
pub fn bloch_vector(state: &DensityMatrix) -> Result<BlochVector> {
    PauliBasis::standard().project(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use std::f64::consts::FRAC_1_SQRT_2;

    const TEST_TOLERANCE: f64 = 1e-12;

    fn assert_bloch_approx_equal(actual: &BlochVector, expected: &BlochVector, context: &str) {
        for (a, e) in actual.components().iter().zip(expected.components().iter()) {
            assert!(
                (a - e).abs() < TEST_TOLERANCE,
                "Bloch mismatch - Actual: {}, Expected: {}, Context: {}",
                actual, expected, context
            );
        }
    }

    #[test]
    fn test_poles_and_equator() -> Result<()> {
        let h = FRAC_1_SQRT_2;
        let cases = [
            ([Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)], BlochVector::new(0.0, 0.0, 1.0), "|0>"),
            ([Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)], BlochVector::new(0.0, 0.0, -1.0), "|1>"),
            ([Complex64::new(h, 0.0), Complex64::new(h, 0.0)], BlochVector::new(1.0, 0.0, 0.0), "|+>"),
            ([Complex64::new(h, 0.0), Complex64::new(-h, 0.0)], BlochVector::new(-1.0, 0.0, 0.0), "|->"),
            ([Complex64::new(h, 0.0), Complex64::new(0.0, h)], BlochVector::new(0.0, 1.0, 0.0), "|+i>"),
        ];
        for (ket, expected, label) in cases {
            let state = DensityMatrix::from_pure(ket)?;
            assert_bloch_approx_equal(&bloch_vector(&state)?, &expected, label);
        }
        Ok(())
    }

    #[test]
    fn test_round_trip_through_state() -> Result<()> {
        let v = BlochVector::new(0.3, -0.4, 0.5);
        let back = bloch_vector(&v.to_density_matrix()?)?;
        assert_bloch_approx_equal(&back, &v, "mixed state");
        assert!(back.norm() < 1.0);
        Ok(())
    }

    #[test]
    fn test_non_hermitian_observable_rejected() {
        // σ+ = |0><1| has Tr(σ+ ρ) = ρ_10, complex for |+i>
        let raising = Operator::new([
            [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0)],
        ]);
        let state = DensityMatrix::from_bloch(0.0, 1.0, 0.0).expect("valid vector");
        let result = expectation(&raising, &state);
        assert!(matches!(result, Err(QtrajError::ComplexExpectation { .. })));
    }

    #[test]
    fn test_custom_basis_order() -> Result<()> {
        let basis = PauliBasis::new(Operator::pauli_z(), Operator::pauli_x(), Operator::pauli_y());
        let v = basis.project(&DensityMatrix::ground())?;
        assert_bloch_approx_equal(&v, &BlochVector::new(1.0, 0.0, 0.0), "z first");
        Ok(())
    }
}
