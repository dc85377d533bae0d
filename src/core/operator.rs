// src/core/operator.rs

use num_complex::Complex64;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A fixed 2×2 complex matrix acting on a two-level system.
///
/// Used for Hamiltonians, measurement operators and the Pauli basis. Operators
/// are plain values: every arithmetic operation returns a new matrix and the
/// inputs of a run are never mutated.
#[derive(Debug, Clone, Copy, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct Operator {
    entries: [[Complex64; 2]; 2],
}

impl Operator {
    /// Creates an operator from row-major entries.
    pub fn new(entries: [[Complex64; 2]; 2]) -> Self {
        Self { entries }
    }

    /// Creates an operator with purely real entries.
    pub fn from_real(entries: [[f64; 2]; 2]) -> Self {
        Self::new([
            [Complex64::new(entries[0][0], 0.0), Complex64::new(entries[0][1], 0.0)],
            [Complex64::new(entries[1][0], 0.0), Complex64::new(entries[1][1], 0.0)],
        ])
    }

    pub fn zero() -> Self {
        Self::new([[Complex64::zero(); 2]; 2])
    }

    pub fn identity() -> Self {
        Self::new([
            [Complex64::one(), Complex64::zero()],
            [Complex64::zero(), Complex64::one()],
        ])
    }

    /// Pauli X: `[[0, 1], [1, 0]]`.
    pub fn pauli_x() -> Self {
        Self::from_real([[0.0, 1.0], [1.0, 0.0]])
    }

    /// Pauli Y: `[[0, -i], [i, 0]]`.
    pub fn pauli_y() -> Self {
        let i = Complex64::i();
        Self::new([[Complex64::zero(), -i], [i, Complex64::zero()]])
    }

    /// Pauli Z: `[[1, 0], [0, -1]]`.
    pub fn pauli_z() -> Self {
        Self::from_real([[1.0, 0.0], [0.0, -1.0]])
    }

    /// Outer product `|ket⟩⟨ket|`.
    pub fn projector(ket: &[Complex64; 2]) -> Self {
        let mut entries = [[Complex64::zero(); 2]; 2];
        for (row, a) in ket.iter().enumerate() {
            for (col, b) in ket.iter().enumerate() {
                entries[row][col] = a * b.conj();
            }
        }
        Self::new(entries)
    }

    /// The entry at `(row, col)`, or `None` outside the 2×2 range.
    pub fn get(&self, row: usize, col: usize) -> Option<Complex64> {
        self.entries.get(row)?.get(col).copied()
    }

    pub fn entries(&self) -> &[[Complex64; 2]; 2] {
        &self.entries
    }

    /// Conjugate transpose.
    pub fn dagger(&self) -> Self {
        let e = &self.entries;
        Self::new([
            [e[0][0].conj(), e[1][0].conj()],
            [e[0][1].conj(), e[1][1].conj()],
        ])
    }

    pub fn trace(&self) -> Complex64 {
        self.entries[0][0] + self.entries[1][1]
    }

    /// `Tr(self · other)` without forming the full product.
    pub fn trace_product(&self, other: &Operator) -> Complex64 {
        let a = &self.entries;
        let b = &other.entries;
        a[0][0] * b[0][0] + a[0][1] * b[1][0] + a[1][0] * b[0][1] + a[1][1] * b[1][1]
    }

    /// Commutator `[self, other] = self·other − other·self`.
    pub fn commutator(&self, other: &Operator) -> Self {
        *self * *other - *other * *self
    }

    /// Anticommutator `{self, other} = self·other + other·self`.
    pub fn anticommutator(&self, other: &Operator) -> Self {
        *self * *other + *other * *self
    }

    /// Multiplies every entry by a real factor.
    pub fn scale(&self, factor: f64) -> Self {
        self.scale_complex(Complex64::new(factor, 0.0))
    }

    /// Multiplies every entry by a complex factor.
    pub fn scale_complex(&self, factor: Complex64) -> Self {
        let mut entries = self.entries;
        for row in entries.iter_mut() {
            for value in row.iter_mut() {
                *value *= factor;
            }
        }
        Self::new(entries)
    }

    /// Frobenius norm `sqrt(Σ |a_ij|²)`.
    pub fn frobenius_norm(&self) -> f64 {
        self.entries
            .iter()
            .flat_map(|row| row.iter())
            .map(|c| c.norm_sqr())
            .sum::<f64>()
            .sqrt()
    }

    /// Returns `true` if `‖self − self†‖_F < tolerance`.
    pub fn is_hermitian(&self, tolerance: f64) -> bool {
        (*self - self.dagger()).frobenius_norm() < tolerance
    }

    /// Returns `true` if every entry has finite real and imaginary parts.
    pub fn is_finite(&self) -> bool {
        self.entries
            .iter()
            .flat_map(|row| row.iter())
            .all(|c| c.re.is_finite() && c.im.is_finite())
    }
}

impl Default for Operator {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Operator {
    type Output = Operator;

    fn add(self, rhs: Operator) -> Operator {
        let mut entries = self.entries;
        for (row, rhs_row) in entries.iter_mut().zip(rhs.entries.iter()) {
            for (value, rhs_value) in row.iter_mut().zip(rhs_row.iter()) {
                *value += rhs_value;
            }
        }
        Operator::new(entries)
    }
}

impl Sub for Operator {
    type Output = Operator;

    fn sub(self, rhs: Operator) -> Operator {
        self + (-rhs)
    }
}

impl Neg for Operator {
    type Output = Operator;

    fn neg(self) -> Operator {
        self.scale(-1.0)
    }
}

impl Mul for Operator {
    type Output = Operator;

    fn mul(self, rhs: Operator) -> Operator {
        let a = &self.entries;
        let b = &rhs.entries;
        let mut entries = [[Complex64::zero(); 2]; 2];
        for (row, out_row) in entries.iter_mut().enumerate() {
            for (col, out) in out_row.iter_mut().enumerate() {
                *out = a[row][0] * b[0][col] + a[row][1] * b[1][col];
            }
        }
        Operator::new(entries)
    }
}

impl Mul<f64> for Operator {
    type Output = Operator;

    fn mul(self, rhs: f64) -> Operator {
        self.scale(rhs)
    }
}

impl Mul<Complex64> for Operator {
    type Output = Operator;

    fn mul(self, rhs: Complex64) -> Operator {
        self.scale_complex(rhs)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &self.entries;
        write!(
            f,
            "[[{:.4}, {:.4}], [{:.4}, {:.4}]]",
            e[0][0], e[0][1], e[1][0], e[1][1]
        )
    }
}
