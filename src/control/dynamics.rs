// src/control/dynamics.rs

/// Row-major real 2×2 matrix.
pub type Matrix2 = [[f64; 2]; 2];

/// Right-hand side of an autonomous or time-dependent ODE on a 2-vector state.
pub trait Dynamics {
    /// Time derivative `ẋ` at `(t, x)`.
    fn derivative(&self, t: f64, x: &[f64; 2]) -> [f64; 2];
}

/// Linear time-invariant system `ẋ = M·x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSystem {
    matrix: Matrix2,
}

impl LinearSystem {
    pub fn new(matrix: Matrix2) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix2 {
        &self.matrix
    }

    /// Trace and determinant decide stability for a 2×2 system: the system is
    /// Hurwitz iff `tr < 0` and `det > 0`.
    pub fn is_hurwitz(&self) -> bool {
        let m = &self.matrix;
        let trace = m[0][0] + m[1][1];
        let det = m[0][0] * m[1][1] - m[0][1] * m[1][0];
        trace < 0.0 && det > 0.0
    }
}

impl Dynamics for LinearSystem {
    fn derivative(&self, _t: f64, x: &[f64; 2]) -> [f64; 2] {
        mat_vec(&self.matrix, x)
    }
}

pub(crate) fn mat_vec(m: &Matrix2, x: &[f64; 2]) -> [f64; 2] {
    [
        m[0][0] * x[0] + m[0][1] * x[1],
        m[1][0] * x[0] + m[1][1] * x[1],
    ]
}

pub(crate) fn mat_mul(a: &Matrix2, b: &Matrix2) -> Matrix2 {
    let mut out = [[0.0; 2]; 2];
    for (row, out_row) in out.iter_mut().enumerate() {
        for (col, value) in out_row.iter_mut().enumerate() {
            *value = a[row][0] * b[0][col] + a[row][1] * b[1][col];
        }
    }
    out
}

pub(crate) fn transpose(m: &Matrix2) -> Matrix2 {
    [[m[0][0], m[1][0]], [m[0][1], m[1][1]]]
}
