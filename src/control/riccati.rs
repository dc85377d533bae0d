// src/control/riccati.rs

use super::OscillatorParams;
use super::dynamics::{Matrix2, mat_mul, transpose};
use crate::core::Result;
use std::fmt;

/// Stabilizing solution `P` of the algebraic Riccati equation
/// `AᵀP + PA − PBBᵀP + Q = 0` for the damped oscillator with `Q = I`, `R = 1`
/// and `B = [0, 1]ᵀ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiccatiSolution {
    p: Matrix2,
}

impl RiccatiSolution {
    /// Evaluates the closed-form solution
    ///
    /// ```text
    /// term1 = 1 + 1/(m²ω0⁴)
    /// P12   = m ω0² (−1 + √term1)
    /// term2 = γ² + 2ω0²(−1 + √term1) + 1
    /// P22   = −γ + √term2
    /// P11   = m² ω0² (−γ + √(term2 · term1))
    /// ```
    pub fn closed_form(params: &OscillatorParams) -> Result<Self> {
        params.validate()?;
        let OscillatorParams { mass: m, omega0: w, damping: g } = *params;

        let term1 = 1.0 + 1.0 / (m.powi(2) * w.powi(4));
        let root1 = term1.sqrt();
        let p12 = m * w.powi(2) * (-1.0 + root1);
        let term2 = g.powi(2) + 2.0 * w.powi(2) * (-1.0 + root1) + 1.0;
        let p22 = -g + term2.sqrt();
        let p11 = m.powi(2) * w.powi(2) * (-g + (term2 * term1).sqrt());

        tracing::debug!(p11, p12, p22, "closed-form Riccati solution");
        Ok(Self { p: [[p11, p12], [p12, p22]] })
    }

    pub fn matrix(&self) -> &Matrix2 {
        &self.p
    }

    /// Optimal feedback gain `K = BᵀP`, i.e. the second row of `P`.
    pub fn gain(&self) -> [f64; 2] {
        self.p[1]
    }

    /// Left-hand side `AᵀP + PA − PBBᵀP + I`; zero for an exact solution.
    pub fn residual(&self, params: &OscillatorParams) -> Matrix2 {
        let a = params.dynamics_matrix();
        let p = self.p;
        let at_p = mat_mul(&transpose(&a), &p);
        let p_a = mat_mul(&p, &a);
        let mut out = [[0.0; 2]; 2];
        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, value) in out_row.iter_mut().enumerate() {
                // PBBᵀP picks the second column and second row of P
                let pbbp = p[row][1] * p[1][col];
                let identity = if row == col { 1.0 } else { 0.0 };
                *value = at_p[row][col] + p_a[row][col] - pbbp + identity;
            }
        }
        out
    }
}

impl fmt::Display for RiccatiSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "P matrix:")?;
        writeln!(f, "[[{:.8}, {:.8}],", self.p[0][0], self.p[0][1])?;
        write!(f, " [{:.8}, {:.8}]]", self.p[1][0], self.p[1][1])
    }
}
