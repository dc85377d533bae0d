// src/simulation/engine.rs
use crate::core::{DensityMatrix, Operator, QtrajError, Result, TRACE_EPSILON};
use num_complex::Complex64;

/// Euler–Maruyama update of the stochastic master equation for one measured
/// two-level system.
///
/// For a state ρ, Hamiltonian H, measurement basis operator σ (collapse operator
/// `√γ·σ`) and Wiener increment dW:
///
/// ```text
/// drift      = (−i[H, ρ] + γ(σρσ − ½{σ², ρ})) · dt
/// innovation = √γ (σρ + ρσ − 2⟨σ⟩ρ) · dW,   ⟨σ⟩ = Tr(σρ)
/// raw        = ρ + drift + innovation
/// ```
///
/// followed by `½(raw + raw†)` and division by the trace.
/// (Internal visibility)
#[derive(Debug, Clone)]
pub(crate) struct SmeEngine {
    hamiltonian: Operator,
    measurement: Operator,
    /// σ², precomputed for the anticommutator term.
    measurement_sq: Operator,
    gamma: f64,
    sqrt_gamma: f64,
    dt: f64,
}

impl SmeEngine {
    pub(crate) fn new(hamiltonian: Operator, measurement: Operator, gamma: f64, dt: f64) -> Self {
        Self {
            hamiltonian,
            measurement,
            measurement_sq: measurement * measurement,
            gamma,
            sqrt_gamma: gamma.sqrt(),
            dt,
        }
    }

    /// Deterministic rate `−i[H, ρ] + γ(σρσ − ½{σ², ρ})`, not yet scaled by dt.
    pub(crate) fn drift(&self, rho: &Operator) -> Operator {
        let minus_i = Complex64::new(0.0, -1.0);
        let unitary = self.hamiltonian.commutator(rho) * minus_i;
        let sigma = self.measurement;
        let dissipator = sigma * *rho * sigma - self.measurement_sq.anticommutator(rho).scale(0.5);
        unitary + dissipator.scale(self.gamma)
    }

    /// Measurement backaction `√γ(σρ + ρσ − 2⟨σ⟩ρ)`, not yet scaled by dW.
    pub(crate) fn innovation(&self, rho: &Operator) -> Operator {
        let expect_sigma = self.measurement.trace_product(rho).re;
        let backaction = self.measurement.anticommutator(rho) - rho.scale(2.0 * expect_sigma);
        backaction.scale(self.sqrt_gamma)
    }

    /// Advances `state` by one step using the Wiener increment `dw`.
    ///
    /// `step` is the index of the state being produced and only feeds diagnostics.
    pub(crate) fn step(&self, state: &DensityMatrix, dw: f64, step: usize) -> Result<DensityMatrix> {
        let rho = state.operator();
        let raw = *rho + self.drift(rho).scale(self.dt) + self.innovation(rho).scale(dw);
        renormalize(raw, step)
    }
}

/// Forces Hermiticity by averaging with the conjugate transpose, then divides by
/// the trace.
///
/// # Returns
/// * `Err(QtrajError::InvalidDensityMatrix)` if the matrix holds non-finite values
///   or its trace is below [`TRACE_EPSILON`] in magnitude.
pub(crate) fn renormalize(raw: Operator, step: usize) -> Result<DensityMatrix> {
    let hermitian = (raw + raw.dagger()).scale(0.5);
    if !hermitian.is_finite() {
        tracing::warn!(step, "non-finite entries after stochastic update");
        return Err(QtrajError::InvalidDensityMatrix {
            step,
            message: format!("non-finite entries in {}", hermitian),
        });
    }
    // Diagonal of a Hermitian matrix is real, so the trace is too.
    let trace = hermitian.trace().re;
    if trace.abs() < TRACE_EPSILON {
        tracing::warn!(step, trace, "trace vanished during renormalization");
        return Err(QtrajError::InvalidDensityMatrix {
            step,
            message: format!("trace {:e} is too small to renormalize", trace),
        });
    }
    Ok(DensityMatrix::new_unchecked(hermitian.scale(1.0 / trace)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bloch::bloch_vector;

    const TEST_TOLERANCE: f64 = 1e-12;

    fn exercise_engine(gamma: f64, dt: f64) -> SmeEngine {
        SmeEngine::new(Operator::pauli_z().scale(0.5), Operator::pauli_x(), gamma, dt)
    }

    #[test]
    fn test_drift_is_traceless_and_hermitian() -> Result<()> {
        let engine = exercise_engine(0.3, 1e-3);
        let rho = DensityMatrix::from_bloch(0.2, 0.5, -0.4)?;
        let drift = engine.drift(rho.operator());
        assert!(drift.trace().norm() < TEST_TOLERANCE);
        assert!(drift.is_hermitian(TEST_TOLERANCE));
        Ok(())
    }

    #[test]
    fn test_innovation_is_traceless() -> Result<()> {
        let engine = exercise_engine(0.3, 1e-3);
        let rho = DensityMatrix::from_bloch(0.6, -0.1, 0.3)?;
        let innovation = engine.innovation(rho.operator());
        assert!(innovation.trace().norm() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_dissipator_dephases_z() -> Result<()> {
        // H = 0 and σ = σx: D[σx] drives z at rate -2γ z and leaves x untouched
        let gamma = 0.25;
        let engine = SmeEngine::new(Operator::zero(), Operator::pauli_x(), gamma, 1.0);
        let rho = DensityMatrix::from_bloch(0.5, 0.0, 0.8)?;
        let rate = DensityMatrix::new_unchecked(*rho.operator() + engine.drift(rho.operator()));
        let v = bloch_vector(&rate)?;
        assert!((v.x - 0.5).abs() < TEST_TOLERANCE);
        assert!((v.z - (0.8 - 2.0 * gamma * 0.8)).abs() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_step_keeps_trace_and_hermiticity() -> Result<()> {
        let engine = exercise_engine(0.1, 5e-3);
        let next = engine.step(&DensityMatrix::ground(), 0.07, 1)?;
        assert!((next.trace() - Complex64::new(1.0, 0.0)).norm() < TEST_TOLERANCE);
        assert!(next.operator().is_hermitian(TEST_TOLERANCE));
        Ok(())
    }

    #[test]
    fn test_ground_state_is_stationary_without_measurement() -> Result<()> {
        let engine = exercise_engine(0.0, 1e-2);
        let next = engine.step(&DensityMatrix::ground(), 0.9, 1)?;
        assert_eq!(next, DensityMatrix::ground());
        Ok(())
    }

    #[test]
    fn test_renormalize_rejects_zero_trace() {
        let traceless = Operator::pauli_z();
        let err = renormalize(traceless, 7).unwrap_err();
        assert!(matches!(err, QtrajError::InvalidDensityMatrix { step: 7, .. }));
    }

    #[test]
    fn test_renormalize_rejects_nan() {
        let poisoned = Operator::identity().scale(f64::NAN);
        assert!(matches!(
            renormalize(poisoned, 3),
            Err(QtrajError::InvalidDensityMatrix { step: 3, .. })
        ));
    }

    #[test]
    fn test_renormalize_rescales_trace() -> Result<()> {
        let raw = Operator::from_real([[1.5, 0.2], [0.0, 0.5]]);
        let state = renormalize(raw, 1)?;
        assert!((state.trace() - Complex64::new(1.0, 0.0)).norm() < TEST_TOLERANCE);
        assert!((state.operator().entries()[0][1].re - 0.05).abs() < TEST_TOLERANCE);
        assert!((state.operator().entries()[1][0].re - 0.05).abs() < TEST_TOLERANCE);
        Ok(())
    }
}
