// src/control/integrate.rs

use super::dynamics::Dynamics;
use crate::core::{QtrajError, Result};
use serde::{Deserialize, Serialize};

/// Samples of a 2-vector ODE solution on an evenly spaced grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTrajectory {
    times: Vec<f64>,
    states: Vec<[f64; 2]>,
}

impl StateTrajectory {
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[[f64; 2]] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The `index`-th state component (0 = position, 1 = velocity) over time,
    /// or `None` if `index` is not 0 or 1.
    pub fn component(&self, index: usize) -> Option<Vec<f64>> {
        if index >= 2 {
            return None;
        }
        Some(self.states.iter().map(|x| x[index]).collect())
    }

    pub fn last(&self) -> Option<&[f64; 2]> {
        self.states.last()
    }
}

/// Integrates `system` from `x0` with the classical fourth-order Runge–Kutta
/// method, recording `samples` states on `linspace(t0, t1, samples)`.
///
/// Each interval between two samples is covered by `substeps` equal RK4 steps.
///
/// # Returns
/// * `Err(QtrajError::InvalidParameter)` if `samples < 2`, `substeps == 0`, the
///   span is not finite and increasing, or `x0` is not finite.
/// * `Err(QtrajError::IntegrationError)` if the state stops being finite.
pub fn solve<D: Dynamics + ?Sized>(
    system: &D,
    x0: [f64; 2],
    t_span: (f64, f64),
    samples: usize,
    substeps: usize,
) -> Result<StateTrajectory> {
    let (t0, t1) = t_span;
    if samples < 2 {
        return Err(QtrajError::InvalidParameter {
            message: format!("Need at least 2 samples, got {}", samples),
        });
    }
    if substeps == 0 {
        return Err(QtrajError::InvalidParameter {
            message: "Need at least one RK4 step per sample interval".to_string(),
        });
    }
    if !(t0.is_finite() && t1.is_finite()) || t1 <= t0 {
        return Err(QtrajError::InvalidParameter {
            message: format!("Time span must be finite and increasing, got ({}, {})", t0, t1),
        });
    }
    if !(x0[0].is_finite() && x0[1].is_finite()) {
        return Err(QtrajError::InvalidParameter {
            message: format!("Initial state must be finite, got {:?}", x0),
        });
    }

    let interval = (t1 - t0) / (samples - 1) as f64;
    let h = interval / substeps as f64;
    let mut times = Vec::with_capacity(samples);
    let mut states = Vec::with_capacity(samples);
    let mut x = x0;
    times.push(t0);
    states.push(x);

    for sample in 1..samples {
        let start = t0 + (sample - 1) as f64 * interval;
        for sub in 0..substeps {
            x = rk4_step(system, start + sub as f64 * h, &x, h);
        }
        if !(x[0].is_finite() && x[1].is_finite()) {
            return Err(QtrajError::IntegrationError {
                message: format!("State became non-finite at sample {}", sample),
            });
        }
        // Pin the final sample to t1 exactly
        let t = if sample == samples - 1 { t1 } else { t0 + sample as f64 * interval };
        times.push(t);
        states.push(x);
    }

    tracing::debug!(samples, substeps, h, "RK4 solve complete");
    Ok(StateTrajectory { times, states })
}

fn rk4_step<D: Dynamics + ?Sized>(system: &D, t: f64, x: &[f64; 2], h: f64) -> [f64; 2] {
    let axpy = |base: &[f64; 2], k: &[f64; 2], scale: f64| [base[0] + scale * k[0], base[1] + scale * k[1]];
    let k1 = system.derivative(t, x);
    let k2 = system.derivative(t + 0.5 * h, &axpy(x, &k1, 0.5 * h));
    let k3 = system.derivative(t + 0.5 * h, &axpy(x, &k2, 0.5 * h));
    let k4 = system.derivative(t + h, &axpy(x, &k3, h));
    [
        x[0] + h / 6.0 * (k1[0] + 2.0 * k2[0] + 2.0 * k3[0] + k4[0]),
        x[1] + h / 6.0 * (k1[1] + 2.0 * k2[1] + 2.0 * k3[1] + k4[1]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::dynamics::LinearSystem;

    /// ẋ = (1, t): exercises the explicit time argument.
    struct Ramp;

    impl Dynamics for Ramp {
        fn derivative(&self, t: f64, _x: &[f64; 2]) -> [f64; 2] {
            [1.0, t]
        }
    }

    #[test]
    fn test_time_dependent_rhs_is_exact() -> Result<()> {
        // x1 = t, x2 = t²/2; RK4 integrates polynomials up to degree 4 exactly
        let solution = solve(&Ramp, [0.0, 0.0], (0.0, 2.0), 5, 1)?;
        let last = solution.last().copied().unwrap_or([f64::NAN; 2]);
        assert!((last[0] - 2.0).abs() < 1e-12);
        assert!((last[1] - 2.0).abs() < 1e-12);
        assert_eq!(solution.times(), &[0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_eq!(solution.component(0), Some(vec![0.0, 0.5, 1.0, 1.5, 2.0]));
        assert_eq!(solution.component(2), None);
        Ok(())
    }

    #[test]
    fn test_exponential_decay() -> Result<()> {
        let system = LinearSystem::new([[-1.0, 0.0], [0.0, -2.0]]);
        let solution = solve(&system, [1.0, 1.0], (0.0, 1.0), 11, 20)?;
        let last = solution.last().copied().unwrap_or([f64::NAN; 2]);
        assert!((last[0] - (-1.0f64).exp()).abs() < 1e-8);
        assert!((last[1] - (-2.0f64).exp()).abs() < 1e-8);
        Ok(())
    }

    #[test]
    fn test_invalid_arguments() {
        let system = LinearSystem::new([[0.0, 1.0], [-1.0, 0.0]]);
        assert!(matches!(solve(&system, [1.0, 0.0], (0.0, 1.0), 1, 1), Err(QtrajError::InvalidParameter { .. })));
        assert!(matches!(solve(&system, [1.0, 0.0], (0.0, 1.0), 10, 0), Err(QtrajError::InvalidParameter { .. })));
        assert!(matches!(solve(&system, [1.0, 0.0], (1.0, 1.0), 10, 1), Err(QtrajError::InvalidParameter { .. })));
        assert!(matches!(solve(&system, [f64::NAN, 0.0], (0.0, 1.0), 10, 1), Err(QtrajError::InvalidParameter { .. })));
    }

    #[test]
    fn test_blow_up_reported() {
        let system = LinearSystem::new([[1e200, 0.0], [0.0, 1e200]]);
        let result = solve(&system, [1.0, 1.0], (0.0, 1.0), 3, 1);
        assert!(matches!(result, Err(QtrajError::IntegrationError { .. })));
    }
}
