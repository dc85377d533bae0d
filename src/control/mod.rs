// src/control/mod.rs

//! Linear-quadratic regulation of a damped harmonic oscillator.
//!
//! The oscillator state is `x = (x1, x2)` with dynamics `ẋ = A·x + B·u`,
//! `A = [[0, 1/m], [−m·ω0², −γ]]` and `B = [0, 1]ᵀ`. The optimal feedback
//! `u = −K·x` comes from the closed-form Riccati solution; this module builds
//! both the open-loop (`u = 0`) and closed-loop systems and integrates them on
//! a shared sampling grid so they can be compared side by side.

pub mod dynamics;
pub mod integrate;
pub mod riccati;

pub use dynamics::{Dynamics, LinearSystem, Matrix2};
pub use integrate::{StateTrajectory, solve};
pub use riccati::RiccatiSolution;

use crate::core::constants::control_defaults;
use crate::core::{QtrajError, Result};

/// Physical parameters of the damped oscillator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorParams {
    /// Mass m.
    pub mass: f64,
    /// Natural frequency ω0.
    pub omega0: f64,
    /// Damping coefficient γ.
    pub damping: f64,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            mass: control_defaults::MASS,
            omega0: control_defaults::OMEGA0,
            damping: control_defaults::DAMPING,
        }
    }
}

impl OscillatorParams {
    /// Requires finite values with `m > 0`, `ω0 > 0` and `γ >= 0`.
    pub fn validate(&self) -> Result<()> {
        let finite = self.mass.is_finite() && self.omega0.is_finite() && self.damping.is_finite();
        if !finite || self.mass <= 0.0 || self.omega0 <= 0.0 || self.damping < 0.0 {
            return Err(QtrajError::InvalidParameter {
                message: format!(
                    "Oscillator needs finite m > 0, omega0 > 0, gamma >= 0; got m={}, omega0={}, gamma={}",
                    self.mass, self.omega0, self.damping
                ),
            });
        }
        Ok(())
    }

    /// `A = [[0, 1/m], [−m·ω0², −γ]]`.
    pub fn dynamics_matrix(&self) -> Matrix2 {
        [
            [0.0, 1.0 / self.mass],
            [-self.mass * self.omega0.powi(2), -self.damping],
        ]
    }

    /// The uncontrolled system `ẋ = A·x`.
    pub fn open_loop(&self) -> LinearSystem {
        LinearSystem::new(self.dynamics_matrix())
    }

    /// The regulated system `ẋ = (A − B·K)·x`.
    pub fn closed_loop(&self, gain: &[f64; 2]) -> LinearSystem {
        let mut a = self.dynamics_matrix();
        // B = [0, 1]ᵀ, so B·K only touches the second row
        a[1][0] -= gain[0];
        a[1][1] -= gain[1];
        LinearSystem::new(a)
    }
}

/// Inputs of the open-loop versus closed-loop comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlConfig {
    pub params: OscillatorParams,
    /// Initial position and velocity.
    pub initial_state: [f64; 2],
    pub t_span: (f64, f64),
    /// Number of output samples, including both ends of the span.
    pub samples: usize,
    /// RK4 steps between consecutive samples.
    pub substeps: usize,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            params: OscillatorParams::default(),
            initial_state: control_defaults::INITIAL_STATE,
            t_span: (control_defaults::T_START, control_defaults::T_END),
            samples: control_defaults::SAMPLES,
            substeps: control_defaults::SUBSTEPS,
        }
    }
}

/// Result of [`compare`]: the Riccati solution, the gain and both responses.
#[derive(Debug, Clone, PartialEq)]
pub struct LqrComparison {
    pub riccati: RiccatiSolution,
    pub gain: [f64; 2],
    pub closed_loop_system: LinearSystem,
    pub open_loop_system: LinearSystem,
    pub closed_loop: StateTrajectory,
    pub open_loop: StateTrajectory,
}

/// Solves the regulator problem and integrates both systems from the same
/// initial state on the same grid.
pub fn compare(config: &ControlConfig) -> Result<LqrComparison> {
    let riccati = RiccatiSolution::closed_form(&config.params)?;
    let gain = riccati.gain();
    let closed_loop_system = config.params.closed_loop(&gain);
    let open_loop_system = config.params.open_loop();
    tracing::info!(k1 = gain[0], k2 = gain[1], "optimal feedback gain");

    let closed_loop = solve(
        &closed_loop_system,
        config.initial_state,
        config.t_span,
        config.samples,
        config.substeps,
    )?;
    let open_loop = solve(
        &open_loop_system,
        config.initial_state,
        config.t_span,
        config.samples,
        config.substeps,
    )?;

    Ok(LqrComparison {
        riccati,
        gain,
        closed_loop_system,
        open_loop_system,
        closed_loop,
        open_loop,
    })
}
