// src/simulation/mod.rs

//! Integrates single noisy trajectories of a continuously measured qubit.
//! This module contains the `TrajectorySimulator` entry point, its builder and
//! configuration, and the internal `SmeEngine` that performs each update.

// Make engine module crate visible for tests
mod ensemble;
pub(crate) mod engine;
mod results;

// Re-export the main public interface types
pub use ensemble::EnsembleAverage;
pub use results::Trajectory;

use crate::core::constants::trajectory_defaults;
use crate::core::{DensityMatrix, Operator, QtrajError, Result};
use engine::SmeEngine;
use ensemble::EnsembleAccumulator;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Scalar parameters of the measured-qubit exercise.
///
/// The exercise system is `H = ½ω σz` measured along σx with strength γ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryConfig {
    /// Precession frequency ω.
    pub omega: f64,
    /// Measurement strength γ.
    pub gamma: f64,
    /// Total simulated time T.
    pub total_time: f64,
    /// Number of stored states N, including the initial one.
    pub steps: usize,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            omega: trajectory_defaults::OMEGA,
            gamma: trajectory_defaults::GAMMA,
            total_time: trajectory_defaults::TOTAL_TIME,
            steps: trajectory_defaults::STEPS,
        }
    }
}

impl TrajectoryConfig {
    /// `H = ½ω σz`.
    pub fn hamiltonian(&self) -> Operator {
        Operator::pauli_z().scale(0.5 * self.omega)
    }

    /// The measured observable σx.
    pub fn measurement(&self) -> Operator {
        Operator::pauli_x()
    }
}

/// The main simulator producing trajectories.
///
/// Holds the immutable inputs of a run. Randomness is never owned by the
/// simulator: each call to [`TrajectorySimulator::run`] takes the generator
/// explicitly, so a seeded generator reproduces the same trajectory.
#[derive(Debug, Clone)]
pub struct TrajectorySimulator {
    hamiltonian: Operator,
    measurement: Operator,
    gamma: f64,
    total_time: f64,
    steps: usize,
    initial_state: DensityMatrix,
}

impl TrajectorySimulator {
    /// Builds the exercise system described by `config`, starting from |0⟩⟨0|.
    pub fn from_config(config: &TrajectoryConfig) -> Result<Self> {
        SimulatorBuilder::new()
            .hamiltonian(config.hamiltonian())
            .measurement(config.measurement())
            .gamma(config.gamma)
            .total_time(config.total_time)
            .steps(config.steps)
            .build()
    }

    pub fn builder() -> SimulatorBuilder {
        SimulatorBuilder::new()
    }

    /// Step size `T / (N − 1)`.
    pub fn dt(&self) -> f64 {
        self.total_time / (self.steps - 1) as f64
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn initial_state(&self) -> &DensityMatrix {
        &self.initial_state
    }

    /// Time grid `linspace(0, T, N)`.
    pub fn times(&self) -> Vec<f64> {
        let dt = self.dt();
        (0..self.steps).map(|i| i as f64 * dt).collect()
    }

    /// Integrates one trajectory, drawing one Wiener increment
    /// `dW ~ Normal(0, √dt)` per step from `rng`.
    ///
    /// # Returns
    /// * `Ok(Trajectory)` with exactly `steps` states, the first being the initial state.
    /// * `Err(QtrajError::InvalidDensityMatrix)` if renormalization fails at any step;
    ///   the run is abandoned at that point.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Trajectory> {
        let normal = Normal::new(0.0, self.dt().sqrt()).map_err(|e| QtrajError::InvalidParameter {
            message: format!("Cannot build Wiener increment distribution: {}", e),
        })?;
        let increments = (1..self.steps).map(|_| normal.sample(&mut *rng));
        self.run_with_increments(increments)
    }

    /// Integrates one trajectory from caller-supplied Wiener increments.
    ///
    /// Consumes exactly `steps − 1` increments; a zero sequence removes the
    /// stochastic term entirely.
    ///
    /// # Returns
    /// * `Err(QtrajError::InvalidParameter)` if fewer than `steps − 1` increments are supplied.
    /// * `Err(QtrajError::InvalidDensityMatrix)` if renormalization fails.
    pub fn run_with_increments<I>(&self, increments: I) -> Result<Trajectory>
    where
        I: IntoIterator<Item = f64>,
    {
        let dt = self.dt();
        let engine = SmeEngine::new(self.hamiltonian, self.measurement, self.gamma, dt);
        tracing::debug!(steps = self.steps, dt, gamma = self.gamma, "starting trajectory");

        let mut trajectory = Trajectory::with_capacity(self.steps);
        let mut current = self.initial_state;
        trajectory.push(0.0, current);

        let mut increments = increments.into_iter();
        for step in 1..self.steps {
            let dw = increments.next().ok_or_else(|| QtrajError::InvalidParameter {
                message: format!("Wiener increments exhausted at step {} of {}", step, self.steps - 1),
            })?;
            current = engine.step(&current, dw, step)?;
            tracing::trace!(step, dw, "advanced state");
            trajectory.push(step as f64 * dt, current);
        }

        tracing::info!(steps = trajectory.len(), purity = current.purity(), "trajectory complete");
        Ok(trajectory)
    }

    /// Runs `count` independent trajectories from the same generator and
    /// averages them step by step.
    ///
    /// # Returns
    /// * `Err(QtrajError::InvalidParameter)` if `count` is zero.
    /// * Any error raised by an individual run.
    pub fn run_ensemble<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Result<EnsembleAverage> {
        if count == 0 {
            return Err(QtrajError::InvalidParameter {
                message: "Ensemble needs at least one trajectory".to_string(),
            });
        }
        let mut accumulator = EnsembleAccumulator::new();
        for _ in 0..count {
            accumulator.add(&self.run(&mut *rng)?)?;
        }
        accumulator.finish()
    }
}

//-------------------------------------------------------------------------
// Simulator Builder
//-------------------------------------------------------------------------

/// A helper struct for constructing `TrajectorySimulator` instances using method chaining.
///
/// Starts from the exercise defaults (`H = ½σz`, σ = σx, γ = 0.1, T = 10,
/// N = 2000, initial state |0⟩⟨0|); every value is checked in [`SimulatorBuilder::build`].
#[derive(Debug, Clone)]
pub struct SimulatorBuilder {
    hamiltonian: Operator,
    measurement: Operator,
    gamma: f64,
    total_time: f64,
    steps: usize,
    initial_state: DensityMatrix,
}

impl SimulatorBuilder {
    pub fn new() -> Self {
        let defaults = TrajectoryConfig::default();
        Self {
            hamiltonian: defaults.hamiltonian(),
            measurement: defaults.measurement(),
            gamma: defaults.gamma,
            total_time: defaults.total_time,
            steps: defaults.steps,
            initial_state: DensityMatrix::ground(),
        }
    }

    pub fn hamiltonian(mut self, hamiltonian: Operator) -> Self {
        self.hamiltonian = hamiltonian;
        self
    }

    /// Sets the measurement basis operator σ; the collapse operator is `√γ·σ`.
    pub fn measurement(mut self, measurement: Operator) -> Self {
        self.measurement = measurement;
        self
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn total_time(mut self, total_time: f64) -> Self {
        self.total_time = total_time;
        self
    }

    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn initial_state(mut self, state: DensityMatrix) -> Self {
        self.initial_state = state;
        self
    }

    /// Validates the inputs and returns the simulator.
    ///
    /// # Returns
    /// * `Err(QtrajError::InvalidParameter)` if an operator is non-Hermitian or
    ///   non-finite, γ is negative or non-finite, T is not positive, or N < 2.
    pub fn build(self) -> Result<TrajectorySimulator> {
        check_observable("Hamiltonian", &self.hamiltonian)?;
        check_observable("Measurement operator", &self.measurement)?;
        if !self.gamma.is_finite() || self.gamma < 0.0 {
            return Err(QtrajError::InvalidParameter {
                message: format!("Measurement strength must be finite and >= 0, got {}", self.gamma),
            });
        }
        if !self.total_time.is_finite() || self.total_time <= 0.0 {
            return Err(QtrajError::InvalidParameter {
                message: format!("Total time must be finite and > 0, got {}", self.total_time),
            });
        }
        if self.steps < 2 {
            return Err(QtrajError::InvalidParameter {
                message: format!("Step count must be >= 2, got {}", self.steps),
            });
        }
        Ok(TrajectorySimulator {
            hamiltonian: self.hamiltonian,
            measurement: self.measurement,
            gamma: self.gamma,
            total_time: self.total_time,
            steps: self.steps,
            initial_state: self.initial_state,
        })
    }
}

impl Default for SimulatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn check_observable(name: &str, op: &Operator) -> Result<()> {
    if !op.is_finite() || !op.is_hermitian(crate::core::DEFAULT_HERMITICITY_TOLERANCE) {
        return Err(QtrajError::InvalidParameter {
            message: format!("{} must be finite and Hermitian, got {}", name, op),
        });
    }
    Ok(())
}
