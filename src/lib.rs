// src/lib.rs

//! `qtraj` - Quantum trajectories of a continuously measured qubit, and LQR
//! control of a damped harmonic oscillator.
//!
//! The library bundles two independent numerical exercises:
//! - [`simulation`] integrates the stochastic master equation of a two-level
//!   system measured along σx, one noisy trajectory at a time, and [`bloch`]
//!   turns the resulting density matrices into Bloch vectors.
//! - [`control`] solves the algebraic Riccati equation of a damped oscillator
//!   in closed form and compares the regulated and free responses.
//!
//! Plotting is left to the caller; trajectories and samples are plain data.

pub mod core;
pub mod bloch;
pub mod simulation;
pub mod validation;
pub mod control;

// Re-export the most common types for easier top-level use
pub use crate::core::{DensityMatrix, Operator, QtrajError, Result};
pub use bloch::{BlochVector, PauliBasis, bloch_vector, expectation};
pub use simulation::{
    EnsembleAverage, SimulatorBuilder, Trajectory, TrajectoryConfig, TrajectorySimulator,
};
pub use control::{ControlConfig, LqrComparison, OscillatorParams, RiccatiSolution, compare};
pub use validation::{
    check_bloch_bounds,
    check_hermiticity,
    check_trace,
    validate_state,
    validate_trajectory,
};

// Example 1: Measured qubit trajectory
// Integrates one seeded trajectory with the default exercise parameters and
// inspects the Bloch vectors handed to a plotter.
/// ```
/// use qtraj::{TrajectoryConfig, TrajectorySimulator, QtrajError, validate_trajectory};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let simulator = TrajectorySimulator::from_config(&TrajectoryConfig::default())?;
///
/// // The generator is explicit: the same seed replays the same measurement record.
/// let mut rng = StdRng::seed_from_u64(2024);
/// let trajectory = simulator.run(&mut rng)?;
///
/// println!("{}", trajectory);
/// assert_eq!(trajectory.len(), 2000);
///
/// // Every state keeps trace one and stays Hermitian.
/// validate_trajectory(&trajectory, None, None)?;
///
/// let bloch = trajectory.bloch_vectors()?;
/// let first = bloch[0];
/// assert!((first.z - 1.0).abs() < 1e-12);
///
/// let mut replay = StdRng::seed_from_u64(2024);
/// assert_eq!(simulator.run(&mut replay)?, trajectory);
/// # Ok::<(), QtrajError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Open-loop versus closed-loop oscillator
// The regulated response decays much faster than the lightly damped free one.
/// ```
/// use qtraj::{ControlConfig, QtrajError, compare};
///
/// let comparison = compare(&ControlConfig::default())?;
/// println!("{}", comparison.riccati);
///
/// let closed = comparison.closed_loop.last().copied().unwrap_or_default();
/// let open = comparison.open_loop.last().copied().unwrap_or_default();
/// println!("x(10): closed-loop {:.5}, open-loop {:.5}", closed[0], open[0]);
///
/// assert!(comparison.closed_loop_system.is_hurwitz());
/// assert!(closed[0].abs() < open[0].abs());
/// # Ok::<(), QtrajError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item
