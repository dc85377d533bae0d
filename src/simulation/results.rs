// src/simulation/results.rs
use crate::bloch::{BlochVector, PauliBasis};
use crate::core::{DensityMatrix, Result};
use std::fmt;

/// Holds the states of one integrated trajectory.
/// States are stored in time order, one per grid point, and are only ever
/// appended by the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Time of each stored state, `t_i = i·dt`.
    times: Vec<f64>,
    states: Vec<DensityMatrix>,
}

impl Trajectory {
    /// Creates an empty trajectory with room for `capacity` states. (Internal visibility)
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            times: Vec::with_capacity(capacity),
            states: Vec::with_capacity(capacity),
        }
    }

    /// Appends the state reached at time `t`. (Internal visibility)
    pub(crate) fn push(&mut self, t: f64, state: DensityMatrix) {
        self.times.push(t);
        self.states.push(state);
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[DensityMatrix] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if no state has been recorded.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The supplied initial state, if any state was recorded.
    pub fn initial(&self) -> Option<&DensityMatrix> {
        self.states.first()
    }

    pub fn last(&self) -> Option<&DensityMatrix> {
        self.states.last()
    }

    /// Iterates over `(t, state)` pairs in time order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &DensityMatrix)> + '_ {
        self.times.iter().copied().zip(self.states.iter())
    }

    /// Projects every state onto the standard Pauli basis, in time order.
    pub fn bloch_vectors(&self) -> Result<Vec<BlochVector>> {
        self.bloch_vectors_in(&PauliBasis::standard())
    }

    /// Projects every state onto a caller-supplied basis, in time order.
    pub fn bloch_vectors_in(&self, basis: &PauliBasis) -> Result<Vec<BlochVector>> {
        self.states.iter().map(|state| basis.project(state)).collect()
    }
}

impl fmt::Display for Trajectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Trajectory:")?;
        match (self.states.first(), self.states.last(), self.times.last()) {
            (Some(first), Some(last), Some(t_end)) => {
                writeln!(f, "  Steps: {}", self.states.len())?;
                writeln!(f, "  Initial: {}", first)?;
                writeln!(f, "  Final (t = {:.4}): {}", t_end, last)?;
                writeln!(f, "  Final purity: {:.6}", last.purity())?;
            }
            _ => {
                writeln!(f, "  No states were recorded.")?;
            }
        }
        Ok(())
    }
}
