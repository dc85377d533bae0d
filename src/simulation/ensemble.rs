// src/simulation/ensemble.rs
use super::results::Trajectory;
use crate::core::{DensityMatrix, Operator, QtrajError, Result};

/// Step-wise mean of several trajectories sharing one time grid.
///
/// Averaging over measurement records recovers the unconditional (Lindblad)
/// evolution, so the mean state loses purity even where single trajectories
/// stay close to pure.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleAverage {
    mean: Trajectory,
    count: usize,
}

impl EnsembleAverage {
    /// Averages `members` state by state.
    ///
    /// # Returns
    /// * `Err(QtrajError::InvalidParameter)` if `members` is empty or the members
    ///   do not share the same time grid.
    pub fn from_members(members: &[Trajectory]) -> Result<Self> {
        let first = members.first().ok_or_else(|| QtrajError::InvalidParameter {
            message: "Ensemble needs at least one trajectory".to_string(),
        })?;
        if let Some(index) = members.iter().position(|m| m.times() != first.times()) {
            return Err(QtrajError::InvalidParameter {
                message: format!("Ensemble member {} does not share the time grid of member 0", index),
            });
        }

        let mut mean = Trajectory::with_capacity(first.len());
        for (step, t) in first.times().iter().enumerate() {
            let averaged = DensityMatrix::mean(members.iter().map(|m| &m.states()[step]))
                .ok_or_else(|| QtrajError::InvalidParameter {
                    message: "Ensemble needs at least one trajectory".to_string(),
                })?;
            mean.push(*t, averaged);
        }
        Ok(Self { mean, count: members.len() })
    }

    /// The averaged states as a trajectory.
    pub fn mean(&self) -> &Trajectory {
        &self.mean
    }

    /// Number of trajectories that went into the average.
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Running per-step sum of trajectories, so an ensemble mean needs one grid of
/// operators regardless of how many members are added.
#[derive(Debug, Clone)]
pub(crate) struct EnsembleAccumulator {
    times: Vec<f64>,
    sums: Vec<Operator>,
    count: usize,
}

impl EnsembleAccumulator {
    pub(crate) fn new() -> Self {
        Self { times: Vec::new(), sums: Vec::new(), count: 0 }
    }

    /// Adds one member. The first member fixes the time grid.
    pub(crate) fn add(&mut self, member: &Trajectory) -> Result<()> {
        if self.count == 0 {
            self.times = member.times().to_vec();
            self.sums = vec![Operator::zero(); member.len()];
        } else if member.times() != self.times.as_slice() {
            return Err(QtrajError::InvalidParameter {
                message: format!("Ensemble member {} does not share the time grid of member 0", self.count),
            });
        }
        for (sum, state) in self.sums.iter_mut().zip(member.states()) {
            *sum = *sum + *state.operator();
        }
        self.count += 1;
        Ok(())
    }

    pub(crate) fn finish(self) -> Result<EnsembleAverage> {
        if self.count == 0 {
            return Err(QtrajError::InvalidParameter {
                message: "Ensemble needs at least one trajectory".to_string(),
            });
        }
        let scale = 1.0 / self.count as f64;
        let mut mean = Trajectory::with_capacity(self.times.len());
        for (t, sum) in self.times.into_iter().zip(self.sums) {
            mean.push(t, DensityMatrix::new_unchecked(sum.scale(scale)));
        }
        Ok(EnsembleAverage { mean, count: self.count })
    }
}
