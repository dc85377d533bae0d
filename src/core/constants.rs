//! Numerical constants and default parameters shared across modules.

/// Traces with magnitude below this cannot be renormalized.
pub const TRACE_EPSILON: f64 = 1e-12;

/// Largest imaginary part discarded from an expectation value of a Hermitian operator.
pub const IMAGINARY_TOLERANCE: f64 = 1e-9;

/// Default allowed deviation of a state's trace from one.
pub const DEFAULT_TRACE_TOLERANCE: f64 = 1e-9;

/// Default bound on `‖ρ − ρ†‖_F`.
pub const DEFAULT_HERMITICITY_TOLERANCE: f64 = 1e-9;

/// Defaults of the measured-qubit exercise.
pub mod trajectory_defaults {
    /// Precession frequency ω in `H = ½ω σz`.
    pub const OMEGA: f64 = 1.0;
    /// Measurement strength γ.
    pub const GAMMA: f64 = 0.1;
    /// Total simulated time T.
    pub const TOTAL_TIME: f64 = 10.0;
    /// Number of stored states N, including the initial one.
    pub const STEPS: usize = 2000;
}

/// Defaults of the oscillator control exercise.
pub mod control_defaults {
    pub const MASS: f64 = 1.0;
    pub const OMEGA0: f64 = 1.0;
    pub const DAMPING: f64 = 0.1;
    pub const INITIAL_STATE: [f64; 2] = [1.0, 0.0];
    pub const T_START: f64 = 0.0;
    pub const T_END: f64 = 10.0;
    pub const SAMPLES: usize = 1000;
    /// RK4 steps between two consecutive output samples.
    pub const SUBSTEPS: usize = 10;
}
