// tests/trajectory_tests.rs

// Import necessary types from the qtraj crate
use qtraj::{
    BlochVector, DensityMatrix, Operator, QtrajError, Trajectory, TrajectoryConfig,
    TrajectorySimulator, check_bloch_bounds, validate_state,
};
use num_complex::Complex64;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

const TRACE_TOLERANCE: f64 = 1e-9;

// Helper building the default exercise system (ω = 1, γ = 0.1, T = 10, N = 2000)
fn exercise_simulator() -> Result<TrajectorySimulator, QtrajError> {
    TrajectorySimulator::from_config(&TrajectoryConfig::default())
}

// Helper asserting the density-matrix invariants on every state of a trajectory
fn assert_valid_trajectory(trajectory: &Trajectory) {
    for (step, state) in trajectory.states().iter().enumerate() {
        let trace = state.trace();
        assert!(
            (trace.re - 1.0).abs() < TRACE_TOLERANCE && trace.im.abs() < TRACE_TOLERANCE,
            "Trace {} at step {}", trace, step
        );
        let op = state.operator();
        assert!(
            (*op - op.dagger()).frobenius_norm() < 1e-12,
            "State at step {} is not Hermitian: {}", step, state
        );
    }
}

fn plus_state() -> DensityMatrix {
    DensityMatrix::from_pure([Complex64::new(FRAC_1_SQRT_2, 0.0), Complex64::new(FRAC_1_SQRT_2, 0.0)])
        .expect("|+> is a valid ket")
}

#[test]
fn test_example_scenario_keeps_trace_and_hermiticity() -> Result<(), QtrajError> {
    let simulator = exercise_simulator()?;
    let mut rng = StdRng::seed_from_u64(42);
    let trajectory = simulator.run(&mut rng)?;

    assert_eq!(trajectory.len(), 2000);
    assert_eq!(trajectory.initial(), Some(&DensityMatrix::ground()));
    assert_valid_trajectory(&trajectory);
    for state in trajectory.states() {
        validate_state(state, None, None)?;
    }
    Ok(())
}

#[test]
fn test_same_seed_reproduces_trajectory() -> Result<(), QtrajError> {
    let simulator = exercise_simulator()?;
    let first = simulator.run(&mut StdRng::seed_from_u64(99))?;
    let second = simulator.run(&mut StdRng::seed_from_u64(99))?;
    assert_eq!(first, second, "Seeded runs must be bit-identical");

    let other = simulator.run(&mut StdRng::seed_from_u64(100))?;
    assert_ne!(first.last(), other.last(), "Different seeds should give different records");
    Ok(())
}

#[test]
fn test_bloch_vectors_follow_states() -> Result<(), QtrajError> {
    let simulator = exercise_simulator()?;
    let trajectory = simulator.run(&mut StdRng::seed_from_u64(5))?;
    let vectors = trajectory.bloch_vectors()?;

    assert_eq!(vectors.len(), trajectory.len());
    assert_eq!(vectors[0], BlochVector::new(0.0, 0.0, 1.0));
    for (vector, state) in vectors.iter().zip(trajectory.states()) {
        let rebuilt = vector.to_density_matrix()?;
        let dist = (*rebuilt.operator() - *state.operator()).frobenius_norm();
        assert!(dist < 1e-12, "Bloch vector {} does not describe {}", vector, state);
    }
    Ok(())
}

#[test]
fn test_unitary_precession_without_measurement() -> Result<(), QtrajError> {
    // γ = 0 from |+>: the Bloch vector precesses about z, x = cos ωt, y = sin ωt
    let omega = 1.0;
    let simulator = TrajectorySimulator::builder()
        .hamiltonian(Operator::pauli_z().scale(0.5 * omega))
        .measurement(Operator::pauli_x())
        .gamma(0.0)
        .total_time(2.0 * PI)
        .steps(20_001)
        .initial_state(plus_state())
        .build()?;

    let trajectory = simulator.run(&mut StdRng::seed_from_u64(1))?;
    let vectors = trajectory.bloch_vectors()?;
    for (t, v) in trajectory.times().iter().zip(vectors.iter()) {
        assert!((v.x - (omega * t).cos()).abs() < 5e-3, "x mismatch at t={}: {}", t, v);
        assert!((v.y - (omega * t).sin()).abs() < 5e-3, "y mismatch at t={}: {}", t, v);
        assert!(v.z.abs() < 1e-12, "z drifted at t={}: {}", t, v);
        check_bloch_bounds(v, Some(5e-3))?;
    }

    // Without measurement the record has no influence at all
    let other = simulator.run(&mut StdRng::seed_from_u64(2))?;
    assert_eq!(trajectory, other);
    let silent = simulator.run_with_increments(std::iter::repeat(0.0))?;
    assert_eq!(trajectory, silent);
    Ok(())
}

#[test]
fn test_ground_state_is_fixed_point_of_free_evolution() -> Result<(), QtrajError> {
    let config = TrajectoryConfig { gamma: 0.0, ..TrajectoryConfig::default() };
    let simulator = TrajectorySimulator::from_config(&config)?;
    let trajectory = simulator.run(&mut StdRng::seed_from_u64(3))?;
    for state in trajectory.states() {
        assert_eq!(*state, DensityMatrix::ground());
    }
    Ok(())
}

#[test]
fn test_ensemble_mean_decoheres() -> Result<(), QtrajError> {
    // Averaging over measurement records gives the unconditional evolution,
    // whose Bloch vector shrinks under the measurement dissipator.
    let simulator = exercise_simulator()?;
    let mut rng = StdRng::seed_from_u64(11);
    let ensemble = simulator.run_ensemble(&mut rng, 32)?;
    assert_eq!(ensemble.count(), 32);

    let mean = ensemble.mean();
    assert_valid_trajectory(mean);
    let vectors = mean.bloch_vectors()?;
    for v in &vectors {
        check_bloch_bounds(v, Some(1e-2))?;
    }

    let initial_norm = vectors[0].norm();
    let final_norm = vectors[vectors.len() - 1].norm();
    println!("Ensemble Bloch norm: initial {:.4}, final {:.4}", initial_norm, final_norm);
    assert!((initial_norm - 1.0).abs() < 1e-12);
    assert!(final_norm < 0.9, "Mean state should have decohered, norm {}", final_norm);
    Ok(())
}

#[test]
fn test_non_finite_update_aborts_run() -> Result<(), QtrajError> {
    let simulator = exercise_simulator()?;
    for poison in [f64::INFINITY, f64::NAN] {
        let increments = std::iter::once(0.01).chain(std::iter::repeat(poison));
        match simulator.run_with_increments(increments) {
            Err(QtrajError::InvalidDensityMatrix { step, .. }) => assert_eq!(step, 2),
            other => panic!("Expected InvalidDensityMatrix, got {:?}", other),
        }
    }
    Ok(())
}
