//! Example integrating one measured-qubit trajectory and printing the Bloch
//! vectors an external Bloch-sphere plotter would draw.
//!
//! Usage: `cargo run --example bloch_trajectory -- [seed]`

use qtraj::{QtrajError, TrajectoryConfig, TrajectorySimulator, validate_trajectory};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

/// Payload handed to the plotting side.
#[derive(Serialize)]
struct BlochPlot {
    seed: u64,
    times: Vec<f64>,
    /// Start and end vectors, drawn as arrows.
    arrows: [[f64; 3]; 2],
    /// Every stored point, drawn as the trajectory.
    points: Vec<[f64; 3]>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>()?,
        None => 2024,
    };

    println!("--- qtraj Example: Continuously Measured Qubit ---");
    let config = TrajectoryConfig::default();
    println!(
        "omega = {}, gamma = {}, T = {}, N = {}, seed = {}",
        config.omega, config.gamma, config.total_time, config.steps, seed
    );

    let simulator = TrajectorySimulator::from_config(&config)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let trajectory = simulator.run(&mut rng)?;
    validate_trajectory(&trajectory, None, None)?;
    println!("\n{}", trajectory);

    let vectors = trajectory.bloch_vectors()?;
    let (first, last) = match (vectors.first(), vectors.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            return Err(Box::new(QtrajError::InvalidParameter {
                message: "trajectory is empty".to_string(),
            }));
        }
    };
    println!("Initial Bloch vector: {} (norm {:.4})", first, first.norm());
    println!("Final Bloch vector:   {} (norm {:.4})", last, last.norm());

    let plot = BlochPlot {
        seed,
        times: trajectory.times().to_vec(),
        arrows: [first.into(), last.into()],
        points: vectors.into_iter().map(Into::into).collect(),
    };
    println!("{}", serde_json::to_string(&plot)?);
    Ok(())
}
