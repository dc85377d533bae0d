//! Example comparing the LQR-regulated damped oscillator with its free response.
//! Prints the Riccati solution and emits both sampled responses as JSON for an
//! external plotter.
//!
//! Usage: `cargo run --example lqr_comparison`

use qtraj::{ControlConfig, compare};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    println!("--- qtraj Example: Closed-loop vs Open-loop Oscillator ---");
    let config = ControlConfig::default();
    let comparison = compare(&config)?;

    println!("{}", comparison.riccati);
    println!("Feedback gain K = [{:.6}, {:.6}]", comparison.gain[0], comparison.gain[1]);
    println!("Closed-loop matrix: {:?}", comparison.closed_loop_system.matrix());

    for (label, response) in [("Closed-loop", &comparison.closed_loop), ("Open-loop", &comparison.open_loop)] {
        if let Some(x) = response.last() {
            println!("{} state at t = {}: position {:.6}, velocity {:.6}", label, config.t_span.1, x[0], x[1]);
        }
    }

    let payload = json!({
        "closed_loop": comparison.closed_loop,
        "open_loop": comparison.open_loop,
    });
    println!("{}", payload);
    Ok(())
}
