//! Circuitlab - DC workbench solver
//!
//! Loads a saved workbench, solves it and prints every gauge reading,
//! battery current and wiring warning.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug circuitlab bench.ron --strict
//! ```

use std::path::PathBuf;

use circuitlab_core::{
    classify::Placement,
    error::Result,
    solver::{GMIN, VOLTMETER_RESISTANCE},
    CircuitFile, SolverConfig, Workbench,
};
use clap::Parser;

/// Physics-lab circuit solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the workbench file (.ron)
    #[arg(value_name = "CIRCUIT_FILE")]
    circuit_file: PathBuf,

    /// Conductance from every node to ground (S)
    #[arg(long, default_value_t = GMIN)]
    gmin: f64,

    /// Voltmeter internal resistance (Ω)
    #[arg(long, default_value_t = VOLTMETER_RESISTANCE)]
    voltmeter_resistance: f64,

    /// Treat a near-zero pivot as an error instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Print node potentials
    #[arg(short, long)]
    potentials: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = SolverConfig::new()
        .with_gmin(args.gmin)
        .with_voltmeter_resistance(args.voltmeter_resistance)
        .with_strict_pivots(args.strict);

    // Load and solve the circuit
    let circuit = CircuitFile::load(&args.circuit_file)?;
    let bench = Workbench::from_circuit(circuit, config)?;

    let result = match bench.analyze() {
        Ok(result) => result,
        Err(e) => {
            eprintln!("solve failed: {}", e);
            None
        }
    };

    for component in bench.components() {
        let id = component.id();
        let mut line = format!("{:>5}  {:<15}", id.to_string(), component.kind());
        if let Some(reading) = component.reading() {
            line.push_str(&format!("  {}", reading));
        }
        if let Some(solution) = result.as_ref().and_then(|r| r.component(id)) {
            line.push_str(&format!("  ΔV = {:.4} V", solution.voltage));
            if let Some(current) = solution.source_current {
                line.push_str(&format!("  I = {:.6} A", current));
            }
        }
        println!("{}", line);
    }

    if let Some(result) = &result {
        if args.potentials {
            for (node, v) in result.node_potentials.iter().enumerate() {
                println!("  N{:<3} {:>12.6} V", node, v);
            }
        }
        if result.is_indeterminate() {
            eprintln!(
                "warning: system is indeterminate at column(s) {:?}; some readings are arbitrary",
                result.skipped_pivots
            );
        }
    }

    for (id, classification) in bench.risks() {
        if classification.is_series_risk {
            eprintln!("warning: voltmeter {} is wired in series and opens the circuit", id);
        }
        if classification.is_parallel_risk {
            eprintln!("warning: ammeter {} is wired in parallel and shorts the branch", id);
        }
        if classification.placement == Placement::Unknown {
            log::debug!("placement of {} could not be determined", id);
        }
    }

    Ok(())
}
