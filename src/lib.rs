//! # Circuitlab Core
//!
//! The DC circuit engine behind an interactive physics-lab workbench.
//!
//! This library provides:
//! - A typed model of lab parts (resistors, resistance boxes, meters,
//!   batteries, rheostats, switches) and the wires between their terminals
//! - Modified Nodal Analysis (MNA) based steady-state solving
//! - Gauge readback (ammeter, voltmeter, galvanometer readings)
//! - Series/parallel wiring classification for safety warnings
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`circuit`] - Terminals, wires, node grouping and validation
//! - [`components`] - Component models
//! - [`solver`] - MNA matrix assembly, elimination and readback
//! - [`classify`] - Instrument placement analysis
//! - [`workbench`] - State owner that re-solves after every action
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! circuitlab bench.ron
//! ```
//!
//! ### Library
//!
//! ```
//! use circuitlab_core::circuit::{Terminal, TerminalRef};
//! use circuitlab_core::components::{Battery, Component, Resistor, Voltmeter};
//! use circuitlab_core::Workbench;
//!
//! let mut bench = Workbench::new();
//! let cell = bench.place(|id| Component::Battery(Battery::new(id, 1.5)));
//! let load = bench.place(|id| Component::Resistor(Resistor::new(id, 10.0)));
//! let meter = bench.place(|id| Component::Voltmeter(Voltmeter::new(id)));
//!
//! let t = TerminalRef::new;
//! bench.connect(t(cell, Terminal::Positive), t(load, Terminal::Left))?;
//! bench.connect(t(load, Terminal::Right), t(cell, Terminal::Negative))?;
//! bench.connect(t(meter, Terminal::Positive), t(load, Terminal::Left))?;
//! bench.connect(t(meter, Terminal::Negative), t(load, Terminal::Right))?;
//!
//! if let Some(Component::Voltmeter(v)) = bench.component(meter) {
//!     assert!((v.voltage - 1.5).abs() < 1e-6);
//! }
//! # Ok::<(), circuitlab_core::LabError>(())
//! ```
//!
//! ## Circuit Simulation Method
//!
//! Each time the workbench changes:
//!
//! 1. Group terminals joined by wires into electrical nodes
//! 2. Assemble the MNA system, with GMIN from every node to ground
//! 3. Solve by Gaussian elimination with partial pivoting
//! 4. Write each gauge's reading from the potentials at its terminals
//!
//! The solve is a pure function of the component and wire lists. A failed
//! solve is logged and leaves the previous readings in place.

pub mod circuit;
pub mod classify;
pub mod components;
pub mod error;
pub mod solver;
pub mod workbench;

// Re-export main types for convenience
pub use classify::{classify_wiring, WiringClassification};
pub use error::{LabError, Result};
pub use solver::{solve, SolverConfig};
pub use workbench::{CircuitFile, Workbench};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmWorkbench;
