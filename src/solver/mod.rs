//! DC operating-point solver.
//!
//! This module provides the numerical engine behind every instrument
//! reading on the workbench.
//!
//! ## Modified Nodal Analysis
//!
//! MNA assembles a system of equations Ax = z where:
//! - x contains node potentials and battery branch currents
//! - A is the conductance/coefficient matrix
//! - z is the source vector
//!
//! The matrix structure is:
//! ```text
//! [ G   B ] [ v ]   [ 0 ]
//! [ C   0 ] [ j ] = [ e ]
//! ```
//!
//! where:
//! - G is the conductance matrix (node equations, GMIN on the diagonal)
//! - B, C connect batteries to nodes
//! - v is the vector of node potentials, v[0] pinned to 0
//! - j is the vector of battery currents
//! - e is the vector of battery EMFs
//!
//! A solve is a pure function of the component and wire lists:
//! topology → assembly → elimination → readback.

mod engine;
mod mna;
mod readback;

pub use engine::{analyze, solve, solve_with_config, ComponentSolution, SolveResult, SolverConfig};
pub use mna::{MnaSystem, Solution};
pub use readback::annotate;

/// Minimum conductance from every node to ground.
pub const GMIN: f64 = 1e-12;

/// Pivots smaller than this are treated as zero.
pub const PIVOT_THRESHOLD: f64 = 1e-15;

/// Smallest resistance a rheostat branch is allowed to reach (Ω).
pub const RHEOSTAT_FLOOR: f64 = 1e-3;

/// Internal resistance of the ammeter (Ω).
pub const AMMETER_RESISTANCE: f64 = 0.01;

/// Internal resistance of the voltmeter (Ω).
pub const VOLTMETER_RESISTANCE: f64 = 1e7;
