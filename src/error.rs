//! Error types for the circuit lab engine.
//!
//! This module provides a unified error type [`LabError`] that covers
//! all error conditions that can occur while editing a workbench,
//! assembling the MNA system, and loading circuit files.
//!
//! Most of these never reach the end user: the [`solve`](crate::solver::solve)
//! boundary logs them and keeps the last good readings.

use thiserror::Error;

use crate::circuit::{ComponentId, TerminalRef};

/// Result type alias using [`LabError`].
pub type Result<T> = std::result::Result<T, LabError>;

/// Unified error type for all engine operations.
#[derive(Error, Debug)]
pub enum LabError {
    // ============ Circuit Errors ============
    /// Component not found on the workbench
    #[error("Component {id} not found")]
    ComponentNotFound { id: ComponentId },

    /// Duplicate component id
    #[error("Duplicate component id {id}")]
    DuplicateComponent { id: ComponentId },

    /// Wire endpoint does not name a terminal of an existing component
    #[error("Unknown terminal {terminal}")]
    UnknownTerminal { terminal: TerminalRef },

    /// Invalid parameter value
    #[error("Invalid parameter '{param}' for component {component}: {message}")]
    InvalidParameter {
        component: ComponentId,
        param: String,
        message: String,
    },

    /// Parameter does not exist on this kind of component
    #[error("Component {component} ({kind}) has no parameter '{param}'")]
    UnsupportedParameter {
        component: ComponentId,
        kind: &'static str,
        param: &'static str,
    },

    // ============ Solve Errors ============
    /// A pivot fell below the threshold while strict pivoting was requested
    #[error("Indeterminate system: pivot {magnitude:.2e} at column {column} is below threshold")]
    IndeterminateSystem { column: usize, magnitude: f64 },

    /// Solution contains NaN or infinity
    #[error("Numerical overflow at unknown {index} (value: {value:.2e})")]
    NumericalOverflow { index: usize, value: f64 },

    /// Invalid solver configuration
    #[error("Invalid solver configuration: {message}")]
    InvalidConfig { message: String },

    // ============ I/O Errors ============
    /// Error reading circuit file
    #[error("Failed to read circuit file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Circuit file is not valid RON
    #[error("Failed to parse circuit: {source}")]
    CircuitParseError {
        #[source]
        source: ron::error::SpannedError,
    },

    /// Circuit could not be written as RON
    #[error("Failed to serialize circuit: {source}")]
    CircuitWriteError {
        #[source]
        source: ron::Error,
    },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl LabError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(
        component: ComponentId,
        param: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            component,
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create an indeterminate system error
    pub fn indeterminate(column: usize, magnitude: f64) -> Self {
        Self::IndeterminateSystem { column, magnitude }
    }
}
