//! Measuring instruments: Ammeter, Voltmeter, Galvanometer.
//!
//! These are resistive two-terminals whose only difference from a resistor
//! is their internal resistance and the reading the engine writes back into
//! them after each solve. Ammeter and voltmeter internal resistances are
//! fixed by the solver configuration; the galvanometer's coil resistance is
//! a property of the instrument.

use serde::{Deserialize, Serialize};

use crate::circuit::ComponentId;

/// A near-ideal ammeter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ammeter {
    pub id: ComponentId,
    /// Displayed current magnitude (A)
    #[serde(default)]
    pub current: f64,
}

impl Ammeter {
    /// Create a new ammeter reading zero.
    pub fn new(id: ComponentId) -> Self {
        Self { id, current: 0.0 }
    }
}

/// A near-ideal voltmeter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voltmeter {
    pub id: ComponentId,
    /// Displayed voltage magnitude (V)
    #[serde(default)]
    pub voltage: f64,
}

impl Voltmeter {
    /// Create a new voltmeter reading zero.
    pub fn new(id: ComponentId) -> Self {
        Self { id, voltage: 0.0 }
    }
}

/// A center-zero galvanometer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Galvanometer {
    pub id: ComponentId,
    /// Coil resistance (Ω)
    pub internal_resistance: f64,
    /// Signed current through the coil, left to right (mA)
    #[serde(default)]
    pub current_ma: f64,
}

impl Galvanometer {
    /// Coil resistance of the stock lab galvanometer.
    pub const DEFAULT_RESISTANCE: f64 = 100.0;

    /// Create a new galvanometer reading zero.
    pub fn new(id: ComponentId, internal_resistance: f64) -> Self {
        Self {
            id,
            internal_resistance,
            current_ma: 0.0,
        }
    }
}
