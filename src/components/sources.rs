//! Ideal DC voltage source.

use serde::{Deserialize, Serialize};

use crate::circuit::ComponentId;

/// An ideal battery: `V(positive) - V(negative) = emf`, no internal
/// resistance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battery {
    pub id: ComponentId,
    /// Electromotive force (V)
    pub emf: f64,
}

impl Battery {
    /// Create a new battery.
    pub fn new(id: ComponentId, emf: f64) -> Self {
        Self { id, emf }
    }
}
