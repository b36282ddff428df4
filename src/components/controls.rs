//! Control components: Rheostat and Switch.

use serde::{Deserialize, Serialize};

use crate::circuit::ComponentId;

/// A rheostat (or potentiometer) with a sliding wiper.
///
/// Modeled as two resistors in series with a wiper tap:
///   A ----[R_AC]---- C (wiper) ----[R_CB]---- B
///
/// where R_AC = wiper_resistance
/// and   R_CB = total_resistance - wiper_resistance
///
/// Both branches are floored so the wiper can sit at either end of travel
/// without producing an infinite conductance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rheostat {
    pub id: ComponentId,
    pub total_resistance: f64,
    /// Resistance between A and the wiper
    pub wiper_resistance: f64,
}

impl Rheostat {
    /// Create a new rheostat.
    pub fn new(id: ComponentId, total_resistance: f64, wiper_resistance: f64) -> Self {
        Self {
            id,
            total_resistance,
            wiper_resistance,
        }
    }

    /// Get the resistance from A to the wiper.
    pub fn r_ac(&self, floor: f64) -> f64 {
        self.wiper_resistance.max(floor)
    }

    /// Get the resistance from the wiper to B.
    pub fn r_cb(&self, floor: f64) -> f64 {
        (self.total_resistance - self.wiper_resistance).max(floor)
    }

    /// Move the wiper to a fraction of its travel (0.0 = at A, 1.0 = at B).
    pub fn set_position(&mut self, position: f64) {
        self.wiper_resistance = position.clamp(0.0, 1.0) * self.total_resistance;
    }

    /// Current wiper position as a fraction of travel.
    pub fn position(&self) -> f64 {
        if self.total_resistance > 0.0 {
            (self.wiper_resistance / self.total_resistance).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// A knife switch.
///
/// Closed, it is a small resistance; open, it contributes nothing to the
/// system and its terminals are only held by GMIN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Switch {
    pub id: ComponentId,
    pub closed: bool,
}

impl Switch {
    /// Resistance when closed.
    pub const R_CLOSED: f64 = 0.01;

    /// Create a new switch.
    pub fn new(id: ComponentId, closed: bool) -> Self {
        Self { id, closed }
    }

    /// Get the current resistance, or `None` when open.
    pub fn resistance(&self) -> Option<f64> {
        self.closed.then_some(Self::R_CLOSED)
    }

    /// Toggle the switch state.
    pub fn toggle(&mut self) {
        self.closed = !self.closed;
    }
}
