//! Plain resistive parts: Resistor and Resistance Box.

use serde::{Deserialize, Serialize};

use crate::circuit::ComponentId;

/// A fixed resistor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resistor {
    pub id: ComponentId,
    /// Resistance in ohms. Zero leaves the branch unstamped.
    pub resistance: f64,
}

impl Resistor {
    /// Create a new resistor.
    pub fn new(id: ComponentId, resistance: f64) -> Self {
        Self { id, resistance }
    }
}

/// A calibrated decade resistance box.
///
/// Electrically identical to a [`Resistor`]; the value is dialed in by the
/// student and is limited to what the decades can express.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistanceBox {
    pub id: ComponentId,
    pub resistance: f64,
}

impl ResistanceBox {
    /// Largest value the dials can show (five decades plus tenths).
    pub const MAX_RESISTANCE: f64 = 99_999.9;

    /// Create a new resistance box.
    pub fn new(id: ComponentId, resistance: f64) -> Self {
        Self { id, resistance }
    }

    /// Set the value from dial positions, most significant decade first.
    ///
    /// `dials` holds the ×10000, ×1000, ×100, ×10, ×1 and ×0.1 knobs; digits
    /// above 9 are clamped.
    pub fn set_dials(&mut self, dials: [u8; 6]) {
        let weights = [10_000.0, 1_000.0, 100.0, 10.0, 1.0, 0.1];
        self.resistance = dials
            .iter()
            .zip(weights)
            .map(|(&d, w)| f64::from(d.min(9)) * w)
            .sum();
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_resistance_box_dials() {
        let mut b = ResistanceBox::new(ComponentId(0), 0.0);
        b.set_dials([0, 4, 9, 0, 0, 0]);
        assert_relative_eq!(b.resistance, 4900.0);

        b.set_dials([9, 9, 9, 9, 9, 9]);
        assert_relative_eq!(b.resistance, ResistanceBox::MAX_RESISTANCE, epsilon = 1e-9);

        b.set_dials([0, 0, 0, 0, 12, 5]);
        assert_relative_eq!(b.resistance, 9.5, epsilon = 1e-12);
    }
}
