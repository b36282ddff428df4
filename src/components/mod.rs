//! Component models for the lab workbench.
//!
//! This module provides models for all parts a student can place:
//! - Resistive: Resistor, Resistance Box
//! - Meters: Ammeter, Voltmeter, Galvanometer
//! - Sources: Battery
//! - Controls: Rheostat, Switch
//!
//! Every kind has a fixed terminal layout. The MNA assembler dispatches on
//! [`Component`] with an exhaustive match, so adding a kind forces every
//! stamp and readback site to handle it.

mod controls;
mod meters;
mod resistive;
mod sources;

pub use controls::{Rheostat, Switch};
pub use meters::{Ammeter, Galvanometer, Voltmeter};
pub use resistive::{ResistanceBox, Resistor};
pub use sources::Battery;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::circuit::{ComponentId, Terminal, TerminalRef};
use crate::error::{LabError, Result};

const BIPOLAR: [Terminal; 2] = [Terminal::Positive, Terminal::Negative];
const PLAIN: [Terminal; 2] = [Terminal::Left, Terminal::Right];
const TAPPED: [Terminal; 3] = [Terminal::A, Terminal::B, Terminal::C];

/// A component placed on the workbench.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Component {
    Resistor(Resistor),
    ResistanceBox(ResistanceBox),
    Ammeter(Ammeter),
    Voltmeter(Voltmeter),
    Galvanometer(Galvanometer),
    Battery(Battery),
    Rheostat(Rheostat),
    Switch(Switch),
}

/// A user-adjustable parameter, as sent by the workbench UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parameter {
    /// Resistor or resistance box value (Ω)
    Resistance(f64),
    /// Battery EMF (V)
    Emf(f64),
    /// Galvanometer coil resistance (Ω)
    InternalResistance(f64),
    /// Rheostat total resistance (Ω)
    TotalResistance(f64),
    /// Rheostat resistance between A and the wiper (Ω)
    WiperResistance(f64),
    /// Switch state
    Closed(bool),
}

impl Parameter {
    pub fn name(&self) -> &'static str {
        match self {
            Parameter::Resistance(_) => "resistance",
            Parameter::Emf(_) => "emf",
            Parameter::InternalResistance(_) => "internal_resistance",
            Parameter::TotalResistance(_) => "total_resistance",
            Parameter::WiperResistance(_) => "wiper_resistance",
            Parameter::Closed(_) => "closed",
        }
    }
}

/// The value a gauge displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Amperes(f64),
    /// Signed, for center-zero dials
    Milliamperes(f64),
    Volts(f64),
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Amperes(a) => write!(f, "{:.6} A", a),
            Reading::Milliamperes(ma) => write!(f, "{:+.4} mA", ma),
            Reading::Volts(v) => write!(f, "{:.4} V", v),
        }
    }
}

impl Component {
    /// Get the component id.
    pub fn id(&self) -> ComponentId {
        match self {
            Component::Resistor(c) => c.id,
            Component::ResistanceBox(c) => c.id,
            Component::Ammeter(c) => c.id,
            Component::Voltmeter(c) => c.id,
            Component::Galvanometer(c) => c.id,
            Component::Battery(c) => c.id,
            Component::Rheostat(c) => c.id,
            Component::Switch(c) => c.id,
        }
    }

    /// Human-readable kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            Component::Resistor(_) => "resistor",
            Component::ResistanceBox(_) => "resistance box",
            Component::Ammeter(_) => "ammeter",
            Component::Voltmeter(_) => "voltmeter",
            Component::Galvanometer(_) => "galvanometer",
            Component::Battery(_) => "battery",
            Component::Rheostat(_) => "rheostat",
            Component::Switch(_) => "switch",
        }
    }

    /// All terminals of this component, in layout order.
    pub fn terminals(&self) -> &'static [Terminal] {
        match self {
            Component::Ammeter(_) | Component::Voltmeter(_) | Component::Battery(_) => &BIPOLAR,
            Component::Resistor(_)
            | Component::ResistanceBox(_)
            | Component::Galvanometer(_)
            | Component::Switch(_) => &PLAIN,
            Component::Rheostat(_) => &TAPPED,
        }
    }

    /// The two terminals whose potential difference defines the
    /// component's voltage (and any gauge reading).
    pub fn governing_terminals(&self) -> [Terminal; 2] {
        let t = self.terminals();
        [t[0], t[1]]
    }

    /// Terminal references for this component.
    pub fn terminal_refs(&self) -> impl Iterator<Item = TerminalRef> + '_ {
        let id = self.id();
        self.terminals()
            .iter()
            .map(move |&terminal| TerminalRef::new(id, terminal))
    }

    /// Check whether this component has the given terminal.
    pub fn has_terminal(&self, terminal: Terminal) -> bool {
        self.terminals().contains(&terminal)
    }

    /// Check whether the engine writes a reading into this component.
    pub fn is_gauge(&self) -> bool {
        matches!(
            self,
            Component::Ammeter(_) | Component::Voltmeter(_) | Component::Galvanometer(_)
        )
    }

    /// Check whether this is a measuring instrument the wiring classifier
    /// raises risks for.
    pub fn is_instrument(&self) -> bool {
        matches!(self, Component::Ammeter(_) | Component::Voltmeter(_))
    }

    /// The current gauge reading, if this is a gauge.
    pub fn reading(&self) -> Option<Reading> {
        match self {
            Component::Ammeter(a) => Some(Reading::Amperes(a.current)),
            Component::Voltmeter(v) => Some(Reading::Volts(v.voltage)),
            Component::Galvanometer(g) => Some(Reading::Milliamperes(g.current_ma)),
            _ => None,
        }
    }

    /// Check that all parameters are usable by the assembler.
    pub fn check_parameters(&self) -> Result<()> {
        let id = self.id();
        match self {
            Component::Resistor(r) => check_non_negative(id, "resistance", r.resistance),
            Component::ResistanceBox(b) => {
                check_non_negative(id, "resistance", b.resistance)?;
                if b.resistance > ResistanceBox::MAX_RESISTANCE {
                    return Err(LabError::invalid_parameter(
                        id,
                        "resistance",
                        format!("exceeds the dial range of {} Ω", ResistanceBox::MAX_RESISTANCE),
                    ));
                }
                Ok(())
            }
            Component::Galvanometer(g) => {
                check_non_negative(id, "internal_resistance", g.internal_resistance)?;
                if g.internal_resistance == 0.0 {
                    return Err(LabError::invalid_parameter(
                        id,
                        "internal_resistance",
                        "coil resistance must be positive",
                    ));
                }
                Ok(())
            }
            Component::Battery(b) => check_finite(id, "emf", b.emf),
            Component::Rheostat(p) => {
                check_non_negative(id, "total_resistance", p.total_resistance)?;
                check_finite(id, "wiper_resistance", p.wiper_resistance)
            }
            Component::Ammeter(_) | Component::Voltmeter(_) | Component::Switch(_) => Ok(()),
        }
    }

    /// Update a user-adjustable parameter.
    ///
    /// The value is checked before it is stored; on error the component is
    /// unchanged.
    pub fn set_parameter(&mut self, param: Parameter) -> Result<()> {
        let id = self.id();
        let kind = self.kind();
        let mut updated = self.clone();
        match (&mut updated, param) {
            (Component::Resistor(r), Parameter::Resistance(v)) => r.resistance = v,
            (Component::ResistanceBox(b), Parameter::Resistance(v)) => b.resistance = v,
            (Component::Battery(b), Parameter::Emf(v)) => b.emf = v,
            (Component::Galvanometer(g), Parameter::InternalResistance(v)) => {
                g.internal_resistance = v
            }
            (Component::Rheostat(p), Parameter::TotalResistance(v)) => p.total_resistance = v,
            (Component::Rheostat(p), Parameter::WiperResistance(v)) => p.wiper_resistance = v,
            (Component::Switch(s), Parameter::Closed(closed)) => s.closed = closed,
            _ => {
                return Err(LabError::UnsupportedParameter {
                    component: id,
                    kind,
                    param: param.name(),
                })
            }
        }
        updated.check_parameters()?;
        *self = updated;
        Ok(())
    }
}

fn check_finite(id: ComponentId, param: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LabError::invalid_parameter(id, param, format!("{} is not finite", value)))
    }
}

fn check_non_negative(id: ComponentId, param: &str, value: f64) -> Result<()> {
    check_finite(id, param, value)?;
    if value < 0.0 {
        return Err(LabError::invalid_parameter(id, param, format!("{} is negative", value)));
    }
    Ok(())
}
