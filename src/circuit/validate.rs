//! Circuit validation.

use std::collections::HashSet;

use super::types::{TerminalRef, Wire};
use crate::components::Component;
use crate::error::{LabError, Result};

/// Validate a workbench before it is loaded or edited.
///
/// Checks:
/// - Component ids are unique
/// - Every wire endpoint names a terminal of an existing component
/// - Component parameters are usable by the assembler
///
/// The solve itself tolerates all of these (it skips bad wires and keeps
/// the previous readings on bad parameters); this is for callers that want
/// to reject a circuit outright.
pub fn validate_circuit(components: &[Component], wires: &[Wire]) -> Result<()> {
    check_unique_ids(components)?;
    for component in components {
        component.check_parameters()?;
    }

    for wire in wires {
        for end in [wire.a, wire.b] {
            check_terminal(components, end)?;
        }
    }

    Ok(())
}

/// Check that no two components share an id.
///
/// Terminals are keyed by component id, so two parts with one id would be
/// merged into the same nodes.
pub fn check_unique_ids(components: &[Component]) -> Result<()> {
    let mut ids = HashSet::new();
    for component in components {
        if !ids.insert(component.id()) {
            return Err(LabError::DuplicateComponent { id: component.id() });
        }
    }
    Ok(())
}

/// Check that a terminal reference names a terminal of an existing component.
pub fn check_terminal(components: &[Component], terminal: TerminalRef) -> Result<()> {
    let component = components
        .iter()
        .find(|c| c.id() == terminal.component)
        .ok_or(LabError::UnknownTerminal { terminal })?;
    if component.has_terminal(terminal.terminal) {
        Ok(())
    } else {
        Err(LabError::UnknownTerminal { terminal })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{ComponentId, Terminal};
    use crate::components::{Battery, Resistor, Voltmeter};

    #[test]
    fn test_valid_circuit() {
        let components = vec![
            Component::Battery(Battery::new(ComponentId(0), 1.5)),
            Component::Resistor(Resistor::new(ComponentId(1), 10.0)),
        ];
        let wires = vec![Wire::new(
            TerminalRef::new(ComponentId(0), Terminal::Positive),
            TerminalRef::new(ComponentId(1), Terminal::Left),
        )];
        assert!(validate_circuit(&components, &wires).is_ok());
    }

    #[test]
    fn test_duplicate_id() {
        let components = vec![
            Component::Resistor(Resistor::new(ComponentId(3), 10.0)),
            Component::Voltmeter(Voltmeter::new(ComponentId(3))),
        ];
        assert!(matches!(
            validate_circuit(&components, &[]),
            Err(LabError::DuplicateComponent { id: ComponentId(3) })
        ));
    }

    #[test]
    fn test_wrong_terminal_name() {
        let components = vec![Component::Resistor(Resistor::new(ComponentId(0), 10.0))];
        let wires = vec![Wire::new(
            TerminalRef::new(ComponentId(0), Terminal::Positive),
            TerminalRef::new(ComponentId(0), Terminal::Left),
        )];
        assert!(matches!(
            validate_circuit(&components, &wires),
            Err(LabError::UnknownTerminal { .. })
        ));
    }

    #[test]
    fn test_bad_parameter() {
        let components = vec![Component::Resistor(Resistor::new(ComponentId(0), f64::INFINITY))];
        assert!(matches!(
            validate_circuit(&components, &[]),
            Err(LabError::InvalidParameter { .. })
        ));
    }
}
