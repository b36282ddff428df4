//! The workbench: owner of the circuit state.
//!
//! Every action that changes components, parameters or wires re-runs the
//! solver right away and stores the returned component list. Nothing is
//! re-solved implicitly; callers read [`Workbench::components`] after an
//! action and treat it as the new source of truth.

use serde::{Deserialize, Serialize};

use crate::circuit::{check_terminal, validate_circuit, ComponentId, TerminalRef, Wire};
use crate::classify::{classify_wiring, wiring_risks, WiringClassification};
use crate::components::{Component, Parameter};
use crate::error::{LabError, Result};
use crate::solver::{analyze, solve_with_config, SolveResult, SolverConfig};

/// On-disk form of a workbench.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitFile {
    pub components: Vec<Component>,
    #[serde(default)]
    pub wires: Vec<Wire>,
}

impl CircuitFile {
    /// Parse a circuit from RON.
    pub fn from_ron(input: &str) -> Result<Self> {
        ron::from_str(input).map_err(|source| LabError::CircuitParseError { source })
    }

    /// Write the circuit as pretty-printed RON.
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|source| LabError::CircuitWriteError { source })
    }

    /// Read a circuit file.
    #[cfg(feature = "cli")]
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LabError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_ron(&content)
    }
}

/// Components, wires and solver settings of one lab session.
#[derive(Debug, Clone, Default)]
pub struct Workbench {
    components: Vec<Component>,
    wires: Vec<Wire>,
    config: SolverConfig,
    next_id: usize,
}

impl Workbench {
    /// Create an empty workbench with default solver settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty workbench with custom solver settings.
    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Load a saved circuit and solve it once.
    pub fn from_circuit(circuit: CircuitFile, config: SolverConfig) -> Result<Self> {
        validate_circuit(&circuit.components, &circuit.wires)?;
        config.validate()?;
        let next_id = circuit
            .components
            .iter()
            .map(|c| c.id().0 + 1)
            .max()
            .unwrap_or(0);
        let mut bench = Self {
            components: circuit.components,
            wires: circuit.wires,
            config,
            next_id,
        };
        bench.refresh();
        Ok(bench)
    }

    /// Snapshot the current state for saving.
    pub fn to_circuit(&self) -> CircuitFile {
        CircuitFile {
            components: self.components.clone(),
            wires: self.wires.clone(),
        }
    }

    /// All components, with the latest readings.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// All wires.
    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    /// Solver settings in use.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Look up a component.
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id() == id)
    }

    /// Place a new component. `make` receives the id assigned to it.
    pub fn place<F>(&mut self, make: F) -> ComponentId
    where
        F: FnOnce(ComponentId) -> Component,
    {
        let id = ComponentId(self.next_id);
        self.next_id += 1;
        let mut component = make(id);
        if component.id() != id {
            log::debug!("component built with id {}, reassigning {}", component.id(), id);
            set_id(&mut component, id);
        }
        self.components.push(component);
        self.refresh();
        id
    }

    /// Remove a component together with every wire attached to it.
    pub fn remove(&mut self, id: ComponentId) -> Result<Component> {
        let index = self
            .components
            .iter()
            .position(|c| c.id() == id)
            .ok_or(LabError::ComponentNotFound { id })?;
        let removed = self.components.remove(index);
        self.wires.retain(|w| !w.touches_component(id));
        self.refresh();
        Ok(removed)
    }

    /// Draw a wire between two terminals.
    ///
    /// Drawing a wire that already exists is accepted and changes nothing.
    /// Returns whether any reading changed.
    pub fn connect(&mut self, a: TerminalRef, b: TerminalRef) -> Result<bool> {
        check_terminal(&self.components, a)?;
        check_terminal(&self.components, b)?;
        let wire = Wire::new(a, b);
        if self.wires.contains(&wire) {
            return Ok(false);
        }
        self.wires.push(wire);
        Ok(self.refresh())
    }

    /// Remove a wire. Returns whether it existed.
    pub fn disconnect(&mut self, wire: Wire) -> bool {
        let before = self.wires.len();
        self.wires.retain(|w| *w != wire);
        let removed = self.wires.len() != before;
        if removed {
            self.refresh();
        }
        removed
    }

    /// Remove every wire.
    pub fn clear_wires(&mut self) {
        self.wires.clear();
        self.refresh();
    }

    /// Change a component parameter. Returns whether any reading changed.
    pub fn set_parameter(&mut self, id: ComponentId, param: Parameter) -> Result<bool> {
        let component = self
            .components
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or(LabError::ComponentNotFound { id })?;
        component.set_parameter(param)?;
        Ok(self.refresh())
    }

    /// Full solve result (node potentials, source currents) for display.
    pub fn analyze(&self) -> Result<Option<SolveResult>> {
        analyze(&self.components, &self.wires, &self.config)
    }

    /// Classify how one component is wired.
    pub fn classify(&self, id: ComponentId) -> Result<WiringClassification> {
        let component = self.component(id).ok_or(LabError::ComponentNotFound { id })?;
        Ok(classify_wiring(component, &self.components, &self.wires))
    }

    /// Classify every voltmeter and ammeter.
    pub fn risks(&self) -> Vec<(ComponentId, WiringClassification)> {
        wiring_risks(&self.components, &self.wires)
    }

    /// Re-solve and publish the result if it differs from what is stored.
    fn refresh(&mut self) -> bool {
        let solved = solve_with_config(&self.components, &self.wires, &self.config);
        if solved == self.components {
            return false;
        }
        self.components = solved;
        true
    }
}

fn set_id(component: &mut Component, id: ComponentId) {
    match component {
        Component::Resistor(c) => c.id = id,
        Component::ResistanceBox(c) => c.id = id,
        Component::Ammeter(c) => c.id = id,
        Component::Voltmeter(c) => c.id = id,
        Component::Galvanometer(c) => c.id = id,
        Component::Battery(c) => c.id = id,
        Component::Rheostat(c) => c.id = id,
        Component::Switch(c) => c.id = id,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::circuit::Terminal;
    use crate::classify::Placement;
    use crate::components::{Ammeter, Battery, Resistor, Switch, Voltmeter};

    fn ammeter_current(bench: &Workbench, id: ComponentId) -> f64 {
        match bench.component(id) {
            Some(Component::Ammeter(a)) => a.current,
            other => panic!("not an ammeter: {:?}", other),
        }
    }

    /// Battery, switch, ammeter and resistor in one loop.
    fn build_loop(bench: &mut Workbench) -> [ComponentId; 4] {
        let battery = bench.place(|id| Component::Battery(Battery::new(id, 2.0)));
        let switch = bench.place(|id| Component::Switch(Switch::new(id, true)));
        let ammeter = bench.place(|id| Component::Ammeter(Ammeter::new(id)));
        let resistor = bench.place(|id| Component::Resistor(Resistor::new(id, 200.0)));

        let t = TerminalRef::new;
        bench
            .connect(t(battery, Terminal::Positive), t(switch, Terminal::Left))
            .unwrap();
        bench
            .connect(t(switch, Terminal::Right), t(ammeter, Terminal::Positive))
            .unwrap();
        bench
            .connect(t(ammeter, Terminal::Negative), t(resistor, Terminal::Left))
            .unwrap();
        bench
            .connect(t(resistor, Terminal::Right), t(battery, Terminal::Negative))
            .unwrap();
        [battery, switch, ammeter, resistor]
    }

    #[test]
    fn test_actions_resolve_immediately() {
        let mut bench = Workbench::new();
        let [_, _, ammeter, resistor] = build_loop(&mut bench);
        assert_relative_eq!(
            ammeter_current(&bench, ammeter),
            2.0 / (200.0 + 0.01 + 0.01),
            max_relative = 1e-6
        );

        let changed = bench
            .set_parameter(resistor, Parameter::Resistance(100.0))
            .unwrap();
        assert!(changed);
        assert_relative_eq!(
            ammeter_current(&bench, ammeter),
            2.0 / (100.0 + 0.01 + 0.01),
            max_relative = 1e-6
        );
    }

    #[test]
    fn test_opening_switch_drops_current() {
        let mut bench = Workbench::new();
        let [_, switch, ammeter, _] = build_loop(&mut bench);
        assert!(bench.set_parameter(switch, Parameter::Closed(false)).unwrap());
        assert!(ammeter_current(&bench, ammeter) < 1e-9);
    }

    #[test]
    fn test_duplicate_wire_is_a_no_op() {
        let mut bench = Workbench::new();
        let [battery, switch, _, _] = build_loop(&mut bench);
        let wires_before = bench.wires().len();
        let changed = bench
            .connect(
                TerminalRef::new(switch, Terminal::Left),
                TerminalRef::new(battery, Terminal::Positive),
            )
            .unwrap();
        assert!(!changed);
        assert_eq!(bench.wires().len(), wires_before);
    }

    #[test]
    fn test_connect_rejects_unknown_terminal() {
        let mut bench = Workbench::new();
        let r = bench.place(|id| Component::Resistor(Resistor::new(id, 10.0)));
        let err = bench
            .connect(
                TerminalRef::new(r, Terminal::Positive),
                TerminalRef::new(r, Terminal::Left),
            )
            .unwrap_err();
        assert!(matches!(err, LabError::UnknownTerminal { .. }));
        assert!(bench.wires().is_empty());
    }

    #[test]
    fn test_remove_drops_attached_wires() {
        let mut bench = Workbench::new();
        let [_, _, ammeter, _] = build_loop(&mut bench);
        let removed = bench.remove(ammeter).unwrap();
        assert!(matches!(removed, Component::Ammeter(_)));
        assert_eq!(bench.wires().len(), 2);
        assert!(bench.component(ammeter).is_none());
        assert!(matches!(
            bench.remove(ammeter),
            Err(LabError::ComponentNotFound { .. })
        ));
    }

    #[test]
    fn test_disconnect_with_custom_ammeter() {
        let config = SolverConfig::new().with_ammeter_resistance(1.0);
        let mut bench = Workbench::with_config(config);
        let [battery, _, ammeter, resistor] = build_loop(&mut bench);
        assert_relative_eq!(
            ammeter_current(&bench, ammeter),
            2.0 / (200.0 + 0.01 + 1.0),
            max_relative = 1e-6
        );

        let wire = Wire::new(
            TerminalRef::new(battery, Terminal::Negative),
            TerminalRef::new(resistor, Terminal::Right),
        );
        assert!(bench.disconnect(wire));
        assert!(!bench.disconnect(wire));
        assert!(ammeter_current(&bench, ammeter) < 1e-9);
    }

    #[test]
    fn test_clearing_wires_freezes_readings() {
        let mut bench = Workbench::new();
        let [_, _, ammeter, _] = build_loop(&mut bench);
        let before = ammeter_current(&bench, ammeter);
        bench.clear_wires();
        assert!(bench.wires().is_empty());
        assert_eq!(ammeter_current(&bench, ammeter), before);
    }

    #[test]
    fn test_failed_parameter_change_keeps_state() {
        let mut bench = Workbench::new();
        let [_, _, _, resistor] = build_loop(&mut bench);
        let snapshot = bench.components().to_vec();
        assert!(bench
            .set_parameter(resistor, Parameter::Resistance(f64::NAN))
            .is_err());
        assert_eq!(bench.components(), snapshot.as_slice());
    }

    #[test]
    fn test_voltmeter_across_load_is_not_flagged() {
        let mut bench = Workbench::new();
        let [_, _, ammeter, resistor] = build_loop(&mut bench);
        let meter = bench.place(|id| Component::Voltmeter(Voltmeter::new(id)));
        bench
            .connect(
                TerminalRef::new(meter, Terminal::Positive),
                TerminalRef::new(resistor, Terminal::Left),
            )
            .unwrap();
        bench
            .connect(
                TerminalRef::new(meter, Terminal::Negative),
                TerminalRef::new(resistor, Terminal::Right),
            )
            .unwrap();

        let voltmeter = bench.classify(meter).unwrap();
        assert_eq!(voltmeter.placement, Placement::Parallel);
        assert!(!voltmeter.is_risky());

        let risks = bench.risks();
        assert_eq!(risks.len(), 2);
        assert!(risks.iter().any(|(id, _)| *id == ammeter));
    }

    #[test]
    fn test_place_assigns_fresh_ids() {
        let mut bench = Workbench::new();
        let a = bench.place(|_| Component::Resistor(Resistor::new(ComponentId(42), 10.0)));
        let b = bench.place(|id| Component::Resistor(Resistor::new(id, 10.0)));
        assert_ne!(a, b);
        assert_eq!(bench.component(a).map(Component::id), Some(a));
    }

    #[test]
    fn test_circuit_file_round_trip() {
        let mut bench = Workbench::new();
        build_loop(&mut bench);
        let text = bench.to_circuit().to_ron().unwrap();
        let loaded = Workbench::from_circuit(
            CircuitFile::from_ron(&text).unwrap(),
            SolverConfig::default(),
        )
        .unwrap();
        assert_eq!(loaded.components(), bench.components());
        assert_eq!(loaded.wires(), bench.wires());

        // New parts do not collide with loaded ids
        let mut loaded = loaded;
        let id = loaded.place(|id| Component::Voltmeter(Voltmeter::new(id)));
        assert_eq!(id, ComponentId(4));
    }

    #[test]
    fn test_parse_handwritten_circuit() {
        let text = r#"(
            components: [
                Battery((id: 0, emf: 5.0)),
                Galvanometer((id: 1, internal_resistance: 100.0)),
                ResistanceBox((id: 2, resistance: 4900.0)),
            ],
            wires: [
                (a: (component: 0, terminal: Positive), b: (component: 1, terminal: Left)),
                (a: (component: 1, terminal: Right), b: (component: 2, terminal: Left)),
                (a: (component: 2, terminal: Right), b: (component: 0, terminal: Negative)),
            ],
        )"#;
        let bench =
            Workbench::from_circuit(CircuitFile::from_ron(text).unwrap(), SolverConfig::default())
                .unwrap();
        match bench.component(ComponentId(1)) {
            Some(Component::Galvanometer(g)) => {
                assert_relative_eq!(g.current_ma, 1.0, max_relative = 1e-6)
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_load_rejects_dangling_wire() {
        let file = CircuitFile {
            components: vec![Component::Resistor(Resistor::new(ComponentId(0), 1.0))],
            wires: vec![Wire::new(
                TerminalRef::new(ComponentId(0), Terminal::Left),
                TerminalRef::new(ComponentId(5), Terminal::Left),
            )],
        };
        assert!(Workbench::from_circuit(file, SolverConfig::default()).is_err());
    }
}
