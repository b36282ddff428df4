//! Gauge readback from a solved system.

use crate::components::Component;

use super::{SolveResult, SolverConfig};

/// Return a copy of `components` with every connected gauge showing the
/// value implied by `result`.
///
/// Readings depend only on the potentials at the gauge's own governing
/// terminals, so running this twice on the same result gives the same list.
/// Non-gauges are copied as they are, and gauges with no wire on either
/// terminal keep their previous reading.
pub fn annotate(
    components: &[Component],
    result: &SolveResult,
    config: &SolverConfig,
) -> Vec<Component> {
    components
        .iter()
        .map(|component| {
            let mut updated = component.clone();
            let solution = match result.component(component.id()) {
                Some(s) if s.connected => s,
                _ => return updated,
            };
            let dv = solution.voltage;

            match &mut updated {
                Component::Galvanometer(g) => {
                    g.current_ma = dv / g.internal_resistance * 1000.0;
                }
                Component::Ammeter(a) => {
                    a.current = dv.abs() / config.ammeter_resistance;
                }
                Component::Voltmeter(v) => {
                    v.voltage = dv.abs();
                }
                Component::Resistor(_)
                | Component::ResistanceBox(_)
                | Component::Battery(_)
                | Component::Rheostat(_)
                | Component::Switch(_) => {}
            }
            updated
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::circuit::{ComponentId, NodeMap};
    use crate::components::{Ammeter, Galvanometer, Resistor, Voltmeter};
    use crate::solver::ComponentSolution;

    fn result_with(voltages: &[(usize, f64)]) -> SolveResult {
        let components: HashMap<ComponentId, ComponentSolution> = voltages
            .iter()
            .map(|&(id, voltage)| {
                (
                    ComponentId(id),
                    ComponentSolution {
                        voltage,
                        source_current: None,
                        connected: true,
                    },
                )
            })
            .collect();
        SolveResult {
            nodes: NodeMap::build(&[], &[]),
            node_potentials: Vec::new(),
            components,
            skipped_pivots: Vec::new(),
        }
    }

    #[test]
    fn test_gauge_formulas() {
        let components = vec![
            Component::Galvanometer(Galvanometer::new(ComponentId(0), 50.0)),
            Component::Ammeter(Ammeter::new(ComponentId(1))),
            Component::Voltmeter(Voltmeter::new(ComponentId(2))),
            Component::Resistor(Resistor::new(ComponentId(3), 10.0)),
        ];
        let result = result_with(&[(0, -0.1), (1, -0.002), (2, -2.5), (3, 1.0)]);
        let config = SolverConfig::default().with_ammeter_resistance(0.01);
        let annotated = annotate(&components, &result, &config);

        match &annotated[0] {
            Component::Galvanometer(g) => assert!((g.current_ma + 2.0).abs() < 1e-12),
            other => panic!("unexpected {:?}", other),
        }
        match &annotated[1] {
            Component::Ammeter(a) => assert!((a.current - 0.2).abs() < 1e-12),
            other => panic!("unexpected {:?}", other),
        }
        match &annotated[2] {
            Component::Voltmeter(v) => assert!((v.voltage - 2.5).abs() < 1e-12),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(annotated[3], components[3]);
    }

    #[test]
    fn test_annotate_is_idempotent() {
        let components = vec![Component::Voltmeter(Voltmeter::new(ComponentId(0)))];
        let result = result_with(&[(0, 1.5)]);
        let config = SolverConfig::default();
        let once = annotate(&components, &result, &config);
        let twice = annotate(&once, &result, &config);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unconnected_gauge_is_untouched() {
        let mut meter = Ammeter::new(ComponentId(0));
        meter.current = 0.3;
        let components = vec![Component::Ammeter(meter)];
        let mut result = result_with(&[(0, 0.0)]);
        if let Some(s) = result.components.get_mut(&ComponentId(0)) {
            s.connected = false;
        }
        let annotated = annotate(&components, &result, &SolverConfig::default());
        assert_eq!(annotated, components);
    }
}
