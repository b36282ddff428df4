//! Series/parallel classification of measuring instruments.
//!
//! A voltmeter wired in series opens the loop it sits in; an ammeter wired
//! in parallel shorts the branch it bridges. This works on component
//! adjacency, independent of the numeric solve.

use std::collections::HashSet;

use crate::circuit::{ComponentId, TerminalRef, UndirectedGraph, Wire};
use crate::components::Component;

/// How an instrument sits relative to the rest of the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The instrument's own wires are the only path between its neighbors.
    Series,
    /// Its neighbors are the same part or are joined by another path.
    Parallel,
    /// A terminal has no wire, more than one, or leads to a missing part.
    Unknown,
}

/// Outcome of [`classify_wiring`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WiringClassification {
    pub placement: Placement,
    /// A voltmeter placed in series
    pub is_series_risk: bool,
    /// An ammeter placed in parallel
    pub is_parallel_risk: bool,
}

impl WiringClassification {
    fn unknown() -> Self {
        Self {
            placement: Placement::Unknown,
            is_series_risk: false,
            is_parallel_risk: false,
        }
    }

    /// Check whether either risk is raised.
    pub fn is_risky(&self) -> bool {
        self.is_series_risk || self.is_parallel_risk
    }
}

/// Classify how `instrument` is wired.
///
/// Each governing terminal must carry exactly one wire. The parts at the far
/// ends of those wires, X and Y, decide the placement: parallel if X and Y
/// are the same part or are reachable from each other without passing
/// through the instrument, series otherwise. Only voltmeters (series) and
/// ammeters (parallel) raise risks; other parts still get a placement.
pub fn classify_wiring(
    instrument: &Component,
    components: &[Component],
    wires: &[Wire],
) -> WiringClassification {
    let id = instrument.id();
    let [first, second] = instrument.governing_terminals().map(|t| TerminalRef::new(id, t));

    let known: HashSet<ComponentId> = components.iter().map(Component::id).collect();
    let usable = |c: ComponentId| c != id && known.contains(&c);
    let (x, y) = match (neighbor_of(first, wires), neighbor_of(second, wires)) {
        (Some(x), Some(y)) if usable(x) && usable(y) => (x, y),
        _ => return WiringClassification::unknown(),
    };

    let placement = if x == y {
        Placement::Parallel
    } else {
        let graph: UndirectedGraph<ComponentId> = wires
            .iter()
            .map(|w| (w.a.component, w.b.component))
            .filter(|(a, b)| known.contains(a) && known.contains(b))
            .collect();
        if graph.has_path_avoiding(x, y, |v| v != id) {
            Placement::Parallel
        } else {
            Placement::Series
        }
    };

    WiringClassification {
        placement,
        is_series_risk: matches!(instrument, Component::Voltmeter(_))
            && placement == Placement::Series,
        is_parallel_risk: matches!(instrument, Component::Ammeter(_))
            && placement == Placement::Parallel,
    }
}

/// Classify every voltmeter and ammeter on the workbench.
pub fn wiring_risks(
    components: &[Component],
    wires: &[Wire],
) -> Vec<(ComponentId, WiringClassification)> {
    components
        .iter()
        .filter(|c| c.is_instrument())
        .map(|c| (c.id(), classify_wiring(c, components, wires)))
        .collect()
}

/// The component at the far end of the single wire on `terminal`.
///
/// A wire drawn twice counts once.
fn neighbor_of(terminal: TerminalRef, wires: &[Wire]) -> Option<ComponentId> {
    let ends: HashSet<TerminalRef> = wires.iter().filter_map(|w| w.other_end(terminal)).collect();
    let mut ends = ends.into_iter();
    match (ends.next(), ends.next()) {
        (Some(end), None) => Some(end.component),
        _ => None,
    }
}
