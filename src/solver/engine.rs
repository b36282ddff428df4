//! Solve entry points.

use std::collections::HashMap;

use crate::circuit::{check_unique_ids, ComponentId, NodeMap, TerminalRef, Wire};
use crate::components::Component;
use crate::error::{LabError, Result};

use super::mna::MnaSystem;
use super::readback::annotate;
use super::{
    AMMETER_RESISTANCE, GMIN, PIVOT_THRESHOLD, RHEOSTAT_FLOOR, VOLTMETER_RESISTANCE,
};

/// Configuration for the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Conductance from every node to ground (S).
    pub gmin: f64,
    /// Pivots below this magnitude are treated as zero.
    pub pivot_threshold: f64,
    /// Smallest resistance of a rheostat branch (Ω).
    pub rheostat_floor: f64,
    /// Ammeter internal resistance (Ω).
    pub ammeter_resistance: f64,
    /// Voltmeter internal resistance (Ω).
    pub voltmeter_resistance: f64,
    /// Fail the solve instead of skipping a near-zero pivot.
    pub strict_pivots: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            gmin: GMIN,
            pivot_threshold: PIVOT_THRESHOLD,
            rheostat_floor: RHEOSTAT_FLOOR,
            ammeter_resistance: AMMETER_RESISTANCE,
            voltmeter_resistance: VOLTMETER_RESISTANCE,
            strict_pivots: false,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the conductance added from every node to ground.
    pub fn with_gmin(mut self, gmin: f64) -> Self {
        self.gmin = gmin;
        self
    }

    /// Set the pivot threshold.
    pub fn with_pivot_threshold(mut self, threshold: f64) -> Self {
        self.pivot_threshold = threshold;
        self
    }

    /// Set the rheostat branch floor (in ohms).
    pub fn with_rheostat_floor(mut self, floor: f64) -> Self {
        self.rheostat_floor = floor;
        self
    }

    /// Set the ammeter internal resistance (in ohms).
    pub fn with_ammeter_resistance(mut self, r: f64) -> Self {
        self.ammeter_resistance = r;
        self
    }

    /// Set the voltmeter internal resistance (in ohms).
    pub fn with_voltmeter_resistance(mut self, r: f64) -> Self {
        self.voltmeter_resistance = r;
        self
    }

    /// Report an indeterminate system instead of skipping near-zero pivots.
    ///
    /// Off by default: a student's half-built circuit then still shows
    /// plausible readings on the connected part.
    pub fn with_strict_pivots(mut self, strict: bool) -> Self {
        self.strict_pivots = strict;
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("rheostat_floor", self.rheostat_floor),
            ("ammeter_resistance", self.ammeter_resistance),
            ("voltmeter_resistance", self.voltmeter_resistance),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(LabError::InvalidConfig {
                    message: format!("{} must be positive, got {}", name, value),
                });
            }
        }
        let non_negative = [
            ("gmin", self.gmin),
            ("pivot_threshold", self.pivot_threshold),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LabError::InvalidConfig {
                    message: format!("{} must be non-negative, got {}", name, value),
                });
            }
        }
        Ok(())
    }
}

/// Electrical state of one component after a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentSolution {
    /// Potential of the first governing terminal minus the second (V)
    pub voltage: f64,
    /// Current a battery delivers out of its positive terminal (A)
    pub source_current: Option<f64>,
    /// Whether any wire touches a governing terminal
    pub connected: bool,
}

/// Result of a successful solve.
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Terminal-to-node assignment used for the solve
    pub nodes: NodeMap,
    /// Potential of every node, ground first (V)
    pub node_potentials: Vec<f64>,
    /// Per-component voltages and source currents
    pub components: HashMap<ComponentId, ComponentSolution>,
    /// Elimination columns skipped because of a near-zero pivot
    pub skipped_pivots: Vec<usize>,
}

impl SolveResult {
    /// Potential at a terminal.
    pub fn potential(&self, terminal: TerminalRef) -> Option<f64> {
        self.nodes
            .node(terminal)
            .and_then(|n| self.node_potentials.get(n.0).copied())
    }

    /// Solution for one component.
    pub fn component(&self, id: ComponentId) -> Option<&ComponentSolution> {
        self.components.get(&id)
    }

    /// Whether any pivot was skipped, i.e. part of the result is arbitrary.
    pub fn is_indeterminate(&self) -> bool {
        !self.skipped_pivots.is_empty()
    }
}

/// Run topology, assembly and elimination.
///
/// Returns `Ok(None)` when the workbench has fewer than two electrical
/// nodes; there is nothing to solve. Duplicate component ids are an error.
pub fn analyze(
    components: &[Component],
    wires: &[Wire],
    config: &SolverConfig,
) -> Result<Option<SolveResult>> {
    config.validate()?;
    check_unique_ids(components)?;

    let nodes = NodeMap::build(components, wires);
    if nodes.num_nodes() < 2 {
        return Ok(None);
    }

    let system = MnaSystem::assemble(components, &nodes, config)?;
    let solution = system.solve(config)?;
    if !solution.skipped_pivots.is_empty() {
        log::debug!(
            "skipped {} near-zero pivot(s) at columns {:?}",
            solution.skipped_pivots.len(),
            solution.skipped_pivots
        );
    }

    let node_potentials = solution.x[..nodes.num_nodes()].to_vec();
    let branch_currents: HashMap<ComponentId, f64> = system
        .branches
        .iter()
        .enumerate()
        .map(|(k, &id)| (id, solution.x[system.num_nodes + k]))
        .collect();

    // Only wires the node map accepted count towards a connection
    let live_wires: Vec<&Wire> = wires
        .iter()
        .filter(|w| nodes.node(w.a).is_some() && nodes.node(w.b).is_some())
        .collect();

    let mut per_component = HashMap::with_capacity(components.len());
    for component in components {
        let id = component.id();
        let [first, second] = component.governing_terminals().map(|t| TerminalRef::new(id, t));
        let potential = |t: TerminalRef| {
            nodes
                .node(t)
                .map(|n| node_potentials[n.0])
                .ok_or(LabError::UnknownTerminal { terminal: t })
        };
        let voltage = potential(first)? - potential(second)?;
        let connected = live_wires
            .iter()
            .any(|w| w.touches(first) || w.touches(second));
        // MNA branch current flows into the positive terminal
        let source_current = branch_currents.get(&id).map(|&j| -j);

        per_component.insert(
            id,
            ComponentSolution {
                voltage,
                source_current,
                connected,
            },
        );
    }

    log::debug!(
        "solved {} node(s), {} source(s) for {} component(s)",
        nodes.num_nodes(),
        system.branches.len(),
        components.len()
    );

    Ok(Some(SolveResult {
        nodes,
        node_potentials,
        components: per_component,
        skipped_pivots: solution.skipped_pivots,
    }))
}

/// Solve the workbench with the default configuration and return the
/// annotated component list.
///
/// See [`solve_with_config`].
pub fn solve(components: &[Component], wires: &[Wire]) -> Vec<Component> {
    solve_with_config(components, wires, &SolverConfig::default())
}

/// Solve the workbench and return a new component list with every gauge
/// reading updated.
///
/// Never fails: with fewer than two nodes, or if the solve errors, the
/// input is returned unchanged and the error is logged. The inputs are
/// never mutated.
pub fn solve_with_config(
    components: &[Component],
    wires: &[Wire],
    config: &SolverConfig,
) -> Vec<Component> {
    match analyze(components, wires, config) {
        Ok(Some(result)) => annotate(components, &result, config),
        Ok(None) => {
            log::debug!("fewer than two nodes, keeping previous readings");
            components.to_vec()
        }
        Err(e) => {
            log::warn!("solve failed, keeping previous readings: {}", e);
            components.to_vec()
        }
    }
}
