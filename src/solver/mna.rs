//! MNA matrix assembly and solving.

use crate::circuit::{ComponentId, NodeMap, Terminal, TerminalRef};
use crate::components::Component;
use crate::error::{LabError, Result};

use super::SolverConfig;

/// Solution of an MNA system.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Node potentials followed by battery branch currents
    pub x: Vec<f64>,
    /// Elimination columns whose pivot fell below the threshold
    pub skipped_pivots: Vec<usize>,
}

/// MNA matrix system Ax = z.
#[derive(Debug, Clone)]
pub struct MnaSystem {
    /// System matrix A (row-major)
    pub a: Vec<f64>,
    /// Source vector z
    pub z: Vec<f64>,
    /// Matrix dimension
    pub size: usize,
    /// Number of nodes, ground included
    pub num_nodes: usize,
    /// Battery owning each branch-current row, in row order
    pub branches: Vec<ComponentId>,
}

impl MnaSystem {
    /// Create an empty system for `num_nodes` nodes and `num_branches`
    /// voltage sources.
    pub fn new(num_nodes: usize, num_branches: usize) -> Self {
        let size = num_nodes + num_branches;
        Self {
            a: vec![0.0; size * size],
            z: vec![0.0; size],
            size,
            num_nodes,
            branches: Vec::with_capacity(num_branches),
        }
    }

    /// Assemble the system for the given components.
    ///
    /// Parameters are read fresh from `components`; any malformed value
    /// aborts the assembly.
    pub fn assemble(
        components: &[Component],
        nodes: &NodeMap,
        config: &SolverConfig,
    ) -> Result<Self> {
        let num_branches = components
            .iter()
            .filter(|c| matches!(c, Component::Battery(_)))
            .count();
        let mut system = Self::new(nodes.num_nodes(), num_branches);

        for component in components {
            component.check_parameters()?;
            system.stamp_component(component, nodes, config)?;
        }

        for n in 0..system.num_nodes {
            system.add(n, n, config.gmin);
        }

        system.pin_ground();
        Ok(system)
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.a[row * self.size + col]
    }

    /// Set matrix element at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] = value;
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] += value;
    }

    /// Stamp a conductance between two nodes.
    /// For a conductance G between nodes n1 and n2:
    ///   A[n1,n1] += G
    ///   A[n2,n2] += G
    ///   A[n1,n2] -= G
    ///   A[n2,n1] -= G
    pub fn stamp_conductance(&mut self, n1: usize, n2: usize, g: f64) {
        self.add(n1, n1, g);
        self.add(n2, n2, g);
        self.add(n1, n2, -g);
        self.add(n2, n1, -g);
    }

    /// Stamp a resistance; non-positive values leave the branch open.
    pub fn stamp_resistance(&mut self, n1: usize, n2: usize, r: f64) {
        if r > 0.0 {
            self.stamp_conductance(n1, n2, 1.0 / r);
        }
    }

    /// Stamp a voltage source between two nodes with branch current at row br.
    /// V[n+] - V[n-] = E
    pub fn stamp_voltage_source(&mut self, n_pos: usize, n_neg: usize, br: usize, voltage: f64) {
        self.add(br, n_pos, 1.0);
        self.add(n_pos, br, 1.0);
        self.add(br, n_neg, -1.0);
        self.add(n_neg, br, -1.0);
        self.z[br] = voltage;
    }

    fn stamp_component(
        &mut self,
        component: &Component,
        nodes: &NodeMap,
        config: &SolverConfig,
    ) -> Result<()> {
        let id = component.id();
        let node = |terminal| node_index(nodes, id, terminal);

        match component {
            Component::Resistor(r) => {
                self.stamp_resistance(node(Terminal::Left)?, node(Terminal::Right)?, r.resistance)
            }
            Component::ResistanceBox(b) => {
                self.stamp_resistance(node(Terminal::Left)?, node(Terminal::Right)?, b.resistance)
            }
            Component::Galvanometer(g) => self.stamp_resistance(
                node(Terminal::Left)?,
                node(Terminal::Right)?,
                g.internal_resistance,
            ),
            Component::Ammeter(_) => self.stamp_resistance(
                node(Terminal::Positive)?,
                node(Terminal::Negative)?,
                config.ammeter_resistance,
            ),
            Component::Voltmeter(_) => self.stamp_resistance(
                node(Terminal::Positive)?,
                node(Terminal::Negative)?,
                config.voltmeter_resistance,
            ),
            Component::Switch(s) => {
                if let Some(r) = s.resistance() {
                    self.stamp_resistance(node(Terminal::Left)?, node(Terminal::Right)?, r);
                }
            }
            Component::Rheostat(p) => {
                let a = node(Terminal::A)?;
                let b = node(Terminal::B)?;
                let c = node(Terminal::C)?;

                // Two resistors: A-wiper and wiper-B
                self.stamp_conductance(a, c, 1.0 / p.r_ac(config.rheostat_floor));
                self.stamp_conductance(c, b, 1.0 / p.r_cb(config.rheostat_floor));
            }
            Component::Battery(b) => {
                let br = self.num_nodes + self.branches.len();
                self.branches.push(b.id);
                self.stamp_voltage_source(
                    node(Terminal::Positive)?,
                    node(Terminal::Negative)?,
                    br,
                    b.emf,
                );
            }
        }
        Ok(())
    }

    /// Replace the ground row and column with `V[0] = 0`.
    fn pin_ground(&mut self) {
        if self.num_nodes == 0 {
            return;
        }
        for k in 0..self.size {
            self.set(0, k, 0.0);
            self.set(k, 0, 0.0);
        }
        self.set(0, 0, 1.0);
        self.z[0] = 0.0;
    }

    /// Solve by Gaussian elimination with partial pivoting.
    ///
    /// A column whose best pivot is below `config.pivot_threshold` is
    /// skipped and recorded in [`Solution::skipped_pivots`]; the matching
    /// unknown comes out as 0. With `config.strict_pivots` the first such
    /// column is an error instead.
    pub fn solve(&self, config: &SolverConfig) -> Result<Solution> {
        let n = self.size;
        let mut a = self.a.clone();
        let mut z = self.z.clone();
        let mut skipped_pivots = Vec::new();

        for k in 0..n {
            // Find pivot
            let mut max_val = a[k * n + k].abs();
            let mut max_row = k;
            for i in (k + 1)..n {
                let val = a[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val < config.pivot_threshold {
                if config.strict_pivots {
                    return Err(LabError::indeterminate(k, max_val));
                }
                skipped_pivots.push(k);
                continue;
            }

            // Swap rows if needed
            if max_row != k {
                for j in 0..n {
                    a.swap(k * n + j, max_row * n + j);
                }
                z.swap(k, max_row);
            }

            // Eliminate
            let pivot = a[k * n + k];
            for i in (k + 1)..n {
                let factor = a[i * n + k] / pivot;
                if factor == 0.0 {
                    continue;
                }
                for j in k..n {
                    a[i * n + j] -= factor * a[k * n + j];
                }
                z[i] -= factor * z[k];
            }
        }

        // Back substitution
        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let diag = a[i * n + i];
            if diag.abs() < config.pivot_threshold {
                continue;
            }
            let mut sum = z[i];
            for j in (i + 1)..n {
                sum -= a[i * n + j] * x[j];
            }
            x[i] = sum / diag;
        }

        if let Some((index, &value)) = x.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(LabError::NumericalOverflow { index, value });
        }

        Ok(Solution { x, skipped_pivots })
    }
}

fn node_index(nodes: &NodeMap, component: ComponentId, terminal: Terminal) -> Result<usize> {
    let terminal = TerminalRef::new(component, terminal);
    nodes
        .node(terminal)
        .map(|n| n.0)
        .ok_or(LabError::UnknownTerminal { terminal })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::circuit::Wire;
    use crate::components::{Battery, Resistor, Switch};

    fn t(id: usize, terminal: Terminal) -> TerminalRef {
        TerminalRef::new(ComponentId(id), terminal)
    }

    #[test]
    fn test_dense_solve_with_pivoting() {
        // [0 2] [x0]   [4]
        // [3 1] [x1] = [5]
        let mut sys = MnaSystem::new(2, 0);
        sys.set(0, 1, 2.0);
        sys.set(1, 0, 3.0);
        sys.set(1, 1, 1.0);
        sys.z = vec![4.0, 5.0];

        let sol = sys.solve(&SolverConfig::default()).unwrap();
        assert_relative_eq!(sol.x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(sol.x[1], 2.0, epsilon = 1e-12);
        assert!(sol.skipped_pivots.is_empty());
    }

    #[test]
    fn test_solve_is_deterministic() {
        let mut sys = MnaSystem::new(3, 0);
        sys.a = vec![4.0, -1.0, 0.5, -1.0, 3.0, -2.0, 0.5, -2.0, 5.0];
        sys.z = vec![1.0, 2.0, 3.0];
        let config = SolverConfig::default();
        assert_eq!(sys.solve(&config).unwrap(), sys.solve(&config).unwrap());
    }

    #[test]
    fn test_singular_column_is_skipped_or_rejected() {
        // Second unknown never appears
        let mut sys = MnaSystem::new(2, 0);
        sys.set(0, 0, 2.0);
        sys.z = vec![4.0, 0.0];

        let lenient = sys.solve(&SolverConfig::default()).unwrap();
        assert_eq!(lenient.skipped_pivots, vec![1]);
        assert_relative_eq!(lenient.x[0], 2.0);
        assert_eq!(lenient.x[1], 0.0);

        let strict = SolverConfig::default().with_strict_pivots(true);
        assert!(matches!(
            sys.solve(&strict),
            Err(LabError::IndeterminateSystem { column: 1, .. })
        ));
    }

    #[test]
    fn test_assemble_battery_and_resistor() {
        let components = vec![
            Component::Battery(Battery::new(ComponentId(0), 5.0)),
            Component::Resistor(Resistor::new(ComponentId(1), 1000.0)),
        ];
        let wires = vec![
            Wire::new(t(0, Terminal::Positive), t(1, Terminal::Left)),
            Wire::new(t(1, Terminal::Right), t(0, Terminal::Negative)),
        ];
        let nodes = NodeMap::build(&components, &wires);
        let config = SolverConfig::default();
        let sys = MnaSystem::assemble(&components, &nodes, &config).unwrap();

        // Two nodes plus one battery row
        assert_eq!(sys.size, 3);
        assert_eq!(sys.branches, vec![ComponentId(0)]);

        // Ground row pinned
        assert_eq!(sys.get(0, 0), 1.0);
        assert_eq!(sys.get(0, 1), 0.0);
        assert_eq!(sys.get(1, 0), 0.0);
        assert_eq!(sys.get(2, 0), 0.0);

        // Node 1 diagonal: resistor + GMIN, coupled to the branch current
        assert_relative_eq!(sys.get(1, 1), 1e-3 + config.gmin);
        assert_eq!(sys.get(1, 2), 1.0);
        assert_eq!(sys.get(2, 1), 1.0);
        assert_eq!(sys.z[2], 5.0);

        let sol = sys.solve(&config).unwrap();
        assert_relative_eq!(sol.x[1], 5.0, epsilon = 1e-9);
        // Branch current flows into the positive terminal from outside
        assert_relative_eq!(sol.x[2], -5e-3, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_resistance_is_not_stamped() {
        let components = vec![Component::Resistor(Resistor::new(ComponentId(0), 0.0))];
        let nodes = NodeMap::build(&components, &[]);
        let config = SolverConfig::default();
        let sys = MnaSystem::assemble(&components, &nodes, &config).unwrap();
        assert_eq!(sys.get(1, 1), config.gmin);
    }

    #[test]
    fn test_closed_switch_stamp() {
        let components = vec![Component::Switch(Switch::new(ComponentId(0), true))];
        let nodes = NodeMap::build(&components, &[]);
        let config = SolverConfig::default();
        let sys = MnaSystem::assemble(&components, &nodes, &config).unwrap();
        assert_relative_eq!(sys.get(1, 1), 1.0 / Switch::R_CLOSED + config.gmin);
    }

    #[test]
    fn test_malformed_parameter_aborts_assembly() {
        let components = vec![Component::Battery(Battery::new(ComponentId(0), f64::NAN))];
        let nodes = NodeMap::build(&components, &[]);
        assert!(matches!(
            MnaSystem::assemble(&components, &nodes, &SolverConfig::default()),
            Err(LabError::InvalidParameter { .. })
        ));
    }
}
