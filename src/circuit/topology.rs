//! Electrical node assignment from terminals and wires.

use std::collections::HashMap;

use super::graph::UndirectedGraph;
use super::types::{NodeId, Terminal, TerminalRef, Wire};
use crate::components::Component;

/// Mapping from every terminal on the workbench to its electrical node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMap {
    nodes: HashMap<TerminalRef, NodeId>,
    num_nodes: usize,
}

impl NodeMap {
    /// Group terminals into nodes.
    ///
    /// Terminals are joined only through wires; two terminals of the same
    /// component stay separate unless a wire joins them. Node ids follow
    /// the component list order, so the result does not depend on wire
    /// order or duplicate wires. Node 0 is the cluster holding the first
    /// battery's negative terminal, or the first terminal of the first
    /// component if there is no battery.
    ///
    /// Wires naming a terminal that does not exist are ignored.
    pub fn build(components: &[Component], wires: &[Wire]) -> Self {
        let mut graph = UndirectedGraph::new();
        for component in components {
            for terminal in component.terminal_refs() {
                graph.add_vertex(terminal);
            }
        }
        for wire in wires {
            if graph.contains(wire.a) && graph.contains(wire.b) {
                graph.add_edge(wire.a, wire.b);
            } else {
                log::warn!("ignoring wire {} with an unknown endpoint", wire);
            }
        }

        let ground_seed = components
            .iter()
            .find_map(|c| match c {
                Component::Battery(b) => Some(TerminalRef::new(b.id, Terminal::Negative)),
                _ => None,
            })
            .into_iter();
        let all_terminals = components.iter().flat_map(|c| c.terminal_refs());

        let mut nodes = HashMap::new();
        let mut next_id = 0usize;
        for terminal in ground_seed.chain(all_terminals) {
            if nodes.contains_key(&terminal) {
                continue;
            }
            let node = NodeId(next_id);
            next_id += 1;
            for member in graph.component_of(terminal) {
                nodes.insert(member, node);
            }
        }

        Self {
            nodes,
            num_nodes: next_id,
        }
    }

    /// Total number of nodes, ground included.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Node of a terminal, or `None` if the terminal is not on the workbench.
    pub fn node(&self, terminal: TerminalRef) -> Option<NodeId> {
        self.nodes.get(&terminal).copied()
    }

    /// Check whether two terminals share a node.
    pub fn same_node(&self, a: TerminalRef, b: TerminalRef) -> bool {
        match (self.node(a), self.node(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// All terminals and their nodes.
    pub fn iter(&self) -> impl Iterator<Item = (TerminalRef, NodeId)> + '_ {
        self.nodes.iter().map(|(&t, &n)| (t, n))
    }
}
