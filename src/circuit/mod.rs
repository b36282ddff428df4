//! Circuit topology: identifiers, wires and electrical nodes.
//!
//! Components and wires are owned by the caller. This module only reads
//! them: [`NodeMap`] groups terminals that wires hold at the same potential,
//! and [`UndirectedGraph`] is the adjacency structure both the node grouping
//! and the wiring classifier traverse.

mod graph;
mod topology;
mod types;
mod validate;

pub use graph::UndirectedGraph;
pub use topology::NodeMap;
pub use types::*;
pub use validate::{check_terminal, check_unique_ids, validate_circuit};
