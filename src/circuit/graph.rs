//! Undirected adjacency graph shared by the topology builder and the
//! wiring classifier.

use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

/// An undirected graph stored as adjacency lists.
///
/// Vertices are created implicitly by [`add_edge`](Self::add_edge) or
/// explicitly by [`add_vertex`](Self::add_vertex). Parallel edges are
/// collapsed, so adding the same edge twice is a no-op.
#[derive(Debug, Clone)]
pub struct UndirectedGraph<V> {
    adjacency: HashMap<V, Vec<V>>,
}

impl<V: Copy + Eq + Hash> UndirectedGraph<V> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            adjacency: HashMap::new(),
        }
    }

    /// Add an isolated vertex (no-op if it already exists).
    pub fn add_vertex(&mut self, v: V) {
        self.adjacency.entry(v).or_default();
    }

    /// Add an undirected edge. Self-loops only register the vertex.
    pub fn add_edge(&mut self, a: V, b: V) {
        if a == b {
            self.add_vertex(a);
            return;
        }
        let from_a = self.adjacency.entry(a).or_default();
        if !from_a.contains(&b) {
            from_a.push(b);
        }
        let from_b = self.adjacency.entry(b).or_default();
        if !from_b.contains(&a) {
            from_b.push(a);
        }
    }

    /// Check whether a vertex is present.
    pub fn contains(&self, v: V) -> bool {
        self.adjacency.contains_key(&v)
    }

    /// Neighbors of a vertex (empty for unknown vertices).
    pub fn neighbors(&self, v: V) -> &[V] {
        self.adjacency.get(&v).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of edges incident to a vertex.
    pub fn degree(&self, v: V) -> usize {
        self.neighbors(v).len()
    }

    /// Breadth-first collection of every vertex reachable from `start`,
    /// `start` included. Vertices rejected by `allow` are never entered.
    pub fn reachable_from<F>(&self, start: V, allow: F) -> HashSet<V>
    where
        F: Fn(V) -> bool,
    {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);
        while let Some(v) = queue.pop_front() {
            for &nb in self.neighbors(v) {
                if allow(nb) && seen.insert(nb) {
                    queue.push_back(nb);
                }
            }
        }
        seen
    }

    /// The connected cluster containing `start`.
    pub fn component_of(&self, start: V) -> HashSet<V> {
        self.reachable_from(start, |_| true)
    }

    /// Check whether `goal` can be reached from `start` without entering
    /// any vertex rejected by `allow`.
    pub fn has_path_avoiding<F>(&self, start: V, goal: V, allow: F) -> bool
    where
        F: Fn(V) -> bool,
    {
        if start == goal {
            return true;
        }
        self.reachable_from(start, allow).contains(&goal)
    }
}

impl<V: Copy + Eq + Hash> Default for UndirectedGraph<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Copy + Eq + Hash> FromIterator<(V, V)> for UndirectedGraph<V> {
    fn from_iter<I: IntoIterator<Item = (V, V)>>(iter: I) -> Self {
        let mut graph = Self::new();
        for (a, b) in iter {
            graph.add_edge(a, b);
        }
        graph
    }
}
