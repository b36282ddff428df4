//! Core types for circuit representation.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A unique identifier for an electrical node.
/// Node 0 is always the ground/reference node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The ground node (always index 0).
    pub const GROUND: NodeId = NodeId(0);

    /// Check if this is the ground node.
    pub fn is_ground(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ground() {
            write!(f, "GND")
        } else {
            write!(f, "N{}", self.0)
        }
    }
}

/// A unique identifier for a component placed on the workbench.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub usize);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named connection point on a component.
///
/// Which terminals exist is fixed per component kind, see
/// [`Component::terminals`](crate::components::Component::terminals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Terminal {
    Positive,
    Negative,
    Left,
    Right,
    A,
    B,
    /// Rheostat wiper
    C,
}

impl Terminal {
    pub fn name(&self) -> &'static str {
        match self {
            Terminal::Positive => "positive",
            Terminal::Negative => "negative",
            Terminal::Left => "left",
            Terminal::Right => "right",
            Terminal::A => "A",
            Terminal::B => "B",
            Terminal::C => "C",
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Address of one terminal: `(component, terminal)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TerminalRef {
    pub component: ComponentId,
    pub terminal: Terminal,
}

impl TerminalRef {
    pub fn new(component: ComponentId, terminal: Terminal) -> Self {
        Self {
            component,
            terminal,
        }
    }
}

impl fmt::Display for TerminalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.component, self.terminal)
    }
}

/// An ideal, resistance-free wire between two terminals.
///
/// Wires are unordered: `Wire::new(a, b) == Wire::new(b, a)`, and both hash
/// the same.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Wire {
    pub a: TerminalRef,
    pub b: TerminalRef,
}

impl Wire {
    pub fn new(a: TerminalRef, b: TerminalRef) -> Self {
        Self { a, b }
    }

    /// Endpoints in a canonical order.
    fn ordered(&self) -> (TerminalRef, TerminalRef) {
        match self.a.cmp(&self.b) {
            Ordering::Greater => (self.b, self.a),
            _ => (self.a, self.b),
        }
    }

    /// Check whether this wire touches the given terminal.
    pub fn touches(&self, terminal: TerminalRef) -> bool {
        self.a == terminal || self.b == terminal
    }

    /// Check whether this wire touches any terminal of the given component.
    pub fn touches_component(&self, id: ComponentId) -> bool {
        self.a.component == id || self.b.component == id
    }

    /// The endpoint opposite `terminal`, if the wire touches it.
    pub fn other_end(&self, terminal: TerminalRef) -> Option<TerminalRef> {
        if self.a == terminal {
            Some(self.b)
        } else if self.b == terminal {
            Some(self.a)
        } else {
            None
        }
    }
}

impl PartialEq for Wire {
    fn eq(&self, other: &Self) -> bool {
        self.ordered() == other.ordered()
    }
}

impl Eq for Wire {}

impl Hash for Wire {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordered().hash(state);
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {}", self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_wire_is_unordered() {
        let a = TerminalRef::new(ComponentId(1), Terminal::Positive);
        let b = TerminalRef::new(ComponentId(2), Terminal::Left);
        assert_eq!(Wire::new(a, b), Wire::new(b, a));

        let set: HashSet<Wire> = [Wire::new(a, b), Wire::new(b, a)].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_wire_other_end() {
        let a = TerminalRef::new(ComponentId(1), Terminal::Positive);
        let b = TerminalRef::new(ComponentId(2), Terminal::Left);
        let c = TerminalRef::new(ComponentId(3), Terminal::Right);
        let wire = Wire::new(a, b);
        assert_eq!(wire.other_end(a), Some(b));
        assert_eq!(wire.other_end(b), Some(a));
        assert_eq!(wire.other_end(c), None);
        assert!(wire.touches_component(ComponentId(2)));
        assert!(!wire.touches_component(ComponentId(3)));
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeId::GROUND.to_string(), "GND");
        assert_eq!(NodeId(3).to_string(), "N3");
        let t = TerminalRef::new(ComponentId(4), Terminal::C);
        assert_eq!(t.to_string(), "#4.C");
    }
}
