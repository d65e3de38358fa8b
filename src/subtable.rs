//! Per-depth subtable for rule-tree nodes.
//!
//! The node store keeps a plain `Vec<Node>` indexed by node id, and one
//! subtable per depth for hash-based lookup:
//!
//! ```text
//! subtables[0] → Subtable for depth 1 (tests the cell itself)
//! subtables[1] → Subtable for depth 2
//! ...
//! subtables[k] → Subtable for depth k+1 (the root level is the last one)
//! ```
//!
//! Each subtable is a hash map from the children list to the node id. Since
//! all nodes in a subtable share the same depth, the depth is not part of the
//! key, and identical children lists at different depths never collide.

use std::collections::HashMap;

use crate::reference::Ref;

/// A subtable storing rule-tree nodes of a single depth.
#[derive(Debug, Clone, Default)]
pub struct Subtable {
    /// Map from children to node id in the global storage.
    nodes: HashMap<Box<[Ref]>, u32>,
}

impl Subtable {
    /// Create a new empty subtable.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Look up a node by its children.
    ///
    /// Returns the node id if a node with these children exists.
    pub fn find(&self, children: &[Ref]) -> Option<u32> {
        self.nodes.get(children).copied()
    }

    /// Insert a node into the subtable.
    pub fn insert(&mut self, children: Box<[Ref]>, id: u32) {
        self.nodes.insert(children, id);
    }

    /// Get the number of nodes in this subtable.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the subtable is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
