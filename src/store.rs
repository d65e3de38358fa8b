//! Hash-consed node storage.
//!
//! [`NodeStore`] hands out sequential node ids starting at 0 and guarantees that
//! no two ids ever hold equal `(depth, children)` pairs. Ids are never reused:
//! the store only grows, and a rule tree shrinks by building a fresh store and
//! dropping the old one.

use std::ops::Index;

use crate::node::Node;
use crate::reference::Ref;
use crate::subtable::Subtable;

#[derive(Debug, Clone)]
pub struct NodeStore {
    num_states: u32,
    nodes: Vec<Node>,
    subtables: Vec<Subtable>,
}

impl NodeStore {
    /// Create an empty store for nodes with `num_states` children each, up to `max_depth`.
    pub fn new(num_states: u32, max_depth: u32) -> Self {
        Self {
            num_states,
            nodes: Vec::new(),
            subtables: (1..=max_depth).map(|_| Subtable::new()).collect(),
        }
    }

    pub fn num_states(&self) -> u32 {
        self.num_states
    }
    pub fn max_depth(&self) -> u32 {
        self.subtables.len() as u32
    }

    /// Number of stored nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: u32) -> &Node {
        &self.nodes[id as usize]
    }

    pub fn depth(&self, id: u32) -> u32 {
        self.node(id).depth
    }

    pub fn children(&self, id: u32) -> &[Ref] {
        &self.node(id).children
    }

    /// Get the id of the node with the given depth and children, creating it if necessary.
    pub fn put(&mut self, depth: u32, children: Vec<Ref>) -> u32 {
        assert!(
            depth >= 1 && depth <= self.max_depth(),
            "Depth {} is out of range 1..={}",
            depth,
            self.max_depth()
        );
        assert_eq!(
            children.len(),
            self.num_states as usize,
            "Node must have exactly one child per state"
        );

        let subtable = &mut self.subtables[depth as usize - 1];
        if let Some(id) = subtable.find(&children) {
            return id;
        }

        let id = self.nodes.len() as u32;
        let children: Box<[Ref]> = children.into();
        subtable.insert(children.clone(), id);
        self.nodes.push(Node { depth, children });
        id
    }

    /// Iterate over all nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    /// All nodes, indexed by id.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of nodes stored at the given depth.
    pub fn level_size(&self, depth: u32) -> usize {
        self.subtables[depth as usize - 1].len()
    }
}

impl Index<u32> for NodeStore {
    type Output = Node;

    fn index(&self, id: u32) -> &Self::Output {
        self.node(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_assigns_sequential_ids() {
        let mut store = NodeStore::new(2, 2);
        assert!(store.is_empty());
        let a = store.put(1, vec![Ref::new(0), Ref::new(1)]);
        let b = store.put(1, vec![Ref::new(1), Ref::new(1)]);
        let c = store.put(2, vec![Ref::new(a), Ref::new(b)]);
        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(store.len(), 3);
        assert_eq!(store[c].children.as_ref(), &[Ref::new(0), Ref::new(1)]);
    }

    #[test]
    fn test_put_deduplicates() {
        let mut store = NodeStore::new(2, 1);
        let a = store.put(1, vec![Ref::new(0), Ref::UNDEFINED]);
        let b = store.put(1, vec![Ref::new(0), Ref::UNDEFINED]);
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_same_children_different_depth() {
        let mut store = NodeStore::new(2, 2);
        let a = store.put(1, vec![Ref::new(0), Ref::new(0)]);
        let b = store.put(2, vec![Ref::new(0), Ref::new(0)]);
        assert_ne!(a, b);
        assert_eq!(store.depth(a), 1);
        assert_eq!(store.depth(b), 2);
        assert_eq!(store.level_size(1), 1);
        assert_eq!(store.level_size(2), 1);
    }

    #[test]
    fn test_iter_in_id_order() {
        let mut store = NodeStore::new(3, 1);
        store.put(1, vec![Ref::new(2), Ref::new(1), Ref::new(0)]);
        store.put(1, vec![Ref::new(0), Ref::new(1), Ref::new(2)]);
        let lines: Vec<String> = store.iter().map(|n| n.to_string()).collect();
        assert_eq!(lines, vec!["1 2 1 0", "1 0 1 2"]);
    }

    #[test]
    #[should_panic(expected = "Node must have exactly one child per state")]
    fn test_put_wrong_arity() {
        let mut store = NodeStore::new(3, 1);
        store.put(1, vec![Ref::new(0)]);
    }
}
