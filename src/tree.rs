//! The rule-tree engine.
//!
//! A [`RuleTree`] turns a sequence of (possibly wildcarded) transition rules into
//! a hash-consed multi-way decision diagram over `num_neighbors + 1` input
//! positions, and writes it in the `.tree` format understood by Golly's
//! RuleTree algorithm.
//!
//! # Levels
//!
//! The node at depth `d` tests input position `d - 1`: the root (depth
//! `num_params`) tests the last position, and depth-1 nodes test the cell
//! itself and hold the output states as children.
//!
//! ```text
//! depth 5:  N        (von Neumann: inputs are C,S,E,W,N)
//! depth 4:  W
//! depth 3:  E
//! depth 2:  S
//! depth 1:  C  -> output states
//! ```
//!
//! # Lifecycle
//!
//! A fresh tree maps every input to the sentinel. Each [`RuleTree::add_rule`]
//! rewrites the paths covered by the rule; the old nodes stay in the store
//! until a shrink rebuilds it from the root. [`RuleTree::write`] fills the
//! remaining sentinels with "no change" defaults, shrinks, and serializes.
//! After that the tree is frozen.
//!
//! # Examples
//!
//! ```
//! use ruletree::tree::RuleTree;
//!
//! // Two states, von Neumann neighborhood: inputs are C,S,E,W,N.
//! let mut tree = RuleTree::new(2, 4).unwrap();
//! // A dead cell with a live northern neighbor becomes alive.
//! tree.add_rule([vec![0], vec![0, 1], vec![0, 1], vec![0, 1], vec![1]], 1).unwrap();
//!
//! assert_eq!(tree.eval(&[0, 0, 0, 0, 1]), Some(1));
//! assert_eq!(tree.eval(&[0, 0, 0, 0, 0]), None);
//!
//! let mut out = Vec::new();
//! tree.write_to(&mut out).unwrap();
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.starts_with("num_states=2\nnum_neighbors=4\n"));
//! ```

use std::fmt::Debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, trace};

use crate::cache::Cache;
use crate::config::{Precedence, TreeConfig};
use crate::error::{Error, Result};
use crate::format::{self, TreeFile};
use crate::node::Node;
use crate::reference::Ref;
use crate::rule::Rule;
use crate::state_set::StateSet;
use crate::store::NodeStore;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Phase {
    Building,
    Written,
}

pub struct RuleTree {
    num_states: u32,
    num_neighbors: u32,
    config: TreeConfig,
    store: NodeStore,
    root: u32,
    cache: Cache<u32, Ref>,
    shrink_threshold: usize,
    phase: Phase,
}

impl RuleTree {
    pub fn new(num_states: u32, num_neighbors: u32) -> Result<Self> {
        Self::with_config(num_states, num_neighbors, TreeConfig::default())
    }

    pub fn with_config(num_states: u32, num_neighbors: u32, config: TreeConfig) -> Result<Self> {
        if num_states == 0 {
            return Err(Error::InvalidArgument(
                "number of states must be at least 1".to_string(),
            ));
        }
        if num_states > i32::MAX as u32 {
            return Err(Error::InvalidArgument(format!(
                "number of states {} is too large",
                num_states
            )));
        }
        let num_params = num_neighbors.checked_add(1).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "number of neighbors {} is too large",
                num_neighbors
            ))
        })?;

        // Start from a chain of all-sentinel nodes, one per level.
        let mut store = NodeStore::new(num_states, num_params);
        let mut current = Ref::UNDEFINED;
        for depth in 1..=num_params {
            current = Ref::new(store.put(depth, vec![current; num_states as usize]));
        }
        let root = current.index() as u32;

        debug!(
            "new rule tree: num_states = {}, num_neighbors = {}, config = {:?}",
            num_states, num_neighbors, config
        );

        Ok(Self {
            num_states,
            num_neighbors,
            shrink_threshold: config.shrink_threshold,
            config,
            store,
            root,
            cache: Cache::new(),
            phase: Phase::Building,
        })
    }
}

impl Debug for RuleTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleTree")
            .field("num_states", &self.num_states)
            .field("num_neighbors", &self.num_neighbors)
            .field("nodes", &self.store.len())
            .field(
                "level_sizes",
                &(1..=self.num_params())
                    .map(|depth| self.store.level_size(depth))
                    .collect::<Vec<_>>(),
            )
            .field("root", &self.root)
            .field("shrink_threshold", &self.shrink_threshold)
            .field("phase", &self.phase)
            .finish()
    }
}

impl RuleTree {
    pub fn num_states(&self) -> u32 {
        self.num_states
    }
    pub fn num_neighbors(&self) -> u32 {
        self.num_neighbors
    }
    /// Number of input positions: the neighbors plus the cell itself.
    pub fn num_params(&self) -> u32 {
        self.num_neighbors + 1
    }
    /// Number of nodes in the store, including unreachable ones not yet shrunk away.
    pub fn num_nodes(&self) -> usize {
        self.store.len()
    }
    pub fn root(&self) -> u32 {
        self.root
    }
    pub fn node(&self, id: u32) -> &Node {
        self.store.node(id)
    }
    pub fn store(&self) -> &NodeStore {
        &self.store
    }
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }
    /// Node count that triggers the next automatic shrink.
    pub fn shrink_threshold(&self) -> usize {
        self.shrink_threshold
    }
    pub fn is_written(&self) -> bool {
        self.phase == Phase::Written
    }

    /// Add a rule mapping every combination of `inputs` to `output`.
    ///
    /// `inputs` holds one set of accepted states per input position, position 0
    /// being the cell itself. On inputs also covered by earlier rules, the
    /// configured [`Precedence`] decides which output is kept.
    pub fn add_rule<I>(&mut self, inputs: I, output: u32) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<[u32]>,
    {
        if self.is_written() {
            return Err(Error::AlreadyWritten);
        }
        self.add(&Rule::from_states(inputs, output, self.num_states)?)
    }

    /// Add a prepared [`Rule`]. See [`RuleTree::add_rule`].
    pub fn add(&mut self, rule: &Rule) -> Result<()> {
        if self.is_written() {
            return Err(Error::AlreadyWritten);
        }
        rule.validate(self.num_states, self.num_params())?;
        trace!("add_rule({})", rule);

        self.cache.clear();
        let root = self.insert(&rule.inputs, rule.output, Ref::new(self.root), self.num_params());
        self.root = root.index() as u32;

        if self.config.auto_shrink && self.store.len() > self.shrink_threshold {
            debug!(
                "store size {} exceeds threshold {}",
                self.store.len(),
                self.shrink_threshold
            );
            self.shrink();
        }
        Ok(())
    }

    fn insert(&mut self, inputs: &[StateSet], output: u32, node: Ref, depth: u32) -> Ref {
        if depth == 0 {
            // `node` is the leaf currently reached by this input combination.
            return match self.config.precedence {
                Precedence::LastWins => Ref::new(output),
                Precedence::FirstWins if node.is_undefined() => Ref::new(output),
                Precedence::FirstWins => node,
            };
        }

        let id = node.index() as u32;
        if let Some(res) = self.cache.get(&id) {
            return res;
        }

        let accepted = &inputs[depth as usize - 1];
        let mut children = self.store.children(id).to_vec();
        for (state, child) in children.iter_mut().enumerate() {
            if accepted.contains(state as u32) {
                *child = self.insert(inputs, output, *child, depth - 1);
            }
        }

        let res = Ref::new(self.store.put(depth, children));
        self.cache.insert(id, res);
        res
    }

    /// Replace every sentinel leaf with the cell's own state, making the tree total.
    pub fn set_defaults(&mut self) {
        if self.is_written() {
            return;
        }
        self.cache.clear();
        let root = self.fill_defaults(Ref::new(self.root), 0, self.num_params());
        self.root = root.index() as u32;
        debug!("set_defaults: store has {} nodes", self.store.len());
    }

    fn fill_defaults(&mut self, node: Ref, state: u32, depth: u32) -> Ref {
        if depth == 0 {
            // `state` is the edge taken at depth 1, i.e. the cell's own state.
            return if node.is_undefined() {
                Ref::new(state)
            } else {
                node
            };
        }

        let id = node.index() as u32;
        if let Some(res) = self.cache.get(&id) {
            return res;
        }

        let old_children = self.store.children(id).to_vec();
        let children: Vec<Ref> = old_children
            .into_iter()
            .enumerate()
            .map(|(i, child)| self.fill_defaults(child, i as u32, depth - 1))
            .collect();

        let res = Ref::new(self.store.put(depth, children));
        self.cache.insert(id, res);
        res
    }

    /// Rebuild the store from the root, dropping unreachable nodes.
    ///
    /// The next automatic shrink threshold becomes twice the new size.
    pub fn shrink(&mut self) {
        let fresh = NodeStore::new(self.num_states, self.num_params());
        let old = std::mem::replace(&mut self.store, fresh);
        self.cache.clear();
        let root = self.recreate(&old, Ref::new(self.root), self.num_params());
        self.root = root.index() as u32;
        self.shrink_threshold = self.store.len() * 2;
        debug!(
            "shrink: {} -> {} nodes (cache entries = {}, hits = {}, misses = {})",
            old.len(),
            self.store.len(),
            self.cache.len(),
            self.cache.hits(),
            self.cache.misses()
        );
    }

    fn recreate(&mut self, old: &NodeStore, node: Ref, depth: u32) -> Ref {
        if depth == 0 {
            return node;
        }

        let id = node.index() as u32;
        if let Some(res) = self.cache.get(&id) {
            return res;
        }

        let children: Vec<Ref> = old
            .children(id)
            .iter()
            .map(|&child| self.recreate(old, child, depth - 1))
            .collect();

        let res = Ref::new(self.store.put(depth, children));
        self.cache.insert(id, res);
        res
    }

    /// Fill defaults and shrink, once. Afterwards the tree accepts no more rules.
    pub fn finalize(&mut self) {
        if self.is_written() {
            return;
        }
        self.set_defaults();
        self.shrink();
        self.phase = Phase::Written;
        debug!("finalized rule tree with {} nodes", self.store.len());
    }

    /// Finalize the tree and serialize it to `writer`.
    pub fn write_to<W: Write>(&mut self, writer: W) -> Result<()> {
        self.finalize();
        format::write_tree(writer, self.num_states, self.num_neighbors, self.store.nodes())?;
        Ok(())
    }

    /// Finalize the tree and write it to the file at `path`.
    pub fn write(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.finalize();
        let path = path.as_ref();
        debug!("writing rule tree to {}", path.display());
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Finalize the tree and return its serialized form.
    pub fn to_tree_file(&mut self) -> TreeFile {
        self.finalize();
        TreeFile::new(
            self.num_states,
            self.num_neighbors,
            self.store.nodes().to_vec(),
        )
    }

    /// Look up the output for concrete `inputs`, one state per position.
    ///
    /// Returns `None` if no rule decides these inputs yet.
    pub fn eval(&self, inputs: &[u32]) -> Option<u32> {
        assert_eq!(
            inputs.len(),
            self.num_params() as usize,
            "Expected one state per input position"
        );
        let mut current = Ref::new(self.root);
        for depth in (1..=self.num_params()).rev() {
            let state = inputs[depth as usize - 1];
            assert!(state < self.num_states, "State {} is out of range", state);
            current = self.store.node(current.index() as u32).child(state);
        }
        current.state()
    }
}
