//! # ruletree-rs: Rule Trees for Cellular Automata
//!
//! **`ruletree-rs`** builds the compact decision diagrams that Golly's *RuleTree* algorithm uses to
//! run arbitrary cellular automata, and writes them in the `.tree` text format.
//!
//! ## What is a rule tree?
//!
//! A rule tree is a multi-way decision diagram over the states of a cell and its neighbors.
//! Each level tests one input position and branches on its state; the bottom level yields the new
//! state of the cell. Identical subtrees are stored once (hash consing), so a rule over millions of
//! neighborhood combinations usually fits in a few hundred nodes.
//!
//! ## Key Features
//!
//! - **Wildcard rules**: [`RuleTree::add_rule`][crate::tree::RuleTree::add_rule] takes a *set* of accepted states per input position,
//!   rewriting only the paths it covers.
//! - **Configurable precedence**: later rules override earlier ones by default; first-wins matches Golly's `.table` semantics.
//! - **Total output**: inputs no rule decides keep the cell's own state.
//! - **Canonical form**: the written tree is fully shared and deterministic for a given rule sequence.
//! - **Rule tables**: parse Golly `.table` files and emulate non-native neighborhoods (hexagonal, triangular, Margolus, ...).
//!
//! ## Basic Usage
//!
//! ```rust
//! use ruletree::tree::RuleTree;
//!
//! // Conway's Life over the Moore neighborhood: inputs are C,S,E,W,N,SE,SW,NE,NW.
//! let mut tree = RuleTree::new(2, 8).unwrap();
//! for bits in 0u32..512 {
//!     let inputs: Vec<u32> = (0..9).map(|i| (bits >> i) & 1).collect();
//!     let n: u32 = inputs[1..].iter().sum();
//!     let next = (n == 3 || (n == 2 && inputs[0] == 1)) as u32;
//!     let sets: Vec<Vec<u32>> = inputs.iter().map(|&s| vec![s]).collect();
//!     tree.add_rule(sets, next).unwrap();
//! }
//!
//! let file = tree.to_tree_file();
//! assert!(file.is_golly_compatible());
//! assert_eq!(file.eval(&[0, 1, 1, 1, 0, 0, 0, 0, 0]), 1);
//! ```
//!
//! ## Core Components
//!
//! - **[`tree`]**: The [`RuleTree`][crate::tree::RuleTree] engine: rule insertion, defaults, shrinking, writing.
//! - **[`store`]**: Hash-consed node storage.
//! - **[`format`]**: The `.tree` format, reading and writing.
//! - **[`function`]**: Building a tree straight from a transition function.
//! - **[`table`]** and **[`emulate`]**: Golly rule tables and their conversion to trees.

pub mod cache;
pub mod config;
pub mod count;
pub mod emulate;
pub mod error;
pub mod format;
pub mod function;
pub mod node;
pub mod reference;
pub mod rule;
pub mod state_set;
pub mod store;
pub mod subtable;
pub mod table;
pub mod tree;
