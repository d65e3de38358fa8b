//! The `.tree` text format.
//!
//! ```text
//! num_states=<N>
//! num_neighbors=<K>
//! num_nodes=<M>
//! <depth> <child_0> ... <child_{N-1}>     (one line per node, in id order)
//! ```
//!
//! Children of a depth-1 line are output states; children of deeper lines are
//! 0-based indices of earlier lines, one level down. The last line is the root
//! and has depth `K + 1`.
//!
//! Reading accepts `#` comments, blank lines, and spaces around `=`, and
//! checks the same structural rules as Golly's loader.

use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::node::Node;
use crate::reference::Ref;

/// Serialize nodes in the `.tree` format.
pub fn write_tree<W: Write>(
    mut writer: W,
    num_states: u32,
    num_neighbors: u32,
    nodes: &[Node],
) -> io::Result<()> {
    writeln!(writer, "num_states={}", num_states)?;
    writeln!(writer, "num_neighbors={}", num_neighbors)?;
    writeln!(writer, "num_nodes={}", nodes.len())?;
    for node in nodes {
        writeln!(writer, "{}", node)?;
    }
    Ok(())
}

/// A rule tree in its flat serialized form.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TreeFile {
    num_states: u32,
    num_neighbors: u32,
    nodes: Vec<Node>,
}

impl TreeFile {
    /// Wrap already-consistent nodes. The last node must be the root.
    pub fn new(num_states: u32, num_neighbors: u32, nodes: Vec<Node>) -> Self {
        Self {
            num_states,
            num_neighbors,
            nodes,
        }
    }

    /// Read and validate a `.tree` file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        text.parse()
    }

    pub fn num_states(&self) -> u32 {
        self.num_states
    }
    pub fn num_neighbors(&self) -> u32 {
        self.num_neighbors
    }
    pub fn num_params(&self) -> u32 {
        self.num_neighbors + 1
    }
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Index of the root node (the last line).
    pub fn root(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Whether Golly's RuleTree algorithm accepts this tree:
    /// 2 to 256 states, a von Neumann or Moore neighborhood, at most 10^8 nodes.
    pub fn is_golly_compatible(&self) -> bool {
        (2..=256).contains(&self.num_states)
            && (self.num_neighbors == 4 || self.num_neighbors == 8)
            && self.nodes.len() <= 100_000_000
    }

    /// Look up the output for concrete `inputs`, one state per position
    /// (position 0 is the cell itself).
    pub fn eval(&self, inputs: &[u32]) -> u32 {
        assert_eq!(
            inputs.len(),
            self.num_params() as usize,
            "Expected one state per input position"
        );
        let mut node = &self.nodes[self.root()];
        loop {
            let state = inputs[node.depth as usize - 1];
            assert!(state < self.num_states, "State {} is out of range", state);
            let child = node.child(state);
            if node.is_bottom() {
                return child.index() as u32;
            }
            node = &self.nodes[child.index()];
        }
    }

    /// Write the tree to `writer`.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        write_tree(writer, self.num_states, self.num_neighbors, &self.nodes)?;
        Ok(())
    }
}

impl Display for TreeFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "num_states={}", self.num_states)?;
        writeln!(f, "num_neighbors={}", self.num_neighbors)?;
        writeln!(f, "num_nodes={}", self.nodes.len())?;
        for node in &self.nodes {
            writeln!(f, "{}", node)?;
        }
        Ok(())
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::ParseTree {
        line,
        message: message.into(),
    }
}

fn parse_number<T: FromStr>(line: usize, token: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| parse_error(line, format!("bad number '{}'", token)))
}

impl FromStr for TreeFile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut num_states: Option<u32> = None;
        let mut num_neighbors: Option<u32> = None;
        let mut num_nodes: Option<usize> = None;
        let mut nodes: Vec<Node> = Vec::new();
        let mut last_line = 0;

        for (index, line) in s.lines().enumerate() {
            let lineno = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            last_line = lineno;

            if let Some((key, value)) = line.split_once('=') {
                let value = value.trim();
                match key.trim() {
                    "num_states" => num_states = Some(parse_number(lineno, value)?),
                    "num_neighbors" => num_neighbors = Some(parse_number(lineno, value)?),
                    "num_nodes" => num_nodes = Some(parse_number(lineno, value)?),
                    other => {
                        return Err(parse_error(lineno, format!("unknown header '{}'", other)));
                    }
                }
                continue;
            }

            let (num_states, num_neighbors) = match (num_states, num_neighbors, num_nodes) {
                (Some(s), Some(k), Some(_)) if s >= 1 && s <= i32::MAX as u32 => (s, k),
                _ => return Err(parse_error(lineno, "bad basic values")),
            };
            let num_params = num_neighbors.saturating_add(1);

            let mut tokens = line.split_whitespace();
            let depth: u32 = match tokens.next() {
                Some(token) => parse_number(lineno, token)?,
                None => return Err(parse_error(lineno, "empty node line")),
            };
            if depth < 1 || depth > num_params {
                return Err(parse_error(
                    lineno,
                    format!("depth {} is out of range 1..={}", depth, num_params),
                ));
            }

            let mut children = Vec::new();
            for token in tokens {
                let value: u32 = parse_number(lineno, token)?;
                if depth == 1 {
                    if value >= num_states {
                        return Err(parse_error(
                            lineno,
                            format!("state value {} is out of range", value),
                        ));
                    }
                } else {
                    match nodes.get(value as usize) {
                        None => {
                            return Err(parse_error(
                                lineno,
                                format!("node value {} does not refer to an earlier line", value),
                            ));
                        }
                        Some(child) if child.depth != depth - 1 => {
                            return Err(parse_error(
                                lineno,
                                format!("node {} does not point to one level down", value),
                            ));
                        }
                        Some(_) => {}
                    }
                }
                children.push(Ref::new(value));
            }
            if children.len() != num_states as usize {
                return Err(parse_error(
                    lineno,
                    format!(
                        "expected {} values on node line, got {}",
                        num_states,
                        children.len()
                    ),
                ));
            }
            nodes.push(Node::new(depth, children));
        }

        let (num_states, num_neighbors, num_nodes) = match (num_states, num_neighbors, num_nodes) {
            (Some(s), Some(k), Some(m)) if s >= 1 => (s, k, m),
            _ => return Err(parse_error(last_line, "bad basic values")),
        };
        if nodes.len() != num_nodes {
            return Err(parse_error(
                last_line,
                format!("expected {} nodes, got {}", num_nodes, nodes.len()),
            ));
        }
        match nodes.last() {
            Some(root) if root.depth == num_neighbors.saturating_add(1) => {}
            _ => return Err(parse_error(last_line, "bad last node (wrong level)")),
        }

        Ok(TreeFile {
            num_states,
            num_neighbors,
            nodes,
        })
    }
}
