use std::fmt::{Display, Formatter};

use crate::reference::Ref;

/// One decision level of a rule tree.
///
/// A node at `depth` tests input position `depth - 1` and holds one child per
/// cell state.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Node {
    pub depth: u32,
    pub children: Box<[Ref]>,
}

impl Node {
    pub fn new(depth: u32, children: impl Into<Box<[Ref]>>) -> Self {
        Self {
            depth,
            children: children.into(),
        }
    }

    /// Whether the children of this node are leaf states.
    pub fn is_bottom(&self) -> bool {
        self.depth == 1
    }

    pub fn child(&self, state: u32) -> Ref {
        self.children[state as usize]
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.depth)?;
        for child in self.children.iter() {
            write!(f, " {}", child.get())?;
        }
        Ok(())
    }
}
