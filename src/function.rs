//! Building a tree directly from a transition function.
//!
//! When the rule is given as a total function instead of a list of wildcard
//! rules, the tree can be built in one post-order walk over all input
//! combinations, without the intermediate rewriting of [`RuleTree`][crate::tree::RuleTree].
//! The result is identical to what a `RuleTree` fed with the same mapping writes.

use log::debug;

use crate::error::{Error, Result};
use crate::format::TreeFile;
use crate::reference::Ref;
use crate::store::NodeStore;

/// Build a total rule tree by calling `f` on every input combination.
///
/// `f` receives one state per input position, position 0 being the cell itself
/// (von Neumann: `C,S,E,W,N`; Moore: `C,S,E,W,N,SE,SW,NE,NW`), and returns the
/// new state of the cell.
///
/// # Examples
///
/// ```
/// use ruletree::function::build_from_fn;
///
/// // Parity rule over the von Neumann neighborhood.
/// let tree = build_from_fn(2, 4, |inputs| inputs.iter().sum::<u32>() % 2).unwrap();
/// assert_eq!(tree.eval(&[1, 1, 0, 0, 1]), 1);
/// assert_eq!(tree.eval(&[1, 1, 0, 0, 0]), 0);
/// ```
pub fn build_from_fn<F>(num_states: u32, num_neighbors: u32, mut f: F) -> Result<TreeFile>
where
    F: FnMut(&[u32]) -> u32,
{
    if num_states == 0 || num_states > i32::MAX as u32 {
        return Err(Error::InvalidArgument(format!(
            "number of states {} is out of range",
            num_states
        )));
    }
    let num_params = num_neighbors.checked_add(1).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "number of neighbors {} is too large",
            num_neighbors
        ))
    })?;

    let mut builder = Builder {
        store: NodeStore::new(num_states, num_params),
        inputs: vec![0; num_params as usize],
        calls: 0,
    };
    builder.build(&mut f, num_params)?;

    debug!(
        "build_from_fn: {} calls, {} nodes",
        builder.calls,
        builder.store.len()
    );
    Ok(TreeFile::new(
        num_states,
        num_neighbors,
        builder.store.nodes().to_vec(),
    ))
}

struct Builder {
    store: NodeStore,
    inputs: Vec<u32>,
    calls: u64,
}

impl Builder {
    fn build<F>(&mut self, f: &mut F, depth: u32) -> Result<Ref>
    where
        F: FnMut(&[u32]) -> u32,
    {
        let num_states = self.store.num_states();
        let mut children = Vec::with_capacity(num_states as usize);
        for state in 0..num_states {
            self.inputs[depth as usize - 1] = state;
            let child = if depth == 1 {
                self.calls += 1;
                let output = f(&self.inputs);
                if output >= num_states {
                    return Err(Error::InvalidOutput {
                        state: output,
                        num_states,
                    });
                }
                Ref::new(output)
            } else {
                self.build(f, depth - 1)?
            };
            children.push(child);
        }
        Ok(Ref::new(self.store.put(depth, children)))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::tree::RuleTree;

    fn life(inputs: &[u32]) -> u32 {
        let alive = inputs[0];
        let n: u32 = inputs[1..].iter().sum();
        (n == 3 || (n == 2 && alive == 1)) as u32
    }

    #[test]
    fn test_identity() {
        let tree = build_from_fn(3, 4, |inputs| inputs[0]).unwrap();
        // One bottom node, then one node per level above it.
        assert_eq!(tree.num_nodes(), 5);
        assert_eq!(tree.nodes()[0].to_string(), "1 0 1 2");
        assert_eq!(tree.nodes()[4].to_string(), "5 3 3 3");
    }

    #[test]
    fn test_life_moore() {
        let tree = build_from_fn(2, 8, life).unwrap();
        assert!(tree.is_golly_compatible());
        for bits in 0u32..512 {
            let inputs: Vec<u32> = (0..9).map(|i| (bits >> i) & 1).collect();
            assert_eq!(tree.eval(&inputs), life(&inputs));
        }
    }

    #[test]
    fn test_inputs_in_position_order() {
        let mut seen = Vec::new();
        build_from_fn(2, 1, |inputs| {
            seen.push(inputs.to_vec());
            0
        })
        .unwrap();
        assert_eq!(seen, vec![vec![0, 0], vec![1, 0], vec![0, 1], vec![1, 1]]);
    }

    #[test]
    fn test_invalid_output() {
        let err = build_from_fn(2, 4, |_| 2).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidOutput {
                state: 2,
                num_states: 2
            }
        ));
    }

    #[test]
    fn test_same_as_rule_tree() {
        let from_fn = build_from_fn(2, 4, life).unwrap();

        let mut tree = RuleTree::new(2, 4).unwrap();
        for bits in 0u32..32 {
            let inputs: Vec<u32> = (0..5).map(|i| (bits >> i) & 1).collect();
            let sets: Vec<Vec<u32>> = inputs.iter().map(|&s| vec![s]).collect();
            tree.add_rule(sets, life(&inputs)).unwrap();
        }

        assert_eq!(tree.to_tree_file(), from_fn);
    }
}
