use std::collections::HashMap;

use num_bigint::BigUint;

use crate::format::TreeFile;
use crate::node::Node;
use crate::tree::RuleTree;

/// How many input combinations map to each output.
///
/// The counts always add up to `num_states ^ num_params`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Coverage {
    /// `per_state[s]` is the number of input combinations producing state `s`.
    pub per_state: Vec<BigUint>,
    /// Number of input combinations that no rule decides yet.
    pub undefined: BigUint,
}

impl Coverage {
    /// Number of input combinations that some rule decides.
    pub fn defined(&self) -> BigUint {
        self.per_state.iter().sum()
    }

    pub fn total(&self) -> BigUint {
        self.defined() + &self.undefined
    }

    pub fn is_total(&self) -> bool {
        self.undefined == BigUint::ZERO
    }
}

impl RuleTree {
    /// Count the input combinations reaching each output state.
    pub fn coverage(&self) -> Coverage {
        coverage(self.store().nodes(), self.root() as usize, self.num_states())
    }
}

impl TreeFile {
    /// Count the input combinations reaching each output state.
    pub fn coverage(&self) -> Coverage {
        coverage(self.nodes(), self.root(), self.num_states())
    }
}

fn coverage(nodes: &[Node], root: usize, num_states: u32) -> Coverage {
    let mut cache = HashMap::new();
    let mut counts = _coverage(nodes, root, num_states as usize, &mut cache);
    let undefined = counts.pop().unwrap_or_default();
    Coverage {
        per_state: counts,
        undefined,
    }
}

/// Returns `num_states + 1` counts: one per output state, then the sentinel.
fn _coverage(
    nodes: &[Node],
    id: usize,
    num_states: usize,
    cache: &mut HashMap<usize, Vec<BigUint>>,
) -> Vec<BigUint> {
    if let Some(counts) = cache.get(&id) {
        return counts.clone();
    }

    let node = &nodes[id];
    let mut counts = vec![BigUint::ZERO; num_states + 1];
    for &child in node.children.iter() {
        if node.is_bottom() {
            let slot = child.state().map_or(num_states, |s| s as usize);
            counts[slot] += 1u32;
        } else {
            let sub = _coverage(nodes, child.index(), num_states, cache);
            for (total, c) in counts.iter_mut().zip(sub) {
                *total += c;
            }
        }
    }

    cache.insert(id, counts.clone());
    counts
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_fresh_tree_is_undefined() {
        let tree = RuleTree::new(3, 4).unwrap();
        let coverage = tree.coverage();
        assert_eq!(coverage.per_state, vec![BigUint::ZERO; 3]);
        assert_eq!(coverage.undefined, BigUint::from(243u32));
        assert!(!coverage.is_total());
    }

    #[test]
    fn test_counts_rules() {
        let mut tree = RuleTree::new(2, 4).unwrap();
        // 1 * 2 * 2 * 2 * 1 = 8 combinations.
        tree.add_rule([vec![0], vec![0, 1], vec![0, 1], vec![0, 1], vec![1]], 1).unwrap();
        // 1 * 1 * 1 * 1 * 2 = 2 combinations.
        tree.add_rule([vec![1], vec![1], vec![1], vec![1], vec![0, 1]], 0).unwrap();

        let coverage = tree.coverage();
        assert_eq!(coverage.per_state[0], BigUint::from(2u32));
        assert_eq!(coverage.per_state[1], BigUint::from(8u32));
        assert_eq!(coverage.defined(), BigUint::from(10u32));
        assert_eq!(coverage.undefined, BigUint::from(22u32));
        assert_eq!(coverage.total(), BigUint::from(32u32));
    }

    #[test]
    fn test_written_tree_is_total() {
        let mut tree = RuleTree::new(3, 8).unwrap();
        tree.add_rule(
            [vec![0], vec![1], vec![2], vec![0], vec![1], vec![2], vec![0], vec![1], vec![2]],
            1,
        )
        .unwrap();
        let file = tree.to_tree_file();
        let coverage = file.coverage();
        assert!(coverage.is_total());
        assert_eq!(coverage.total(), BigUint::from(3u32).pow(9));
        // Only the single rule moves a 0-cell to state 1; everything else keeps its state.
        let third = BigUint::from(3u32).pow(8);
        assert_eq!(coverage.per_state[0], &third - 1u32);
        assert_eq!(coverage.per_state[1], &third + 1u32);
        assert_eq!(coverage.per_state[2], third);
    }
}
