//! Margolus and `square4_*` partitioning neighborhoods.
//!
//! The emulation is a two-layer Moore rule. A background layer of 0/1 bits
//! marks where each 2x2 block starts; the table states sit on top of it. Cell
//! state `s` on background `b` becomes `1 + b + 2s`, and 0 is reserved for
//! cells off the edge of the grid. Looking at the background bits around it, a
//! cell knows its position in the block and the current phase, so it can apply
//! the block transition and advance the background for the next phase.

use crate::error::Result;
use crate::table::{Neighborhood, RuleTable};
use crate::tree::RuleTree;

use super::{new_tree, output_of};

/// Background bits around a cell (C,S,E,W,N,SE,SW,NE,NW) identifying its
/// block position: top-left, top-right, bottom-left, bottom-right for phase 1,
/// then the same four for phase 2.
const BACKGROUND_INPUTS: [[u32; 9]; 8] = [
    [0, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 0, 0, 1, 1, 1, 1, 1],
    [1, 0, 1, 1, 0, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 0, 0, 0, 0],
    [1, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 1, 1, 0, 0, 0, 0, 0],
    [0, 1, 0, 0, 1, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 1, 1, 1, 1],
];

/// For each block position, which block entry sits at each neighbor slot
/// (C,S,E,W,N,SE,SW,NE,NW), or `None` if the slot is outside the block.
const FOREGROUND_INPUTS: [[Option<usize>; 9]; 4] = [
    [Some(0), Some(2), Some(1), None, None, Some(3), None, None, None],
    [Some(1), Some(3), None, Some(0), None, None, Some(2), None, None],
    [Some(2), None, Some(3), None, Some(0), None, None, Some(1), None],
    [Some(3), None, None, Some(2), Some(1), None, None, None, Some(0)],
];

/// New background bit for each block position: one phase for Margolus, two
/// alternating phases for the `square4_*` variants.
fn background_outputs(neighborhood: Neighborhood) -> &'static [u32] {
    match neighborhood {
        Neighborhood::Square4Figure8v => &[0, 0, 0, 1, 1, 0, 1, 1],
        Neighborhood::Square4Figure8h => &[0, 0, 0, 1, 1, 1, 0, 1],
        Neighborhood::Square4Cyclic => &[0, 0, 1, 0, 1, 0, 1, 1],
        _ => &[1, 1, 1, 0],
    }
}

fn encode(states: &[u32], background: u32) -> Vec<u32> {
    states.iter().map(|s| 1 + background + 2 * s).collect()
}

/// Any table state on the given background, or off-grid.
fn wildcard(num_states: u32, background: u32) -> Vec<u32> {
    let all: Vec<u32> = (0..num_states).collect();
    let mut res = encode(&all, background);
    res.push(0);
    res
}

pub(super) fn emulate(table: &RuleTable) -> Result<RuleTree> {
    let n = table.num_states;
    let mut tree = new_tree(1 + 2 * n, 8)?;
    let outputs = background_outputs(table.neighborhood);

    for t in &table.transitions {
        for (i, &background_output) in outputs.iter().enumerate() {
            let background = &BACKGROUND_INPUTS[i];
            let entry = i % 4;
            let inputs: Vec<Vec<u32>> = FOREGROUND_INPUTS[entry]
                .iter()
                .zip(background)
                .map(|(slot, &b)| match slot {
                    Some(k) => encode(&t[*k], b),
                    None => wildcard(n, b),
                })
                .collect();
            let output = 1 + background_output + 2 * output_of(&t[entry + 4])?;
            tree.add_rule(inputs, output)?;
        }
    }

    // The background advances even where no transition applies.
    for state in 0..n {
        for (i, &background_output) in outputs.iter().enumerate() {
            let background = &BACKGROUND_INPUTS[i];
            let mut inputs = vec![encode(&[state], background[0])];
            inputs.extend(background[1..].iter().map(|&b| wildcard(n, b)));
            tree.add_rule(inputs, 1 + background_output + 2 * state)?;
        }
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::super::build_tree;
    use super::*;

    fn build(text: &str) -> RuleTree {
        let table: RuleTable = text.parse().unwrap();
        let mut tree = build_tree(&table).unwrap();
        tree.finalize();
        tree
    }

    const MOVE_DIAGONALLY: &str = "\
n_states:2
neighborhood:Margolus
symmetries:none
1,0,0,0,0,0,0,1
";

    #[test]
    fn test_states() {
        let tree = build(MOVE_DIAGONALLY);
        assert_eq!(tree.num_states(), 5);
        assert_eq!(tree.num_neighbors(), 8);
    }

    #[test]
    fn test_block_transition() {
        let tree = build(MOVE_DIAGONALLY);
        // Top-left cell, live (1 on background 0 is 3), block otherwise empty:
        // it dies and its background turns to 1.
        assert_eq!(tree.eval(&[3, 2, 2, 0, 0, 2, 0, 0, 0]), Some(2));
        // Bottom-right cell of the same block becomes live on background 0.
        assert_eq!(tree.eval(&[2, 0, 0, 2, 2, 0, 0, 0, 3]), Some(3));
    }

    #[test]
    fn test_background_advances() {
        let tree = build(MOVE_DIAGONALLY);
        // Dead top-left cell with no matching transition still flips its background.
        assert_eq!(tree.eval(&[1, 2, 2, 2, 2, 2, 2, 2, 2]), Some(2));
        // Bottom-right keeps background 0.
        assert_eq!(tree.eval(&[2, 2, 2, 2, 2, 1, 1, 1, 1]), Some(1));
    }

    #[test]
    fn test_square4_has_two_phases() {
        let tree = build(
            "n_states:2\nneighborhood:square4_cyclic\nsymmetries:none\n1,0,0,0,0,0,0,1\n",
        );
        // Top-left in phase 2 (background 1 surrounded by 0): a dead cell keeps background 1.
        assert_eq!(tree.eval(&[2, 1, 1, 1, 1, 1, 1, 1, 1]), Some(2));
    }
}
