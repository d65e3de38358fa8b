//! Converting rule tables into rule trees.
//!
//! Golly's RuleTree algorithm only knows the von Neumann and Moore
//! neighborhoods. Tables written for those are remapped directly; every other
//! neighborhood is emulated on top of one of them, sometimes with extra states
//! encoding where a cell sits in the emulated grid.
//!
//! All converters feed the expanded transitions in table order and keep the
//! first matching transition on overlaps, as Golly's table algorithm does.

use log::debug;

use crate::config::{Precedence, TreeConfig};
use crate::error::{Error, Result};
use crate::table::{Neighborhood, RuleTable};
use crate::tree::RuleTree;

mod margolus;
mod triangular;

/// Build the (unwritten) rule tree for a rule table.
pub fn build_tree(table: &RuleTable) -> Result<RuleTree> {
    debug!(
        "building rule tree for {} table with {} states and {} transitions",
        table.neighborhood,
        table.num_states,
        table.transitions.len()
    );
    let tree = match table.neighborhood {
        Neighborhood::VonNeumann | Neighborhood::Moore => native(table)?,
        Neighborhood::OneDimensional => one_dimensional(table)?,
        Neighborhood::Hexagonal => hexagonal(table)?,
        Neighborhood::Margolus
        | Neighborhood::Square4Figure8v
        | Neighborhood::Square4Figure8h
        | Neighborhood::Square4Cyclic => margolus::emulate(table)?,
        Neighborhood::TriangularVonNeumann | Neighborhood::TriangularMoore => {
            triangular::emulate(table)?
        }
    };
    debug!("rule tree has {} states and {} nodes", tree.num_states(), tree.num_nodes());
    Ok(tree)
}

/// Name of the rule produced from the table file `stem`.
///
/// Triangular emulations change the meaning of the states, so they get an
/// `_emulated` suffix to avoid picking up the original rule's colors and icons.
pub fn tree_name(stem: &str, neighborhood: Neighborhood) -> String {
    match neighborhood {
        Neighborhood::TriangularVonNeumann | Neighborhood::TriangularMoore => {
            format!("{}_emulated", stem)
        }
        _ => stem.to_string(),
    }
}

pub(crate) fn new_tree(num_states: u32, num_neighbors: u32) -> Result<RuleTree> {
    let config = TreeConfig::default().with_precedence(Precedence::FirstWins);
    RuleTree::with_config(num_states, num_neighbors, config)
}

pub(crate) fn any_state(num_states: u32) -> Vec<u32> {
    (0..num_states).collect()
}

pub(crate) fn output_of(table_output: &[u32]) -> Result<u32> {
    table_output
        .first()
        .copied()
        .ok_or_else(|| Error::InvalidRule("transition has an empty output".to_string()))
}

fn native(table: &RuleTable) -> Result<RuleTree> {
    // Table order is C,N,E,S,W (Moore: C,N,NE,E,SE,S,SW,W,NW); tree order is C,S,E,W,N,SE,SW,NE,NW.
    let remap: &[usize] = match table.neighborhood {
        Neighborhood::VonNeumann => &[0, 3, 2, 4, 1],
        _ => &[0, 5, 3, 7, 1, 4, 6, 2, 8],
    };
    let mut tree = new_tree(table.num_states, remap.len() as u32 - 1)?;
    for t in &table.transitions {
        let inputs: Vec<Vec<u32>> = remap.iter().map(|&j| t[j].clone()).collect();
        tree.add_rule(inputs, output_of(&t[t.len() - 1])?)?;
    }
    Ok(tree)
}

fn one_dimensional(table: &RuleTable) -> Result<RuleTree> {
    let mut tree = new_tree(table.num_states, 4)?;
    let any = any_state(table.num_states);
    for t in &table.transitions {
        // Table order is C,W,E; the row lives on the east-west axis.
        let inputs = vec![t[0].clone(), any.clone(), t[2].clone(), t[1].clone(), any.clone()];
        tree.add_rule(inputs, output_of(&t[3])?)?;
    }
    Ok(tree)
}

fn hexagonal(table: &RuleTable) -> Result<RuleTree> {
    let mut tree = new_tree(table.num_states, 8)?;
    let any = any_state(table.num_states);
    for t in &table.transitions {
        // Table order is C,N,NE,E,S,SW,W. On Golly's skewed square grid the
        // SE and NW corners are not hexagonal neighbors.
        let inputs = vec![
            t[0].clone(),
            t[4].clone(),
            t[3].clone(),
            t[6].clone(),
            t[1].clone(),
            any.clone(),
            t[5].clone(),
            t[2].clone(),
            any.clone(),
        ];
        tree.add_rule(inputs, output_of(&t[7])?)?;
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn build(text: &str) -> RuleTree {
        let table: RuleTable = text.parse().unwrap();
        let mut tree = build_tree(&table).unwrap();
        tree.finalize();
        tree
    }

    #[test]
    fn test_tree_name() {
        assert_eq!(tree_name("Langtons-Ant", Neighborhood::VonNeumann), "Langtons-Ant");
        assert_eq!(
            tree_name("TriLife", Neighborhood::TriangularMoore),
            "TriLife_emulated"
        );
    }

    #[test]
    fn test_native_von_neumann_remap() {
        // A dead cell with a live northern neighbor (table order C,N,E,S,W) is born.
        let tree = build("n_states:2\nneighborhood:vonNeumann\nsymmetries:none\n0,1,0,0,0,1\n");
        assert_eq!(tree.num_neighbors(), 4);
        // Tree order is C,S,E,W,N.
        assert_eq!(tree.eval(&[0, 0, 0, 0, 1]), Some(1));
        assert_eq!(tree.eval(&[0, 1, 0, 0, 0]), Some(0));
    }

    #[test]
    fn test_native_moore_remap() {
        // Live NE neighbor only (table order C,N,NE,E,SE,S,SW,W,NW).
        let tree = build("n_states:2\nneighborhood:Moore\n0,0,1,0,0,0,0,0,0,1\n");
        assert_eq!(tree.num_neighbors(), 8);
        // Tree order is C,S,E,W,N,SE,SW,NE,NW.
        assert_eq!(tree.eval(&[0, 0, 0, 0, 0, 0, 0, 1, 0]), Some(1));
        assert_eq!(tree.eval(&[0, 0, 0, 0, 0, 1, 0, 0, 0]), Some(0));
    }

    #[test]
    fn test_first_transition_wins() {
        let tree = build(
            "n_states:3\n\
             neighborhood:vonNeumann\n\
             var a={0,1}\n\
             0,1,a,a,a,2\n\
             0,1,0,0,0,1\n",
        );
        assert_eq!(tree.eval(&[0, 0, 0, 0, 1]), Some(2));
    }

    #[test]
    fn test_one_dimensional() {
        // Rule 90 style: the new state is W xor E (table order C,W,E,C').
        let tree = build(
            "n_states:2\n\
             neighborhood:oneDimensional\n\
             var a={0,1}\n\
             a,0,1,1\n\
             a,1,0,1\n\
             a,0,0,0\n\
             a,1,1,0\n",
        );
        for c in 0..2 {
            for w in 0..2 {
                for e in 0..2 {
                    for n in 0..2 {
                        for s in 0..2 {
                            // Tree order is C,S,E,W,N.
                            assert_eq!(tree.eval(&[c, s, e, w, n]), Some(w ^ e));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_hexagonal() {
        // Birth on a single live neighbor in hexagonal slot 2 (table order C,N,NE,E,S,SW,W,C').
        let tree = build("n_states:2\nneighborhood:hexagonal\n0,0,1,0,0,0,0,1\n");
        // Slot 2 becomes NE; SE and NW are ignored.
        assert_eq!(tree.eval(&[0, 0, 0, 0, 0, 0, 0, 1, 0]), Some(1));
        assert_eq!(tree.eval(&[0, 0, 0, 0, 0, 1, 0, 1, 1]), Some(1));
        assert_eq!(tree.eval(&[0, 0, 0, 0, 0, 0, 1, 1, 0]), Some(0));
    }

    #[test]
    fn test_zero_states_rejected() {
        let table: RuleTable = "n_states:0\nneighborhood:vonNeumann\n".parse().unwrap();
        assert!(matches!(build_tree(&table), Err(Error::InvalidArgument(_))));
    }
}
