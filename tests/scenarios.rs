//! End-to-end tests for rule-tree construction.
//!
//! Tests cover the basic scenarios, precedence against a brute-force model,
//! the `.tree` round trip, and rule-table conversion.

use std::collections::HashMap;

use num_bigint::BigUint;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use ruletree::config::{Precedence, TreeConfig};
use ruletree::emulate::build_tree;
use ruletree::error::Error;
use ruletree::format::TreeFile;
use ruletree::function::build_from_fn;
use ruletree::table::RuleTable;
use ruletree::tree::RuleTree;

fn all_inputs(num_states: u32, num_params: u32) -> Vec<Vec<u32>> {
    let mut res = vec![vec![]];
    for _ in 0..num_params {
        let mut next = Vec::new();
        for prefix in &res {
            for s in 0..num_states {
                let mut v: Vec<u32> = prefix.clone();
                v.push(s);
                next.push(v);
            }
        }
        res = next;
    }
    res
}

fn life(inputs: &[u32]) -> u32 {
    let n: u32 = inputs[1..].iter().sum();
    (n == 3 || (n == 2 && inputs[0] == 1)) as u32
}

fn write_string(tree: &mut RuleTree) -> String {
    let mut out = Vec::new();
    tree.write_to(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

// ─── Basic Scenarios ───────────────────────────────────────────────────────────

#[test]
fn no_neighbors() {
    let mut tree = RuleTree::new(2, 0).unwrap();
    tree.add_rule([vec![0]], 1).unwrap();
    let text = write_string(&mut tree);

    let file: TreeFile = text.parse().unwrap();
    assert_eq!(file.eval(&[0]), 1);
    assert_eq!(file.eval(&[1]), 1);
}

#[test]
fn life_von_neumann() {
    let mut tree = RuleTree::new(2, 4).unwrap();
    for inputs in all_inputs(2, 5) {
        let sets: Vec<Vec<u32>> = inputs.iter().map(|&s| vec![s]).collect();
        tree.add_rule(sets, life(&inputs)).unwrap();
    }
    let file: TreeFile = write_string(&mut tree).parse().unwrap();
    for inputs in all_inputs(2, 5) {
        assert_eq!(file.eval(&inputs), life(&inputs), "inputs = {:?}", inputs);
    }
}

#[test]
fn life_von_neumann_changes_only() {
    // Same rule, listing only the inputs where the cell changes.
    let mut tree = RuleTree::new(2, 4).unwrap();
    for neighbors in all_inputs(2, 4) {
        for c in 0..2 {
            let mut inputs = vec![c];
            inputs.extend(&neighbors);
            let output = life(&inputs);
            if output != c {
                let sets: Vec<Vec<u32>> = inputs.iter().map(|&s| vec![s]).collect();
                tree.add_rule(sets, output).unwrap();
            }
        }
    }
    // Everything else keeps its state by default.
    let file = tree.to_tree_file();
    assert_eq!(file, build_from_fn(2, 4, life).unwrap());
}

#[test]
fn overlapping_rules_last_wins() {
    let mut tree = RuleTree::new(8, 1).unwrap();
    tree.add_rule([vec![0, 1], vec![0, 1]], 5).unwrap();
    tree.add_rule([vec![1], vec![0, 1]], 7).unwrap();
    let file = tree.to_tree_file();
    for s in 0..2 {
        assert_eq!(file.eval(&[1, s]), 7);
        assert_eq!(file.eval(&[0, s]), 5);
    }
}

#[test]
fn deterministic_output() {
    let build = || {
        let mut tree = RuleTree::new(3, 4).unwrap();
        tree.add_rule([vec![0], vec![1, 2], vec![1], vec![0, 2], vec![2]], 1).unwrap();
        tree.add_rule([vec![1], vec![0], vec![0, 1, 2], vec![2], vec![0]], 2).unwrap();
        write_string(&mut tree)
    };
    assert_eq!(build(), build());
}

#[test]
fn written_tree_round_trips() {
    let mut tree = RuleTree::new(3, 8).unwrap();
    tree.add_rule(
        [vec![0], vec![1], vec![2], vec![0, 1], vec![1], vec![2], vec![0], vec![1, 2], vec![2]],
        1,
    )
    .unwrap();
    let text = write_string(&mut tree);
    let file: TreeFile = text.parse().unwrap();
    assert_eq!(file.to_string(), text);
    assert_eq!(file, tree.to_tree_file());
    assert!(file.is_golly_compatible());
}

#[test]
fn written_tree_rejects_rules() {
    let mut tree = RuleTree::new(2, 4).unwrap();
    tree.finalize();
    assert!(matches!(
        tree.add_rule([vec![0], vec![0], vec![0], vec![0], vec![0]], 1),
        Err(Error::AlreadyWritten)
    ));
}

// ─── Precedence Against a Brute-Force Model ────────────────────────────────────

fn random_rule(rng: &mut ChaCha8Rng, num_states: u32, num_params: u32) -> (Vec<Vec<u32>>, u32) {
    let inputs = (0..num_params)
        .map(|_| {
            let mut set: Vec<u32> = (0..num_states).filter(|_| rng.random_bool(0.5)).collect();
            if set.is_empty() {
                set.push(rng.random_range(0..num_states));
            }
            set
        })
        .collect();
    (inputs, rng.random_range(0..num_states))
}

fn check_against_model(precedence: Precedence, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let num_states = rng.random_range(2..=4);
    let num_neighbors = rng.random_range(1..=4);
    let num_params = num_neighbors + 1;

    let config = TreeConfig::default()
        .with_precedence(precedence)
        .with_shrink_threshold(20);
    let mut tree = RuleTree::with_config(num_states, num_neighbors, config).unwrap();
    let mut model: HashMap<Vec<u32>, u32> = HashMap::new();

    for _ in 0..rng.random_range(1..30) {
        let (inputs, output) = random_rule(&mut rng, num_states, num_params);
        for tuple in all_inputs(num_states, num_params) {
            if tuple.iter().zip(&inputs).all(|(s, set)| set.contains(s)) {
                match precedence {
                    Precedence::LastWins => {
                        model.insert(tuple, output);
                    }
                    Precedence::FirstWins => {
                        model.entry(tuple).or_insert(output);
                    }
                }
            }
        }
        tree.add_rule(inputs, output).unwrap();
    }

    for tuple in all_inputs(num_states, num_params) {
        assert_eq!(tree.eval(&tuple), model.get(&tuple).copied(), "seed = {}", seed);
    }

    let coverage = tree.coverage();
    assert_eq!(coverage.defined(), BigUint::from(model.len()));

    let file = tree.to_tree_file();
    for tuple in all_inputs(num_states, num_params) {
        let expected = model.get(&tuple).copied().unwrap_or(tuple[0]);
        assert_eq!(file.eval(&tuple), expected, "seed = {}", seed);
    }
    assert!(file.coverage().is_total());
}

#[test]
fn random_rules_last_wins() {
    for seed in 0..20 {
        check_against_model(Precedence::LastWins, seed);
    }
}

#[test]
fn random_rules_first_wins() {
    for seed in 100..120 {
        check_against_model(Precedence::FirstWins, seed);
    }
}

#[test]
fn random_function_matches_rule_tree() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let table: Vec<u32> = (0..3u32.pow(5)).map(|_| rng.random_range(0..3)).collect();
    let index = |inputs: &[u32]| inputs.iter().rev().fold(0, |acc, &s| acc * 3 + s) as usize;

    let from_fn = build_from_fn(3, 4, |inputs| table[index(inputs)]).unwrap();

    let mut tree = RuleTree::new(3, 4).unwrap();
    for inputs in all_inputs(3, 5) {
        let sets: Vec<Vec<u32>> = inputs.iter().map(|&s| vec![s]).collect();
        tree.add_rule(sets, table[index(&inputs)]).unwrap();
    }
    assert_eq!(tree.to_tree_file(), from_fn);
}

// ─── Rule Tables ───────────────────────────────────────────────────────────────

const LIFE_TABLE: &str = "\
# Conway's Life as a rule table.
n_states:2
neighborhood:Moore
symmetries:permute
var a={0,1}
var b={0,1}
var c={0,1}
var d={0,1}
var e={0,1}
var f={0,1}
var g={0,1}
var h={0,1}
var i={0,1}
0,1,1,1,0,0,0,0,0,1
1,1,1,0,0,0,0,0,0,1
1,1,1,1,0,0,0,0,0,1
i,1,1,1,1,a,b,c,d,0
i,0,0,0,0,0,0,0,0,0
1,1,0,0,0,0,0,0,0,0
";

#[test]
fn life_table_to_tree() {
    let table: RuleTable = LIFE_TABLE.parse().unwrap();
    let mut tree = build_tree(&table).unwrap();
    let file: TreeFile = write_string(&mut tree).parse().unwrap();
    assert_eq!(file, build_from_fn(2, 8, life).unwrap());
}

#[test]
fn table_with_too_many_triangular_states() {
    let table: RuleTable = "n_states:17\nneighborhood:triangularMoore\n".parse().unwrap();
    assert!(matches!(build_tree(&table), Err(Error::Unsupported(_))));
}

#[test]
fn read_missing_file() {
    assert!(matches!(
        RuleTable::read("/nonexistent/for/sure.table"),
        Err(Error::Io(_))
    ));
    assert!(matches!(
        TreeFile::read("/nonexistent/for/sure.tree"),
        Err(Error::Io(_))
    ));
}
