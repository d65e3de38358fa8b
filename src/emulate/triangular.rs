//! Triangular neighborhoods.
//!
//! Two layouts are supported:
//!
//! - *Splitting*: every square holds a lower and an upper triangle, and the
//!   emulated state is `upper * n + lower`. Needs `n * n` states, so it is
//!   used when `n <= 16`. Works for both triangular neighborhoods.
//! - *Checkerboard*: every square holds one triangle, pointing up or down by
//!   checkerboard parity. Needs `2n - 1` states (state 0 is shared), so it is
//!   used for `triangularVonNeumann` with up to 128 states.
//!
//! Table entries for `triangularVonNeumann` are C,1,2,3,C' and for
//! `triangularMoore` C,1..12,C'.

use log::debug;

use crate::error::{Error, Result};
use crate::state_set::StateSet;
use crate::table::{Neighborhood, RuleTable};
use crate::tree::RuleTree;

use super::{new_tree, output_of};

pub(super) fn emulate(table: &RuleTable) -> Result<RuleTree> {
    let n = table.num_states;
    if n <= 16 {
        debug!("emulating {} with {} states by splitting", table.neighborhood, n * n);
        Splitting::new(table).build()
    } else if table.neighborhood == Neighborhood::TriangularVonNeumann && n <= 128 {
        debug!(
            "emulating {} with {} states on a checkerboard",
            table.neighborhood,
            2 * n - 1
        );
        checkerboard(table)
    } else {
        Err(Error::Unsupported(format!(
            "{} with {} states (only triangularMoore with 16 states or fewer, \
             and triangularVonNeumann with 128 states or fewer)",
            table.neighborhood, n
        )))
    }
}

struct Splitting<'a> {
    table: &'a RuleTable,
    n: u32,
    /// Transitions as input sets; outputs are taken from the table.
    sets: Vec<Vec<StateSet>>,
}

impl<'a> Splitting<'a> {
    fn new(table: &'a RuleTable) -> Self {
        let sets = table
            .transitions
            .iter()
            .map(|t| t.iter().map(StateSet::from).collect())
            .collect();
        Self {
            table,
            n: table.num_states,
            sets,
        }
    }

    /// Squares whose lower triangle is in `lower` and upper triangle in `upper`.
    fn encode(&self, lower: &StateSet, upper: &StateSet) -> Vec<u32> {
        let mut res = Vec::with_capacity(lower.len() * upper.len());
        for up in upper {
            for low in lower {
                res.push(up * self.n + low);
            }
        }
        res
    }

    fn any(&self) -> StateSet {
        StateSet::all(self.n)
    }

    fn everything(&self) -> Vec<u32> {
        (0..self.n * self.n).collect()
    }

    fn output(&self, lower: &[u32], upper: &[u32]) -> Result<u32> {
        Ok(output_of(upper)? * self.n + output_of(lower)?)
    }

    fn build(&self) -> Result<RuleTree> {
        let moore = self.table.neighborhood == Neighborhood::TriangularMoore;
        let mut tree = new_tree(self.n * self.n, if moore { 8 } else { 4 })?;
        // Entries of the lower triangle's transition that overlap entries of the upper's.
        let overlaps: &[(usize, usize)] = if moore {
            &[(0, 1), (1, 0), (2, 12), (3, 4), (4, 3), (5, 10), (6, 11), (10, 5), (11, 6), (12, 2)]
        } else {
            &[(0, 1), (1, 0)]
        };

        // Apply two transitions at once, one per triangle, where they agree.
        for (i, t1) in self.sets.iter().enumerate() {
            for (j, t2) in self.sets.iter().enumerate() {
                if overlaps.iter().any(|&(a, b)| t1[a].is_disjoint(&t2[b])) {
                    continue;
                }
                let inputs = if moore {
                    vec![
                        self.encode(&(&t1[0] & &t2[1]), &(&t1[1] & &t2[0])),
                        self.encode(&t1[7], &(&t1[2] & &t2[12])),
                        self.encode(&(&t1[4] & &t2[3]), &t2[9]),
                        self.encode(&t1[9], &(&t1[3] & &t2[4])),
                        self.encode(&(&t1[12] & &t2[2]), &t2[7]),
                        self.encode(&(&t1[6] & &t2[11]), &(&t1[5] & &t2[10])),
                        self.encode(&self.any(), &t1[8]),
                        self.encode(&t2[8], &self.any()),
                        self.encode(&(&t1[10] & &t2[5]), &(&t1[11] & &t2[6])),
                    ]
                } else {
                    vec![
                        self.encode(&(&t1[0] & &t2[1]), &(&t1[1] & &t2[0])),
                        self.encode(&self.any(), &t1[2]),
                        self.encode(&t2[3], &self.any()),
                        self.encode(&self.any(), &t1[3]),
                        self.encode(&t2[2], &self.any()),
                    ]
                };
                let last = t1.len() - 1;
                let lower_out = &self.table.transitions[i][last];
                let upper_out = &self.table.transitions[j][last];
                tree.add_rule(inputs, self.output(lower_out, upper_out)?)?;
            }
        }

        // Apply each transition to one triangle, leaving the other unchanged.
        for (i, t) in self.sets.iter().enumerate() {
            let last = t.len() - 1;
            let out = &self.table.transitions[i][last];
            for other in &t[1] {
                let other_set = StateSet::single(other);
                if moore {
                    // As lower triangle.
                    tree.add_rule(
                        vec![
                            self.encode(&t[0], &other_set),
                            self.encode(&t[7], &t[2]),
                            self.encode(&t[4], &self.any()),
                            self.encode(&t[9], &t[3]),
                            self.encode(&t[12], &self.any()),
                            self.encode(&t[6], &t[5]),
                            self.encode(&self.any(), &t[8]),
                            self.everything(),
                            self.encode(&t[10], &t[11]),
                        ],
                        self.output(out, &[other])?,
                    )?;
                    // As upper triangle.
                    tree.add_rule(
                        vec![
                            self.encode(&other_set, &t[0]),
                            self.encode(&self.any(), &t[12]),
                            self.encode(&t[3], &t[9]),
                            self.encode(&self.any(), &t[4]),
                            self.encode(&t[2], &t[7]),
                            self.encode(&t[11], &t[10]),
                            self.everything(),
                            self.encode(&t[8], &self.any()),
                            self.encode(&t[5], &t[6]),
                        ],
                        self.output(&[other], out)?,
                    )?;
                } else {
                    tree.add_rule(
                        vec![
                            self.encode(&t[0], &other_set),
                            self.encode(&self.any(), &t[2]),
                            self.everything(),
                            self.encode(&self.any(), &t[3]),
                            self.everything(),
                        ],
                        self.output(out, &[other])?,
                    )?;
                    tree.add_rule(
                        vec![
                            self.encode(&other_set, &t[0]),
                            self.everything(),
                            self.encode(&t[3], &self.any()),
                            self.everything(),
                            self.encode(&t[2], &self.any()),
                        ],
                        self.output(&[other], out)?,
                    )?;
                }
            }
        }

        Ok(tree)
    }
}

fn checkerboard(table: &RuleTable) -> Result<RuleTree> {
    let n = table.num_states;
    let total = 2 * n - 1;
    if total > 256 {
        return Err(Error::Unsupported(format!(
            "checkerboard emulation needs {} states, more than 256",
            total
        )));
    }

    // Lower triangles keep their state; upper triangles move to n..2n-1, sharing 0.
    let lower = |s: &[u32]| s.to_vec();
    let upper = |s: &[u32]| -> Vec<u32> {
        s.iter()
            .map(|&x| if x == 0 { 0 } else { n + x - 1 })
            .collect()
    };
    let any: Vec<u32> = (0..total).collect();

    let mut tree = new_tree(total, 4)?;
    for t in &table.transitions {
        tree.add_rule(
            vec![lower(&t[0]), upper(&t[2]), upper(&t[1]), upper(&t[3]), any.clone()],
            output_of(&lower(&t[4]))?,
        )?;
        tree.add_rule(
            vec![upper(&t[0]), any.clone(), lower(&t[3]), lower(&t[1]), lower(&t[2])],
            output_of(&upper(&t[4]))?,
        )?;
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::super::build_tree;
    use super::*;

    fn table(text: &str) -> RuleTable {
        text.parse().unwrap()
    }

    #[test]
    fn test_splitting_states() {
        let t = table("n_states:3\nneighborhood:triangularVonNeumann\n0,1,0,0,1\n");
        let tree = build_tree(&t).unwrap();
        assert_eq!(tree.num_states(), 9);
        assert_eq!(tree.num_neighbors(), 4);

        let t = table("n_states:2\nneighborhood:triangularMoore\n0,1,0,0,0,0,0,0,0,0,0,0,0,1\n");
        let tree = build_tree(&t).unwrap();
        assert_eq!(tree.num_states(), 4);
        assert_eq!(tree.num_neighbors(), 8);
    }

    #[test]
    fn test_splitting_single_triangle() {
        // A dead triangle whose first neighbor (the other half of its square) is live is born.
        let t = table("n_states:2\nneighborhood:triangularVonNeumann\n0,1,0,0,1\n");
        let mut tree = build_tree(&t).unwrap();
        tree.finalize();
        // Square state is upper * 2 + lower. Lower dead, upper live: square 2.
        // The lower triangle's other neighbors are the upper halves of S and W.
        // Lower becomes live, upper unchanged: square 3.
        assert_eq!(tree.eval(&[2, 0, 0, 0, 0]), Some(3));
        // With a live upper half to the south, the lower triangle's rule does not apply.
        assert_eq!(tree.eval(&[2, 2, 0, 0, 0]), Some(2));
    }

    #[test]
    fn test_checkerboard_for_large_von_neumann() {
        let t = table("n_states:20\nneighborhood:triangularVonNeumann\n0,1,0,0,5\n");
        let mut tree = build_tree(&t).unwrap();
        assert_eq!(tree.num_states(), 39);
        tree.finalize();
        // Lower triangle: C,S,E,W,N = lower(C), upper(t2), upper(t1), upper(t3), any.
        assert_eq!(tree.eval(&[0, 0, 20, 0, 7]), Some(5));
        // Upper triangle: C = upper(0) = 0 shares the state, E,W,N are lower.
        assert_eq!(tree.eval(&[0, 3, 0, 1, 0]), Some(24));
    }

    #[test]
    fn test_unsupported() {
        let t = table("n_states:20\nneighborhood:triangularMoore\n");
        assert!(matches!(build_tree(&t), Err(Error::Unsupported(_))));
        let t = table("n_states:129\nneighborhood:triangularVonNeumann\n");
        assert!(matches!(build_tree(&t), Err(Error::Unsupported(_))));
    }
}
