use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Neighborhoods a rule table can be written for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Neighborhood {
    VonNeumann,
    Moore,
    Hexagonal,
    OneDimensional,
    TriangularVonNeumann,
    TriangularMoore,
    Margolus,
    Square4Figure8v,
    Square4Figure8h,
    Square4Cyclic,
}

impl Neighborhood {
    pub const ALL: [Neighborhood; 10] = [
        Neighborhood::VonNeumann,
        Neighborhood::Moore,
        Neighborhood::Hexagonal,
        Neighborhood::OneDimensional,
        Neighborhood::TriangularVonNeumann,
        Neighborhood::TriangularMoore,
        Neighborhood::Margolus,
        Neighborhood::Square4Figure8v,
        Neighborhood::Square4Figure8h,
        Neighborhood::Square4Cyclic,
    ];

    /// Name used in `.table` files.
    pub fn name(self) -> &'static str {
        match self {
            Neighborhood::VonNeumann => "vonNeumann",
            Neighborhood::Moore => "Moore",
            Neighborhood::Hexagonal => "hexagonal",
            Neighborhood::OneDimensional => "oneDimensional",
            Neighborhood::TriangularVonNeumann => "triangularVonNeumann",
            Neighborhood::TriangularMoore => "triangularMoore",
            Neighborhood::Margolus => "Margolus",
            Neighborhood::Square4Figure8v => "square4_figure8v",
            Neighborhood::Square4Figure8h => "square4_figure8h",
            Neighborhood::Square4Cyclic => "square4_cyclic",
        }
    }

    /// Number of entries in one transition, outputs included.
    ///
    /// Cell-based neighborhoods list the cell, its neighbors and the new cell
    /// state. Partitioning neighborhoods list the four block inputs and the
    /// four block outputs.
    pub fn transition_len(self) -> usize {
        match self {
            Neighborhood::VonNeumann => 6,
            Neighborhood::Moore => 10,
            Neighborhood::Hexagonal => 8,
            Neighborhood::OneDimensional => 4,
            Neighborhood::TriangularVonNeumann => 5,
            Neighborhood::TriangularMoore => 14,
            Neighborhood::Margolus
            | Neighborhood::Square4Figure8v
            | Neighborhood::Square4Figure8h
            | Neighborhood::Square4Cyclic => 8,
        }
    }

    /// Whether this is one of the 2x2 block-partitioning neighborhoods.
    pub fn is_partitioning(self) -> bool {
        matches!(
            self,
            Neighborhood::Margolus
                | Neighborhood::Square4Figure8v
                | Neighborhood::Square4Figure8h
                | Neighborhood::Square4Cyclic
        )
    }

    /// Whether `permute` symmetry is expanded per transition by permuting the
    /// neighbor entries, instead of through an explicit permutation list.
    pub fn permutes_neighbors(self) -> bool {
        !self.is_partitioning()
    }

    /// Names of the symmetries supported for this neighborhood.
    pub fn symmetry_names(self) -> &'static [&'static str] {
        match self {
            Neighborhood::VonNeumann => &[
                "none",
                "rotate4",
                "rotate4reflect",
                "reflect_horizontal",
                "permute",
            ],
            Neighborhood::Moore => &[
                "none",
                "rotate4",
                "rotate8",
                "rotate4reflect",
                "rotate8reflect",
                "reflect_horizontal",
                "permute",
            ],
            Neighborhood::Hexagonal => &[
                "none",
                "rotate2",
                "rotate3",
                "rotate6",
                "rotate6reflect",
                "permute",
            ],
            Neighborhood::OneDimensional => &["none", "reflect", "permute"],
            Neighborhood::TriangularVonNeumann | Neighborhood::TriangularMoore => {
                &["none", "rotate", "rotate_reflect", "permute"]
            }
            Neighborhood::Margolus
            | Neighborhood::Square4Figure8v
            | Neighborhood::Square4Figure8h
            | Neighborhood::Square4Cyclic => &[
                "none",
                "reflect_horizontal",
                "reflect_vertical",
                "rotate4",
                "rotate4reflect",
                "permute",
            ],
        }
    }

    /// Index permutations applied to each transition for the named symmetry.
    ///
    /// Every list starts with the identity. For `permute` on a cell-based
    /// neighborhood only the identity is listed, since the neighbor entries are
    /// permuted per transition instead.
    pub fn symmetry(self, name: &str) -> Option<Vec<Vec<usize>>> {
        let n = self.transition_len();
        let identity: Vec<usize> = (0..n).collect();
        if name == "none" || (name == "permute" && self.permutes_neighbors()) {
            return self
                .symmetry_names()
                .contains(&name)
                .then(|| vec![identity]);
        }
        if name == "permute" {
            // Same permutation on the four inputs and on the four outputs.
            let perms = distinct_permutations(&[0usize, 1, 2, 3])
                .into_iter()
                .map(|p| {
                    let outputs: Vec<usize> = p.iter().map(|x| x + 4).collect();
                    [p, outputs].concat()
                })
                .collect();
            return Some(perms);
        }

        let table: &[&[usize]] = match (self, name) {
            (Neighborhood::VonNeumann, "rotate4") => &[
                &[0, 1, 2, 3, 4, 5],
                &[0, 2, 3, 4, 1, 5],
                &[0, 3, 4, 1, 2, 5],
                &[0, 4, 1, 2, 3, 5],
            ],
            (Neighborhood::VonNeumann, "rotate4reflect") => &[
                &[0, 1, 2, 3, 4, 5],
                &[0, 2, 3, 4, 1, 5],
                &[0, 3, 4, 1, 2, 5],
                &[0, 4, 1, 2, 3, 5],
                &[0, 4, 3, 2, 1, 5],
                &[0, 3, 2, 1, 4, 5],
                &[0, 2, 1, 4, 3, 5],
                &[0, 1, 4, 3, 2, 5],
            ],
            (Neighborhood::VonNeumann, "reflect_horizontal") => {
                &[&[0, 1, 2, 3, 4, 5], &[0, 1, 4, 3, 2, 5]]
            }
            (Neighborhood::Moore, "rotate4") => &[
                &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
                &[0, 3, 4, 5, 6, 7, 8, 1, 2, 9],
                &[0, 5, 6, 7, 8, 1, 2, 3, 4, 9],
                &[0, 7, 8, 1, 2, 3, 4, 5, 6, 9],
            ],
            (Neighborhood::Moore, "rotate8") => &[
                &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
                &[0, 2, 3, 4, 5, 6, 7, 8, 1, 9],
                &[0, 3, 4, 5, 6, 7, 8, 1, 2, 9],
                &[0, 4, 5, 6, 7, 8, 1, 2, 3, 9],
                &[0, 5, 6, 7, 8, 1, 2, 3, 4, 9],
                &[0, 6, 7, 8, 1, 2, 3, 4, 5, 9],
                &[0, 7, 8, 1, 2, 3, 4, 5, 6, 9],
                &[0, 8, 1, 2, 3, 4, 5, 6, 7, 9],
            ],
            (Neighborhood::Moore, "rotate4reflect") => &[
                &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
                &[0, 3, 4, 5, 6, 7, 8, 1, 2, 9],
                &[0, 5, 6, 7, 8, 1, 2, 3, 4, 9],
                &[0, 7, 8, 1, 2, 3, 4, 5, 6, 9],
                &[0, 1, 8, 7, 6, 5, 4, 3, 2, 9],
                &[0, 7, 6, 5, 4, 3, 2, 1, 8, 9],
                &[0, 5, 4, 3, 2, 1, 8, 7, 6, 9],
                &[0, 3, 2, 1, 8, 7, 6, 5, 4, 9],
            ],
            (Neighborhood::Moore, "rotate8reflect") => &[
                &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
                &[0, 2, 3, 4, 5, 6, 7, 8, 1, 9],
                &[0, 3, 4, 5, 6, 7, 8, 1, 2, 9],
                &[0, 4, 5, 6, 7, 8, 1, 2, 3, 9],
                &[0, 5, 6, 7, 8, 1, 2, 3, 4, 9],
                &[0, 6, 7, 8, 1, 2, 3, 4, 5, 9],
                &[0, 7, 8, 1, 2, 3, 4, 5, 6, 9],
                &[0, 8, 1, 2, 3, 4, 5, 6, 7, 9],
                &[0, 8, 7, 6, 5, 4, 3, 2, 1, 9],
                &[0, 7, 6, 5, 4, 3, 2, 1, 8, 9],
                &[0, 6, 5, 4, 3, 2, 1, 8, 7, 9],
                &[0, 5, 4, 3, 2, 1, 8, 7, 6, 9],
                &[0, 4, 3, 2, 1, 8, 7, 6, 5, 9],
                &[0, 3, 2, 1, 8, 7, 6, 5, 4, 9],
                &[0, 2, 1, 8, 7, 6, 5, 4, 3, 9],
                &[0, 1, 8, 7, 6, 5, 4, 3, 2, 9],
            ],
            (Neighborhood::Moore, "reflect_horizontal") => &[
                &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
                &[0, 1, 8, 7, 6, 5, 4, 3, 2, 9],
            ],
            (Neighborhood::Hexagonal, "rotate2") => {
                &[&[0, 1, 2, 3, 4, 5, 6, 7], &[0, 4, 5, 6, 1, 2, 3, 7]]
            }
            (Neighborhood::Hexagonal, "rotate3") => &[
                &[0, 1, 2, 3, 4, 5, 6, 7],
                &[0, 3, 4, 5, 6, 1, 2, 7],
                &[0, 5, 6, 1, 2, 3, 4, 7],
            ],
            (Neighborhood::Hexagonal, "rotate6") => &[
                &[0, 1, 2, 3, 4, 5, 6, 7],
                &[0, 2, 3, 4, 5, 6, 1, 7],
                &[0, 3, 4, 5, 6, 1, 2, 7],
                &[0, 4, 5, 6, 1, 2, 3, 7],
                &[0, 5, 6, 1, 2, 3, 4, 7],
                &[0, 6, 1, 2, 3, 4, 5, 7],
            ],
            (Neighborhood::Hexagonal, "rotate6reflect") => &[
                &[0, 1, 2, 3, 4, 5, 6, 7],
                &[0, 2, 3, 4, 5, 6, 1, 7],
                &[0, 3, 4, 5, 6, 1, 2, 7],
                &[0, 4, 5, 6, 1, 2, 3, 7],
                &[0, 5, 6, 1, 2, 3, 4, 7],
                &[0, 6, 1, 2, 3, 4, 5, 7],
                &[0, 6, 5, 4, 3, 2, 1, 7],
                &[0, 5, 4, 3, 2, 1, 6, 7],
                &[0, 4, 3, 2, 1, 6, 5, 7],
                &[0, 3, 2, 1, 6, 5, 4, 7],
                &[0, 2, 1, 6, 5, 4, 3, 7],
                &[0, 1, 6, 5, 4, 3, 2, 7],
            ],
            (Neighborhood::OneDimensional, "reflect") => &[&[0, 1, 2, 3], &[0, 2, 1, 3]],
            (Neighborhood::TriangularVonNeumann, "rotate") => {
                &[&[0, 1, 2, 3, 4], &[0, 3, 1, 2, 4], &[0, 2, 3, 1, 4]]
            }
            (Neighborhood::TriangularVonNeumann, "rotate_reflect") => &[
                &[0, 1, 2, 3, 4],
                &[0, 3, 1, 2, 4],
                &[0, 2, 3, 1, 4],
                &[0, 3, 2, 1, 4],
                &[0, 1, 3, 2, 4],
                &[0, 2, 1, 3, 4],
            ],
            (Neighborhood::TriangularMoore, "rotate") => &[
                &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13],
                &[0, 2, 3, 1, 7, 8, 9, 10, 11, 12, 4, 5, 6, 13],
                &[0, 3, 1, 2, 10, 11, 12, 4, 5, 6, 7, 8, 9, 13],
            ],
            (Neighborhood::TriangularMoore, "rotate_reflect") => &[
                &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13],
                &[0, 2, 3, 1, 7, 8, 9, 10, 11, 12, 4, 5, 6, 13],
                &[0, 3, 1, 2, 10, 11, 12, 4, 5, 6, 7, 8, 9, 13],
                &[0, 3, 2, 1, 9, 8, 7, 6, 5, 4, 12, 11, 10, 13],
                &[0, 2, 1, 3, 6, 5, 4, 12, 11, 10, 9, 8, 7, 13],
                &[0, 1, 3, 2, 12, 11, 10, 9, 8, 7, 6, 5, 4, 13],
            ],
            (n, "reflect_horizontal") if n.is_partitioning() => {
                &[&[0, 1, 2, 3, 4, 5, 6, 7], &[1, 0, 3, 2, 5, 4, 7, 6]]
            }
            (n, "reflect_vertical") if n.is_partitioning() => {
                &[&[0, 1, 2, 3, 4, 5, 6, 7], &[2, 3, 0, 1, 6, 7, 4, 5]]
            }
            (n, "rotate4") if n.is_partitioning() => &[
                &[0, 1, 2, 3, 4, 5, 6, 7],
                &[2, 0, 3, 1, 6, 4, 7, 5],
                &[3, 2, 1, 0, 7, 6, 5, 4],
                &[1, 3, 0, 2, 5, 7, 4, 6],
            ],
            (n, "rotate4reflect") if n.is_partitioning() => &[
                &[0, 1, 2, 3, 4, 5, 6, 7],
                &[2, 0, 3, 1, 6, 4, 7, 5],
                &[3, 2, 1, 0, 7, 6, 5, 4],
                &[1, 3, 0, 2, 5, 7, 4, 6],
                &[1, 0, 3, 2, 5, 4, 7, 6],
                &[0, 2, 1, 3, 4, 6, 5, 7],
                &[2, 3, 0, 1, 6, 7, 4, 5],
                &[3, 1, 2, 0, 7, 5, 6, 4],
            ],
            _ => return None,
        };
        Some(table.iter().map(|p| p.to_vec()).collect())
    }
}

impl Display for Neighborhood {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Neighborhood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Neighborhood::ALL
            .into_iter()
            .find(|n| n.name() == s)
            .ok_or_else(|| format!("unknown neighborhood '{}'", s))
    }
}

/// All distinct orderings of `xs`, generated without producing repeats when
/// `xs` contains equal elements.
///
/// Orderings come out lexicographically by first-occurrence position, e.g.
/// `[1, 2, 1]` gives `[1, 2, 1]`, `[1, 1, 2]`, `[2, 1, 1]`.
pub fn distinct_permutations<T: Clone + PartialEq>(xs: &[T]) -> Vec<Vec<T>> {
    if xs.len() < 2 {
        return vec![xs.to_vec()];
    }
    let mut res = Vec::new();
    for (i, x) in xs.iter().enumerate() {
        if xs[..i].contains(x) {
            continue;
        }
        let mut rest = xs.to_vec();
        rest.remove(i);
        for mut tail in distinct_permutations(&rest) {
            tail.insert(0, x.clone());
            res.push(tail);
        }
    }
    res
}
