//! Golly `.table` rule tables.
//!
//! A rule table lists transitions over a named neighborhood, with variables
//! standing for sets of states and a symmetry that multiplies each transition.
//! [`RuleTable`] parses the text and expands every transition into plain lists
//! of states, ready to be fed into a [`RuleTree`][crate::tree::RuleTree].
//!
//! ```text
//! n_states:3
//! neighborhood:vonNeumann
//! symmetries:rotate4
//! var a={0,1,2}
//! # C,N,E,S,W,C'
//! 0,1,a,a,0,1
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;

use crate::error::{Error, Result};

pub use self::neighborhood::{distinct_permutations, Neighborhood};

pub mod neighborhood;

/// One expanded transition: a list of accepted states per entry, output last.
///
/// Entries keep the order in which the table listed them, so the first
/// element of the output entry is the output state.
pub type Transition = Vec<Vec<u32>>;

/// A parsed and fully expanded rule table.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RuleTable {
    pub num_states: u32,
    pub neighborhood: Neighborhood,
    pub symmetry: String,
    pub transitions: Vec<Transition>,
}

impl RuleTable {
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("reading rule table from {}", path.display());
        let text = fs::read_to_string(path)?;
        text.parse()
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::ParseTable {
        line,
        message: message.into(),
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

#[derive(Default)]
struct Parser {
    num_states: Option<u32>,
    neighborhood: Option<Neighborhood>,
    symmetry: Option<(String, Vec<Vec<usize>>)>,
    vars: HashMap<String, Vec<u32>>,
    transitions: Vec<Transition>,
    seen: HashSet<Transition>,
}

impl Parser {
    fn parse_line(&mut self, lineno: usize, line: &str) -> Result<()> {
        if let Some(rest) = line.strip_prefix("n_states:") {
            let n: i64 = rest
                .trim()
                .parse()
                .map_err(|_| parse_error(lineno, format!("bad n_states '{}'", rest.trim())))?;
            if !(0..=256).contains(&n) {
                return Err(parse_error(lineno, format!("n_states out of range: {}", n)));
            }
            self.num_states = Some(n as u32);
        } else if let Some(rest) = line.strip_prefix("neighborhood:") {
            let neighborhood = rest.trim().parse().map_err(|e| parse_error(lineno, e))?;
            self.neighborhood = Some(neighborhood);
        } else if let Some(rest) = line.strip_prefix("symmetries:") {
            let name = rest.trim();
            let neighborhood = self
                .neighborhood
                .ok_or_else(|| parse_error(lineno, "symmetries given before neighborhood"))?;
            let perms = neighborhood.symmetry(name).ok_or_else(|| {
                parse_error(
                    lineno,
                    format!("unknown symmetry '{}' for {}", name, neighborhood),
                )
            })?;
            self.symmetry = Some((name.to_string(), perms));
        } else if let Some(rest) = line.strip_prefix("var ") {
            self.parse_var(lineno, rest)?;
        } else {
            self.parse_transition(lineno, line)?;
        }
        Ok(())
    }

    fn parse_var(&mut self, lineno: usize, text: &str) -> Result<()> {
        let text = strip_comment(text).replace(['=', '{', ',', ':', '}'], " ");
        let mut tokens = text.split_whitespace();
        let name = tokens
            .next()
            .ok_or_else(|| parse_error(lineno, "variable without a name"))?
            .to_string();
        let mut values = Vec::new();
        for token in tokens {
            match self.vars.get(token) {
                Some(other) => values.extend_from_slice(other),
                None => values.push(self.parse_state(lineno, token)?),
            }
        }
        if values.is_empty() {
            return Err(parse_error(lineno, format!("variable '{}' has no values", name)));
        }
        self.vars.insert(name, values);
        Ok(())
    }

    fn parse_state(&self, lineno: usize, token: &str) -> Result<u32> {
        let state: u32 = token
            .parse()
            .map_err(|_| parse_error(lineno, format!("unknown state or variable '{}'", token)))?;
        match self.num_states {
            Some(n) if state >= n => Err(parse_error(
                lineno,
                format!("state {} is out of range for {} states", state, n),
            )),
            _ => Ok(state),
        }
    }

    fn parse_transition(&mut self, lineno: usize, line: &str) -> Result<()> {
        let neighborhood = self
            .neighborhood
            .ok_or_else(|| parse_error(lineno, "transition given before neighborhood"))?;
        if self.num_states.is_none() {
            return Err(parse_error(lineno, "transition given before n_states"));
        }

        let line = strip_comment(line);
        let entries: Vec<String> = if line.contains(',') {
            line.replace([',', ':'], " ")
                .split_whitespace()
                .map(str::to_string)
                .collect()
        } else {
            // Compact form: one character per entry.
            line.trim().chars().map(String::from).collect()
        };
        if entries.len() != neighborhood.transition_len() {
            return Err(parse_error(
                lineno,
                format!(
                    "wrong number of entries: expected {}, got {}",
                    neighborhood.transition_len(),
                    entries.len()
                ),
            ));
        }

        // Variables used more than once are bound: every occurrence takes the same value.
        let mut bound: Vec<&str> = Vec::new();
        for e in &entries {
            let count = entries.iter().filter(|x| *x == e).count();
            if count > 1 && self.vars.contains_key(e.as_str()) && !bound.contains(&e.as_str()) {
                bound.push(e.as_str());
            }
        }

        let mut free = Vec::with_capacity(entries.len());
        for e in &entries {
            let values = match self.vars.get(e.as_str()) {
                Some(values) => values.clone(),
                None => vec![self.parse_state(lineno, e)?],
            };
            free.push(values);
        }

        let mut indices = vec![0usize; bound.len()];
        loop {
            let transition: Transition = entries
                .iter()
                .zip(&free)
                .map(|(e, values)| match bound.iter().position(|b| *b == e.as_str()) {
                    Some(k) => vec![values[indices[k]]],
                    None => values.clone(),
                })
                .collect();
            self.expand_symmetry(neighborhood, transition);

            // Odometer over the bound variables, first one fastest.
            let mut k = 0;
            while k < bound.len() {
                if indices[k] + 1 < self.vars[bound[k]].len() {
                    indices[k] += 1;
                    break;
                }
                indices[k] = 0;
                k += 1;
            }
            if k >= bound.len() {
                break;
            }
        }
        Ok(())
    }

    fn expand_symmetry(&mut self, neighborhood: Neighborhood, transition: Transition) {
        let (name, perms) = match &self.symmetry {
            Some((name, perms)) => (name.as_str(), perms.clone()),
            None => ("none", vec![(0..transition.len()).collect()]),
        };
        if name == "permute" && neighborhood.permutes_neighbors() {
            // Permute everything but the cell and the output.
            let last = transition.len() - 1;
            for section in distinct_permutations(&transition[1..last]) {
                let mut permuted = Vec::with_capacity(transition.len());
                permuted.push(transition[0].clone());
                permuted.extend(section);
                permuted.push(transition[last].clone());
                self.push(permuted);
            }
        } else {
            for p in perms {
                let permuted: Transition = p.iter().map(|&i| transition[i].clone()).collect();
                self.push(permuted);
            }
        }
    }

    fn push(&mut self, transition: Transition) {
        if self.seen.insert(transition.clone()) {
            self.transitions.push(transition);
        }
    }
}

impl FromStr for RuleTable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parser = Parser::default();
        let mut last_line = 0;
        for (index, line) in s.lines().enumerate() {
            let lineno = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            last_line = lineno;
            parser.parse_line(lineno, line)?;
        }

        let num_states = parser
            .num_states
            .ok_or_else(|| parse_error(last_line, "missing n_states"))?;
        let neighborhood = parser
            .neighborhood
            .ok_or_else(|| parse_error(last_line, "missing neighborhood"))?;
        let symmetry = parser
            .symmetry
            .map(|(name, _)| name)
            .unwrap_or_else(|| "none".to_string());

        debug!(
            "rule table: n_states = {}, neighborhood = {}, symmetries = {}, {} expanded transitions",
            num_states,
            neighborhood,
            symmetry,
            parser.transitions.len()
        );

        Ok(RuleTable {
            num_states,
            neighborhood,
            symmetry,
            transitions: parser.transitions,
        })
    }
}
