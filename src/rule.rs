use std::fmt::{Display, Formatter};

use crate::error::{Error, Result};
use crate::state_set::StateSet;

/// A transition rule: every combination of the accepted input states maps to `output`.
///
/// `inputs[p]` holds the states accepted at input position `p`; position 0 is the
/// cell itself.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Rule {
    pub inputs: Vec<StateSet>,
    pub output: u32,
}

impl Rule {
    pub fn new<I>(inputs: I, output: u32) -> Self
    where
        I: IntoIterator,
        I::Item: Into<StateSet>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            output,
        }
    }

    /// Build a rule from raw state lists, rejecting states outside `0..num_states`
    /// before any set is built.
    pub fn from_states<I>(inputs: I, output: u32, num_states: u32) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<[u32]>,
    {
        let mut sets = Vec::new();
        for (position, states) in inputs.into_iter().enumerate() {
            let states = states.as_ref();
            if let Some(&state) = states.iter().find(|&&s| s >= num_states) {
                return Err(Error::InvalidRule(format!(
                    "input set at position {} contains state {}, but there are only {} states",
                    position, state, num_states
                )));
            }
            sets.push(StateSet::from(states));
        }
        Ok(Self {
            inputs: sets,
            output,
        })
    }

    /// Check that the rule fits a tree over `num_states` states and `num_params` positions.
    pub fn validate(&self, num_states: u32, num_params: u32) -> Result<()> {
        if self.inputs.len() != num_params as usize {
            return Err(Error::InvalidRule(format!(
                "expected {} input sets, got {}",
                num_params,
                self.inputs.len()
            )));
        }
        for (position, set) in self.inputs.iter().enumerate() {
            match set.max() {
                None => {
                    return Err(Error::InvalidRule(format!(
                        "input set at position {} is empty",
                        position
                    )));
                }
                Some(state) if state >= num_states => {
                    return Err(Error::InvalidRule(format!(
                        "input set at position {} contains state {}, but there are only {} states",
                        position, state, num_states
                    )));
                }
                Some(_) => {}
            }
        }
        if self.output >= num_states {
            return Err(Error::InvalidRule(format!(
                "output state {} is out of range for {} states",
                self.output, num_states
            )));
        }
        Ok(())
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, set) in self.inputs.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            if set.len() == 1 {
                write!(f, "{}", set.first().unwrap_or_default())?;
            } else {
                write!(f, "{:?}", set)?;
            }
        }
        write!(f, " -> {}", self.output)
    }
}
