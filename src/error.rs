//! Error type shared by the whole crate.

use thiserror::Error;

/// Errors reported by rule-tree construction, parsing and I/O.
#[derive(Debug, Error)]
pub enum Error {
    /// Construction parameters that cannot describe a rule tree.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A rule whose inputs or output do not fit the tree.
    #[error("invalid rule: {0}")]
    InvalidRule(String),
    /// A transition function returned a state outside `0..num_states`.
    #[error("transition function returned state {state}, but there are only {num_states} states")]
    InvalidOutput { state: u32, num_states: u32 },
    /// The tree was already written and can no longer be modified.
    #[error("rule tree was already written")]
    AlreadyWritten,
    /// I/O error while reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed `.tree` data.
    #[error("bad tree data on line {line}: {message}")]
    ParseTree { line: usize, message: String },
    /// Malformed `.table` data.
    #[error("bad rule table on line {line}: {message}")]
    ParseTable { line: usize, message: String },
    /// A neighborhood or size that cannot be emulated.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, Error>;
