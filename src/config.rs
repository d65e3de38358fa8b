//! Tuning knobs for [`RuleTree`][crate::tree::RuleTree].

/// Which rule decides an input combination covered by more than one rule.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Precedence {
    /// A later rule overrides earlier ones on the inputs it covers.
    #[default]
    LastWins,
    /// An input keeps the output of the first rule that covered it.
    ///
    /// This is the order in which rule tables apply their transitions.
    FirstWins,
}

/// Configuration of a [`RuleTree`][crate::tree::RuleTree].
///
/// ```
/// use ruletree::config::{Precedence, TreeConfig};
///
/// let config = TreeConfig::default()
///     .with_precedence(Precedence::FirstWins)
///     .with_shrink_threshold(1000);
/// assert_eq!(config.shrink_threshold, 1000);
/// assert!(config.auto_shrink);
/// ```
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Node count above which the first automatic shrink runs.
    /// After every shrink the threshold becomes twice the shrunk size.
    pub shrink_threshold: usize,
    /// Whether `add_rule` shrinks the store once it outgrows the threshold.
    pub auto_shrink: bool,
    /// Rule precedence for overlapping rules.
    pub precedence: Precedence,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            shrink_threshold: 100,
            auto_shrink: true,
            precedence: Precedence::default(),
        }
    }
}

impl TreeConfig {
    pub fn with_shrink_threshold(mut self, shrink_threshold: usize) -> Self {
        self.shrink_threshold = shrink_threshold;
        self
    }

    pub fn with_auto_shrink(mut self, auto_shrink: bool) -> Self {
        self.auto_shrink = auto_shrink;
        self
    }

    pub fn with_precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }
}
