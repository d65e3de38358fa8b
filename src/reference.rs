use std::fmt::{Display, Formatter};

/// A child reference inside a rule tree.
///
/// The same integer is read either as a leaf state or as a node id: children of
/// a depth-1 node are leaf states, children of deeper nodes are node ids.
/// Negative values mark the sentinel (no rule has decided this path yet).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Ref(i32);

impl Ref {
    pub const UNDEFINED: Ref = Ref(-1);

    pub const fn new(index: u32) -> Self {
        Self(index as i32)
    }

    pub const fn is_undefined(&self) -> bool {
        self.0 < 0
    }

    /// Return the internal representation of the reference.
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Return the node id or leaf state this reference points to.
    pub fn index(self) -> usize {
        assert!(!self.is_undefined(), "Undefined reference has no index");
        self.0 as usize
    }

    /// Return the referenced leaf state, or `None` for the sentinel.
    pub fn state(self) -> Option<u32> {
        if self.is_undefined() {
            None
        } else {
            Some(self.0 as u32)
        }
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_undefined() {
            write!(f, "@?")
        } else {
            write!(f, "@{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined() {
        assert!(Ref::UNDEFINED.is_undefined());
        assert!(!Ref::new(0).is_undefined());
        assert_eq!(Ref::UNDEFINED.state(), None);
        assert_eq!(Ref::new(3).state(), Some(3));
    }

    #[test]
    fn test_display() {
        assert_eq!(Ref::new(7).to_string(), "@7");
        assert_eq!(Ref::UNDEFINED.to_string(), "@?");
    }

    #[test]
    #[should_panic(expected = "Undefined reference has no index")]
    fn test_undefined_index_panics() {
        Ref::UNDEFINED.index();
    }
}
