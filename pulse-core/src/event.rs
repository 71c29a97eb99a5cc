use std::fmt;
use std::sync::Arc;

/// Identifier of a monitored entity.
///
/// Cloning a `Name` shares the underlying text. Channels never inspect a
/// name, they only forward it to subscribers.
///
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(Arc<str>);

impl Name {
    pub fn new(value: impl Into<Arc<str>>) -> Self {
        Name(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identity comparison: true when both names share one allocation.
    ///
    /// `==` compares the text; two names created separately from the same
    /// string are equal but not the same.
    ///
    pub fn same(left: &Name, right: &Name) -> bool {
        Arc::ptr_eq(&left.0, &right.0)
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::new(value)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Name").field(&&*self.0).finish()
    }
}

/// Direction of a change.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Orientation {
    Rising,
    Falling,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Rising => f.write_str("rising"),
            Orientation::Falling => f.write_str("falling"),
        }
    }
}
