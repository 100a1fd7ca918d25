use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt;

/// Key of an entry in a [`Node::Map`](crate::Node::Map).
///
/// Formats with textual keys only ever produce [`Key::Name`]; integer keys
/// exist for formats (and attribute sets) that address entries by number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Name(Cow<'static, str>),
    Int(i64),
}

impl Key {
    /// Creates a name key from a static string without allocating.
    #[inline]
    pub const fn name(name: &'static str) -> Self {
        Self::Name(Cow::Borrowed(name))
    }

    /// Returns the name if this is a [`Key::Name`].
    #[inline]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Int(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Int(value) => write!(f, "{value}"),
        }
    }
}

impl From<&'static str> for Key {
    #[inline]
    fn from(value: &'static str) -> Self {
        Self::name(value)
    }
}

impl From<String> for Key {
    #[inline]
    fn from(value: String) -> Self {
        Self::Name(Cow::Owned(value))
    }
}

impl From<i64> for Key {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}
