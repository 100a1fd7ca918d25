//! Format-neutral value tree.
//!
//! Every format adapter parses its input into a [`Node`] and renders a
//! [`Node`] back to bytes. The mapping pipeline never sees tokens, only these
//! three shapes:
//!
//! - primitive values: [`Node::Null`], [`Node::Bool`], [`Node::Int`],
//!   [`Node::UInt`], [`Node::Float`], [`Node::String`];
//! - index data structures: [`Node::Seq`];
//! - lookup data structures: [`Node::Map`].
//!
//! `Node` implements serde's `Serialize` and `Deserialize`, so any serde data
//! format can act as the raw reader/writer.
//!
//! # Examples
//!
//! ```
//! use vc_mapper::{Key, Node};
//!
//! let mut node = Node::map();
//! node.insert("Name", Node::from("Global"));
//! node.insert("Size", Node::from(2_i64));
//!
//! assert_eq!(node.get(&Key::name("Name")).and_then(Node::as_str), Some("Global"));
//! assert_eq!(node.get_name("Size").and_then(Node::as_i64), Some(2));
//! ```

// -----------------------------------------------------------------------------
// Modules

mod key;
mod serde;

// -----------------------------------------------------------------------------
// Exports

pub use key::Key;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

// -----------------------------------------------------------------------------
// NodeKind

/// The shape of a [`Node`], used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    Bool,
    Int,
    UInt,
    Float,
    String,
    Seq,
    Map,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::UInt => "unsigned integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Seq => "sequence",
            Self::Map => "mapping",
        })
    }
}

// -----------------------------------------------------------------------------
// Node

/// A format-neutral value.
///
/// Mapping entries keep their insertion order, lookups compare keys.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Seq(Vec<Node>),
    Map(Vec<(Key, Node)>),
}

impl Node {
    /// Creates an empty mapping node.
    #[inline]
    pub const fn map() -> Self {
        Self::Map(Vec::new())
    }

    /// Creates an empty sequence node.
    #[inline]
    pub const fn seq() -> Self {
        Self::Seq(Vec::new())
    }

    /// Returns the shape of this node.
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Null => NodeKind::Null,
            Self::Bool(_) => NodeKind::Bool,
            Self::Int(_) => NodeKind::Int,
            Self::UInt(_) => NodeKind::UInt,
            Self::Float(_) => NodeKind::Float,
            Self::String(_) => NodeKind::String,
            Self::Seq(_) => NodeKind::Seq,
            Self::Map(_) => NodeKind::Map,
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the value as `i64` if it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int(value) => Some(value),
            Self::UInt(value) => i64::try_from(value).ok(),
            _ => None,
        }
    }

    /// Returns the value as `u64` if it is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::Int(value) => u64::try_from(value).ok(),
            Self::UInt(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the value as `f64`. Integer nodes are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Float(value) => Some(value),
            Self::Int(value) => Some(value as f64),
            Self::UInt(value) => Some(value as f64),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn as_seq(&self) -> Option<&[Node]> {
        match self {
            Self::Seq(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map(&self) -> Option<&[(Key, Node)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the child stored under `key` in a mapping node.
    pub fn get(&self, key: &Key) -> Option<&Node> {
        match self {
            Self::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns the child stored under the name key `name` in a mapping node.
    pub fn get_name(&self, name: &str) -> Option<&Node> {
        match self {
            Self::Map(entries) => entries
                .iter()
                .find(|(k, _)| k.as_name() == Some(name))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns the child at `index` in a sequence node.
    pub fn get_index(&self, index: usize) -> Option<&Node> {
        match self {
            Self::Seq(items) => items.get(index),
            _ => None,
        }
    }

    /// Inserts a child into a mapping node, returning the replaced value.
    ///
    /// A node of any other shape is replaced by an empty mapping first.
    pub fn insert(&mut self, key: impl Into<Key>, value: Node) -> Option<Node> {
        let key = key.into();
        let entries = self.make_map();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(core::mem::replace(slot, value)),
            None => {
                entries.push((key, value));
                None
            }
        }
    }

    /// Removes the child stored under `key` from a mapping node.
    pub fn remove(&mut self, key: &Key) -> Option<Node> {
        match self {
            Self::Map(entries) => {
                let index = entries.iter().position(|(k, _)| k == key)?;
                Some(entries.remove(index).1)
            }
            _ => None,
        }
    }

    /// Appends a child to a sequence node.
    ///
    /// A node of any other shape is replaced by an empty sequence first.
    pub fn push(&mut self, value: Node) {
        if !matches!(self, Self::Seq(_)) {
            *self = Self::seq();
        }
        if let Self::Seq(items) = self {
            items.push(value);
        }
    }

    fn make_map(&mut self) -> &mut Vec<(Key, Node)> {
        if !matches!(self, Self::Map(_)) {
            *self = Self::map();
        }
        match self {
            Self::Map(entries) => entries,
            _ => unreachable!(),
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from_node {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

impl_from_node! {
    bool => Bool,
    i64 => Int,
    u64 => UInt,
    f64 => Float,
    String => String,
    &str => String,
    Vec<Node> => Seq,
}

#[cfg(test)]
mod tests {
    use super::{Key, Node, NodeKind};
    use alloc::vec;

    #[test]
    fn insert_replaces_existing_key() {
        let mut node = Node::map();
        assert!(node.insert("a", Node::from(1_i64)).is_none());
        assert!(node.insert("b", Node::from(2_i64)).is_none());
        assert_eq!(node.insert("a", Node::from(3_i64)), Some(Node::Int(1)));

        let entries = node.as_map().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], (Key::name("a"), Node::Int(3)));
    }

    #[test]
    fn insert_turns_scalar_into_map() {
        let mut node = Node::Bool(true);
        node.insert(7_i64, Node::Null);
        assert_eq!(node.kind(), NodeKind::Map);
        assert_eq!(node.get(&Key::Int(7)), Some(&Node::Null));
    }

    #[test]
    fn integer_accessors_check_range() {
        assert_eq!(Node::UInt(u64::MAX).as_i64(), None);
        assert_eq!(Node::Int(-1).as_u64(), None);
        assert_eq!(Node::Int(5).as_f64(), Some(5.0));
        assert_eq!(Node::String("5".into()).as_i64(), None);
    }

    #[test]
    fn remove_and_index() {
        let mut node = Node::from(vec![Node::from("x"), Node::from(false)]);
        assert_eq!(node.get_index(1), Some(&Node::Bool(false)));
        node.push(Node::Null);
        assert_eq!(node.as_seq().map(<[Node]>::len), Some(3));

        let mut map = Node::map();
        map.insert("k", Node::from("v"));
        assert_eq!(map.remove(&Key::name("k")), Some(Node::from("v")));
        assert_eq!(map.remove(&Key::name("k")), None);
    }
}
