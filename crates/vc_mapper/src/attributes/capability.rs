use alloc::borrow::Cow;
use core::fmt;

use super::Attribute;
use crate::Key;

// -----------------------------------------------------------------------------
// Placement

/// A member stored under a key of a lookup data structure.
pub trait KeyedCapability: Attribute {
    fn key(&self) -> Key;
}

/// A member stored at a position of an index data structure.
pub trait IndexedCapability: Attribute {
    fn index(&self) -> usize;
}

// -----------------------------------------------------------------------------
// Type resolution

/// Polymorphic type resolution.
///
/// On a type, [`discriminator`](Self::discriminator) overrides the value
/// written for that concrete type (its short name by default). On a member
/// holding a polymorphic value, [`key`](Self::key) overrides the reserved key
/// the discriminator is written under.
pub trait TypeResolveCapability: Attribute {
    fn discriminator(&self) -> Option<&str> {
        None
    }

    fn key(&self) -> Option<Key> {
        None
    }
}

/// Owned copy of what a [`TypeResolveCapability`] carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeResolveParameter {
    pub discriminator: Option<Cow<'static, str>>,
    pub key: Option<Key>,
}

// -----------------------------------------------------------------------------
// Validation

/// A member that must be present in the source node.
pub trait RequiredCapability: Attribute {
    /// If `true`, a present value must also be non-null.
    fn null_check(&self) -> bool;
}

// -----------------------------------------------------------------------------
// Callbacks

/// When a lifecycle callback runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackPoint {
    /// Before the members of an object are read.
    PreSerialize,
    /// After every member has been set and required members validated.
    PostDeserialize,
}

impl fmt::Display for CallbackPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PreSerialize => "pre-serialize",
            Self::PostDeserialize => "post-deserialize",
        })
    }
}

/// Marks a registered function as a lifecycle callback.
pub trait CallbackCapability: Attribute {
    fn point(&self) -> CallbackPoint;
}

// -----------------------------------------------------------------------------
// Enums

/// Override string for an enum variant.
pub trait EnumNameCapability: Attribute {
    fn name(&self) -> &str;
}
