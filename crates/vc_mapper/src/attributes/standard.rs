//! The core's own attribute set.
//!
//! [`SerializationDefinition::standard`] recognises every type in this
//! module. Format crates usually ship their own attribute types instead and
//! build a definition naming those.
//!
//! [`SerializationDefinition::standard`]: crate::definition::SerializationDefinition::standard

use alloc::borrow::Cow;

use super::{
    CallbackCapability, CallbackPoint, EnumNameCapability, IndexedCapability, KeyedCapability,
    RequiredCapability, TypeResolveCapability,
};
use crate::Key;

// -----------------------------------------------------------------------------
// Placement

/// Stores a member under a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyed(Key);

impl Keyed {
    #[inline]
    pub fn new(key: impl Into<Key>) -> Self {
        Self(key.into())
    }

    #[inline]
    pub const fn key(&self) -> &Key {
        &self.0
    }
}

impl KeyedCapability for Keyed {
    #[inline]
    fn key(&self) -> Key {
        self.0.clone()
    }
}

/// Stores a member at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indexed(pub usize);

impl IndexedCapability for Indexed {
    #[inline]
    fn index(&self) -> usize {
        self.0
    }
}

/// Declares a type lookup-shaped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupObject;

/// Declares a type index-shaped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexObject;

// -----------------------------------------------------------------------------
// TypeResolve

/// Polymorphic type resolution parameters.
///
/// # Examples
///
/// ```
/// use vc_mapper::attributes::standard::TypeResolve;
///
/// // On a concrete type: written as `"circle"` instead of `"Circle"`.
/// let on_type = TypeResolve::new().with_discriminator("circle");
///
/// // On a member: discriminator goes under `"kind"` instead of `"$type"`.
/// let on_member = TypeResolve::new().with_key("kind");
/// # let _ = (on_type, on_member);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeResolve {
    discriminator: Option<Cow<'static, str>>,
    key: Option<Key>,
}

impl TypeResolve {
    #[inline]
    pub const fn new() -> Self {
        Self {
            discriminator: None,
            key: None,
        }
    }

    #[inline]
    pub fn with_discriminator(mut self, discriminator: impl Into<Cow<'static, str>>) -> Self {
        self.discriminator = Some(discriminator.into());
        self
    }

    #[inline]
    pub fn with_key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl TypeResolveCapability for TypeResolve {
    fn discriminator(&self) -> Option<&str> {
        self.discriminator.as_deref()
    }

    fn key(&self) -> Option<Key> {
        self.key.clone()
    }
}

// -----------------------------------------------------------------------------
// Required

/// Requires a member to be present in the source node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Required {
    pub null_check: bool,
}

impl Required {
    /// Presence only; an explicit null passes.
    #[inline]
    pub const fn new() -> Self {
        Self { null_check: false }
    }

    /// Presence and a non-null value.
    #[inline]
    pub const fn non_null() -> Self {
        Self { null_check: true }
    }
}

impl RequiredCapability for Required {
    #[inline]
    fn null_check(&self) -> bool {
        self.null_check
    }
}

// -----------------------------------------------------------------------------
// Callbacks

/// Runs a callback before the object is serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnSerialize;

impl CallbackCapability for OnSerialize {
    #[inline]
    fn point(&self) -> CallbackPoint {
        CallbackPoint::PreSerialize
    }
}

/// Runs a callback after the object is deserialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnDeserialized;

impl CallbackCapability for OnDeserialized {
    #[inline]
    fn point(&self) -> CallbackPoint {
        CallbackPoint::PostDeserialize
    }
}

// -----------------------------------------------------------------------------
// EnumName

/// Override string for an enum variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumName(pub Cow<'static, str>);

impl EnumName {
    #[inline]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }
}

impl EnumNameCapability for EnumName {
    #[inline]
    fn name(&self) -> &str {
        &self.0
    }
}
