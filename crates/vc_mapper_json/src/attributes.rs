//! Attributes recognised by the JSON [`definition`](crate::definition).

use alloc::borrow::Cow;

use vc_mapper::Key;
use vc_mapper::attributes::{
    CallbackCapability, CallbackPoint, EnumNameCapability, IndexedCapability, KeyedCapability,
    RequiredCapability, TypeResolveCapability,
};

// -----------------------------------------------------------------------------
// Placement

/// Stores a member under a property of a JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonProperty(pub Key);

impl JsonProperty {
    #[inline]
    pub fn new(name: impl Into<Key>) -> Self {
        Self(name.into())
    }
}

impl KeyedCapability for JsonProperty {
    #[inline]
    fn key(&self) -> Key {
        self.0.clone()
    }
}

/// Stores a member at a position of a JSON array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonIndex(pub usize);

impl IndexedCapability for JsonIndex {
    #[inline]
    fn index(&self) -> usize {
        self.0
    }
}

/// Writes a type as a JSON object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonObject;

/// Writes a type as a JSON array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonArray;

// -----------------------------------------------------------------------------
// JsonType

/// Discriminator override on a concrete type, or discriminator property
/// override on a polymorphic member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonType {
    pub discriminator: Option<Cow<'static, str>>,
    pub property: Option<Key>,
}

impl JsonType {
    /// Writes the concrete type as `discriminator`.
    #[inline]
    pub fn named(discriminator: impl Into<Cow<'static, str>>) -> Self {
        Self {
            discriminator: Some(discriminator.into()),
            property: None,
        }
    }

    /// Writes the discriminator of the member's value under `property`.
    #[inline]
    pub fn property(property: impl Into<Key>) -> Self {
        Self {
            discriminator: None,
            property: Some(property.into()),
        }
    }
}

impl TypeResolveCapability for JsonType {
    fn discriminator(&self) -> Option<&str> {
        self.discriminator.as_deref()
    }

    fn key(&self) -> Option<Key> {
        self.property.clone()
    }
}

// -----------------------------------------------------------------------------
// JsonRequired

/// The property must be present; with `allow_null: false` it must not be
/// `null` either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonRequired {
    pub allow_null: bool,
}

impl JsonRequired {
    /// Present and not `null`.
    pub const ALWAYS: Self = Self { allow_null: false };

    /// Present, `null` allowed.
    pub const ALLOW_NULL: Self = Self { allow_null: true };
}

impl RequiredCapability for JsonRequired {
    #[inline]
    fn null_check(&self) -> bool {
        !self.allow_null
    }
}

// -----------------------------------------------------------------------------
// Callbacks

/// Runs a callback before the object is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnSerializing;

impl CallbackCapability for OnSerializing {
    #[inline]
    fn point(&self) -> CallbackPoint {
        CallbackPoint::PreSerialize
    }
}

/// Runs a callback after the object is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnDeserialized;

impl CallbackCapability for OnDeserialized {
    #[inline]
    fn point(&self) -> CallbackPoint {
        CallbackPoint::PostDeserialize
    }
}

// -----------------------------------------------------------------------------
// JsonEnumValue

/// The string written for an enum variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonEnumValue(pub Cow<'static, str>);

impl JsonEnumValue {
    #[inline]
    pub fn new(value: impl Into<Cow<'static, str>>) -> Self {
        Self(value.into())
    }
}

impl EnumNameCapability for JsonEnumValue {
    #[inline]
    fn name(&self) -> &str {
        &self.0
    }
}
