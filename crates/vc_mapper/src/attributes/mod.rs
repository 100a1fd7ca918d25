//! Attributes attached to mapped types, members, variants and callbacks.
//!
//! An attribute is any `'static` value. The core never inspects attribute
//! types directly: a [`SerializationDefinition`] names which attribute types
//! satisfy which capability (see [`capability`]), and the reflection cache
//! asks the definition while building a [`ReflectionMap`].
//!
//! The [`standard`] module provides a ready-made attribute set, recognised by
//! [`SerializationDefinition::standard`].
//!
//! [`SerializationDefinition`]: crate::definition::SerializationDefinition
//! [`SerializationDefinition::standard`]: crate::definition::SerializationDefinition::standard
//! [`ReflectionMap`]: crate::cache::ReflectionMap

// -----------------------------------------------------------------------------
// Modules

mod capability;
pub mod standard;

// -----------------------------------------------------------------------------
// Exports

pub use capability::{
    CallbackCapability, CallbackPoint, EnumNameCapability, IndexedCapability, KeyedCapability,
    RequiredCapability, TypeResolveCapability, TypeResolveParameter,
};

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

// -----------------------------------------------------------------------------
// Attribute

/// A value attached to a type, member, variant or callback.
///
/// Implemented for every `'static` type that is `Send + Sync + Debug`.
pub trait Attribute: Any + Send + Sync + fmt::Debug + 'static {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync + fmt::Debug> Attribute for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn Attribute {
    /// Returns the [`TypeId`] of the concrete attribute type.
    #[inline]
    pub fn attribute_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    /// Returns `true` if the concrete attribute type is `T`.
    #[inline]
    pub fn is<T: Attribute>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Downcasts the attribute to `T`.
    #[inline]
    pub fn downcast_ref<T: Attribute>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

// -----------------------------------------------------------------------------
// AttributeSet

/// An ordered collection of attributes.
///
/// Unlike a type-keyed map, the same attribute type may appear more than
/// once. The reflection cache relies on this to detect contradictory
/// descriptions, such as a member carrying two keys.
///
/// # Examples
///
/// ```
/// use vc_mapper::attributes::AttributeSet;
/// use vc_mapper::attributes::standard::{Keyed, Required};
///
/// let set = AttributeSet::new()
///     .with(Keyed::new("Name"))
///     .with(Required::new());
///
/// assert_eq!(set.len(), 2);
/// assert!(set.contains::<Required>());
/// assert_eq!(set.get::<Keyed>().map(|k| k.key().to_string()), Some("Name".into()));
/// ```
#[derive(Default)]
pub struct AttributeSet {
    attributes: Vec<Box<dyn Attribute>>,
}

impl AttributeSet {
    /// Creates an empty set.
    #[inline]
    pub const fn new() -> Self {
        Self {
            attributes: Vec::new(),
        }
    }

    /// Adds an attribute, builder style.
    #[inline]
    pub fn with<T: Attribute>(mut self, attribute: T) -> Self {
        self.push(attribute);
        self
    }

    /// Adds an attribute.
    #[inline]
    pub fn push<T: Attribute>(&mut self, attribute: T) {
        self.attributes.push(Box::new(attribute));
    }

    /// Iterates the attributes in insertion order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &dyn Attribute> {
        self.attributes.iter().map(|attribute| &**attribute)
    }

    /// Returns the first attribute of type `T`, if present.
    pub fn get<T: Attribute>(&self) -> Option<&T> {
        self.iter().find_map(<dyn Attribute>::downcast_ref::<T>)
    }

    /// Returns `true` if an attribute of type `T` is present.
    #[inline]
    pub fn contains<T: Attribute>(&self) -> bool {
        self.iter().any(<dyn Attribute>::is::<T>)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl fmt::Debug for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
