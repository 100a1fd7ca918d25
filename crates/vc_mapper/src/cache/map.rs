use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use super::descriptor::{Hook, MemberAccess};
use crate::Key;
use crate::attributes::{Attribute, AttributeSet, CallbackPoint};
use crate::error::MapError;
use crate::reflect::Reflect;

// -----------------------------------------------------------------------------
// ObjectShape

/// The data structure an object maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectShape {
    /// A keyed mapping node.
    Lookup,
    /// An ordered sequence node.
    Index,
}

impl fmt::Display for ObjectShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lookup => "lookup",
            Self::Index => "index",
        })
    }
}

// -----------------------------------------------------------------------------
// Capability

/// Member capabilities, see [`ReflectionMap::members_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Keyed,
    Indexed,
    Required,
    TypeResolve,
}

/// Where a member lives inside its owner's node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Placement {
    Key(Key),
    Index(usize),
}

// -----------------------------------------------------------------------------
// MemberInfo

/// A member bound to the capabilities its attributes carry under one
/// definition.
pub struct MemberInfo {
    pub(crate) name: &'static str,
    pub(crate) attributes: AttributeSet,
    pub(crate) placement: Option<Placement>,
    pub(crate) required: Option<bool>,
    pub(crate) type_resolve: bool,
    pub(crate) type_key: Option<Key>,
    pub(crate) access: Box<dyn MemberAccess>,
}

impl MemberInfo {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    #[inline]
    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    /// Returns the key if the member is keyed.
    pub fn key(&self) -> Option<&Key> {
        match &self.placement {
            Some(Placement::Key(key)) => Some(key),
            _ => None,
        }
    }

    /// Returns the position if the member is indexed.
    pub fn index(&self) -> Option<usize> {
        match self.placement {
            Some(Placement::Index(index)) => Some(index),
            _ => None,
        }
    }

    /// Returns the null-check flag if the member is required.
    #[inline]
    pub fn required(&self) -> Option<bool> {
        self.required
    }

    /// Returns the discriminator key override of a polymorphic member.
    #[inline]
    pub fn type_key(&self) -> Option<&Key> {
        self.type_key.as_ref()
    }

    #[inline]
    pub fn value_type_path(&self) -> &'static str {
        self.access.value_type_path()
    }

    /// Reads the member from `owner`.
    pub fn value<'a>(&self, owner: &'a dyn Reflect) -> Result<&'a dyn Reflect, MapError> {
        let found = owner.type_path();
        self.access.get(owner).ok_or(MapError::TypeMismatch {
            expected: self.access.owner_type_path(),
            found,
        })
    }

    /// Reads the member from `owner` for writing.
    pub fn value_mut<'a>(&self, owner: &'a mut dyn Reflect) -> Result<&'a mut dyn Reflect, MapError> {
        let found = owner.type_path();
        self.access.get_mut(owner).ok_or(MapError::TypeMismatch {
            expected: self.access.owner_type_path(),
            found,
        })
    }

    fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Keyed => matches!(self.placement, Some(Placement::Key(_))),
            Capability::Indexed => matches!(self.placement, Some(Placement::Index(_))),
            Capability::Required => self.required.is_some(),
            Capability::TypeResolve => self.type_resolve,
        }
    }
}

impl fmt::Debug for MemberInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberInfo")
            .field("name", &self.name)
            .field("type", &self.access.value_type_path())
            .field("placement", &self.placement)
            .field("required", &self.required)
            .field("attributes", &self.attributes)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// CallbackInfo

/// A lifecycle callback recognised under one definition.
pub struct CallbackInfo {
    pub(crate) point: CallbackPoint,
    pub(crate) attribute: Box<dyn Attribute>,
    pub(crate) hook: Hook,
}

impl CallbackInfo {
    #[inline]
    pub fn point(&self) -> CallbackPoint {
        self.point
    }

    #[inline]
    pub fn attribute(&self) -> &dyn Attribute {
        &*self.attribute
    }

    /// Runs the callback on `target`.
    #[inline]
    pub fn invoke(&self, target: &mut dyn Reflect) -> Result<(), MapError> {
        (self.hook)(target)
    }
}

impl fmt::Debug for CallbackInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackInfo")
            .field("point", &self.point)
            .field("attribute", &self.attribute)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// VariantInfo

/// One variant of a mapped enum.
pub struct VariantInfo {
    pub(crate) name: &'static str,
    pub(crate) alias: Option<String>,
    pub(crate) value: i64,
    pub(crate) attributes: AttributeSet,
    pub(crate) instance: Box<dyn Any + Send + Sync>,
}

impl VariantInfo {
    /// Returns the declared name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the override string, if the definition recognises one.
    #[inline]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Returns the string written for this variant.
    #[inline]
    pub fn label(&self) -> &str {
        self.alias.as_deref().unwrap_or(self.name)
    }

    #[inline]
    pub fn value(&self) -> i64 {
        self.value
    }

    #[inline]
    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Returns the variant as `E`, or `None` if it belongs to another type.
    #[inline]
    pub fn instance<E: Copy + 'static>(&self) -> Option<E> {
        self.instance.downcast_ref::<E>().copied()
    }
}

impl fmt::Debug for VariantInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantInfo")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// ReflectionMap

/// Everything the mapper knows about one type under one definition.
///
/// Built once by the [`ReflectionCache`](super::ReflectionCache) and shared
/// read-only afterwards.
#[derive(Debug)]
pub struct ReflectionMap {
    pub(crate) type_id: TypeId,
    pub(crate) type_path: &'static str,
    pub(crate) type_name: &'static str,
    pub(crate) attributes: AttributeSet,
    pub(crate) shape: ObjectShape,
    pub(crate) discriminator: Cow<'static, str>,
    pub(crate) members: Vec<MemberInfo>,
    pub(crate) callbacks: Vec<CallbackInfo>,
    pub(crate) variants: Vec<VariantInfo>,
}

impl ReflectionMap {
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Returns the short type name.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the type-level attributes.
    #[inline]
    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    #[inline]
    pub fn shape(&self) -> ObjectShape {
        self.shape
    }

    /// Returns the value identifying this type among the concrete types of a
    /// polymorphic base.
    #[inline]
    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    /// Returns every member in declaration order.
    #[inline]
    pub fn members(&self) -> &[MemberInfo] {
        &self.members
    }

    /// Returns the members carrying `capability`, in declaration order.
    pub fn members_with(&self, capability: Capability) -> impl Iterator<Item = &MemberInfo> {
        self.members.iter().filter(move |member| member.has(capability))
    }

    /// Returns the member declared as `name`.
    pub fn member(&self, name: &str) -> Option<&MemberInfo> {
        self.members.iter().find(|member| member.name == name)
    }

    /// Returns the callbacks for `point`, in declaration order.
    pub fn callbacks(&self, point: CallbackPoint) -> impl Iterator<Item = &CallbackInfo> {
        self.callbacks.iter().filter(move |callback| callback.point == point)
    }

    /// Returns the variants of an enum type, in declaration order.
    #[inline]
    pub fn variants(&self) -> &[VariantInfo] {
        &self.variants
    }

    /// Finds a variant by declared name or override string, case-sensitive.
    pub fn variant_by_label(&self, label: &str) -> Option<&VariantInfo> {
        self.variants
            .iter()
            .find(|variant| variant.name == label || variant.alias.as_deref() == Some(label))
    }

    /// Finds a variant by underlying value.
    pub fn variant_by_value(&self, value: i64) -> Option<&VariantInfo> {
        self.variants.iter().find(|variant| variant.value == value)
    }
}
