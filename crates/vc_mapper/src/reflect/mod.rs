//! Runtime reflection over mapped values.
//!
//! Every value the mapper touches implements [`Reflect`], which casts it to
//! one of a closed set of shapes ([`ReflectRef`] / [`ReflectMut`]). The
//! processor chain matches over these shapes instead of probing types.
//!
//! | Shape | Implemented by |
//! |---|---|
//! | [`Primitive`] | `bool`, `char`, integers, floats, `String` |
//! | [`Enum`] | [`MappedEnum`] types via [`impl_enum!`] |
//! | [`Optional`] | `Option<T>` |
//! | [`List`] | `Vec<T>` |
//! | [`Dict`] | `BTreeMap<String, V>`, `HashMap<String, V, S>` |
//! | [`Object`] | [`Mapped`] types via [`impl_object!`] |
//! | [`Resolvable`] | [`Poly<B>`] |
//!
//! [`MappedEnum`]: crate::cache::MappedEnum
//! [`Mapped`]: crate::cache::Mapped
//! [`impl_enum!`]: crate::impl_enum
//! [`impl_object!`]: crate::impl_object

// -----------------------------------------------------------------------------
// Modules

mod impls;
mod macros;
mod poly;

// -----------------------------------------------------------------------------
// Exports

pub use poly::{Poly, Polymorphic};

use alloc::string::String;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use crate::cache::{TypeHandle, VariantInfo};
use crate::error::ResolveError;
use crate::node::Node;
use crate::resolver::TypeResolver;

// -----------------------------------------------------------------------------
// Reflect

/// A value the mapper can read and write.
///
/// Do not implement this by hand for objects and enums; describe the type
/// with [`Mapped`] or [`MappedEnum`] and use [`impl_object!`] or
/// [`impl_enum!`].
///
/// As with [`Any`], calling [`Any::type_id`] on a `Box<dyn Reflect>` returns
/// the id of the box. Use [`Reflect::reflect_type_id`] instead.
///
/// [`Mapped`]: crate::cache::Mapped
/// [`MappedEnum`]: crate::cache::MappedEnum
/// [`impl_object!`]: crate::impl_object
/// [`impl_enum!`]: crate::impl_enum
pub trait Reflect: Any + Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the full type path, as [`core::any::type_name`].
    fn type_path(&self) -> &'static str;

    fn reflect_kind(&self) -> ReflectKind;

    fn reflect_ref(&self) -> ReflectRef<'_>;

    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    /// Returns the [`TypeId`] of the concrete type.
    #[inline]
    fn reflect_type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Returns `true` for values that represent null: an empty `Option` or
    /// an empty [`Poly`].
    #[inline]
    fn is_null(&self) -> bool {
        false
    }
}

impl dyn Reflect {
    #[inline]
    pub fn is<T: Reflect>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reflect({})", self.type_path())
    }
}

// -----------------------------------------------------------------------------
// Kinds

/// The shape of a reflected value, without the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Value,
    Enum,
    Optional,
    List,
    Dict,
    Object,
    Poly,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Value => "value",
            Self::Enum => "enum",
            Self::Optional => "optional",
            Self::List => "list",
            Self::Dict => "dict",
            Self::Object => "object",
            Self::Poly => "poly",
        })
    }
}

/// Immutable shape cast, see [`Reflect::reflect_ref`].
pub enum ReflectRef<'a> {
    Value(&'a dyn Primitive),
    Enum(&'a dyn Enum),
    Optional(&'a dyn Optional),
    List(&'a dyn List),
    Dict(&'a dyn Dict),
    Object(&'a dyn Object),
    Poly(&'a dyn Resolvable),
}

/// Mutable shape cast, see [`Reflect::reflect_mut`].
pub enum ReflectMut<'a> {
    Value(&'a mut dyn Primitive),
    Enum(&'a mut dyn Enum),
    Optional(&'a mut dyn Optional),
    List(&'a mut dyn List),
    Dict(&'a mut dyn Dict),
    Object(&'a mut dyn Object),
    Poly(&'a mut dyn Resolvable),
}

macro_rules! impl_kind_fn {
    ($name:ident) => {
        impl $name<'_> {
            pub const fn kind(&self) -> ReflectKind {
                match self {
                    Self::Value(_) => ReflectKind::Value,
                    Self::Enum(_) => ReflectKind::Enum,
                    Self::Optional(_) => ReflectKind::Optional,
                    Self::List(_) => ReflectKind::List,
                    Self::Dict(_) => ReflectKind::Dict,
                    Self::Object(_) => ReflectKind::Object,
                    Self::Poly(_) => ReflectKind::Poly,
                }
            }
        }
    };
}

impl_kind_fn!(ReflectRef);
impl_kind_fn!(ReflectMut);

// -----------------------------------------------------------------------------
// Kind traits

/// A value that passes through as a single node.
pub trait Primitive {
    fn to_node(&self) -> Node;

    /// Overwrites the value from `node`.
    ///
    /// Never coerces lossy data. On mismatch, returns a description of the
    /// node that was expected.
    fn set_node(&mut self, node: &Node) -> Result<(), &'static str>;
}

/// A C-like enum with an underlying integer value.
pub trait Enum {
    fn type_handle(&self) -> TypeHandle;

    /// Returns the underlying value of the current variant.
    fn value(&self) -> i64;

    /// Switches to the variant described by `variant`.
    ///
    /// Returns `false` if `variant` belongs to another type.
    fn set_variant(&mut self, variant: &VariantInfo) -> bool;
}

/// A value that may be absent.
pub trait Optional {
    fn value(&self) -> Option<&dyn Reflect>;

    fn value_mut(&mut self) -> Option<&mut dyn Reflect>;

    fn clear(&mut self);

    /// Returns the held value, inserting a default one first if absent.
    fn get_or_insert_default(&mut self) -> &mut dyn Reflect;
}

/// An ordered, growable sequence.
pub trait List {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    /// Appends a default element and returns it.
    fn push_default(&mut self) -> &mut dyn Reflect;

    fn truncate(&mut self, len: usize);
}

/// A string-keyed dictionary.
pub trait Dict {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the keys in output order.
    ///
    /// Ordered maps yield their own order, hash maps yield sorted keys.
    fn keys(&self) -> Vec<String>;

    fn get(&self, key: &str) -> Option<&dyn Reflect>;

    fn get_mut(&mut self, key: &str) -> Option<&mut dyn Reflect>;

    fn get_or_insert_default(&mut self, key: &str) -> &mut dyn Reflect;

    /// Removes every entry whose key `keep` rejects.
    fn retain_keys(&mut self, keep: &mut dyn FnMut(&str) -> bool);
}

/// A described object with members.
pub trait Object: Reflect {
    fn type_handle(&self) -> TypeHandle;
}

/// A polymorphic holder, see [`Poly`].
pub trait Resolvable {
    fn base_type_id(&self) -> TypeId;

    fn base_type_path(&self) -> &'static str;

    fn object(&self) -> Option<&dyn Object>;

    fn object_mut(&mut self) -> Option<&mut dyn Object>;

    fn clear(&mut self);

    /// Replaces the held value with a fresh instance of the concrete type
    /// registered under `discriminator`.
    fn install(&mut self, resolver: &TypeResolver, discriminator: &str)
    -> Result<(), ResolveError>;

    /// Replaces the held value with the base's fallback instance.
    ///
    /// Returns `false` if the base has none.
    fn install_fallback(&mut self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::{Reflect, ReflectKind, ReflectMut};
    use crate::Node;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn downcast_and_kind() {
        let mut value: Vec<String> = vec!["a".into()];
        let reflect: &mut dyn Reflect = &mut value;

        assert_eq!(reflect.reflect_kind(), ReflectKind::List);
        assert!(reflect.is::<Vec<String>>());
        assert!(reflect.downcast_ref::<Vec<i32>>().is_none());

        let ReflectMut::List(list) = reflect.reflect_mut() else {
            panic!("expected a list");
        };
        let ReflectMut::Value(item) = list.push_default().reflect_mut() else {
            panic!("expected a value");
        };
        item.set_node(&Node::from("b")).unwrap();
        assert_eq!(value, ["a", "b"]);
    }

    #[test]
    fn boxed_type_id() {
        let boxed: alloc::boxed::Box<dyn Reflect> = alloc::boxed::Box::new(7_u8);
        assert_eq!(boxed.reflect_type_id(), core::any::TypeId::of::<u8>());
        assert_eq!(boxed.type_path(), "u8");
    }
}
