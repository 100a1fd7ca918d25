use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::type_name;
use core::marker::PhantomData;

use crate::attributes::{Attribute, AttributeSet};
use crate::error::{CallbackError, MapError};
use crate::reflect::Reflect;

// -----------------------------------------------------------------------------
// Mapped

/// A type whose members the mapper can read and write.
///
/// [`describe`](Mapped::describe) runs once per type and definition, the
/// first time the [`ReflectionCache`](super::ReflectionCache) sees the type.
/// Pair every implementation with [`impl_object!`](crate::impl_object).
pub trait Mapped: Default + Send + Sync + 'static {
    fn describe(d: &mut TypeDescriptor<Self>);

    /// Short name used as the default discriminator and in error messages.
    fn type_name() -> &'static str {
        short_name(type_name::<Self>())
    }
}

/// A C-like enum the mapper can read and write.
///
/// Pair every implementation with [`impl_enum!`](crate::impl_enum).
pub trait MappedEnum: Copy + Default + Send + Sync + 'static {
    fn describe(d: &mut EnumDescriptor<Self>);

    /// Returns the underlying value of `self`.
    fn to_value(self) -> i64;

    fn type_name() -> &'static str {
        short_name(type_name::<Self>())
    }
}

/// `a::b::Player<c::D>` -> `Player`.
pub(crate) fn short_name(path: &'static str) -> &'static str {
    let end = path.find('<').unwrap_or(path.len());
    let path = &path[..end];
    match path.rfind("::") {
        Some(index) => &path[index + 2..],
        None => path,
    }
}

// -----------------------------------------------------------------------------
// MemberAccess

/// Type-erased accessor pair for one member.
pub trait MemberAccess: Send + Sync {
    fn owner_type_path(&self) -> &'static str;

    fn value_type_path(&self) -> &'static str;

    /// Returns the member of `owner`, or `None` if `owner` has another type.
    fn get<'a>(&self, owner: &'a dyn Reflect) -> Option<&'a dyn Reflect>;

    /// Returns the member of `owner`, or `None` if `owner` has another type.
    fn get_mut<'a>(&self, owner: &'a mut dyn Reflect) -> Option<&'a mut dyn Reflect>;
}

struct Accessor<T, F, G, M> {
    get: G,
    get_mut: M,
    marker: PhantomData<fn(&T) -> &F>,
}

impl<T, F, G, M> MemberAccess for Accessor<T, F, G, M>
where
    T: 'static,
    F: Reflect,
    G: Fn(&T) -> &F + Send + Sync,
    M: Fn(&mut T) -> &mut F + Send + Sync,
{
    #[inline]
    fn owner_type_path(&self) -> &'static str {
        type_name::<T>()
    }

    #[inline]
    fn value_type_path(&self) -> &'static str {
        type_name::<F>()
    }

    fn get<'a>(&self, owner: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        let owner = owner.as_any().downcast_ref::<T>()?;
        Some((self.get)(owner))
    }

    fn get_mut<'a>(&self, owner: &'a mut dyn Reflect) -> Option<&'a mut dyn Reflect> {
        let owner = owner.as_any_mut().downcast_mut::<T>()?;
        Some((self.get_mut)(owner))
    }
}

// -----------------------------------------------------------------------------
// Descriptors

pub(crate) type Hook = Box<dyn Fn(&mut dyn Reflect) -> Result<(), MapError> + Send + Sync>;

pub(crate) struct MemberDescriptor {
    pub name: &'static str,
    pub attributes: AttributeSet,
    pub access: Box<dyn MemberAccess>,
}

pub(crate) struct CallbackDescriptor {
    pub attribute: Box<dyn Attribute>,
    pub hook: Hook,
}

/// Collects the attributes, members and callbacks of a [`Mapped`] type.
///
/// # Examples
///
/// ```
/// use vc_mapper::attributes::standard::{Keyed, OnDeserialized, Required};
/// use vc_mapper::cache::{Mapped, TypeDescriptor};
///
/// #[derive(Default)]
/// struct Entry {
///     player: String,
///     score: u32,
///     rank: u32,
/// }
///
/// impl Mapped for Entry {
///     fn describe(d: &mut TypeDescriptor<Self>) {
///         d.member("player", |e| &e.player, |e| &mut e.player)
///             .with(Keyed::new("Player"))
///             .with(Required::non_null());
///         d.member("score", |e| &e.score, |e| &mut e.score)
///             .with(Keyed::new("Score"));
///         d.callback(OnDeserialized, |e| {
///             e.rank = e.score / 100;
///             Ok(())
///         });
///     }
/// }
/// # vc_mapper::impl_object!(Entry);
/// ```
pub struct TypeDescriptor<T> {
    pub(crate) attributes: AttributeSet,
    pub(crate) members: Vec<MemberDescriptor>,
    pub(crate) callbacks: Vec<CallbackDescriptor>,
    marker: PhantomData<fn() -> T>,
}

impl<T: 'static> TypeDescriptor<T> {
    pub(crate) const fn new() -> Self {
        Self {
            attributes: AttributeSet::new(),
            members: Vec::new(),
            callbacks: Vec::new(),
            marker: PhantomData,
        }
    }

    /// Adds a type-level attribute.
    pub fn attribute<A: Attribute>(&mut self, attribute: A) -> &mut Self {
        self.attributes.push(attribute);
        self
    }

    /// Adds a member. Members keep their declaration order.
    pub fn member<F, G, M>(&mut self, name: &'static str, get: G, get_mut: M) -> AttributeBuilder<'_>
    where
        F: Reflect,
        G: Fn(&T) -> &F + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut F + Send + Sync + 'static,
    {
        self.members.push(MemberDescriptor {
            name,
            attributes: AttributeSet::new(),
            access: Box::new(Accessor {
                get,
                get_mut,
                marker: PhantomData,
            }),
        });
        let index = self.members.len() - 1;
        AttributeBuilder {
            attributes: &mut self.members[index].attributes,
        }
    }

    /// Adds a lifecycle callback.
    ///
    /// The callback runs only if the definition recognises `attribute` as a
    /// callback capability. Callbacks of one point run in declaration order.
    pub fn callback<A, H>(&mut self, attribute: A, hook: H) -> &mut Self
    where
        A: Attribute,
        H: Fn(&mut T) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        let erased = move |target: &mut dyn Reflect| {
            let found = target.type_path();
            match target.as_any_mut().downcast_mut::<T>() {
                Some(target) => hook(target).map_err(MapError::Callback),
                None => Err(MapError::TypeMismatch {
                    expected: type_name::<T>(),
                    found,
                }),
            }
        };
        self.callbacks.push(CallbackDescriptor {
            attribute: Box::new(attribute),
            hook: Box::new(erased),
        });
        self
    }
}

pub(crate) struct VariantDescriptor<E> {
    pub value: E,
    pub name: &'static str,
    pub attributes: AttributeSet,
}

/// Collects the variants of a [`MappedEnum`] type.
pub struct EnumDescriptor<E> {
    pub(crate) attributes: AttributeSet,
    pub(crate) variants: Vec<VariantDescriptor<E>>,
}

impl<E: MappedEnum> EnumDescriptor<E> {
    pub(crate) const fn new() -> Self {
        Self {
            attributes: AttributeSet::new(),
            variants: Vec::new(),
        }
    }

    /// Adds a type-level attribute.
    pub fn attribute<A: Attribute>(&mut self, attribute: A) -> &mut Self {
        self.attributes.push(attribute);
        self
    }

    /// Adds a variant under its declared name.
    pub fn variant(&mut self, value: E, name: &'static str) -> AttributeBuilder<'_> {
        self.variants.push(VariantDescriptor {
            value,
            name,
            attributes: AttributeSet::new(),
        });
        let index = self.variants.len() - 1;
        AttributeBuilder {
            attributes: &mut self.variants[index].attributes,
        }
    }
}

/// Attaches attributes to the member or variant just added.
pub struct AttributeBuilder<'a> {
    attributes: &'a mut AttributeSet,
}

impl AttributeBuilder<'_> {
    #[inline]
    pub fn with<A: Attribute>(self, attribute: A) -> Self {
        self.attributes.push(attribute);
        self
    }
}
