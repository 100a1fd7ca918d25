use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;

use super::{Object, Reflect, Resolvable};
use crate::error::ResolveError;
use crate::resolver::TypeResolver;

// -----------------------------------------------------------------------------
// Polymorphic

/// A base type for polymorphic members, usually `dyn Trait` with
/// `Trait: Object`.
///
/// Implement it with [`impl_polymorphic!`](crate::impl_polymorphic).
pub trait Polymorphic: Send + Sync + 'static {
    fn as_object(&self) -> &dyn Object;

    fn as_object_mut(&mut self) -> &mut dyn Object;

    /// Instance used when a node carries no discriminator.
    ///
    /// Abstract bases return `None`.
    fn fallback() -> Option<Box<Self>> {
        None
    }
}

// -----------------------------------------------------------------------------
// Poly

/// Holder of a polymorphic value.
///
/// Serializes as the concrete type's members plus its discriminator, and
/// deserializes into whichever concrete type the discriminator names. An
/// empty holder is null.
///
/// # Examples
///
/// ```
/// use vc_mapper::cache::{Mapped, TypeDescriptor};
/// use vc_mapper::reflect::{Object, Poly};
///
/// trait Shape: Object {}
/// vc_mapper::impl_polymorphic!(dyn Shape);
///
/// #[derive(Default)]
/// struct Circle;
///
/// impl Mapped for Circle {
///     fn describe(_: &mut TypeDescriptor<Self>) {}
/// }
/// vc_mapper::impl_object!(Circle);
/// impl Shape for Circle {}
///
/// let shape: Poly<dyn Shape> = Poly::new(Box::new(Circle));
/// assert!(shape.downcast_ref::<Circle>().is_some());
/// ```
pub struct Poly<B: ?Sized + Polymorphic>(Option<Box<B>>);

impl<B: ?Sized + Polymorphic> Poly<B> {
    #[inline]
    pub const fn empty() -> Self {
        Self(None)
    }

    #[inline]
    pub fn new(value: Box<B>) -> Self {
        Self(Some(value))
    }

    #[inline]
    pub fn get(&self) -> Option<&B> {
        self.0.as_deref()
    }

    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut B> {
        self.0.as_deref_mut()
    }

    #[inline]
    pub fn set(&mut self, value: Box<B>) {
        self.0 = Some(value);
    }

    #[inline]
    pub fn take(&mut self) -> Option<Box<B>> {
        self.0.take()
    }

    #[inline]
    pub const fn is_some(&self) -> bool {
        self.0.is_some()
    }

    /// Returns the held value if its concrete type is `C`.
    pub fn downcast_ref<C: Reflect>(&self) -> Option<&C> {
        self.get()
            .and_then(|value| value.as_object().as_any().downcast_ref::<C>())
    }

    /// Returns the held value if its concrete type is `C`.
    pub fn downcast_mut<C: Reflect>(&mut self) -> Option<&mut C> {
        self.get_mut()
            .and_then(|value| value.as_object_mut().as_any_mut().downcast_mut::<C>())
    }
}

impl<B: ?Sized + Polymorphic> Default for Poly<B> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<B: ?Sized + Polymorphic> From<Box<B>> for Poly<B> {
    #[inline]
    fn from(value: Box<B>) -> Self {
        Self::new(value)
    }
}

impl<B: ?Sized + Polymorphic> fmt::Debug for Poly<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => write!(f, "Poly({})", value.as_object().type_path()),
            None => f.write_str("Poly(None)"),
        }
    }
}

// -----------------------------------------------------------------------------
// Reflect

impl<B: ?Sized + Polymorphic> Reflect for Poly<B> {
    crate::__impl_reflect_cast_fn!(Poly);

    #[inline]
    fn is_null(&self) -> bool {
        self.0.is_none()
    }
}

impl<B: ?Sized + Polymorphic> Resolvable for Poly<B> {
    #[inline]
    fn base_type_id(&self) -> TypeId {
        TypeId::of::<B>()
    }

    #[inline]
    fn base_type_path(&self) -> &'static str {
        core::any::type_name::<B>()
    }

    #[inline]
    fn object(&self) -> Option<&dyn Object> {
        self.get().map(B::as_object)
    }

    #[inline]
    fn object_mut(&mut self) -> Option<&mut dyn Object> {
        self.get_mut().map(B::as_object_mut)
    }

    #[inline]
    fn clear(&mut self) {
        self.0 = None;
    }

    fn install(&mut self, resolver: &TypeResolver, discriminator: &str) -> Result<(), ResolveError> {
        self.0 = Some(resolver.construct::<B>(discriminator)?);
        Ok(())
    }

    fn install_fallback(&mut self) -> bool {
        match B::fallback() {
            Some(value) => {
                self.0 = Some(value);
                true
            }
            None => false,
        }
    }
}
