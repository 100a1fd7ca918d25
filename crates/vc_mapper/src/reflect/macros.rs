// -----------------------------------------------------------------------------
// Internal

/// Implements the shape casting methods of [`Reflect`] for kind `$kind`.
///
/// [`Reflect`]: crate::reflect::Reflect
#[doc(hidden)]
#[macro_export]
macro_rules! __impl_reflect_cast_fn {
    ($kind:ident) => {
        #[inline]
        fn as_any(&self) -> &dyn ::core::any::Any {
            self
        }

        #[inline]
        fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
            self
        }

        #[inline]
        fn type_path(&self) -> &'static str {
            ::core::any::type_name::<Self>()
        }

        #[inline]
        fn reflect_kind(&self) -> $crate::reflect::ReflectKind {
            $crate::reflect::ReflectKind::$kind
        }

        #[inline]
        fn reflect_ref(&self) -> $crate::reflect::ReflectRef<'_> {
            $crate::reflect::ReflectRef::$kind(self)
        }

        #[inline]
        fn reflect_mut(&mut self) -> $crate::reflect::ReflectMut<'_> {
            $crate::reflect::ReflectMut::$kind(self)
        }
    };
}

// -----------------------------------------------------------------------------
// Public

/// Implements [`Reflect`] and [`Object`] for a [`Mapped`] type.
///
/// # Examples
///
/// ```
/// use vc_mapper::attributes::standard::Keyed;
/// use vc_mapper::cache::{Mapped, TypeDescriptor};
///
/// #[derive(Default)]
/// struct Player {
///     name: String,
/// }
///
/// impl Mapped for Player {
///     fn describe(d: &mut TypeDescriptor<Self>) {
///         d.member("name", |p| &p.name, |p| &mut p.name)
///             .with(Keyed::new("Name"));
///     }
/// }
///
/// vc_mapper::impl_object!(Player);
/// ```
///
/// [`Reflect`]: crate::reflect::Reflect
/// [`Object`]: crate::reflect::Object
/// [`Mapped`]: crate::cache::Mapped
#[macro_export]
macro_rules! impl_object {
    ($ty:ty) => {
        impl $crate::reflect::Reflect for $ty {
            $crate::__impl_reflect_cast_fn!(Object);
        }

        impl $crate::reflect::Object for $ty {
            #[inline]
            fn type_handle(&self) -> $crate::cache::TypeHandle {
                $crate::cache::TypeHandle::of::<Self>()
            }
        }
    };
}

/// Implements [`Reflect`] and [`Enum`] for a [`MappedEnum`] type.
///
/// # Examples
///
/// ```
/// use vc_mapper::cache::{EnumDescriptor, MappedEnum};
///
/// #[derive(Clone, Copy, Default)]
/// enum Medal {
///     #[default]
///     Bronze,
///     Gold,
/// }
///
/// impl MappedEnum for Medal {
///     fn describe(d: &mut EnumDescriptor<Self>) {
///         d.variant(Medal::Bronze, "Bronze");
///         d.variant(Medal::Gold, "Gold");
///     }
///
///     fn to_value(self) -> i64 {
///         self as i64
///     }
/// }
///
/// vc_mapper::impl_enum!(Medal);
/// ```
///
/// [`Reflect`]: crate::reflect::Reflect
/// [`Enum`]: crate::reflect::Enum
/// [`MappedEnum`]: crate::cache::MappedEnum
#[macro_export]
macro_rules! impl_enum {
    ($ty:ty) => {
        impl $crate::reflect::Reflect for $ty {
            $crate::__impl_reflect_cast_fn!(Enum);
        }

        impl $crate::reflect::Enum for $ty {
            #[inline]
            fn type_handle(&self) -> $crate::cache::TypeHandle {
                $crate::cache::TypeHandle::of_enum::<Self>()
            }

            #[inline]
            fn value(&self) -> i64 {
                <Self as $crate::cache::MappedEnum>::to_value(*self)
            }

            fn set_variant(&mut self, variant: &$crate::cache::VariantInfo) -> bool {
                match variant.instance::<Self>() {
                    Some(value) => {
                        *self = value;
                        true
                    }
                    None => false,
                }
            }
        }
    };
}

/// Implements [`Polymorphic`] for a trait object whose trait extends
/// [`Object`].
///
/// An optional `fallback` names a concrete type used when a node carries no
/// discriminator.
///
/// # Examples
///
/// ```
/// use vc_mapper::reflect::Object;
///
/// trait Shape: Object {}
///
/// vc_mapper::impl_polymorphic!(dyn Shape);
/// ```
///
/// [`Polymorphic`]: crate::reflect::Polymorphic
/// [`Object`]: crate::reflect::Object
#[macro_export]
macro_rules! impl_polymorphic {
    (@impl $ty:ty, { $($body:tt)* }) => {
        impl $crate::reflect::Polymorphic for $ty {
            #[inline]
            fn as_object(&self) -> &dyn $crate::reflect::Object {
                self
            }

            #[inline]
            fn as_object_mut(&mut self) -> &mut dyn $crate::reflect::Object {
                self
            }

            $($body)*
        }
    };
    ($ty:ty) => {
        $crate::impl_polymorphic!(@impl $ty, {});
    };
    ($ty:ty, fallback = $fallback:ty) => {
        $crate::impl_polymorphic!(@impl $ty, {
            fn fallback() -> ::core::option::Option<$crate::__private::Box<Self>> {
                let fallback: $crate::__private::Box<Self> =
                    $crate::__private::Box::new(<$fallback as ::core::default::Default>::default());
                ::core::option::Option::Some(fallback)
            }
        });
    };
}
