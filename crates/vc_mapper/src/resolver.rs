//! Registry of the concrete types behind each polymorphic base.
//!
//! # Examples
//!
//! ```
//! use vc_mapper::cache::{Mapped, ReflectionCache, TypeDescriptor};
//! use vc_mapper::definition::SerializationDefinition;
//! use vc_mapper::reflect::Object;
//! use vc_mapper::resolver::TypeResolver;
//!
//! trait Shape: Object {}
//! vc_mapper::impl_polymorphic!(dyn Shape);
//!
//! #[derive(Default)]
//! struct Circle;
//!
//! impl Mapped for Circle {
//!     fn describe(_: &mut TypeDescriptor<Self>) {}
//! }
//! vc_mapper::impl_object!(Circle);
//! impl Shape for Circle {}
//!
//! let cache = ReflectionCache::new(SerializationDefinition::standard());
//! let mut resolver = TypeResolver::new();
//! resolver.register::<dyn Shape, Circle>(&cache, |c| c).unwrap();
//!
//! let shape = resolver.construct::<dyn Shape>("Circle").unwrap();
//! assert!(shape.as_any().is::<Circle>());
//! assert!(resolver.register::<dyn Shape, Circle>(&cache, |c| c).is_err());
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::{Any, TypeId, type_name};
use core::fmt;

use crate::cache::{Mapped, ReflectionCache};
use crate::error::{MapError, ResolveError};
use crate::hash::{HashMap, TypeIdMap};
use crate::reflect::{Polymorphic, Reflect};

// -----------------------------------------------------------------------------
// Entries

struct Factory<B: ?Sized>(Box<dyn Fn() -> Box<B> + Send + Sync>);

struct Registration {
    discriminator: String,
    concrete: TypeId,
    concrete_path: &'static str,
    // A `Factory<B>` of the owning base.
    factory: Box<dyn Any + Send + Sync>,
}

struct BaseEntry {
    base_path: &'static str,
    registrations: Vec<Registration>,
    by_discriminator: HashMap<String, usize>,
    by_type: TypeIdMap<usize>,
}

impl BaseEntry {
    fn new(base_path: &'static str) -> Self {
        Self {
            base_path,
            registrations: Vec::new(),
            by_discriminator: HashMap::default(),
            by_type: TypeIdMap::default(),
        }
    }
}

// -----------------------------------------------------------------------------
// TypeResolver

/// Maps discriminators to concrete types, per polymorphic base.
///
/// Filled during setup, then shared read-only by a
/// [`Serializer`](crate::Serializer). Within one base, every discriminator
/// and every concrete type is registered at most once; a concrete type may
/// be registered under several bases.
#[derive(Default)]
pub struct TypeResolver {
    bases: TypeIdMap<BaseEntry>,
}

impl TypeResolver {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `C` under base `B` with the discriminator of its reflection
    /// map: the type-resolve attribute's value, or the short type name.
    ///
    /// `upcast` converts the concrete box into a base box, usually `|c| c`.
    pub fn register<B, C>(
        &mut self,
        cache: &ReflectionCache,
        upcast: fn(Box<C>) -> Box<B>,
    ) -> Result<&mut Self, MapError>
    where
        B: ?Sized + Polymorphic,
        C: Mapped + Reflect,
    {
        let map = cache.get_of::<C>()?;
        self.insert::<B, C>(map.discriminator().into(), upcast)?;
        Ok(self)
    }

    /// Registers `C` under base `B` with an explicit discriminator.
    pub fn register_as<B, C>(
        &mut self,
        discriminator: impl Into<String>,
        upcast: fn(Box<C>) -> Box<B>,
    ) -> Result<&mut Self, ResolveError>
    where
        B: ?Sized + Polymorphic,
        C: Mapped + Reflect,
    {
        self.insert::<B, C>(discriminator.into(), upcast)?;
        Ok(self)
    }

    fn insert<B, C>(
        &mut self,
        discriminator: String,
        upcast: fn(Box<C>) -> Box<B>,
    ) -> Result<(), ResolveError>
    where
        B: ?Sized + Polymorphic,
        C: Mapped + Reflect,
    {
        let base_path = type_name::<B>();
        let entry = self
            .bases
            .entry(TypeId::of::<B>())
            .or_insert_with(|| BaseEntry::new(base_path));

        if entry.by_type.contains_key(&TypeId::of::<C>()) {
            return Err(ResolveError::DuplicateType {
                base: base_path,
                concrete: type_name::<C>(),
            });
        }
        if entry.by_discriminator.contains_key(discriminator.as_str()) {
            return Err(ResolveError::DuplicateDiscriminator {
                base: base_path,
                discriminator,
            });
        }

        log::debug!(
            "registering `{}` under `{base_path}` as `{discriminator}`",
            type_name::<C>(),
        );

        let factory: Factory<B> = Factory(Box::new(move || upcast(Box::<C>::default())));
        let index = entry.registrations.len();
        entry.by_discriminator.insert(discriminator.clone(), index);
        entry.by_type.insert(TypeId::of::<C>(), index);
        entry.registrations.push(Registration {
            discriminator,
            concrete: TypeId::of::<C>(),
            concrete_path: type_name::<C>(),
            factory: Box::new(factory),
        });
        Ok(())
    }

    /// Creates a default instance of the type registered under
    /// `discriminator`.
    pub fn construct<B: ?Sized + Polymorphic>(
        &self,
        discriminator: &str,
    ) -> Result<Box<B>, ResolveError> {
        let base_path = type_name::<B>();
        let entry = self
            .bases
            .get(&TypeId::of::<B>())
            .ok_or(ResolveError::UnregisteredBase { base: base_path })?;

        let registration = entry
            .by_discriminator
            .get(discriminator)
            .map(|&index| &entry.registrations[index])
            .ok_or_else(|| ResolveError::UnregisteredDiscriminator {
                base: base_path,
                discriminator: discriminator.into(),
            })?;

        match registration.factory.downcast_ref::<Factory<B>>() {
            Some(factory) => Ok((factory.0)()),
            None => Err(ResolveError::UnregisteredBase { base: base_path }),
        }
    }

    /// Returns the concrete type registered under `discriminator`.
    pub fn concrete_of(&self, base: TypeId, discriminator: &str) -> Option<TypeId> {
        let entry = self.bases.get(&base)?;
        let index = *entry.by_discriminator.get(discriminator)?;
        Some(entry.registrations[index].concrete)
    }

    /// Returns the discriminator `concrete` is registered under.
    pub fn discriminator_of(&self, base: TypeId, concrete: TypeId) -> Option<&str> {
        let entry = self.bases.get(&base)?;
        let index = *entry.by_type.get(&concrete)?;
        Some(&entry.registrations[index].discriminator)
    }

    /// Iterates the `(discriminator, type path)` pairs registered under
    /// `base`, in registration order.
    pub fn registrations(&self, base: TypeId) -> impl Iterator<Item = (&str, &'static str)> {
        self.bases
            .get(&base)
            .into_iter()
            .flat_map(|entry| &entry.registrations)
            .map(|registration| (registration.discriminator.as_str(), registration.concrete_path))
    }
}

impl fmt::Debug for TypeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for entry in self.bases.values() {
            let names: Vec<_> = entry
                .registrations
                .iter()
                .map(|registration| registration.discriminator.as_str())
                .collect();
            map.entry(&entry.base_path, &names);
        }
        map.finish()
    }
}
