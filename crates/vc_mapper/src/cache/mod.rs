//! Per-type reflection maps, built once and shared.
//!
//! A type describes itself once through [`Mapped`] or [`MappedEnum`]. The
//! [`ReflectionCache`] turns that description into a [`ReflectionMap`] the
//! first time the type is seen, resolving every attribute against the
//! cache's [`SerializationDefinition`], and hands out the same
//! `Arc<ReflectionMap>` from then on.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use vc_mapper::attributes::standard::Keyed;
//! use vc_mapper::cache::{Capability, Mapped, ReflectionCache, TypeDescriptor, TypeHandle};
//! use vc_mapper::definition::SerializationDefinition;
//!
//! #[derive(Default)]
//! struct Player {
//!     name: String,
//!     level: u32,
//! }
//!
//! impl Mapped for Player {
//!     fn describe(d: &mut TypeDescriptor<Self>) {
//!         d.member("name", |p| &p.name, |p| &mut p.name)
//!             .with(Keyed::new("Name"));
//!         d.member("level", |p| &p.level, |p| &mut p.level);
//!     }
//! }
//! vc_mapper::impl_object!(Player);
//!
//! let cache = ReflectionCache::new(SerializationDefinition::standard());
//! let map = cache.get(&TypeHandle::of::<Player>()).unwrap();
//!
//! assert_eq!(map.members().len(), 2);
//! assert_eq!(map.members_with(Capability::Keyed).count(), 1);
//! assert!(Arc::ptr_eq(&map, &cache.get(&TypeHandle::of::<Player>()).unwrap()));
//! ```

// -----------------------------------------------------------------------------
// Modules

mod build;
mod descriptor;
mod map;

// -----------------------------------------------------------------------------
// Exports

pub use descriptor::{
    AttributeBuilder, EnumDescriptor, Mapped, MappedEnum, MemberAccess, TypeDescriptor,
};
pub use map::{
    CallbackInfo, Capability, MemberInfo, ObjectShape, Placement, ReflectionMap, VariantInfo,
};

use alloc::sync::Arc;
use core::any::{TypeId, type_name};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::definition::SerializationDefinition;
use crate::error::{CacheBuildError, MapError};
use crate::hash::TypeIdMap;

// -----------------------------------------------------------------------------
// TypeHandle

type BuildFn = fn(&SerializationDefinition) -> Result<ReflectionMap, CacheBuildError>;

/// Identifies a describable type and knows how to build its map.
#[derive(Clone, Copy)]
pub struct TypeHandle {
    type_id: TypeId,
    type_path: &'static str,
    build: BuildFn,
}

impl TypeHandle {
    /// Handle of an object type.
    #[inline]
    pub fn of<T: Mapped>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: type_name::<T>(),
            build: build::build_object::<T>,
        }
    }

    /// Handle of an enum type.
    #[inline]
    pub fn of_enum<E: MappedEnum>() -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            type_path: type_name::<E>(),
            build: build::build_enum::<E>,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }
}

impl PartialEq for TypeHandle {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeHandle").field(&self.type_path).finish()
    }
}

// -----------------------------------------------------------------------------
// ReflectionCache

type Slot = Arc<OnceLock<Result<Arc<ReflectionMap>, CacheBuildError>>>;

/// Lazily built, reference-stable reflection maps for one definition.
///
/// The table is behind a [`RwLock`], but every type gets its own
/// [`OnceLock`] cell: concurrent first lookups of one type wait for a single
/// build, and lookups of already built types only take the read lock long
/// enough to clone the cell.
///
/// A failed build is cached too. Later lookups of that type return the same
/// error without describing the type again; other types are unaffected.
pub struct ReflectionCache {
    definition: Arc<SerializationDefinition>,
    slots: RwLock<TypeIdMap<Slot>>,
    builds: AtomicUsize,
}

impl ReflectionCache {
    pub fn new(definition: impl Into<Arc<SerializationDefinition>>) -> Self {
        Self {
            definition: definition.into(),
            slots: RwLock::new(TypeIdMap::default()),
            builds: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub fn definition(&self) -> &Arc<SerializationDefinition> {
        &self.definition
    }

    /// Returns the map of the type behind `handle`, building it on first
    /// access.
    pub fn get(&self, handle: &TypeHandle) -> Result<Arc<ReflectionMap>, MapError> {
        let slot = self.slot(handle.type_id);

        let mut built = false;
        let result = slot.get_or_init(|| {
            built = true;
            self.builds.fetch_add(1, Ordering::Relaxed);
            log::debug!(
                "building reflection map of `{}` for definition `{}`",
                handle.type_path,
                self.definition.name(),
            );
            (handle.build)(&self.definition).map(Arc::new)
        });

        match result {
            Ok(map) => Ok(Arc::clone(map)),
            Err(error) => {
                if !built {
                    log::warn!("serving cached build failure of `{}`: {error}", handle.type_path);
                }
                Err(error.clone().into())
            }
        }
    }

    /// Returns the map of object type `T`.
    #[inline]
    pub fn get_of<T: Mapped>(&self) -> Result<Arc<ReflectionMap>, MapError> {
        self.get(&TypeHandle::of::<T>())
    }

    /// Returns the map of enum type `E`.
    #[inline]
    pub fn get_enum<E: MappedEnum>(&self) -> Result<Arc<ReflectionMap>, MapError> {
        self.get(&TypeHandle::of_enum::<E>())
    }

    /// Returns how many maps have been built, failed builds included.
    #[inline]
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    /// Returns `true` if a build of `type_id` has been attempted.
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .is_some_and(|slot| slot.get().is_some())
    }

    fn slot(&self, type_id: TypeId) -> Slot {
        let found = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .cloned();

        match found {
            Some(slot) => slot,
            None => Arc::clone(
                self.slots
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .entry(type_id)
                    .or_default(),
            ),
        }
    }
}

impl fmt::Debug for ReflectionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectionCache")
            .field("definition", &self.definition.name())
            .field("builds", &self.build_count())
            .finish_non_exhaustive()
    }
}
