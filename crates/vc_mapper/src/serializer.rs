//! The entry point: converts values to nodes and back.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use vc_mapper::attributes::standard::Keyed;
//! use vc_mapper::cache::{Mapped, ReflectionCache, TypeDescriptor};
//! use vc_mapper::definition::SerializationDefinition;
//! use vc_mapper::resolver::TypeResolver;
//! use vc_mapper::{Node, Serializer};
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
//!         d.member("level", |p| &p.level, |p| &mut p.level)
//!             .with(Keyed::new("Level"));
//!     }
//! }
//! vc_mapper::impl_object!(Player);
//!
//! let cache = Arc::new(ReflectionCache::new(SerializationDefinition::standard()));
//! let serializer = Serializer::new(cache, TypeResolver::new());
//!
//! let mut player = Player { name: "ada".into(), level: 3 };
//! let node = serializer.serialize(&mut player).unwrap();
//! assert_eq!(node.get_name("Level"), Some(&Node::Int(3)));
//!
//! let back: Player = serializer.deserialize(&node).unwrap();
//! assert_eq!(back.name, "ada");
//! ```

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Write;

use crate::cache::{MemberInfo, ReflectionCache};
use crate::definition::SerializationDefinition;
use crate::error::MapError;
use crate::node::{Key, Node};
use crate::processor::{deserialize_builtin, serialize_builtin};
use crate::reflect::Reflect;
use crate::resolver::TypeResolver;

// -----------------------------------------------------------------------------
// Serializer

/// Serializes and deserializes reflected values under one definition.
///
/// `Send + Sync`; calls on independent values may run concurrently.
#[derive(Debug)]
pub struct Serializer {
    cache: Arc<ReflectionCache>,
    resolver: Arc<TypeResolver>,
}

impl Serializer {
    /// Creates a serializer. Register every polymorphic type on `resolver`
    /// before handing it over.
    pub fn new(cache: impl Into<Arc<ReflectionCache>>, resolver: impl Into<Arc<TypeResolver>>) -> Self {
        Self {
            cache: cache.into(),
            resolver: resolver.into(),
        }
    }

    #[inline]
    pub fn definition(&self) -> &SerializationDefinition {
        self.cache.definition()
    }

    #[inline]
    pub fn cache(&self) -> &Arc<ReflectionCache> {
        &self.cache
    }

    #[inline]
    pub fn resolver(&self) -> &Arc<TypeResolver> {
        &self.resolver
    }

    /// Converts `value` into a node.
    ///
    /// Takes `value` mutably because pre-serialize callbacks may update it.
    pub fn serialize(&self, value: &mut dyn Reflect) -> Result<Node, MapError> {
        SerializeContext::new(self).serialize_value(value, None)
    }

    /// Creates a default `T` and fills it from `node`.
    pub fn deserialize<T: Reflect + Default>(&self, node: &Node) -> Result<T, MapError> {
        let mut value = T::default();
        self.deserialize_onto(node, &mut value)?;
        Ok(value)
    }

    /// Fills the existing `target` from `node`.
    ///
    /// Nested objects, list elements, dict entries and polymorphic values of
    /// the right concrete type are updated in place rather than replaced.
    pub fn deserialize_onto(&self, node: &Node, target: &mut dyn Reflect) -> Result<(), MapError> {
        DeserializeContext::new(self).deserialize_value(node, target, None)
    }
}

// -----------------------------------------------------------------------------
// NodePath

#[derive(Debug, Default)]
struct NodePath(Vec<Key>);

impl NodePath {
    fn render(&self) -> String {
        if self.0.is_empty() {
            return String::from("/");
        }
        let mut path = String::new();
        for key in &self.0 {
            let _ = write!(path, "/{key}");
        }
        path
    }
}

// -----------------------------------------------------------------------------
// SerializeContext

/// State of one serialize call, passed through the processor chain.
pub struct SerializeContext<'a> {
    serializer: &'a Serializer,
    path: NodePath,
}

impl<'a> SerializeContext<'a> {
    fn new(serializer: &'a Serializer) -> Self {
        Self {
            serializer,
            path: NodePath::default(),
        }
    }

    #[inline]
    pub fn serializer(&self) -> &'a Serializer {
        self.serializer
    }

    /// Descends into the child stored under `key`.
    #[inline]
    pub fn enter(&mut self, key: Key) {
        self.path.0.push(key);
    }

    /// Returns from the innermost child.
    #[inline]
    pub fn leave(&mut self) {
        self.path.0.pop();
    }

    /// Returns the current position, such as `/Entries/1/Name`.
    pub fn path(&self) -> String {
        self.path.render()
    }

    /// Runs `value` through the processors of the definition, then through
    /// the built-in stage.
    pub fn serialize_value(
        &mut self,
        value: &mut dyn Reflect,
        member: Option<&MemberInfo>,
    ) -> Result<Node, MapError> {
        let serializer = self.serializer;
        for processor in serializer.definition().processors() {
            if let Some(result) = processor.try_serialize(value, member, self) {
                return result;
            }
        }
        serialize_builtin(value, member, self)
    }
}

// -----------------------------------------------------------------------------
// DeserializeContext

/// State of one deserialize call, passed through the processor chain.
pub struct DeserializeContext<'a> {
    serializer: &'a Serializer,
    path: NodePath,
}

impl<'a> DeserializeContext<'a> {
    fn new(serializer: &'a Serializer) -> Self {
        Self {
            serializer,
            path: NodePath::default(),
        }
    }

    #[inline]
    pub fn serializer(&self) -> &'a Serializer {
        self.serializer
    }

    #[inline]
    pub fn enter(&mut self, key: Key) {
        self.path.0.push(key);
    }

    #[inline]
    pub fn leave(&mut self) {
        self.path.0.pop();
    }

    pub fn path(&self) -> String {
        self.path.render()
    }

    /// Returns the error for `found` not having the expected shape.
    pub fn shape_error(&self, expected: &'static str, found: &Node) -> MapError {
        MapError::Shape {
            path: self.path(),
            expected,
            found: found.kind(),
        }
    }

    /// Runs `node` through the processors of the definition, then through
    /// the built-in stage.
    pub fn deserialize_value(
        &mut self,
        node: &Node,
        target: &mut dyn Reflect,
        member: Option<&MemberInfo>,
    ) -> Result<(), MapError> {
        let serializer = self.serializer;
        for processor in serializer.definition().processors() {
            if let Some(result) = processor.try_deserialize(node, target, member, self) {
                return result;
            }
        }
        deserialize_builtin(node, target, member, self)
    }
}
