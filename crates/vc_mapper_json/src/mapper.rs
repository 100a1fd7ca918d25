use alloc::string::String;
use alloc::sync::Arc;

use serde_json::Value;
use vc_mapper::cache::ReflectionCache;
use vc_mapper::definition::SerializationDefinition;
use vc_mapper::processor::EnumProcessor;
use vc_mapper::resolver::TypeResolver;
use vc_mapper::{MapError, Node, Reflect, Serializer};

use crate::attributes::{
    JsonArray, JsonEnumValue, JsonIndex, JsonObject, JsonProperty, JsonRequired, JsonType,
    OnDeserialized, OnSerializing,
};
use crate::error::JsonError;

/// Property a polymorphic value's discriminator is written under.
pub const TYPE_PROPERTY: &str = "$type";

/// The definition recognising the [`attributes`](crate::attributes) of this
/// crate. Enums are written as strings.
pub fn definition() -> SerializationDefinition {
    SerializationDefinition::builder("json")
        .keyed::<JsonProperty>()
        .indexed::<JsonIndex>()
        .lookup_object::<JsonObject>()
        .index_object::<JsonArray>()
        .type_resolve::<JsonType>()
        .required::<JsonRequired>()
        .callback::<OnSerializing>()
        .callback::<OnDeserialized>()
        .enum_name::<JsonEnumValue>()
        .processor(EnumProcessor)
        .type_key(TYPE_PROPERTY)
        .build()
}

// -----------------------------------------------------------------------------
// JsonMapper

/// Reads and writes JSON text through a [`Serializer`] built on
/// [`definition`].
#[derive(Debug)]
pub struct JsonMapper {
    serializer: Serializer,
}

impl JsonMapper {
    /// Creates a mapper without polymorphic types.
    pub fn new() -> Self {
        Self {
            serializer: Serializer::new(ReflectionCache::new(definition()), TypeResolver::new()),
        }
    }

    /// Creates a mapper, letting `register` fill the type resolver.
    ///
    /// ```
    /// use vc_mapper::cache::{Mapped, TypeDescriptor};
    /// use vc_mapper::reflect::Object;
    /// use vc_mapper_json::JsonMapper;
    ///
    /// trait Animal: Object {}
    /// vc_mapper::impl_polymorphic!(dyn Animal);
    ///
    /// #[derive(Default)]
    /// struct Cat;
    ///
    /// impl Mapped for Cat {
    ///     fn describe(_: &mut TypeDescriptor<Self>) {}
    /// }
    /// vc_mapper::impl_object!(Cat);
    /// impl Animal for Cat {}
    ///
    /// let mapper = JsonMapper::with_types(|cache, resolver| {
    ///     resolver.register::<dyn Animal, Cat>(cache, |c| c)?;
    ///     Ok(())
    /// })
    /// .unwrap();
    /// # let _ = mapper;
    /// ```
    pub fn with_types<F>(register: F) -> Result<Self, MapError>
    where
        F: FnOnce(&ReflectionCache, &mut TypeResolver) -> Result<(), MapError>,
    {
        let cache = Arc::new(ReflectionCache::new(definition()));
        let mut resolver = TypeResolver::new();
        register(&cache, &mut resolver)?;
        Ok(Self {
            serializer: Serializer::new(cache, resolver),
        })
    }

    /// Wraps a serializer built on any definition.
    #[inline]
    pub fn from_serializer(serializer: Serializer) -> Self {
        Self { serializer }
    }

    #[inline]
    pub fn serializer(&self) -> &Serializer {
        &self.serializer
    }

    // -------------------------------------------------------------------------
    // Writing

    pub fn to_value(&self, value: &mut dyn Reflect) -> Result<Value, JsonError> {
        let node = self.serializer.serialize(value)?;
        Ok(serde_json::to_value(&node)?)
    }

    /// Writes `value` as compact JSON text.
    pub fn to_string(&self, value: &mut dyn Reflect) -> Result<String, JsonError> {
        let node = self.serializer.serialize(value)?;
        Ok(serde_json::to_string(&node)?)
    }

    /// Writes `value` as indented JSON text.
    pub fn to_string_pretty(&self, value: &mut dyn Reflect) -> Result<String, JsonError> {
        let node = self.serializer.serialize(value)?;
        Ok(serde_json::to_string_pretty(&node)?)
    }

    // -------------------------------------------------------------------------
    // Reading

    pub fn from_value<T: Reflect + Default>(&self, value: Value) -> Result<T, JsonError> {
        let node: Node = serde_json::from_value(value)?;
        Ok(self.serializer.deserialize(&node)?)
    }

    /// Parses `text` into a default `T`.
    pub fn from_str<T: Reflect + Default>(&self, text: &str) -> Result<T, JsonError> {
        let node: Node = serde_json::from_str(text)?;
        Ok(self.serializer.deserialize(&node)?)
    }

    /// Parses `text` into the existing `target`, updating nested instances
    /// in place.
    pub fn from_str_onto(&self, text: &str, target: &mut dyn Reflect) -> Result<(), JsonError> {
        let node: Node = serde_json::from_str(text)?;
        self.serializer.deserialize_onto(&node, target)?;
        Ok(())
    }
}

impl Default for JsonMapper {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
