//! Which attributes mean what, for one format.
//!
//! A [`SerializationDefinition`] is the only wiring a format needs: it names
//! the attribute types that satisfy each capability, the primitive types that
//! pass through unchanged, the processors tried before the default stage and
//! the reserved key the discriminator of a polymorphic value is written
//! under.
//!
//! # Examples
//!
//! ```
//! use vc_mapper::Key;
//! use vc_mapper::attributes::KeyedCapability;
//! use vc_mapper::definition::SerializationDefinition;
//!
//! #[derive(Debug)]
//! struct Field(&'static str);
//!
//! impl KeyedCapability for Field {
//!     fn key(&self) -> Key {
//!         Key::name(self.0)
//!     }
//! }
//!
//! let definition = SerializationDefinition::builder("custom")
//!     .keyed::<Field>()
//!     .type_key("kind")
//!     .build();
//!
//! assert_eq!(definition.key_of(&Field("id")), Some(Key::name("id")));
//! assert_eq!(definition.type_key(), &Key::name("kind"));
//! assert!(definition.is_primitive(core::any::TypeId::of::<String>()));
//! ```

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use crate::Key;
use crate::attributes::standard::{
    EnumName, IndexObject, Indexed, Keyed, LookupObject, OnDeserialized, OnSerialize, Required,
    TypeResolve,
};
use crate::attributes::{
    Attribute, CallbackCapability, CallbackPoint, EnumNameCapability, IndexedCapability,
    KeyedCapability, RequiredCapability, TypeResolveCapability, TypeResolveParameter,
};
use crate::hash::{TypeIdMap, TypeIdSet};
use crate::processor::{EnumProcessor, Processor};
use crate::reflect::{Primitive, Reflect};

/// Reserved key of the discriminator unless a definition sets another one.
pub const DEFAULT_TYPE_KEY: &str = "$type";

// -----------------------------------------------------------------------------
// Capability readers

type Reader<R> = fn(&dyn Attribute) -> Option<R>;

fn read_key<T: KeyedCapability>(attribute: &dyn Attribute) -> Option<Key> {
    attribute.downcast_ref::<T>().map(KeyedCapability::key)
}

fn read_index<T: IndexedCapability>(attribute: &dyn Attribute) -> Option<usize> {
    attribute.downcast_ref::<T>().map(IndexedCapability::index)
}

fn read_type_resolve<T: TypeResolveCapability>(
    attribute: &dyn Attribute,
) -> Option<TypeResolveParameter> {
    attribute
        .downcast_ref::<T>()
        .map(|attribute| TypeResolveParameter {
            discriminator: attribute.discriminator().map(|d| Cow::Owned(String::from(d))),
            key: attribute.key(),
        })
}

fn read_required<T: RequiredCapability>(attribute: &dyn Attribute) -> Option<bool> {
    attribute
        .downcast_ref::<T>()
        .map(RequiredCapability::null_check)
}

fn read_callback<T: CallbackCapability>(attribute: &dyn Attribute) -> Option<CallbackPoint> {
    attribute.downcast_ref::<T>().map(CallbackCapability::point)
}

fn read_enum_name<T: EnumNameCapability>(attribute: &dyn Attribute) -> Option<String> {
    attribute
        .downcast_ref::<T>()
        .map(|attribute| String::from(attribute.name()))
}

// -----------------------------------------------------------------------------
// SerializationDefinition

/// The capability configuration of one format.
///
/// Immutable once built. Share it between caches with an `Arc`.
pub struct SerializationDefinition {
    name: Cow<'static, str>,
    primitives: TypeIdSet,
    keyed: TypeIdMap<Reader<Key>>,
    indexed: TypeIdMap<Reader<usize>>,
    lookup_object: TypeIdSet,
    index_object: TypeIdSet,
    type_resolve: TypeIdMap<Reader<TypeResolveParameter>>,
    required: TypeIdMap<Reader<bool>>,
    callback: TypeIdMap<Reader<CallbackPoint>>,
    enum_name: TypeIdMap<Reader<String>>,
    processors: Vec<Box<dyn Processor>>,
    type_key: Key,
}

impl SerializationDefinition {
    /// Starts a definition with the default primitive set, no recognised
    /// attributes, no processors and [`DEFAULT_TYPE_KEY`].
    #[inline]
    pub fn builder(name: impl Into<Cow<'static, str>>) -> DefinitionBuilder {
        DefinitionBuilder::new(name.into())
    }

    /// The definition recognising [`standard`](crate::attributes::standard)
    /// attributes, with the enum processor installed.
    pub fn standard() -> Self {
        Self::builder("standard")
            .keyed::<Keyed>()
            .indexed::<Indexed>()
            .lookup_object::<LookupObject>()
            .index_object::<IndexObject>()
            .type_resolve::<TypeResolve>()
            .required::<Required>()
            .callback::<OnSerialize>()
            .callback::<OnDeserialized>()
            .enum_name::<EnumName>()
            .processor(EnumProcessor)
            .build()
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if values of `type_id` pass through unchanged.
    #[inline]
    pub fn is_primitive(&self, type_id: TypeId) -> bool {
        self.primitives.contains(&type_id)
    }

    /// Returns the processors in priority order.
    #[inline]
    pub fn processors(&self) -> &[Box<dyn Processor>] {
        &self.processors
    }

    /// Returns the reserved key of the discriminator.
    #[inline]
    pub fn type_key(&self) -> &Key {
        &self.type_key
    }

    /// Returns the key if `attribute` is a recognised keyed attribute.
    pub fn key_of(&self, attribute: &dyn Attribute) -> Option<Key> {
        read(&self.keyed, attribute)
    }

    /// Returns the position if `attribute` is a recognised indexed attribute.
    pub fn index_of(&self, attribute: &dyn Attribute) -> Option<usize> {
        read(&self.indexed, attribute)
    }

    pub fn is_lookup_object(&self, attribute: &dyn Attribute) -> bool {
        self.lookup_object.contains(&attribute.attribute_type_id())
    }

    pub fn is_index_object(&self, attribute: &dyn Attribute) -> bool {
        self.index_object.contains(&attribute.attribute_type_id())
    }

    pub fn type_resolve_of(&self, attribute: &dyn Attribute) -> Option<TypeResolveParameter> {
        read(&self.type_resolve, attribute)
    }

    /// Returns the null-check flag if `attribute` is a recognised required
    /// attribute.
    pub fn required_of(&self, attribute: &dyn Attribute) -> Option<bool> {
        read(&self.required, attribute)
    }

    pub fn callback_of(&self, attribute: &dyn Attribute) -> Option<CallbackPoint> {
        read(&self.callback, attribute)
    }

    /// Returns the override string if `attribute` is a recognised enum-name
    /// attribute.
    pub fn enum_name_of(&self, attribute: &dyn Attribute) -> Option<String> {
        read(&self.enum_name, attribute)
    }
}

#[inline]
fn read<R>(table: &TypeIdMap<Reader<R>>, attribute: &dyn Attribute) -> Option<R> {
    table
        .get(&attribute.attribute_type_id())
        .and_then(|reader| reader(attribute))
}

impl fmt::Debug for SerializationDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializationDefinition")
            .field("name", &self.name)
            .field("primitives", &self.primitives.len())
            .field("processors", &self.processors.len())
            .field("type_key", &self.type_key)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// DefinitionBuilder

/// Builder of a [`SerializationDefinition`].
pub struct DefinitionBuilder {
    definition: SerializationDefinition,
}

impl DefinitionBuilder {
    fn new(name: Cow<'static, str>) -> Self {
        let mut builder = Self {
            definition: SerializationDefinition {
                name,
                primitives: TypeIdSet::default(),
                keyed: TypeIdMap::default(),
                indexed: TypeIdMap::default(),
                lookup_object: TypeIdSet::default(),
                index_object: TypeIdSet::default(),
                type_resolve: TypeIdMap::default(),
                required: TypeIdMap::default(),
                callback: TypeIdMap::default(),
                enum_name: TypeIdMap::default(),
                processors: Vec::new(),
                type_key: Key::name(DEFAULT_TYPE_KEY),
            },
        };

        macro_rules! primitives {
            ($($ty:ty),*) => {
                $(builder = builder.primitive::<$ty>();)*
            };
        }
        primitives!(
            bool, char, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String
        );
        builder
    }

    /// Marks `T` as a pass-through primitive.
    pub fn primitive<T: Primitive + Reflect>(mut self) -> Self {
        self.definition.primitives.insert(TypeId::of::<T>());
        self
    }

    /// Removes `T` from the primitive set; its values then fail as
    /// unsupported.
    pub fn without_primitive<T: Reflect>(mut self) -> Self {
        self.definition.primitives.remove(&TypeId::of::<T>());
        self
    }

    pub fn keyed<T: KeyedCapability>(mut self) -> Self {
        self.definition
            .keyed
            .insert(TypeId::of::<T>(), read_key::<T>);
        self
    }

    pub fn indexed<T: IndexedCapability>(mut self) -> Self {
        self.definition
            .indexed
            .insert(TypeId::of::<T>(), read_index::<T>);
        self
    }

    pub fn lookup_object<T: Attribute>(mut self) -> Self {
        self.definition.lookup_object.insert(TypeId::of::<T>());
        self
    }

    pub fn index_object<T: Attribute>(mut self) -> Self {
        self.definition.index_object.insert(TypeId::of::<T>());
        self
    }

    pub fn type_resolve<T: TypeResolveCapability>(mut self) -> Self {
        self.definition
            .type_resolve
            .insert(TypeId::of::<T>(), read_type_resolve::<T>);
        self
    }

    pub fn required<T: RequiredCapability>(mut self) -> Self {
        self.definition
            .required
            .insert(TypeId::of::<T>(), read_required::<T>);
        self
    }

    pub fn callback<T: CallbackCapability>(mut self) -> Self {
        self.definition
            .callback
            .insert(TypeId::of::<T>(), read_callback::<T>);
        self
    }

    pub fn enum_name<T: EnumNameCapability>(mut self) -> Self {
        self.definition
            .enum_name
            .insert(TypeId::of::<T>(), read_enum_name::<T>);
        self
    }

    /// Appends a processor. Processors are tried in the order added.
    pub fn processor(mut self, processor: impl Processor) -> Self {
        self.definition.processors.push(Box::new(processor));
        self
    }

    /// Sets the reserved key of the discriminator.
    pub fn type_key(mut self, key: impl Into<Key>) -> Self {
        self.definition.type_key = key.into();
        self
    }

    #[inline]
    pub fn build(self) -> SerializationDefinition {
        self.definition
    }
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::SerializationDefinition;
    use crate::Key;
    use crate::attributes::CallbackPoint;
    use crate::attributes::standard::{
        EnumName, IndexObject, Indexed, Keyed, OnDeserialized, Required, TypeResolve,
    };

    #[test]
    fn standard_recognises_standard_attributes() {
        let definition = SerializationDefinition::standard();

        assert_eq!(definition.key_of(&Keyed::new("Name")), Some(Key::name("Name")));
        assert_eq!(definition.key_of(&Indexed(0)), None);
        assert_eq!(definition.index_of(&Indexed(2)), Some(2));
        assert!(definition.is_index_object(&IndexObject));
        assert!(!definition.is_lookup_object(&IndexObject));
        assert_eq!(definition.required_of(&Required::non_null()), Some(true));
        assert_eq!(
            definition.callback_of(&OnDeserialized),
            Some(CallbackPoint::PostDeserialize)
        );
        assert_eq!(definition.enum_name_of(&EnumName::new("gold")).as_deref(), Some("gold"));
        assert_eq!(definition.processors().len(), 1);
        assert_eq!(definition.type_key(), &Key::name("$type"));

        let parameter = definition
            .type_resolve_of(&TypeResolve::new().with_discriminator("circle"))
            .unwrap();
        assert_eq!(parameter.discriminator.as_deref(), Some("circle"));
        assert_eq!(parameter.key, None);
    }

    #[test]
    fn unrecognised_attributes_are_ignored() {
        let definition = SerializationDefinition::builder("empty").build();

        assert_eq!(definition.key_of(&Keyed::new("Name")), None);
        assert_eq!(definition.required_of(&Required::new()), None);
        assert!(definition.processors().is_empty());
    }

    #[test]
    fn primitive_set() {
        let definition = SerializationDefinition::builder("narrow")
            .without_primitive::<char>()
            .build();

        assert!(definition.is_primitive(TypeId::of::<i64>()));
        assert!(definition.is_primitive(TypeId::of::<String>()));
        assert!(!definition.is_primitive(TypeId::of::<char>()));
        assert!(!definition.is_primitive(TypeId::of::<Vec<i64>>()));
    }
}
