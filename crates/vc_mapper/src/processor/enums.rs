use alloc::string::ToString;

use super::Processor;
use crate::cache::{MemberInfo, ReflectionMap, VariantInfo};
use crate::error::MapError;
use crate::node::Node;
use crate::reflect::{Enum, Reflect, ReflectMut};
use crate::serializer::{DeserializeContext, SerializeContext};

// -----------------------------------------------------------------------------
// EnumProcessor

/// Maps enums by name instead of by underlying value.
///
/// Serializing writes the variant's override string if the definition
/// recognises one, otherwise its declared name. Deserializing matches names
/// and override strings case-sensitively, then falls back to the underlying
/// value, given either as an integer node or as a string holding one.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumProcessor;

impl Processor for EnumProcessor {
    fn try_serialize(
        &self,
        value: &mut dyn Reflect,
        _member: Option<&MemberInfo>,
        cx: &mut SerializeContext<'_>,
    ) -> Option<Result<Node, MapError>> {
        let type_path = value.type_path();
        let ReflectMut::Enum(value) = value.reflect_mut() else {
            return None;
        };
        Some(serialize_enum(value, type_path, cx))
    }

    fn try_deserialize(
        &self,
        node: &Node,
        target: &mut dyn Reflect,
        _member: Option<&MemberInfo>,
        cx: &mut DeserializeContext<'_>,
    ) -> Option<Result<(), MapError>> {
        let type_path = target.type_path();
        let ReflectMut::Enum(target) = target.reflect_mut() else {
            return None;
        };
        Some(deserialize_enum(node, target, type_path, cx))
    }
}

fn serialize_enum(
    value: &dyn Enum,
    type_path: &'static str,
    cx: &SerializeContext<'_>,
) -> Result<Node, MapError> {
    let map = cx.serializer().cache().get(&value.type_handle())?;
    let raw = value.value();
    match map.variant_by_value(raw) {
        Some(variant) => Ok(Node::String(variant.label().into())),
        None => Err(MapError::EnumMapping {
            type_path,
            value: raw.to_string(),
        }),
    }
}

fn deserialize_enum(
    node: &Node,
    target: &mut dyn Enum,
    type_path: &'static str,
    cx: &DeserializeContext<'_>,
) -> Result<(), MapError> {
    let map = cx.serializer().cache().get(&target.type_handle())?;

    let (variant, shown) = match node {
        Node::String(text) => (find_by_text(&map, text), text.clone()),
        Node::Int(raw) => (map.variant_by_value(*raw), raw.to_string()),
        Node::UInt(raw) => {
            let variant = i64::try_from(*raw)
                .ok()
                .and_then(|raw| map.variant_by_value(raw));
            (variant, raw.to_string())
        }
        _ => return Err(cx.shape_error("string or integer", node)),
    };

    match variant {
        Some(variant) if target.set_variant(variant) => Ok(()),
        _ => Err(MapError::EnumMapping {
            type_path,
            value: shown,
        }),
    }
}

fn find_by_text<'m>(map: &'m ReflectionMap, text: &str) -> Option<&'m VariantInfo> {
    map.variant_by_label(text).or_else(|| {
        text.parse::<i64>()
            .ok()
            .and_then(|raw| map.variant_by_value(raw))
    })
}
