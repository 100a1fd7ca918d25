use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::{ObjectProcessor, TypeResolveProcessor};
use crate::cache::MemberInfo;
use crate::error::MapError;
use crate::hash::HashSet;
use crate::node::{Key, Node};
use crate::reflect::{Dict, Enum, List, Reflect, ReflectMut};
use crate::serializer::{DeserializeContext, SerializeContext};

// -----------------------------------------------------------------------------
// Serialize

/// Converts `value` when no processor of the definition applied.
pub(crate) fn serialize_builtin(
    value: &mut dyn Reflect,
    member: Option<&MemberInfo>,
    cx: &mut SerializeContext<'_>,
) -> Result<Node, MapError> {
    let type_id = value.reflect_type_id();
    let type_path = value.type_path();

    match value.reflect_mut() {
        ReflectMut::Value(primitive) => {
            let definition = cx.serializer().definition();
            if !definition.is_primitive(type_id) {
                return Err(MapError::Unsupported {
                    type_path,
                    definition: definition.name().into(),
                });
            }
            Ok(primitive.to_node())
        }
        ReflectMut::Enum(value) => Ok(Node::Int(value.value())),
        ReflectMut::Optional(optional) => match optional.value_mut() {
            Some(inner) => cx.serialize_value(inner, member),
            None => Ok(Node::Null),
        },
        ReflectMut::List(list) => serialize_list(list, cx),
        ReflectMut::Dict(dict) => serialize_dict(dict, cx),
        ReflectMut::Object(object) => ObjectProcessor::serialize_object(object, None, cx),
        ReflectMut::Poly(holder) => TypeResolveProcessor::serialize_poly(holder, member, cx),
    }
}

fn serialize_list(list: &mut dyn List, cx: &mut SerializeContext<'_>) -> Result<Node, MapError> {
    let mut items = Vec::with_capacity(list.len());
    for index in 0..list.len() {
        let Some(item) = list.get_mut(index) else {
            break;
        };
        cx.enter(Key::Int(index as i64));
        let node = cx.serialize_value(item, None);
        cx.leave();
        items.push(node?);
    }
    Ok(Node::Seq(items))
}

fn serialize_dict(dict: &mut dyn Dict, cx: &mut SerializeContext<'_>) -> Result<Node, MapError> {
    let keys = dict.keys();
    let mut entries = Vec::with_capacity(keys.len());
    for key in keys {
        let Some(item) = dict.get_mut(&key) else {
            continue;
        };
        let key = Key::from(key);
        cx.enter(key.clone());
        let node = cx.serialize_value(item, None);
        cx.leave();
        entries.push((key, node?));
    }
    Ok(Node::Map(entries))
}

// -----------------------------------------------------------------------------
// Deserialize

/// Writes `node` into `target` when no processor of the definition applied.
pub(crate) fn deserialize_builtin(
    node: &Node,
    target: &mut dyn Reflect,
    member: Option<&MemberInfo>,
    cx: &mut DeserializeContext<'_>,
) -> Result<(), MapError> {
    let type_id = target.reflect_type_id();
    let type_path = target.type_path();

    match target.reflect_mut() {
        ReflectMut::Value(primitive) => {
            let definition = cx.serializer().definition();
            if !definition.is_primitive(type_id) {
                return Err(MapError::Unsupported {
                    type_path,
                    definition: definition.name().into(),
                });
            }
            primitive
                .set_node(node)
                .map_err(|expected| cx.shape_error(expected, node))
        }
        ReflectMut::Enum(value) => deserialize_enum_value(node, value, type_path, cx),
        ReflectMut::Optional(optional) => {
            if node.is_null() {
                optional.clear();
                Ok(())
            } else {
                cx.deserialize_value(node, optional.get_or_insert_default(), member)
            }
        }
        ReflectMut::List(list) => deserialize_list(node, list, cx),
        ReflectMut::Dict(dict) => deserialize_dict(node, dict, cx),
        ReflectMut::Object(object) => ObjectProcessor::deserialize_object(node, object, 0, cx),
        ReflectMut::Poly(holder) => {
            TypeResolveProcessor::deserialize_poly(node, holder, member, cx)
        }
    }
}

fn deserialize_enum_value(
    node: &Node,
    value: &mut dyn Enum,
    type_path: &'static str,
    cx: &mut DeserializeContext<'_>,
) -> Result<(), MapError> {
    let Some(raw) = node.as_i64() else {
        return Err(cx.shape_error("integer", node));
    };
    let map = cx.serializer().cache().get(&value.type_handle())?;
    match map.variant_by_value(raw) {
        Some(variant) if value.set_variant(variant) => Ok(()),
        _ => Err(MapError::EnumMapping {
            type_path,
            value: raw.to_string(),
        }),
    }
}

/// Reuses existing elements by position, appends missing ones and drops
/// the rest.
fn deserialize_list(
    node: &Node,
    list: &mut dyn List,
    cx: &mut DeserializeContext<'_>,
) -> Result<(), MapError> {
    let Some(items) = node.as_seq() else {
        return Err(cx.shape_error("sequence", node));
    };

    for (index, item) in items.iter().enumerate() {
        if index >= list.len() {
            list.push_default();
        }
        let Some(slot) = list.get_mut(index) else {
            break;
        };
        cx.enter(Key::Int(index as i64));
        let result = cx.deserialize_value(item, slot, None);
        cx.leave();
        result?;
    }
    list.truncate(items.len());
    Ok(())
}

/// Updates existing entries, inserts missing ones and removes entries the
/// node does not carry.
fn deserialize_dict(
    node: &Node,
    dict: &mut dyn Dict,
    cx: &mut DeserializeContext<'_>,
) -> Result<(), MapError> {
    let Some(entries) = node.as_map() else {
        return Err(cx.shape_error("mapping", node));
    };

    let mut seen: HashSet<String> = HashSet::default();
    for (key, item) in entries {
        let name = key.to_string();
        cx.enter(key.clone());
        let result = cx.deserialize_value(item, dict.get_or_insert_default(&name), None);
        cx.leave();
        result?;
        seen.insert(name);
    }
    dict.retain_keys(&mut |key| seen.contains(key));
    Ok(())
}
