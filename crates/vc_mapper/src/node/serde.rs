use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde_core::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_core::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::{Key, Node};

// -----------------------------------------------------------------------------
// Serialize

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Key::Name(name) => serializer.serialize_str(name),
            Key::Int(value) => serializer.serialize_i64(*value),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(value) => serializer.serialize_bool(*value),
            Node::Int(value) => serializer.serialize_i64(*value),
            Node::UInt(value) => serializer.serialize_u64(*value),
            Node::Float(value) => serializer.serialize_f64(*value),
            Node::String(value) => serializer.serialize_str(value),
            Node::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Deserialize

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = Key;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string or integer key")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Key, E> {
                Ok(Key::from(String::from(value)))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<Key, E> {
                Ok(Key::from(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Key, E> {
                Ok(Key::Int(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Key, E> {
                i64::try_from(value)
                    .map(Key::Int)
                    .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any value")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Node, E> {
        Ok(Node::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Node, E> {
        Ok(Node::Int(value))
    }

    // Most readers report every non-negative integer as unsigned.
    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Node, E> {
        Ok(match i64::try_from(value) {
            Ok(value) => Node::Int(value),
            Err(_) => Node::UInt(value),
        })
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Node, E> {
        Ok(Node::Float(value))
    }

    fn visit_char<E: de::Error>(self, value: char) -> Result<Node, E> {
        Ok(Node::String(value.into()))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Node, E> {
        Ok(Node::String(value.into()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Node, E> {
        Ok(Node::String(value))
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::Seq(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut entries: Vec<(Key, Node)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry()? {
            entries.push((key, value));
        }
        Ok(Node::Map(entries))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Key, Node};
    use alloc::string::String;
    use alloc::vec;

    #[test]
    fn json_round_trip() {
        let text = r#"{"Name":"Global","Size":2,"Ratio":0.5,"Tags":["a",null,true]}"#;
        let node: Node = serde_json::from_str(text).unwrap();

        assert_eq!(node.get_name("Size"), Some(&Node::Int(2)));
        assert_eq!(node.get_name("Ratio"), Some(&Node::Float(0.5)));
        assert_eq!(
            node.get_name("Tags"),
            Some(&Node::Seq(vec![
                Node::from("a"),
                Node::Null,
                Node::Bool(true)
            ]))
        );

        let back = serde_json::to_string(&node).unwrap();
        assert_eq!(back, text);
    }

    #[test]
    fn large_unsigned_stays_unsigned() {
        let node: Node = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(node, Node::UInt(u64::MAX));
    }

    #[test]
    fn integer_keys_render_through_json() {
        let mut node = Node::map();
        node.insert(3_i64, Node::from("three"));
        let text = serde_json::to_string(&node).unwrap();
        assert_eq!(text, r#"{"3":"three"}"#);

        // JSON keys always come back as names.
        let parsed: Node = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.get(&Key::from(String::from("3"))), Some(&Node::from("three")));
    }

    #[test]
    fn ron_round_trip() {
        let mut node = Node::map();
        node.insert("Name", Node::from("Global"));
        node.insert(1_i64, Node::Seq(vec![Node::Int(-4), Node::Float(1.5)]));

        let text = ron::to_string(&node).unwrap();
        let back: Node = ron::from_str(&text).unwrap();
        assert_eq!(back, node);
    }
}
