use alloc::vec;
use alloc::vec::Vec;

use super::Processor;
use crate::attributes::CallbackPoint;
use crate::callback;
use crate::cache::{MemberInfo, ObjectShape};
use crate::error::MapError;
use crate::node::{Key, Node};
use crate::reflect::{Object, Reflect, ReflectKind, ReflectMut};
use crate::serializer::{DeserializeContext, SerializeContext};
use crate::validate::{self, Presence};

// -----------------------------------------------------------------------------
// Tag

/// The discriminator written in front of a polymorphic object's members.
#[derive(Debug, Clone, Copy)]
pub struct Tag<'a> {
    /// Key of the discriminator in a lookup-shaped object.
    pub key: &'a Key,
    pub discriminator: &'a str,
}

// -----------------------------------------------------------------------------
// ObjectProcessor

/// The default lookup/index processor.
///
/// A lookup-shaped object becomes a mapping holding each keyed member under
/// its key, in declaration order. An index-shaped object becomes a sequence
/// holding each indexed member at its position; positions no member claims
/// hold `Null`. Members without a placement are skipped both ways, and so
/// are keys the object does not declare.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectProcessor;

impl ObjectProcessor {
    /// Serializes the members of `object`, preceded by `tag` if given.
    ///
    /// Pre-serialize callbacks run before any member is read.
    pub fn serialize_object(
        object: &mut dyn Object,
        tag: Option<Tag<'_>>,
        cx: &mut SerializeContext<'_>,
    ) -> Result<Node, MapError> {
        let map = cx.serializer().cache().get(&object.type_handle())?;
        let target: &mut dyn Reflect = object;

        callback::invoke(&map, CallbackPoint::PreSerialize, target)?;

        match map.shape() {
            ObjectShape::Lookup => {
                let mut entries = Vec::with_capacity(map.members().len() + 1);
                if let Some(tag) = tag {
                    entries.push((tag.key.clone(), Node::from(tag.discriminator)));
                }
                for member in map.members() {
                    let Some(key) = member.key() else {
                        continue;
                    };
                    let value = member.value_mut(&mut *target)?;
                    cx.enter(key.clone());
                    let node = cx.serialize_value(value, Some(member));
                    cx.leave();
                    entries.push((key.clone(), node?));
                }
                Ok(Node::Map(entries))
            }
            ObjectShape::Index => {
                let offset = usize::from(tag.is_some());
                let len = map
                    .members()
                    .iter()
                    .filter_map(MemberInfo::index)
                    .max()
                    .map_or(0, |last| last + 1);

                let mut items = vec![Node::Null; offset + len];
                if let Some(tag) = tag {
                    items[0] = Node::from(tag.discriminator);
                }
                for member in map.members() {
                    let Some(index) = member.index() else {
                        continue;
                    };
                    let value = member.value_mut(&mut *target)?;
                    cx.enter(Key::Int(index as i64));
                    let node = cx.serialize_value(value, Some(member));
                    cx.leave();
                    items[offset + index] = node?;
                }
                Ok(Node::Seq(items))
            }
        }
    }

    /// Writes `node` into the members of `object`.
    ///
    /// In an index-shaped node, member positions start at `offset`. Once
    /// every member is written, required members are validated and then
    /// post-deserialize callbacks run.
    ///
    /// A `Null` child of a required member that cannot hold null leaves the
    /// member untouched; the null check, if any, rejects it afterwards.
    pub fn deserialize_object(
        node: &Node,
        object: &mut dyn Object,
        offset: usize,
        cx: &mut DeserializeContext<'_>,
    ) -> Result<(), MapError> {
        let map = cx.serializer().cache().get(&object.type_handle())?;
        let target: &mut dyn Reflect = object;

        let mut presence = vec![Presence::Absent; map.members().len()];
        match map.shape() {
            ObjectShape::Lookup => {
                if node.as_map().is_none() {
                    return Err(cx.shape_error("mapping", node));
                }
                for (slot, member) in map.members().iter().enumerate() {
                    let Some(key) = member.key() else {
                        continue;
                    };
                    let Some(child) = node.get(key) else {
                        continue;
                    };
                    let value = member.value_mut(&mut *target)?;
                    presence[slot] = Presence::of(child);
                    if skips_null(child, member, value) {
                        continue;
                    }
                    cx.enter(key.clone());
                    let result = cx.deserialize_value(child, value, Some(member));
                    cx.leave();
                    result?;
                }
            }
            ObjectShape::Index => {
                let Some(items) = node.as_seq() else {
                    return Err(cx.shape_error("sequence", node));
                };
                for (slot, member) in map.members().iter().enumerate() {
                    let Some(index) = member.index() else {
                        continue;
                    };
                    let Some(child) = items.get(offset + index) else {
                        continue;
                    };
                    let value = member.value_mut(&mut *target)?;
                    presence[slot] = Presence::of(child);
                    if skips_null(child, member, value) {
                        continue;
                    }
                    cx.enter(Key::Int(index as i64));
                    let result = cx.deserialize_value(child, value, Some(member));
                    cx.leave();
                    result?;
                }
            }
        }

        validate::check_required(&map, &*target, &presence)?;
        callback::invoke(&map, CallbackPoint::PostDeserialize, target)
    }
}

fn skips_null(child: &Node, member: &MemberInfo, value: &dyn Reflect) -> bool {
    child.is_null()
        && member.required().is_some()
        && !matches!(value.reflect_kind(), ReflectKind::Optional | ReflectKind::Poly)
}

impl Processor for ObjectProcessor {
    fn try_serialize(
        &self,
        value: &mut dyn Reflect,
        _member: Option<&MemberInfo>,
        cx: &mut SerializeContext<'_>,
    ) -> Option<Result<Node, MapError>> {
        let ReflectMut::Object(object) = value.reflect_mut() else {
            return None;
        };
        Some(Self::serialize_object(object, None, cx))
    }

    fn try_deserialize(
        &self,
        node: &Node,
        target: &mut dyn Reflect,
        _member: Option<&MemberInfo>,
        cx: &mut DeserializeContext<'_>,
    ) -> Option<Result<(), MapError>> {
        let ReflectMut::Object(object) = target.reflect_mut() else {
            return None;
        };
        Some(Self::deserialize_object(node, object, 0, cx))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use crate::attributes::standard::Keyed;
    use crate::definition::SerializationDefinition;
    use crate::fixtures::{
        Entry, Leaderboard, Medal, Motto, Pair, Profile, serializer, serializer_with,
    };
    use crate::{Key, MapError, Node, NodeKind};

    fn entry(player: &str, score: u32) -> Entry {
        Entry {
            player: player.into(),
            score,
            ..Entry::default()
        }
    }

    #[test]
    fn lookup_members_in_declaration_order() {
        let serializer = serializer();
        let mut entry = Entry {
            medal: Medal::Gold,
            note: Some("first try".into()),
            ..entry("ada", 120)
        };

        let node = serializer.serialize(&mut entry).unwrap();
        let keys: Vec<_> = node.as_map().unwrap().iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(
            keys,
            [Key::name("Player"), Key::name("Score"), Key::name("Medal"), Key::name("Note")]
        );
        assert_eq!(node.get_name("Medal"), Some(&Node::from("gold")));
        assert_eq!(node.get_name("Score"), Some(&Node::Int(120)));
        // Pre-serialize callback ran once.
        assert_eq!(entry.saves, 1);
    }

    #[test]
    fn round_trip() {
        let serializer = serializer();
        let mut board = Leaderboard {
            name: "Global".into(),
            entries: vec![entry("ada", 120), entry("lin", 80)],
        };

        let node = serializer.serialize(&mut board).unwrap();
        let back: Leaderboard = serializer.deserialize(&node).unwrap();

        assert_eq!(back.name, "Global");
        assert_eq!(back.entries.len(), 2);
        for (left, right) in board.entries.iter().zip(&back.entries) {
            assert_eq!(left.player, right.player);
            assert_eq!(left.score, right.score);
            assert_eq!(left.medal, right.medal);
            assert_eq!(left.note, right.note);
            assert!(right.loaded);
        }
    }

    #[test]
    fn leaderboard_from_node() {
        let serializer = serializer();
        let mut first = Node::map();
        first.insert("Player", Node::from("ada"));
        first.insert("Score", Node::Int(120));
        let mut second = Node::map();
        second.insert("Player", Node::from("lin"));
        second.insert("Unknown", Node::Bool(true));

        let mut node = Node::map();
        node.insert("Name", Node::from("Global"));
        node.insert("Entries", Node::Seq(vec![first, second]));

        let board: Leaderboard = serializer.deserialize(&node).unwrap();
        assert_eq!(board.name, "Global");
        assert_eq!(board.entries.len(), 2);
        assert_eq!(board.entries[1].player, "lin");
        assert_eq!(board.entries[1].score, 0);
    }

    #[test]
    fn index_shape_fills_gaps_with_null() {
        let serializer = serializer();
        let mut pair = Pair {
            first: 7,
            second: String::from("seven"),
        };

        let node = serializer.serialize(&mut pair).unwrap();
        assert_eq!(
            node,
            Node::Seq(vec![Node::Int(7), Node::Null, Node::from("seven")])
        );

        let back: Pair = serializer.deserialize(&node).unwrap();
        assert_eq!(back, pair);
    }

    #[test]
    fn shape_errors_carry_the_path() {
        let serializer = serializer();
        let mut node = Node::map();
        node.insert("Entries", Node::Seq(vec![Node::map(), node_with_bad_score()]));

        // The first entry lacks its required player.
        let error = serializer.deserialize::<Leaderboard>(&node).unwrap_err();
        assert!(matches!(error, MapError::MissingRequired { member: "player", .. }));

        node.insert("Entries", Node::Seq(vec![node_with_player(), node_with_bad_score()]));
        let error = serializer.deserialize::<Leaderboard>(&node).unwrap_err();
        match error {
            MapError::Shape { path, found, .. } => {
                assert_eq!(path, "/Entries/1/Score");
                assert_eq!(found, NodeKind::String);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    fn node_with_player() -> Node {
        let mut node = Node::map();
        node.insert("Player", Node::from("ada"));
        node
    }

    fn node_with_bad_score() -> Node {
        let mut node = node_with_player();
        node.insert("Score", Node::from("lots"));
        node
    }

    #[test]
    fn deserialize_onto_keeps_nested_instances() {
        let serializer = serializer();
        let mut board = Leaderboard {
            name: "Old".into(),
            entries: vec![entry("ada", 1), entry("lin", 2), entry("kai", 3)],
        };
        board.entries[0].saves = 5;
        let address = &board.entries[0] as *const Entry;

        let mut node = Node::map();
        node.insert("Name", Node::from("New"));
        node.insert("Entries", Node::Seq(vec![node_with_player(), node_with_player()]));
        serializer.deserialize_onto(&node, &mut board).unwrap();

        assert_eq!(board.name, "New");
        assert_eq!(board.entries.len(), 2);
        assert!(core::ptr::eq(address, &board.entries[0]));
        // Untouched state of the reused element survives.
        assert_eq!(board.entries[0].saves, 5);
        assert_eq!(board.entries[0].score, 1);
    }

    #[test]
    fn required_presence_and_null_check() {
        let serializer = serializer();

        let mut node = Node::map();
        node.insert("Email", Node::from("a@b.c"));
        let error = serializer.deserialize::<Profile>(&node).unwrap_err();
        assert!(matches!(
            error,
            MapError::MissingRequired { owner: "Profile", member: "nickname" }
        ));

        // Present but null passes without the null check.
        node.insert("Nick", Node::Null);
        let profile: Profile = serializer.deserialize(&node).unwrap();
        assert_eq!(profile.nickname, None);

        node.insert("Email", Node::Null);
        let error = serializer.deserialize::<Profile>(&node).unwrap_err();
        assert!(matches!(
            error,
            MapError::NullRequired { owner: "Profile", member: "email" }
        ));
    }

    #[test]
    fn null_on_required_string() {
        let serializer = serializer();

        let mut node = Node::map();
        node.insert("Player", Node::Null);
        let error = serializer.deserialize::<Entry>(&node).unwrap_err();
        assert!(matches!(
            error,
            MapError::NullRequired { owner: "Entry", member: "player" }
        ));

        // Without the null check the member keeps its current value.
        let mut node = Node::map();
        node.insert("Text", Node::Null);
        let motto: Motto = serializer.deserialize(&node).unwrap();
        assert_eq!(motto.text, "");

        let mut motto = Motto {
            text: String::from("carpe diem"),
        };
        serializer.deserialize_onto(&node, &mut motto).unwrap();
        assert_eq!(motto.text, "carpe diem");

        // Members that are not required still reject the null.
        let mut node = node_with_player();
        node.insert("Score", Node::Null);
        let error = serializer.deserialize::<Entry>(&node).unwrap_err();
        assert!(matches!(error, MapError::Shape { found: NodeKind::Null, .. }));
    }

    #[test]
    fn validation_runs_before_post_deserialize_callbacks() {
        let serializer = serializer();
        let mut target = entry("ada", 1);

        let mut node = Node::map();
        node.insert("Score", Node::Int(5));
        let error = serializer.deserialize_onto(&node, &mut target).unwrap_err();
        assert!(matches!(error, MapError::MissingRequired { member: "player", .. }));
        // Members were written, the callback never ran.
        assert_eq!(target.score, 5);
        assert!(!target.loaded);

        serializer.deserialize_onto(&node_with_player(), &mut target).unwrap();
        assert!(target.loaded);
    }

    #[test]
    fn unsupported_primitive() {
        let definition = SerializationDefinition::builder("no-strings")
            .keyed::<Keyed>()
            .without_primitive::<String>()
            .build();
        let serializer = serializer_with(definition);

        let error = serializer.serialize(&mut entry("ada", 1)).unwrap_err();
        assert!(matches!(error, MapError::Unsupported { type_path, .. } if type_path.ends_with("String")));
    }
}
