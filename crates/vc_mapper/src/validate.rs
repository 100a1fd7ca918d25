use crate::cache::ReflectionMap;
use crate::error::MapError;
use crate::node::Node;
use crate::reflect::Reflect;

/// What the source node carried for one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Presence {
    Absent,
    Null,
    Value,
}

impl Presence {
    /// Presence of a child the node does carry.
    #[inline]
    pub(crate) fn of(child: &Node) -> Self {
        if child.is_null() {
            Self::Null
        } else {
            Self::Value
        }
    }
}

/// Checks the required members of one deserialized object.
///
/// `presence[i]` describes the source of member `i`. A required member must
/// be present; with the null check it must neither come from a `Null` node
/// nor be null after deserialization.
pub(crate) fn check_required(
    map: &ReflectionMap,
    target: &dyn Reflect,
    presence: &[Presence],
) -> Result<(), MapError> {
    for (member, &presence) in map.members().iter().zip(presence) {
        let Some(null_check) = member.required() else {
            continue;
        };
        if presence == Presence::Absent {
            return Err(MapError::MissingRequired {
                owner: map.type_name(),
                member: member.name(),
            });
        }
        if null_check && (presence == Presence::Null || member.value(target)?.is_null()) {
            return Err(MapError::NullRequired {
                owner: map.type_name(),
                member: member.name(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Presence, check_required};
    use crate::MapError;
    use crate::cache::ReflectionCache;
    use crate::definition::SerializationDefinition;
    use crate::fixtures::{Entry, Profile};

    #[test]
    fn absent_and_null_members() {
        let cache = ReflectionCache::new(SerializationDefinition::standard());
        let map = cache.get_of::<Profile>().unwrap();

        let mut profile = Profile {
            nickname: None,
            email: Some("a@b.c".into()),
        };
        let both = [Presence::Value, Presence::Value];
        assert!(check_required(&map, &profile, &both).is_ok());
        assert!(matches!(
            check_required(&map, &profile, &[Presence::Absent, Presence::Value]),
            Err(MapError::MissingRequired { member: "nickname", .. })
        ));

        profile.email = None;
        assert!(matches!(
            check_required(&map, &profile, &both),
            Err(MapError::NullRequired { member: "email", .. })
        ));
    }

    #[test]
    fn null_source_fails_the_null_check() {
        let cache = ReflectionCache::new(SerializationDefinition::standard());
        let map = cache.get_of::<Entry>().unwrap();

        // The player string itself is never null; the node was.
        let entry = Entry::default();
        let mut presence = [Presence::Null, Presence::Absent, Presence::Absent, Presence::Absent];
        assert!(matches!(
            check_required(&map, &entry, &presence),
            Err(MapError::NullRequired { member: "player", .. })
        ));

        presence[0] = Presence::Value;
        assert!(check_required(&map, &entry, &presence).is_ok());
    }

    #[test]
    fn unrecognised_required_is_ignored() {
        let definition = SerializationDefinition::builder("loose")
            .keyed::<crate::attributes::standard::Keyed>()
            .build();
        let cache = ReflectionCache::new(definition);
        let map = cache.get_of::<Profile>().unwrap();

        let absent = [Presence::Absent, Presence::Absent];
        assert!(check_required(&map, &Profile::default(), &absent).is_ok());
    }
}
