use super::{ObjectProcessor, Processor, Tag};
use crate::cache::{MemberInfo, ObjectShape, ReflectionMap};
use crate::error::{MapError, ResolveError};
use crate::node::{Key, Node};
use crate::reflect::{Object, Reflect, ReflectMut, Resolvable};
use crate::serializer::Serializer;
use crate::serializer::{DeserializeContext, SerializeContext};

// -----------------------------------------------------------------------------
// TypeResolveProcessor

/// Writes and reads the discriminator of polymorphic values.
///
/// In a mapping node the discriminator sits under the definition's reserved
/// key, or under the key a type-resolve attribute on the member names. In a
/// sequence node it takes the leading position. The members of the concrete
/// value follow through [`ObjectProcessor`].
///
/// On deserialize, a holder that already contains the concrete type the
/// discriminator names is filled in place. Otherwise a fresh instance is
/// constructed through the [`TypeResolver`](crate::resolver::TypeResolver).
/// Without a discriminator the current instance is kept, or the base's
/// fallback is installed.
///
/// A lookup-shaped concrete type may not declare a member under the
/// discriminator key; such values fail with [`ResolveError::ReservedKey`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeResolveProcessor;

impl TypeResolveProcessor {
    pub fn serialize_poly(
        holder: &mut dyn Resolvable,
        member: Option<&MemberInfo>,
        cx: &mut SerializeContext<'_>,
    ) -> Result<Node, MapError> {
        let serializer = cx.serializer();
        let base = holder.base_type_id();
        let base_path = holder.base_type_path();

        let Some(object) = holder.object_mut() else {
            return Ok(Node::Null);
        };
        let discriminator = serializer
            .resolver()
            .discriminator_of(base, object.reflect_type_id())
            .ok_or_else(|| ResolveError::UnregisteredType {
                base: base_path,
                concrete: object.type_path(),
            })?;

        let key = member
            .and_then(MemberInfo::type_key)
            .unwrap_or(serializer.definition().type_key());
        check_reserved(serializer, object, key)?;
        let tag = Tag { key, discriminator };
        ObjectProcessor::serialize_object(object, Some(tag), cx)
    }

    pub fn deserialize_poly(
        node: &Node,
        holder: &mut dyn Resolvable,
        member: Option<&MemberInfo>,
        cx: &mut DeserializeContext<'_>,
    ) -> Result<(), MapError> {
        let serializer = cx.serializer();
        let resolver = serializer.resolver();
        let base = holder.base_type_id();
        let base_path = holder.base_type_path();

        let key = member
            .and_then(MemberInfo::type_key)
            .unwrap_or(serializer.definition().type_key());
        let (discriminator, offset) = match node {
            Node::Null => {
                holder.clear();
                return Ok(());
            }
            Node::Map(_) => (node.get(key), 0),
            Node::Seq(items) => (items.first(), 1),
            _ => return Err(cx.shape_error("mapping or sequence", node)),
        };

        match discriminator {
            Some(Node::String(discriminator)) => {
                let wanted = resolver.concrete_of(base, discriminator).ok_or_else(|| {
                    ResolveError::UnregisteredDiscriminator {
                        base: base_path,
                        discriminator: discriminator.clone(),
                    }
                })?;
                let current = holder.object().map(|object| object.reflect_type_id());
                if current != Some(wanted) {
                    holder.install(resolver, discriminator)?;
                }
            }
            Some(other) => return Err(cx.shape_error("string discriminator", other)),
            None => {
                if holder.object().is_none() && !holder.install_fallback() {
                    return Err(ResolveError::MissingDiscriminator {
                        base: base_path,
                        path: cx.path(),
                    }
                    .into());
                }
            }
        }

        match holder.object_mut() {
            Some(object) => {
                if offset == 0 {
                    check_reserved(serializer, object, key)?;
                }
                ObjectProcessor::deserialize_object(node, object, offset, cx)
            }
            None => Err(ResolveError::UnregisteredBase { base: base_path }.into()),
        }
    }
}

/// Rejects a lookup-shaped concrete type that declares a member under the
/// discriminator key.
fn check_reserved(
    serializer: &Serializer,
    object: &dyn Object,
    key: &Key,
) -> Result<(), MapError> {
    let map = serializer.cache().get(&object.type_handle())?;
    if map.shape() == ObjectShape::Lookup && claims(&map, key) {
        return Err(ResolveError::ReservedKey {
            concrete: map.type_path(),
            key: key.clone(),
        }
        .into());
    }
    Ok(())
}

fn claims(map: &ReflectionMap, key: &Key) -> bool {
    map.members().iter().any(|member| member.key() == Some(key))
}

impl Processor for TypeResolveProcessor {
    fn try_serialize(
        &self,
        value: &mut dyn Reflect,
        member: Option<&MemberInfo>,
        cx: &mut SerializeContext<'_>,
    ) -> Option<Result<Node, MapError>> {
        let ReflectMut::Poly(holder) = value.reflect_mut() else {
            return None;
        };
        Some(Self::serialize_poly(holder, member, cx))
    }

    fn try_deserialize(
        &self,
        node: &Node,
        target: &mut dyn Reflect,
        member: Option<&MemberInfo>,
        cx: &mut DeserializeContext<'_>,
    ) -> Option<Result<(), MapError>> {
        let ReflectMut::Poly(holder) = target.reflect_mut() else {
            return None;
        };
        Some(Self::deserialize_poly(node, holder, member, cx))
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;

    use crate::attributes::standard::Keyed;
    use crate::cache::{Mapped, ReflectionCache, TypeDescriptor};
    use crate::definition::SerializationDefinition;
    use crate::fixtures::{Circle, Drawing, Line, Shape, Square, serializer};
    use crate::reflect::Poly;
    use crate::resolver::TypeResolver;
    use crate::{Key, MapError, Node, ResolveError, Serializer};

    fn drawing() -> Drawing {
        Drawing {
            title: "logo".into(),
            shape: Poly::new(Box::new(Circle { radius: 2.0 })),
            accent: Poly::new(Box::new(Square { side: 1.5 })),
        }
    }

    #[test]
    fn discriminator_goes_first() {
        let serializer = serializer();
        let node = serializer.serialize(&mut drawing()).unwrap();

        let shape = node.get_name("Shape").unwrap().as_map().unwrap();
        assert_eq!(shape[0], (Key::name("$type"), Node::from("Circle")));
        assert_eq!(shape[1], (Key::name("Radius"), Node::Float(2.0)));

        // Member override of the key, type override of the discriminator.
        let accent = node.get_name("Accent").unwrap();
        assert_eq!(accent.get_name("kind"), Some(&Node::from("square")));
        assert!(accent.get_name("$type").is_none());
    }

    #[test]
    fn round_trip_picks_concrete_types() {
        let serializer = serializer();
        let node = serializer.serialize(&mut drawing()).unwrap();

        let back: Drawing = serializer.deserialize(&node).unwrap();
        assert_eq!(back.shape.downcast_ref::<Circle>().unwrap().radius, 2.0);
        assert_eq!(back.accent.downcast_ref::<Square>().unwrap().side, 1.5);
    }

    #[test]
    fn index_shaped_concrete_type() {
        let serializer = serializer();
        let mut drawing = Drawing {
            shape: Poly::new(Box::new(Line { length: 4.0 })),
            ..Drawing::default()
        };

        let node = serializer.serialize(&mut drawing).unwrap();
        assert_eq!(
            node.get_name("Shape"),
            Some(&Node::Seq(vec![Node::from("line"), Node::Float(4.0)]))
        );
        assert_eq!(node.get_name("Accent"), Some(&Node::Null));

        let back: Drawing = serializer.deserialize(&node).unwrap();
        assert_eq!(back.shape.downcast_ref::<Line>().unwrap().length, 4.0);
        assert!(!back.accent.is_some());
    }

    #[test]
    fn unregistered_discriminator_names_the_value() {
        let serializer = serializer();
        let mut shape = Node::map();
        shape.insert("$type", Node::from("Hexagon"));
        let mut node = Node::map();
        node.insert("Shape", shape);

        let error = serializer.deserialize::<Drawing>(&node).unwrap_err();
        assert!(matches!(
            &error,
            MapError::Resolve(ResolveError::UnregisteredDiscriminator { discriminator, .. })
                if discriminator == "Hexagon"
        ));
        assert!(error.to_string().contains("Hexagon"));
    }

    #[test]
    fn unregistered_concrete_type_fails() {
        #[derive(Default)]
        struct Triangle;

        impl Mapped for Triangle {
            fn describe(_: &mut TypeDescriptor<Self>) {}
        }
        crate::impl_object!(Triangle);
        impl crate::fixtures::Shape for Triangle {}

        let serializer = serializer();
        let mut drawing = Drawing {
            shape: Poly::new(Box::new(Triangle)),
            ..Drawing::default()
        };
        let error = serializer.serialize(&mut drawing).unwrap_err();
        assert!(matches!(
            error,
            MapError::Resolve(ResolveError::UnregisteredType { concrete, .. })
                if concrete.ends_with("Triangle")
        ));
    }

    #[test]
    fn member_under_the_discriminator_key() {
        #[derive(Default)]
        struct Badge {
            label: String,
        }

        impl Mapped for Badge {
            fn describe(d: &mut TypeDescriptor<Self>) {
                d.member("label", |b| &b.label, |b| &mut b.label)
                    .with(Keyed::new("$type"));
            }
        }
        crate::impl_object!(Badge);
        impl Shape for Badge {}

        let cache = Arc::new(ReflectionCache::new(SerializationDefinition::standard()));
        let mut resolver = TypeResolver::new();
        resolver.register::<dyn Shape, Badge>(&cache, |c| c).unwrap();
        let serializer = Serializer::new(cache, resolver);

        let mut drawing = Drawing {
            shape: Poly::new(Box::new(Badge { label: "gold".into() })),
            ..Drawing::default()
        };
        let error = serializer.serialize(&mut drawing).unwrap_err();
        assert!(matches!(
            error,
            MapError::Resolve(ResolveError::ReservedKey { concrete, ref key })
                if concrete.ends_with("Badge") && *key == Key::name("$type")
        ));

        let mut shape = Node::map();
        shape.insert("$type", Node::from("Badge"));
        let mut node = Node::map();
        node.insert("Shape", shape);
        let error = serializer.deserialize::<Drawing>(&node).unwrap_err();
        assert!(matches!(error, MapError::Resolve(ResolveError::ReservedKey { .. })));

        // Under an overridden discriminator key the member is free.
        let mut drawing = Drawing {
            accent: Poly::new(Box::new(Badge { label: "gold".into() })),
            ..Drawing::default()
        };
        let node = serializer.serialize(&mut drawing).unwrap();
        let accent = node.get_name("Accent").unwrap();
        assert_eq!(accent.get_name("kind"), Some(&Node::from("Badge")));
        assert_eq!(accent.get_name("$type"), Some(&Node::from("gold")));
    }

    #[test]
    fn missing_discriminator() {
        let serializer = serializer();
        let mut shape = Node::map();
        shape.insert("Radius", Node::Float(3.0));
        let mut node = Node::map();
        node.insert("Shape", shape);

        // An empty holder of an abstract base cannot be filled.
        let error = serializer.deserialize::<Drawing>(&node).unwrap_err();
        assert!(matches!(
            error,
            MapError::Resolve(ResolveError::MissingDiscriminator { ref path, .. }) if path == "/Shape"
        ));

        // An existing instance is kept and filled in place.
        let mut target = drawing();
        serializer.deserialize_onto(&node, &mut target).unwrap();
        assert_eq!(target.shape.downcast_ref::<Circle>().unwrap().radius, 3.0);
    }

    #[test]
    fn matching_instance_is_filled_in_place() {
        let serializer = serializer();
        let mut target = drawing();
        target.shape.downcast_mut::<Circle>().unwrap().radius = 8.0;
        let address = target.shape.downcast_ref::<Circle>().unwrap() as *const Circle;

        let node = serializer.serialize(&mut drawing()).unwrap();
        serializer.deserialize_onto(&node, &mut target).unwrap();
        let circle = target.shape.downcast_ref::<Circle>().unwrap();
        assert!(core::ptr::eq(address, circle));
        assert_eq!(circle.radius, 2.0);

        // A different discriminator replaces the instance.
        let mut square = Node::map();
        square.insert("$type", Node::from("square"));
        square.insert("Side", Node::Float(9.0));
        let mut node = Node::map();
        node.insert("Shape", square);
        serializer.deserialize_onto(&node, &mut target).unwrap();
        assert_eq!(target.shape.downcast_ref::<Square>().unwrap().side, 9.0);
    }

    #[test]
    fn fallback_and_null() {
        use crate::fixtures::Sticker;

        let serializer = serializer();
        let mut node = Node::map();
        node.insert("Label", Node::from("hello"));

        let mut sticker: Poly<dyn Sticker> = Poly::empty();
        serializer.deserialize_onto(&node, &mut sticker).unwrap();
        assert_eq!(sticker.get().unwrap().label(), "hello");

        serializer.deserialize_onto(&Node::Null, &mut sticker).unwrap();
        assert!(!sticker.is_some());

        let error = serializer.deserialize_onto(&Node::from(1_i64), &mut sticker).unwrap_err();
        assert!(matches!(error, MapError::Shape { .. }));
    }

    #[test]
    fn non_string_discriminator_is_a_shape_error() {
        let serializer = serializer();
        let mut shape = Node::map();
        shape.insert("$type", Node::Int(3));
        let mut node = Node::map();
        node.insert("Shape", shape);

        let error = serializer.deserialize::<Drawing>(&node).unwrap_err();
        assert!(matches!(
            error,
            MapError::Shape { expected: "string discriminator", ref path, .. } if path == "/Shape"
        ));
    }
}
