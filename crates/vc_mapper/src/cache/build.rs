use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::{TypeId, type_name};

use super::descriptor::{EnumDescriptor, Mapped, MappedEnum, MemberDescriptor, TypeDescriptor};
use super::map::{CallbackInfo, MemberInfo, ObjectShape, Placement, ReflectionMap, VariantInfo};
use crate::attributes::{Attribute, AttributeSet};
use crate::definition::SerializationDefinition;
use crate::error::CacheBuildError;
use crate::hash::HashSet;

// -----------------------------------------------------------------------------
// Objects

pub(super) fn build_object<T: Mapped>(
    definition: &SerializationDefinition,
) -> Result<ReflectionMap, CacheBuildError> {
    let type_path = type_name::<T>();
    let type_name = T::type_name();

    let mut descriptor = TypeDescriptor::<T>::new();
    T::describe(&mut descriptor);
    let TypeDescriptor {
        attributes,
        members,
        callbacks,
        ..
    } = descriptor;

    let lookup = attributes.iter().any(|a| definition.is_lookup_object(a));
    let index = attributes.iter().any(|a| definition.is_index_object(a));
    if lookup && index {
        return Err(CacheBuildError::ConflictingShape { type_path });
    }

    let resolve = single(&attributes, |a| definition.type_resolve_of(a)).map_err(|()| {
        CacheBuildError::DuplicateCapability {
            type_path,
            target: type_name,
            capability: "type-resolve",
        }
    })?;
    let discriminator = resolve
        .and_then(|parameter| parameter.discriminator)
        .unwrap_or(Cow::Borrowed(type_name));

    let members = members
        .into_iter()
        .map(|member| bind_member(definition, type_path, member))
        .collect::<Result<Vec<_>, _>>()?;

    let shape = match (lookup, index) {
        (true, _) => ObjectShape::Lookup,
        (_, true) => ObjectShape::Index,
        _ if members.iter().any(|m| m.index().is_some()) => ObjectShape::Index,
        _ => ObjectShape::Lookup,
    };
    check_placements(type_path, shape, &members)?;

    let callbacks = callbacks
        .into_iter()
        .filter_map(|callback| {
            let point = definition.callback_of(&*callback.attribute)?;
            Some(CallbackInfo {
                point,
                attribute: callback.attribute,
                hook: callback.hook,
            })
        })
        .collect();

    Ok(ReflectionMap {
        type_id: TypeId::of::<T>(),
        type_path,
        type_name,
        attributes,
        shape,
        discriminator,
        members,
        callbacks,
        variants: Vec::new(),
    })
}

fn bind_member(
    definition: &SerializationDefinition,
    type_path: &'static str,
    member: MemberDescriptor,
) -> Result<MemberInfo, CacheBuildError> {
    let MemberDescriptor {
        name,
        attributes,
        access,
    } = member;

    let placement = {
        let mut placements = attributes.iter().filter_map(|a| {
            definition
                .key_of(a)
                .map(Placement::Key)
                .or_else(|| definition.index_of(a).map(Placement::Index))
        });
        let first = placements.next();
        if placements.next().is_some() {
            return Err(CacheBuildError::ConflictingPlacement {
                type_path,
                member: name,
            });
        }
        first
    };

    let duplicate = |capability| CacheBuildError::DuplicateCapability {
        type_path,
        target: name,
        capability,
    };
    let required =
        single(&attributes, |a| definition.required_of(a)).map_err(|()| duplicate("required"))?;
    let resolve = single(&attributes, |a| definition.type_resolve_of(a))
        .map_err(|()| duplicate("type-resolve"))?;

    if required.is_some() && placement.is_none() {
        return Err(CacheBuildError::UnplacedRequired {
            type_path,
            member: name,
        });
    }

    Ok(MemberInfo {
        name,
        placement,
        required,
        type_resolve: resolve.is_some(),
        type_key: resolve.and_then(|parameter| parameter.key),
        attributes,
        access,
    })
}

fn check_placements(
    type_path: &'static str,
    shape: ObjectShape,
    members: &[MemberInfo],
) -> Result<(), CacheBuildError> {
    let mut keys = HashSet::default();
    let mut indices = HashSet::default();

    for member in members {
        match &member.placement {
            Some(Placement::Key(key)) => {
                if shape == ObjectShape::Index {
                    return Err(CacheBuildError::ShapeMismatch {
                        type_path,
                        member: member.name,
                        shape,
                    });
                }
                if !keys.insert(key) {
                    return Err(CacheBuildError::DuplicateKey {
                        type_path,
                        key: key.clone(),
                    });
                }
            }
            Some(Placement::Index(index)) => {
                if shape == ObjectShape::Lookup {
                    return Err(CacheBuildError::ShapeMismatch {
                        type_path,
                        member: member.name,
                        shape,
                    });
                }
                if !indices.insert(*index) {
                    return Err(CacheBuildError::DuplicateIndex {
                        type_path,
                        index: *index,
                    });
                }
            }
            None => {}
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Enums

pub(super) fn build_enum<E: MappedEnum>(
    definition: &SerializationDefinition,
) -> Result<ReflectionMap, CacheBuildError> {
    let type_path = type_name::<E>();
    let type_name = E::type_name();

    let mut descriptor = EnumDescriptor::<E>::new();
    E::describe(&mut descriptor);
    let EnumDescriptor {
        attributes,
        variants,
    } = descriptor;

    let mut labels = HashSet::default();
    let mut values = HashSet::default();
    let mut infos = Vec::with_capacity(variants.len());

    for variant in variants {
        let alias = single(&variant.attributes, |a| definition.enum_name_of(a)).map_err(|()| {
            CacheBuildError::DuplicateCapability {
                type_path,
                target: variant.name,
                capability: "enum-name",
            }
        })?;

        let value = variant.value.to_value();
        if !values.insert(value) {
            return Err(CacheBuildError::DuplicateValue { type_path, value });
        }

        let own_labels = core::iter::once(variant.name)
            .chain(alias.as_deref().filter(|alias| *alias != variant.name));
        for label in own_labels {
            if !labels.insert(String::from(label)) {
                return Err(CacheBuildError::DuplicateVariant {
                    type_path,
                    label: label.into(),
                });
            }
        }

        infos.push(VariantInfo {
            name: variant.name,
            alias,
            value,
            attributes: variant.attributes,
            instance: Box::new(variant.value),
        });
    }

    Ok(ReflectionMap {
        type_id: TypeId::of::<E>(),
        type_path,
        type_name,
        attributes,
        shape: ObjectShape::Lookup,
        discriminator: Cow::Borrowed(type_name),
        members: Vec::new(),
        callbacks: Vec::new(),
        variants: infos,
    })
}

// -----------------------------------------------------------------------------
// Helpers

/// Returns the only value `f` extracts from `attributes`, or `Err` if more
/// than one attribute yields a value.
fn single<R>(
    attributes: &AttributeSet,
    mut f: impl FnMut(&dyn Attribute) -> Option<R>,
) -> Result<Option<R>, ()> {
    let mut found = None;
    for attribute in attributes.iter() {
        if let Some(value) = f(attribute) {
            if found.is_some() {
                return Err(());
            }
            found = Some(value);
        }
    }
    Ok(found)
}
