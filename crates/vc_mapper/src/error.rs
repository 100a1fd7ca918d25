use alloc::boxed::Box;
use alloc::string::String;

use thiserror::Error;

use crate::cache::ObjectShape;
use crate::node::{Key, NodeKind};

/// Error returned by a lifecycle callback.
pub type CallbackError = Box<dyn core::error::Error + Send + Sync>;

// -----------------------------------------------------------------------------
// CacheBuildError

/// A type description the cache cannot turn into a reflection map.
///
/// Fatal for the offending type only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CacheBuildError {
    #[error("member `{member}` of `{type_path}` carries more than one placement attribute")]
    ConflictingPlacement {
        type_path: &'static str,
        member: &'static str,
    },

    #[error("`{type_path}` is marked both lookup-shaped and index-shaped")]
    ConflictingShape { type_path: &'static str },

    #[error("member `{member}` of {shape}-shaped `{type_path}` has a contradicting placement")]
    ShapeMismatch {
        type_path: &'static str,
        member: &'static str,
        shape: ObjectShape,
    },

    #[error("key `{key}` is used by more than one member of `{type_path}`")]
    DuplicateKey { type_path: &'static str, key: Key },

    #[error("index {index} is used by more than one member of `{type_path}`")]
    DuplicateIndex {
        type_path: &'static str,
        index: usize,
    },

    #[error("required member `{member}` of `{type_path}` has no placement")]
    UnplacedRequired {
        type_path: &'static str,
        member: &'static str,
    },

    #[error("`{target}` of `{type_path}` carries more than one {capability} attribute")]
    DuplicateCapability {
        type_path: &'static str,
        target: &'static str,
        capability: &'static str,
    },

    #[error("enum `{type_path}` uses the name `{label}` more than once")]
    DuplicateVariant {
        type_path: &'static str,
        label: String,
    },

    #[error("enum `{type_path}` uses the value {value} more than once")]
    DuplicateValue { type_path: &'static str, value: i64 },
}

// -----------------------------------------------------------------------------
// ResolveError

/// Polymorphic type resolution failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolveError {
    #[error("discriminator `{discriminator}` is already registered under `{base}`")]
    DuplicateDiscriminator {
        base: &'static str,
        discriminator: String,
    },

    #[error("`{concrete}` is already registered under `{base}`")]
    DuplicateType {
        base: &'static str,
        concrete: &'static str,
    },

    #[error("no type is registered under `{base}` for discriminator `{discriminator}`")]
    UnregisteredDiscriminator {
        base: &'static str,
        discriminator: String,
    },

    #[error("missing discriminator for `{base}` at `{path}`")]
    MissingDiscriminator { base: &'static str, path: String },

    #[error("`{concrete}` is not registered under `{base}`")]
    UnregisteredType {
        base: &'static str,
        concrete: &'static str,
    },

    #[error("no type is registered under `{base}`")]
    UnregisteredBase { base: &'static str },

    #[error("member key `{key}` of `{concrete}` collides with the discriminator key")]
    ReservedKey { concrete: &'static str, key: Key },
}

// -----------------------------------------------------------------------------
// MapError

/// Error of a serialize or deserialize operation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MapError {
    #[error(transparent)]
    CacheBuild(#[from] CacheBuildError),

    #[error("expected {expected} at `{path}`, found {found}")]
    Shape {
        path: String,
        expected: &'static str,
        found: NodeKind,
    },

    #[error("`{type_path}` is not supported by definition `{definition}`")]
    Unsupported {
        type_path: &'static str,
        definition: String,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("required member `{member}` of `{owner}` is missing")]
    MissingRequired {
        owner: &'static str,
        member: &'static str,
    },

    #[error("required member `{member}` of `{owner}` is null")]
    NullRequired {
        owner: &'static str,
        member: &'static str,
    },

    #[error("`{value}` does not name a variant of `{type_path}`")]
    EnumMapping {
        type_path: &'static str,
        value: String,
    },

    #[error("accessor of `{expected}` applied to `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Callback(CallbackError),
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{CacheBuildError, MapError, ResolveError};
    use crate::NodeKind;

    #[test]
    fn messages_name_the_culprit() {
        let error = MapError::MissingRequired {
            owner: "Entry",
            member: "player",
        };
        assert_eq!(error.to_string(), "required member `player` of `Entry` is missing");

        let error = MapError::from(ResolveError::UnregisteredDiscriminator {
            base: "dyn Shape",
            discriminator: "Hexagon".into(),
        });
        assert!(error.to_string().contains("`Hexagon`"));

        let error = MapError::Shape {
            path: "/Entries/0".into(),
            expected: "mapping",
            found: NodeKind::String,
        };
        assert_eq!(error.to_string(), "expected mapping at `/Entries/0`, found string");
    }

    #[test]
    fn callback_errors_are_transparent() {
        #[derive(Debug, thiserror::Error)]
        #[error("score out of range")]
        struct OutOfRange;

        let error = MapError::Callback(OutOfRange.into());
        assert_eq!(error.to_string(), "score out of range");
        assert!(matches!(
            MapError::from(CacheBuildError::ConflictingShape { type_path: "T" }),
            MapError::CacheBuild(_)
        ));
    }
}
