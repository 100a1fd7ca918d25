//! Handlers converting one value between its reflected and node form.
//!
//! For every value the serializer tries the definition's processors in
//! order. The first one that returns `Some` owns the conversion. If none
//! applies, the built-in stage dispatches on the value's
//! [`ReflectKind`](crate::reflect::ReflectKind):
//!
//! | Kind | Node |
//! |---|---|
//! | value | itself, if the definition lists it as primitive |
//! | enum | underlying integer |
//! | optional | `Null` or the inner value |
//! | list | sequence |
//! | dict | mapping with name keys |
//! | object | [`ObjectProcessor`] |
//! | poly | [`TypeResolveProcessor`], then [`ObjectProcessor`] |

// -----------------------------------------------------------------------------
// Modules

mod builtin;
mod enums;
mod object;
mod resolve;

// -----------------------------------------------------------------------------
// Exports

pub use enums::EnumProcessor;
pub use object::{ObjectProcessor, Tag};
pub use resolve::TypeResolveProcessor;

pub(crate) use builtin::{deserialize_builtin, serialize_builtin};

use crate::cache::MemberInfo;
use crate::error::MapError;
use crate::node::Node;
use crate::reflect::Reflect;
use crate::serializer::{DeserializeContext, SerializeContext};

// -----------------------------------------------------------------------------
// Processor

/// One link of the processor chain.
///
/// Each method has three outcomes: `None` when the processor does not apply
/// to the value, `Some(Ok(..))` when it converted it, `Some(Err(..))` when
/// it applied and failed. Both `None` defaults let a processor handle a
/// single direction.
///
/// `member` is the member the value belongs to, or `None` for the root value
/// and for elements of lists and dicts.
///
/// # Examples
///
/// ```
/// use vc_mapper::cache::MemberInfo;
/// use vc_mapper::processor::Processor;
/// use vc_mapper::serializer::SerializeContext;
/// use vc_mapper::{MapError, Node, Reflect};
///
/// /// Writes every `bool` as `0` or `1`.
/// struct BitProcessor;
///
/// impl Processor for BitProcessor {
///     fn try_serialize(
///         &self,
///         value: &mut dyn Reflect,
///         _member: Option<&MemberInfo>,
///         _cx: &mut SerializeContext<'_>,
///     ) -> Option<Result<Node, MapError>> {
///         let bit = *value.downcast_ref::<bool>()?;
///         Some(Ok(Node::Int(i64::from(bit))))
///     }
/// }
/// ```
pub trait Processor: Send + Sync + 'static {
    fn try_serialize(
        &self,
        value: &mut dyn Reflect,
        member: Option<&MemberInfo>,
        cx: &mut SerializeContext<'_>,
    ) -> Option<Result<Node, MapError>> {
        let _ = (value, member, cx);
        None
    }

    fn try_deserialize(
        &self,
        node: &Node,
        target: &mut dyn Reflect,
        member: Option<&MemberInfo>,
        cx: &mut DeserializeContext<'_>,
    ) -> Option<Result<(), MapError>> {
        let _ = (node, target, member, cx);
        None
    }
}
