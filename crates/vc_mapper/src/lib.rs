#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Exported macros refer to `$crate`, doc tests refer to `vc_mapper`.
extern crate self as vc_mapper;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod callback;
mod error;
mod hash;
mod validate;

pub mod attributes;
pub mod cache;
pub mod definition;
pub mod node;
pub mod processor;
pub mod reflect;
pub mod resolver;
pub mod serializer;

#[cfg(test)]
mod fixtures;

#[doc(hidden)]
pub mod __private {
    pub use alloc::boxed::Box;
}

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::{CacheBuildError, CallbackError, MapError, ResolveError};
pub use node::{Key, Node, NodeKind};
pub use reflect::Reflect;
pub use serializer::Serializer;
