#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod mapper;

pub mod attributes;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::JsonError;
pub use mapper::{JsonMapper, TYPE_PROPERTY, definition};
