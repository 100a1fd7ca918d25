#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use vc_mapper as mapper;

#[cfg(feature = "json")]
pub use vc_mapper_json as json;
