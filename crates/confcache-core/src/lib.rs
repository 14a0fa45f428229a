//! Core value tree and transformations for confcache
//!
//! Everything here is free of document I/O except content-based signatures.

pub mod error;
pub mod filter;
pub mod flatten;
pub mod merge;
pub mod signature;
pub mod value;

pub use error::CoreError;
pub use filter::apply_filters;
pub use flatten::{flatten, leaf_count, unflatten};
pub use merge::Merge;
pub use signature::{CacheSignature, SignatureBasis, SignatureBuilder};
pub use value::{lookup, ConfigTree, ConfigValue, Key, Scalar, Text, WithSigil, DEFAULT_SIGIL};
