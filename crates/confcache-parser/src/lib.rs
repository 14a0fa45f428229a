//! Document resolution, parsing and merging for confcache

pub mod error;
pub mod loader;
pub mod resolver;
pub mod yaml;

pub use error::ParserError;
pub use loader::{DocumentLoader, MergedDocument, MergedDocumentView};
pub use resolver::{DocumentRef, Resolver, DEFAULT_PREFIX, DOCUMENT_EXTENSION};
pub use yaml::{DocumentParser, YamlParser};
