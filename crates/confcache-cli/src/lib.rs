//! Library interface for the confcache compiler

pub mod cache;
pub mod compiler;
pub mod error;
pub mod options;
pub mod settings;

pub use cache::{ArtifactHandle, CacheStore, CompiledArtifact};
pub use compiler::Compiler;
pub use error::CompileError;
pub use options::CompileOptions;
pub use settings::{CompilerSettings, Settings, SETTINGS_FILE};
