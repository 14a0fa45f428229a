use std::path::PathBuf;

use confcache_codegen::CodegenError;
use confcache_core::CoreError;
use confcache_parser::ParserError;
use thiserror::Error;

/// Every way a read or compile call can fail.
///
/// None of these are retried internally.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Parser(#[from] ParserError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("Failed to write artifact {path:?}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read artifact {path:?}: {source}")]
    CacheRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings: {0}")]
    Settings(String),
}
