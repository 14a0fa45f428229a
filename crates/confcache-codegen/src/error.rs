//! Error types for code generation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported value at {path}: {reason}")]
    UnsupportedValue { path: String, reason: String },
}
