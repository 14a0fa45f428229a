use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Empty configuration: {0}")]
    EmptyConfig(String),

    #[error("Failed to read {path:?} for signature: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
