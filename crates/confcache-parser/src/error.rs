use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Document not found: {path:?}")]
    FileNotFound { path: PathBuf },

    #[error("Parse error in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid document root in {path:?}: expected a mapping or a sequence")]
    InvalidRoot { path: PathBuf },

    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
