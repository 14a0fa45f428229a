//! Cache signatures for compiled artifacts
//!
//! A signature identifies one ordered set of source documents. The default
//! basis hashes only the resolved paths, so edits to a document do not
//! produce a new signature and a cached artifact stays in use until the
//! cache directory is cleared. [`SignatureBasis::Content`] also hashes the
//! raw bytes of every document.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;

use crate::error::CoreError;

/// Prefix shared by every signature.
pub const SIGNATURE_PREFIX: &str = "config.";

/// What goes into a signature besides the ordered path list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureBasis {
    /// Resolved paths only
    #[default]
    Paths,
    /// Resolved paths followed by each document's bytes
    Content,
}

/// Deterministic cache key, `config.<sha256 hex>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheSignature(String);

impl CacheSignature {
    /// Signature over the ordered concatenation of `paths`.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Self {
        let mut builder = SignatureBuilder::new();
        for path in paths {
            builder.add_path(path.as_ref());
        }
        builder.build()
    }

    /// Signature over each path followed by that file's bytes.
    pub fn from_contents<P: AsRef<Path>>(paths: &[P]) -> Result<Self, CoreError> {
        let mut builder = SignatureBuilder::new();
        for path in paths {
            let path = path.as_ref();
            let bytes = std::fs::read(path).map_err(|source| CoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            builder.add_path(path).add_content(&bytes);
        }
        Ok(builder.build())
    }

    pub fn derive<P: AsRef<Path>>(paths: &[P], basis: SignatureBasis) -> Result<Self, CoreError> {
        match basis {
            SignatureBasis::Paths => Ok(Self::from_paths(paths)),
            SignatureBasis::Content => Self::from_contents(paths),
        }
    }

    /// Rebuild a signature from a handle or file stem already on disk.
    pub fn from_existing(name: &str) -> Option<Self> {
        let digest = name.strip_prefix(SIGNATURE_PREFIX)?;
        let well_formed =
            digest.len() == 64 && digest.chars().all(|c| c.is_ascii_hexdigit());
        well_formed.then(|| Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get a short hash for display purposes
    pub fn short_hash(&self) -> String {
        self.0
            .trim_start_matches(SIGNATURE_PREFIX)
            .chars()
            .take(12)
            .collect()
    }
}

impl fmt::Display for CacheSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Incremental signature hasher.
///
/// Parts are hashed in the order they are added; nothing is sorted.
pub struct SignatureBuilder {
    hasher: Sha256,
}

impl SignatureBuilder {
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    pub fn add_path(&mut self, path: &Path) -> &mut Self {
        self.hasher.update(path.to_string_lossy().as_bytes());
        self
    }

    pub fn add_content(&mut self, content: &[u8]) -> &mut Self {
        self.hasher.update(content);
        self
    }

    pub fn build(&self) -> CacheSignature {
        let digest = self.hasher.clone().finalize();
        CacheSignature(format!("{}{:x}", SIGNATURE_PREFIX, digest))
    }
}

impl Default for SignatureBuilder {
    fn default() -> Self {
        Self::new()
    }
}
