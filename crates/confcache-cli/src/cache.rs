//! Disk-resident artifact cache keyed by signature.
//!
//! The cache directory is append-only from this crate's point of view: an
//! artifact is written once per signature and reused until removed through
//! [`CacheStore::clear`] or by hand. Existence of `<dir>/<signature>.<ext>`
//! is the only hit condition.

use confcache_codegen::render_artifact;
use confcache_core::signature::SIGNATURE_PREFIX;
use confcache_core::CacheSignature;
use confcache_parser::DocumentRef;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::CompileError;

/// Logical name of a cached artifact: its file name without extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactHandle(String);

impl ArtifactHandle {
    /// Accepts only names shaped like a signature.
    pub fn parse(name: &str) -> Option<Self> {
        CacheSignature::from_existing(name).map(|signature| Self::from(&signature))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&CacheSignature> for ArtifactHandle {
    fn from(signature: &CacheSignature) -> Self {
        Self(signature.as_str().to_string())
    }
}

impl fmt::Display for ArtifactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generated output ready to be persisted
#[derive(Debug, Clone)]
pub struct CompiledArtifact {
    pub signature: CacheSignature,
    pub generated_text: String,
    pub source_files: Vec<DocumentRef>,
}

impl CompiledArtifact {
    /// Full artifact text, provenance header included.
    pub fn render(&self) -> String {
        let sources: Vec<String> = self
            .source_files
            .iter()
            .map(|doc| doc.path().display().to_string())
            .collect();
        render_artifact(&sources, &self.generated_text)
    }
}

/// Artifact directory plus the extension artifacts are stored with
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
    extension: String,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn artifact_path(&self, signature: &CacheSignature) -> PathBuf {
        self.path_for(signature.as_str())
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, self.extension))
    }

    pub fn contains(&self, signature: &CacheSignature) -> bool {
        self.artifact_path(signature).is_file()
    }

    /// Return the cached artifact for `signature`, running `compile` only on a miss.
    pub fn get_or_compile<F>(
        &self,
        signature: &CacheSignature,
        compile: F,
    ) -> Result<ArtifactHandle, CompileError>
    where
        F: FnOnce() -> Result<CompiledArtifact, CompileError>,
    {
        if self.contains(signature) {
            debug!(
                "Cache hit for {} in {:?}, reusing the artifact as first compiled",
                signature.short_hash(),
                self.dir
            );
            return Ok(ArtifactHandle::from(signature));
        }

        let artifact = compile()?;
        let path = self.write(&artifact)?;
        info!(
            "Compiled {} document(s) into {:?}",
            artifact.source_files.len(),
            path
        );
        Ok(ArtifactHandle::from(&artifact.signature))
    }

    /// Persist an artifact through a temporary file renamed into place.
    pub fn write(&self, artifact: &CompiledArtifact) -> Result<PathBuf, CompileError> {
        let path = self.artifact_path(&artifact.signature);
        let write_error = |source: std::io::Error| CompileError::CacheWrite {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_error)?;
        let mut temp = tempfile::NamedTempFile::new_in(&self.dir).map_err(write_error)?;
        temp.write_all(artifact.render().as_bytes())
            .map_err(write_error)?;
        temp.flush().map_err(write_error)?;
        temp.persist(&path).map_err(|e| write_error(e.error))?;
        Ok(path)
    }

    /// Read back a cached artifact by handle.
    pub fn load(&self, handle: &ArtifactHandle) -> Result<String, CompileError> {
        let path = self.path_for(handle.as_str());
        fs::read_to_string(&path).map_err(|source| CompileError::CacheRead { path, source })
    }

    /// Delete every artifact file in the directory; returns how many were removed.
    pub fn clear(&self) -> Result<usize, CompileError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(CompileError::CacheRead {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|source| CompileError::CacheRead {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !self.is_artifact(&path) {
                continue;
            }
            fs::remove_file(&path).map_err(|source| CompileError::CacheWrite {
                path: path.clone(),
                source,
            })?;
            removed += 1;
        }

        info!("Removed {} cached artifact(s) from {:?}", removed, self.dir);
        Ok(removed)
    }

    fn is_artifact(&self, path: &Path) -> bool {
        let has_extension = path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy() == self.extension);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.is_file() && has_extension && stem.starts_with(SIGNATURE_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn artifact(signature: &CacheSignature) -> CompiledArtifact {
        CompiledArtifact {
            signature: signature.clone(),
            generated_text: "$config[\"a\"] = 1;".to_string(),
            source_files: vec![DocumentRef {
                name: "app.yaml".to_string(),
                directory: PathBuf::from("/srv/config"),
            }],
        }
    }

    #[test]
    fn test_miss_then_hit() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let store = CacheStore::new(dir.path().join("cache"), "php");
        let signature = CacheSignature::from_paths(&["/srv/config/app.yaml"]);
        let calls = Cell::new(0);

        let first = store.get_or_compile(&signature, || {
            calls.set(calls.get() + 1);
            Ok(artifact(&signature))
        })?;
        let second = store.get_or_compile(&signature, || {
            calls.set(calls.get() + 1);
            Ok(artifact(&signature))
        })?;

        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
        assert_eq!(first.as_str(), signature.as_str());
        assert!(store.contains(&signature));
        assert_eq!(
            store.artifact_path(&signature),
            dir.path().join("cache").join(format!("{}.php", signature))
        );
        Ok(())
    }

    #[test]
    fn test_written_artifact_layout() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let store = CacheStore::new(dir.path(), "php");
        let signature = CacheSignature::from_paths(&["/srv/config/app.yaml"]);
        let handle = store.get_or_compile(&signature, || Ok(artifact(&signature)))?;

        let text = store.load(&handle)?;
        assert!(text.starts_with("/*\n * This file is compiled from the following 1 source document(s):\n"));
        assert!(text.contains(" *   - /srv/config/app.yaml\n"));
        assert!(text.ends_with("$config[\"a\"] = 1;\n"));
        Ok(())
    }

    #[test]
    fn test_handle_parsing() {
        let signature = CacheSignature::from_paths(&["/a.yaml"]);
        assert_eq!(
            ArtifactHandle::parse(signature.as_str()),
            Some(ArtifactHandle::from(&signature))
        );
        assert!(ArtifactHandle::parse("../../etc/passwd").is_none());
    }

    #[test]
    fn test_failed_compile_leaves_no_artifact() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let store = CacheStore::new(dir.path(), "php");
        let signature = CacheSignature::from_paths(&["/x.yaml"]);

        let result = store.get_or_compile(&signature, || {
            Err(CompileError::Settings("boom".to_string()))
        });
        assert!(result.is_err());
        assert!(!store.contains(&signature));
        Ok(())
    }

    #[test]
    fn test_unwritable_directory_is_cache_write_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "")?;
        let store = CacheStore::new(&blocker, "php");
        let signature = CacheSignature::from_paths(&["/x.yaml"]);

        let result = store.get_or_compile(&signature, || Ok(artifact(&signature)));
        assert!(matches!(result, Err(CompileError::CacheWrite { .. })));
        Ok(())
    }

    #[test]
    fn test_clear_only_removes_artifacts() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let store = CacheStore::new(dir.path(), "php");
        for file in [["/a.yaml"], ["/b.yaml"]] {
            let signature = CacheSignature::from_paths(&file);
            store.write(&artifact(&signature))?;
        }
        fs::write(dir.path().join("keep.php"), "")?;
        fs::write(dir.path().join("notes.txt"), "")?;

        assert_eq!(store.clear()?, 2);
        assert!(dir.path().join("keep.php").is_file());
        assert!(dir.path().join("notes.txt").is_file());
        assert_eq!(CacheStore::new(dir.path().join("missing"), "php").clear()?, 0);
        Ok(())
    }
}
