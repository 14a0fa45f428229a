//! Locating physical documents for logical file identifiers
//!
//! An identifier is a bare name or a path, with or without extension.
//! `app` resolves to `<root>/app.yaml`, falling back to the default
//! document `<root>/d.app.yaml` when the first one is absent.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::ParserError;

/// Extension appended to identifiers that carry none of the recognized ones.
pub const DOCUMENT_EXTENSION: &str = "yaml";

/// Extensions accepted as already naming a structured document.
pub const RECOGNIZED_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Prefix of the default document checked when the primary one is missing.
pub const DEFAULT_PREFIX: &str = "d.";

/// A resolved, existing document location
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DocumentRef {
    /// File name that was found, possibly the default-prefixed one
    pub name: String,
    /// Directory holding the document
    pub directory: PathBuf,
}

impl DocumentRef {
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.name)
    }

    /// Whether resolution fell back to the default document.
    pub fn is_default(&self) -> bool {
        self.name.starts_with(DEFAULT_PREFIX)
    }
}

/// Resolves identifiers relative to a document root.
#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
}

impl Resolver {
    /// Absolute identifiers ignore `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve one identifier, trying the default-prefixed name second.
    pub fn resolve(&self, identifier: &str) -> Result<DocumentRef, ParserError> {
        let requested = Path::new(identifier);
        let Some(base_name) = requested.file_name().map(|n| n.to_string_lossy().into_owned())
        else {
            return Err(ParserError::FileNotFound {
                path: self.root.join(requested),
            });
        };

        let directory = match requested.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.root.join(parent),
            _ => self.root.clone(),
        };
        let name = with_document_extension(&base_name);

        let primary = directory.join(&name);
        if primary.is_file() {
            debug!("Resolved '{}' to {:?}", identifier, primary);
            return Ok(DocumentRef { name, directory });
        }

        let fallback_name = format!("{}{}", DEFAULT_PREFIX, name);
        let fallback = directory.join(&fallback_name);
        if fallback.is_file() {
            info!(
                "Document {:?} not found, using default {:?}",
                primary, fallback
            );
            return Ok(DocumentRef {
                name: fallback_name,
                directory,
            });
        }

        Err(ParserError::FileNotFound { path: primary })
    }

    /// Resolve every identifier, keeping input order.
    pub fn resolve_all<I, S>(&self, identifiers: I) -> Result<Vec<DocumentRef>, ParserError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        identifiers
            .into_iter()
            .map(|identifier| self.resolve(identifier.as_ref()))
            .collect()
    }
}

fn with_document_extension(name: &str) -> String {
    let has_extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| RECOGNIZED_EXTENSIONS.contains(&ext));
    if has_extension {
        name.to_string()
    } else {
        format!("{}.{}", name, DOCUMENT_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_extension_appended_when_missing() {
        assert_eq!(with_document_extension("app"), "app.yaml");
        assert_eq!(with_document_extension("app.yaml"), "app.yaml");
        assert_eq!(with_document_extension("app.yml"), "app.yml");
        assert_eq!(with_document_extension("app.conf"), "app.conf.yaml");
    }

    #[test]
    fn test_resolves_primary_document() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("app.yaml"), "a: 1\n")?;
        fs::write(dir.path().join("d.app.yaml"), "a: 0\n")?;

        let doc = Resolver::new(dir.path()).resolve("app")?;
        assert_eq!(doc.name, "app.yaml");
        assert_eq!(doc.directory, dir.path());
        assert!(!doc.is_default());
        Ok(())
    }

    #[test]
    fn test_falls_back_to_default_document() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("d.app.yaml"), "a: 0\n")?;

        let doc = Resolver::new(dir.path()).resolve("app")?;
        assert_eq!(doc.name, "d.app.yaml");
        assert!(doc.is_default());
        assert_eq!(doc.path(), dir.path().join("d.app.yaml"));
        Ok(())
    }

    #[test]
    fn test_subdirectory_identifiers() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("env"))?;
        fs::write(dir.path().join("env").join("d.prod.yaml"), "a: 0\n")?;

        let doc = Resolver::new(dir.path()).resolve("env/prod.yaml")?;
        assert_eq!(doc.directory, dir.path().join("env"));
        assert_eq!(doc.name, "d.prod.yaml");
        Ok(())
    }

    #[test]
    fn test_missing_document_reports_primary_path() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        match Resolver::new(dir.path()).resolve("missing") {
            Err(ParserError::FileNotFound { path }) => {
                assert_eq!(path, dir.path().join("missing.yaml"));
            }
            other => return Err(format!("expected FileNotFound, got {:?}", other).into()),
        }
        Ok(())
    }

    #[test]
    fn test_directories_do_not_count_as_documents() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("app.yaml"))?;
        assert!(Resolver::new(dir.path()).resolve("app").is_err());
        Ok(())
    }

    #[test]
    fn test_resolve_all_keeps_order() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        for name in ["base.yaml", "override.yaml"] {
            fs::write(dir.path().join(name), "a: 1\n")?;
        }
        let docs = Resolver::new(dir.path()).resolve_all(["override", "base", "override"])?;
        let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["override.yaml", "base.yaml", "override.yaml"]);
        Ok(())
    }
}
