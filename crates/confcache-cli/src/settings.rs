//! Compiler settings loaded from `confcache.toml`

use confcache_codegen::DEFAULT_CONTAINER;
use confcache_core::{SignatureBasis, DEFAULT_SIGIL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CompileError;

/// Settings file looked up in the working directory.
pub const SETTINGS_FILE: &str = "confcache.toml";

/// Top-level settings document
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub compiler: CompilerSettings,
}

/// Defaults shared by every compile of one compiler
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Document root for relative identifiers
    pub root: PathBuf,
    /// Artifact directory used when a call does not name one
    pub cache_dir: PathBuf,
    /// Artifact file extension
    pub extension: String,
    /// Structured-mode container name
    pub container: String,
    /// Literal-code marker
    pub sigil: char,
    pub signature: SignatureBasis,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            cache_dir: PathBuf::from("cache"),
            extension: "php".to_string(),
            container: DEFAULT_CONTAINER.to_string(),
            sigil: DEFAULT_SIGIL,
            signature: SignatureBasis::Paths,
        }
    }
}

impl Settings {
    /// Load settings from file
    pub fn load(path: &Path) -> Result<Self, CompileError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CompileError::Settings(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| CompileError::Settings(format!("{}: {}", path.display(), e)))
    }

    /// Parses and validates settings from a string.
    pub fn from_toml(content: &str) -> Result<Self, CompileError> {
        let settings: Settings =
            toml::from_str(content).map_err(|e| CompileError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// `<dir>/confcache.toml` when present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self, CompileError> {
        let path = dir.join(SETTINGS_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), CompileError> {
        let compiler = &self.compiler;
        if compiler.extension.is_empty() || compiler.extension.contains(['/', '\\']) {
            return Err(CompileError::Settings(format!(
                "compiler.extension must be a plain file extension, got '{}'",
                compiler.extension
            )));
        }
        if compiler.container.trim().is_empty() {
            return Err(CompileError::Settings(
                "compiler.container must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
