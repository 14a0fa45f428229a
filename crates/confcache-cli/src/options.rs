//! Per-call compile configuration
//!
//! Options travel with each call instead of living on the compiler, so a
//! compile never inherits overrides from a previous one.

use confcache_codegen::GeneratorMode;
use std::path::{Path, PathBuf};

/// Generator selection and filtering for one compile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    mode: GeneratorMode,
    segment: Option<String>,
    ignore_keys: Vec<String>,
    include_main_key: bool,
    cache_dir: Option<PathBuf>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            mode: GeneratorMode::default(),
            segment: None,
            ignore_keys: Vec::new(),
            include_main_key: true,
            cache_dir: None,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: GeneratorMode) -> Self {
        self.mode = mode;
        self
    }

    /// Container expression for flatten mode.
    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    /// Top-level keys dropped before generation.
    pub fn with_ignore_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// When disabled, generation starts below the first top-level key.
    pub fn with_include_main_key(mut self, include: bool) -> Self {
        self.include_main_key = include;
        self
    }

    /// Overrides the compiler's default cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn mode(&self) -> GeneratorMode {
        self.mode
    }

    pub fn segment(&self) -> Option<&str> {
        self.segment.as_deref()
    }

    pub fn ignore_keys(&self) -> &[String] {
        &self.ignore_keys
    }

    pub fn include_main_key(&self) -> bool {
        self.include_main_key
    }

    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }
}
