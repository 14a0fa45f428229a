//! Read and compile front door
//!
//! A [`Compiler`] owns the long-lived pieces (settings, resolver and
//! document loader). Everything that varies per call arrives in a
//! [`CompileOptions`] value.

use confcache_codegen::generator;
use confcache_core::{apply_filters, CacheSignature};
use confcache_parser::{DocumentLoader, DocumentParser, MergedDocument, Resolver, YamlParser};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

use crate::cache::{ArtifactHandle, CacheStore, CompiledArtifact};
use crate::error::CompileError;
use crate::options::CompileOptions;
use crate::settings::CompilerSettings;

pub struct Compiler<P = YamlParser> {
    settings: CompilerSettings,
    resolver: Resolver,
    loader: DocumentLoader<P>,
}

impl Compiler<YamlParser> {
    pub fn new(settings: CompilerSettings) -> Self {
        let parser = YamlParser::with_sigil(settings.sigil);
        Self::with_parser(settings, parser)
    }
}

impl<P: DocumentParser> Compiler<P> {
    /// Use a custom document parser in place of YAML.
    pub fn with_parser(settings: CompilerSettings, parser: P) -> Self {
        Self {
            resolver: Resolver::new(settings.root.clone()),
            loader: DocumentLoader::new(parser),
            settings,
        }
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    pub fn parser(&self) -> &P {
        self.loader.parser()
    }

    /// Resolve, parse and merge `files` without touching the cache.
    pub fn read<S: AsRef<str>>(&self, files: &[S]) -> Result<MergedDocument, CompileError> {
        let documents = self.resolver.resolve_all(files)?;
        let merged = self.loader.load(&documents)?;
        debug!(
            "Read {} document(s) into {} top-level key(s)",
            documents.len(),
            merged.tree.len()
        );
        Ok(merged)
    }

    /// Return a handle to the compiled artifact for `files`, compiling on a miss.
    ///
    /// The generator is built before any file is resolved, so an invalid
    /// mode and segment combination fails even when the artifact is cached.
    /// A hit returns the artifact as first compiled, whatever mode or
    /// segment this call requests; both are recorded on the span.
    #[instrument(
        skip(self, files, options),
        fields(mode = %options.mode(), segment = options.segment().unwrap_or("-")),
        level = "debug"
    )]
    pub fn compile_and_cache<S: AsRef<str>>(
        &self,
        files: &[S],
        options: &CompileOptions,
    ) -> Result<ArtifactHandle, CompileError> {
        let codegen = generator(options.mode(), options.segment(), &self.settings.container)?;

        let documents = self.resolver.resolve_all(files)?;
        let paths: Vec<PathBuf> = documents.iter().map(|doc| doc.path()).collect();
        let signature = CacheSignature::derive(&paths, self.settings.signature)?;
        let store = self.store_for(options);

        store.get_or_compile(&signature, || {
            info!(
                "Compiling {} document(s) in {} mode as {}",
                documents.len(),
                options.mode(),
                signature.short_hash()
            );
            let merged = self.loader.load(&documents)?;
            let tree = apply_filters(
                merged.tree,
                options.ignore_keys(),
                options.include_main_key(),
            )?;
            let generated_text = codegen.generate(&tree)?;
            Ok(CompiledArtifact {
                signature: signature.clone(),
                generated_text,
                source_files: merged.sources,
            })
        })
    }

    /// Cache store for one call: the call's directory, else the configured one.
    pub fn store_for(&self, options: &CompileOptions) -> CacheStore {
        let dir = options
            .cache_dir()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.settings.cache_dir.clone());
        CacheStore::new(dir, self.settings.extension.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confcache_codegen::GeneratorMode;

    fn settings_in(dir: &std::path::Path) -> CompilerSettings {
        CompilerSettings {
            root: dir.to_path_buf(),
            cache_dir: dir.join("cache"),
            ..CompilerSettings::default()
        }
    }

    #[test]
    fn test_store_prefers_call_directory() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let compiler = Compiler::new(settings_in(dir.path()));

        let default_store = compiler.store_for(&CompileOptions::new());
        assert_eq!(default_store.dir(), dir.path().join("cache"));

        let options = CompileOptions::new().with_cache_dir(dir.path().join("other"));
        assert_eq!(compiler.store_for(&options).dir(), dir.path().join("other"));
        Ok(())
    }

    #[test]
    fn test_segment_checked_before_resolution() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let compiler = Compiler::new(settings_in(dir.path()));
        let options = CompileOptions::new().with_mode(GeneratorMode::Flatten);

        // The document does not exist either; the segment error wins.
        let result = compiler.compile_and_cache(&["missing"], &options);
        assert!(matches!(
            result,
            Err(CompileError::Codegen(
                confcache_codegen::CodegenError::InvalidArgument(_)
            ))
        ));
        Ok(())
    }
}
