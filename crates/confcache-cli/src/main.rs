use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use confcache::{ArtifactHandle, CacheStore, CompileOptions, Compiler, Settings};
use confcache_codegen::GeneratorMode;
use confcache_core::SignatureBasis;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "confcache")]
#[command(about = "Compile YAML configuration sets into cached source artifacts", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Settings file (defaults to ./confcache.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge documents and print the result as JSON
    Read {
        /// Document identifiers, lowest precedence first
        #[arg(required = true)]
        files: Vec<String>,

        /// Document root for relative identifiers
        #[arg(long, env = "CONFCACHE_ROOT")]
        root: Option<PathBuf>,
    },

    /// Compile documents into the cache and print the artifact handle
    Compile {
        /// Document identifiers, lowest precedence first
        #[arg(required = true)]
        files: Vec<String>,

        /// Generator mode (structured or flatten)
        #[arg(short, long, default_value_t = GeneratorMode::Structured)]
        mode: GeneratorMode,

        /// Container expression for flatten mode
        #[arg(short, long)]
        segment: Option<String>,

        /// Top-level key to drop before generation (repeatable)
        #[arg(long = "ignore-key")]
        ignore_keys: Vec<String>,

        /// Generate from the contents of the first top-level key
        #[arg(long)]
        no_main_key: bool,

        /// Artifact directory
        #[arg(long, env = "CONFCACHE_CACHE_DIR")]
        cache_dir: Option<PathBuf>,

        /// Document root for relative identifiers
        #[arg(long, env = "CONFCACHE_ROOT")]
        root: Option<PathBuf>,

        /// Include document contents in the signature
        #[arg(long)]
        content_signature: bool,
    },

    /// Print a cached artifact
    Show {
        /// Handle printed by `compile`
        handle: String,

        /// Artifact directory
        #[arg(long, env = "CONFCACHE_CACHE_DIR")]
        cache_dir: Option<PathBuf>,
    },

    /// Remove every cached artifact
    Clear {
        /// Artifact directory
        #[arg(long, env = "CONFCACHE_CACHE_DIR")]
        cache_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing on stderr so stdout stays machine readable
    let level = if cli.debug {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug) // Show target module in debug mode
        .with_writer(std::io::stderr)
        .init();

    let settings = load_settings(cli.config.as_ref())?;

    match cli.command {
        Commands::Read { files, root } => {
            let mut compiler_settings = settings.compiler;
            if let Some(root) = root {
                compiler_settings.root = root;
            }

            let compiler = Compiler::new(compiler_settings);
            let merged = compiler
                .read(&files)
                .with_context(|| format!("Failed to read {}", files.join(", ")))?;
            let view = merged.with_sigil(compiler.settings().sigil);
            println!("{}", serde_json::to_string_pretty(&view)?);
            Ok(())
        }

        Commands::Compile {
            files,
            mode,
            segment,
            ignore_keys,
            no_main_key,
            cache_dir,
            root,
            content_signature,
        } => {
            let mut compiler_settings = settings.compiler;
            if let Some(root) = root {
                compiler_settings.root = root;
            }
            if content_signature {
                compiler_settings.signature = SignatureBasis::Content;
            }

            let mut options = CompileOptions::new()
                .with_mode(mode)
                .with_ignore_keys(ignore_keys)
                .with_include_main_key(!no_main_key);
            if let Some(segment) = segment {
                options = options.with_segment(segment);
            }
            if let Some(dir) = cache_dir {
                options = options.with_cache_dir(dir);
            }

            let compiler = Compiler::new(compiler_settings);
            let handle = compiler
                .compile_and_cache(&files, &options)
                .with_context(|| format!("Failed to compile {}", files.join(", ")))?;
            info!(
                "Artifact available at {:?}",
                compiler.store_for(&options).dir()
            );
            println!("{}", handle);
            Ok(())
        }

        Commands::Show { handle, cache_dir } => {
            let Some(handle) = ArtifactHandle::parse(&handle) else {
                bail!("'{}' is not an artifact handle", handle);
            };
            let store = store(&settings, cache_dir);
            let text = store.load(&handle)?;
            print!("{}", text);
            Ok(())
        }

        Commands::Clear { cache_dir } => {
            let store = store(&settings, cache_dir);
            let removed = store.clear()?;
            println!("Removed {} artifact(s) from {}", removed, store.dir().display());
            Ok(())
        }
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    let settings = match path {
        Some(path) => Settings::load(path)?,
        None => {
            let cwd = std::env::current_dir().context("Failed to read working directory")?;
            Settings::discover(&cwd)?
        }
    };
    debug!("Using settings {:?}", settings.compiler);
    Ok(settings)
}

fn store(settings: &Settings, cache_dir: Option<PathBuf>) -> CacheStore {
    CacheStore::new(
        cache_dir.unwrap_or_else(|| settings.compiler.cache_dir.clone()),
        settings.compiler.extension.clone(),
    )
}
