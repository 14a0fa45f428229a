//! Code generators turning merged configuration into loadable source text

pub mod artifact;
pub mod emit;
pub mod error;
pub mod flat;
pub mod structured;

use confcache_core::ConfigTree;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use artifact::render_artifact;
pub use error::CodegenError;
pub use flat::{FlatCodegen, Segment};
pub use structured::{StructuredCodegen, DEFAULT_CONTAINER};

/// Common trait for all code generators
pub trait Codegen {
    fn generate(&self, tree: &ConfigTree) -> Result<String, CodegenError>;
}

/// Which generator a compile uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorMode {
    /// Nested access paths rooted at a container
    #[default]
    Structured,
    /// Dot-path keys assigned into a segment
    Flatten,
}

impl fmt::Display for GeneratorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorMode::Structured => write!(f, "structured"),
            GeneratorMode::Flatten => write!(f, "flatten"),
        }
    }
}

impl FromStr for GeneratorMode {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "structured" => Ok(GeneratorMode::Structured),
            "flatten" | "flat" => Ok(GeneratorMode::Flatten),
            other => Err(CodegenError::InvalidArgument(format!(
                "unknown generator mode '{}'",
                other
            ))),
        }
    }
}

/// Build the generator for `mode`.
///
/// Flatten mode fails with [`CodegenError::InvalidArgument`] without a
/// segment; structured mode ignores the segment.
pub fn generator(
    mode: GeneratorMode,
    segment: Option<&str>,
    container: &str,
) -> Result<Box<dyn Codegen>, CodegenError> {
    match mode {
        GeneratorMode::Structured => Ok(Box::new(StructuredCodegen::new(container))),
        GeneratorMode::Flatten => {
            let segment = segment.ok_or_else(|| {
                CodegenError::InvalidArgument("flatten mode requires a segment name".to_string())
            })?;
            Ok(Box::new(FlatCodegen::new(segment)?))
        }
    }
}
