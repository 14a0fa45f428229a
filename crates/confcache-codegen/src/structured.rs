//! Structured mode: nested access-path assignments

use confcache_core::{ConfigTree, ConfigValue, Key};
use tracing::instrument;

use crate::emit;
use crate::{Codegen, CodegenError};

/// Container that root-level access paths start from.
pub const DEFAULT_CONTAINER: &str = "$config";

/// Generator for structured mode.
#[derive(Debug, Clone)]
pub struct StructuredCodegen {
    container: String,
}

impl Default for StructuredCodegen {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER)
    }
}

impl StructuredCodegen {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Statements for one branch, in insertion order.
    fn statements(&self, tree: &ConfigTree, path: &str) -> Result<Vec<String>, CodegenError> {
        let mut statements = Vec::with_capacity(tree.len());
        for (key, value) in tree {
            let access = format!("{}[{}]", path, access_key(key));
            match value {
                ConfigValue::Tree(branch) if branch.is_empty() => {
                    statements.push(format!("{} = array()", access));
                }
                ConfigValue::Tree(branch) => statements.extend(self.statements(branch, &access)?),
                ConfigValue::Scalar(scalar) => {
                    let rendered = emit::scalar(scalar, &access)?;
                    statements.push(format!("{} = {}", access, rendered));
                }
            }
        }
        Ok(statements)
    }
}

fn access_key(key: &Key) -> String {
    emit::text(key, emit::double_quoted)
}

impl Codegen for StructuredCodegen {
    #[instrument(skip(self, tree), fields(container = %self.container), level = "debug")]
    fn generate(&self, tree: &ConfigTree) -> Result<String, CodegenError> {
        let statements = self.statements(tree, &self.container)?;
        if statements.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("{};", statements.join(";\n")))
    }
}
