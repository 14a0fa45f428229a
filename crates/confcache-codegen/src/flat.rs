//! Flatten mode: one `segment['dot.path'] = value;` per leaf

use confcache_core::{flatten, ConfigTree, ConfigValue, Key, Text};
use tracing::instrument;

use crate::emit;
use crate::{Codegen, CodegenError};

/// Container expression that flat assignments write into.
///
/// The expression is emitted verbatim. Its stem is the last access key of
/// the expression (`app` for `$cfg['app']`) or the bare variable name
/// (`config` for `$config`), and is stripped from the front of dot-paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    expression: String,
    stem: String,
}

impl Segment {
    pub fn parse(expression: &str) -> Result<Self, CodegenError> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(CodegenError::InvalidArgument(
                "flatten mode requires a segment name".to_string(),
            ));
        }

        Ok(Self {
            expression: expression.to_string(),
            stem: segment_stem(expression),
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Drop a leading `stem.` from a flattened key.
    pub fn strip(&self, key: &Key) -> Key {
        let stripped = key
            .as_str()
            .strip_prefix(self.stem.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .filter(|rest| !rest.is_empty());
        match stripped {
            Some(rest) => Text::tagged(rest, key.is_literal()),
            None => key.clone(),
        }
    }
}

fn segment_stem(expression: &str) -> String {
    if let Some(inner) = expression.strip_suffix(']') {
        if let Some(open) = inner.rfind('[') {
            let access = inner[open + 1..].trim();
            return access.trim_matches(|c| c == '\'' || c == '"').to_string();
        }
    }
    expression.trim_start_matches('$').to_string()
}

/// Generator for flatten mode.
#[derive(Debug, Clone)]
pub struct FlatCodegen {
    segment: Segment,
}

impl FlatCodegen {
    pub fn new(segment: &str) -> Result<Self, CodegenError> {
        Ok(Self {
            segment: Segment::parse(segment)?,
        })
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    fn statement(&self, key: &Key, value: &ConfigValue) -> Result<String, CodegenError> {
        let key = self.segment.strip(key);
        let target = format!(
            "{}[{}]",
            self.segment.expression(),
            emit::text(&key, emit::single_quoted)
        );
        let rendered = match value {
            ConfigValue::Scalar(scalar) => emit::scalar(scalar, &target)?,
            // flatten() only leaves scalars behind
            ConfigValue::Tree(_) => "array()".to_string(),
        };
        Ok(format!("{} = {};", target, rendered))
    }
}

impl Codegen for FlatCodegen {
    #[instrument(skip(self, tree), fields(segment = %self.segment.expression), level = "debug")]
    fn generate(&self, tree: &ConfigTree) -> Result<String, CodegenError> {
        let statements = flatten(tree)
            .iter()
            .map(|(key, value)| self.statement(key, value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(statements.join("\n"))
    }
}
