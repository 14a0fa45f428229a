//! Structured-document parser collaborator and its YAML implementation

use confcache_core::{ConfigTree, ConfigValue, Key, Scalar, Text, DEFAULT_SIGIL};
use serde_yaml::Value;
use std::path::Path;
use tracing::trace;

use crate::error::ParserError;

/// Turns one document into an ordered value tree.
pub trait DocumentParser {
    fn parse(&self, path: &Path) -> Result<ConfigTree, ParserError>;
}

/// YAML documents, with sigil tagging applied during conversion.
#[derive(Debug, Clone)]
pub struct YamlParser {
    sigil: char,
}

impl Default for YamlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl YamlParser {
    pub fn new() -> Self {
        Self {
            sigil: DEFAULT_SIGIL,
        }
    }

    pub fn with_sigil(sigil: char) -> Self {
        Self { sigil }
    }

    pub fn sigil(&self) -> char {
        self.sigil
    }

    /// Parse document text; `origin` is only used for error reporting.
    pub fn parse_str(&self, content: &str, origin: &Path) -> Result<ConfigTree, ParserError> {
        if is_blank_document(content) {
            return Ok(ConfigTree::new());
        }

        let mut value: Value = serde_yaml::from_str(content).map_err(|e| ParserError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
        value.apply_merge().map_err(|e| ParserError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;

        match value {
            Value::Null => Ok(ConfigTree::new()),
            Value::Mapping(_) | Value::Sequence(_) => match self.convert(value, origin)? {
                ConfigValue::Tree(tree) => Ok(tree),
                ConfigValue::Scalar(_) => Err(ParserError::InvalidRoot {
                    path: origin.to_path_buf(),
                }),
            },
            _ => Err(ParserError::InvalidRoot {
                path: origin.to_path_buf(),
            }),
        }
    }

    fn convert(&self, value: Value, origin: &Path) -> Result<ConfigValue, ParserError> {
        let converted = match value {
            Value::Null => ConfigValue::Scalar(Scalar::Null),
            Value::Bool(b) => ConfigValue::Scalar(Scalar::Bool(b)),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => ConfigValue::Scalar(Scalar::Integer(i)),
                (None, Some(u)) => ConfigValue::Scalar(Scalar::Unsigned(u)),
                (None, None) => ConfigValue::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            Value::String(s) => ConfigValue::Scalar(Scalar::Text(Text::from_raw(&s, self.sigil))),
            // Sequences collapse to index-keyed mappings
            Value::Sequence(items) => {
                let mut tree = ConfigTree::new();
                for (index, item) in items.into_iter().enumerate() {
                    tree.insert(Text::Quoted(index.to_string()), self.convert(item, origin)?);
                }
                ConfigValue::Tree(tree)
            }
            Value::Mapping(mapping) => {
                let mut tree = ConfigTree::new();
                for (key, item) in mapping {
                    let key = self.convert_key(key, origin)?;
                    tree.insert(key, self.convert(item, origin)?);
                }
                ConfigValue::Tree(tree)
            }
            Value::Tagged(tagged) => {
                trace!("Ignoring YAML tag {} in {:?}", tagged.tag, origin);
                self.convert(tagged.value, origin)?
            }
        };
        Ok(converted)
    }

    fn convert_key(&self, key: Value, origin: &Path) -> Result<Key, ParserError> {
        match key {
            Value::String(s) => Ok(Text::from_raw(&s, self.sigil)),
            Value::Number(n) => Ok(Text::Quoted(n.to_string())),
            Value::Bool(b) => Ok(Text::Quoted(b.to_string())),
            Value::Null => Ok(Text::Quoted(String::new())),
            Value::Tagged(tagged) => self.convert_key(tagged.value, origin),
            Value::Sequence(_) | Value::Mapping(_) => Err(ParserError::Parse {
                path: origin.to_path_buf(),
                message: "mapping keys must be scalars".to_string(),
            }),
        }
    }
}

fn is_blank_document(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}

impl DocumentParser for YamlParser {
    fn parse(&self, path: &Path) -> Result<ConfigTree, ParserError> {
        let content = std::fs::read_to_string(path).map_err(|source| ParserError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_str(&content, path)
    }
}
