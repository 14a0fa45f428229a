//! Ordered configuration value tree
//!
//! Documents are converted into this tree once, right after parsing. String
//! keys and values carrying the literal-code sigil are tagged as
//! [`Text::Literal`] at that point, so the generators never sniff prefixes.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Default marker requesting verbatim (unquoted) emission of a key or value.
pub const DEFAULT_SIGIL: char = '≈';

/// A string that is either emitted as a quoted literal or as raw code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Text {
    /// Plain string, emitted quoted
    Quoted(String),
    /// Expression text with the sigil already stripped, emitted verbatim
    Literal(String),
}

impl Text {
    /// Classify a raw document string, stripping a leading `sigil`.
    pub fn from_raw(raw: &str, sigil: char) -> Self {
        match raw.strip_prefix(sigil) {
            Some(code) => Text::Literal(code.to_string()),
            None => Text::Quoted(raw.to_string()),
        }
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Text::Quoted(text.into())
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Text::Literal(text.into())
    }

    /// Build a text with the given tag.
    pub fn tagged(text: impl Into<String>, literal: bool) -> Self {
        if literal {
            Text::Literal(text.into())
        } else {
            Text::Quoted(text.into())
        }
    }

    /// The text without any sigil.
    pub fn as_str(&self) -> &str {
        match self {
            Text::Quoted(s) | Text::Literal(s) => s,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Text::Literal(_))
    }

    /// Re-attach the sigil to literal texts, giving back the document form.
    pub fn to_raw(&self, sigil: char) -> String {
        match self {
            Text::Quoted(s) => s.clone(),
            Text::Literal(s) => format!("{}{}", sigil, s),
        }
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::Quoted(s.to_string())
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text::Quoted(s)
    }
}

/// Map keys share the literal/quoted distinction with values.
pub type Key = Text;

/// Insertion-ordered mapping at every level of a document.
pub type ConfigTree = IndexMap<Key, ConfigValue>;

/// Leaf value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`
    Unsigned(u64),
    Float(f64),
    Text(Text),
}

/// A node of the configuration tree: either a leaf or a nested mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Scalar(Scalar),
    Tree(ConfigTree),
}

impl Default for ConfigValue {
    fn default() -> Self {
        ConfigValue::Tree(ConfigTree::new())
    }
}

impl ConfigValue {
    /// Build a nested tree from `(key, value)` pairs, keeping their order.
    pub fn tree<K, I>(entries: I) -> Self
    where
        K: Into<Key>,
        I: IntoIterator<Item = (K, ConfigValue)>,
    {
        ConfigValue::Tree(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn literal(code: impl Into<String>) -> Self {
        ConfigValue::Scalar(Scalar::Text(Text::Literal(code.into())))
    }

    pub fn as_tree(&self) -> Option<&ConfigTree> {
        match self {
            ConfigValue::Tree(tree) => Some(tree),
            ConfigValue::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            ConfigValue::Scalar(scalar) => Some(scalar),
            ConfigValue::Tree(_) => None,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, ConfigValue::Tree(_))
    }

    /// Look up a direct child by its bare key text.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_tree().and_then(|tree| lookup(tree, key))
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Scalar(Scalar::Text(Text::quoted(s)))
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Scalar(Scalar::Text(Text::Quoted(s)))
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Scalar(Scalar::Integer(n))
    }
}

impl From<u64> for ConfigValue {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(signed) => ConfigValue::Scalar(Scalar::Integer(signed)),
            Err(_) => ConfigValue::Scalar(Scalar::Unsigned(n)),
        }
    }
}

impl From<f64> for ConfigValue {
    fn from(n: f64) -> Self {
        ConfigValue::Scalar(Scalar::Float(n))
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Scalar(Scalar::Bool(b))
    }
}

impl From<ConfigTree> for ConfigValue {
    fn from(tree: ConfigTree) -> Self {
        ConfigValue::Tree(tree)
    }
}

/// Serialization view that writes literal texts back with `sigil` attached.
///
/// Plain `Serialize` on the tree types uses [`DEFAULT_SIGIL`].
#[derive(Debug)]
pub struct WithSigil<'a, T: ?Sized> {
    value: &'a T,
    sigil: char,
}

impl<'a, T: ?Sized> WithSigil<'a, T> {
    pub fn new(value: &'a T, sigil: char) -> Self {
        Self { value, sigil }
    }

    fn wrap<U: ?Sized>(&self, value: &'a U) -> WithSigil<'a, U> {
        WithSigil::new(value, self.sigil)
    }
}

impl Serialize for WithSigil<'_, Text> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value.to_raw(self.sigil))
    }
}

impl Serialize for WithSigil<'_, Scalar> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Integer(n) => serializer.serialize_i64(*n),
            Scalar::Unsigned(n) => serializer.serialize_u64(*n),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::Text(text) => self.wrap(text).serialize(serializer),
        }
    }
}

impl Serialize for WithSigil<'_, ConfigTree> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.value.len()))?;
        for (key, value) in self.value {
            map.serialize_entry(&self.wrap(key), &self.wrap(value))?;
        }
        map.end()
    }
}

impl Serialize for WithSigil<'_, ConfigValue> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            ConfigValue::Scalar(scalar) => self.wrap(scalar).serialize(serializer),
            ConfigValue::Tree(tree) => self.wrap(tree).serialize(serializer),
        }
    }
}

impl Serialize for Text {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WithSigil::new(self, DEFAULT_SIGIL).serialize(serializer)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WithSigil::new(self, DEFAULT_SIGIL).serialize(serializer)
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WithSigil::new(self, DEFAULT_SIGIL).serialize(serializer)
    }
}

/// Find an entry by bare key text, whether the key is quoted or literal.
pub fn lookup<'a>(tree: &'a ConfigTree, key: &str) -> Option<&'a ConfigValue> {
    tree.iter()
        .find(|(k, _)| k.as_str() == key)
        .map(|(_, v)| v)
}
