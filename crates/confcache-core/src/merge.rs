//! Deep merge for configuration trees.
//!
//! # Merge Semantics
//!
//! - **Trees**: Merge entries recursively, with "other" values winning on key conflicts
//! - **Scalars, or a scalar meeting a tree**: "other" replaces the base entirely
//! - **Ordering**: keys keep the position they had in the base; new keys append
//!
//! # Example
//!
//! ```rust
//! use confcache_core::{ConfigValue, Merge};
//!
//! let base = ConfigValue::tree([("a", ConfigValue::from(1_i64)), ("b", ConfigValue::from(2_i64))]);
//! let overlay = ConfigValue::tree([("b", ConfigValue::from(3_i64)), ("c", ConfigValue::from(4_i64))]);
//! let merged = base.merge(overlay);
//!
//! assert_eq!(merged.get("a"), Some(&ConfigValue::from(1_i64)));  // Base preserved
//! assert_eq!(merged.get("b"), Some(&ConfigValue::from(3_i64)));  // Overlay wins
//! assert_eq!(merged.get("c"), Some(&ConfigValue::from(4_i64)));  // New key appended
//! ```

use indexmap::IndexMap;
use std::hash::Hash;

use crate::value::ConfigValue;

/// Trait for deep merging configuration values.
pub trait Merge: Sized {
    /// Merge `other` into `self`, with `other` taking precedence.
    ///
    /// This consumes both values and returns the merged result.
    fn merge(self, other: Self) -> Self;

    /// Merge multiple overlays in sequence.
    ///
    /// Later overlays take precedence over earlier ones.
    fn merge_all<I>(self, overlays: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        overlays.into_iter().fold(self, |acc, overlay| acc.merge(overlay))
    }
}

impl<K, V> Merge for IndexMap<K, V>
where
    K: Eq + Hash,
    V: Merge + Default,
{
    fn merge(mut self, other: Self) -> Self {
        for (key, other_value) in other {
            match self.get_mut(&key) {
                Some(slot) => {
                    let self_value = std::mem::take(slot);
                    *slot = self_value.merge(other_value);
                }
                None => {
                    self.insert(key, other_value);
                }
            }
        }
        self
    }
}

impl Merge for ConfigValue {
    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (ConfigValue::Tree(base), ConfigValue::Tree(overlay)) => {
                ConfigValue::Tree(base.merge(overlay))
            }
            (_, overlay) => overlay,
        }
    }
}
