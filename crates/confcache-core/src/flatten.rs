//! Conversion between nested trees and dot-path keyed trees
//!
//! Flattening keeps every leaf and drops every intermediate mapping. Paths
//! are built from the bare key text, so a key that itself contains `.` is
//! indistinguishable from nesting once flattened; [`unflatten`] always
//! splits on every dot.

use tracing::warn;

use crate::value::{ConfigTree, ConfigValue, Key, Text};

/// Path separator between key segments.
pub const PATH_SEPARATOR: char = '.';

/// Expand `tree` so that every leaf is addressed by one dot-joined key.
///
/// Root-level leaves keep their bare key. Traversal is depth-first in
/// insertion order and a flattened key is literal when the root-level key
/// it descends from is literal. A literal tag on a nested key is dropped
/// (with a warning). Empty nested mappings produce no entries.
pub fn flatten(tree: &ConfigTree) -> ConfigTree {
    let mut flat = ConfigTree::new();
    for (key, value) in tree {
        match value {
            ConfigValue::Tree(branch) => {
                flatten_branch(branch, key.as_str(), key.is_literal(), &mut flat);
            }
            ConfigValue::Scalar(_) => {
                flat.insert(key.clone(), value.clone());
            }
        }
    }
    flat
}

fn flatten_branch(branch: &ConfigTree, path: &str, literal: bool, flat: &mut ConfigTree) {
    for (key, value) in branch {
        let child = join_path(path, key.as_str());
        if key.is_literal() && !literal {
            warn!(
                "Literal key '{}' below '{}' is flattened into a quoted path '{}'",
                key.as_str(),
                path,
                child
            );
        }
        match value {
            ConfigValue::Tree(nested) => flatten_branch(nested, &child, literal, flat),
            ConfigValue::Scalar(_) => {
                flat.insert(Text::tagged(child, literal), value.clone());
            }
        }
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}{}{}", parent, PATH_SEPARATOR, key)
    }
}

/// Rebuild nesting by splitting every key on `.`.
///
/// When a leaf and a branch claim the same path the later entry wins. Only
/// the leading segment inherits a literal tag.
pub fn unflatten(flat: &ConfigTree) -> ConfigTree {
    let mut root = ConfigTree::new();
    for (key, value) in flat {
        let mut segments = key.as_str().split(PATH_SEPARATOR);
        let Some(first) = segments.next() else {
            continue;
        };
        let head: Key = Text::tagged(first, key.is_literal());
        let rest: Vec<&str> = segments.collect();
        insert_path(&mut root, head, &rest, value.clone());
    }
    root
}

fn insert_path(tree: &mut ConfigTree, head: Key, rest: &[&str], value: ConfigValue) {
    let Some((next, tail)) = rest.split_first() else {
        tree.insert(head, value);
        return;
    };

    let slot = tree
        .entry(head)
        .or_insert_with(|| ConfigValue::Tree(ConfigTree::new()));
    if !slot.is_tree() {
        *slot = ConfigValue::Tree(ConfigTree::new());
    }
    if let ConfigValue::Tree(branch) = slot {
        insert_path(branch, Text::quoted(*next), tail, value);
    }
}

/// Number of scalar leaves anywhere in `tree`.
pub fn leaf_count(tree: &ConfigTree) -> usize {
    tree.values()
        .map(|value| match value {
            ConfigValue::Tree(branch) => leaf_count(branch),
            ConfigValue::Scalar(_) => 1,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> ConfigTree {
        match ConfigValue::tree([
            ("name", ConfigValue::from("app")),
            (
                "db",
                ConfigValue::tree([
                    ("host", ConfigValue::from("localhost")),
                    (
                        "pool",
                        ConfigValue::tree([
                            ("min", ConfigValue::from(1_i64)),
                            ("max", ConfigValue::from(8_i64)),
                        ]),
                    ),
                ]),
            ),
            ("debug", ConfigValue::from(true)),
        ]) {
            ConfigValue::Tree(tree) => tree,
            ConfigValue::Scalar(_) => unreachable!(),
        }
    }

    fn keys(tree: &ConfigTree) -> Vec<&str> {
        tree.keys().map(|k| k.as_str()).collect()
    }

    #[test]
    fn test_flatten_joins_ancestor_chain() {
        let flat = flatten(&sample());
        assert_eq!(
            keys(&flat),
            vec!["name", "db.host", "db.pool.min", "db.pool.max", "debug"]
        );
        assert_eq!(flat.len(), leaf_count(&sample()));
        assert!(flat.values().all(|v| !v.is_tree()));
    }

    #[test]
    fn test_root_leaf_keeps_bare_key() {
        let flat = flatten(&sample());
        assert_eq!(
            flat.get(&Text::quoted("name")),
            Some(&ConfigValue::from("app"))
        );
    }

    #[test]
    fn test_literal_root_key_tags_descendants() {
        let mut tree = ConfigTree::new();
        tree.insert(
            Text::literal("SECTION"),
            ConfigValue::tree([("inner", ConfigValue::from(1_i64))]),
        );
        let flat = flatten(&tree);
        let (key, _) = flat.first().expect("one entry");
        assert_eq!(key, &Text::literal("SECTION.inner"));
    }

    #[test]
    fn test_nested_literal_key_becomes_quoted_path() {
        let mut inner = ConfigTree::new();
        inner.insert(Text::literal("B"), ConfigValue::from(1_i64));
        let mut tree = ConfigTree::new();
        tree.insert(Text::quoted("a"), ConfigValue::Tree(inner));

        let flat = flatten(&tree);
        assert_eq!(keys(&flat), vec!["a.B"]);
        assert!(flat.keys().all(|key| !key.is_literal()));
    }

    #[test]
    fn test_empty_branch_is_dropped() {
        let mut tree = sample();
        tree.insert(Text::quoted("empty"), ConfigValue::Tree(ConfigTree::new()));
        let flat = flatten(&tree);
        assert!(!keys(&flat).iter().any(|k| k.starts_with("empty")));
    }

    #[test]
    fn test_unflatten_restores_shape() {
        let tree = sample();
        assert_eq!(unflatten(&flatten(&tree)), tree);
    }

    #[test]
    fn test_unflatten_splits_dotted_keys() {
        let mut tree = ConfigTree::new();
        tree.insert(Text::quoted("a.b"), ConfigValue::from(1_i64));
        let rebuilt = unflatten(&flatten(&tree));
        // The dotted key comes back as nesting, not as the original key
        assert!(rebuilt.get(&Text::quoted("a.b")).is_none());
        assert_eq!(
            ConfigValue::Tree(rebuilt).get("a").and_then(|a| a.get("b")),
            Some(&ConfigValue::from(1_i64))
        );
    }

    #[test]
    fn test_unflatten_later_entry_wins() {
        let mut flat = ConfigTree::new();
        flat.insert(Text::quoted("a"), ConfigValue::from(1_i64));
        flat.insert(Text::quoted("a.b"), ConfigValue::from(2_i64));
        let rebuilt = ConfigValue::Tree(unflatten(&flat));
        assert_eq!(
            rebuilt.get("a").and_then(|a| a.get("b")),
            Some(&ConfigValue::from(2_i64))
        );
    }
}
