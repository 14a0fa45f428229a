//! Post-merge filtering applied before code generation

use tracing::debug;

use crate::error::CoreError;
use crate::value::{ConfigTree, ConfigValue};

/// Drop ignored top-level keys and optionally unwrap the main key.
///
/// With `include_main_key` disabled the result is the mapping stored under
/// the first remaining top-level key. Any filtering that leaves nothing to
/// generate from is reported as [`CoreError::EmptyConfig`].
pub fn apply_filters(
    mut tree: ConfigTree,
    ignore_keys: &[String],
    include_main_key: bool,
) -> Result<ConfigTree, CoreError> {
    if !ignore_keys.is_empty() {
        let before = tree.len();
        tree.retain(|key, _| !ignore_keys.iter().any(|ignored| ignored == key.as_str()));
        debug!(
            "Ignored {} top-level key(s) of {}",
            before - tree.len(),
            before
        );
    }

    let Some((main_key, main_value)) = tree.first() else {
        return Err(CoreError::EmptyConfig(
            "no top-level keys remain after filtering".to_string(),
        ));
    };

    if include_main_key {
        return Ok(tree);
    }

    debug!("Unwrapping main key '{}'", main_key.as_str());
    match main_value {
        ConfigValue::Tree(inner) if !inner.is_empty() => Ok(inner.clone()),
        _ => Err(CoreError::EmptyConfig(format!(
            "main key '{}' holds no nested configuration",
            main_key.as_str()
        ))),
    }
}
