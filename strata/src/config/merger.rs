//! Configuration tree merging and precedence handling.
//!
//! A single conflict-resolution policy is used everywhere in the pipeline:
//! the later tree wins at every key, and the merge only recurses when both
//! sides hold a mapping. Sequences and mismatched shapes are replaced
//! wholesale.

use serde_json::Value;

use crate::config::loader::ConfigSource;
use crate::config::ConfigTree;

/// Return a new tree that is `overlay` deep-merged over `base`.
///
/// Neither input is modified; values copied from either side are cloned so
/// the result never aliases the inputs.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use strata::config::{deep_merge, ConfigTree};
///
/// let base: ConfigTree = serde_json::from_value(json!({
///     "app": {"name": "demo", "port": 8000},
///     "hosts": ["a", "b"],
/// })).unwrap();
/// let overlay: ConfigTree = serde_json::from_value(json!({
///     "app": {"port": 9000},
///     "hosts": ["c"],
/// })).unwrap();
///
/// let merged = deep_merge(&base, &overlay);
/// assert_eq!(merged["app"]["name"], "demo");
/// assert_eq!(merged["app"]["port"], 9000);
/// assert_eq!(merged["hosts"], json!(["c"]));
/// ```
#[must_use]
pub fn deep_merge(base: &ConfigTree, overlay: &ConfigTree) -> ConfigTree {
    let mut merged = base.clone();

    for (key, overlay_value) in overlay {
        let value = match (merged.get(key), overlay_value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                Value::Object(deep_merge(existing, incoming))
            }
            _ => overlay_value.clone(),
        };
        merged.insert(key.clone(), value);
    }

    merged
}

/// Merges ordered configuration sources into one tree.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use std::path::PathBuf;
/// use strata::config::{ConfigMerger, ConfigSource};
///
/// let low = ConfigSource::new(PathBuf::from("a.yaml"), serde_json::from_value(json!({"x": 1})).unwrap());
/// let high = ConfigSource::new(PathBuf::from("b.yaml"), serde_json::from_value(json!({"x": 2})).unwrap());
///
/// let merged = ConfigMerger::merge(vec![low, high]);
/// assert_eq!(merged["x"], 2);
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into a final tree.
    ///
    /// Sources are provided from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> ConfigTree {
        let mut result = ConfigTree::new();
        for source in sources {
            Self::merge_into(&mut result, &source.tree);
        }
        result
    }

    /// Merge `source` over `target` in place (source wins).
    pub fn merge_into(target: &mut ConfigTree, source: &ConfigTree) {
        *target = deep_merge(target, source);
    }
}
