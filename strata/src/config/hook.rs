//! The pre-load transform applied to the merged tree before validation.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::ConfigTree;
use crate::error::{Error, Result};

type HookFn = dyn Fn(ConfigTree) -> anyhow::Result<ConfigTree> + Send + Sync;

/// A caller-supplied `(tree) -> tree` transform.
///
/// The hook runs exactly once per load, after every directory has been
/// merged and before the schema sees the data. Cloning a hook shares the
/// underlying closure.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use strata::config::{ConfigTree, PreLoadHook};
///
/// let hook = PreLoadHook::new(|mut tree: ConfigTree| {
///     tree.insert("injected".to_string(), json!(true));
///     Ok(tree)
/// });
///
/// let tree = hook.apply(ConfigTree::new()).unwrap();
/// assert_eq!(tree["injected"], true);
/// assert!(PreLoadHook::identity().apply(ConfigTree::new()).unwrap().is_empty());
/// ```
#[derive(Clone, Default)]
pub struct PreLoadHook {
    func: Option<Arc<HookFn>>,
}

impl PreLoadHook {
    /// The hook that returns its input unchanged.
    #[must_use]
    pub fn identity() -> Self {
        Self { func: None }
    }

    /// Wraps a closure as a hook.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(ConfigTree) -> anyhow::Result<ConfigTree> + Send + Sync + 'static,
    {
        Self {
            func: Some(Arc::new(func)),
        }
    }

    /// Whether this is the identity hook.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.func.is_none()
    }

    /// Run the hook over `tree`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hook`] wrapping whatever the closure returned.
    pub fn apply(&self, tree: ConfigTree) -> Result<ConfigTree> {
        match &self.func {
            None => Ok(tree),
            Some(func) => {
                log::debug!("running pre-load hook over {} top-level key(s)", tree.len());
                func(tree).map_err(|source| Error::Hook { source })
            }
        }
    }
}

impl fmt::Debug for PreLoadHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_identity() { "identity" } else { "custom" };
        f.debug_tuple("PreLoadHook").field(&kind).finish()
    }
}

/// Set `value` at the dotted `path`, creating intermediate mappings.
///
/// Any non-mapping value met along the way is replaced by a mapping, the
/// same way a deep merge would replace it.
///
/// # Errors
///
/// Returns [`Error::InvalidOption`] if the path or one of its segments is
/// empty.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use strata::config::{set_path, ConfigTree};
///
/// let mut tree = ConfigTree::new();
/// set_path(&mut tree, "app.server.port", json!(9000)).unwrap();
/// assert_eq!(tree["app"]["server"]["port"], 9000);
/// assert!(set_path(&mut tree, "app..port", json!(1)).is_err());
/// ```
pub fn set_path(tree: &mut ConfigTree, path: &str, value: Value) -> Result<()> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.trim().is_empty()) {
        return Err(Error::invalid_option(
            path,
            "dotted path segments must not be empty",
        ));
    }

    let Some((last, parents)) = segments.split_last() else {
        return Err(Error::invalid_option(path, "path must not be empty"));
    };

    let mut current = tree;
    for segment in parents {
        let slot = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(ConfigTree::new()));
        if !slot.is_object() {
            *slot = Value::Object(ConfigTree::new());
        }
        current = match slot {
            Value::Object(next) => next,
            _ => return Err(Error::invalid_option(path, "cannot descend into a scalar")),
        };
    }

    current.insert((*last).to_string(), value);
    Ok(())
}
