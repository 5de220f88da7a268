//! Schema definitions consumed by the materializer.
//!
//! A schema is any serde-deserializable type implementing [`ConfigSchema`].
//! The trait supplies the settings that drive the environment, dotenv and
//! secrets sources, plus a hook for constraints serde cannot express.

use std::fmt;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::config::ConfigTree;
use crate::error::FieldViolation;

/// A typed configuration schema.
///
/// Unknown keys are accepted unless the type opts into
/// `#[serde(deny_unknown_fields)]`.
///
/// # Examples
///
/// ```
/// use serde::Deserialize;
/// use strata::config::{ConfigSchema, SchemaSettings, Violations};
/// use strata::FieldViolation;
///
/// #[derive(Debug, Deserialize)]
/// #[serde(deny_unknown_fields)]
/// struct AppConfig {
///     name: String,
///     port: u16,
/// }
///
/// impl ConfigSchema for AppConfig {
///     fn settings() -> SchemaSettings {
///         SchemaSettings::new().env_prefix("APP_").env_keys(["name", "port"])
///     }
///
///     fn validate(&self) -> Result<(), Vec<FieldViolation>> {
///         let mut violations = Violations::new();
///         violations.range("port", self.port, 1024, u16::MAX);
///         violations.finish()
///     }
/// }
/// ```
pub trait ConfigSchema: DeserializeOwned + Send + Sync + 'static {
    /// Settings for the non-file sources of this schema.
    #[must_use]
    fn settings() -> SchemaSettings {
        SchemaSettings::default()
    }

    /// Constraint checks run after deserialization.
    ///
    /// # Errors
    ///
    /// Returns every violated constraint.
    fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        Ok(())
    }
}

/// Where a schema reads values besides the merged tree.
///
/// Only the keys listed in `env_keys` are looked up in the environment,
/// dotenv files and the secrets directory. The variable for key `port` with
/// prefix `APP_` is `APP_PORT`; matching ignores case unless
/// [`SchemaSettings::case_sensitive`] is set.
///
/// # Examples
///
/// ```
/// use strata::config::SchemaSettings;
///
/// let settings = SchemaSettings::new()
///     .env_prefix("APP_")
///     .env_keys(["db", "debug"])
///     .nested_delimiter("__")
///     .secrets_dir("/run/secrets");
///
/// assert_eq!(settings.env_name("db"), "APP_db");
/// assert_eq!(settings.env_keys.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSettings {
    /// Prefix prepended to every key when looking up variables.
    pub env_prefix: String,
    /// Schema keys read from the environment, dotenv files and secrets.
    pub env_keys: Vec<String>,
    /// Delimiter splitting a variable name into a nested path.
    pub nested_delimiter: Option<String>,
    /// Dotenv files read as the lowest-precedence source.
    pub env_files: Vec<PathBuf>,
    /// Directory holding one file per secret key.
    pub secrets_dir: Option<PathBuf>,
    /// Whether variable and secret names must match case exactly.
    pub case_sensitive: bool,
}

impl SchemaSettings {
    /// Settings with no prefix and no declared keys.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the variable prefix.
    #[must_use]
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Declare the keys read from the environment.
    #[must_use]
    pub fn env_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set the nested-key delimiter (e.g. `__`).
    #[must_use]
    pub fn nested_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.nested_delimiter = Some(delimiter.into());
        self
    }

    /// Add a dotenv file to the schema's own dotenv source.
    #[must_use]
    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_files.push(path.into());
        self
    }

    /// Set the secrets directory.
    #[must_use]
    pub fn secrets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.secrets_dir = Some(dir.into());
        self
    }

    /// Require exact-case variable and secret names.
    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// The full variable name for `key`.
    #[must_use]
    pub fn env_name(&self, key: &str) -> String {
        format!("{}{key}", self.env_prefix)
    }
}

/// The permissive default schema: any mapping is accepted as-is.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use strata::config::BaseConfig;
///
/// let config: BaseConfig = serde_json::from_value(json!({
///     "app": {"name": "demo", "port": 8000},
/// })).unwrap();
///
/// assert_eq!(config.get_path("app.port"), Some(&json!(8000)));
/// assert!(config.get_path("app.missing").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct BaseConfig {
    values: ConfigTree,
}

impl BaseConfig {
    /// Look up a top-level key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Look up a dotted path such as `app.server.port`.
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = self.values.get(segments.next()?)?;
        segments.try_fold(first, |value, segment| value.as_object()?.get(segment))
    }

    /// The whole tree.
    #[must_use]
    pub fn as_tree(&self) -> &ConfigTree {
        &self.values
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the configuration has no keys at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigSchema for BaseConfig {}

/// A loaded, read-only configuration value.
///
/// `Frozen` hands out shared references only; clones share the same value.
///
/// ```compile_fail
/// use strata::config::Frozen;
///
/// struct App {
///     port: u16,
/// }
///
/// let frozen = Frozen::new(App { port: 8000 });
/// frozen.port = 9000;
/// ```
///
/// # Examples
///
/// ```
/// use strata::config::Frozen;
///
/// let frozen = Frozen::new(vec![1, 2, 3]);
/// let shared = frozen.clone();
/// assert_eq!(shared.len(), 3);
/// assert_eq!(frozen, shared);
/// ```
pub struct Frozen<T>(Arc<T>);

impl<T> Frozen<T> {
    /// Freeze `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl<T> Clone for Frozen<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Deref for Frozen<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> AsRef<T> for Frozen<T> {
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Frozen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Frozen").field(&*self.0).finish()
    }
}

impl<T: PartialEq> PartialEq for Frozen<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl<T: Serialize> Serialize for Frozen<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
