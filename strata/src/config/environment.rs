//! Environment variable handling: dotenv loading and required-variable checks.
//!
//! The environment is modelled as an injected [`EnvStore`] rather than the
//! ambient process environment, so pipelines can run against an isolated
//! [`MemoryEnv`] in tests and embedders.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::config::warn::WarnMode;
use crate::error::{Error, FileFormat, Result};
use crate::path;

/// Key-value store backing the environment stage.
pub trait EnvStore {
    /// Look up a variable.
    fn get(&self, key: &str) -> Option<String>;

    /// Set a variable, replacing any existing value.
    fn set(&mut self, key: &str, value: &str);

    /// Snapshot every variable currently set.
    fn vars(&self) -> Vec<(String, String)>;

    /// Whether `key` is set (an empty value counts as set).
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// The real process environment.
///
/// Setting a variable through this store is a process-wide side effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvStore for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var_os(key).map(|v| v.to_string_lossy().into_owned())
    }

    fn set(&mut self, key: &str, value: &str) {
        env::set_var(key, value);
    }

    fn vars(&self) -> Vec<(String, String)> {
        env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.to_string_lossy().into_owned())))
            .collect()
    }
}

/// An isolated in-memory environment.
///
/// # Examples
///
/// ```
/// use strata::config::{EnvStore, MemoryEnv};
///
/// let mut env = MemoryEnv::from_pairs([("APP_ENV", "test")]);
/// env.set("DEBUG", "true");
/// assert_eq!(env.get("APP_ENV").as_deref(), Some("test"));
/// assert!(env.contains("DEBUG"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryEnv {
    vars: BTreeMap<String, String>,
}

impl MemoryEnv {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an environment pre-populated with `pairs`.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvStore for MemoryEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Parse a dotenv file into ordered `KEY=VALUE` pairs.
///
/// Error messages carry the file path and the failing position but never
/// the offending line, which may hold secrets.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened and [`Error::Parse`]
/// if a line is malformed.
pub fn read_dotenv(path: &Path) -> Result<Vec<(String, String)>> {
    let iter = dotenvy::from_path_iter(path).map_err(|e| dotenv_error(path, e))?;

    iter.map(|item| item.map_err(|e| dotenv_error(path, e)))
        .collect()
}

fn dotenv_error(path: &Path, err: dotenvy::Error) -> Error {
    match err {
        dotenvy::Error::Io(source) => Error::Io {
            path: path.to_path_buf(),
            source,
        },
        dotenvy::Error::LineParse(_, idx) => Error::Parse {
            path: path.to_path_buf(),
            format: FileFormat::Dotenv,
            message: format!("invalid syntax at position {idx}"),
        },
        _ => Error::Parse {
            path: path.to_path_buf(),
            format: FileFormat::Dotenv,
            message: "unreadable dotenv content".to_string(),
        },
    }
}

/// Loads dotenv files into an environment store and checks required names.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use strata::config::{EnvironmentStage, MemoryEnv, WarnMode};
///
/// let mut env = MemoryEnv::from_pairs([("HOME_DIR", "/home/app")]);
/// let mut stage = EnvironmentStage::new(&mut env, WarnMode::Quiet);
/// stage.load_env_files(&[PathBuf::from("/nonexistent/.env")]).unwrap();
/// stage.check_required_envs(&["HOME_DIR".to_string()]).unwrap();
/// assert!(stage.check_required_envs(&["API_KEY".to_string()]).is_err());
/// ```
pub struct EnvironmentStage<'a> {
    env: &'a mut dyn EnvStore,
    warn_mode: WarnMode,
}

impl<'a> EnvironmentStage<'a> {
    /// Creates a stage writing into `env`.
    pub fn new(env: &'a mut dyn EnvStore, warn_mode: WarnMode) -> Self {
        Self { env, warn_mode }
    }

    /// Load every dotenv file in order; later files override earlier ones.
    ///
    /// Values always override what the store held before the call. Missing
    /// files are reported through the warn mode and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a path cannot be resolved, an existing file cannot
    /// be read or parsed, or a file is missing in strict mode.
    pub fn load_env_files(&mut self, paths: &[PathBuf]) -> Result<()> {
        for env_path in paths {
            let resolved = path::resolve(env_path)?;
            self.load_env_file(&resolved)?;
        }
        Ok(())
    }

    fn load_env_file(&mut self, resolved: &Path) -> Result<()> {
        if !resolved.is_file() {
            return self.warn_mode.report_missing("dotenv file", resolved);
        }

        let pairs = read_dotenv(resolved)?;
        log::debug!(
            "loaded {} variable(s) from '{}'",
            pairs.len(),
            resolved.display()
        );
        for (key, value) in pairs {
            self.env.set(&key, &value);
        }
        Ok(())
    }

    /// Check that each name is present, failing on the first absent one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingEnv`] naming the first missing variable.
    pub fn check_required_envs(&self, names: &[String]) -> Result<()> {
        for name in names {
            if !self.env.contains(name) {
                log::error!("missing required '{name}' environment variable");
                return Err(Error::MissingEnv { name: name.clone() });
            }
        }
        Ok(())
    }
}
