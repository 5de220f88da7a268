//! Configuration directory discovery and loading.
//!
//! This module covers the file aggregation stage (every configured directory,
//! in caller order) and the extra-overlay stage (one optional directory merged
//! on top of everything else).

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::environment::EnvStore;
use crate::config::merger::ConfigMerger;
use crate::config::warn::WarnMode;
use crate::config::ConfigTree;
use crate::error::{Error, FileFormat, Result};
use crate::path;

/// Environment variable naming the extra overlay directory.
pub const EXTRA_DIR_ENV: &str = "STRATA_EXTRA_DIR";

/// A parsed configuration fragment and the file it came from.
///
/// # Examples
///
/// ```
/// use strata::config::{ConfigSource, ConfigTree};
/// use std::path::PathBuf;
///
/// let source = ConfigSource::new(PathBuf::from("configs/app.yaml"), ConfigTree::new());
/// assert!(source.tree.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSource {
    /// Path to the configuration file.
    pub path: PathBuf,
    /// Parsed configuration.
    pub tree: ConfigTree,
}

impl ConfigSource {
    /// Creates a source for `tree` parsed from `path`.
    #[must_use]
    pub fn new(path: PathBuf, tree: ConfigTree) -> Self {
        Self { path, tree }
    }
}

/// Loads YAML and JSON fragments from configuration directories.
///
/// # Examples
///
/// ```no_run
/// use strata::config::{ConfigTree, FileLoader, WarnMode};
/// use std::path::PathBuf;
///
/// let loader = FileLoader::new(WarnMode::Warn);
/// let tree = loader
///     .load_dirs(&[PathBuf::from("configs")], ConfigTree::new())
///     .unwrap();
/// println!("loaded {} top-level keys", tree.len());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader {
    warn_mode: WarnMode,
}

impl FileLoader {
    /// Creates a loader reporting missing directories through `warn_mode`.
    #[must_use]
    pub const fn new(warn_mode: WarnMode) -> Self {
        Self { warn_mode }
    }

    /// Load and parse a single YAML or JSON file.
    ///
    /// An empty or `null` document yields an empty tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] for an unsupported extension,
    /// [`Error::Io`] if the file cannot be read and [`Error::Parse`] if it is
    /// malformed or its top level is not a mapping.
    pub fn load_file(path: &Path) -> Result<ConfigTree> {
        let format = FileFormat::from_path(path).ok_or_else(|| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "expected a .yaml, .yml or .json file".to_string(),
        })?;

        let contents = fs::read_to_string(path).map_err(|e| Error::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        parse_tree(&contents, format, path)
    }

    /// List the config files of a directory in the order they are applied.
    ///
    /// Returns `Ok(None)` if the directory does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be resolved or the directory
    /// cannot be listed.
    pub fn collect_files(dir: &Path) -> Result<Option<Vec<PathBuf>>> {
        let resolved = path::resolve(dir)?;
        if !resolved.is_dir() {
            return Ok(None);
        }

        let entries = fs::read_dir(&resolved).map_err(|e| Error::Io {
            path: resolved.clone(),
            source: e,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::Io {
                path: resolved.clone(),
                source: e,
            })?;
            let file = entry.path();
            if file.is_file() && FileFormat::from_path(&file).is_some() {
                files.push(file);
            }
        }
        files.sort();

        Ok(Some(files))
    }

    /// Parse every fragment of `dir`, in application order.
    ///
    /// A missing directory is reported through the warn mode and yields no
    /// sources.
    ///
    /// # Errors
    ///
    /// Returns an error if a fragment cannot be read or parsed, or the
    /// directory is missing in strict mode.
    pub fn load_sources(&self, dir: &Path) -> Result<Vec<ConfigSource>> {
        let Some(files) = Self::collect_files(dir)? else {
            let resolved = path::resolve(dir)?;
            self.warn_mode.report_missing("config directory", &resolved)?;
            return Ok(Vec::new());
        };

        files
            .into_iter()
            .map(|file| {
                let tree = Self::load_file(&file)?;
                log::debug!("loaded config file '{}'", file.display());
                Ok(ConfigSource::new(file, tree))
            })
            .collect()
    }

    /// Merge every fragment of `dir` over `tree`.
    ///
    /// # Errors
    ///
    /// See [`FileLoader::load_sources`].
    pub fn load_dir(&self, dir: &Path, mut tree: ConfigTree) -> Result<ConfigTree> {
        for source in self.load_sources(dir)? {
            ConfigMerger::merge_into(&mut tree, &source.tree);
        }
        Ok(tree)
    }

    /// Merge every directory in `dirs`, in order, over `start`.
    ///
    /// # Errors
    ///
    /// See [`FileLoader::load_sources`].
    pub fn load_dirs(&self, dirs: &[PathBuf], start: ConfigTree) -> Result<ConfigTree> {
        dirs.iter()
            .try_fold(start, |tree, dir| self.load_dir(dir, tree))
    }

    /// Pick the extra overlay directory.
    ///
    /// An explicit directory wins; otherwise [`EXTRA_DIR_ENV`] is read from
    /// `env` and ignored when empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::{Path, PathBuf};
    /// use strata::config::{FileLoader, MemoryEnv};
    ///
    /// let env = MemoryEnv::from_pairs([("STRATA_EXTRA_DIR", "/srv/extra")]);
    /// assert_eq!(FileLoader::resolve_extra_dir(None, &env), Some(PathBuf::from("/srv/extra")));
    /// assert_eq!(
    ///     FileLoader::resolve_extra_dir(Some(Path::new("local")), &env),
    ///     Some(PathBuf::from("local")),
    /// );
    /// ```
    #[must_use]
    pub fn resolve_extra_dir(explicit: Option<&Path>, env: &dyn EnvStore) -> Option<PathBuf> {
        if let Some(dir) = explicit {
            return Some(dir.to_path_buf());
        }

        env.get(EXTRA_DIR_ENV)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Merge the extra overlay directory, if any, over `tree`.
    ///
    /// # Errors
    ///
    /// See [`FileLoader::load_sources`].
    pub fn load_extra_dir(
        &self,
        explicit: Option<&Path>,
        env: &dyn EnvStore,
        tree: ConfigTree,
    ) -> Result<ConfigTree> {
        match Self::resolve_extra_dir(explicit, env) {
            Some(dir) => {
                log::debug!("applying extra config directory '{}'", dir.display());
                self.load_dir(&dir, tree)
            }
            None => Ok(tree),
        }
    }
}

/// Parse `contents` as a config tree in `format`.
fn parse_tree(contents: &str, format: FileFormat, path: &Path) -> Result<ConfigTree> {
    let parse_error = |message: String| Error::Parse {
        path: path.to_path_buf(),
        format,
        message,
    };

    if contents.trim().is_empty() {
        return Ok(ConfigTree::new());
    }

    let value = match format {
        FileFormat::Yaml => {
            let mut yaml: serde_yaml::Value =
                serde_yaml::from_str(contents).map_err(|e| parse_error(e.to_string()))?;
            yaml.apply_merge().map_err(|e| parse_error(e.to_string()))?;
            serde_json::to_value(yaml).map_err(|e| parse_error(e.to_string()))?
        }
        FileFormat::Json | FileFormat::Dotenv => {
            serde_json::from_str(contents).map_err(|e| parse_error(e.to_string()))?
        }
    };

    match value {
        Value::Null => Ok(ConfigTree::new()),
        Value::Object(map) => Ok(map),
        other => Err(parse_error(format!(
            "top-level document must be a mapping, found {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
