//! The load pipeline: runs every stage in order and keeps the last result.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::environment::{EnvStore, EnvironmentStage, MemoryEnv};
use crate::config::hook::PreLoadHook;
use crate::config::loader::FileLoader;
use crate::config::schema::{ConfigSchema, Frozen};
use crate::config::sources::materialize;
use crate::config::warn::WarnMode;
use crate::config::ConfigTree;
use crate::error::Result;
use crate::path;

/// Lifecycle of a [`ConfigLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Built, never loaded.
    Constructed,
    /// A load is running.
    Loading,
    /// The last load succeeded.
    Loaded,
    /// The last load failed.
    Failed,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constructed => write!(f, "constructed"),
            Self::Loading => write!(f, "loading"),
            Self::Loaded => write!(f, "loaded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// What a planned source is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A dotenv file.
    EnvFile,
    /// A configured directory.
    ConfigDir,
    /// The extra overlay directory.
    ExtraDir,
    /// A YAML or JSON fragment inside a directory.
    ConfigFile,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvFile => write!(f, "env-file"),
            Self::ConfigDir => write!(f, "config-dir"),
            Self::ExtraDir => write!(f, "extra-dir"),
            Self::ConfigFile => write!(f, "config-file"),
        }
    }
}

/// One entry of [`ConfigLoader::plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSource {
    /// What the path is.
    pub kind: SourceKind,
    /// The resolved path.
    pub path: PathBuf,
    /// Whether the path exists.
    pub exists: bool,
}

/// Loads configuration of schema `T`.
///
/// Built by [`ConfigBuilder`](crate::config::ConfigBuilder). Each call to
/// [`ConfigLoader::load`] re-runs every stage from scratch.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use strata::config::{ConfigBuilder, LoadState, MemoryEnv};
///
/// let mut loader = ConfigBuilder::new()
///     .config_dirs(Vec::<&str>::new())
///     .env_files(Vec::<&str>::new())
///     .config_data(serde_json::from_value(json!({"name": "demo"})).unwrap())
///     .env_store(MemoryEnv::new())
///     .build()
///     .unwrap();
/// assert_eq!(loader.state(), LoadState::Constructed);
///
/// let config = loader.load().unwrap();
/// assert_eq!(config.get("name"), Some(&json!("demo")));
/// assert_eq!(loader.state(), LoadState::Loaded);
/// assert!(loader.config().is_some());
/// ```
pub struct ConfigLoader<T> {
    pub(crate) config_dirs: Vec<PathBuf>,
    pub(crate) env_files: Vec<PathBuf>,
    pub(crate) required_envs: Vec<String>,
    pub(crate) hook: PreLoadHook,
    pub(crate) extra_dir: Option<PathBuf>,
    pub(crate) config_data: ConfigTree,
    pub(crate) warn_mode: WarnMode,
    pub(crate) env: Box<dyn EnvStore>,
    pub(crate) tree: Option<ConfigTree>,
    pub(crate) config: Option<Frozen<T>>,
    pub(crate) state: LoadState,
}

impl<T: ConfigSchema> ConfigLoader<T> {
    /// Run the pipeline and return the validated configuration.
    ///
    /// On failure the error is logged and returned unchanged, and the tree
    /// and configuration of any previous load are discarded.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any stage: dotenv loading, the
    /// required-variable check, directory loading, the pre-load hook, or
    /// schema validation.
    pub fn load(&mut self) -> Result<Frozen<T>> {
        self.state = LoadState::Loading;
        self.tree = None;
        self.config = None;

        match self.run() {
            Ok((tree, config)) => {
                log::debug!("configuration loaded with {} top-level key(s)", tree.len());
                self.tree = Some(tree);
                self.config = Some(config.clone());
                self.state = LoadState::Loaded;
                Ok(config)
            }
            Err(e) => {
                log::error!("failed to load configuration: {e}");
                self.state = LoadState::Failed;
                Err(e)
            }
        }
    }

    fn run(&mut self) -> Result<(ConfigTree, Frozen<T>)> {
        let mut stage = EnvironmentStage::new(&mut *self.env, self.warn_mode);
        stage.load_env_files(&self.env_files)?;
        stage.check_required_envs(&self.required_envs)?;

        let files = FileLoader::new(self.warn_mode);
        let tree = files.load_dirs(&self.config_dirs, self.config_data.clone())?;
        let tree = files.load_extra_dir(self.extra_dir.as_deref(), &*self.env, tree)?;
        let tree = self.hook.apply(tree)?;

        let config = materialize::<T>(&tree, &*self.env)?;
        Ok((tree, config))
    }

    /// List every dotenv file, directory and fragment a load would read, in
    /// application order.
    ///
    /// Nothing is loaded into the store. The dotenv files are read into a
    /// scratch copy of it, so an extra directory named by `STRATA_EXTRA_DIR`
    /// in a dotenv file is planned the same way `load()` would apply it.
    ///
    /// # Errors
    ///
    /// Returns an error if a path cannot be resolved, an existing dotenv file
    /// cannot be parsed, or a directory cannot be listed.
    pub fn plan(&self) -> Result<Vec<PlannedSource>> {
        let mut planned = Vec::new();

        for env_file in &self.env_files {
            let resolved = path::resolve(env_file)?;
            planned.push(PlannedSource {
                kind: SourceKind::EnvFile,
                exists: resolved.is_file(),
                path: resolved,
            });
        }

        for dir in &self.config_dirs {
            Self::plan_dir(&mut planned, SourceKind::ConfigDir, dir)?;
        }

        let mut scratch = MemoryEnv::from_pairs(self.env.vars());
        EnvironmentStage::new(&mut scratch, WarnMode::Quiet).load_env_files(&self.env_files)?;

        if let Some(extra) = FileLoader::resolve_extra_dir(self.extra_dir.as_deref(), &scratch) {
            Self::plan_dir(&mut planned, SourceKind::ExtraDir, &extra)?;
        }

        Ok(planned)
    }

    fn plan_dir(planned: &mut Vec<PlannedSource>, kind: SourceKind, dir: &Path) -> Result<()> {
        let files = FileLoader::collect_files(dir)?;
        planned.push(PlannedSource {
            kind,
            path: path::resolve(dir)?,
            exists: files.is_some(),
        });
        planned.extend(files.into_iter().flatten().map(|file| PlannedSource {
            kind: SourceKind::ConfigFile,
            path: file,
            exists: true,
        }));
        Ok(())
    }

    /// The configuration from the last successful load.
    #[must_use]
    pub fn config(&self) -> Option<&Frozen<T>> {
        self.config.as_ref()
    }

    /// The merged tree handed to the schema by the last successful load.
    #[must_use]
    pub fn tree(&self) -> Option<&ConfigTree> {
        self.tree.as_ref()
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Configured directories, in application order.
    #[must_use]
    pub fn config_dirs(&self) -> &[PathBuf] {
        &self.config_dirs
    }

    /// Configured dotenv files, in load order.
    #[must_use]
    pub fn env_files(&self) -> &[PathBuf] {
        &self.env_files
    }

    /// Required environment variable names.
    #[must_use]
    pub fn required_envs(&self) -> &[String] {
        &self.required_envs
    }

    /// The explicit extra directory, if any.
    #[must_use]
    pub fn extra_dir(&self) -> Option<&Path> {
        self.extra_dir.as_deref()
    }

    /// How missing paths are reported.
    #[must_use]
    pub fn warn_mode(&self) -> WarnMode {
        self.warn_mode
    }

    /// The environment store the loader reads and writes.
    #[must_use]
    pub fn env(&self) -> &dyn EnvStore {
        &*self.env
    }
}

impl<T> fmt::Debug for ConfigLoader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("config_dirs", &self.config_dirs)
            .field("env_files", &self.env_files)
            .field("required_envs", &self.required_envs)
            .field("extra_dir", &self.extra_dir)
            .field("warn_mode", &self.warn_mode)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
