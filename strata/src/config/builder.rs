//! Fallible builder for [`ConfigLoader`].
//!
//! Every option is validated once in [`ConfigBuilder::build`], before any
//! file or environment variable is touched.

use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;

use crate::config::environment::{EnvStore, ProcessEnv};
use crate::config::hook::PreLoadHook;
use crate::config::pipeline::{ConfigLoader, LoadState};
use crate::config::schema::{BaseConfig, ConfigSchema, Frozen};
use crate::config::validator::ConfigValidator;
use crate::config::warn::WarnMode;
use crate::config::ConfigTree;
use crate::error::Result;

/// Default configuration directory, relative to the working directory.
pub const DEFAULT_CONFIG_DIR: &str = "configs";

/// Default dotenv file, relative to the working directory.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Builder for a [`ConfigLoader`] over schema `T`.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use strata::config::{ConfigBuilder, WarnMode};
///
/// let loader = ConfigBuilder::new()
///     .config_dirs(["configs", "configs/local"])
///     .env_files([".env", ".env.local"])
///     .required_envs(["HOME"])
///     .warn_mode(WarnMode::Warn)
///     .build()
///     .unwrap();
///
/// assert_eq!(loader.config_dirs(), &[PathBuf::from("configs"), PathBuf::from("configs/local")]);
/// assert!(ConfigBuilder::new().config_dir("").build().is_err());
/// ```
pub struct ConfigBuilder<T = BaseConfig> {
    config_dirs: Vec<PathBuf>,
    env_files: Vec<PathBuf>,
    required_envs: Vec<String>,
    hook: PreLoadHook,
    extra_dir: Option<PathBuf>,
    config_data: ConfigTree,
    warn_mode: WarnMode,
    env: Option<Box<dyn EnvStore>>,
    schema: PhantomData<fn() -> T>,
}

impl ConfigBuilder<BaseConfig> {
    /// Create a builder for the permissive [`BaseConfig`] schema.
    ///
    /// Defaults: config directory `configs`, dotenv file `.env`, no required
    /// variables, the identity hook, no extra directory, empty base data,
    /// [`WarnMode::Quiet`] and the process environment. Use
    /// [`ConfigBuilder::schema`] to switch to a typed schema.
    #[must_use]
    pub fn new() -> Self {
        Self::for_schema()
    }
}

impl<T: ConfigSchema> ConfigBuilder<T> {
    /// Create a builder for schema `T` with the default options.
    #[must_use]
    pub fn for_schema() -> Self {
        Self {
            config_dirs: vec![PathBuf::from(DEFAULT_CONFIG_DIR)],
            env_files: vec![PathBuf::from(DEFAULT_ENV_FILE)],
            required_envs: Vec::new(),
            hook: PreLoadHook::identity(),
            extra_dir: None,
            config_data: ConfigTree::new(),
            warn_mode: WarnMode::default(),
            env: None,
            schema: PhantomData,
        }
    }

    /// Switch the builder to schema `S`, keeping every option.
    #[must_use]
    pub fn schema<S: ConfigSchema>(self) -> ConfigBuilder<S> {
        ConfigBuilder {
            config_dirs: self.config_dirs,
            env_files: self.env_files,
            required_envs: self.required_envs,
            hook: self.hook,
            extra_dir: self.extra_dir,
            config_data: self.config_data,
            warn_mode: self.warn_mode,
            env: self.env,
            schema: PhantomData,
        }
    }

    /// Replace the configuration directories, applied in order.
    #[must_use]
    pub fn config_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.config_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Use a single configuration directory.
    #[must_use]
    pub fn config_dir(self, dir: impl Into<PathBuf>) -> Self {
        self.config_dirs([dir.into()])
    }

    /// Replace the dotenv files, loaded in order.
    #[must_use]
    pub fn env_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.env_files = files.into_iter().map(Into::into).collect();
        self
    }

    /// Use a single dotenv file.
    #[must_use]
    pub fn env_file(self, file: impl Into<PathBuf>) -> Self {
        self.env_files([file.into()])
    }

    /// Replace the environment variables that must be present.
    #[must_use]
    pub fn required_envs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_envs = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the pre-load hook.
    #[must_use]
    pub fn pre_load_hook(mut self, hook: PreLoadHook) -> Self {
        self.hook = hook;
        self
    }

    /// Set the pre-load hook from a closure.
    #[must_use]
    pub fn pre_load<F>(self, func: F) -> Self
    where
        F: Fn(ConfigTree) -> anyhow::Result<ConfigTree> + Send + Sync + 'static,
    {
        self.pre_load_hook(PreLoadHook::new(func))
    }

    /// Set the extra overlay directory, overriding `STRATA_EXTRA_DIR`.
    #[must_use]
    pub fn extra_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extra_dir = Some(dir.into());
        self
    }

    /// Seed the tree that configuration directories merge over.
    #[must_use]
    pub fn config_data(mut self, data: ConfigTree) -> Self {
        self.config_data = data;
        self
    }

    /// Log missing paths at debug (`true`) or warn (`false`) level.
    #[must_use]
    pub fn quiet(self, quiet: bool) -> Self {
        self.warn_mode(WarnMode::from_quiet(quiet))
    }

    /// Set how missing dotenv files and directories are reported.
    #[must_use]
    pub fn warn_mode(mut self, mode: WarnMode) -> Self {
        self.warn_mode = mode;
        self
    }

    /// Use `env` instead of the process environment.
    #[must_use]
    pub fn env_store(mut self, env: impl EnvStore + 'static) -> Self {
        self.env = Some(Box::new(env));
        self
    }

    /// Validate the options and build the loader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`](crate::Error::InvalidOption) if a
    /// path is blank or a required variable name is malformed.
    pub fn build(self) -> Result<ConfigLoader<T>> {
        ConfigValidator::validate_paths("configs_dirs", &self.config_dirs)?;
        ConfigValidator::validate_paths("env_file_paths", &self.env_files)?;
        ConfigValidator::validate_env_names(&self.required_envs)?;
        if let Some(dir) = &self.extra_dir {
            ConfigValidator::validate_path("extra_dir", dir)?;
        }

        Ok(ConfigLoader {
            config_dirs: self.config_dirs,
            env_files: self.env_files,
            required_envs: self.required_envs,
            hook: self.hook,
            extra_dir: self.extra_dir,
            config_data: self.config_data,
            warn_mode: self.warn_mode,
            env: self
                .env
                .unwrap_or_else(|| Box::new(ProcessEnv) as Box<dyn EnvStore>),
            tree: None,
            config: None,
            state: LoadState::Constructed,
        })
    }

    /// Build the loader and load once.
    ///
    /// # Errors
    ///
    /// Returns any construction error from [`ConfigBuilder::build`] or load
    /// error from [`ConfigLoader::load`].
    pub fn load(self) -> Result<Frozen<T>> {
        self.build()?.load()
    }
}

impl<T: ConfigSchema> Default for ConfigBuilder<T> {
    fn default() -> Self {
        Self::for_schema()
    }
}

impl<T> fmt::Debug for ConfigBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigBuilder")
            .field("config_dirs", &self.config_dirs)
            .field("env_files", &self.env_files)
            .field("required_envs", &self.required_envs)
            .field("hook", &self.hook)
            .field("extra_dir", &self.extra_dir)
            .field("config_data", &self.config_data)
            .field("warn_mode", &self.warn_mode)
            .finish_non_exhaustive()
    }
}
