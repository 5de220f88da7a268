//! Utility functions for CLI operations.
//!
//! This module turns the global options into a configured loader, including
//! the pre-load hook that applies `--set` overrides.

use crate::error::CliError;
use std::path::PathBuf;
use strata::config::{coerce, set_path, ConfigBuilder, ConfigLoader, ConfigTree};
use strata::{BaseConfig, WarnMode};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
#[allow(dead_code)] // `verbose` only drives logger setup in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Explicit missing-path mode.
    pub warn: Option<WarnMode>,

    /// Configuration directories; empty means the library default.
    pub config_dirs: Vec<PathBuf>,

    /// Dotenv files; empty means the library default.
    pub env_files: Vec<PathBuf>,

    /// Extra overlay directory.
    pub extra_dir: Option<PathBuf>,

    /// Required environment variable names.
    pub required_envs: Vec<String>,

    /// `--set` overrides, in command-line order.
    pub overrides: Vec<(String, String)>,
}

impl GlobalOptions {
    /// The missing-path mode in effect.
    ///
    /// An explicit `--warn` wins; otherwise `--quiet` silences missing paths
    /// and the default is to warn about them.
    pub fn warn_mode(&self) -> WarnMode {
        self.warn.unwrap_or(WarnMode::from_quiet(self.quiet))
    }
}

/// Parse a `KEY=VALUE` override.
///
/// The key is a dotted path whose segments must all be non-empty. The value
/// is everything after the first `=` and may itself contain `=`.
pub fn parse_override(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;

    if key.split('.').any(|segment| segment.trim().is_empty()) {
        return Err(format!("invalid key '{key}': empty path segment"));
    }

    Ok((key.to_string(), value.to_string()))
}

/// Build the loader described by the global options.
///
/// Overrides are applied by a pre-load hook, so they land on top of every
/// directory and are still checked by the schema. Values are read the same
/// way environment values are: JSON objects and arrays are parsed, and any
/// other value stays a string until a typed field asks for a number or bool.
pub fn build_loader(global: &GlobalOptions) -> Result<ConfigLoader<BaseConfig>, CliError> {
    let mut builder = ConfigBuilder::new()
        .required_envs(global.required_envs.clone())
        .warn_mode(global.warn_mode());

    if !global.config_dirs.is_empty() {
        builder = builder.config_dirs(global.config_dirs.clone());
    }
    if !global.env_files.is_empty() {
        builder = builder.env_files(global.env_files.clone());
    }
    if let Some(ref extra_dir) = global.extra_dir {
        builder = builder.extra_dir(extra_dir.clone());
    }
    if !global.overrides.is_empty() {
        let overrides = global.overrides.clone();
        builder = builder.pre_load(move |mut tree: ConfigTree| {
            for (key, value) in &overrides {
                log::debug!("applying override for '{key}'");
                set_path(&mut tree, key, coerce(value))?;
            }
            Ok(tree)
        });
    }

    builder.build().map_err(CliError::from)
}
