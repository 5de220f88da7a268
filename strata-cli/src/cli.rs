//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros.
//! The global options describe the loader: which dotenv files, directories
//! and overrides feed the pipeline. Subcommands decide what to do with it.

use crate::commands::{CheckCommand, CompletionsCommand, LoadCommand, SourcesCommand};
use crate::utils::parse_override;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strata::WarnMode;

/// Resolve layered configuration from dotenv files and YAML/JSON directories.
#[derive(Parser)]
#[command(name = "strata")]
#[command(version, about = "Resolve layered configuration", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// How to treat missing env files and directories (quiet, warn, strict)
    #[arg(long, value_name = "MODE", global = true, value_parser = WarnMode::parse)]
    pub warn: Option<WarnMode>,

    /// Configuration directory, in merge order (repeatable; default: configs)
    #[arg(long = "config-dir", value_name = "PATH", global = true)]
    pub config_dirs: Vec<PathBuf>,

    /// Dotenv file, in load order (repeatable; default: .env)
    #[arg(long = "env-file", value_name = "PATH", global = true)]
    pub env_files: Vec<PathBuf>,

    /// Directory merged after every config directory
    #[arg(long, value_name = "PATH", global = true, env = "STRATA_EXTRA_DIR")]
    pub extra_dir: Option<PathBuf>,

    /// Environment variable that must be set (repeatable)
    #[arg(long = "require", value_name = "NAME", global = true)]
    pub required_envs: Vec<String>,

    /// Override a dotted key after merging (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", global = true, value_parser = parse_override)]
    pub overrides: Vec<(String, String)>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Load the configuration and print the merged tree
    Load(LoadCommand),

    /// Load the configuration and report whether it is valid
    Check(CheckCommand),

    /// List every source the loader would read, in order
    Sources(SourcesCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_repeatable_globals_keep_order() {
        let cli = Cli::try_parse_from([
            "strata",
            "--config-dir",
            "base",
            "--config-dir",
            "local",
            "--set",
            "db.port=5433",
            "load",
        ])
        .unwrap();

        assert_eq!(
            cli.config_dirs,
            vec![PathBuf::from("base"), PathBuf::from("local")]
        );
        assert_eq!(
            cli.overrides,
            vec![("db.port".to_string(), "5433".to_string())]
        );
        assert!(matches!(cli.command, Command::Load(_)));
    }

    #[test]
    fn test_warn_mode_parsing() {
        let cli = Cli::try_parse_from(["strata", "check", "--warn", "strict"]).unwrap();
        assert_eq!(cli.warn, Some(WarnMode::Strict));

        assert!(Cli::try_parse_from(["strata", "check", "--warn", "loud"]).is_err());
    }

    #[test]
    fn test_malformed_override_rejected() {
        assert!(Cli::try_parse_from(["strata", "--set", "no-equals", "load"]).is_err());
        assert!(Cli::try_parse_from(["strata", "--set", "=value", "load"]).is_err());
    }
}
