//! Main entry point for the strata CLI.
//!
//! This is the command-line interface for the strata configuration loader.
//! It provides commands for inspecting layered configuration:
//! - `load`: Print the merged configuration tree
//! - `check`: Report whether the configuration loads and validates
//! - `sources`: List the files and directories a load would read
//! - `completions`: Generate shell completion scripts

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    let _level = strata::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        warn: cli.warn,
        config_dirs: cli.config_dirs,
        env_files: cli.env_files,
        extra_dir: cli.extra_dir.filter(|dir| !dir.as_os_str().is_empty()),
        required_envs: cli.required_envs,
        overrides: cli.overrides,
    };

    let result = match cli.command {
        cli::Command::Load(cmd) => cmd.execute(&global),
        cli::Command::Check(cmd) => cmd.execute(&global),
        cli::Command::Sources(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
