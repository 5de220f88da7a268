//! Build script for strata-cli.
//!
//! This script generates a man page at build time using clap_mangen.
//! The generated page is placed in OUT_DIR for inclusion in release builds.
//!
//! Build scripts cannot depend on the crate being built, so the command
//! structure is declared again here.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// Keep this structure synchronized with src/cli.rs.
fn build_cli() -> Command {
    Command::new("strata")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Resolve layered configuration")
        .long_about(
            "Load dotenv files, merge directories of YAML/JSON fragments and an optional \
             extra directory, and validate the result",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("warn")
                .long("warn")
                .help("How to treat missing env files and directories (quiet, warn, strict)")
                .value_name("MODE")
                .global(true),
        )
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .help("Configuration directory, in merge order (repeatable; default: configs)")
                .value_name("PATH")
                .global(true)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("env-file")
                .long("env-file")
                .help("Dotenv file, in load order (repeatable; default: .env)")
                .value_name("PATH")
                .global(true)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("extra-dir")
                .long("extra-dir")
                .help("Directory merged after every config directory")
                .value_name("PATH")
                .global(true)
                .env("STRATA_EXTRA_DIR"),
        )
        .arg(
            Arg::new("require")
                .long("require")
                .help("Environment variable that must be set (repeatable)")
                .value_name("NAME")
                .global(true)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .help("Override a dotted key after merging (repeatable)")
                .value_name("KEY=VALUE")
                .global(true)
                .action(ArgAction::Append),
        )
        .subcommands(vec![
            Command::new("load")
                .about("Load the configuration and print the merged tree")
                .long_about("Run the pipeline and print the merged tree as JSON or YAML"),
            Command::new("check")
                .about("Load the configuration and report whether it is valid")
                .long_about("Run the pipeline and exit non-zero if any stage fails"),
            Command::new("sources")
                .about("List every source the loader would read, in order")
                .long_about("List dotenv files, directories and fragments, marking missing ones"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("strata.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
