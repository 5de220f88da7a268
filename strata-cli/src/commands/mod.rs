//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `load`: Print the merged configuration tree
//! - `check`: Report whether the configuration loads and validates
//! - `sources`: List the files and directories a load would read
//! - `completions`: Generate shell completion scripts

pub mod check;
pub mod completions;
pub mod load;
pub mod sources;

pub use check::CheckCommand;
pub use completions::CompletionsCommand;
pub use load::{LoadCommand, OutputFormat};
pub use sources::SourcesCommand;
