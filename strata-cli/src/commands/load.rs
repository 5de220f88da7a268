//! Command to load the configuration and print the merged tree.

use crate::error::CliError;
use crate::utils::{build_loader, GlobalOptions};
use clap::{Args, ValueEnum};
use serde_json::Value;

/// Output formats for the loaded tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

impl OutputFormat {
    /// Render `value` in this format, always ending with a newline.
    pub fn render(self, value: &Value) -> Result<String, CliError> {
        match self {
            OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(value)?)),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }
}

/// Load the configuration and print the merged tree.
#[derive(Args)]
pub struct LoadCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Print only the value at this dotted key
    #[arg(long, value_name = "KEY")]
    pub key: Option<String>,
}

impl LoadCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut loader = build_loader(global)?;
        let config = loader.load()?;

        let value = match self.key {
            None => Value::Object(config.as_tree().clone()),
            Some(ref key) => config
                .get_path(key)
                .cloned()
                .ok_or_else(|| CliError::SemanticFailure(format!("key '{key}' not found")))?,
        };

        print!("{}", self.format.render(&value)?);
        Ok(())
    }
}
