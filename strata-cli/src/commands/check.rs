//! Command to check that the configuration loads and validates.

use crate::error::CliError;
use crate::utils::{build_loader, GlobalOptions};
use clap::Args;

/// Run the full pipeline and report the outcome.
#[derive(Args)]
pub struct CheckCommand {}

impl CheckCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut loader = build_loader(global)?;

        match loader.load() {
            Ok(_) => {
                if !global.quiet {
                    println!("Configuration is valid");
                }
                Ok(())
            }
            Err(e) => {
                for violation in e.violations() {
                    eprintln!("  {violation}");
                }
                Err(CliError::from(e))
            }
        }
    }
}
