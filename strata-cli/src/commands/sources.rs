//! Command to list every source a load would read.

use crate::error::CliError;
use crate::utils::{build_loader, GlobalOptions};
use clap::Args;
use strata::config::PlannedSource;

/// List dotenv files, directories and fragments in application order.
#[derive(Args)]
pub struct SourcesCommand {
    /// Hide sources that do not exist
    #[arg(long)]
    pub existing: bool,
}

impl SourcesCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let loader = build_loader(global)?;
        let planned = loader.plan()?;

        for source in planned.iter().filter(|s| s.exists || !self.existing) {
            println!("{}", format_source(source));
        }
        Ok(())
    }
}

fn format_source(source: &PlannedSource) -> String {
    let marker = if source.exists { "" } else { " (missing)" };
    let kind = source.kind.to_string();
    format!("{kind:<12} {}{marker}", source.path.display())
}
