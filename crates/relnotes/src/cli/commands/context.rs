//! Release context command

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use relnotes_changelog::{RangeRequest, ReleaseContext};
use relnotes_core::writer::write_changelog;

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Summarise a release range for announcement writing
#[derive(Debug, Args)]
pub struct ContextCommand {
    /// Version being released (measured from the newest tag)
    #[arg(long, value_name = "TAG")]
    pub version: Option<String>,

    /// Starting reference (tag, branch, or commit)
    #[arg(long, value_name = "REF")]
    pub from: Option<String>,

    /// Ending reference (default: the configured head)
    #[arg(long, value_name = "REF")]
    pub to: Option<String>,

    /// Write the summary to a file instead of printing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ContextCommand {
    /// Execute the context command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(version = ?self.version, from = ?self.from, to = ?self.to, "executing context command");
        let cwd = std::env::current_dir()?;
        let config = cli.load_config(&cwd)?;
        let vcs = cli.open_repository(&config, &cwd)?;

        let request = RangeRequest {
            version: self.version.clone(),
            from: self.from.clone(),
            to: self.to.clone().unwrap_or_else(|| vcs.head_ref().to_string()),
        };
        let context = ReleaseContext::collect(vcs.as_ref(), &request, chrono::Local::now().date_naive())?;

        let content = match cli.format {
            OutputFormat::Json => serde_json::to_string_pretty(&context)?,
            OutputFormat::Text => context.render(),
        };

        match &self.output {
            Some(path) => {
                write_changelog(path, &content)?;
                if !cli.quiet {
                    output::success(&format!(
                        "Release context for {} written to {}",
                        output::version_style().apply_to(&context.version),
                        output::path_style().apply_to(path.display())
                    ));
                }
            }
            None => println!("{}", content),
        }

        Ok(())
    }
}
