//! Changelog command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use relnotes_changelog::{
    ChangelogBuilder, ChangelogFormatter, MarkdownFormatter, RangeOutcome, RangeRequest,
};
use relnotes_core::config::Config;
use relnotes_core::writer::{read_changelog, write_changelog};

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Generate the changelog
#[derive(Debug, Args)]
pub struct ChangelogCommand {
    /// Generate the full changelog from all tags
    #[arg(long, conflicts_with_all = ["version", "from"])]
    pub all: bool,

    /// Version to generate a section for (compared with the previous tag)
    #[arg(long, value_name = "TAG")]
    pub version: Option<String>,

    /// Starting reference (tag, branch, or commit)
    #[arg(long, value_name = "REF")]
    pub from: Option<String>,

    /// Ending reference (default: the configured head)
    #[arg(long, value_name = "REF")]
    pub to: Option<String>,

    /// Output file (defaults to the configured changelog file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print instead of writing the file
    #[arg(long)]
    pub stdout: bool,
}

impl ChangelogCommand {
    /// Execute the changelog command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(all = self.all, version = ?self.version, from = ?self.from, to = ?self.to, "executing changelog command");
        let cwd = std::env::current_dir()?;
        let (config, root) = cli.load_config_with_root(&cwd)?;
        let vcs = cli.open_repository(&config, &cwd)?;
        let today = chrono::Local::now().date_naive();

        let progress = !cli.quiet && !self.stdout && cli.format == OutputFormat::Text;
        let formatter = formatter_for(&config);
        let builder = ChangelogBuilder::from_config(vcs.as_ref(), &config.changelog);

        let (content, json) = if self.all {
            if progress {
                output::info("Generating complete changelog from all tags...");
            }
            let document = builder.build_document(today)?;
            (
                formatter.format_document(&document),
                serde_json::to_string_pretty(&document)?,
            )
        } else {
            let request = RangeRequest {
                version: self.version.clone(),
                from: self.from.clone(),
                to: self.to.clone().unwrap_or_else(|| vcs.head_ref().to_string()),
            };

            match builder.build_range_section(&request, today)? {
                RangeOutcome::Empty(range) => {
                    if !cli.quiet {
                        println!("{}", style("No commits found in range").yellow());
                    }
                    info!(from = %range.from, to = %range.to, "nothing to write");
                    return Ok(());
                }
                RangeOutcome::Section(range, section) => {
                    if progress {
                        output::info(&format!(
                            "{} {} → {} ({} commits)",
                            output::version_style().apply_to(&range.label),
                            output::tag_style().apply_to(&range.from),
                            output::tag_style().apply_to(&range.to),
                            section.commit_count()
                        ));
                    }
                    let rendered = formatter.format_section(&section);
                    (
                        formatter.wrap_with_header(builder.header(), &rendered),
                        serde_json::to_string_pretty(&section)?,
                    )
                }
            }
        };

        if cli.format == OutputFormat::Json {
            println!("{}", json);
            return Ok(());
        }

        if self.stdout {
            print!("{}", content);
            return Ok(());
        }

        let output_path = self
            .output
            .clone()
            .unwrap_or_else(|| root.join(&config.changelog.file));

        if read_changelog(&output_path)?.as_deref() == Some(content.as_str()) {
            if !cli.quiet {
                output::info(&format!(
                    "{} is already up to date",
                    output::path_style().apply_to(output_path.display())
                ));
            }
            return Ok(());
        }

        write_changelog(&output_path, &content)?;

        if !cli.quiet {
            output::success(&format!(
                "Changelog written to {}",
                output::path_style().apply_to(output_path.display())
            ));
        }

        Ok(())
    }
}

/// Markdown formatter linking commits under the configured repository
pub fn formatter_for(config: &Config) -> MarkdownFormatter {
    match config.changelog.commit_url_base() {
        Some(base) => MarkdownFormatter::new().with_commit_url_base(base),
        None => MarkdownFormatter::new(),
    }
}
