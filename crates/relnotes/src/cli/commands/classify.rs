//! Classify command

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use relnotes_changelog::{classify, Category};
use relnotes_git::{CommitRecord, VersionControl};

use crate::cli::{Cli, OutputFormat};

/// Show the category assigned to each commit in a range
#[derive(Debug, Args)]
pub struct ClassifyCommand {
    /// Starting reference (default: the newest tag, or the first commit)
    #[arg(long, value_name = "REF")]
    pub from: Option<String>,

    /// Ending reference (default: the configured head)
    #[arg(long, value_name = "REF")]
    pub to: Option<String>,
}

/// One classified commit in JSON output
#[derive(Debug, Serialize)]
struct ClassifiedCommit<'a> {
    id: &'a str,
    #[serde(skip)]
    short_id: &'a str,
    category: Category,
    visible: bool,
    subject: &'a str,
}

impl ClassifyCommand {
    /// Execute the classify command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let cwd = std::env::current_dir()?;
        let config = cli.load_config(&cwd)?;
        let vcs = cli.open_repository(&config, &cwd)?;

        let from = match &self.from {
            Some(from) => from.clone(),
            None => default_start(vcs.as_ref())?,
        };
        let to = self.to.clone().unwrap_or_else(|| vcs.head_ref().to_string());
        info!(from = %from, to = %to, "classifying commits");

        let commits = vcs.commits_between(&from, &to)?;
        let classified: Vec<ClassifiedCommit<'_>> = commits.iter().map(classified).collect();

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&classified)?),
            OutputFormat::Text => {
                if classified.is_empty() && !cli.quiet {
                    println!("{}", style("No commits found in range").yellow());
                }
                for entry in &classified {
                    let category = format!("{:<10}", entry.category.to_string());
                    let category = if entry.visible {
                        style(category).green()
                    } else {
                        style(category).dim()
                    };
                    println!(
                        "{} {} {}",
                        style(entry.short_id).yellow(),
                        category,
                        entry.subject
                    );
                }
            }
        }

        Ok(())
    }
}

fn classified(commit: &CommitRecord) -> ClassifiedCommit<'_> {
    let category = classify(commit);
    ClassifiedCommit {
        id: &commit.id,
        short_id: commit.short_id(),
        category,
        visible: category.is_user_facing(),
        subject: &commit.subject,
    }
}

/// Newest tag, or the root commit when there are no tags
fn default_start(vcs: &dyn VersionControl) -> anyhow::Result<String> {
    match vcs.list_tags()?.into_iter().next() {
        Some(tag) => Ok(tag),
        None => Ok(vcs.first_commit_id()?),
    }
}
