//! Init command

use std::path::PathBuf;

use clap::Args;
use console::style;
use dialoguer::{Confirm, Select};
use tracing::info;

use relnotes_core::config::defaults::{DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML};
use relnotes_core::config::Config;

use crate::cli::{output, Cli};

/// Write a default relnotes configuration
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Use defaults without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, yes = self.yes, "executing init command");
        let cwd = std::env::current_dir()?;
        let config_path = self
            .output
            .clone()
            .unwrap_or_else(|| cwd.join(DEFAULT_CONFIG_TOML));

        if config_path.exists() && !self.force {
            if self.yes {
                anyhow::bail!(
                    "Configuration file already exists at {}. Use --force to overwrite.",
                    config_path.display()
                );
            }

            let overwrite = Confirm::new()
                .with_prompt(format!(
                    "Configuration file already exists at {}. Overwrite?",
                    config_path.display()
                ))
                .default(false)
                .interact()?;

            if !overwrite {
                println!("{}", style("Aborted.").yellow());
                return Ok(());
            }
        }

        let format = if self.yes {
            "toml"
        } else {
            let formats = ["toml", "yaml"];
            let selection = Select::new()
                .with_prompt("Configuration format")
                .items(&formats)
                .default(0)
                .interact()?;
            formats[selection]
        };

        let config_path = path_for_format(config_path, format);
        let content = render_template(format)?;
        std::fs::write(&config_path, &content)?;

        if !cli.quiet {
            output::success(&format!(
                "Created configuration at {}",
                output::path_style().apply_to(config_path.display())
            ));
            println!();
            println!("Next steps:");
            println!("  1. Set repository_url in {} to link commits", config_path.display());
            println!("  2. Run {} to write CHANGELOG.md", style("relnotes changelog --all").cyan());
        }

        Ok(())
    }
}

/// Swap a default `.toml` extension for `.yaml` when YAML was chosen
fn path_for_format(path: PathBuf, format: &str) -> PathBuf {
    if format == "yaml" && path.extension().is_some_and(|e| e == "toml") {
        path.with_extension("yaml")
    } else {
        path
    }
}

/// Default configuration in the chosen format
fn render_template(format: &str) -> anyhow::Result<String> {
    if format == "yaml" {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE)?;
        Ok(serde_yaml::to_string(&config)?)
    } else {
        Ok(DEFAULT_CONFIG_TEMPLATE.to_string())
    }
}
