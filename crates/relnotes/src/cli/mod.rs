//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{debug, info};

use relnotes_core::config::{config_root, load_config, load_config_or_default, Config};
use relnotes_git::{open_backend, VersionControl};

use commands::{ChangelogCommand, ClassifyCommand, ContextCommand, InitCommand};

/// relnotes - Changelog generator driven by git history
#[derive(Debug, Parser)]
#[command(name = "relnotes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file (default: searched from the working directory up)
    #[arg(long, global = true, env = "RELNOTES_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a default relnotes configuration
    Init(InitCommand),

    /// Generate the changelog
    Changelog(ChangelogCommand),

    /// Summarise a release range for announcement writing
    Context(ContextCommand),

    /// Show the category assigned to each commit in a range
    Classify(ClassifyCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Changelog(ref cmd) => cmd.execute(&self),
            Commands::Context(ref cmd) => cmd.execute(&self),
            Commands::Classify(ref cmd) => cmd.execute(&self),
        }
    }

    /// Load the configuration named by `--config`, or the nearest one to `cwd`
    pub fn load_config(&self, cwd: &Path) -> anyhow::Result<Config> {
        Ok(self.load_config_with_root(cwd)?.0)
    }

    /// Load the configuration together with the directory its relative
    /// paths resolve against: the config file's directory, or `cwd` when
    /// running on defaults
    pub fn load_config_with_root(&self, cwd: &Path) -> anyhow::Result<(Config, PathBuf)> {
        let (config, path) = match &self.config {
            Some(path) => (load_config(path)?, Some(path.clone())),
            None => load_config_or_default(cwd)?,
        };

        let root = match path.as_deref().and_then(config_root) {
            Some(root) => cwd.join(root),
            None => cwd.to_path_buf(),
        };
        match &path {
            Some(path) => debug!(path = %path.display(), root = %root.display(), "loaded configuration"),
            None => debug!("no configuration file found, using defaults"),
        }
        Ok((config, root))
    }

    /// Open the configured version-control backend for `cwd`
    pub fn open_repository(&self, config: &Config, cwd: &Path) -> anyhow::Result<Box<dyn VersionControl>> {
        let vcs = open_backend(&config.git, cwd)?;
        info!(head = vcs.head_ref(), "repository opened");
        Ok(vcs)
    }
}
