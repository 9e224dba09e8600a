//! CLI commands

mod changelog;
mod classify;
mod context;
mod init;

pub use changelog::ChangelogCommand;
pub use classify::ClassifyCommand;
pub use context::ContextCommand;
pub use init::InitCommand;
