//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "relnotes.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "relnotes.yaml";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".relnotes.toml",
        ".relnotes.yaml",
    ]
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# relnotes configuration

[changelog]
file = "CHANGELOG.md"
# Commit links are rendered as <repository_url>/commit/<hash>
# repository_url = "https://github.com/owner/repo"
include_unreleased = true

[git]
# "libgit2" (in-process) or "cli" (the git executable)
backend = "libgit2"
head = "HEAD"
# Only tags matching this pattern are treated as releases
# tag_pattern = "^v"
"#;
