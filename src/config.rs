//! Parsing and validation for se.toml configuration files
//!
//! Configuration is optional. Ebook commands look for `se.toml` in the ebook
//! source directory, everything else looks in the current directory. A
//! missing file yields the defaults.

use crate::error::ConfigError;
use crate::types::{GlobPattern, RuleId, Severity};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up in the ebook or working directory
pub const CONFIG_FILE_NAME: &str = "se.toml";

/// Main configuration struct for se.toml
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Lint settings
    #[serde(default)]
    pub lint: LintConfig,

    /// External binary overrides
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Git remote bases used by `create-draft`
    #[serde(default)]
    pub remotes: RemotesConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load `se.toml` from `dir` if it exists, otherwise return defaults
    pub fn load_or_default(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }
        tracing::debug!(path = %path.display(), "loading configuration");
        Self::load(path)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.tools.entries() {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("tools.{}", field),
                    message: "must not be empty".to_string(),
                });
            }
        }

        for rule in &self.lint.rules {
            regex::Regex::new(&rule.pattern).map_err(|e| ConfigError::InvalidValue {
                field: format!("lint.rules.{}.pattern", rule.id),
                message: e.to_string(),
            })?;

            for pattern in rule.include.iter().chain(&rule.exclude) {
                globset::Glob::new(pattern.as_str()).map_err(|e| ConfigError::InvalidValue {
                    field: format!("lint.rules.{}", rule.id),
                    message: format!("invalid glob pattern '{}': {}", pattern, e),
                })?;
            }
        }

        Ok(())
    }
}

/// `[lint]` section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    /// Rule IDs to skip
    #[serde(default)]
    pub ignore: Vec<RuleId>,

    /// Additional regex rules, `[[lint.rules]]`
    #[serde(default)]
    pub rules: Vec<CustomRule>,
}

/// A project-specific regex lint rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomRule {
    pub id: RuleId,
    pub description: String,
    #[serde(default = "default_severity")]
    pub severity: Severity,
    pub pattern: String,
    #[serde(default)]
    pub include: Vec<GlobPattern>,
    #[serde(default)]
    pub exclude: Vec<GlobPattern>,
}

fn default_severity() -> Severity {
    Severity::ManualReview
}

/// `[tools]` section: names or paths of external binaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub firefox: String,
    pub compare: String,
    pub vim: String,
    pub epubcheck: String,
    pub ebook_convert: String,
    pub kepubify: String,
    pub git: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            firefox: "firefox".to_string(),
            compare: "compare".to_string(),
            vim: "vim".to_string(),
            epubcheck: "epubcheck".to_string(),
            ebook_convert: "ebook-convert".to_string(),
            kepubify: "kepubify".to_string(),
            git: "git".to_string(),
        }
    }
}

impl ToolsConfig {
    fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("firefox", self.firefox.as_str()),
            ("compare", self.compare.as_str()),
            ("vim", self.vim.as_str()),
            ("epubcheck", self.epubcheck.as_str()),
            ("ebook_convert", self.ebook_convert.as_str()),
            ("kepubify", self.kepubify.as_str()),
            ("git", self.git.as_str()),
        ]
    }
}

/// `[remotes]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemotesConfig {
    /// Base URL for the house repository server
    pub se: String,
    /// Base URL for the GitHub organization
    pub github: String,
}

impl Default for RemotesConfig {
    fn default() -> Self {
        Self {
            se: "standardebooks.org:/standardebooks.org/ebooks".to_string(),
            github: "git@github.com:standardebooks".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tools.vim, "vim");
        assert_eq!(config.tools.ebook_convert, "ebook-convert");
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"
[lint]
ignore = ["no-style-attribute"]

[[lint.rules]]
id = "no-thee"
description = "Archaic pronoun"
pattern = "\\bthee\\b"
include = ["**/text/*.xhtml"]

[tools]
firefox = "/opt/firefox/firefox"

[remotes]
github = "git@github.com:example"
"#,
        )
        .unwrap();

        assert_eq!(config.lint.ignore.len(), 1);
        assert_eq!(config.lint.ignore[0].as_str(), "no-style-attribute");
        assert_eq!(config.lint.rules[0].severity, Severity::ManualReview);
        assert_eq!(config.tools.firefox, "/opt/firefox/firefox");
        assert_eq!(config.tools.vim, "vim");
        assert_eq!(config.remotes.github, "git@github.com:example");
    }

    #[test]
    fn test_rejects_empty_tool() {
        let err = Config::parse("[tools]\nvim = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("tools.vim"));
    }

    #[test]
    fn test_rejects_bad_rule_regex() {
        let err = Config::parse(
            r#"
[[lint.rules]]
id = "broken"
description = "x"
pattern = "("
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("lint.rules.broken.pattern"));
    }

    #[test]
    fn test_rejects_unknown_section() {
        assert!(matches!(
            Config::parse("[output]\nformat = \"human\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_or_default(temp_dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[tools]\ngit = \"/usr/local/bin/git\"\n",
        )
        .unwrap();

        let config = Config::load_or_default(temp_dir.path()).unwrap();
        assert_eq!(config.tools.git, "/usr/local/bin/git");
    }
}
