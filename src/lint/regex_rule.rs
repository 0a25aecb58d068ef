#![forbid(unsafe_code)]

//! Regex-based lint rules
//!
//! Rules are defined in TOML:
//!
//! ```toml
//! [rule]
//! id = "no-style-attribute"
//! description = "Inline style attribute"
//! severity = "error"
//!
//! [match]
//! pattern = '\sstyle="'
//! include = ["**/*.xhtml"]
//! ```

use super::rule::{ExecutionContext, LintMessage, Rule};
use crate::config::CustomRule;
use crate::error::RuleError;
use crate::types::{GlobPattern, RuleId, Severity};
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;
use serde::Deserialize;

/// Longest snippet shown in a submessage, in characters
const MAX_SNIPPET_CHARS: usize = 60;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegexRuleDefinition {
    rule: RuleSection,
    #[serde(rename = "match")]
    match_section: MatchSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleSection {
    id: String,
    description: String,
    severity: Severity,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MatchSection {
    pattern: String,
    #[serde(default)]
    include: Option<Vec<GlobPattern>>,
    #[serde(default)]
    exclude: Option<Vec<GlobPattern>>,
}

/// A rule that matches text patterns using regular expressions
pub struct RegexRule {
    id: RuleId,
    description: String,
    severity: Severity,
    pattern: Regex,
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl std::fmt::Debug for RegexRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegexRule")
            .field("id", &self.id)
            .field("severity", &self.severity)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

impl RegexRule {
    fn build(
        id: RuleId,
        description: String,
        severity: Severity,
        pattern: &str,
        include: &[GlobPattern],
        exclude: &[GlobPattern],
    ) -> Result<Self, RuleError> {
        let pattern = Regex::new(pattern).map_err(|e| {
            RuleError::InvalidRegex(format!("Failed to compile pattern '{}': {}", pattern, e))
        })?;

        let include = if include.is_empty() {
            None
        } else {
            Some(build_globset(include)?)
        };
        let exclude = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude)?)
        };

        Ok(RegexRule {
            id,
            description,
            severity,
            pattern,
            include,
            exclude,
        })
    }

    /// Parse a RegexRule from TOML content
    pub fn from_toml(content: &str) -> Result<Self, RuleError> {
        let def: RegexRuleDefinition = toml::from_str(content)
            .map_err(|e| RuleError::InvalidDefinition(format!("Failed to parse TOML: {}", e)))?;

        let id = RuleId::new(def.rule.id.clone()).ok_or_else(|| {
            RuleError::InvalidDefinition(format!("Invalid rule ID: {}", def.rule.id))
        })?;

        Self::build(
            id,
            def.rule.description,
            def.rule.severity,
            &def.match_section.pattern,
            &def.match_section.include.unwrap_or_default(),
            &def.match_section.exclude.unwrap_or_default(),
        )
    }

    /// Build a rule from a `[[lint.rules]]` entry in se.toml
    pub fn from_custom(rule: &CustomRule) -> Result<Self, RuleError> {
        Self::build(
            rule.id.clone(),
            rule.description.clone(),
            rule.severity,
            &rule.pattern,
            &rule.include,
            &rule.exclude,
        )
    }

    fn applies_to_file(&self, file_path: &std::path::Path) -> bool {
        if let Some(ref exclude) = self.exclude
            && exclude.is_match(file_path)
        {
            return false;
        }

        match self.include {
            Some(ref include) => include.is_match(file_path),
            None => true,
        }
    }
}

fn build_globset(patterns: &[GlobPattern]) -> Result<GlobSet, RuleError> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let glob = Glob::new(pattern.as_str()).map_err(|e| {
            RuleError::InvalidDefinition(format!("Invalid glob pattern '{}': {}", pattern, e))
        })?;
        builder.add(glob);
    }

    builder
        .build()
        .map_err(|e| RuleError::InvalidDefinition(format!("Failed to build GlobSet: {}", e)))
}

/// Byte offset of the start of each line
fn compute_line_offsets(content: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (i, c) in content.char_indices() {
        if c == '\n' {
            offsets.push(i + 1);
        }
    }
    offsets
}

/// 1-indexed line containing `offset`
fn offset_to_line(offset: usize, line_offsets: &[usize]) -> usize {
    line_offsets.partition_point(|&o| o <= offset)
}

fn snippet(matched: &str) -> String {
    let collapsed = matched.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > MAX_SNIPPET_CHARS {
        let truncated: String = collapsed.chars().take(MAX_SNIPPET_CHARS).collect();
        format!("{}…", truncated)
    } else {
        collapsed
    }
}

impl Rule for RegexRule {
    fn id(&self) -> &RuleId {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn execute(&self, ctx: &ExecutionContext) -> Option<LintMessage> {
        if !self.applies_to_file(ctx.file_path) {
            return None;
        }

        let line_offsets = compute_line_offsets(ctx.content);
        let submessages: Vec<String> = self
            .pattern
            .find_iter(ctx.content)
            .map(|m| {
                format!(
                    "line {}: {}",
                    offset_to_line(m.start(), &line_offsets),
                    snippet(m.as_str())
                )
            })
            .collect();

        if submessages.is_empty() {
            return None;
        }

        Some(LintMessage {
            rule: self.id.clone(),
            severity: self.severity,
            filename: ctx.file_path.to_path_buf(),
            text: self.description.clone(),
            submessages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const STYLE_RULE: &str = r#"
[rule]
id = "no-style-attribute"
description = "Inline style attribute"
severity = "error"

[match]
pattern = '\sstyle="'
include = ["**/*.xhtml"]
exclude = ["**/colophon.xhtml"]
"#;

    fn run(rule: &RegexRule, path: &str, content: &str) -> Option<LintMessage> {
        rule.execute(&ExecutionContext {
            file_path: Path::new(path),
            content,
        })
    }

    #[test]
    fn test_from_toml() {
        let rule = RegexRule::from_toml(STYLE_RULE).unwrap();
        assert_eq!(rule.id().as_str(), "no-style-attribute");
        assert_eq!(rule.severity(), Severity::Error);
        assert_eq!(rule.description(), "Inline style attribute");
    }

    #[test]
    fn test_one_message_per_file_with_line_numbers() {
        let rule = RegexRule::from_toml(STYLE_RULE).unwrap();
        let content = "<p>a</p>\n<p style=\"x\">b</p>\n<span style=\"y\">c</span>\n";

        let message = run(&rule, "src/epub/text/chapter-1.xhtml", content).unwrap();
        assert_eq!(message.filename, Path::new("src/epub/text/chapter-1.xhtml"));
        assert_eq!(
            message.submessages,
            vec!["line 2: style=\"".to_string(), "line 3: style=\"".to_string()]
        );
    }

    #[test]
    fn test_include_and_exclude() {
        let rule = RegexRule::from_toml(STYLE_RULE).unwrap();
        let content = "<p style=\"x\">b</p>";
        assert!(run(&rule, "src/epub/css/core.css", content).is_none());
        assert!(run(&rule, "src/epub/text/colophon.xhtml", content).is_none());
        assert!(run(&rule, "src/epub/text/chapter-1.xhtml", "<p>clean</p>").is_none());
    }

    #[test]
    fn test_invalid_definitions() {
        assert!(matches!(
            RegexRule::from_toml("[rule]\nid = \"x\"\n"),
            Err(RuleError::InvalidDefinition(_))
        ));

        let bad_regex = STYLE_RULE.replace(r#"'\sstyle="'"#, "'('");
        assert!(matches!(
            RegexRule::from_toml(&bad_regex),
            Err(RuleError::InvalidRegex(_))
        ));

        let bad_id = STYLE_RULE.replace("no-style-attribute", "no style");
        assert!(RegexRule::from_toml(&bad_id).is_err());
    }

    #[test]
    fn test_snippet_truncation() {
        let long = "word ".repeat(40);
        let shortened = snippet(&long);
        assert!(shortened.ends_with('…'));
        assert_eq!(shortened.chars().count(), MAX_SNIPPET_CHARS + 1);
        assert_eq!(snippet("a\n\tb"), "a b");
    }
}
