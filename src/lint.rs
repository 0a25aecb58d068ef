//! The lint pass
//!
//! Structural checks run first, then every enabled regex rule runs over each
//! markup and stylesheet file in the ebook. Messages come back sorted by file
//! so output is stable across runs.

pub mod builtin;
pub mod output;
pub mod regex_rule;
pub mod registry;
pub mod rule;
pub mod structural;

pub use output::{JsonlFormatter, PlainFormatter, TableFormatter};
pub use regex_rule::RegexRule;
pub use registry::RuleRegistry;
pub use rule::{ExecutionContext, LintMessage, Rule};

use crate::config::LintConfig;
use crate::epub::SeEpub;
use crate::error::SeError;
use std::path::Path;
use tracing::debug;

/// Extensions of files the regex rules look at
pub const LINTED_EXTENSIONS: &[&str] = &["xhtml", "svg", "css", "opf", "ncx"];

/// Lint an opened ebook
pub fn lint(ebook: &SeEpub, config: &LintConfig) -> Result<Vec<LintMessage>, SeError> {
    let registry = RuleRegistry::build_from_config(config)?;
    debug!(rules = registry.len(), ebook = %ebook.directory.display(), "linting");

    let mut messages: Vec<LintMessage> = structural::check_structure(ebook)?
        .into_iter()
        .filter(|message| !registry.is_ignored(&message.rule))
        .collect();

    for path in crate::files::get_target_filenames(&[&ebook.directory], LINTED_EXTENSIONS)? {
        let name = structural::relative_name(&path, &ebook.directory);
        let content = crate::files::read_text(&path)?;
        let ctx = ExecutionContext {
            file_path: Path::new(&name),
            content: &content,
        };

        messages.extend(registry.iter_rules().filter_map(|rule| rule.execute(&ctx)));
    }

    messages.sort_by(|a, b| {
        a.filename
            .cmp(&b.filename)
            .then_with(|| a.severity.cmp(&b.severity))
            .then_with(|| a.rule.cmp(&b.rule))
    });

    Ok(messages)
}
