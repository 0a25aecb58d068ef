#![forbid(unsafe_code)]

//! Core Rule trait and the messages rules produce

use crate::types::{RuleId, Severity};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Execution context provided to rules when they execute
#[derive(Debug)]
pub struct ExecutionContext<'a> {
    /// Path of the file relative to the ebook root, with `/` separators
    pub file_path: &'a Path,

    /// Full text content of the file
    pub content: &'a str,
}

/// One finding of the lint pass
///
/// A rule reports at most one message per file; individual matches are
/// listed as submessages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintMessage {
    /// ID of the rule or structural check that produced this message
    pub rule: RuleId,

    pub severity: Severity,

    /// File the message is about, relative to the ebook root
    pub filename: PathBuf,

    /// Human-readable description
    pub text: String,

    /// Per-match details such as `line 12: <b>`
    pub submessages: Vec<String>,
}

/// Trait that all lint rules implement
pub trait Rule {
    /// Returns the unique identifier for this rule
    fn id(&self) -> &RuleId;

    /// Returns a human-readable description of what this rule checks
    fn description(&self) -> &str;

    /// Returns the severity of messages from this rule
    fn severity(&self) -> Severity;

    /// Executes the rule against one file
    ///
    /// Returns `None` when the file is clean.
    fn execute(&self, ctx: &ExecutionContext) -> Option<LintMessage>;
}
