#![forbid(unsafe_code)]

//! Lint output formatters
//!
//! Three renderings of the same message list:
//! - a colored table for terminals (default)
//! - plain lines, one per message, submessages tab-indented
//! - JSON Lines, one record per message

use super::rule::LintMessage;
use crate::types::Severity;
use serde::Serialize;
use std::io;
use termcolor::{Color, ColorSpec, WriteColor};

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::ManualReview => Color::Yellow,
    }
}

/// Colored table formatter
pub struct TableFormatter;

impl TableFormatter {
    pub fn new() -> Self {
        TableFormatter
    }

    /// Write messages as an aligned table
    pub fn write(&self, out: &mut dyn WriteColor, messages: &[LintMessage]) -> io::Result<()> {
        let code_width = messages
            .iter()
            .map(|m| m.severity.label().len())
            .chain(["Code".len()])
            .max()
            .unwrap_or(0);
        let file_width = messages
            .iter()
            .map(|m| m.filename.display().to_string().chars().count())
            .chain(["File".len()])
            .max()
            .unwrap_or(0);

        out.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(
            out,
            "{:<code_width$}  {:<file_width$}  Message",
            "Code", "File"
        )?;
        out.reset()?;

        for message in messages {
            out.set_color(ColorSpec::new().set_fg(Some(severity_color(message.severity))))?;
            write!(out, "{:<code_width$}", message.severity.label())?;
            out.reset()?;
            writeln!(
                out,
                "  {:<file_width$}  {}",
                message.filename.display().to_string(),
                message.text
            )?;

            for submessage in &message.submessages {
                writeln!(
                    out,
                    "{:<code_width$}  {:<file_width$}    {}",
                    "", "", submessage
                )?;
            }
        }

        Ok(())
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain text formatter
pub struct PlainFormatter;

impl PlainFormatter {
    pub fn new() -> Self {
        PlainFormatter
    }

    /// `Error: <file> <text>` per message, then tab-indented submessages
    pub fn format(&self, messages: &[LintMessage]) -> String {
        let mut output = String::new();
        for message in messages {
            output.push_str(&format!(
                "{}: {} {}\n",
                message.severity.label(),
                message.filename.display(),
                message.text
            ));
            for submessage in &message.submessages {
                output.push('\t');
                output.push_str(submessage);
                output.push('\n');
            }
        }
        output
    }
}

impl Default for PlainFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct LintRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    ebook: &'a str,
    #[serde(flatten)]
    message: &'a LintMessage,
}

/// JSONL output formatter
pub struct JsonlFormatter;

impl JsonlFormatter {
    pub fn new() -> Self {
        JsonlFormatter
    }

    /// One JSON object per message
    pub fn format(&self, ebook: &str, messages: &[LintMessage]) -> String {
        let mut output = String::new();
        for message in messages {
            let record = LintRecord {
                record_type: "lint",
                ebook,
                message,
            };
            if let Ok(json) = serde_json::to_string(&record) {
                output.push_str(&json);
                output.push('\n');
            }
        }
        output
    }
}

impl Default for JsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}
