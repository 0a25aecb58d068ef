//! Checks on the shape of the ebook rather than file contents

use super::rule::LintMessage;
use crate::epub::SeEpub;
use crate::error::SeError;
use crate::types::{RuleId, Severity};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Files an ebook ready for production is expected to carry
const EXPECTED_FILES: &[&str] = &[
    "images/cover.jpg",
    "images/cover.svg",
    "images/titlepage.svg",
    "src/epub/toc.xhtml",
    "src/epub/images/cover.svg",
    "src/epub/images/titlepage.svg",
];

const CONTENT_OPF: &str = "src/epub/content.opf";

fn message(
    rule: &str,
    filename: impl Into<PathBuf>,
    text: &str,
    submessages: Vec<String>,
) -> Result<LintMessage, SeError> {
    let rule = RuleId::new(rule)
        .ok_or_else(|| SeError::InvalidInput(format!("Invalid rule ID: {}", rule)))?;
    Ok(LintMessage {
        rule,
        severity: Severity::Error,
        filename: filename.into(),
        text: text.to_string(),
        submessages,
    })
}

/// `path` relative to `root` with `/` separators
pub(crate) fn relative_name(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Run every structural check
pub fn check_structure(ebook: &SeEpub) -> Result<Vec<LintMessage>, SeError> {
    let mut messages = Vec::new();

    for expected in EXPECTED_FILES {
        if !ebook.directory.join(expected).is_file() {
            messages.push(message("missing-file", *expected, "Missing expected file", vec![])?);
        }
    }

    let metadata = &ebook.metadata;
    let missing_metadata: Vec<String> = [
        ("dc:title", &metadata.title),
        ("dc:creator", &metadata.author),
        ("dc:identifier", &metadata.identifier),
        ("dc:language", &metadata.language),
    ]
    .iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(element, _)| format!("<{}>", element))
    .collect();
    if !missing_metadata.is_empty() {
        messages.push(message(
            "missing-metadata",
            CONTENT_OPF,
            "Missing or empty metadata element",
            missing_metadata,
        )?);
    }

    let epub_dir = ebook.epub_dir();
    let manifest: HashSet<&str> = ebook
        .package
        .manifest
        .iter()
        .map(|item| item.href.as_str())
        .collect();

    let mut absent: Vec<String> = ebook
        .package
        .manifest
        .iter()
        .filter(|item| !epub_dir.join(&item.href).is_file())
        .map(|item| item.href.clone())
        .collect();
    absent.sort();
    if !absent.is_empty() {
        messages.push(message(
            "manifest-missing-file",
            CONTENT_OPF,
            "Manifest lists files that don’t exist",
            absent,
        )?);
    }

    let mut unlisted = Vec::new();
    if epub_dir.is_dir() {
        for path in crate::files::list_files(&epub_dir)? {
            let name = relative_name(&path, &epub_dir);
            if name != "content.opf" && !manifest.contains(name.as_str()) {
                unlisted.push(name);
            }
        }
    }
    if !unlisted.is_empty() {
        messages.push(message(
            "unlisted-file",
            CONTENT_OPF,
            "Files not listed in the manifest",
            unlisted,
        )?);
    }

    let ids: HashSet<&str> = ebook
        .package
        .manifest
        .iter()
        .map(|item| item.id.as_str())
        .collect();
    let unknown: Vec<String> = ebook
        .package
        .spine
        .iter()
        .filter(|idref| !ids.contains(idref.as_str()))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        messages.push(message(
            "spine-unknown-idref",
            CONTENT_OPF,
            "Spine references items missing from the manifest",
            unknown,
        )?);
    }

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_name() {
        assert_eq!(
            relative_name(Path::new("/a/b/src/epub/text/x.xhtml"), Path::new("/a/b")),
            "src/epub/text/x.xhtml"
        );
    }
}
