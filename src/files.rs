//! Target discovery
//!
//! Expands the file and directory targets given on the command line into a
//! sorted, de-duplicated list of concrete files with one of the requested
//! extensions.

use crate::error::SeError;
use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Front- and back-matter files that rarely need visual comparison
pub const IGNORED_FILENAMES: &[&str] = &[
    "colophon.xhtml",
    "titlepage.xhtml",
    "imprint.xhtml",
    "uncopyright.xhtml",
    "halftitle.xhtml",
    "toc.xhtml",
    "loi.xhtml",
];

/// Whether `path` has one of `extensions` (given without the leading dot)
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
}

/// Expand `targets` into concrete files matching `extensions`
///
/// Directories are walked recursively with [`list_files`]. Explicit file
/// targets are kept when their extension matches.
pub fn get_target_filenames<P: AsRef<Path>>(
    targets: &[P],
    extensions: &[&str],
) -> Result<Vec<PathBuf>, SeError> {
    let mut filenames = BTreeSet::new();

    for target in targets {
        let target = target.as_ref();

        if target.is_dir() {
            filenames.extend(
                list_files(target)?
                    .into_iter()
                    .filter(|path| has_extension(path, extensions)),
            );
        } else if has_extension(target, extensions) {
            filenames.insert(target.to_path_buf());
        }
    }

    Ok(filenames.into_iter().collect())
}

/// Every regular file under `dir`, sorted
///
/// Hidden files are included, `.git` directories are not, and ignore files
/// are not consulted since ebook sources are small and fully tracked.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>, SeError> {
    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .hidden(false)
        .filter_entry(|entry| entry.file_name() != ".git")
        .build();

    let mut files = Vec::new();
    for result in walker {
        let entry = result?;
        if entry.file_type().is_some_and(|ft| ft.is_file()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Read a UTF-8 markup file, reporting non-UTF-8 content as an encoding error
pub fn read_text(path: &Path) -> Result<String, SeError> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::InvalidData {
            SeError::InvalidEncoding(path.to_path_buf())
        } else {
            SeError::Io(e)
        }
    })
}

/// Write `content` only when it differs from `original`
///
/// Returns whether the file was rewritten.
pub fn write_if_changed(path: &Path, original: &str, content: &str) -> Result<bool, SeError> {
    if original == content {
        return Ok(false);
    }
    std::fs::write(path, content)?;
    Ok(true)
}
