//! The ebook source directory model
//!
//! An ebook repository looks like:
//!
//! ```text
//! <name>/
//!   images/            source artwork (cover.svg, cover.jpg, titlepage.svg)
//!   src/
//!     mimetype
//!     META-INF/container.xml
//!     epub/content.opf
//!     epub/text/*.xhtml
//! ```

pub mod images;
pub mod metadata;
pub mod package;
pub mod skeleton;

pub use metadata::{EpubMetadata, ManifestItem, PackageDocument};
pub use package::{BuildArtifacts, BuildOptions, EPUB_MIMETYPE};
pub use skeleton::{DraftInfo, create_skeleton};

use crate::error::SeError;
use std::path::{Path, PathBuf};

/// Files every source directory must contain, relative to its root
pub const REQUIRED_FILES: &[&str] = &[
    "src/mimetype",
    "src/META-INF/container.xml",
    "src/epub/content.opf",
];

/// An opened ebook source directory
#[derive(Debug, Clone)]
pub struct SeEpub {
    /// Absolute path of the repository root
    pub directory: PathBuf,
    pub metadata: EpubMetadata,
    pub package: PackageDocument,
}

impl SeEpub {
    /// Open and validate a source directory
    pub fn open(directory: impl AsRef<Path>) -> Result<Self, SeError> {
        let directory = directory.as_ref();
        if !directory.is_dir() {
            return Err(SeError::InvalidSeEbook(format!(
                "Not a directory: {}",
                directory.display()
            )));
        }
        let directory = directory.canonicalize()?;

        for required in REQUIRED_FILES {
            if !directory.join(required).is_file() {
                return Err(SeError::InvalidSeEbook(format!(
                    "{} is missing {}",
                    directory.display(),
                    required
                )));
            }
        }

        let opf = crate::files::read_text(&directory.join("src/epub/content.opf"))?;
        let package = PackageDocument::parse(&opf)?;

        Ok(SeEpub {
            directory,
            metadata: package.metadata.clone(),
            package,
        })
    }

    /// Repository directory name, used for output file names
    pub fn name(&self) -> String {
        self.directory
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ebook".to_string())
    }

    pub fn src_dir(&self) -> PathBuf {
        self.directory.join("src")
    }

    /// Directory holding `content.opf`; manifest hrefs are relative to it
    pub fn epub_dir(&self) -> PathBuf {
        self.directory.join("src").join("epub")
    }
}
