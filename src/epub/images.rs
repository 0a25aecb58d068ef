//! Distributable cover and titlepage images
//!
//! Source artwork lives in `images/` at the top of the ebook repository. The
//! cover SVG references `cover.jpg` as a sibling file; the distributable copy
//! in `src/epub/images/` embeds the JPEG as a data URI instead.

use super::SeEpub;
use crate::error::SeError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

static COVER_JPG_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"((?:xlink:)?href)="(?:\.\./)?(?:images/)?cover\.jpg""#).expect("valid regex")
});

/// Check that `svg` is well-formed XML with an `<svg>` root
pub fn validate_svg(svg: &str, path: &Path) -> Result<(), SeError> {
    let invalid = |message: String| SeError::InvalidSvg(format!("{}: {}", path.display(), message));
    let mut reader = Reader::from_str(svg);
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        match reader.read_event().map_err(|e| invalid(e.to_string()))? {
            Event::Start(start) => {
                if depth == 0 {
                    if start.local_name().as_ref() != b"svg" {
                        return Err(invalid("root element is not <svg>".to_string()));
                    }
                    saw_root = true;
                }
                depth += 1;
            }
            Event::Empty(element) if depth == 0 => {
                if element.local_name().as_ref() != b"svg" {
                    return Err(invalid("root element is not <svg>".to_string()));
                }
                saw_root = true;
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        return Err(invalid("unexpected end of file".to_string()));
    }
    if !saw_root {
        return Err(invalid("no <svg> element".to_string()));
    }
    Ok(())
}

fn require_source(path: PathBuf) -> Result<PathBuf, SeError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(SeError::InvalidSeEbook(format!(
            "Source image not found: {}",
            path.display()
        )))
    }
}

impl SeEpub {
    fn images_output_dir(&self) -> Result<PathBuf, SeError> {
        let dir = self.epub_dir().join("images");
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Build `src/epub/images/cover.svg` with the cover JPEG embedded
    pub fn generate_cover_svg(&self) -> Result<PathBuf, SeError> {
        let svg_path = require_source(self.directory.join("images").join("cover.svg"))?;
        let jpg_path = require_source(self.directory.join("images").join("cover.jpg"))?;

        let svg = crate::files::read_text(&svg_path)?;
        validate_svg(&svg, &svg_path)?;

        if !COVER_JPG_HREF.is_match(&svg) {
            return Err(SeError::InvalidSvg(format!(
                "{}: no reference to cover.jpg",
                svg_path.display()
            )));
        }

        let jpg = fs::read(&jpg_path)?;
        let data_uri = format!("data:image/jpeg;base64,{}", STANDARD.encode(jpg));
        let embedded = COVER_JPG_HREF.replace_all(&svg, |captures: &regex::Captures<'_>| {
            format!("{}=\"{}\"", &captures[1], data_uri)
        });

        let output = self.images_output_dir()?.join("cover.svg");
        debug!(output = %output.display(), "writing cover");
        fs::write(&output, embedded.as_bytes())?;
        Ok(output)
    }

    /// Build `src/epub/images/titlepage.svg` from the source artwork
    pub fn generate_titlepage_svg(&self) -> Result<PathBuf, SeError> {
        let svg_path = require_source(self.directory.join("images").join("titlepage.svg"))?;
        let svg = crate::files::read_text(&svg_path)?;
        validate_svg(&svg, &svg_path)?;

        let output = self.images_output_dir()?.join("titlepage.svg");
        debug!(output = %output.display(), "writing titlepage");
        fs::write(&output, svg)?;
        Ok(output)
    }
}
