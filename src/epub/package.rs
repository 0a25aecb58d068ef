//! Packaging a source directory into distributable files
//!
//! The EPUB container is a zip whose first entry is an uncompressed
//! `mimetype` file; every other entry is deflated. Validation and the Kindle
//! and Kobo conversions are delegated to external tools through the
//! [`ProcessRunner`].

use super::SeEpub;
use crate::config::ToolsConfig;
use crate::error::SeError;
use crate::process::{ProcessRunner, args, require};
use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Contents of the `mimetype` entry
pub const EPUB_MIMETYPE: &str = "application/epub+zip";

const PROOF_CSS: &str = include_str!("../../templates/proof.css");

/// What `build` should produce
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub output_dir: PathBuf,
    /// Run epubcheck on the result
    pub check: bool,
    pub kindle: bool,
    pub kobo: bool,
    /// Also write the cover as a standalone SVG
    pub covers: bool,
    /// Add proofreading styles to every XHTML file
    pub proof: bool,
}

/// Files written by a build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildArtifacts {
    pub epub: PathBuf,
    pub kindle: Option<PathBuf>,
    pub kobo: Option<PathBuf>,
    pub cover: Option<PathBuf>,
}

fn inject_proof_styles(xhtml: &str) -> String {
    let style = format!("<style type=\"text/css\">\n{}</style>\n", PROOF_CSS);
    match xhtml.find("</head>") {
        Some(position) => format!("{}{}{}", &xhtml[..position], style, &xhtml[position..]),
        None => xhtml.to_string(),
    }
}

/// Zip `src_dir` into an EPUB container at `output`
pub fn write_epub(src_dir: &Path, output: &Path, proof: bool) -> Result<(), SeError> {
    let mimetype = src_dir.join("mimetype");
    if !mimetype.is_file() {
        return Err(SeError::InvalidSeEbook(format!(
            "Missing {}",
            mimetype.display()
        )));
    }

    let mut zip = ZipWriter::new(File::create(output)?);
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("mimetype", stored)?;
    zip.write_all(EPUB_MIMETYPE.as_bytes())?;

    for path in crate::files::list_files(src_dir)? {
        let Ok(relative) = path.strip_prefix(src_dir) else {
            continue;
        };
        let name = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if name == "mimetype" || name.rsplit('/').next().is_some_and(|file| file.starts_with('.')) {
            continue;
        }

        zip.start_file(name.as_str(), deflated)?;
        if proof && crate::files::has_extension(&path, &["xhtml"]) {
            let xhtml = crate::files::read_text(&path)?;
            zip.write_all(inject_proof_styles(&xhtml).as_bytes())?;
        } else {
            zip.write_all(&fs::read(&path)?)?;
        }
    }

    zip.finish()?;
    Ok(())
}

fn run_tool(
    runner: &dyn ProcessRunner,
    program: &Path,
    arguments: &[OsString],
) -> Result<(), SeError> {
    let output = runner.run(program, arguments)?;
    if output.success() {
        Ok(())
    } else {
        Err(SeError::RemoteCommand(format!(
            "{} exited with status {}: {}",
            program.display(),
            output.status,
            output.combined()
        )))
    }
}

impl SeEpub {
    /// Build the ebook into `options.output_dir`
    ///
    /// Every external tool the options call for is located before anything is
    /// written. When epubcheck rejects the package the error is returned and
    /// no Kindle or Kobo files are produced.
    pub fn build(
        &self,
        options: &BuildOptions,
        tools: &ToolsConfig,
        runner: &dyn ProcessRunner,
    ) -> Result<BuildArtifacts, SeError> {
        let epubcheck = options
            .check
            .then(|| require(runner, &tools.epubcheck))
            .transpose()?;
        let ebook_convert = options
            .kindle
            .then(|| require(runner, &tools.ebook_convert))
            .transpose()?;
        let kepubify = options
            .kobo
            .then(|| require(runner, &tools.kepubify))
            .transpose()?;

        let cover_source = self.epub_dir().join("images").join("cover.svg");
        if options.covers && !cover_source.is_file() {
            return Err(SeError::InvalidSeEbook(format!(
                "Cover not found: {}. Run build-images first.",
                cover_source.display()
            )));
        }

        fs::create_dir_all(&options.output_dir)?;

        let name = self.name();
        let stem = if options.proof {
            format!("{}.proof", name)
        } else {
            name.clone()
        };

        let mut artifacts = BuildArtifacts {
            epub: options.output_dir.join(format!("{}.epub", stem)),
            ..BuildArtifacts::default()
        };
        debug!(output = %artifacts.epub.display(), "writing epub");
        write_epub(&self.src_dir(), &artifacts.epub, options.proof)?;

        if let Some(epubcheck) = epubcheck {
            let output = runner.run(&epubcheck, &args([artifacts.epub.as_os_str()]))?;
            if !output.success() {
                return Err(SeError::BuildFailed(format!(
                    "epubcheck rejected {}:\n{}",
                    artifacts.epub.display(),
                    output.combined()
                )));
            }
        }

        if let Some(ebook_convert) = ebook_convert {
            let azw3 = options.output_dir.join(format!("{}.azw3", stem));
            run_tool(
                runner,
                &ebook_convert,
                &args([artifacts.epub.as_os_str(), azw3.as_os_str()]),
            )?;
            artifacts.kindle = Some(azw3);
        }

        if let Some(kepubify) = kepubify {
            let kepub = options.output_dir.join(format!("{}.kepub.epub", stem));
            run_tool(
                runner,
                &kepubify,
                &args([OsStr::new("-o"), kepub.as_os_str(), artifacts.epub.as_os_str()]),
            )?;
            artifacts.kobo = Some(kepub);
        }

        if options.covers {
            let cover = options.output_dir.join(format!("{}_cover.svg", name));
            fs::copy(&cover_source, &cover)?;
            artifacts.cover = Some(cover);
        }

        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    fn source_tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        fs::create_dir_all(src.join("META-INF")).unwrap();
        fs::create_dir_all(src.join("epub/text")).unwrap();
        fs::write(src.join("mimetype"), EPUB_MIMETYPE).unwrap();
        fs::write(src.join("META-INF/container.xml"), "<container/>").unwrap();
        fs::write(
            src.join("epub/text/chapter-1.xhtml"),
            "<html><head><title>1</title></head><body/></html>",
        )
        .unwrap();
        fs::write(src.join("epub/.DS_Store"), "junk").unwrap();
        temp_dir
    }

    #[test]
    fn test_mimetype_first_and_stored() {
        let temp_dir = source_tree();
        let output = temp_dir.path().join("book.epub");
        write_epub(&temp_dir.path().join("src"), &output, false).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&output).unwrap()).unwrap();
        let mut first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), CompressionMethod::Stored);
        let mut content = String::new();
        first.read_to_string(&mut content).unwrap();
        assert_eq!(content, EPUB_MIMETYPE);
        drop(first);

        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        assert!(names.contains(&"epub/text/chapter-1.xhtml".to_string()));
        assert!(!names.iter().any(|name| name.ends_with(".DS_Store")));
        assert_eq!(names.iter().filter(|name| *name == "mimetype").count(), 1);
    }

    #[test]
    fn test_proof_styles_injected() {
        let temp_dir = source_tree();
        let output = temp_dir.path().join("book.proof.epub");
        write_epub(&temp_dir.path().join("src"), &output, true).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&output).unwrap()).unwrap();
        let mut chapter = archive.by_name("epub/text/chapter-1.xhtml").unwrap();
        let mut content = String::new();
        chapter.read_to_string(&mut content).unwrap();
        assert!(content.contains("<style type=\"text/css\">"));
        assert!(content.find("<style").unwrap() < content.find("</head>").unwrap());
    }

    #[test]
    fn test_missing_mimetype() {
        let temp_dir = TempDir::new().unwrap();
        let err = write_epub(temp_dir.path(), &temp_dir.path().join("x.epub"), false).unwrap_err();
        assert_eq!(err.code(), 11);
    }
}
