//! `se extract-ebook`
//!
//! Only EPUB containers are unpacked. Mobipocket files are recognized so the
//! error can say so, but their format is not decoded.

use crate::cli::common::{
    Context, EXIT_SUCCESS, parse_args, progress_done, progress_start, report_error,
};
use crate::epub::EPUB_MIMETYPE;
use crate::error::SeError;
use clap::Parser;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const MOBI_MAGIC: &[u8] = b"BOOKMOBI";
const MOBI_MAGIC_OFFSET: usize = 60;

/// Container format of an ebook file, judged from its leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EbookKind {
    Zip,
    Mobi,
    Unknown,
}

/// Extract an EPUB into a directory
#[derive(Parser, Debug)]
#[command(
    about = "Extract an EPUB into a directory. Mobipocket files are recognized but not supported."
)]
struct ExtractEbookArgs {
    /// Increase output verbosity
    #[arg(short, long)]
    verbose: bool,

    /// A directory to place the extracted files in; defaults to ./TARGET.extracted
    #[arg(short, long, value_name = "DIRECTORY")]
    destination: Option<PathBuf>,

    /// An .epub file
    #[arg(required = true)]
    targets: Vec<PathBuf>,
}

pub fn run_extract_ebook(ctx: &mut Context<'_>, program: &str, args: &[String]) -> i32 {
    let args = match parse_args::<ExtractEbookArgs>(ctx, program, args) {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run_extract_ebook_inner(ctx, &args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(ctx, &e),
    }
}

fn run_extract_ebook_inner(ctx: &mut Context<'_>, args: &ExtractEbookArgs) -> Result<(), SeError> {
    for target in &args.targets {
        let destination = match &args.destination {
            Some(destination) => destination.clone(),
            None => default_destination(target),
        };

        if destination.exists() {
            return Err(SeError::FileExists(destination));
        }

        progress_start(ctx, args.verbose, target)?;

        match detect_kind(target)? {
            EbookKind::Zip => extract_epub(target, &destination)?,
            EbookKind::Mobi => {
                return Err(SeError::InvalidFile(format!(
                    "Mobipocket files are not supported: {}",
                    target.display()
                )));
            }
            EbookKind::Unknown => {
                return Err(SeError::InvalidFile(format!(
                    "Couldn’t understand file type: {}",
                    target.display()
                )));
            }
        }

        progress_done(ctx, args.verbose)?;
    }

    Ok(())
}

/// `books/book.epub` extracts to `./book.epub.extracted`
fn default_destination(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or(target.as_os_str()).to_os_string();
    name.push(".extracted");
    PathBuf::from(name)
}

fn detect_kind(path: &Path) -> Result<EbookKind, SeError> {
    let mut header = Vec::with_capacity(MOBI_MAGIC_OFFSET + MOBI_MAGIC.len());
    File::open(path)?
        .take((MOBI_MAGIC_OFFSET + MOBI_MAGIC.len()) as u64)
        .read_to_end(&mut header)?;

    if header.starts_with(ZIP_MAGIC) {
        Ok(EbookKind::Zip)
    } else if header.get(MOBI_MAGIC_OFFSET..) == Some(MOBI_MAGIC) {
        Ok(EbookKind::Mobi)
    } else {
        Ok(EbookKind::Unknown)
    }
}

fn read_mimetype(archive: &mut ZipArchive<File>) -> Option<String> {
    let mut entry = archive.by_name("mimetype").ok()?;
    let mut mimetype = String::new();
    entry.read_to_string(&mut mimetype).ok()?;
    Some(mimetype)
}

/// Unpack an EPUB, removing `destination` again if anything goes wrong
fn extract_epub(source: &Path, destination: &Path) -> Result<(), SeError> {
    let mut archive = ZipArchive::new(File::open(source)?)?;

    if read_mimetype(&mut archive).as_deref().map(str::trim) != Some(EPUB_MIMETYPE) {
        return Err(SeError::InvalidFile(format!(
            "Not an EPUB (missing {} mimetype): {}",
            EPUB_MIMETYPE,
            source.display()
        )));
    }

    fs::create_dir_all(destination)?;
    let result = unpack(&mut archive, destination);
    if result.is_err() {
        let _ = fs::remove_dir_all(destination);
    }
    result
}

fn unpack(archive: &mut ZipArchive<File>, destination: &Path) -> Result<(), SeError> {
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(SeError::InvalidFile(format!(
                "Archive entry escapes the destination: {}",
                entry.name()
            )));
        };
        let path = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&path)?;
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!(path = %path.display(), "extracting");
        let mut file = File::create(&path)?;
        io::copy(&mut entry, &mut file)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_destination() {
        assert_eq!(
            default_destination(Path::new("books/moby-dick.epub")),
            PathBuf::from("moby-dick.epub.extracted")
        );
    }

    #[test]
    fn test_detect_kind() {
        let temp_dir = TempDir::new().unwrap();

        let zip = temp_dir.path().join("a.epub");
        fs::write(&zip, b"PK\x03\x04rest of archive").unwrap();
        assert_eq!(detect_kind(&zip).unwrap(), EbookKind::Zip);

        let mobi = temp_dir.path().join("a.mobi");
        let mut bytes = vec![0u8; MOBI_MAGIC_OFFSET];
        bytes.extend_from_slice(MOBI_MAGIC);
        bytes.extend_from_slice(b"payload");
        fs::write(&mobi, bytes).unwrap();
        assert_eq!(detect_kind(&mobi).unwrap(), EbookKind::Mobi);

        let short = temp_dir.path().join("a.txt");
        fs::write(&short, b"hello").unwrap();
        assert_eq!(detect_kind(&short).unwrap(), EbookKind::Unknown);
    }
}
