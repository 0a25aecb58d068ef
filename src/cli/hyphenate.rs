//! `se hyphenate`
//!
//! Hyphenation dictionaries are loaded once per language and reused across
//! files, since each one carries a full pattern set.

use crate::cli::common::{
    Context, EXIT_SUCCESS, parse_args, progress_done, progress_start, report_error,
};
use crate::error::SeError;
use crate::files::{get_target_filenames, read_text, write_if_changed};
use crate::typography::{document_language, hyphenate_xhtml, load_hyphenator};
use clap::Parser;
use hyphenation::Standard;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;

/// Insert soft hyphens at syllable breaks in XHTML files
#[derive(Parser, Debug)]
#[command(about = "Insert soft hyphens at syllable breaks in XHTML files")]
struct HyphenateArgs {
    /// Increase output verbosity
    #[arg(short, long)]
    verbose: bool,

    /// Specify the language for the XHTML files; if unspecified, attempt to detect the language
    #[arg(short, long)]
    language: Option<String>,

    /// Don’t hyphenate <h1-6> tags
    #[arg(short, long)]
    ignore_h_tags: bool,

    /// XHTML files, or directories containing XHTML files
    #[arg(required = true)]
    targets: Vec<PathBuf>,
}

pub fn run_hyphenate(ctx: &mut Context<'_>, program: &str, args: &[String]) -> i32 {
    let args = match parse_args::<HyphenateArgs>(ctx, program, args) {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run_hyphenate_inner(ctx, &args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(ctx, &e),
    }
}

fn run_hyphenate_inner(ctx: &mut Context<'_>, args: &HyphenateArgs) -> Result<(), SeError> {
    let mut dictionaries: HashMap<String, Standard> = HashMap::new();

    for path in get_target_filenames(&args.targets, &["xhtml"])? {
        progress_start(ctx, args.verbose, &path)?;
        let xhtml = read_text(&path)?;

        let language = match &args.language {
            Some(language) => language.clone(),
            None => document_language(&xhtml).ok_or_else(|| {
                SeError::InvalidLanguage(format!(
                    "No language specified and none found in {}",
                    path.display()
                ))
            })?,
        };

        let hyphenator = match dictionaries.entry(language) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let hyphenator = load_hyphenator(entry.key())?;
                entry.insert(hyphenator)
            }
        };

        let hyphenated = hyphenate_xhtml(&xhtml, hyphenator, args.ignore_h_tags);
        write_if_changed(&path, &xhtml, &hyphenated)?;
        progress_done(ctx, args.verbose)?;
    }

    Ok(())
}
