//! `se clean`

use crate::cli::common::{
    Context, EXIT_SUCCESS, parse_args, progress_done, progress_start, report_error,
};
use crate::error::SeError;
use crate::files::get_target_filenames;
use crate::formatting::{FormatOptions, format_xhtml_file};
use clap::Parser;
use std::path::PathBuf;

const CLEANED_EXTENSIONS: &[&str] = &["xhtml", "svg", "opf", "ncx"];

/// Files whose line layout is significant and must not be joined
const SINGLE_LINES_EXEMPT: &[&str] = &["colophon.xhtml", "cover.svg", "titlepage.svg"];

/// Prettify XHTML, SVG, OPF, and NCX files into canonical form
#[derive(Parser, Debug)]
#[command(about = "Prettify and canonicalize individual XHTML, SVG, or OPF files, or all XHTML, SVG, or OPF files in a source directory")]
struct CleanArgs {
    /// Increase output verbosity
    #[arg(short, long)]
    verbose: bool,

    /// Remove hard line wrapping
    #[arg(short, long)]
    single_lines: bool,

    /// XHTML, SVG, or OPF files, or directories
    #[arg(required = true)]
    targets: Vec<PathBuf>,
}

pub fn run_clean(ctx: &mut Context<'_>, program: &str, args: &[String]) -> i32 {
    let args = match parse_args::<CleanArgs>(ctx, program, args) {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run_clean_inner(ctx, &args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(ctx, &e),
    }
}

fn run_clean_inner(ctx: &mut Context<'_>, args: &CleanArgs) -> Result<(), SeError> {
    let options = FormatOptions {
        single_lines: args.single_lines,
    };

    for path in get_target_filenames(&args.targets, CLEANED_EXTENSIONS)? {
        if args.single_lines
            && path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| SINGLE_LINES_EXEMPT.contains(&name))
        {
            continue;
        }

        progress_start(ctx, args.verbose, &path)?;
        format_xhtml_file(&path, options)?;
        progress_done(ctx, args.verbose)?;
    }

    Ok(())
}
