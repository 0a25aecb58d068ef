//! `se build`

use crate::cli::common::{Context, EXIT_SUCCESS, load_config, parse_args, report_error};
use crate::epub::{BuildOptions, SeEpub};
use crate::error::SeError;
use clap::Parser;
use std::path::PathBuf;

/// Build an ebook from a source directory
#[derive(Parser, Debug)]
#[command(
    about = "Build compatible .epub and optional Kindle and Kobo files from a Standard Ebook source directory. Output is placed in the current directory, or the target directory with --output-dir."
)]
struct BuildArgs {
    /// Increase output verbosity
    #[arg(short, long)]
    verbose: bool,

    /// A directory to place output files in; will be created if it doesn’t exist
    #[arg(short, long, value_name = "DIRECTORY", default_value = ".")]
    output_dir: PathBuf,

    /// Use epubcheck to validate the compatible .epub file
    #[arg(short, long)]
    check: bool,

    /// Also build an .azw3 file for Kindle
    #[arg(short, long)]
    kindle: bool,

    /// Also build a .kepub.epub file for Kobo
    #[arg(short = 'b', long)]
    kobo: bool,

    /// Output the cover as a separate SVG
    #[arg(short = 't', long)]
    covers: bool,

    /// Insert additional CSS rules that are helpful for proofreading
    #[arg(short, long)]
    proof: bool,

    /// A Standard Ebooks source directory
    directory: PathBuf,
}

pub fn run_build(ctx: &mut Context<'_>, program: &str, args: &[String]) -> i32 {
    let args = match parse_args::<BuildArgs>(ctx, program, args) {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run_build_inner(ctx, &args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(ctx, &e),
    }
}

fn run_build_inner(ctx: &mut Context<'_>, args: &BuildArgs) -> Result<(), SeError> {
    let config = load_config(&args.directory)?;
    let ebook = SeEpub::open(&args.directory)?;

    let options = BuildOptions {
        output_dir: args.output_dir.clone(),
        check: args.check,
        kindle: args.kindle,
        kobo: args.kobo,
        covers: args.covers,
        proof: args.proof,
    };

    if args.verbose {
        writeln!(ctx.stdout, "Building {} ...", ebook.directory.display())?;
    }

    let artifacts = ebook.build(&options, &config.tools, ctx.runner)?;

    if args.verbose {
        let built = std::iter::once(&artifacts.epub)
            .chain(artifacts.kindle.iter())
            .chain(artifacts.kobo.iter())
            .chain(artifacts.cover.iter());
        for path in built {
            writeln!(ctx.stdout, "\tBuilt {}", path.display())?;
        }
    }

    Ok(())
}
