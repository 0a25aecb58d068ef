//! `se build-images`

use crate::cli::common::{Context, EXIT_SUCCESS, parse_args, report_error};
use crate::epub::SeEpub;
use crate::error::SeError;
use clap::Parser;
use std::path::PathBuf;

/// Build the cover and titlepage images for distribution
#[derive(Parser, Debug)]
#[command(
    about = "Build ebook cover and titlepage images in a Standard Ebook source directory and place the output in DIRECTORY/src/epub/images/"
)]
struct BuildImagesArgs {
    /// Increase output verbosity
    #[arg(short, long)]
    verbose: bool,

    /// A Standard Ebooks source directory
    #[arg(required = true)]
    directories: Vec<PathBuf>,
}

pub fn run_build_images(ctx: &mut Context<'_>, program: &str, args: &[String]) -> i32 {
    let args = match parse_args::<BuildImagesArgs>(ctx, program, args) {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run_build_images_inner(ctx, &args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(ctx, &e),
    }
}

fn run_build_images_inner(ctx: &mut Context<'_>, args: &BuildImagesArgs) -> Result<(), SeError> {
    for directory in &args.directories {
        let ebook = SeEpub::open(directory)?;

        if args.verbose {
            writeln!(ctx.stdout, "Processing {} ...", directory.display())?;
            write!(ctx.stdout, "\tBuilding cover.svg ...")?;
            ctx.stdout.flush()?;
        }
        ebook.generate_cover_svg()?;

        if args.verbose {
            writeln!(ctx.stdout, " OK")?;
            write!(ctx.stdout, "\tBuilding titlepage.svg ...")?;
            ctx.stdout.flush()?;
        }
        ebook.generate_titlepage_svg()?;

        if args.verbose {
            writeln!(ctx.stdout, " OK")?;
        }
    }

    Ok(())
}
