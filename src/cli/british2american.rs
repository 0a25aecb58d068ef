//! `se british2american`

use crate::cli::common::{
    Context, EXIT_SUCCESS, parse_args, print_warning, progress_done, progress_start, report_error,
};
use crate::error::SeError;
use crate::files::{get_target_filenames, read_text, write_if_changed};
use crate::typography::{QuoteStyle, convert_british_to_american, guess_quoting_style};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

/// Try to convert British quote style to American quote style
#[derive(Parser, Debug)]
#[command(
    about = "Try to convert British quote style to American quote style. Quotes must already be typogrified using the `typogrify` tool. This script isn’t perfect; proofreading is required, especially near closing quotes near to em-dashes."
)]
struct British2AmericanArgs {
    /// Increase output verbosity
    #[arg(short, long)]
    verbose: bool,

    /// Force conversion of quote style
    #[arg(short, long)]
    force: bool,

    /// XHTML files, or directories containing XHTML files
    #[arg(required = true)]
    targets: Vec<PathBuf>,
}

pub fn run_british2american(ctx: &mut Context<'_>, program: &str, args: &[String]) -> i32 {
    let args = match parse_args::<British2AmericanArgs>(ctx, program, args) {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run_british2american_inner(ctx, &args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(ctx, &e),
    }
}

fn run_british2american_inner(
    ctx: &mut Context<'_>,
    args: &British2AmericanArgs,
) -> Result<(), SeError> {
    for path in get_target_filenames(&args.targets, &["xhtml"])? {
        progress_start(ctx, args.verbose, &path)?;
        let xhtml = read_text(&path)?;

        if !args.force && guess_quoting_style(&xhtml) == QuoteStyle::American {
            if args.verbose {
                writeln!(ctx.stdout)?;
            }
            print_warning(
                ctx,
                &format!(
                    "{}: File appears to already use American quote style, ignoring. Use `--force` to convert anyway.",
                    path.display()
                ),
            );
            continue;
        }

        let converted = convert_british_to_american(&xhtml);
        let changed = write_if_changed(&path, &xhtml, &converted)?;
        debug!(path = %path.display(), changed, "converted quotes");
        progress_done(ctx, args.verbose)?;
    }

    Ok(())
}
