//! `se titlecase`

use crate::cli::common::{
    Context, EXIT_SUCCESS, input_lines, parse_args, print_lines, report_error,
};
use crate::error::SeError;
use crate::formatting::titlecase;
use clap::Parser;

/// Convert a string to titlecase
#[derive(Parser, Debug)]
#[command(about = "Convert a string to titlecase")]
struct TitlecaseArgs {
    /// Don’t end output with a newline
    #[arg(short, long)]
    no_newline: bool,

    /// The strings to titlecase; piped stdin lines come first
    strings: Vec<String>,
}

pub fn run_titlecase(ctx: &mut Context<'_>, program: &str, args: &[String]) -> i32 {
    let args = match parse_args::<TitlecaseArgs>(ctx, program, args) {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run_titlecase_inner(ctx, &args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(ctx, &e),
    }
}

fn run_titlecase_inner(ctx: &mut Context<'_>, args: &TitlecaseArgs) -> Result<(), SeError> {
    let outputs: Vec<String> = input_lines(ctx, &args.strings)?
        .iter()
        .map(|line| titlecase(line))
        .collect();
    print_lines(ctx, &outputs, args.no_newline)?;
    Ok(())
}
