//! `se make-url-safe`

use crate::cli::common::{
    Context, EXIT_SUCCESS, input_lines, parse_args, print_lines, report_error,
};
use crate::error::SeError;
use crate::formatting::make_url_safe;
use clap::Parser;

/// Make a string URL-safe
#[derive(Parser, Debug)]
#[command(about = "Make a string URL-safe")]
struct MakeUrlSafeArgs {
    /// Don’t end output with a newline
    #[arg(short, long)]
    no_newline: bool,

    /// The strings to convert; piped stdin lines come first
    #[arg(allow_hyphen_values = true)]
    strings: Vec<String>,
}

pub fn run_make_url_safe(ctx: &mut Context<'_>, program: &str, args: &[String]) -> i32 {
    let args = match parse_args::<MakeUrlSafeArgs>(ctx, program, args) {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run_make_url_safe_inner(ctx, &args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(ctx, &e),
    }
}

fn run_make_url_safe_inner(ctx: &mut Context<'_>, args: &MakeUrlSafeArgs) -> Result<(), SeError> {
    let outputs: Vec<String> = input_lines(ctx, &args.strings)?
        .iter()
        .map(|line| make_url_safe(line))
        .collect();
    print_lines(ctx, &outputs, args.no_newline)?;
    Ok(())
}
