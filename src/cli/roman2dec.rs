//! `se roman2dec`

use crate::cli::common::{
    Context, EXIT_SUCCESS, input_lines, parse_args, print_lines, report_error,
};
use crate::error::SeError;
use crate::formatting::from_roman;
use clap::Parser;

/// Convert a Roman numeral to a decimal number
#[derive(Parser, Debug)]
#[command(about = "Convert a Roman numeral to a decimal number")]
struct Roman2DecArgs {
    /// Don’t end output with a newline
    #[arg(short, long)]
    no_newline: bool,

    /// Roman numerals in either case; piped stdin lines come first
    numerals: Vec<String>,
}

pub fn run_roman2dec(ctx: &mut Context<'_>, program: &str, args: &[String]) -> i32 {
    let args = match parse_args::<Roman2DecArgs>(ctx, program, args) {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run_roman2dec_inner(ctx, &args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(ctx, &e),
    }
}

fn run_roman2dec_inner(ctx: &mut Context<'_>, args: &Roman2DecArgs) -> Result<(), SeError> {
    let outputs = input_lines(ctx, &args.numerals)?
        .iter()
        .map(|line| from_roman(line).map(|number| number.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    print_lines(ctx, &outputs, args.no_newline)?;
    Ok(())
}
