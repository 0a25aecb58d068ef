//! `se dec2roman`

use crate::cli::common::{
    Context, EXIT_SUCCESS, input_lines, parse_args, print_lines, report_error,
};
use crate::error::SeError;
use crate::formatting::to_roman;
use clap::Parser;

/// Convert a decimal number to a Roman numeral
#[derive(Parser, Debug)]
#[command(about = "Convert a decimal number to a Roman numeral", allow_negative_numbers = true)]
struct Dec2RomanArgs {
    /// Don’t end output with a newline
    #[arg(short, long)]
    no_newline: bool,

    /// Integers from 1 to 4999; piped stdin lines come first
    numbers: Vec<String>,
}

pub fn run_dec2roman(ctx: &mut Context<'_>, program: &str, args: &[String]) -> i32 {
    let args = match parse_args::<Dec2RomanArgs>(ctx, program, args) {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run_dec2roman_inner(ctx, &args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(ctx, &e),
    }
}

fn run_dec2roman_inner(ctx: &mut Context<'_>, args: &Dec2RomanArgs) -> Result<(), SeError> {
    let mut outputs = Vec::new();
    for line in input_lines(ctx, &args.numbers)? {
        let number: u32 = line
            .trim()
            .parse()
            .map_err(|_| SeError::InvalidInput(format!("Not a valid integer: {}", line)))?;
        outputs.push(to_roman(number)?);
    }
    print_lines(ctx, &outputs, args.no_newline)?;
    Ok(())
}
