//! `se lint`
//!
//! Lint results are reported, not enforced: the command exits 0 whenever
//! every ebook could be linted, whatever it found.

use crate::cli::common::{Context, EXIT_SUCCESS, load_config, parse_args, report_error};
use crate::epub::SeEpub;
use crate::error::SeError;
use crate::lint::{JsonlFormatter, PlainFormatter, TableFormatter, lint};
use clap::Parser;
use std::path::{Path, PathBuf};
use termcolor::{Color, ColorSpec};

/// Check for errors and style problems in an ebook
#[derive(Parser, Debug)]
#[command(about = "Check for various Standard Ebooks style errors")]
struct LintArgs {
    /// Increase output verbosity
    #[arg(short, long)]
    verbose: bool,

    /// Print plain text output, without tables or colors
    #[arg(short, long)]
    plain: bool,

    /// Print one JSON record per message
    #[arg(short, long, conflicts_with = "plain")]
    jsonl: bool,

    /// A Standard Ebooks source directory
    #[arg(required = true)]
    directories: Vec<PathBuf>,
}

pub fn run_lint(ctx: &mut Context<'_>, program: &str, args: &[String]) -> i32 {
    let args = match parse_args::<LintArgs>(ctx, program, args) {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run_lint_inner(ctx, &args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(ctx, &e),
    }
}

fn run_lint_inner(ctx: &mut Context<'_>, args: &LintArgs) -> Result<(), SeError> {
    let multiple = args.directories.len() > 1;
    let mut first_output = true;

    for directory in &args.directories {
        let ebook = SeEpub::open(directory)?;
        let config = load_config(directory)?;
        let messages = lint(&ebook, &config.lint)?;

        if args.jsonl {
            write!(ctx.stdout, "{}", JsonlFormatter::new().format(&ebook.name(), &messages))?;
            continue;
        }

        // Blank line between the output of consecutive ebooks
        if !first_output && (args.verbose || !messages.is_empty()) {
            writeln!(ctx.stdout)?;
        }
        first_output = false;

        if args.verbose || (multiple && !messages.is_empty()) {
            write_header(ctx, args.plain, directory)?;
        }

        if !messages.is_empty() {
            if args.plain {
                write!(ctx.stdout, "{}", PlainFormatter::new().format(&messages))?;
            } else {
                TableFormatter::new().write(ctx.stdout, &messages)?;
            }
        } else if args.verbose {
            write_ok(ctx, args.plain)?;
        }
    }

    Ok(())
}

fn write_header(ctx: &mut Context<'_>, plain: bool, directory: &Path) -> Result<(), SeError> {
    if !plain {
        ctx.stdout
            .set_color(ColorSpec::new().set_fg(Some(Color::White)).set_bold(true))?;
    }
    write!(ctx.stdout, "{}", directory.display())?;
    if !plain {
        ctx.stdout.reset()?;
    }
    writeln!(ctx.stdout)?;
    Ok(())
}

fn write_ok(ctx: &mut Context<'_>, plain: bool) -> Result<(), SeError> {
    if !plain {
        ctx.stdout
            .set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    }
    write!(ctx.stdout, "OK")?;
    if !plain {
        ctx.stdout.reset()?;
    }
    writeln!(ctx.stdout)?;
    Ok(())
}
