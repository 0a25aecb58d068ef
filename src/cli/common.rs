//! Common helpers shared across command handlers
//!
//! Every handler receives a [`Context`] carrying its output streams, its
//! standard input (when piped), and the external process capability. Nothing
//! in a handler touches the process-global streams directly, which is what
//! lets the integration tests drive handlers in-process.

use crate::config::{CONFIG_FILE_NAME, Config};
use crate::error::SeError;
use crate::process::ProcessRunner;
use clap::Parser;
use std::io::{self, BufRead};
use std::path::Path;
use termcolor::{Color, ColorSpec, WriteColor};

/// Exit codes not tied to an error variant
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_USAGE: i32 = 2;

/// Everything a handler may touch outside its own arguments
pub struct Context<'a> {
    pub runner: &'a dyn ProcessRunner,
    pub stdout: &'a mut dyn WriteColor,
    pub stderr: &'a mut dyn WriteColor,
    /// Standard input, present only when it is not a terminal
    pub stdin: Option<&'a mut dyn BufRead>,
}

/// Parse handler arguments with `program` as the displayed command name
///
/// On `--help` or a usage error the rendered clap message is written to the
/// matching stream and `Err` carries the exit code to return.
pub(crate) fn parse_args<T: Parser>(
    ctx: &mut Context<'_>,
    program: &str,
    args: &[String],
) -> Result<T, i32> {
    let command = T::command().bin_name(format!("se {}", program));
    let parsed = command
        .try_get_matches_from(std::iter::once(program).chain(args.iter().map(String::as_str)))
        .and_then(|matches| T::from_arg_matches(&matches));

    parsed.map_err(|err| {
        let rendered = err.render().to_string();
        let stream: &mut dyn WriteColor = if err.use_stderr() {
            &mut *ctx.stderr
        } else {
            &mut *ctx.stdout
        };
        let _ = write!(stream, "{}", rendered);
        err.exit_code()
    })
}

fn write_labeled(
    stream: &mut dyn WriteColor,
    label: &str,
    color: Color,
    message: &str,
) -> io::Result<()> {
    stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(stream, "{}", label)?;
    stream.reset()?;
    writeln!(stream, " {}", message)
}

/// Print `Error: <message>` to stderr and return the error's exit code
pub(crate) fn report_error(ctx: &mut Context<'_>, error: &SeError) -> i32 {
    let _ = write_labeled(ctx.stderr, "Error:", Color::Red, &error.to_string());
    error.code()
}

/// Print `Warning: <message>` to stderr
pub(crate) fn print_warning(ctx: &mut Context<'_>, message: &str) {
    let _ = write_labeled(ctx.stderr, "Warning:", Color::Yellow, message);
}

/// Print the start of a verbose progress line
pub(crate) fn progress_start(
    ctx: &mut Context<'_>,
    verbose: bool,
    path: &Path,
) -> io::Result<()> {
    if verbose {
        write!(ctx.stdout, "Processing {} ...", path.display())?;
        ctx.stdout.flush()?;
    }
    Ok(())
}

/// Finish a verbose progress line
pub(crate) fn progress_done(ctx: &mut Context<'_>, verbose: bool) -> io::Result<()> {
    if verbose {
        writeln!(ctx.stdout, " OK")?;
    }
    Ok(())
}

/// Lines from piped stdin (line endings stripped), then the positional values
pub(crate) fn input_lines(
    ctx: &mut Context<'_>,
    positional: &[String],
) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    if let Some(stdin) = ctx.stdin.as_mut() {
        for line in stdin.lines() {
            let line = line?;
            lines.push(line.trim_end_matches(['\r', '\n']).to_string());
        }
    }
    lines.extend(positional.iter().cloned());
    Ok(lines)
}

/// Print each output followed by a newline unless `no_newline`
pub(crate) fn print_lines(
    ctx: &mut Context<'_>,
    outputs: &[String],
    no_newline: bool,
) -> io::Result<()> {
    for output in outputs {
        if no_newline {
            write!(ctx.stdout, "{}", output)?;
        } else {
            writeln!(ctx.stdout, "{}", output)?;
        }
    }
    Ok(())
}

/// Load se.toml from `dir`, else from the current directory, else defaults
pub(crate) fn load_config(dir: &Path) -> Result<Config, SeError> {
    if dir.join(CONFIG_FILE_NAME).is_file() {
        return Ok(Config::load_or_default(dir)?);
    }
    Ok(Config::load_or_default(".")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::SystemProcessRunner;
    use clap::Parser;
    use termcolor::NoColor;

    #[derive(Parser, Debug)]
    struct Args {
        #[arg(short, long)]
        verbose: bool,
        targets: Vec<String>,
    }

    struct Harness {
        stdout: NoColor<Vec<u8>>,
        stderr: NoColor<Vec<u8>>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                stdout: NoColor::new(Vec::new()),
                stderr: NoColor::new(Vec::new()),
            }
        }

        fn stdout(&self) -> String {
            String::from_utf8_lossy(self.stdout.get_ref()).into_owned()
        }

        fn stderr(&self) -> String {
            String::from_utf8_lossy(self.stderr.get_ref()).into_owned()
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_uses_program_name() {
        let mut harness = Harness::new();
        let runner = SystemProcessRunner;
        let mut ctx = Context {
            runner: &runner,
            stdout: &mut harness.stdout,
            stderr: &mut harness.stderr,
            stdin: None,
        };

        let code = parse_args::<Args>(&mut ctx, "clean", &strings(&["--bogus"])).unwrap_err();
        assert_eq!(code, 2);
        assert!(harness.stderr().contains("se clean"));
    }

    #[test]
    fn test_parse_args_help_goes_to_stdout() {
        let mut harness = Harness::new();
        let runner = SystemProcessRunner;
        let mut ctx = Context {
            runner: &runner,
            stdout: &mut harness.stdout,
            stderr: &mut harness.stderr,
            stdin: None,
        };

        let code = parse_args::<Args>(&mut ctx, "clean", &strings(&["--help"])).unwrap_err();
        assert_eq!(code, 0);
        assert!(harness.stdout().contains("Usage: se clean"));
        assert!(harness.stderr().is_empty());
    }

    #[test]
    fn test_parse_args_success() {
        let mut harness = Harness::new();
        let runner = SystemProcessRunner;
        let mut ctx = Context {
            runner: &runner,
            stdout: &mut harness.stdout,
            stderr: &mut harness.stderr,
            stdin: None,
        };

        let args = parse_args::<Args>(&mut ctx, "clean", &strings(&["-v", "a", "b"])).unwrap();
        assert!(args.verbose);
        assert_eq!(args.targets, vec!["a", "b"]);
    }

    #[test]
    fn test_input_lines_reads_stdin_first() {
        let mut harness = Harness::new();
        let runner = SystemProcessRunner;
        let mut input: &[u8] = b"one\r\ntwo\n";
        let mut ctx = Context {
            runner: &runner,
            stdout: &mut harness.stdout,
            stderr: &mut harness.stderr,
            stdin: Some(&mut input),
        };

        let lines = input_lines(&mut ctx, &strings(&["three"])).unwrap();
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_report_error_returns_code() {
        let mut harness = Harness::new();
        let runner = SystemProcessRunner;
        let mut ctx = Context {
            runner: &runner,
            stdout: &mut harness.stdout,
            stderr: &mut harness.stderr,
            stdin: None,
        };

        let code = report_error(&mut ctx, &SeError::MissingDependency("vim".to_string()));
        assert_eq!(code, 3);
        assert_eq!(harness.stderr(), "Error: vim\n");
    }
}
