//! se CLI entry point

use se::cli::{Context, dispatch};
use se::process::SystemProcessRunner;
use std::io::{self, BufRead, IsTerminal, Write};
use std::process;
use termcolor::{ColorChoice, StandardStream};

fn color_choice(is_terminal: bool) -> ColorChoice {
    if is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

fn main() {
    se::logging::init();

    let args: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let mut stdout = StandardStream::stdout(color_choice(io::stdout().is_terminal()));
    let mut stderr = StandardStream::stderr(color_choice(io::stderr().is_terminal()));

    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();
    let stdin: Option<&mut dyn BufRead> = if stdin_lock.is_terminal() {
        None
    } else {
        Some(&mut stdin_lock)
    };

    let runner = SystemProcessRunner;
    let exit_code = {
        let mut ctx = Context {
            runner: &runner,
            stdout: &mut stdout,
            stderr: &mut stderr,
            stdin,
        };
        dispatch(&mut ctx, &args)
    };

    let _ = stdout.flush();
    let _ = stderr.flush();
    process::exit(exit_code);
}
