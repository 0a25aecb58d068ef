//! Command dispatch
//!
//! `se <command> [args...]`: the front parser only validates the command
//! name. Everything after it is handed untouched to the handler, which parses
//! it with its own clap definition under the name `se <command>`.

use super::common::{Context, EXIT_USAGE};
use super::registry::{COMMANDS, CommandSpec};
use clap::builder::{PossibleValue, PossibleValuesParser};
use clap::{Arg, Command};
use tracing::debug;

fn front_parser(commands: &[CommandSpec]) -> Command {
    let values: Vec<PossibleValue> = commands
        .iter()
        .map(|spec| PossibleValue::new(spec.name).help(spec.about))
        .collect();

    Command::new("se")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A toolset for producing ebooks to house style")
        .arg(
            Arg::new("command")
                .required(true)
                .value_parser(PossibleValuesParser::new(values))
                .help("The command to run"),
        )
        .arg(
            Arg::new("arguments")
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .help("Arguments for the command; see `se <command> --help`"),
        )
}

/// Dispatch `args` (a full argument vector, program name first) to a
/// registered command and return its exit code
pub fn dispatch(ctx: &mut Context<'_>, args: &[String]) -> i32 {
    dispatch_with(COMMANDS, ctx, args)
}

/// [`dispatch`] against an explicit command table
pub fn dispatch_with(commands: &[CommandSpec], ctx: &mut Context<'_>, args: &[String]) -> i32 {
    // Only the program and command tokens belong to the front parser
    let head = &args[..args.len().min(2)];

    let matches = match front_parser(commands).try_get_matches_from(head) {
        Ok(matches) => matches,
        Err(err) => {
            let rendered = err.render().to_string();
            let stream: &mut dyn termcolor::WriteColor = if err.use_stderr() {
                &mut *ctx.stderr
            } else {
                &mut *ctx.stdout
            };
            let _ = write!(stream, "{}", rendered);
            return err.exit_code();
        }
    };

    let Some(spec) = matches
        .get_one::<String>("command")
        .and_then(|name| commands.iter().find(|spec| spec.name == name.as_str()))
    else {
        return EXIT_USAGE;
    };

    let rest = args.get(2..).unwrap_or_default();
    debug!(command = spec.name, args = ?rest, "dispatching");
    (spec.handler)(ctx, spec.name, rest)
}
