//! `se interactive-sr`

use crate::cli::common::{Context, EXIT_SUCCESS, load_config, parse_args, report_error};
use crate::error::SeError;
use crate::process::require;
use clap::Parser;
use regex::Regex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// `/FIND/REPLACE/`, where either part may contain escaped slashes
static SUBSTITUTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(?:[^/\\]|\\.)+/(?:[^/\\]|\\.)*/$").expect("valid regex")
});

/// Interactively search and replace in files with Vim
#[derive(Parser, Debug)]
#[command(
    about = "Use Vim to perform an interactive search and replace on a list of files. Use y/n/a to confirm (y) or reject (n) a replacement, or to replace (a)ll."
)]
struct InteractiveSrArgs {
    /// A Vim-flavored regex in the form of `/FIND/REPLACE/`; do not include flags
    #[arg(allow_hyphen_values = true)]
    regex: String,

    /// A file or directory on which to perform the search and replace
    #[arg(required = true)]
    targets: Vec<PathBuf>,
}

pub fn run_interactive_sr(ctx: &mut Context<'_>, program: &str, args: &[String]) -> i32 {
    let args = match parse_args::<InteractiveSrArgs>(ctx, program, args) {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run_interactive_sr_inner(ctx, &args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(ctx, &e),
    }
}

fn run_interactive_sr_inner(ctx: &mut Context<'_>, args: &InteractiveSrArgs) -> Result<(), SeError> {
    if !SUBSTITUTION.is_match(&args.regex) {
        return Err(SeError::InvalidInput(
            "Regex must be in the form of `/FIND/REPLACE/`. Do not include flags; flags are automatically appended.".to_string(),
        ));
    }

    let config = load_config(Path::new("."))?;
    let vim = require(ctx.runner, &config.tools.vim)?;

    let status = ctx.runner.run_interactive(&vim, &vim_arguments(&args.regex, &args.targets))?;
    if status != 0 {
        return Err(SeError::RemoteCommand(format!("vim exited with status {}", status)));
    }

    Ok(())
}

fn vim_arguments(regex: &str, targets: &[PathBuf]) -> Vec<OsString> {
    let mut arguments: Vec<OsString> = vec![
        "+silent set title".into(),
        format!("+silent bufdo set eventignore-=Syntax | %s{}gce | silent update", regex).into(),
        "+silent qa".into(),
    ];
    arguments.extend(targets.iter().map(|target| target.as_os_str().to_os_string()));
    arguments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitution_shape() {
        assert!(SUBSTITUTION.is_match("/colour/color/"));
        assert!(SUBSTITUTION.is_match("/colour//"));
        assert!(SUBSTITUTION.is_match(r"/and\/or/and or/"));

        assert!(!SUBSTITUTION.is_match("colour/color"));
        assert!(!SUBSTITUTION.is_match("/colour/color/g"));
        assert!(!SUBSTITUTION.is_match("//color/"));
        assert!(!SUBSTITUTION.is_match("/colour/"));
    }

    #[test]
    fn test_vim_arguments() {
        let arguments = vim_arguments("/a/b/", &[PathBuf::from("src/epub/text")]);
        assert_eq!(arguments.len(), 4);
        assert_eq!(
            arguments[1],
            OsString::from("+silent bufdo set eventignore-=Syntax | %s/a/b/gce | silent update")
        );
        assert_eq!(arguments[3], OsString::from("src/epub/text"));
    }
}
