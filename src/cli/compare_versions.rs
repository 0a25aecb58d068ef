//! `se compare-versions`
//!
//! Renders every XHTML file twice, once with uncommitted changes stashed and
//! once with them applied, and reports the files whose renderings differ.

use crate::cli::common::{
    Context, EXIT_SUCCESS, load_config, parse_args, print_warning, report_error,
};
use crate::config::ToolsConfig;
use crate::error::SeError;
use crate::files::{IGNORED_FILENAMES, get_target_filenames};
use crate::process::{ProcessOutput, ProcessRunner, args, require};
use clap::Parser;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const WINDOW_SIZE: &str = "--window-size=1024,4096";

/// Render and compare XHTML files before and after uncommitted changes
#[derive(Parser, Debug)]
#[command(
    about = "Use Firefox to render and compare XHTML files in an ebook repository. Run on a dirty repository to visually compare the repository’s dirty state with its clean state."
)]
struct CompareVersionsArgs {
    /// Increase output verbosity
    #[arg(short, long)]
    verbose: bool,

    /// Don’t create images of diffs
    #[arg(short, long)]
    no_images: bool,

    /// Include commonly-excluded files like imprint, titlepage, and colophon
    #[arg(short, long)]
    include_common: bool,

    /// A directory containing XHTML files
    #[arg(required = true)]
    targets: Vec<PathBuf>,
}

/// Resolved external tools
struct Tools {
    firefox: PathBuf,
    compare: PathBuf,
    git: PathBuf,
}

impl Tools {
    fn locate(runner: &dyn ProcessRunner, config: &ToolsConfig) -> Result<Self, SeError> {
        Ok(Self {
            firefox: require(runner, &config.firefox)?,
            compare: require(runner, &config.compare)?,
            git: require(runner, &config.git)?,
        })
    }
}

pub fn run_compare_versions(ctx: &mut Context<'_>, program: &str, args: &[String]) -> i32 {
    let args = match parse_args::<CompareVersionsArgs>(ctx, program, args) {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run_compare_versions_inner(ctx, &args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(ctx, &e),
    }
}

fn run_compare_versions_inner(
    ctx: &mut Context<'_>,
    args: &CompareVersionsArgs,
) -> Result<(), SeError> {
    let config = load_config(Path::new("."))?;
    let tools = Tools::locate(ctx.runner, &config.tools)?;

    let firefox_name = tools
        .firefox
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(config.tools.firefox.as_str())
        .to_string();
    if ctx.runner.is_running(&firefox_name) {
        return Err(SeError::FirefoxRunning);
    }

    for target in &args.targets {
        if !target.is_dir() {
            print_warning(ctx, &format!("Target must be a directory: {}", target.display()));
            continue;
        }

        if args.verbose {
            writeln!(ctx.stdout, "Processing {} ...", target.display())?;
        }

        let status = git(ctx.runner, &tools, target, &["status", "--porcelain"])?;
        if status.stdout.trim().is_empty() {
            writeln!(
                ctx.stdout,
                "No uncommitted changes in {}; skipping.",
                target.display()
            )?;
            continue;
        }

        compare_target(ctx, &tools, args, target)?;
    }

    Ok(())
}

fn compare_target(
    ctx: &mut Context<'_>,
    tools: &Tools,
    args: &CompareVersionsArgs,
    target: &Path,
) -> Result<(), SeError> {
    let files: Vec<PathBuf> = get_target_filenames(&[target], &["xhtml"])?
        .into_iter()
        .filter(|path| {
            args.include_common
                || !path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| IGNORED_FILENAMES.contains(&name))
        })
        .collect();

    let work_dir = tempfile::TempDir::new()?;
    let shot = |index: usize, state: &str| work_dir.path().join(format!("{}-{}.png", index, state));

    // Stash, render the committed state, then always restore the changes
    git(ctx.runner, tools, target, &["stash"])?;
    let rendered = render_all(ctx.runner, tools, &files, |index| shot(index, "original"));
    git(ctx.runner, tools, target, &["stash", "pop"])?;
    rendered?;

    render_all(ctx.runner, tools, &files, |index| shot(index, "new"))?;

    let mut differing = Vec::new();
    for (index, file) in files.iter().enumerate() {
        let original = shot(index, "original");
        let new = shot(index, "new");
        let diff = shot(index, "diff");

        let output = ctx.runner.run(
            &tools.compare,
            &args_of(["-metric", "ae"], [&original, &new, &diff]),
        )?;
        if images_differ(&output)? {
            differing.push((index, file));
        }
    }

    if differing.is_empty() {
        if args.verbose {
            writeln!(ctx.stdout, "\tNo differences found.")?;
        }
        return Ok(());
    }

    let output_dir = diff_output_dir(target);
    for &(index, file) in &differing {
        writeln!(ctx.stdout, "Difference in {}", file.display())?;

        if args.no_images {
            continue;
        }

        fs::create_dir_all(&output_dir)?;
        let stem = file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| index.to_string());
        for state in ["original", "new", "diff"] {
            fs::copy(
                shot(index, state),
                output_dir.join(format!("{}-{}.png", stem, state)),
            )?;
        }
    }

    if !args.no_images {
        writeln!(ctx.stdout, "Diff images saved in {}", output_dir.display())?;
    }

    Ok(())
}

fn git(
    runner: &dyn ProcessRunner,
    tools: &Tools,
    directory: &Path,
    subcommand: &[&str],
) -> Result<ProcessOutput, SeError> {
    let mut arguments = args([OsString::from("-C"), directory.as_os_str().to_os_string()]);
    arguments.extend(subcommand.iter().map(OsString::from));

    let output = runner.run(&tools.git, &arguments)?;
    if !output.success() {
        return Err(SeError::RemoteCommand(format!(
            "git {} failed: {}",
            subcommand.join(" "),
            output.combined()
        )));
    }
    Ok(output)
}

fn render_all(
    runner: &dyn ProcessRunner,
    tools: &Tools,
    files: &[PathBuf],
    screenshot: impl Fn(usize) -> PathBuf,
) -> Result<(), SeError> {
    for (index, file) in files.iter().enumerate() {
        let url = format!("file://{}", fs::canonicalize(file)?.display());
        let png = screenshot(index);
        debug!(file = %file.display(), png = %png.display(), "rendering");

        let output = runner.run(
            &tools.firefox,
            &args([
                OsString::from("--screenshot"),
                png.into_os_string(),
                OsString::from(url),
                OsString::from(WINDOW_SIZE),
            ]),
        )?;
        if !output.success() {
            return Err(SeError::RemoteCommand(format!(
                "Firefox couldn’t render {}: {}",
                file.display(),
                output.combined()
            )));
        }
    }
    Ok(())
}

fn args_of<const F: usize, const P: usize>(flags: [&str; F], paths: [&PathBuf; P]) -> Vec<OsString> {
    let mut arguments = args(flags);
    arguments.extend(paths.iter().map(|path| path.as_os_str().to_os_string()));
    arguments
}

/// `compare -metric ae` prints the count of differing pixels on stderr and
/// exits 0 when identical, 1 when different, 2 on error
fn images_differ(output: &ProcessOutput) -> Result<bool, SeError> {
    match output.status {
        0 => Ok(false),
        1 => Ok(true),
        _ => {
            let metric = output.stderr.trim();
            match metric.parse::<f64>() {
                Ok(count) => Ok(count > 0.0),
                Err(_) => Err(SeError::RemoteCommand(format!("compare failed: {}", metric))),
            }
        }
    }
}

/// `./<target name>_diff-output`
fn diff_output_dir(target: &Path) -> PathBuf {
    let name = fs::canonicalize(target)
        .ok()
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "ebook".to_string());
    PathBuf::from(format!("{}_diff-output", name))
}
