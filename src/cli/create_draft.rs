//! `se create-draft`

use crate::cli::common::{Context, EXIT_SUCCESS, load_config, parse_args, report_error};
use crate::config::Config;
use crate::epub::{DraftInfo, create_skeleton};
use crate::error::SeError;
use crate::process::{ProcessRunner, args, require};
use clap::Parser;
use regex::Regex;
use std::ffi::OsString;
use std::path::Path;
use std::sync::LazyLock;

static GUTENBERG_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://www\.gutenberg\.org/ebooks/[0-9]+$").expect("valid regex")
});

/// Create a skeleton of a new ebook in the current directory
#[derive(Parser, Debug)]
#[command(about = "Create a skeleton of a new Standard Ebook in the current directory")]
struct CreateDraftArgs {
    /// The author of the ebook
    #[arg(short, long, required = true)]
    author: String,

    /// The title of the ebook
    #[arg(short, long, required = true)]
    title: String,

    /// The illustrator of the ebook
    #[arg(short, long)]
    illustrator: Option<String>,

    /// The translator of the ebook
    #[arg(short = 'r', long)]
    translator: Option<String>,

    /// The full URL of the Project Gutenberg ebook to use as a source
    #[arg(short = 'p', long, value_name = "URL")]
    gutenberg_ebook_url: Option<String>,

    /// Initialize a new repository on the Standard Ebooks server; Standard Ebooks admin powers required
    #[arg(short = 's', long)]
    create_se_repo: bool,

    /// Initialize a new repository at the Standard Ebooks GitHub account; Standard Ebooks admin powers required; can only be used when --create-se-repo is specified
    #[arg(short = 'g', long)]
    create_github_repo: bool,

    /// Use this email address as the main committer for the local Git repository
    #[arg(short, long)]
    email: Option<String>,
}

pub fn run_create_draft(ctx: &mut Context<'_>, program: &str, args: &[String]) -> i32 {
    let args = match parse_args::<CreateDraftArgs>(ctx, program, args) {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run_create_draft_inner(ctx, &args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(ctx, &e),
    }
}

fn run_create_draft_inner(ctx: &mut Context<'_>, args: &CreateDraftArgs) -> Result<(), SeError> {
    if args.create_github_repo && !args.create_se_repo {
        return Err(SeError::InvalidInput(
            "--create-github-repo option specified, but --create-se-repo option not specified."
                .to_string(),
        ));
    }

    if let Some(url) = &args.gutenberg_ebook_url
        && !GUTENBERG_URL.is_match(url)
    {
        return Err(SeError::InvalidInput(format!(
            "Project Gutenberg URL must look like: https://www.gutenberg.org/ebooks/<EBOOK-ID>; got {}",
            url
        )));
    }

    let wants_git = args.email.is_some() || args.create_se_repo || args.create_github_repo;
    let parent = Path::new(".");
    let config = load_config(parent)?;
    let git = wants_git
        .then(|| require(ctx.runner, &config.tools.git))
        .transpose()?;

    let draft = DraftInfo {
        author: args.author.clone(),
        title: args.title.clone(),
        translator: args.translator.clone(),
        illustrator: args.illustrator.clone(),
        source_url: args.gutenberg_ebook_url.clone(),
    };
    let root = create_skeleton(parent, &draft)?;
    writeln!(ctx.stdout, "Created {}", root.display())?;

    if let Some(git) = git {
        init_repository(ctx.runner, &git, &root, args, &config, &draft.directory_name())?;
    }

    Ok(())
}

fn init_repository(
    runner: &dyn ProcessRunner,
    git: &Path,
    root: &Path,
    options: &CreateDraftArgs,
    config: &Config,
    name: &str,
) -> Result<(), SeError> {
    let mut commands: Vec<Vec<OsString>> = vec![vec!["init".into()]];

    if let Some(email) = &options.email {
        commands.push(args(["config", "user.email", email.as_str()]));
    }
    if options.create_se_repo {
        let url = format!("{}/{}.git", config.remotes.se, name);
        commands.push(args(["remote", "add", "origin", url.as_str()]));
    }
    if options.create_github_repo {
        let url = format!("{}/{}.git", config.remotes.github, name);
        commands.push(args(["remote", "add", "github", url.as_str()]));
    }

    for command in commands {
        let mut arguments = args([OsString::from("-C"), root.as_os_str().to_os_string()]);
        arguments.extend(command);

        let output = runner.run(git, &arguments)?;
        if !output.success() {
            return Err(SeError::RemoteCommand(format!("git failed: {}", output.combined())));
        }
    }

    Ok(())
}
