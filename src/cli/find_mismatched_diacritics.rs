//! `se find-mismatched-diacritics`

use crate::cli::common::{Context, EXIT_SUCCESS, parse_args, report_error};
use crate::error::SeError;
use crate::files::{get_target_filenames, read_text};
use crate::formatting::remove_diacritics;
use clap::Parser;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::LazyLock;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\p{L}\p{M}]+").expect("valid regex"));

/// Find words with diacritics that also appear without them
#[derive(Parser, Debug)]
#[command(
    about = "Find words with mismatched diacritics in a set of XHTML files. For example, `cafe` in one file and `café` in another."
)]
struct FindMismatchedDiacriticsArgs {
    /// XHTML files, or directories containing XHTML files
    #[arg(required = true)]
    targets: Vec<PathBuf>,
}

pub fn run_find_mismatched_diacritics(ctx: &mut Context<'_>, program: &str, args: &[String]) -> i32 {
    let args = match parse_args::<FindMismatchedDiacriticsArgs>(ctx, program, args) {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run_find_mismatched_diacritics_inner(ctx, &args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(ctx, &e),
    }
}

fn run_find_mismatched_diacritics_inner(
    ctx: &mut Context<'_>,
    args: &FindMismatchedDiacriticsArgs,
) -> Result<(), SeError> {
    let mut texts = Vec::new();
    for path in get_target_filenames(&args.targets, &["xhtml"])? {
        let xhtml = read_text(&path)?;
        texts.push(TAG.replace_all(&xhtml, " ").into_owned());
    }

    for (accented, plain) in find_mismatches(&texts) {
        writeln!(ctx.stdout, "{}, {}", accented, plain)?;
    }

    Ok(())
}

/// Pairs of (accented, plain) lowercased spellings that both occur in `texts`
fn find_mismatches<S: AsRef<str>>(texts: &[S]) -> Vec<(String, String)> {
    let mut words = HashSet::new();
    let mut accented: BTreeMap<String, String> = BTreeMap::new();

    for text in texts {
        for word in WORD.find_iter(text.as_ref()) {
            let word = word.as_str().to_lowercase();
            let plain = remove_diacritics(&word);
            if plain != word && word.chars().count() > 2 {
                accented.insert(word.clone(), plain);
            }
            words.insert(word);
        }
    }

    let pairs: BTreeSet<(String, String)> = accented
        .into_iter()
        .filter(|(_, plain)| words.contains(plain))
        .collect();
    pairs.into_iter().collect()
}
