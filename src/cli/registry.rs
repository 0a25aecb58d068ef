//! The static table of commands
//!
//! Each entry names a command as typed on the command line (hyphenated) and
//! the handler that implements it. Adding a command means adding a module
//! under `cli/` and one line here.

use super::common::Context;
use super::{
    british2american, build, build_images, clean, compare_versions, create_draft, dec2roman,
    extract_ebook, find_mismatched_diacritics, hyphenate, interactive_sr, lint, make_url_safe,
    roman2dec, titlecase,
};

/// Handler entry point: context, program name, residual arguments
pub type Handler = fn(&mut Context<'_>, &str, &[String]) -> i32;

/// One registered command
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub about: &'static str,
    pub handler: Handler,
}

/// Every command, sorted by name
pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "british2american",
        about: "Try to convert British quote style to American quote style",
        handler: british2american::run_british2american,
    },
    CommandSpec {
        name: "build",
        about: "Build an ebook from a source directory",
        handler: build::run_build,
    },
    CommandSpec {
        name: "build-images",
        about: "Build the cover and titlepage images for distribution",
        handler: build_images::run_build_images,
    },
    CommandSpec {
        name: "clean",
        about: "Prettify XHTML, SVG, OPF, and NCX files into canonical form",
        handler: clean::run_clean,
    },
    CommandSpec {
        name: "compare-versions",
        about: "Render and compare XHTML files before and after uncommitted changes",
        handler: compare_versions::run_compare_versions,
    },
    CommandSpec {
        name: "create-draft",
        about: "Create a skeleton of a new ebook in the current directory",
        handler: create_draft::run_create_draft,
    },
    CommandSpec {
        name: "dec2roman",
        about: "Convert a decimal number to a Roman numeral",
        handler: dec2roman::run_dec2roman,
    },
    CommandSpec {
        name: "extract-ebook",
        about: "Extract an EPUB into a directory",
        handler: extract_ebook::run_extract_ebook,
    },
    CommandSpec {
        name: "find-mismatched-diacritics",
        about: "Find words with diacritics that also appear without them",
        handler: find_mismatched_diacritics::run_find_mismatched_diacritics,
    },
    CommandSpec {
        name: "hyphenate",
        about: "Insert soft hyphens at syllable breaks in XHTML files",
        handler: hyphenate::run_hyphenate,
    },
    CommandSpec {
        name: "interactive-sr",
        about: "Interactively search and replace in files with Vim",
        handler: interactive_sr::run_interactive_sr,
    },
    CommandSpec {
        name: "lint",
        about: "Check for errors and style problems in an ebook",
        handler: lint::run_lint,
    },
    CommandSpec {
        name: "make-url-safe",
        about: "Make a string URL-safe",
        handler: make_url_safe::run_make_url_safe,
    },
    CommandSpec {
        name: "roman2dec",
        about: "Convert a Roman numeral to a decimal number",
        handler: roman2dec::run_roman2dec,
    },
    CommandSpec {
        name: "titlecase",
        about: "Convert a string to titlecase",
        handler: titlecase::run_titlecase,
    },
];

/// Look up a command by its hyphenated name
pub fn find(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

/// All command names, sorted
pub fn names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|spec| spec.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_and_unique() {
        let names: Vec<&str> = names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_names_are_hyphenated() {
        assert!(names().all(|name| !name.contains('_')));
        assert!(find("build-images").is_some());
        assert!(find("build_images").is_none());
        assert!(find("nonexistent").is_none());
    }
}
