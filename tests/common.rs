//! Test utilities for se integration tests

#![allow(dead_code)]

use se::cli::{Context, dispatch};
use se::process::{ProcessOutput, ProcessRunner};
use std::cell::RefCell;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use termcolor::NoColor;

/// Result type alias for tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Extract Ok value or panic with context
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("assertion failed: expected Ok, got Err({:?})", e),
        }
    };
}

/// One external invocation seen by [`FakeRunner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// File name of the program
    pub program: String,
    pub args: Vec<String>,
    pub interactive: bool,
}

struct Response {
    program: String,
    /// Only answer when one of the arguments equals this
    when_arg: Option<String>,
    output: ProcessOutput,
}

/// [`ProcessRunner`] that records calls and answers from a script
///
/// Programs not marked installed are absent from the search path. Programs
/// without a scripted response succeed with empty output.
#[derive(Default)]
pub struct FakeRunner {
    installed: HashSet<String>,
    running: HashSet<String>,
    responses: Vec<Response>,
    calls: RefCell<Vec<Call>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn installed(mut self, names: &[&str]) -> Self {
        self.installed.extend(names.iter().map(|name| name.to_string()));
        self
    }

    pub fn running(mut self, name: &str) -> Self {
        self.running.insert(name.to_string());
        self
    }

    /// Answer every call to `program`
    pub fn respond(self, program: &str, status: i32, stdout: &str, stderr: &str) -> Self {
        self.respond_when(program, None, status, stdout, stderr)
    }

    /// Answer calls to `program` that carry `arg`; earlier scripts win
    pub fn respond_when(
        mut self,
        program: &str,
        arg: Option<&str>,
        status: i32,
        stdout: &str,
        stderr: &str,
    ) -> Self {
        self.responses.push(Response {
            program: program.to_string(),
            when_arg: arg.map(str::to_string),
            output: ProcessOutput {
                status,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, program: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| call.program == program)
            .collect()
    }

    fn record(&self, program: &Path, args: &[OsString], interactive: bool) -> Call {
        let call = Call {
            program: program
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            args: args
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect(),
            interactive,
        };
        self.calls.borrow_mut().push(call.clone());
        call
    }

    fn answer(&self, call: &Call) -> ProcessOutput {
        self.responses
            .iter()
            .find(|response| {
                response.program == call.program
                    && response
                        .when_arg
                        .as_ref()
                        .is_none_or(|wanted| call.args.iter().any(|arg| arg == wanted))
            })
            .map(|response| response.output.clone())
            .unwrap_or_default()
    }
}

impl ProcessRunner for FakeRunner {
    fn which(&self, name: &str) -> Option<PathBuf> {
        self.installed
            .contains(name)
            .then(|| PathBuf::from("/usr/bin").join(name))
    }

    fn run(&self, program: &Path, args: &[OsString]) -> std::io::Result<ProcessOutput> {
        let call = self.record(program, args, false);
        Ok(self.answer(&call))
    }

    fn run_interactive(&self, program: &Path, args: &[OsString]) -> std::io::Result<i32> {
        let call = self.record(program, args, true);
        Ok(self.answer(&call).status)
    }

    fn is_running(&self, name: &str) -> bool {
        self.running.contains(name)
    }
}

/// Exit code and captured streams of one invocation
#[derive(Debug)]
pub struct Outcome {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Run `se <args...>` in-process
pub fn run_se(args: &[&str], runner: &dyn ProcessRunner) -> Outcome {
    run_se_inner(args, runner, None)
}

/// Run `se <args...>` in-process with `input` piped to stdin
pub fn run_se_with_stdin(args: &[&str], input: &str, runner: &dyn ProcessRunner) -> Outcome {
    let mut input = input.as_bytes();
    run_se_inner(args, runner, Some(&mut input))
}

fn run_se_inner(
    args: &[&str],
    runner: &dyn ProcessRunner,
    stdin: Option<&mut dyn BufRead>,
) -> Outcome {
    let argv: Vec<String> = std::iter::once("se")
        .chain(args.iter().copied())
        .map(str::to_string)
        .collect();
    let mut stdout = NoColor::new(Vec::new());
    let mut stderr = NoColor::new(Vec::new());

    let code = {
        let mut ctx = Context {
            runner,
            stdout: &mut stdout,
            stderr: &mut stderr,
            stdin: stdin.map(|input| input as &mut dyn BufRead),
        };
        dispatch(&mut ctx, &argv)
    };

    Outcome {
        code,
        stdout: String::from_utf8_lossy(&stdout.into_inner()).into_owned(),
        stderr: String::from_utf8_lossy(&stderr.into_inner()).into_owned(),
    }
}

pub const CONTENT_OPF: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid">
	<metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
		<dc:identifier id="uid">url:https://standardebooks.org/ebooks/jane-austen/persuasion</dc:identifier>
		<dc:title id="title">Persuasion</dc:title>
		<dc:language>en-GB</dc:language>
		<dc:creator id="author">Jane Austen</dc:creator>
	</metadata>
	<manifest>
		<item href="css/core.css" id="core.css" media-type="text/css"/>
		<item href="images/cover.svg" id="cover.svg" media-type="image/svg+xml"/>
		<item href="images/titlepage.svg" id="titlepage.svg" media-type="image/svg+xml"/>
		<item href="text/chapter-1.xhtml" id="chapter-1.xhtml" media-type="application/xhtml+xml"/>
		<item href="toc.xhtml" id="toc.xhtml" media-type="application/xhtml+xml" properties="nav"/>
	</manifest>
	<spine>
		<itemref idref="chapter-1.xhtml"/>
	</spine>
</package>
"#;

pub const CHAPTER: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="en-GB">
	<head>
		<title>I</title>
		<link href="../css/core.css" rel="stylesheet" type="text/css"/>
	</head>
	<body>
		<section id="chapter-1">
			<p>‘I have been used to consider myself as very fortunate,’ said Anne.</p>
		</section>
	</body>
</html>
"#;

pub const COVER_SVG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" version="1.1" viewBox="0 0 1400 2100">
	<image height="2100" width="1400" x="0" y="0" xlink:href="cover.jpg"/>
</svg>
"#;

pub const TITLEPAGE_SVG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<svg xmlns="http://www.w3.org/2000/svg" version="1.1" viewBox="0 0 1400 800">
	<title>Persuasion</title>
</svg>
"#;

/// Write a minimal, lint-clean ebook source directory at `root`
///
/// The distributable images are left out; call [`add_source_images`] and
/// `se build-images` to produce them.
pub fn create_ebook(root: &Path) -> PathBuf {
    let files: &[(&str, &str)] = &[
        ("src/mimetype", "application/epub+zip"),
        (
            "src/META-INF/container.xml",
            r#"<?xml version="1.0" encoding="utf-8"?>
<container xmlns="urn:oasis:names:tc:opendocument:xmlns:container" version="1.0">
	<rootfiles>
		<rootfile full-path="epub/content.opf" media-type="application/oebps-package+xml"/>
	</rootfiles>
</container>
"#,
        ),
        ("src/epub/content.opf", CONTENT_OPF),
        ("src/epub/css/core.css", "p{\n\tmargin: 0;\n}\n"),
        ("src/epub/text/chapter-1.xhtml", CHAPTER),
        (
            "src/epub/toc.xhtml",
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<html xmlns=\"http://www.w3.org/1999/xhtml\">\n\t<head>\n\t\t<title>Table of Contents</title>\n\t</head>\n\t<body/>\n</html>\n",
        ),
    ];

    for (relative, content) in files {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    root.to_path_buf()
}

/// Add cover and titlepage artwork under `images/`
pub fn add_source_images(root: &Path) {
    let images = root.join("images");
    fs::create_dir_all(&images).unwrap();
    fs::write(images.join("cover.svg"), COVER_SVG).unwrap();
    fs::write(images.join("cover.jpg"), [0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10]).unwrap();
    fs::write(images.join("titlepage.svg"), TITLEPAGE_SVG).unwrap();
}

/// Run a closure with the current directory set to a fresh temporary one
///
/// Callers must be `#[serial]`.
pub fn in_temp_dir<F>(f: F)
where
    F: FnOnce(&Path),
{
    let temp_dir = tempfile::TempDir::new().unwrap();
    let original_dir = std::env::current_dir().unwrap();
    std::env::set_current_dir(temp_dir.path()).unwrap();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f(temp_dir.path())));

    std::env::set_current_dir(&original_dir).unwrap();
    if let Err(err) = result {
        std::panic::resume_unwind(err);
    }
}
