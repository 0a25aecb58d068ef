//! Command dispatch and the command handlers
//!
//! One module per command. Each exposes `run_<command>(ctx, program, args)`
//! returning the process exit code.

pub mod common;
pub mod dispatch;
pub mod registry;

pub mod british2american;
pub mod build;
pub mod build_images;
pub mod clean;
pub mod compare_versions;
pub mod create_draft;
pub mod dec2roman;
pub mod extract_ebook;
pub mod find_mismatched_diacritics;
pub mod hyphenate;
pub mod interactive_sr;
pub mod lint;
pub mod make_url_safe;
pub mod roman2dec;
pub mod titlecase;

pub use common::Context;
pub use dispatch::{dispatch, dispatch_with};
pub use registry::{COMMANDS, CommandSpec, Handler};
