#![forbid(unsafe_code)]

//! se: tools for producing ebooks to house style
//!
//! A single `se` binary dispatches to one handler per command. The handlers
//! share the helpers in this crate: target discovery, typography and
//! formatting transforms, the ebook source model, the lint engine, and a
//! seam for running external programs.

pub mod cli;
pub mod config;
pub mod epub;
pub mod error;
pub mod files;
pub mod formatting;
pub mod lint;
pub mod logging;
pub mod process;
pub mod types;
pub mod typography;

// Re-export error types for convenient access
pub use error::{ConfigError, RuleError, SeError};

// Re-export core domain types for convenient access
pub use types::{GlobPattern, RuleId, Severity};
