//! Error types for se
//!
//! Every error a handler anticipates is an [`SeError`] variant. Each variant
//! maps to a stable process exit code through [`SeError::code`], so a handler
//! can print the message and return the code without any translation layer.

use std::path::PathBuf;

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// se.toml could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid TOML syntax or shape
    #[error("Invalid configuration syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Lint rule definition errors
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Invalid rule definition
    #[error("Invalid rule definition: {0}")]
    InvalidDefinition(String),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),
}

/// Top-level error type for se
#[derive(Debug, thiserror::Error)]
pub enum SeError {
    #[error("Couldn’t parse XHTML file: {0}")]
    InvalidXhtml(String),

    #[error("File doesn’t appear to be UTF-8: {}", .0.display())]
    InvalidEncoding(PathBuf),

    #[error("{0}")]
    MissingDependency(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("File already exists: {}", .0.display())]
    FileExists(PathBuf),

    #[error("{0}")]
    InvalidFile(String),

    #[error("Firefox is required, but it’s currently running. Stop all instances of Firefox and try again.")]
    FirefoxRunning,

    #[error("External command failed: {0}")]
    RemoteCommand(String),

    #[error("{0}")]
    LintFailed(String),

    #[error("Unsupported language: {0}")]
    InvalidLanguage(String),

    #[error("Not a Standard Ebooks source directory: {0}")]
    InvalidSeEbook(String),

    #[error("Couldn’t parse SVG file: {0}")]
    InvalidSvg(String),

    #[error("Build failed: {0}")]
    BuildFailed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SeError {
    /// Exit code associated with this error kind
    pub fn code(&self) -> i32 {
        match self {
            SeError::InvalidXhtml(_) => 1,
            SeError::InvalidEncoding(_) => 2,
            SeError::MissingDependency(_) => 3,
            SeError::InvalidInput(_) | SeError::Config(_) => 4,
            SeError::FileExists(_) => 5,
            SeError::InvalidFile(_) | SeError::Zip(_) => 6,
            SeError::FirefoxRunning => 7,
            SeError::RemoteCommand(_) => 8,
            SeError::LintFailed(_) => 9,
            SeError::InvalidLanguage(_) => 10,
            SeError::InvalidSeEbook(_) => 11,
            SeError::InvalidSvg(_) => 13,
            SeError::BuildFailed(_) => 14,
            SeError::Rule(_) | SeError::Walk(_) | SeError::Io(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct_for_anticipated_errors() {
        let errors = [
            SeError::MissingDependency("vim".to_string()),
            SeError::InvalidInput("bad".to_string()),
            SeError::FileExists(PathBuf::from("out")),
            SeError::InvalidFile("mobi".to_string()),
            SeError::FirefoxRunning,
            SeError::RemoteCommand("git".to_string()),
            SeError::LintFailed("lint".to_string()),
            SeError::InvalidLanguage("xx".to_string()),
            SeError::InvalidSeEbook("dir".to_string()),
            SeError::InvalidSvg("cover.svg".to_string()),
            SeError::BuildFailed("epubcheck".to_string()),
        ];

        let mut codes: Vec<i32> = errors.iter().map(SeError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(codes.iter().all(|&c| c > 0));
    }

    #[test]
    fn test_config_error_is_invalid_input() {
        let err: SeError = ConfigError::InvalidValue {
            field: "tools.vim".to_string(),
            message: "must not be empty".to_string(),
        }
        .into();
        assert_eq!(err.code(), 4);
        assert!(err.to_string().contains("tools.vim"));
    }

    #[test]
    fn test_io_error_is_generic_failure() {
        let err: SeError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.code(), 1);
    }

    #[test]
    fn test_file_exists_message() {
        let err = SeError::FileExists(PathBuf::from("book.epub.extracted"));
        assert_eq!(err.to_string(), "File already exists: book.epub.extracted");
    }
}
