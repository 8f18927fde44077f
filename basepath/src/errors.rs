use std::io;

use thiserror::Error;

/// A relative path whose `..` segments would climb above the base it is joined to.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Relative path \"{relative_path}\" escapes base path")]
pub struct SandboxViolation {
    relative_path: String,
}

impl SandboxViolation {
    pub fn new(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
        }
    }

    /// The rejected relative path, exactly as the caller supplied it.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }
}

#[derive(Debug, Error)]
pub enum FsError {
    #[error(transparent)]
    Violation(#[from] SandboxViolation),
    #[error("file too large: {0} bytes exceeds limit")]
    FileTooLarge(u64),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown separator policy '{0}'")]
    UnknownSeparators(String),
    #[error("invalid max file size '{0}'")]
    InvalidMaxFileSize(String),
}

pub type Result<T> = std::result::Result<T, FsError>;
