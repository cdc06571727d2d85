//! Build error taxonomy
//!
//! Every variant is fatal for the overall build. Nothing here is retried or
//! downgraded to a warning; the CLI prints the message and exits with status 1.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for build operations.
pub type BuildOutcome<T = ()> = Result<T, BuildError>;

/// Errors raised while building the native library or the extension module
#[derive(Debug, Error)]
pub enum BuildError {
    /// The native build exceeded its deadline and was killed
    #[error("Build of native library timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The user interrupted the native build; the tool was killed
    #[error("Build of native library was interrupted")]
    Interrupted,

    /// The native build tool reported failure
    #[error("Build of native library failed with exit code {0}")]
    NonZeroExit(i32),

    /// The extension-compilation pipeline failed
    #[error("Extension compilation failed: {0}")]
    ExtensionCompileFailed(String),

    /// An external program could not be launched
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file exists but could not be read or parsed
    #[error("Invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// IO error while supervising a process or preparing directories
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    /// Creates a launch failure for `program`.
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Creates a pipeline failure.
    pub fn compile_failed(message: impl Into<String>) -> Self {
        Self::ExtensionCompileFailed(message.into())
    }
}
