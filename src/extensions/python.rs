//! Host interpreter toolchain detection
//!
//! Asks `python3-config` (or `$PYTHON_CONFIG`) for the header include flags
//! and the filename suffix the interpreter expects for extension modules.

use crate::error::{BuildError, BuildOutcome};
use std::process::Stdio;
use tokio::process::Command;

/// What the pipeline needs to know about the host interpreter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonToolchain {
    /// Compiler flags pointing at the interpreter headers (`-I...`)
    pub include_flags: Vec<String>,

    /// Extension module suffix, e.g. `.cpython-312-x86_64-linux-gnu.so`
    pub extension_suffix: String,
}

impl PythonToolchain {
    /// Probe the toolchain with the configured helper program
    pub async fn detect() -> BuildOutcome<Self> {
        Self::detect_with(&crate::env_vars::python_config()).await
    }

    /// Probe the toolchain with `program`
    pub async fn detect_with(program: &str) -> BuildOutcome<Self> {
        let includes = query(program, "--includes").await?;
        let suffix = query(program, "--extension-suffix").await?;

        let toolchain = Self::from_outputs(&includes, &suffix)?;
        crate::debug!("interpreter toolchain: {toolchain:?}");
        Ok(toolchain)
    }

    /// Build from raw helper output
    pub fn from_outputs(includes: &str, suffix: &str) -> BuildOutcome<Self> {
        let extension_suffix = suffix.trim().to_string();
        if extension_suffix.is_empty() {
            return Err(BuildError::compile_failed(
                "interpreter reported an empty extension suffix",
            ));
        }

        let mut include_flags: Vec<String> = Vec::new();
        for flag in includes.split_whitespace() {
            if !include_flags.iter().any(|seen| seen == flag) {
                include_flags.push(flag.to_string());
            }
        }

        Ok(Self {
            include_flags,
            extension_suffix,
        })
    }
}

async fn query(program: &str, flag: &str) -> BuildOutcome<String> {
    let output = Command::new(program)
        .arg(flag)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| BuildError::spawn(program, e))?;

    if !output.status.success() {
        return Err(BuildError::compile_failed(format!(
            "{program} {flag} exited with {}",
            output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string())
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
