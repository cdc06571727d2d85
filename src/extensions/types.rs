//! Build records and configuration values
//!
//! Everything here is constructed once and then only read: a command line for
//! the native build, the record of how that build ended, and the
//! configuration handed to the extension-compilation pipeline.

use crate::config::BuildConfig;
use crate::error::{BuildError, BuildOutcome};
use crate::platform::PlatformFamily;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Command line of the external native build tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl BuildCommand {
    /// `<tool> build --release --manifest-path <manifest>`
    #[must_use]
    pub fn cargo_release(tool: impl Into<PathBuf>, manifest_path: &Path) -> Self {
        Self {
            program: tool.into(),
            args: vec![
                OsString::from("build"),
                OsString::from("--release"),
                OsString::from("--manifest-path"),
                manifest_path.as_os_str().to_os_string(),
            ],
        }
    }

    /// Program to launch
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments after the program name
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Program as it appears in diagnostics
    #[must_use]
    pub fn display_program(&self) -> String {
        self.program.display().to_string()
    }

    pub(crate) fn program_os(&self) -> &OsStr {
        self.program.as_os_str()
    }
}

/// How a native build invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildResult {
    /// Exit code; `128 + signal` for children killed by a signal
    pub exit_code: i32,

    /// Whether the deadline passed and the child was killed
    pub timed_out: bool,
}

impl BuildResult {
    /// Record of a child that exited on its own
    #[must_use]
    pub const fn completed(exit_code: i32) -> Self {
        Self {
            exit_code,
            timed_out: false,
        }
    }

    /// Record of a child killed at the deadline
    #[must_use]
    pub const fn timed_out(exit_code: i32) -> Self {
        Self {
            exit_code,
            timed_out: true,
        }
    }

    /// Whether the extension build may proceed
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !self.timed_out && self.exit_code == 0
    }

    /// Map the record to the build's error taxonomy.
    ///
    /// A timeout wins over whatever code the killed child reported.
    pub fn into_result(self, timeout: Duration) -> BuildOutcome {
        if self.timed_out {
            return Err(BuildError::Timeout {
                timeout_secs: timeout.as_secs(),
            });
        }
        if self.exit_code != 0 {
            return Err(BuildError::NonZeroExit(self.exit_code));
        }
        Ok(())
    }
}

/// Configuration handed to the extension-compilation pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionBuildConfig {
    /// Loadable module name (e.g. `_rgb`)
    pub module_name: String,

    /// Interface-description sources, in order
    pub interface_sources: Vec<PathBuf>,

    /// Interface compiler options, in order
    pub compiler_options: Vec<String>,

    /// Extra objects linked into the module, in order
    pub extra_objects: Vec<PathBuf>,
}

impl ExtensionBuildConfig {
    /// Configuration for linking the native artifact built for `platform`.
    ///
    /// Only meaningful once the native build has succeeded: the artifact path
    /// is taken on trust and never checked here.
    #[must_use]
    pub fn from_config(config: &BuildConfig, platform: PlatformFamily) -> Self {
        Self {
            module_name: config.module_name.clone(),
            interface_sources: config.interface_sources.clone(),
            compiler_options: config.compiler_options.clone(),
            extra_objects: vec![config.artifact_path(platform)],
        }
    }

    /// Whether the interface compiler should emit C++ wrappers
    #[must_use]
    pub fn is_cplusplus(&self) -> bool {
        self.compiler_options.iter().any(|opt| opt == "-c++")
    }
}

/// Where and how the pipeline writes its outputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDirectives {
    /// Recompile even when outputs look up to date
    pub force: bool,

    /// Place the module next to the interface sources
    pub inplace: bool,

    /// Output directory when not building in place
    pub build_lib: PathBuf,

    /// Directory for generated wrappers and object files
    pub build_temp: PathBuf,
}

impl Default for BuildDirectives {
    fn default() -> Self {
        Self {
            force: false,
            inplace: true,
            build_lib: PathBuf::from("build").join("lib"),
            build_temp: PathBuf::from("build").join("temp"),
        }
    }
}

impl BuildDirectives {
    /// Directory receiving the built module and generated interpreter modules
    /// for a given interface source
    #[must_use]
    pub fn output_dir(&self, source: &Path) -> PathBuf {
        if self.inplace {
            source
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        } else {
            self.build_lib.clone()
        }
    }
}
