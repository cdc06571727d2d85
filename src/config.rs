//! Build configuration
//!
//! Everything the build needs to know about the native library and the
//! extension module, loaded from `extbuild.toml` when present. All paths are
//! relative to the directory the build runs in.

use crate::env_vars;
use crate::error::{BuildError, BuildOutcome};
use crate::platform::PlatformFamily;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "extbuild.toml";

/// Default native build deadline in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Build configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Directory of the native library project (holds `Cargo.toml`)
    pub library_dir: PathBuf,

    /// File name of the compiled library without suffix
    pub library_base_name: String,

    /// Explicit build tool; resolved from the environment when unset
    pub build_tool: Option<PathBuf>,

    /// Native build deadline
    pub timeout_secs: u64,

    /// Name of the loadable extension module
    pub module_name: String,

    /// Interface-description sources handed to SWIG
    pub interface_sources: Vec<PathBuf>,

    /// SWIG options besides the target language
    pub compiler_options: Vec<String>,

    /// Static package metadata
    pub metadata: PackageMetadata,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            library_dir: PathBuf::from("../../librgb"),
            library_base_name: "librgb".to_string(),
            build_tool: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            module_name: "_rgb".to_string(),
            interface_sources: vec![PathBuf::from("swig.i")],
            compiler_options: vec!["-c++".to_string(), "-py3".to_string()],
            metadata: PackageMetadata::default(),
        }
    }
}

/// Declarative package fields, carried through unchanged
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
    pub py_modules: Vec<String>,
}

impl Default for PackageMetadata {
    fn default() -> Self {
        Self {
            name: "rgb".to_string(),
            version: "0.2.0".to_string(),
            author: "LNP/BP Standards Association".to_string(),
            description: "RGB Python bindings".to_string(),
            py_modules: vec!["rgb".to_string()],
        }
    }
}

impl BuildConfig {
    /// Load configuration.
    /// Priority: `custom_path` -> ./extbuild.toml -> defaults, then environment
    /// overrides on top.
    ///
    /// A config file that exists but cannot be parsed is an error; it is never
    /// silently replaced by defaults.
    pub fn load_with_options(custom_path: Option<&Path>) -> BuildOutcome<Self> {
        let config = match custom_path {
            Some(path) => Self::load_from(path)?,
            None => {
                let local = Path::new(CONFIG_FILE_NAME);
                if local.is_file() {
                    Self::load_from(local)?
                } else {
                    crate::debug!("no {CONFIG_FILE_NAME} found, using defaults");
                    Self::default()
                }
            }
        };

        Ok(config.with_env_overrides())
    }

    fn load_from(path: &Path) -> BuildOutcome<Self> {
        let contents = fs::read_to_string(path).map_err(|e| BuildError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::parse(&contents).map_err(|message| BuildError::Config {
            path: path.to_path_buf(),
            message,
        })?;
        crate::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse TOML text into a config, filling unspecified fields with defaults
    pub fn parse(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| e.message().to_string())
    }

    /// Apply `EXTBUILD_*` overrides
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(secs) = env_vars::build_timeout() {
            self.timeout_secs = secs;
        }
        if let Some(dir) = env_vars::library_dir() {
            self.library_dir = PathBuf::from(dir);
        }
        self
    }

    /// Path of the native library's manifest
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.library_dir.join("Cargo.toml")
    }

    /// Path of the compiled native artifact for `platform`
    #[must_use]
    pub fn artifact_path(&self, platform: PlatformFamily) -> PathBuf {
        let file_name = format!("{}{}", self.library_base_name, platform.artifact_suffix());
        self.library_dir
            .join("target")
            .join("release")
            .join(file_name)
    }

    /// Native build deadline
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
