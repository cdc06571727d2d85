//! Build orchestration for the RGB Python bindings
//!
//! Builds the native library, then links it into the extension module the
//! interpreter loads.

pub mod config;
pub mod debug;
pub mod env_vars;
pub mod error;
pub mod extensions;
pub mod platform;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export common types for convenience
pub use config::{BuildConfig, PackageMetadata};
pub use debug::{debug_log, init_debug, is_debug_enabled, is_verbose};
pub use error::{BuildError, BuildOutcome};
pub use extensions::{
    BuildCommand, BuildDirectives, BuildResult, ExtensionBuildConfig, ExtensionBuildStep,
    ExtensionCompiler, NativeBuildRunner, PythonToolchain, SwigPipeline, build_extension,
    run_native_build,
};
pub use platform::PlatformFamily;
