//! Native extension building
//!
//! Builds the native library with its own build tool, then compiles the
//! interface wrappers and links them with the native artifact into a module
//! the interpreter can load.
//!
//! Stages:
//! - Native library (`cargo build --release`, bounded by a deadline)
//! - Extension module (SWIG wrappers + C++ compile + link)

pub mod builder;
pub mod native;
pub mod pipeline;
pub mod python;
pub mod types;

pub use builder::{ExtensionBuildStep, build_extension};
pub use native::{NativeBuildRunner, resolve_build_tool, run_native_build};
pub use pipeline::{ExtensionCompiler, SwigPipeline};
pub use python::PythonToolchain;
pub use types::{BuildCommand, BuildDirectives, BuildResult, ExtensionBuildConfig};
