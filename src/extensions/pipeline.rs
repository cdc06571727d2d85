//! Extension compilation pipeline
//!
//! Turns interface-description sources plus prebuilt objects into a module
//! the interpreter can load. It's the equivalent of:
//! ```bash
//! swig -python -c++ -py3 -o build/temp/swig_wrap.cpp -outdir . swig.i
//! c++ -fPIC $(python3-config --includes) -c build/temp/swig_wrap.cpp -o build/temp/swig_wrap.o
//! c++ -shared build/temp/swig_wrap.o ../../librgb/target/release/librgb.a -o _rgb$(python3-config --extension-suffix)
//! ```

use super::python::PythonToolchain;
use super::types::{BuildDirectives, ExtensionBuildConfig};
use crate::env_vars;
use crate::error::{BuildError, BuildOutcome};
use crate::platform::PlatformFamily;
use std::ffi::{OsStr, OsString};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Seam to the toolchain that compiles and links the extension module
pub trait ExtensionCompiler {
    /// Compile `config` into a loadable module according to `directives`
    fn compile(
        &self,
        config: &ExtensionBuildConfig,
        directives: &BuildDirectives,
    ) -> impl Future<Output = BuildOutcome>;
}

/// Default pipeline: SWIG for the wrappers, the system C++ compiler for the rest
#[derive(Debug, Clone)]
pub struct SwigPipeline {
    platform: PlatformFamily,
    swig: String,
    cxx: String,
    cxxflags: Vec<OsString>,
    ldflags: Vec<OsString>,
    toolchain: Option<PythonToolchain>,
}

impl SwigPipeline {
    /// Pipeline for `platform` using tools and flags from the environment
    #[must_use]
    pub fn new(platform: PlatformFamily) -> Self {
        Self {
            platform,
            swig: env_vars::swig(),
            cxx: env_vars::cxx(),
            cxxflags: env_vars::cxxflags(),
            ldflags: env_vars::ldflags(),
            toolchain: None,
        }
    }

    /// Use the given programs instead of `$SWIG`/`$CXX`
    #[must_use]
    pub fn with_tools(mut self, swig: impl Into<String>, cxx: impl Into<String>) -> Self {
        self.swig = swig.into();
        self.cxx = cxx.into();
        self
    }

    /// Use a known interpreter toolchain instead of probing for one
    #[must_use]
    pub fn with_toolchain(mut self, toolchain: PythonToolchain) -> Self {
        self.toolchain = Some(toolchain);
        self
    }

    async fn toolchain(&self) -> BuildOutcome<PythonToolchain> {
        match &self.toolchain {
            Some(toolchain) => Ok(toolchain.clone()),
            None => PythonToolchain::detect().await,
        }
    }

    fn compile_args(
        &self,
        toolchain: &PythonToolchain,
        wrapper: &Path,
        object: &Path,
    ) -> Vec<OsString> {
        let mut args = self.cxxflags.clone();
        args.push("-fPIC".into());
        args.extend(toolchain.include_flags.iter().map(OsString::from));
        args.push("-c".into());
        args.push(wrapper.into());
        args.push("-o".into());
        args.push(object.into());
        args
    }

    fn link_args(&self, objects: &[PathBuf], extra_objects: &[PathBuf], target: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-shared".into()];
        args.extend(objects.iter().map(OsString::from));
        args.extend(extra_objects.iter().map(OsString::from));
        args.push("-o".into());
        args.push(target.into());
        if self.platform.needs_dynamic_lookup() {
            args.push("-undefined".into());
            args.push("dynamic_lookup".into());
        }
        args.extend(self.ldflags.iter().cloned());
        args
    }
}

impl ExtensionCompiler for SwigPipeline {
    async fn compile(
        &self,
        config: &ExtensionBuildConfig,
        directives: &BuildDirectives,
    ) -> BuildOutcome {
        let Some(first_source) = config.interface_sources.first() else {
            return Err(BuildError::compile_failed(format!(
                "module {} has no interface sources",
                config.module_name
            )));
        };

        let cplusplus = config.is_cplusplus();
        let wrappers =
            wrapper_paths(&directives.build_temp, &config.interface_sources, cplusplus)?;

        let toolchain = self.toolchain().await?;
        let dest_dir = directives.output_dir(first_source);
        let target = dest_dir.join(format!(
            "{}{}",
            config.module_name, toolchain.extension_suffix
        ));

        let inputs: Vec<&Path> = config
            .interface_sources
            .iter()
            .chain(&config.extra_objects)
            .map(PathBuf::as_path)
            .collect();
        if !directives.force && is_up_to_date(&target, &inputs) {
            crate::verbose!("skipping {} (up to date)", target.display());
            return Ok(());
        }

        crate::verbose!("building {} extension", config.module_name);
        tokio::fs::create_dir_all(&directives.build_temp).await?;
        tokio::fs::create_dir_all(&dest_dir).await?;

        let mut objects = Vec::with_capacity(wrappers.len());
        for (source, wrapper) in config.interface_sources.iter().zip(wrappers) {
            let source_dest = directives.output_dir(source);
            if source_dest != dest_dir {
                tokio::fs::create_dir_all(&source_dest).await?;
            }

            let args = swig_args(config, source, &wrapper, &source_dest);
            run_tool(&self.swig, &args, "interface generation").await?;

            let object = wrapper.with_extension("o");
            let args = self.compile_args(&toolchain, &wrapper, &object);
            run_tool(&self.cxx, &args, "wrapper compilation").await?;
            objects.push(object);
        }

        let args = self.link_args(&objects, &config.extra_objects, &target);
        run_tool(&self.cxx, &args, "module link").await?;

        crate::verbose!("built {}", target.display());
        Ok(())
    }
}

/// SWIG invocation for one interface source
fn swig_args(
    config: &ExtensionBuildConfig,
    source: &Path,
    wrapper: &Path,
    outdir: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-python".into()];
    args.extend(config.compiler_options.iter().map(OsString::from));
    args.push("-o".into());
    args.push(wrapper.into());
    args.push("-outdir".into());
    args.push(outdir.into());
    args.push(source.into());
    args
}

/// `<temp>/<stem>_wrap.cpp` (or `.c` without `-c++`)
fn wrapper_path(build_temp: &Path, source: &Path, cplusplus: bool) -> PathBuf {
    let stem = source
        .file_stem()
        .map_or_else(|| "interface".into(), OsStr::to_string_lossy);
    let ext = if cplusplus { "cpp" } else { "c" };
    build_temp.join(format!("{stem}_wrap.{ext}"))
}

/// Wrapper path for every source, rejecting sources whose wrappers would
/// overwrite each other in `build_temp`
fn wrapper_paths(
    build_temp: &Path,
    sources: &[PathBuf],
    cplusplus: bool,
) -> BuildOutcome<Vec<PathBuf>> {
    let mut wrappers: Vec<PathBuf> = Vec::with_capacity(sources.len());
    for source in sources {
        let wrapper = wrapper_path(build_temp, source, cplusplus);
        if let Some(index) = wrappers.iter().position(|seen| *seen == wrapper) {
            let other = sources.get(index).unwrap_or(source);
            return Err(BuildError::compile_failed(format!(
                "interface sources {} and {} both generate {}",
                other.display(),
                source.display(),
                wrapper.display()
            )));
        }
        wrappers.push(wrapper);
    }
    Ok(wrappers)
}

/// Whether `target` exists and no input is newer than it.
///
/// Missing inputs count as stale so the toolchain gets to report them.
fn is_up_to_date(target: &Path, inputs: &[&Path]) -> bool {
    let Ok(target_time) = target.metadata().and_then(|m| m.modified()) else {
        return false;
    };

    inputs.iter().all(|input| {
        input
            .metadata()
            .and_then(|m| m.modified())
            .is_ok_and(|input_time| input_time <= target_time)
    })
}

async fn run_tool(program: &str, args: &[OsString], step: &str) -> BuildOutcome {
    crate::debug::echo_command(OsStr::new(program), args);

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .status()
        .await
        .map_err(|e| BuildError::spawn(program, e))?;

    if !status.success() {
        return Err(BuildError::compile_failed(format!(
            "{step} failed: {program} exited with {}",
            status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string())
        )));
    }
    Ok(())
}
