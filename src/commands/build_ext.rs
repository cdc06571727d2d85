//! Build extension command
//!
//! Build the native library, then the extension module linking it

use anyhow::Result;
use extbuild::{BuildConfig, BuildDirectives, PlatformFamily, SwigPipeline, build_extension};
use std::path::{Path, PathBuf};

/// Run the extension build for the current platform
pub(crate) async fn run(
    config_path: Option<&Path>,
    build_lib: Option<PathBuf>,
    build_temp: Option<PathBuf>,
) -> Result<()> {
    let config = BuildConfig::load_with_options(config_path)?;
    let platform = PlatformFamily::current();
    let directives = directives_from_args(build_lib, build_temp);

    extbuild::debug!("configuration: {config:?}");
    extbuild::debug!("platform: {platform}, directives: {directives:?}");

    let pipeline = SwigPipeline::new(platform);
    build_extension(&config, platform, &pipeline, directives).await?;

    println!("Built extension {}", config.module_name);
    Ok(())
}

/// In place unless an output directory was given
fn directives_from_args(build_lib: Option<PathBuf>, build_temp: Option<PathBuf>) -> BuildDirectives {
    let mut directives = BuildDirectives::default();
    if let Some(dir) = build_lib {
        directives.inplace = false;
        directives.build_lib = dir;
    }
    if let Some(dir) = build_temp {
        directives.build_temp = dir;
    }
    directives
}
