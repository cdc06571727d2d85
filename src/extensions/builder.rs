//! Extension build step
//!
//! Builds the native library first, then hands the extension pipeline a
//! configuration that links the freshly built artifact. The pipeline is never
//! reached unless the native build succeeded, and it is always told to
//! recompile: the native artifact can change while the wrapper sources do not.

use super::native::{resolve_build_tool, run_native_build};
use super::pipeline::ExtensionCompiler;
use super::types::{BuildDirectives, ExtensionBuildConfig};
use crate::config::BuildConfig;
use crate::error::BuildOutcome;
use crate::platform::PlatformFamily;

/// Native build followed by extension compilation
#[derive(Debug)]
pub struct ExtensionBuildStep<'a, C> {
    config: &'a BuildConfig,
    compiler: &'a C,
}

impl<'a, C: ExtensionCompiler> ExtensionBuildStep<'a, C> {
    /// Create a step over `config` delegating compilation to `compiler`
    #[must_use]
    pub const fn new(config: &'a BuildConfig, compiler: &'a C) -> Self {
        Self { config, compiler }
    }

    /// Run the step for `platform`.
    ///
    /// Errors from either stage are returned unchanged.
    pub async fn run(
        &self,
        platform: PlatformFamily,
        directives: BuildDirectives,
    ) -> BuildOutcome {
        let tool = resolve_build_tool(self.config.build_tool.as_deref());
        let manifest = self.config.manifest_path();
        crate::verbose!("Building native library {}", manifest.display());
        run_native_build(&tool, &manifest, self.config.timeout()).await?;

        let suffix = platform.artifact_suffix();
        crate::debug!("platform {platform} links native artifact with suffix {suffix}");

        let ext_config = ExtensionBuildConfig::from_config(self.config, platform);
        let directives = BuildDirectives {
            force: true,
            ..directives
        };

        crate::verbose!("Building extension {}", ext_config.module_name);
        self.compiler.compile(&ext_config, &directives).await
    }
}

/// Build the native library and then the extension module (convenience function)
pub async fn build_extension<C: ExtensionCompiler>(
    config: &BuildConfig,
    platform: PlatformFamily,
    compiler: &C,
    directives: BuildDirectives,
) -> BuildOutcome {
    ExtensionBuildStep::new(config, compiler)
        .run(platform, directives)
        .await
}
