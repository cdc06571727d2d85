//! extbuild command-line interface
//!
//! Builds the native RGB library and the Python extension module linking it

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

/// Display an error as a single diagnostic line
///
/// The source chain is shown only in debug mode, the backtrace only when
/// requested and captured (`RUST_BACKTRACE`).
fn display_error(err: &anyhow::Error, backtrace_enabled: bool) {
    eprintln!("error: {err}");

    if extbuild::is_debug_enabled() {
        let mut source = err.source();
        while let Some(err) = source {
            eprintln!("caused by: {err}");
            source = err.source();
        }
    }

    if backtrace_enabled {
        let backtrace = err.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            eprintln!("\nBacktrace:");
            eprintln!("{backtrace}");
        }
    }
}

#[derive(Parser)]
#[command(name = "extbuild")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build the RGB Python bindings", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the native library, then compile and link the extension module
    #[command(name = "build_ext", visible_alias = "build")]
    BuildExt {
        /// Path to config file (defaults to ./extbuild.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory for the built module (disables in-place build)
        #[arg(long, short = 'b')]
        build_lib: Option<PathBuf>,

        /// Directory for generated wrappers and object files
        #[arg(long, short = 't')]
        build_temp: Option<PathBuf>,

        /// Echo every external command
        #[arg(long, short)]
        verbose: bool,

        /// Trace configuration and build decisions
        #[arg(long)]
        debug: bool,

        /// Show backtraces on error
        #[arg(long)]
        backtrace: bool,
    },

    /// Print package metadata
    Metadata {
        /// Path to config file (defaults to ./extbuild.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let (verbose, debug, backtrace) = match &cli.command {
        Commands::BuildExt {
            verbose,
            debug,
            backtrace,
            ..
        } => (*verbose, *debug, *backtrace),
        Commands::Metadata { .. } => (false, false, false),
    };

    extbuild::init_debug(verbose, debug);

    let result = match cli.command {
        Commands::BuildExt {
            config,
            build_lib,
            build_temp,
            ..
        } => commands::build_ext::run(config.as_deref(), build_lib, build_temp).await,
        Commands::Metadata { config, json } => commands::metadata::run(config.as_deref(), json),
    };

    if let Err(e) = result {
        display_error(&e, backtrace);
        process::exit(1);
    }
}

mod commands;
