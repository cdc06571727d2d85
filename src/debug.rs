//! Diagnostic output
//!
//! Two process-wide switches set once from the command line: `--verbose`
//! echoes every external command before it runs, `--debug` additionally
//! traces configuration and decisions. Both are zero cost when disabled.

use std::ffi::{OsStr, OsString};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, Default)]
struct Levels {
    verbose: bool,
    debug: bool,
}

static LEVELS: OnceLock<Levels> = OnceLock::new();

/// Initialize diagnostic levels (first call wins)
pub fn init_debug(verbose: bool, debug: bool) {
    let levels = Levels {
        verbose: verbose || debug,
        debug,
    };
    if LEVELS.set(levels).is_err() {
        debug_log("diagnostic levels already initialized");
    }
}

/// Check if debug tracing is enabled
pub fn is_debug_enabled() -> bool {
    LEVELS.get().is_some_and(|levels| levels.debug)
}

/// Check if external commands should be echoed
pub fn is_verbose() -> bool {
    LEVELS.get().is_some_and(|levels| levels.verbose)
}

/// Print a debug message if debug mode is enabled
pub fn debug_log(message: &str) {
    if is_debug_enabled() {
        eprintln!("[DEBUG] {message}");
    }
}

/// Echo a command line if verbose mode is enabled
pub fn echo_command(program: &OsStr, args: &[OsString]) {
    if is_verbose() {
        let mut line = program.to_string_lossy().into_owned();
        for arg in args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        eprintln!("  Running: {line}");
    }
}

/// Macro for debug tracing
///
/// Usage: `debug!("resolved {} to {}", a, b)`
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if $crate::debug::is_debug_enabled() {
            eprintln!("[DEBUG] {}", format_args!($($arg)*));
        }
    };
}

/// Macro for progress lines shown under `--verbose`
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::debug::is_verbose() {
            eprintln!("{}", format_args!($($arg)*));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_default_to_off_or_initialized_once() {
        // Other tests in the process may initialize first; either way the
        // debug level implies the verbose level.
        init_debug(false, false);
        if is_debug_enabled() {
            assert!(is_verbose());
        }
    }
}
