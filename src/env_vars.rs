//! Environment variable handling.
//!
//! Compiler variables follow the usual make/cc conventions so a cross or
//! custom toolchain can be swapped in without touching the config file.

use std::env;
use std::ffi::OsString;

fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|s| !s.trim().is_empty())
}

// Native build tool

/// Get the Cargo executable set by rustup or the user (`CARGO`).
pub fn cargo() -> Option<String> {
    non_empty("CARGO")
}

/// Get the native build timeout override in seconds (`EXTBUILD_TIMEOUT`).
///
/// Zero and unparsable values are ignored.
pub fn build_timeout() -> Option<u64> {
    non_empty("EXTBUILD_TIMEOUT").and_then(|s| parse_timeout(&s))
}

fn parse_timeout(value: &str) -> Option<u64> {
    value.trim().parse().ok().filter(|secs| *secs > 0)
}

/// Get the native library directory override (`EXTBUILD_LIBRARY_DIR`).
pub fn library_dir() -> Option<String> {
    non_empty("EXTBUILD_LIBRARY_DIR")
}

// Extension toolchain

/// Get the SWIG executable (`SWIG`, defaults to `swig`).
pub fn swig() -> String {
    non_empty("SWIG").unwrap_or_else(|| "swig".to_string())
}

/// Get the interpreter config helper (`PYTHON_CONFIG`, defaults to `python3-config`).
pub fn python_config() -> String {
    non_empty("PYTHON_CONFIG").unwrap_or_else(|| "python3-config".to_string())
}

/// Get C++ compiler (`CXX`, defaults to `c++`).
pub fn cxx() -> String {
    non_empty("CXX").unwrap_or_else(|| "c++".to_string())
}

/// Get C++ compiler flags split on whitespace.
pub fn cxxflags() -> Vec<OsString> {
    split_flags("CXXFLAGS")
}

/// Get linker flags split on whitespace.
pub fn ldflags() -> Vec<OsString> {
    split_flags("LDFLAGS")
}

fn split_flags(var: &str) -> Vec<OsString> {
    non_empty(var)
        .map(|flags| flags.split_whitespace().map(OsString::from).collect())
        .unwrap_or_default()
}
