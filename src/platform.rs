//! Platform families and native artifact naming
//!
//! The native library is linked statically everywhere except macOS, where the
//! system libraries it depends on are only found through dynamic linking.

use std::env;
use std::fmt;

/// Dynamic library suffix (macOS)
pub const DYLIB_SUFFIX: &str = ".dylib";

/// Static library suffix (Windows)
pub const STATIC_LIB_SUFFIX: &str = ".lib";

/// Static archive suffix (everything else)
pub const ARCHIVE_SUFFIX: &str = ".a";

/// Operating system families the build distinguishes between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformFamily {
    /// macOS and other Darwin systems
    Darwin,
    /// Windows
    Windows,
    /// Linux distributions
    Linux,
    /// FreeBSD, OpenBSD, NetBSD, DragonFly
    Bsd,
    /// Anything not recognised above
    Other,
}

impl PlatformFamily {
    /// Family of the running host
    #[must_use]
    pub fn current() -> Self {
        Self::from_rust_os(env::consts::OS)
    }

    /// Parse a `uname -s` style system name ("Darwin", "Windows", "Linux", ...)
    #[must_use]
    pub fn from_system_name(name: &str) -> Self {
        let lower = name.trim().to_ascii_lowercase();
        match lower.as_str() {
            "darwin" | "macos" => Self::Darwin,
            "windows" => Self::Windows,
            "linux" => Self::Linux,
            "freebsd" | "openbsd" | "netbsd" | "dragonfly" => Self::Bsd,
            _ if lower.starts_with("mingw") || lower.starts_with("cygwin") => Self::Windows,
            _ => Self::Other,
        }
    }

    /// Map Rust's `std::env::consts::OS` value to a family
    #[must_use]
    pub fn from_rust_os(os: &str) -> Self {
        match os {
            "macos" | "ios" => Self::Darwin,
            "windows" => Self::Windows,
            "linux" | "android" => Self::Linux,
            "freebsd" | "openbsd" | "netbsd" | "dragonfly" => Self::Bsd,
            _ => Self::Other,
        }
    }

    /// Suffix of the native artifact to link on this family
    #[must_use]
    pub const fn artifact_suffix(self) -> &'static str {
        match self {
            Self::Darwin => DYLIB_SUFFIX,
            Self::Windows => STATIC_LIB_SUFFIX,
            Self::Linux | Self::Bsd | Self::Other => ARCHIVE_SUFFIX,
        }
    }

    /// Whether shared modules need `-undefined dynamic_lookup` to leave
    /// interpreter symbols unresolved at link time
    #[must_use]
    pub const fn needs_dynamic_lookup(self) -> bool {
        matches!(self, Self::Darwin)
    }

    /// Human-readable name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Darwin => "Darwin",
            Self::Windows => "Windows",
            Self::Linux => "Linux",
            Self::Bsd => "BSD",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
