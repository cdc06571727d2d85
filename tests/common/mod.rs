//! Shared test helpers and utilities

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Path to the extbuild binary built for this test run
pub(crate) fn get_extbuild_binary() -> &'static str {
    env!("CARGO_BIN_EXE_extbuild")
}

/// Command for the extbuild binary running inside `dir` with a clean
/// build environment
pub(crate) fn extbuild_in(dir: &Path) -> Command {
    let mut cmd = Command::new(get_extbuild_binary());
    cmd.current_dir(dir);
    for var in [
        "EXTBUILD_TIMEOUT",
        "EXTBUILD_LIBRARY_DIR",
        "CXXFLAGS",
        "LDFLAGS",
        "SWIG",
        "CXX",
        "PYTHON_CONFIG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Write `extbuild.toml` into `dir`
#[allow(dead_code)]
pub(crate) fn write_config(dir: &Path, contents: &str) {
    fs::write(dir.join("extbuild.toml"), contents).expect("Failed to write extbuild.toml");
}

/// Write an executable `/bin/sh` script named `name` into `dir`
#[cfg(unix)]
#[allow(dead_code)]
pub(crate) fn fake_tool(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write fake tool");
    let mut perms = fs::metadata(&path)
        .expect("Failed to stat fake tool")
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("Failed to chmod fake tool");
    path
}

/// Project directory with an interface source and a config pointing the
/// native build at `tool`
#[allow(dead_code)]
pub(crate) fn create_project(tool: &Path, timeout_secs: u64) -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp.path().join("swig.i"), "%module rgb\n").expect("Failed to write swig.i");
    fs::create_dir_all(temp.path().join("librgb")).expect("Failed to create librgb");
    write_config(
        temp.path(),
        &format!(
            "library_dir = \"librgb\"\nbuild_tool = \"{}\"\ntimeout_secs = {timeout_secs}\n",
            tool.display()
        ),
    );
    temp
}
