//! Shared test utilities
//!
//! Fake build tools are tiny shell scripts, so tests that use them are unix-only.

#[cfg(all(test, unix))]
pub(crate) mod fixtures {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Write an executable `/bin/sh` script named `name` into `dir`
    pub(crate) fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write fake tool");
        let mut perms = fs::metadata(&path)
            .expect("Failed to stat fake tool")
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("Failed to chmod fake tool");
        path
    }

    /// Fake build tool that exits with `code`
    pub(crate) fn exiting_tool(dir: &Path, code: i32) -> PathBuf {
        fake_tool(dir, &format!("exit-{code}"), &format!("exit {code}"))
    }

    /// Fake build tool that never finishes and records its pid
    pub(crate) fn hanging_tool(dir: &Path) -> (PathBuf, PathBuf) {
        let pid_file = dir.join("tool.pid");
        let tool = fake_tool(
            dir,
            "hang",
            &format!("echo $$ > '{}'\nexec sleep 60", pid_file.display()),
        );
        (tool, pid_file)
    }

    /// Fake build tool that starts a long-running child of its own and
    /// records that child's pid
    pub(crate) fn forking_tool(dir: &Path) -> (PathBuf, PathBuf) {
        let pid_file = dir.join("worker.pid");
        let tool = fake_tool(
            dir,
            "fork",
            &format!("sleep 60 &\necho $! > '{}'\nwait", pid_file.display()),
        );
        (tool, pid_file)
    }

    /// Whether a process with `pid` still exists and has not exited
    pub(crate) fn process_alive(pid: &str) -> bool {
        let pid = pid.trim();
        let signalable = std::process::Command::new("kill")
            .args(["-0", pid])
            .stderr(std::process::Stdio::null())
            .status()
            .is_ok_and(|status| status.success());

        // a killed orphan stays a zombie until init reaps it
        signalable
            && fs::read_to_string(format!("/proc/{pid}/stat")).map_or(true, |stat| {
                stat.rsplit_once(')')
                    .is_none_or(|(_, rest)| !rest.trim_start().starts_with('Z'))
            })
    }

    /// Poll until `pid` is gone, giving up after a few seconds
    pub(crate) fn wait_until_gone(pid: &str) -> bool {
        for _ in 0..50 {
            if !process_alive(pid) {
                return true;
            }
            std::thread::sleep(std::time::Duration::from_millis(100));
        }
        false
    }
}
