//! Native library build
//!
//! Runs the library's own build tool (Cargo) ahead of the extension build.
//! Equivalent to:
//! ```bash
//! cargo build --release --manifest-path ../../librgb/Cargo.toml
//! ```
//! bounded by a deadline. The tool's output goes straight to the terminal;
//! only its exit status is observed.

use super::types::{BuildCommand, BuildResult};
use crate::error::{BuildError, BuildOutcome};
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::{Child, Command};

/// Name of the build tool when nothing more specific is found
pub const DEFAULT_BUILD_TOOL: &str = "cargo";

/// Runs the native build tool with a deadline
///
/// On unix the tool leads its own process group, so the compiler and build
/// script processes it starts are killed along with it when the deadline
/// passes or the user interrupts the build. `kill_on_drop` covers the case
/// where the waiting future is itself dropped.
#[derive(Debug, Clone, Copy)]
pub struct NativeBuildRunner {
    timeout: Duration,
}

/// How the wait on the build tool ended
enum Waited {
    Exited(ExitStatus),
    Deadline,
    Interrupted,
}

impl NativeBuildRunner {
    /// Create a runner with the given deadline
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Deadline applied to each invocation
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Launch `command` and wait for it, killing it at the deadline.
    ///
    /// Launch and supervision failures are errors; how the tool itself
    /// ended is reported in the returned record.
    pub async fn execute(&self, command: &BuildCommand) -> BuildOutcome<BuildResult> {
        crate::debug::echo_command(command.program_os(), command.args());

        let mut cmd = Command::new(command.program());
        cmd.args(command.args())
            .stdin(Stdio::null())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd
            .spawn()
            .map_err(|e| BuildError::spawn(command.display_program(), e))?;

        let waited = tokio::select! {
            status = child.wait() => Waited::Exited(status?),
            () = tokio::time::sleep(self.timeout) => Waited::Deadline,
            Ok(()) = tokio::signal::ctrl_c() => Waited::Interrupted,
        };

        match waited {
            Waited::Exited(status) => Ok(BuildResult::completed(exit_code(status))),
            Waited::Deadline => {
                crate::debug!(
                    "{} exceeded {:?}, killing process group {:?}",
                    command.display_program(),
                    self.timeout,
                    child.id()
                );
                let status = terminate(&mut child).await?;
                Ok(BuildResult::timed_out(exit_code(status)))
            }
            Waited::Interrupted => {
                let status = terminate(&mut child).await?;
                crate::debug!("native build interrupted, tool ended with {status}");
                Err(BuildError::Interrupted)
            }
        }
    }
}

/// Kill the tool's process group, then the tool itself, and reap it
async fn terminate(child: &mut Child) -> BuildOutcome<ExitStatus> {
    // must run before the leader is reaped, while its pid still names the group
    kill_process_group(child);
    child.kill().await?;
    Ok(child.wait().await?)
}

#[cfg(unix)]
fn kill_process_group(child: &Child) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Some(pgid) = child.id().and_then(|id| i32::try_from(id).ok()) else {
        return;
    };
    if let Err(errno) = killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        crate::debug!("killpg({pgid}) failed: {errno}");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}

/// Build the native library at `manifest_path` in release mode.
///
/// Fails with `Timeout` when the deadline passes (the tool and its process
/// group are killed first) and `NonZeroExit` when the tool reports failure.
/// Never retried.
pub async fn run_native_build(
    tool: &Path,
    manifest_path: &Path,
    timeout: Duration,
) -> BuildOutcome {
    let command = BuildCommand::cargo_release(tool, manifest_path);
    let runner = NativeBuildRunner::new(timeout);
    let result = runner.execute(&command).await?;
    crate::debug!("native build finished: {result:?}");
    result.into_result(timeout)
}

/// Find the build tool.
///
/// Priority order:
/// 1. Explicitly configured path
/// 2. `CARGO` environment variable
/// 3. `cargo` in `PATH`
/// 4. ~/.cargo/bin/cargo
/// 5. Bare `cargo`, left to the process search path at launch
#[must_use]
pub fn resolve_build_tool(configured: Option<&Path>) -> PathBuf {
    if let Some(path) = configured {
        return path.to_path_buf();
    }

    if let Some(cargo_env) = crate::env_vars::cargo() {
        let path = PathBuf::from(cargo_env);
        if path.exists() {
            return path;
        }
    }

    if let Ok(output) = StdCommand::new("which").arg(DEFAULT_BUILD_TOOL).output()
        && output.status.success()
    {
        let path_str = String::from_utf8_lossy(&output.stdout);
        let path = PathBuf::from(path_str.trim());
        if path.exists() {
            return path;
        }
    }

    if let Some(home) = dirs::home_dir() {
        let cargo_path = home.join(".cargo").join("bin").join(DEFAULT_BUILD_TOOL);
        if cargo_path.exists() {
            return cargo_path;
        }
    }

    PathBuf::from(DEFAULT_BUILD_TOOL)
}

/// Exit code of a finished child, shell-style for signal deaths
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_tool_wins() {
        let tool = resolve_build_tool(Some(Path::new("/opt/toolchain/bin/cargo")));
        assert_eq!(tool, PathBuf::from("/opt/toolchain/bin/cargo"));
    }

    #[test]
    fn resolved_tool_is_cargo() {
        let tool = resolve_build_tool(None);
        let name = tool.file_stem().map(|s| s.to_string_lossy().to_string());
        assert_eq!(name.as_deref(), Some("cargo"));
    }

    #[tokio::test]
    async fn missing_tool_is_spawn_error() {
        let err = run_native_build(
            Path::new("/nonexistent/bin/cargo"),
            Path::new("Cargo.toml"),
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, BuildError::Spawn { .. }));
        assert!(err.to_string().contains("/nonexistent/bin/cargo"));
    }

    #[cfg(unix)]
    mod unix {
        use super::super::*;
        use crate::test_utils::fixtures::{
            exiting_tool, fake_tool, forking_tool, hanging_tool, process_alive, wait_until_gone,
        };
        use std::fs;
        use std::time::Instant;
        use tempfile::TempDir;

        #[tokio::test]
        async fn exit_codes_map_to_results() {
            let temp = TempDir::new().unwrap();
            let manifest = temp.path().join("Cargo.toml");
            let timeout = Duration::from_secs(30);

            let ok = exiting_tool(temp.path(), 0);
            assert!(run_native_build(&ok, &manifest, timeout).await.is_ok());

            for code in [1, 2, 137] {
                let tool = exiting_tool(temp.path(), code);
                let err = run_native_build(&tool, &manifest, timeout)
                    .await
                    .unwrap_err();
                assert!(
                    matches!(err, BuildError::NonZeroExit(c) if c == code),
                    "exit {code} gave {err:?}"
                );
            }
        }

        #[tokio::test]
        async fn passes_release_arguments() {
            let temp = TempDir::new().unwrap();
            let args_file = temp.path().join("args.txt");
            let tool = fake_tool(
                temp.path(),
                "record",
                &format!("printf '%s\\n' \"$@\" > '{}'", args_file.display()),
            );
            let manifest = temp.path().join("lib").join("Cargo.toml");

            run_native_build(&tool, &manifest, Duration::from_secs(30))
                .await
                .unwrap();

            let recorded = fs::read_to_string(&args_file).unwrap();
            let expected = format!("build\n--release\n--manifest-path\n{}\n", manifest.display());
            assert_eq!(recorded, expected);
        }

        #[tokio::test]
        async fn hanging_tool_is_killed_at_deadline() {
            let temp = TempDir::new().unwrap();
            let (tool, pid_file) = hanging_tool(temp.path());
            let manifest = temp.path().join("Cargo.toml");

            let start = Instant::now();
            let err = run_native_build(&tool, &manifest, Duration::from_millis(500))
                .await
                .unwrap_err();
            let elapsed = start.elapsed();

            assert!(matches!(err, BuildError::Timeout { .. }));
            assert!(err.to_string().contains("timed out"));
            assert!(elapsed < Duration::from_secs(10), "took {elapsed:?}");

            let pid = fs::read_to_string(&pid_file).unwrap();
            assert!(!process_alive(&pid), "tool {pid} survived the timeout");
        }

        #[tokio::test]
        async fn timeout_kills_processes_started_by_the_tool() {
            let temp = TempDir::new().unwrap();
            let (tool, pid_file) = forking_tool(temp.path());
            let manifest = temp.path().join("Cargo.toml");

            let err = run_native_build(&tool, &manifest, Duration::from_millis(500))
                .await
                .unwrap_err();
            assert!(matches!(err, BuildError::Timeout { .. }));

            let worker = fs::read_to_string(&pid_file).unwrap();
            assert!(
                wait_until_gone(&worker),
                "worker {} outlived the timed-out build",
                worker.trim()
            );
        }

        #[tokio::test]
        async fn timed_out_record_carries_kill_status() {
            let temp = TempDir::new().unwrap();
            let (tool, _pid_file) = hanging_tool(temp.path());
            let command = BuildCommand::cargo_release(&tool, &temp.path().join("Cargo.toml"));

            let result = NativeBuildRunner::new(Duration::from_millis(300))
                .execute(&command)
                .await
                .unwrap();

            assert!(result.timed_out);
            assert_eq!(result.exit_code, 137);
        }
    }
}
